//! Tests d'intégration: chargement de fichiers réels puis simplification

use std::path::PathBuf;

use puys::{load_boundary, load_contours, load_summits, simplify, Projector, PuysError, Thresholds};

/// Écrit une fixture dans un répertoire temporaire propre au test
fn fixture(test: &str, name: &str, content: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("puys_it_{}", test));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    path
}

/// Deux courbes fermées autour du puy de Dôme et un fragment court
const CONTOURS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<osm version="0.6" generator="phyghtmap">
  <node id="1" lat="45.760" lon="2.950"/>
  <node id="2" lat="45.760" lon="2.980"/>
  <node id="3" lat="45.785" lon="2.980"/>
  <node id="4" lat="45.785" lon="2.950"/>
  <node id="5" lat="45.765" lon="2.955"/>
  <node id="6" lat="45.765" lon="2.975"/>
  <node id="7" lat="45.780" lon="2.975"/>
  <node id="8" lat="45.780" lon="2.955"/>
  <node id="9" lat="45.7700" lon="2.9600"/>
  <node id="10" lat="45.7701" lon="2.9601"/>
  <node id="11" lat="45.7652" lon="2.9550"/>
  <way id="100">
    <nd ref="1"/><nd ref="2"/><nd ref="3"/><nd ref="4"/><nd ref="1"/>
    <tag k="ele" v="1200"/>
    <tag k="contour" v="elevation"/>
  </way>
  <way id="101">
    <nd ref="5"/><nd ref="6"/><nd ref="7"/><nd ref="8"/><nd ref="11"/>
    <tag k="ele" v="1400"/>
  </way>
  <way id="102">
    <nd ref="9"/><nd ref="10"/>
    <tag k="ele" v="1450"/>
  </way>
</osm>
"#;

const SUMMITS: &str = "label,lat,lon,elevation,visited\n\
                       Puy de Dôme,45.7717,2.9645,1465,true\n\
                       Petit Puy de Dôme,45.7800,2.9700,1256,false\n";

const BOUNDARY: &str = "puy-de-dome\n1\n 2.90 45.70\n 3.05 45.70\n 3.05 45.85\n 2.90 45.85\nEND\nEND\n";

#[test]
fn test_load_and_simplify() {
    let contours = load_contours(&fixture("load", "contours.osm", CONTOURS)).unwrap();
    let summits = load_summits(&fixture("load", "puys.csv", SUMMITS)).unwrap();
    let boundary = load_boundary(&fixture("load", "63.poly", BOUNDARY)).unwrap();

    assert_eq!(contours.ways.len(), 3);
    assert_eq!(summits.len(), 2);
    assert_eq!(boundary.title, "puy-de-dome");

    let projector = Projector::fit(contours.bounds, 1000.0).unwrap();
    let projected = contours
        .ways
        .iter()
        .map(|w| projector.project_polyline(w))
        .collect();

    let result = simplify(projected, &Thresholds::default());

    // Le fragment de quelques mètres est écarté, la courbe ouverte est refermée
    assert_eq!(result.stats.too_short, 1);
    assert_eq!(result.stats.already_closed, 1);
    assert_eq!(result.stats.self_closed, 1);
    assert_eq!(result.closed.len(), 2);
    assert!(result.open.is_empty());

    // Les sommets projetés tombent dans le plan de dessin
    let dome = projector.project_summit(&summits[0]);
    assert!(dome.position.x > 0.0 && dome.position.x < 1000.0);
    assert!(dome.position.y > 0.0);
}

#[test]
fn test_parse_error_reports_file_and_line() {
    let bad = "label,lat,lon,elevation,visited\nPuy de Dôme,45.7717,2.9645,1465,true\nPuy Pariou,,2.97,1209,1\n";
    let err = load_summits(&fixture("error", "bad.csv", bad)).unwrap_err();
    match err {
        PuysError::Parse { file, line, .. } => {
            assert_eq!(file, "bad.csv");
            assert_eq!(line, 3);
        }
        other => panic!("expected parse error, got {:?}", other),
    }
}

#[test]
fn test_missing_file() {
    let err = load_boundary(std::path::Path::new("does/not/exist.poly")).unwrap_err();
    assert!(matches!(err, PuysError::Io { .. }));
    assert!(err.to_string().contains("exist.poly"));
}
