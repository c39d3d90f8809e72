//! Définition et implémentation de la commande de rendu
//!
//! Chaîne complète: chargement des trois fichiers, projection, simplification
//! des courbes, filtrage optionnel autour des sommets, rendu HTML puis écriture.
//! Rien n'est écrit tant que la page n'est pas entièrement produite.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Args;
use geo::Coord;
use puys::types::distance;
use puys::{Polyline, Projector, Summit};
use tracing::{debug, info};

use crate::config::Config;
use crate::render::{self, PageInput, PageOptions};
use crate::report::{self, RenderReport};

/// Arguments de la commande de rendu
#[derive(Args, Debug, Clone)]
pub struct RenderArgs {
    /// Contour lines (.osm or .osm.bz2), ways tagged with `ele`
    pub contours: PathBuf,

    /// Summits CSV (label, lat, lon, elevation, visited)
    pub summits: PathBuf,

    /// Department boundary (.poly)
    pub boundary: PathBuf,

    /// Output HTML file
    pub output: PathBuf,

    /// Minimum contour length, in plot units (default: 30)
    #[arg(short = 'l', long, value_parser = parse_threshold, allow_negative_numbers = true)]
    pub min_length: Option<f64>,

    /// Maximum gap to merge two open contours (default: 5)
    #[arg(short = 'm', long, value_parser = parse_threshold, allow_negative_numbers = true)]
    pub merge_distance: Option<f64>,

    /// Maximum gap to close a contour on itself (default: 200)
    #[arg(short = 'c', long, value_parser = parse_threshold, allow_negative_numbers = true)]
    pub closure_distance: Option<f64>,

    /// Only draw contours whose barycenter lies within this distance of a summit
    #[arg(long, value_parser = parse_threshold, allow_negative_numbers = true)]
    pub focus_distance: Option<f64>,

    /// Keep one boundary point out of N (default: 10)
    #[arg(long)]
    pub boundary_stride: Option<usize>,

    /// Plot width after projection (default: 1000)
    #[arg(long, value_parser = parse_threshold, allow_negative_numbers = true)]
    pub width: Option<f64>,

    /// Page title
    #[arg(long)]
    pub title: Option<String>,

    /// JSON config file (CLI flags take precedence)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Do not write style.css and script.js next to the page
    #[arg(long)]
    pub no_assets: bool,

    /// Save the render report as JSON
    #[arg(long)]
    pub report: Option<PathBuf>,
}

/// Lit un seuil numérique: fini et positif ou nul
pub fn parse_threshold(raw: &str) -> Result<f64, String> {
    let value: f64 = raw
        .trim()
        .parse()
        .map_err(|_| format!("'{}' is not a number", raw))?;
    if !value.is_finite() || value < 0.0 {
        return Err(format!("expected a finite value >= 0, got {}", raw));
    }
    Ok(value)
}

/// Construit la configuration effective: fichier, puis surcharges CLI
pub fn build_config(args: &RenderArgs) -> Result<Config> {
    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    if let Some(v) = args.min_length {
        config.thresholds.min_length = v;
    }
    if let Some(v) = args.merge_distance {
        config.thresholds.merge_distance = v;
    }
    if let Some(v) = args.closure_distance {
        config.thresholds.closure_distance = v;
    }
    if args.focus_distance.is_some() {
        config.focus_distance = args.focus_distance;
    }
    if let Some(v) = args.boundary_stride {
        config.boundary_stride = v;
    }
    if let Some(v) = args.width {
        config.width = v;
    }
    if let Some(title) = &args.title {
        config.title = title.clone();
    }

    config.validate().context("Invalid configuration")?;
    Ok(config)
}

/// Garde les courbes dont le barycentre est proche d'au moins un sommet
///
/// Retourne les courbes gardées et le nombre de courbes écartées.
pub fn focus_on_summits(
    contours: Vec<Polyline>,
    summits: &[Summit],
    max_distance: f64,
) -> (Vec<Polyline>, usize) {
    let positions: Vec<Coord> = summits.iter().map(|s| s.position).collect();
    let before = contours.len();

    let kept: Vec<Polyline> = contours
        .into_iter()
        .filter(|contour| {
            let center = contour.barycenter();
            positions
                .iter()
                .any(|&p| distance(center, p) <= max_distance)
        })
        .collect();

    let dropped = before - kept.len();
    (kept, dropped)
}

/// Exécute la commande de rendu
pub fn cmd_render(args: &RenderArgs) -> Result<RenderReport> {
    let started_at = Instant::now();
    let config = build_config(args)?;

    info!(
        contours = %args.contours.display(),
        summits = %args.summits.display(),
        boundary = %args.boundary.display(),
        output = %args.output.display(),
        "Starting render"
    );
    debug!(?config, "Effective configuration");

    // Chargement
    let contour_set = puys::load_contours(&args.contours)
        .with_context(|| format!("Failed to load contours from {}", args.contours.display()))?;
    let summits = puys::load_summits(&args.summits)
        .with_context(|| format!("Failed to load summits from {}", args.summits.display()))?;
    let boundary = puys::load_boundary(&args.boundary)
        .with_context(|| format!("Failed to load boundary from {}", args.boundary.display()))?;

    // Projection, ajustée sur l'étendue des courbes
    let projector = Projector::fit(contour_set.bounds, config.width)?;
    let contour_ways = contour_set.ways.len();
    let projected: Vec<Polyline> = contour_set
        .ways
        .iter()
        .map(|way| projector.project_polyline(way))
        .collect();
    let summits: Vec<Summit> = summits.iter().map(|s| projector.project_summit(s)).collect();
    let boundary = projector.project_boundary(&boundary);

    // Simplification
    let simplified = puys::simplify(projected, &config.thresholds);
    let stats = simplified.stats;

    let (contours, out_of_focus) = match config.focus_distance {
        Some(max_distance) => focus_on_summits(simplified.closed, &summits, max_distance),
        None => (simplified.closed, 0),
    };
    if out_of_focus > 0 {
        info!(dropped = out_of_focus, "Contours far from any summit skipped");
    }

    // Rendu en mémoire
    let outline = boundary.outline();
    let page = render::render_page(
        &PageInput {
            boundary_title: &boundary.title,
            boundary: outline,
            contours: &contours,
            summits: &summits,
        },
        &PageOptions {
            title: config.title.clone(),
            boundary_stride: config.boundary_stride,
        },
    )?;
    let digest = report::digest(page.as_bytes());

    // Écriture
    let files_written = render::write_page(&page, &args.output, !args.no_assets)?;

    let report = RenderReport {
        output: args.output.clone(),
        duration_secs: started_at.elapsed().as_secs_f64(),
        contour_ways,
        simplify: stats,
        out_of_focus,
        contours_drawn: contours.len(),
        summits: summits.len(),
        visited: summits.iter().filter(|s| s.visited).count(),
        boundary_points: render::svg::boundary_points(outline, config.boundary_stride).len(),
        files_written,
        digest,
    };

    info!(
        contours = report.contours_drawn,
        summits = report.summits,
        visited = report.visited,
        digest = %report.digest,
        "Render completed"
    );

    if let Some(path) = &args.report {
        report.save_json(path)?;
        info!(path = %path.display(), "Report saved");
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> RenderArgs {
        RenderArgs {
            contours: PathBuf::from("contours.osm"),
            summits: PathBuf::from("puys.csv"),
            boundary: PathBuf::from("dep.poly"),
            output: PathBuf::from("index.html"),
            min_length: None,
            merge_distance: None,
            closure_distance: None,
            focus_distance: None,
            boundary_stride: None,
            width: None,
            title: None,
            config: None,
            no_assets: false,
            report: None,
        }
    }

    #[test]
    fn test_parse_threshold() {
        assert_eq!(parse_threshold("5"), Ok(5.0));
        assert_eq!(parse_threshold("0"), Ok(0.0));
        assert_eq!(parse_threshold("2.5"), Ok(2.5));
        assert!(parse_threshold("-1").is_err());
        assert!(parse_threshold("NaN").is_err());
        assert!(parse_threshold("inf").is_err());
        assert!(parse_threshold("abc").is_err());
    }

    #[test]
    fn test_build_config_defaults() {
        let config = build_config(&args()).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_build_config_overrides() {
        let args = RenderArgs {
            merge_distance: Some(8.0),
            boundary_stride: Some(1),
            title: Some("Puys".to_string()),
            ..args()
        };
        let config = build_config(&args).unwrap();
        assert_eq!(config.thresholds.merge_distance, 8.0);
        assert_eq!(config.thresholds.min_length, 30.0);
        assert_eq!(config.boundary_stride, 1);
        assert_eq!(config.title, "Puys");
    }

    #[test]
    fn test_build_config_rejects_zero_stride() {
        let args = RenderArgs {
            boundary_stride: Some(0),
            ..args()
        };
        assert!(build_config(&args).is_err());
    }

    #[test]
    fn test_focus_on_summits() {
        let near = Polyline::new(
            1000,
            vec![
                Coord { x: 0.0, y: 0.0 },
                Coord { x: 10.0, y: 0.0 },
                Coord { x: 10.0, y: 10.0 },
                Coord { x: 0.0, y: 0.0 },
            ],
        );
        let far = Polyline::new(
            1000,
            vec![
                Coord { x: 500.0, y: 500.0 },
                Coord { x: 510.0, y: 500.0 },
                Coord { x: 510.0, y: 510.0 },
                Coord { x: 500.0, y: 500.0 },
            ],
        );
        let summits = vec![Summit {
            name: Some("Puy de Dôme".to_string()),
            position: Coord { x: 5.0, y: 5.0 },
            elevation: Some(1465.0),
            visited: true,
        }];

        let (kept, dropped) = focus_on_summits(vec![near.clone(), far], &summits, 50.0);
        assert_eq!(kept, vec![near]);
        assert_eq!(dropped, 1);
    }
}
