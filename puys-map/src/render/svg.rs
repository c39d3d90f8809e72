//! Construction de la scène SVG (contour, courbes, sommets)

use geo::{Coord, LineString};
use puys::{Polyline, Summit};
use svg::node::element::path::Data;
use svg::node::element::{Circle, Group, Path, Text};
use svg::Document;

use super::style;

/// Marge autour de l'étendue dessinée (place pour les libellés)
const MARGIN: f64 = 10.0;

/// Rayon des marqueurs de sommet
const SUMMIT_RADIUS: f64 = 3.0;

/// Éléments projetés à dessiner
#[derive(Debug, Clone, Copy)]
pub struct Scene<'a> {
    pub boundary: &'a LineString<f64>,
    pub contours: &'a [Polyline],
    pub summits: &'a [Summit],
}

/// Étendue des points effectivement dessinés
#[derive(Debug, Clone, Copy)]
struct Extent {
    min: Coord,
    max: Coord,
}

impl Extent {
    fn include(extent: Option<Extent>, c: Coord) -> Option<Extent> {
        Some(match extent {
            None => Extent { min: c, max: c },
            Some(e) => Extent {
                min: Coord {
                    x: e.min.x.min(c.x),
                    y: e.min.y.min(c.y),
                },
                max: Coord {
                    x: e.max.x.max(c.x),
                    y: e.max.y.max(c.y),
                },
            },
        })
    }
}

/// Arrondi au centième, suffisant à l'échelle du plan
fn round(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

fn point(c: Coord) -> (f64, f64) {
    (round(c.x), round(c.y))
}

/// Points du contour conservés: un sur `stride`, premier point inclus
pub fn boundary_points(ring: &LineString<f64>, stride: usize) -> Vec<Coord> {
    let coords = &ring.0;
    let open_len = if ring.is_closed() && coords.len() > 1 {
        coords.len() - 1
    } else {
        coords.len()
    };
    coords[..open_len]
        .iter()
        .step_by(stride.max(1))
        .copied()
        .collect()
}

/// Chemin fermé passant par les points donnés
fn closed_path_data(coords: &[Coord]) -> Option<Data> {
    let (first, rest) = coords.split_first()?;
    let data = rest
        .iter()
        .fold(Data::new().move_to(point(*first)), |data, c| {
            data.line_to(point(*c))
        });
    Some(data.close())
}

/// Construit le document SVG complet
pub fn build_document(scene: &Scene, boundary_stride: usize) -> Document {
    let mut extent = None;

    // Contour du département
    let boundary = boundary_points(scene.boundary, boundary_stride);
    extent = boundary.iter().fold(extent, |e, c| Extent::include(e, *c));
    let mut boundary_group = Group::new().set("stroke-linejoin", "round");
    if let Some(data) = closed_path_data(&boundary) {
        boundary_group = boundary_group.add(
            Path::new()
                .set("stroke", style::BOUNDARY_COLOR)
                .set("fill", "transparent")
                .set("stroke-width", 1)
                .set("d", data),
        );
    }

    // Courbes de niveau, des plus basses aux plus hautes
    let mut contours: Vec<&Polyline> = scene.contours.iter().collect();
    contours.sort_by_key(|c| c.elevation);

    let mut contour_group = Group::new()
        .set("id", "contours")
        .set("stroke-linejoin", "round");
    for contour in contours {
        let coords = &contour.line.0;
        let ring = if contour.is_closed() {
            &coords[..coords.len() - 1]
        } else {
            &coords[..]
        };
        extent = ring.iter().fold(extent, |e, c| Extent::include(e, *c));
        let Some(data) = closed_path_data(ring) else {
            continue;
        };
        contour_group = contour_group.add(
            Path::new()
                .set("fill", style::contour_fill(contour.elevation))
                .set("stroke", "black")
                .set("stroke-width", style::contour_stroke_width(contour.elevation))
                .set("data-ele", contour.elevation)
                .set("d", data),
        );
    }

    // Sommets
    let mut summit_group = Group::new().set("id", "summits");
    for summit in scene.summits {
        extent = Extent::include(extent, summit.position);
        let (x, y) = point(summit.position);
        let mut marker = Group::new()
            .set("class", if summit.visited { "puy visited" } else { "puy" })
            .add(
                Circle::new()
                    .set("cx", x)
                    .set("cy", y)
                    .set("r", SUMMIT_RADIUS)
                    .set("fill", style::summit_color(summit.visited))
                    .set("stroke", "black"),
            );
        let label = summit.full_label();
        if !label.is_empty() {
            marker = marker.add(
                Text::new(label)
                    .set("x", x)
                    .set("y", y)
                    .set("text-anchor", "middle")
                    .set("stroke", "white")
                    .set("dy", -7),
            );
        }
        summit_group = summit_group.add(marker);
    }

    let extent = extent.unwrap_or(Extent {
        min: Coord { x: 0.0, y: 0.0 },
        max: Coord { x: 1.0, y: 1.0 },
    });
    let min_x = round(extent.min.x - MARGIN);
    let min_y = round(extent.min.y - MARGIN);
    let width = round(extent.max.x - extent.min.x + 2.0 * MARGIN);
    let height = round(extent.max.y - extent.min.y + 2.0 * MARGIN);

    let scene_group = Group::new()
        .set("id", "scene")
        .add(boundary_group)
        .add(contour_group)
        .add(summit_group);

    Document::new()
        .set("width", width)
        .set("height", height)
        .set("viewBox", (min_x, min_y, width, height))
        .add(scene_group)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(elevation: i32, offset: f64, size: f64) -> Polyline {
        Polyline::new(
            elevation,
            vec![
                Coord { x: offset, y: offset },
                Coord { x: offset + size, y: offset },
                Coord { x: offset + size, y: offset + size },
                Coord { x: offset, y: offset + size },
                Coord { x: offset, y: offset },
            ],
        )
    }

    fn summit(name: &str, visited: bool, elevation: Option<f64>) -> Summit {
        Summit {
            name: Some(name.to_string()),
            position: Coord { x: 50.0, y: 50.0 },
            elevation,
            visited,
        }
    }

    #[test]
    fn test_boundary_stride() {
        let ring: LineString<f64> = (0..21)
            .map(|i| Coord { x: i as f64, y: 0.0 })
            .chain(std::iter::once(Coord { x: 0.0, y: 0.0 }))
            .collect();
        let kept = boundary_points(&ring, 10);
        assert_eq!(kept.len(), 3);
        assert_eq!(kept[1], Coord { x: 10.0, y: 0.0 });
        assert_eq!(boundary_points(&ring, 0).len(), 21);
    }

    #[test]
    fn test_document_content() {
        let boundary = square(0, 0.0, 100.0).line;
        let contours = vec![square(1100, 20.0, 60.0), square(1000, 10.0, 80.0)];
        let summits = vec![
            summit("Puy de Dôme", true, Some(1465.0)),
            summit("Puy Pariou", false, None),
        ];
        let scene = Scene {
            boundary: &boundary,
            contours: &contours,
            summits: &summits,
        };

        let svg = build_document(&scene, 1).to_string();

        assert!(svg.contains("Puy de Dôme (1465m)"));
        assert!(svg.contains("Puy Pariou"));
        assert!(!svg.contains("Puy Pariou ("));
        assert!(svg.contains(style::VISITED_COLOR));
        assert!(svg.contains(style::NOT_VISITED_COLOR));
        // Plus basse altitude dessinée en premier
        let low = svg.find("data-ele=\"1000\"").unwrap();
        let high = svg.find("data-ele=\"1100\"").unwrap();
        assert!(low < high);
        assert!(svg.contains("viewBox=\"-10 -10 120 120\""));
    }
}
