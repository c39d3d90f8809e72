//! Projection des coordonnées géographiques vers le plan de dessin
//!
//! Mercator sphérique normalisé, suivi d'une mise à l'échelle uniforme
//! calée sur l'étendue des courbes de niveau. Le même projecteur est
//! appliqué aux courbes, aux sommets et au contour du département.

use geo::{Coord, LineString, Rect};

use crate::types::{Boundary, Polyline, Summit};
use crate::PuysError;

/// Largeur par défaut du plan de dessin
pub const DEFAULT_TARGET_WIDTH: f64 = 1000.0;

/// Latitude maximale avant que Mercator ne diverge
const MAX_LATITUDE: f64 = 85.0;

/// Mercator sphérique, en unités normalisées (un tour de Terre = 1)
///
/// Y croît vers le sud, comme en SVG.
pub fn mercator(coord: Coord) -> Coord {
    let lon = coord.x.to_radians();
    let lat = coord.y.clamp(-MAX_LATITUDE, MAX_LATITUDE).to_radians();
    let two_pi = 2.0 * std::f64::consts::PI;

    Coord {
        x: (lon + std::f64::consts::PI) / two_pi,
        y: 0.5 - (std::f64::consts::FRAC_PI_4 + lat / 2.0).tan().ln() / two_pi,
    }
}

/// Transformation géographique -> plan de dessin
#[derive(Debug, Clone, Copy)]
pub struct Projector {
    origin: Coord,
    scale: f64,
}

impl Projector {
    /// Cale le projecteur sur une étendue géographique (x = lon, y = lat)
    ///
    /// La largeur projetée vaut `target_width`; la hauteur suit le même
    /// facteur d'échelle pour conserver les proportions.
    pub fn fit(bounds: Rect<f64>, target_width: f64) -> Result<Self, PuysError> {
        if !target_width.is_finite() || target_width <= 0.0 {
            return Err(PuysError::Projection(format!(
                "target width must be > 0, got {}",
                target_width
            )));
        }

        // Le nord (lat max) donne le y Mercator minimal
        let a = mercator(bounds.min());
        let b = mercator(bounds.max());
        let min = Coord {
            x: a.x.min(b.x),
            y: a.y.min(b.y),
        };
        let width = (a.x - b.x).abs();
        let height = (a.y - b.y).abs();

        if width <= f64::EPSILON || height <= f64::EPSILON {
            return Err(PuysError::Projection(format!(
                "degenerate extent {:?} -> {:?}",
                bounds.min(),
                bounds.max()
            )));
        }

        Ok(Self {
            origin: min,
            scale: target_width / width,
        })
    }

    /// Projette une coordonnée géographique
    pub fn project(&self, coord: Coord) -> Coord {
        let m = mercator(coord);
        Coord {
            x: (m.x - self.origin.x) * self.scale,
            y: (m.y - self.origin.y) * self.scale,
        }
    }

    pub fn project_line(&self, line: &LineString<f64>) -> LineString<f64> {
        line.0.iter().map(|&c| self.project(c)).collect()
    }

    pub fn project_polyline(&self, polyline: &Polyline) -> Polyline {
        Polyline {
            elevation: polyline.elevation,
            line: self.project_line(&polyline.line),
        }
    }

    pub fn project_summit(&self, summit: &Summit) -> Summit {
        Summit {
            position: self.project(summit.position),
            ..summit.clone()
        }
    }

    pub fn project_boundary(&self, boundary: &Boundary) -> Boundary {
        let mut projected = boundary.clone();
        for section in &mut projected.sections {
            section.ring = self.project_line(&section.ring);
        }
        projected
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chaine_des_puys() -> Rect<f64> {
        Rect::new(Coord { x: 2.85, y: 45.60 }, Coord { x: 3.05, y: 45.95 })
    }

    #[test]
    fn test_fit_maps_extent_to_target() {
        let projector = Projector::fit(chaine_des_puys(), 1000.0).unwrap();

        // Coin nord-ouest -> origine
        let nw = projector.project(Coord { x: 2.85, y: 45.95 });
        assert!(nw.x.abs() < 1e-9, "x={}", nw.x);
        assert!(nw.y.abs() < 1e-9, "y={}", nw.y);

        // Coin sud-est -> largeur cible, hauteur proportionnelle
        let se = projector.project(Coord { x: 3.05, y: 45.60 });
        assert!((se.x - 1000.0).abs() < 1e-6, "x={}", se.x);
        assert!(se.y > 1000.0, "y={}", se.y);
    }

    #[test]
    fn test_north_is_up() {
        let projector = Projector::fit(chaine_des_puys(), 1000.0).unwrap();
        let dome = projector.project(Coord { x: 2.9645, y: 45.7717 });
        let pariou = projector.project(Coord { x: 2.9711, y: 45.7961 });
        assert!(pariou.y < dome.y);
    }

    #[test]
    fn test_degenerate_extent() {
        let flat = Rect::new(Coord { x: 2.9, y: 45.7 }, Coord { x: 3.0, y: 45.7 });
        assert!(matches!(
            Projector::fit(flat, 1000.0),
            Err(PuysError::Projection(_))
        ));
        assert!(Projector::fit(chaine_des_puys(), 0.0).is_err());
    }

    #[test]
    fn test_mercator_equator() {
        let m = mercator(Coord { x: 0.0, y: 0.0 });
        assert!((m.x - 0.5).abs() < 1e-12);
        assert!((m.y - 0.5).abs() < 1e-12);
    }
}
