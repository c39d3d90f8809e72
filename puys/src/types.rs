//! Types de données pour le crate puys

use geo::{Coord, LineString, Rect};
use serde::{Deserialize, Serialize};

/// Tolérance pour considérer deux points comme confondus
pub const COORD_TOLERANCE: f64 = 1e-6;

/// Compare deux coordonnées avec tolérance
pub fn coords_equal(a: Coord, b: Coord) -> bool {
    (a.x - b.x).abs() < COORD_TOLERANCE && (a.y - b.y).abs() < COORD_TOLERANCE
}

/// Distance euclidienne entre deux coordonnées
pub fn distance(a: Coord, b: Coord) -> f64 {
    (a.x - b.x).hypot(a.y - b.y)
}

/// Courbe de niveau: suite ordonnée de points à une altitude donnée
#[derive(Debug, Clone, PartialEq)]
pub struct Polyline {
    /// Altitude en mètres (tag `ele`)
    pub elevation: i32,

    /// Points de la courbe
    pub line: LineString<f64>,
}

impl Polyline {
    pub fn new(elevation: i32, coords: Vec<Coord>) -> Self {
        Self {
            elevation,
            line: LineString::new(coords),
        }
    }

    pub fn first(&self) -> Coord {
        self.line.0[0]
    }

    pub fn last(&self) -> Coord {
        self.line.0[self.line.0.len() - 1]
    }

    /// Premier et dernier point confondus (à la tolérance près)
    pub fn is_closed(&self) -> bool {
        self.line.0.len() > 1 && coords_equal(self.first(), self.last())
    }

    /// Écart entre les deux extrémités
    pub fn endpoint_gap(&self) -> f64 {
        distance(self.first(), self.last())
    }

    /// Longueur du chemin (somme des distances entre points consécutifs)
    pub fn length(&self) -> f64 {
        self.line
            .0
            .windows(2)
            .map(|pair| distance(pair[0], pair[1]))
            .sum()
    }

    /// Barycentre des points
    pub fn barycenter(&self) -> Coord {
        let n = self.line.0.len() as f64;
        let (sx, sy) = self
            .line
            .0
            .iter()
            .fold((0.0, 0.0), |(sx, sy), c| (sx + c.x, sy + c.y));
        Coord {
            x: sx / n,
            y: sy / n,
        }
    }
}

/// Sommet (puy) chargé depuis le CSV
#[derive(Debug, Clone, PartialEq)]
pub struct Summit {
    /// Nom, optionnel
    pub name: Option<String>,

    /// Position (x = longitude, y = latitude avant projection)
    pub position: Coord,

    /// Altitude en mètres, optionnelle
    pub elevation: Option<f64>,

    /// Sommet déjà gravi
    pub visited: bool,
}

impl Summit {
    /// Libellé complet, avec l'altitude si elle est connue
    pub fn full_label(&self) -> String {
        match (self.name.as_deref(), self.elevation) {
            (Some(name), Some(ele)) => format!("{} ({:.0}m)", name, ele),
            (Some(name), None) => name.to_string(),
            (None, Some(ele)) => format!("{:.0}m", ele),
            (None, None) => String::new(),
        }
    }
}

/// Section d'un fichier POLY
#[derive(Debug, Clone)]
pub struct PolySection {
    /// Nom de la section (ex: "1", "!2")
    pub name: String,

    /// Section soustractive (nom préfixé par `!`)
    pub hole: bool,

    /// Anneau fermé
    pub ring: LineString<f64>,
}

/// Contour du département
#[derive(Debug, Clone)]
pub struct Boundary {
    /// Titre du fichier POLY
    pub title: String,

    /// Sections dans l'ordre du fichier
    pub sections: Vec<PolySection>,
}

impl Boundary {
    /// Premier anneau extérieur (le parser garantit qu'il existe)
    pub fn outline(&self) -> &LineString<f64> {
        self.sections
            .iter()
            .find(|s| !s.hole)
            .map(|s| &s.ring)
            .unwrap_or(&self.sections[0].ring)
    }

    /// Recherche une section par son nom
    pub fn section(&self, name: &str) -> Option<&PolySection> {
        self.sections.iter().find(|s| s.name == name)
    }
}

/// Résultat du chargement du fichier OSM
#[derive(Debug)]
pub struct ContourSet {
    /// Courbes de niveau valides (avec tag `ele`)
    pub ways: Vec<Polyline>,

    /// Étendue géographique de tous les noeuds chargés
    pub bounds: Rect<f64>,
}

/// Seuils du simplificateur, en unités du plan projeté
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    /// Longueur minimale d'une courbe
    pub min_length: f64,

    /// Écart maximal pour fusionner deux courbes ouvertes
    pub merge_distance: f64,

    /// Écart maximal pour fermer une courbe sur elle-même
    pub closure_distance: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            min_length: 30.0,
            merge_distance: 5.0,
            closure_distance: 200.0,
        }
    }
}

impl Thresholds {
    /// Vérifie que chaque seuil est fini et positif
    pub fn validate(&self) -> Result<(), String> {
        for (name, value) in [
            ("min_length", self.min_length),
            ("merge_distance", self.merge_distance),
            ("closure_distance", self.closure_distance),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(format!("{} must be a finite value >= 0, got {}", name, value));
            }
        }
        Ok(())
    }
}
