//! # puys
//!
//! Chargement et simplification des données de la carte de la Chaîne des Puys.
//!
//! ## Features
//!
//! - Courbes de niveau depuis un export OSM XML (tag `ele`)
//! - Liste des puys depuis un CSV (nom, latitude, longitude, altitude, visité)
//! - Contour du département depuis un fichier POLY (Osmosis)
//! - Fichiers `.bz2` décompressés à la volée
//! - Simplification déterministe des courbes (filtre, fermeture, fusion)
//! - Types `geo` pour l'interopérabilité avec l'écosystème Rust géospatial
//!
//! ## Usage
//!
//! ```rust,ignore
//! use puys::{load_contours, simplify, Projector, Thresholds};
//! use std::path::Path;
//!
//! let contours = load_contours(Path::new("contours.osm"))?;
//! let projector = Projector::fit(contours.bounds, 1000.0)?;
//! let projected = contours.ways.iter().map(|w| projector.project_polyline(w)).collect();
//! let result = simplify(projected, &Thresholds::default());
//! println!("{} closed contours", result.closed.len());
//! ```

pub mod error;
pub mod input;
pub mod parser;
pub mod projection;
pub mod simplify;
pub mod types;

pub use error::PuysError;
pub use projection::Projector;
pub use simplify::{simplify, Simplified, SimplifyStats};
pub use types::{Boundary, ContourSet, PolySection, Polyline, Summit, Thresholds};

use std::path::Path;

use tracing::info;

/// Charge le fichier OSM des courbes de niveau
///
/// # Errors
///
/// `PuysError::Io` si le fichier est illisible, `PuysError::Parse` sur le
/// premier enregistrement malformé, `PuysError::Empty` sans aucune courbe.
pub fn load_contours(path: &Path) -> Result<ContourSet, PuysError> {
    let content = input::read_text(path)?;
    let set = parser::osm::parse(&content, &input::display_name(path))?;
    info!(path = %path.display(), ways = set.ways.len(), "Contours loaded");
    Ok(set)
}

/// Charge le fichier CSV des puys
pub fn load_summits(path: &Path) -> Result<Vec<Summit>, PuysError> {
    let content = input::read_text(path)?;
    let summits = parser::csv::parse(&content, &input::display_name(path))?;
    info!(path = %path.display(), summits = summits.len(), "Summits loaded");
    Ok(summits)
}

/// Charge le fichier POLY du département
pub fn load_boundary(path: &Path) -> Result<Boundary, PuysError> {
    let content = input::read_text(path)?;
    let boundary = parser::poly::parse(&content, &input::display_name(path))?;
    info!(
        path = %path.display(),
        title = %boundary.title,
        sections = boundary.sections.len(),
        "Boundary loaded"
    );
    Ok(boundary)
}
