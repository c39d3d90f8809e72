//! # puys-map
//!
//! Carte HTML statique de la Chaîne des Puys: courbes de niveau OpenStreetMap
//! refermées en polygones, sommets gravis ou non, contour du département.
//!
//! ## Usage CLI
//!
//! ```bash
//! puys-map contours.osm.bz2 puys.csv puy-de-dome.poly index.html
//! puys-map contours.osm puys.csv dep.poly out/index.html -m 8 --focus-distance 60
//! puys-map contours.osm puys.csv dep.poly index.html --config puys.json --report report.json
//! ```

pub mod cli;
pub mod config;
pub mod render;
pub mod report;

pub use config::Config;
pub use report::RenderReport;
