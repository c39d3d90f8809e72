//! Parsers des trois formats d'entrée
//!
//! - `osm`: courbes de niveau (OSM XML)
//! - `csv`: liste des puys
//! - `poly`: contour du département (Osmosis POLY)

pub mod csv;
pub mod osm;
pub mod poly;
