//! Parser pour le fichier CSV des puys

use geo::Coord;
use serde::Deserialize;
use tracing::debug;

use crate::types::Summit;
use crate::PuysError;

/// Ligne brute du CSV; les champs numériques sont convertis ensuite pour
/// produire des messages d'erreur précis
#[derive(Debug, Deserialize)]
struct SummitRecord {
    #[serde(default, alias = "name")]
    label: Option<String>,
    #[serde(default)]
    lat: Option<String>,
    #[serde(default)]
    lon: Option<String>,
    #[serde(default, alias = "ele")]
    elevation: Option<String>,
    #[serde(default)]
    visited: Option<String>,
}

/// Parse le contenu CSV (avec ligne d'en-tête) en liste de sommets
pub fn parse(content: &str, file: &str) -> Result<Vec<Summit>, PuysError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| PuysError::parse_error(file, 1, format!("invalid header: {}", e)))?
        .clone();

    let mut summits = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| {
            let line = e.position().map(|p| p.line() as usize).unwrap_or(0);
            PuysError::parse_error(file, line, e.to_string())
        })?;
        let line = record.position().map(|p| p.line() as usize).unwrap_or(0);

        let raw: SummitRecord = record
            .deserialize(Some(&headers))
            .map_err(|e| PuysError::parse_error(file, line, e.to_string()))?;

        summits.push(build_summit(raw, file, line)?);
    }

    if summits.is_empty() {
        return Err(PuysError::Empty(format!("{}: no summit row", file)));
    }

    debug!(
        file = file,
        summits = summits.len(),
        visited = summits.iter().filter(|s| s.visited).count(),
        "CSV parsed"
    );

    Ok(summits)
}

fn build_summit(raw: SummitRecord, file: &str, line: usize) -> Result<Summit, PuysError> {
    let lat = required_number(raw.lat.as_deref(), "lat", file, line)?;
    let lon = required_number(raw.lon.as_deref(), "lon", file, line)?;

    if !(-90.0..=90.0).contains(&lat) {
        return Err(PuysError::parse_error(
            file,
            line,
            format!("lat out of range: {}", lat),
        ));
    }

    let elevation = match non_empty(raw.elevation.as_deref()) {
        None => None,
        Some(value) => Some(parse_number(value).ok_or_else(|| {
            PuysError::parse_error(file, line, format!("invalid elevation '{}'", value))
        })?),
    };

    let visited = parse_visited(raw.visited.as_deref().unwrap_or("")).ok_or_else(|| {
        PuysError::parse_error(
            file,
            line,
            format!("invalid visited flag '{}'", raw.visited.unwrap_or_default()),
        )
    })?;

    Ok(Summit {
        name: non_empty(raw.label.as_deref()).map(str::to_string),
        position: Coord { x: lon, y: lat },
        elevation,
        visited,
    })
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn parse_number(value: &str) -> Option<f64> {
    fast_float::parse::<f64, _>(value)
        .ok()
        .filter(|v| v.is_finite())
}

fn required_number(
    value: Option<&str>,
    column: &str,
    file: &str,
    line: usize,
) -> Result<f64, PuysError> {
    let value = non_empty(value)
        .ok_or_else(|| PuysError::parse_error(file, line, format!("missing {}", column)))?;
    parse_number(value)
        .ok_or_else(|| PuysError::parse_error(file, line, format!("invalid {} '{}'", column, value)))
}

/// Interprète le drapeau `visited` (vide = non visité)
fn parse_visited(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "" | "0" | "false" | "no" | "non" | "n" => Some(false),
        "1" | "true" | "yes" | "oui" | "y" | "x" => Some(true),
        other => parse_number(other).map(|v| v != 0.0),
    }
}
