//! Parser pour les fichiers POLY (format Osmosis)
//!
//! ```text
//! puy-de-dome
//! 1
//!    3.0 45.7
//!    ...
//! END
//! !2
//!    ...
//! END
//! END
//! ```

use geo::{Coord, LineString};
use tracing::debug;

use crate::types::{coords_equal, Boundary, PolySection};
use crate::PuysError;

/// Parse le contenu d'un fichier POLY
pub fn parse(content: &str, file: &str) -> Result<Boundary, PuysError> {
    let mut lines = content
        .lines()
        .enumerate()
        .map(|(i, l)| (i + 1, l.trim()))
        .filter(|(_, l)| !l.is_empty());

    let Some((_, title)) = lines.next() else {
        return Err(PuysError::Empty(format!("{}: empty POLY file", file)));
    };

    let mut sections = Vec::new();
    let mut finished = false;

    while let Some((line_no, name)) = lines.next() {
        if name == "END" {
            finished = true;
            break;
        }

        let section_line = line_no;
        let mut coords = Vec::new();
        let mut closed = false;

        for (line_no, line) in lines.by_ref() {
            if line == "END" {
                closed = true;
                break;
            }
            coords.push(parse_coordinate(line, file, line_no)?);
        }

        if !closed {
            return Err(PuysError::parse_error(
                file,
                section_line,
                format!("section '{}' is not terminated by END", name),
            ));
        }

        if coords.len() < 3 {
            return Err(PuysError::parse_error(
                file,
                section_line,
                format!("section '{}' needs at least 3 points, got {}", name, coords.len()),
            ));
        }

        if !coords_equal(coords[0], coords[coords.len() - 1]) {
            coords.push(coords[0]);
        }

        sections.push(PolySection {
            name: name.to_string(),
            hole: name.starts_with('!'),
            ring: LineString::new(coords),
        });
    }

    if !finished {
        debug!(file = file, "POLY file without final END");
    }

    if !sections.iter().any(|s| !s.hole) {
        return Err(PuysError::Empty(format!("{}: no outer polygon section", file)));
    }

    debug!(
        file = file,
        title = title,
        sections = sections.len(),
        "POLY parsed"
    );

    Ok(Boundary {
        title: title.to_string(),
        sections,
    })
}

/// Parse une ligne `lon lat` (séparateurs: espaces ou tabulations)
fn parse_coordinate(line: &str, file: &str, line_no: usize) -> Result<Coord, PuysError> {
    let mut parts = line.split_whitespace();
    let (Some(lon), Some(lat), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(PuysError::parse_error(
            file,
            line_no,
            format!("expected 'lon lat', got '{}'", line),
        ));
    };

    let parse = |raw: &str| {
        fast_float::parse::<f64, _>(raw)
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| {
                PuysError::parse_error(file, line_no, format!("invalid coordinate '{}'", raw))
            })
    };

    Ok(Coord {
        x: parse(lon)?,
        y: parse(lat)?,
    })
}
