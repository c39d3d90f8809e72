//! Parser pour les fichiers OSM XML (courbes de niveau)

use std::collections::HashMap;

use geo::{Coord, Rect};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use tracing::debug;

use crate::types::{ContourSet, Polyline};
use crate::PuysError;

/// Way en cours de lecture
struct WayBuilder {
    id: String,
    line: usize,
    refs: Vec<String>,
    ele: Option<String>,
}

/// Parse un document OSM et retourne les ways portant un tag `ele`
pub fn parse(content: &str, file: &str) -> Result<ContourSet, PuysError> {
    let mut reader = Reader::from_str(content);

    let mut nodes: HashMap<String, Coord> = HashMap::new();
    let mut ways = Vec::new();
    let mut current: Option<WayBuilder> = None;
    let mut skipped = 0usize;
    let mut extent: Option<(Coord, Coord)> = None;

    let mut lines = LineCounter::new();

    loop {
        let event = match reader.read_event() {
            Ok(event) => event,
            Err(e) => {
                let line = lines.advance(content, reader.buffer_position());
                return Err(PuysError::parse_error(
                    file,
                    line,
                    format!("invalid XML: {}", e),
                ));
            }
        };
        let line = lines.advance(content, reader.buffer_position());

        match event {
            Event::Start(ref e) | Event::Empty(ref e) => {
                let self_closing = matches!(event, Event::Empty(_));
                match e.name().as_ref() {
                    b"node" => {
                        let attrs = attributes(e, file, line)?;
                        if attrs.get("action").map(String::as_str) == Some("delete") {
                            continue;
                        }
                        let id = required(&attrs, "id", "node", file, line)?;
                        let lat = coordinate(&attrs, "lat", file, line)?;
                        let lon = coordinate(&attrs, "lon", file, line)?;
                        let coord = Coord { x: lon, y: lat };
                        extent = Some(match extent {
                            None => (coord, coord),
                            Some((min, max)) => (
                                Coord {
                                    x: min.x.min(coord.x),
                                    y: min.y.min(coord.y),
                                },
                                Coord {
                                    x: max.x.max(coord.x),
                                    y: max.y.max(coord.y),
                                },
                            ),
                        });
                        nodes.insert(id, coord);
                    }
                    b"way" => {
                        let attrs = attributes(e, file, line)?;
                        let id = required(&attrs, "id", "way", file, line)?;
                        if self_closing {
                            // Way vide: aucun noeud, aucun tag
                            skipped += 1;
                        } else {
                            current = Some(WayBuilder {
                                id,
                                line,
                                refs: Vec::new(),
                                ele: None,
                            });
                        }
                    }
                    b"nd" => {
                        if let Some(way) = current.as_mut() {
                            let attrs = attributes(e, file, line)?;
                            way.refs.push(required(&attrs, "ref", "nd", file, line)?);
                        }
                    }
                    b"tag" => {
                        if let Some(way) = current.as_mut() {
                            let attrs = attributes(e, file, line)?;
                            if attrs.get("k").map(String::as_str) == Some("ele") {
                                way.ele = Some(required(&attrs, "v", "tag", file, line)?);
                            }
                        }
                    }
                    _ => {}
                }
            }
            Event::End(ref e) if e.name().as_ref() == b"way" => {
                if let Some(way) = current.take() {
                    match build_way(way, &nodes, file)? {
                        Some(polyline) => ways.push(polyline),
                        None => skipped += 1,
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    let Some((min, max)) = extent else {
        return Err(PuysError::Empty(format!("{}: no node", file)));
    };
    if ways.is_empty() {
        return Err(PuysError::Empty(format!("{}: no way tagged with ele", file)));
    }

    debug!(
        file = file,
        nodes = nodes.len(),
        ways = ways.len(),
        skipped = skipped,
        "OSM parsed"
    );

    Ok(ContourSet {
        ways,
        bounds: Rect::new(min, max),
    })
}

/// Résout les références d'une way; `None` si ce n'est pas une courbe de niveau
fn build_way(
    way: WayBuilder,
    nodes: &HashMap<String, Coord>,
    file: &str,
) -> Result<Option<Polyline>, PuysError> {
    let Some(ele) = way.ele else {
        debug!(way = %way.id, "Way without ele tag ignored");
        return Ok(None);
    };

    let elevation = fast_float::parse::<f64, _>(ele.trim())
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| {
            PuysError::parse_error(
                file,
                way.line,
                format!("way {}: invalid ele value '{}'", way.id, ele),
            )
        })?;

    let mut coords = Vec::with_capacity(way.refs.len());
    for node_ref in &way.refs {
        let coord = nodes.get(node_ref).ok_or_else(|| {
            PuysError::parse_error(
                file,
                way.line,
                format!("way {}: unknown node ref {}", way.id, node_ref),
            )
        })?;
        coords.push(*coord);
    }

    if coords.len() < 2 {
        return Err(PuysError::parse_error(
            file,
            way.line,
            format!("way {}: needs at least 2 nodes, got {}", way.id, coords.len()),
        ));
    }

    Ok(Some(Polyline::new(elevation.round() as i32, coords)))
}

/// Collecte les attributs d'un élément
fn attributes(
    element: &BytesStart,
    file: &str,
    line: usize,
) -> Result<HashMap<String, String>, PuysError> {
    let mut map = HashMap::new();
    for attr in element.attributes() {
        let attr = attr.map_err(|e| {
            PuysError::parse_error(file, line, format!("invalid attribute: {}", e))
        })?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).to_string();
        let value = attr
            .unescape_value()
            .map_err(|e| PuysError::parse_error(file, line, format!("invalid value: {}", e)))?
            .into_owned();
        map.insert(key, value);
    }
    Ok(map)
}

fn required(
    attrs: &HashMap<String, String>,
    key: &str,
    element: &str,
    file: &str,
    line: usize,
) -> Result<String, PuysError> {
    attrs.get(key).cloned().ok_or_else(|| {
        PuysError::parse_error(file, line, format!("<{}> without '{}' attribute", element, key))
    })
}

fn coordinate(
    attrs: &HashMap<String, String>,
    key: &str,
    file: &str,
    line: usize,
) -> Result<f64, PuysError> {
    let raw = required(attrs, key, "node", file, line)?;
    fast_float::parse::<f64, _>(raw.trim())
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| PuysError::parse_error(file, line, format!("invalid {} '{}'", key, raw)))
}

/// Compteur de lignes incrémental
///
/// Les positions du lecteur ne font qu'avancer: seuls les octets lus depuis
/// le dernier appel sont parcourus.
struct LineCounter {
    offset: usize,
    line: usize,
}

impl LineCounter {
    fn new() -> Self {
        Self { offset: 0, line: 1 }
    }

    /// Numéro de ligne (1-based) à la position donnée, en octets
    fn advance(&mut self, content: &str, position: usize) -> usize {
        let end = position.min(content.len());
        if end > self.offset {
            self.line += memchr::memchr_iter(b'\n', &content.as_bytes()[self.offset..end]).count();
            self.offset = end;
        }
        self.line
    }
}
