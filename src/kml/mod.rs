//! KML polygon ingestion.
//!
//! Thin input glue: extracts the outer boundary ring of the first
//! polygon in a KML document and hands the planner a validated
//! [`Polygon`]. KML stores tuples as `lon,lat[,alt]` separated by
//! whitespace; elevation is ignored and the ring's explicit closing
//! vertex is dropped (the planner treats rings as implicitly closed).

use crate::geometry::{Coordinate, Polygon};
use crate::{Error, Result};
use log::debug;
use std::path::Path;

/// Closing-vertex detection threshold, in degrees.
const CLOSING_EPSILON_DEG: f64 = 1e-9;

/// Parse a KML document and extract the survey polygon.
pub fn parse_kml(text: &str) -> Result<Polygon> {
    let doc = roxmltree::Document::parse(text)
        .map_err(|e| Error::Kml(format!("malformed document: {}", e)))?;

    // Prefer the polygon's outer ring; fall back to any coordinates
    // element (namespace-agnostic either way).
    let coordinates = doc
        .descendants()
        .filter(|n| n.tag_name().name() == "coordinates")
        .find(|n| {
            n.ancestors().any(|a| {
                let name = a.tag_name().name();
                name == "outerBoundaryIs" || name == "exterior"
            })
        })
        .or_else(|| {
            doc.descendants()
                .find(|n| n.tag_name().name() == "coordinates")
        })
        .ok_or_else(|| Error::Kml("no coordinates element found".to_string()))?;

    let body = coordinates.text().unwrap_or_default();
    let mut vertices = Vec::new();
    for tuple in body.split_whitespace() {
        let mut parts = tuple.split(',');
        let lon = parts
            .next()
            .and_then(|s| s.trim().parse::<f64>().ok())
            .ok_or_else(|| Error::Kml(format!("bad coordinate tuple '{}'", tuple)))?;
        let lat = parts
            .next()
            .and_then(|s| s.trim().parse::<f64>().ok())
            .ok_or_else(|| Error::Kml(format!("bad coordinate tuple '{}'", tuple)))?;
        vertices.push(Coordinate::new(lat, lon));
    }

    // Drop the explicit closing vertex if present.
    if vertices.len() > 1 {
        let (first, last) = (vertices[0], vertices[vertices.len() - 1]);
        if first.approx_eq(&last, CLOSING_EPSILON_DEG) {
            vertices.pop();
        }
    }

    if vertices.len() < 3 {
        return Err(Error::Kml(format!(
            "need at least 3 boundary points, got {}",
            vertices.len()
        )));
    }

    debug!("parsed {} boundary points from KML", vertices.len());
    Polygon::new(vertices)
}

/// Parse a KML file from disk.
pub fn parse_kml_file(path: impl AsRef<Path>) -> Result<Polygon> {
    let text = std::fs::read_to_string(path)?;
    parse_kml(&text)
}
