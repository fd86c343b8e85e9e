//! Survey polygon type.

use super::{Coordinate, LocalFrame};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Distinctness threshold for polygon vertices, in degrees (~0.1 mm).
const DISTINCT_EPSILON_DEG: f64 = 1e-9;

/// Latitude/longitude bounding box of a polygon.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GeoBounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl GeoBounds {
    /// Center of the bounding box.
    pub fn center(&self) -> Coordinate {
        Coordinate::new(
            (self.min_lat + self.max_lat) / 2.0,
            (self.min_lon + self.max_lon) / 2.0,
        )
    }

    /// Diagonal length of the box in meters.
    pub fn diagonal_m(&self) -> f64 {
        Coordinate::new(self.min_lat, self.min_lon)
            .distance_m(&Coordinate::new(self.max_lat, self.max_lon))
    }
}

/// A closed survey boundary: an ordered ring of ≥3 distinct vertices.
///
/// The ring is implicitly closed (the last edge connects back to the
/// first vertex); the closing vertex is never stored. Deep validity
/// (simplicity, no self-intersections) is the ingestion collaborator's
/// responsibility; construction only enforces the vertex-count and
/// distinctness contract.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    vertices: Vec<Coordinate>,
}

impl Polygon {
    /// Create a polygon from a vertex ring.
    ///
    /// Fails with [`Error::InvalidPolygon`] if fewer than 3 pairwise
    /// distinct vertices are supplied.
    pub fn new(vertices: Vec<Coordinate>) -> Result<Self> {
        if vertices.len() < 3 {
            return Err(Error::InvalidPolygon(format!(
                "need at least 3 vertices, got {}",
                vertices.len()
            )));
        }

        let mut distinct = 0usize;
        for (i, v) in vertices.iter().enumerate() {
            let duplicate = vertices[..i]
                .iter()
                .any(|u| u.approx_eq(v, DISTINCT_EPSILON_DEG));
            if !duplicate {
                distinct += 1;
            }
        }
        if distinct < 3 {
            return Err(Error::InvalidPolygon(format!(
                "need at least 3 distinct vertices, got {}",
                distinct
            )));
        }

        Ok(Self { vertices })
    }

    /// The vertex ring.
    #[inline]
    pub fn vertices(&self) -> &[Coordinate] {
        &self.vertices
    }

    /// Number of vertices (closing vertex not counted).
    #[inline]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// A polygon is never empty by construction; provided for symmetry.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Iterate the ring's edges as (start, end) vertex pairs, including
    /// the closing edge.
    pub fn edges(&self) -> impl Iterator<Item = (Coordinate, Coordinate)> + '_ {
        let n = self.vertices.len();
        (0..n).map(move |i| (self.vertices[i], self.vertices[(i + 1) % n]))
    }

    /// Vertex centroid (arithmetic mean of the ring).
    ///
    /// The local-frame mapping is affine, so the mean of the vertices in
    /// degrees coincides with the mean taken in a flattened metric frame.
    pub fn centroid(&self) -> Coordinate {
        let n = self.vertices.len() as f64;
        let (lat, lon) = self
            .vertices
            .iter()
            .fold((0.0, 0.0), |(lat, lon), v| (lat + v.lat, lon + v.lon));
        Coordinate::new(lat / n, lon / n)
    }

    /// Latitude/longitude bounding box.
    pub fn bounds(&self) -> GeoBounds {
        let mut b = GeoBounds {
            min_lat: f64::INFINITY,
            max_lat: f64::NEG_INFINITY,
            min_lon: f64::INFINITY,
            max_lon: f64::NEG_INFINITY,
        };
        for v in &self.vertices {
            b.min_lat = b.min_lat.min(v.lat);
            b.max_lat = b.max_lat.max(v.lat);
            b.min_lon = b.min_lon.min(v.lon);
            b.max_lon = b.max_lon.max(v.lon);
        }
        b
    }

    /// Signed shoelace area in square meters, computed in the local
    /// metric frame at the centroid. Positive for counter-clockwise
    /// winding (east/north axes).
    pub fn signed_area_m2(&self) -> f64 {
        let frame = LocalFrame::new(self.centroid());
        let local: Vec<_> = self.vertices.iter().map(|v| frame.to_local(v)).collect();
        let n = local.len();
        let mut sum = 0.0;
        for i in 0..n {
            let a = local[i];
            let b = local[(i + 1) % n];
            sum += a.cross(&b);
        }
        sum / 2.0
    }

    /// Unsigned area in square meters.
    #[inline]
    pub fn area_m2(&self) -> f64 {
        self.signed_area_m2().abs()
    }

    /// Ring perimeter in meters (haversine edge lengths).
    pub fn perimeter_m(&self) -> f64 {
        self.edges().map(|(a, b)| a.distance_m(&b)).sum()
    }
}
