//! Inward polygon buffering (fence padding).
//!
//! The flight path must keep a safety margin from the true survey
//! boundary. The buffer moves every vertex toward the polygon centroid
//! by the padding distance, preserving vertex count and winding. A
//! padding large enough to collapse the polygon is a fatal
//! [`Error::PaddingExceedsGeometry`] so the caller surfaces "no
//! waypoints generated" instead of flying a corrupted path.

use crate::geometry::{meters_to_degrees_lat, meters_to_degrees_lon, LocalFrame, Polygon};
use crate::{Error, Result};

/// Minimum surviving area in square meters before the buffered polygon
/// is treated as collapsed.
const MIN_BUFFERED_AREA_M2: f64 = 1e-6;

/// Shrink `polygon` inward by `padding_m` meters.
///
/// Each vertex moves toward the centroid along the vertex-to-centroid
/// direction measured in the local metric frame; the metric offset is
/// converted back to degrees at the vertex's own latitude. The result
/// has the same vertex count and winding as the input.
pub fn buffer_inward(polygon: &Polygon, padding_m: f64) -> Result<Polygon> {
    if padding_m == 0.0 {
        return Ok(polygon.clone());
    }

    let frame = LocalFrame::new(polygon.centroid());
    let mut buffered = Vec::with_capacity(polygon.len());

    for vertex in polygon.vertices() {
        let local = frame.to_local(vertex);
        let dist = local.norm();
        if padding_m >= dist {
            return Err(Error::PaddingExceedsGeometry(format!(
                "padding {:.1} m reaches the centroid ({:.1} m away from vertex {})",
                padding_m, dist, vertex
            )));
        }

        // Unit direction from the vertex toward the centroid, scaled to
        // the padding distance.
        let step = padding_m / dist;
        let east_m = -local.x * step;
        let north_m = -local.y * step;

        buffered.push(crate::geometry::Coordinate::new(
            vertex.lat + meters_to_degrees_lat(north_m),
            vertex.lon + meters_to_degrees_lon(east_m, vertex.lat),
        ));
    }

    let result = Polygon::new(buffered).map_err(|_| {
        Error::PaddingExceedsGeometry(format!(
            "padding {:.1} m collapses the polygon to fewer than 3 distinct vertices",
            padding_m
        ))
    })?;

    // The shrink must not invert the ring or flatten it to nothing.
    let original_area = polygon.signed_area_m2();
    let buffered_area = result.signed_area_m2();
    if buffered_area.abs() < MIN_BUFFERED_AREA_M2
        || buffered_area.signum() != original_area.signum()
    {
        return Err(Error::PaddingExceedsGeometry(format!(
            "padding {:.1} m leaves no survey area",
            padding_m
        )));
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Coordinate;

    fn square_deg(size_deg: f64) -> Polygon {
        Polygon::new(vec![
            Coordinate::new(0.0, 0.0),
            Coordinate::new(0.0, size_deg),
            Coordinate::new(size_deg, size_deg),
            Coordinate::new(size_deg, 0.0),
        ])
        .unwrap()
    }

    /// Distance from a point to the nearest original edge, in meters.
    fn distance_to_nearest_edge_m(polygon: &Polygon, point: &Coordinate) -> f64 {
        let frame = LocalFrame::new(polygon.centroid());
        let p = frame.to_local(point);
        let mut best = f64::INFINITY;
        for (a, b) in polygon.edges() {
            let a = frame.to_local(&a);
            let b = frame.to_local(&b);
            let e = crate::geometry::LocalPoint::new(b.x - a.x, b.y - a.y);
            let w = crate::geometry::LocalPoint::new(p.x - a.x, p.y - a.y);
            let t = (w.dot(&e) / e.dot(&e)).clamp(0.0, 1.0);
            let dx = w.x - t * e.x;
            let dy = w.y - t * e.y;
            best = best.min((dx * dx + dy * dy).sqrt());
        }
        best
    }

    #[test]
    fn test_zero_padding_is_identity() {
        let square = square_deg(0.001);
        let buffered = buffer_inward(&square, 0.0).unwrap();
        assert_eq!(buffered, square);
    }

    #[test]
    fn test_buffered_polygon_is_strictly_inside() {
        // ~111 m square with a 5 m margin. Corner vertices travel along
        // the diagonal, so their clearance from the adjacent edges is
        // padding/√2; every vertex must keep at least that much.
        let square = square_deg(0.001);
        let buffered = buffer_inward(&square, 5.0).unwrap();

        assert_eq!(buffered.len(), square.len());
        let min_clearance = 5.0 / std::f64::consts::SQRT_2;
        for v in buffered.vertices() {
            let d = distance_to_nearest_edge_m(&square, v);
            assert!(
                d >= min_clearance - 0.2,
                "vertex {} only {:.2} m inside",
                v,
                d
            );
        }
        assert!(buffered.area_m2() < square.area_m2());
    }

    #[test]
    fn test_winding_preserved() {
        let square = square_deg(0.001);
        let buffered = buffer_inward(&square, 3.0).unwrap();
        assert_eq!(
            buffered.signed_area_m2().signum(),
            square.signed_area_m2().signum()
        );
    }

    #[test]
    fn test_padding_too_large_is_fatal() {
        // Half-diagonal of the ~111 m square is ~78 m; 100 m cannot fit.
        let square = square_deg(0.001);
        let r = buffer_inward(&square, 100.0);
        assert!(matches!(r, Err(Error::PaddingExceedsGeometry(_))));
    }
}
