//! Parallel scan-line generation with polygon-intersection clipping.
//!
//! Given a scan bearing and a line spacing, this stage sweeps a family
//! of parallel lines across the polygon's perpendicular extent and
//! clips each line against the boundary, producing entry/exit segments.
//!
//! # Algorithm
//!
//! 1. Project the polygon into the centroid-anchored local metric frame
//! 2. Sweep perpendicular offsets from one boundary line to the other
//!    in spacing increments
//! 3. Intersect each infinite scan line with every polygon edge,
//!    dedupe, sort along the line and pair consecutive points
//! 4. Return all segments in increasing-offset order
//!
//! Lines that graze or miss the polygon (fewer than two intersections)
//! simply produce no segment. A non-convex boundary yields multiple
//! segments on one line; all are preserved as legitimate scan passes.
//! The increasing-offset ordering is load-bearing for the alternating
//! traversal built downstream.

use crate::geometry::{Coordinate, LocalFrame, LocalPoint, Polygon};
use crate::{Error, Result};
use log::debug;
use rayon::prelude::*;

/// Tolerance when deciding whether the sweep reaches the far boundary
/// line, in meters.
const SWEEP_EPSILON_M: f64 = 1e-6;

/// Two intersection points closer than this along the line are treated
/// as one (a vertex crossing), in meters.
const DUPLICATE_EPSILON_M: f64 = 1e-3;

/// A scan-line segment clipped to the polygon interior.
#[derive(Clone, Copy, Debug)]
pub struct ClippedSegment {
    /// Perpendicular offset from the first scan line, in meters.
    pub offset_m: f64,
    /// Entry point (first along the scan direction).
    pub start: Coordinate,
    /// Exit point (second along the scan direction).
    pub end: Coordinate,
}

impl ClippedSegment {
    /// Segment length in meters.
    pub fn length_m(&self) -> f64 {
        self.start.distance_m(&self.end)
    }
}

/// Generate clipped scan-line segments covering `polygon`.
///
/// Fails with [`Error::NoCoverageGenerated`] when the spacing exceeds
/// the polygon's perpendicular extent or every line misses the
/// boundary.
pub fn generate_scan_lines(
    polygon: &Polygon,
    bearing_deg: f64,
    spacing_m: f64,
) -> Result<Vec<ClippedSegment>> {
    let frame = LocalFrame::new(polygon.centroid());
    let local: Vec<LocalPoint> = polygon
        .vertices()
        .iter()
        .map(|v| frame.to_local(v))
        .collect();

    let theta = bearing_deg.to_radians();
    let (sin_t, cos_t) = theta.sin_cos();
    // Unit vector along the scan direction and its perpendicular
    // (perpendicular bearing = scan bearing + 90°).
    let dir = LocalPoint::new(sin_t, cos_t);
    let perp = LocalPoint::new(cos_t, -sin_t);

    let offsets: Vec<f64> = local.iter().map(|p| p.dot(&perp)).collect();
    let min_off = offsets.iter().copied().fold(f64::INFINITY, f64::min);
    let max_off = offsets.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let extent = max_off - min_off;

    if extent < spacing_m {
        return Err(Error::NoCoverageGenerated(format!(
            "spacing {:.1} m exceeds the polygon's {:.1} m perpendicular extent",
            spacing_m, extent
        )));
    }

    let mut line_offsets = Vec::new();
    let mut off = min_off;
    while off <= max_off + SWEEP_EPSILON_M {
        line_offsets.push(off);
        off += spacing_m;
    }

    // Per-line clipping is independent; rayon keeps the map in input
    // order, so the increasing-offset ordering survives.
    let segments: Vec<ClippedSegment> = line_offsets
        .par_iter()
        .map(|&off| clip_line(&local, &frame, dir, perp, off, min_off))
        .collect::<Vec<_>>()
        .into_iter()
        .flatten()
        .collect();

    if segments.is_empty() {
        return Err(Error::NoCoverageGenerated(
            "every scan line misses the polygon".to_string(),
        ));
    }

    debug!(
        "{} scan lines over {:.1} m extent, {} segments",
        line_offsets.len(),
        extent,
        segments.len()
    );

    Ok(segments)
}

/// Clip one infinite scan line at perpendicular offset `off` against
/// the polygon edges.
fn clip_line(
    local: &[LocalPoint],
    frame: &LocalFrame,
    dir: LocalPoint,
    perp: LocalPoint,
    off: f64,
    min_off: f64,
) -> Vec<ClippedSegment> {
    let base = LocalPoint::new(perp.x * off, perp.y * off);
    let n = local.len();

    // Parametric positions along the line of every boundary crossing.
    let mut crossings: Vec<f64> = Vec::new();
    for i in 0..n {
        let a = local[i];
        let b = local[(i + 1) % n];
        let edge = LocalPoint::new(b.x - a.x, b.y - a.y);

        let denom = dir.cross(&edge);
        if denom.abs() < 1e-12 {
            // Edge parallel to the scan direction.
            continue;
        }

        let w = LocalPoint::new(a.x - base.x, a.y - base.y);
        let u = w.cross(&dir) / denom;
        if !(0.0..=1.0).contains(&u) {
            continue;
        }
        crossings.push(w.cross(&edge) / denom);
    }

    crossings.sort_by(f64::total_cmp);
    crossings.dedup_by(|a, b| (*a - *b).abs() < DUPLICATE_EPSILON_M);

    if crossings.len() < 2 {
        // Line grazes or misses the polygon; not an error.
        return Vec::new();
    }

    crossings
        .chunks_exact(2)
        .map(|pair| {
            let at = |t: f64| {
                frame.to_geo(&LocalPoint::new(base.x + t * dir.x, base.y + t * dir.y))
            };
            ClippedSegment {
                offset_m: off - min_off,
                start: at(pair[0]),
                end: at(pair[1]),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Polygon {
        Polygon::new(vec![
            Coordinate::new(0.0, 0.0),
            Coordinate::new(0.0, 0.001),
            Coordinate::new(0.001, 0.001),
            Coordinate::new(0.001, 0.0),
        ])
        .unwrap()
    }

    /// U-shaped polygon opening north: two arms around a notch.
    fn u_shape() -> Polygon {
        Polygon::new(vec![
            Coordinate::new(0.0, 0.0),
            Coordinate::new(0.0, 0.002),
            Coordinate::new(0.002, 0.002),
            Coordinate::new(0.002, 0.0015),
            Coordinate::new(0.0005, 0.0015),
            Coordinate::new(0.0005, 0.0005),
            Coordinate::new(0.002, 0.0005),
            Coordinate::new(0.002, 0.0),
        ])
        .unwrap()
    }

    #[test]
    fn test_square_full_span_lines() {
        // ~111 m square, north/south lines every 50 m: sweep hits
        // offsets 0, 50 and 100.
        let segments = generate_scan_lines(&square(), 0.0, 50.0).unwrap();
        assert_eq!(segments.len(), 3);
        for segment in &segments {
            assert!(
                (segment.length_m() - 111.0).abs() < 1.0,
                "got {}",
                segment.length_m()
            );
        }
    }

    #[test]
    fn test_lines_ordered_by_offset() {
        let segments = generate_scan_lines(&square(), 0.0, 30.0).unwrap();
        for pair in segments.windows(2) {
            assert!(pair[0].offset_m <= pair[1].offset_m + 1e-9);
        }
        assert!(segments[0].offset_m.abs() < 1e-9);
    }

    #[test]
    fn test_spacing_between_adjacent_lines() {
        let segments = generate_scan_lines(&square(), 0.0, 40.0).unwrap();
        for pair in segments.windows(2) {
            assert!((pair[1].offset_m - pair[0].offset_m - 40.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_spacing_larger_than_extent_is_no_coverage() {
        let r = generate_scan_lines(&square(), 0.0, 200.0);
        assert!(matches!(r, Err(Error::NoCoverageGenerated(_))));
    }

    #[test]
    fn test_concave_polygon_yields_multiple_segments_per_line() {
        // East/west lines across the U: the middle line crosses both
        // arms, producing two segments at the same offset.
        let segments = generate_scan_lines(&u_shape(), 90.0, 111.0).unwrap();
        let mid_offset = 111.0;
        let mid: Vec<_> = segments
            .iter()
            .filter(|s| (s.offset_m - mid_offset).abs() < 1.0)
            .collect();
        assert_eq!(mid.len(), 2, "expected two arm crossings");
        for segment in mid {
            assert!((segment.length_m() - 55.5).abs() < 2.0);
        }
    }

    #[test]
    fn test_grazing_lines_are_discarded() {
        // Diamond: boundary-offset lines pass through single vertices
        // and are dropped; only the middle diagonal survives.
        let diamond = Polygon::new(vec![
            Coordinate::new(0.001, 0.0),
            Coordinate::new(0.002, 0.001),
            Coordinate::new(0.001, 0.002),
            Coordinate::new(0.0, 0.001),
        ])
        .unwrap();
        let segments = generate_scan_lines(&diamond, 0.0, 111.0).unwrap();
        assert_eq!(segments.len(), 1);
        assert!((segments[0].length_m() - 222.0).abs() < 2.0);
    }

    #[test]
    fn test_segment_endpoints_ordered_along_direction() {
        // Scanning north, every entry point sits south of its exit.
        let segments = generate_scan_lines(&square(), 0.0, 50.0).unwrap();
        for segment in &segments {
            assert!(segment.start.lat < segment.end.lat);
        }
    }
}
