//! Polygon side analysis: edge metrics, scan-direction selection and
//! corner labeling.
//!
//! The scan bearing defaults to the direction of the polygon's longest
//! side, which minimizes the number of turns for elongated survey areas
//! (the "trapezoid" optimization). Fixed vertical/horizontal patterns
//! bypass the geometry and force the axis. The four extremal vertices
//! relative to the scan axis are labeled as corners; the home optimizer
//! uses them to bias which end of the pattern is flown first.

use crate::config::ScanPattern;
use crate::geometry::{fold_bearing_deg, Coordinate, LocalFrame, Polygon};
use log::debug;

/// Projection-distance tie threshold for corner labeling, in m².
const CORNER_TIE_EPSILON_M2: f64 = 1e-6;

/// A polygon edge with derived metrics.
#[derive(Clone, Copy, Debug)]
pub struct Edge {
    /// Edge start vertex.
    pub start: Coordinate,
    /// Edge end vertex.
    pub end: Coordinate,
    /// Haversine length in meters.
    pub length_m: f64,
    /// Bearing from start to end, degrees in [0, 360).
    pub bearing_deg: f64,
}

/// Corner labels relative to the scan axis.
///
/// "Top" is the far extreme along the scan direction, "right" the far
/// extreme along its perpendicular; for a north scan axis these reduce
/// to the geographic bounding-box corners.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CornerLabel {
    TopRight,
    TopLeft,
    BottomLeft,
    BottomRight,
}

impl CornerLabel {
    /// All labels in a fixed order.
    pub const ALL: [CornerLabel; 4] = [
        CornerLabel::TopRight,
        CornerLabel::TopLeft,
        CornerLabel::BottomLeft,
        CornerLabel::BottomRight,
    ];

    /// Lower-case name used in reports.
    pub fn name(&self) -> &'static str {
        match self {
            CornerLabel::TopRight => "top_right",
            CornerLabel::TopLeft => "top_left",
            CornerLabel::BottomLeft => "bottom_left",
            CornerLabel::BottomRight => "bottom_right",
        }
    }
}

/// The four labeled extremal vertices of a polygon.
#[derive(Clone, Copy, Debug)]
pub struct Corners {
    pub top_right: Coordinate,
    pub top_left: Coordinate,
    pub bottom_left: Coordinate,
    pub bottom_right: Coordinate,
}

impl Corners {
    /// Vertex carrying the given label.
    pub fn get(&self, label: CornerLabel) -> Coordinate {
        match label {
            CornerLabel::TopRight => self.top_right,
            CornerLabel::TopLeft => self.top_left,
            CornerLabel::BottomLeft => self.bottom_left,
            CornerLabel::BottomRight => self.bottom_right,
        }
    }

    /// The labeled corner nearest to `point`.
    pub fn nearest_to(&self, point: &Coordinate) -> (CornerLabel, Coordinate) {
        let mut best = (CornerLabel::TopRight, self.top_right);
        for &label in &CornerLabel::ALL[1..] {
            let corner = self.get(label);
            if point.distance_m(&corner) < point.distance_m(&best.1) {
                best = (label, corner);
            }
        }
        best
    }
}

/// Result of side analysis.
#[derive(Clone, Debug)]
pub struct SideAnalysis {
    /// Per-edge metrics in ring order.
    pub edges: Vec<Edge>,
    /// Index of the longest edge.
    pub longest_edge: usize,
    /// Selected scan bearing, degrees in [0, 180).
    pub scan_bearing_deg: f64,
    /// Extremal vertices labeled relative to the scan axis.
    pub corners: Corners,
}

/// Analyze polygon sides and select the scan direction for `pattern`.
pub fn analyze_sides(polygon: &Polygon, pattern: ScanPattern) -> SideAnalysis {
    let edges: Vec<Edge> = polygon
        .edges()
        .map(|(start, end)| Edge {
            start,
            end,
            length_m: start.distance_m(&end),
            bearing_deg: start.bearing_to(&end),
        })
        .collect();

    let longest_edge = edges
        .iter()
        .enumerate()
        .max_by(|(_, a), (_, b)| a.length_m.total_cmp(&b.length_m))
        .map(|(i, _)| i)
        .unwrap_or(0);

    let scan_bearing_deg = match pattern.fixed_bearing_deg() {
        Some(fixed) => fixed,
        None => fold_bearing_deg(edges[longest_edge].bearing_deg),
    };

    debug!(
        "longest side {} ({:.1} m, bearing {:.1}°), scan bearing {:.1}°",
        longest_edge, edges[longest_edge].length_m, edges[longest_edge].bearing_deg,
        scan_bearing_deg
    );

    let corners = label_corners(polygon, scan_bearing_deg);

    SideAnalysis {
        edges,
        longest_edge,
        scan_bearing_deg,
        corners,
    }
}

/// Label the four extremal vertices relative to the scan axis.
///
/// Every vertex is projected onto the scan axis (along, positive toward
/// "top") and its perpendicular (positive toward "right"); each corner
/// label goes to the vertex nearest the matching corner of the
/// projected bounding box. Projection ties prefer the vertex closer to
/// the centroid, keeping the choice stable under vertex reordering.
fn label_corners(polygon: &Polygon, scan_bearing_deg: f64) -> Corners {
    let frame = LocalFrame::new(polygon.centroid());
    let theta = scan_bearing_deg.to_radians();
    let (sin_t, cos_t) = theta.sin_cos();

    // (along, perp, origin distance) per vertex.
    let projected: Vec<(f64, f64, f64)> = polygon
        .vertices()
        .iter()
        .map(|v| {
            let p = frame.to_local(v);
            (
                p.x * sin_t + p.y * cos_t,
                p.x * cos_t - p.y * sin_t,
                p.norm(),
            )
        })
        .collect();

    let along_min = projected.iter().map(|p| p.0).fold(f64::INFINITY, f64::min);
    let along_max = projected
        .iter()
        .map(|p| p.0)
        .fold(f64::NEG_INFINITY, f64::max);
    let perp_min = projected.iter().map(|p| p.1).fold(f64::INFINITY, f64::min);
    let perp_max = projected
        .iter()
        .map(|p| p.1)
        .fold(f64::NEG_INFINITY, f64::max);

    let nearest = |target_along: f64, target_perp: f64| -> Coordinate {
        let mut best = 0usize;
        let mut best_d2 = f64::INFINITY;
        for (i, &(along, perp, origin_dist)) in projected.iter().enumerate() {
            let d2 = (along - target_along).powi(2) + (perp - target_perp).powi(2);
            if d2 < best_d2 - CORNER_TIE_EPSILON_M2 {
                best = i;
                best_d2 = d2;
            } else if (d2 - best_d2).abs() <= CORNER_TIE_EPSILON_M2
                && origin_dist < projected[best].2
            {
                best = i;
            }
        }
        polygon.vertices()[best]
    };

    Corners {
        top_right: nearest(along_max, perp_max),
        top_left: nearest(along_max, perp_min),
        bottom_left: nearest(along_min, perp_min),
        bottom_right: nearest(along_min, perp_max),
    }
}
