//! Boustrophedon (lawnmower) traversal ordering.
//!
//! Clipped segments arrive in sweep order; this stage strings them into
//! one continuous alternating path. The first segment anchors the
//! alternation entry→exit; every subsequent segment is entered from
//! whichever endpoint is nearer the previously emitted waypoint, so the
//! transition between adjacent lines is always the short perpendicular
//! hop and never a long diagonal repositioning jump (the defining
//! correctness property of a lawnmower pattern).

use crate::geometry::Coordinate;
use crate::scanline::ClippedSegment;
use serde::{Deserialize, Serialize};

/// Traversal orientation of a waypoint sequence relative to the sweep
/// order it was generated in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    /// Scan lines visited in increasing-offset order.
    #[default]
    Forward,
    /// Scan lines visited in decreasing-offset order.
    Reversed,
}

impl Direction {
    /// The opposite orientation.
    pub fn flipped(&self) -> Direction {
        match self {
            Direction::Forward => Direction::Reversed,
            Direction::Reversed => Direction::Forward,
        }
    }
}

/// An ordered waypoint list with its traversal orientation and the scan
/// bearing that generated it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WaypointSequence {
    /// Waypoints in flight order.
    pub waypoints: Vec<Coordinate>,
    /// Scan bearing used to generate the pattern, degrees in [0, 180).
    pub bearing_deg: f64,
    /// Traversal orientation relative to the sweep order.
    pub direction: Direction,
}

impl WaypointSequence {
    /// Number of waypoints.
    #[inline]
    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    /// Whether the sequence holds no waypoints.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    /// First waypoint, if any.
    pub fn first(&self) -> Option<Coordinate> {
        self.waypoints.first().copied()
    }

    /// Last waypoint, if any.
    pub fn last(&self) -> Option<Coordinate> {
        self.waypoints.last().copied()
    }

    /// The whole pattern flown backwards. Applying this twice yields
    /// the original sequence.
    pub fn reversed(&self) -> WaypointSequence {
        let mut waypoints = self.waypoints.clone();
        waypoints.reverse();
        WaypointSequence {
            waypoints,
            bearing_deg: self.bearing_deg,
            direction: self.direction.flipped(),
        }
    }

    /// Cumulative path length over consecutive waypoints, in meters.
    pub fn total_length_m(&self) -> f64 {
        self.waypoints
            .windows(2)
            .map(|pair| pair[0].distance_m(&pair[1]))
            .sum()
    }
}

/// Order clipped segments into an alternating lawnmower traversal.
///
/// The output is the `Forward` variant; home-position adjustments
/// happen downstream.
pub fn sequence_segments(segments: &[ClippedSegment], bearing_deg: f64) -> WaypointSequence {
    let mut waypoints: Vec<Coordinate> = Vec::with_capacity(segments.len() * 2);

    for segment in segments {
        match waypoints.last() {
            None => {
                waypoints.push(segment.start);
                waypoints.push(segment.end);
            }
            Some(last) => {
                if last.distance_m(&segment.start) <= last.distance_m(&segment.end) {
                    waypoints.push(segment.start);
                    waypoints.push(segment.end);
                } else {
                    waypoints.push(segment.end);
                    waypoints.push(segment.start);
                }
            }
        }
    }

    WaypointSequence {
        waypoints,
        bearing_deg,
        direction: Direction::Forward,
    }
}
