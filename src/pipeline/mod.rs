//! Survey planning pipeline.
//!
//! Runs the full stage chain over a validated survey polygon:
//! configuration resolution → inward buffering → side analysis →
//! scan-line generation → lawnmower sequencing → home optimization.
//! Every stage reads its input and allocates fresh output, so a planner
//! may be shared across threads and invoked concurrently on independent
//! polygons.

use crate::buffer::buffer_inward;
use crate::config::PlanConfig;
use crate::geometry::Polygon;
use crate::home::{optimize_for_home, MissionMetrics};
use crate::scanline::generate_scan_lines;
use crate::sequence::{sequence_segments, WaypointSequence};
use crate::sides::{analyze_sides, SideAnalysis};
use crate::{Error, Result};
use log::{debug, info};

/// Minimum polygon area before the input is considered degenerate, in
/// square meters.
const MIN_POLYGON_AREA_M2: f64 = 1.0;

/// Output of a planning run.
#[derive(Clone, Debug)]
pub struct SurveyPlan {
    /// Final ordered waypoint sequence.
    pub sequence: WaypointSequence,
    /// Derived distance metrics for the mission summary.
    pub metrics: MissionMetrics,
    /// Side analysis of the padded polygon (scan bearing, corners).
    pub analysis: SideAnalysis,
    /// The padded polygon the pattern was clipped against.
    pub padded: Polygon,
    /// Effective scan-line spacing in meters.
    pub spacing_m: f64,
}

impl SurveyPlan {
    /// Number of survey waypoints.
    pub fn waypoint_count(&self) -> usize {
        self.sequence.len()
    }

    /// Number of scan lines flown (two waypoints per pass).
    pub fn line_count(&self) -> usize {
        self.sequence.len() / 2
    }
}

/// Survey path planner.
///
/// Holds the plan configuration and runs the deterministic pipeline
/// once per [`SurveyPlanner::plan`] call.
#[derive(Clone, Debug)]
pub struct SurveyPlanner {
    config: PlanConfig,
}

impl SurveyPlanner {
    /// Create a planner with the given configuration.
    pub fn new(config: PlanConfig) -> Self {
        Self { config }
    }

    /// Create a planner with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(PlanConfig::default())
    }

    /// Get the configuration.
    pub fn config(&self) -> &PlanConfig {
        &self.config
    }

    /// Plan a coverage path over `polygon`.
    ///
    /// The polygon must be a simple ring of at least 3 distinct
    /// vertices; deep validation happens at ingestion. Fails with one
    /// of the typed error kinds; never returns a partial sequence.
    pub fn plan(&self, polygon: &Polygon) -> Result<SurveyPlan> {
        self.config.validate()?;

        if polygon.area_m2() < MIN_POLYGON_AREA_M2 {
            return Err(Error::InvalidPolygon(format!(
                "degenerate area {:.3} m²",
                polygon.area_m2()
            )));
        }

        let spacing_m = self.config.resolved_spacing_m();
        debug!(
            "planning: {} vertices, spacing {:.1} m, padding {:.1} m, pattern {}",
            polygon.len(),
            spacing_m,
            self.config.fence_padding_m,
            self.config.pattern
        );

        let padded = buffer_inward(polygon, self.config.fence_padding_m)?;
        let analysis = analyze_sides(&padded, self.config.pattern);
        info!(
            "scan bearing {:.1}° (longest side {:.1} m)",
            analysis.scan_bearing_deg, analysis.edges[analysis.longest_edge].length_m
        );

        let segments = generate_scan_lines(&padded, analysis.scan_bearing_deg, spacing_m)?;
        let sequence = sequence_segments(&segments, analysis.scan_bearing_deg);
        let (sequence, metrics) =
            optimize_for_home(sequence, self.config.home, &analysis.corners);

        info!(
            "{} waypoints across {} scan passes, {:.0} m survey path",
            sequence.len(),
            segments.len(),
            metrics.path_length_m
        );

        Ok(SurveyPlan {
            sequence,
            metrics,
            analysis,
            padded,
            spacing_m,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScanPattern;
    use crate::geometry::Coordinate;
    use crate::sequence::Direction;

    fn square() -> Polygon {
        Polygon::new(vec![
            Coordinate::new(0.0, 0.0),
            Coordinate::new(0.0, 0.001),
            Coordinate::new(0.001, 0.001),
            Coordinate::new(0.001, 0.0),
        ])
        .unwrap()
    }

    fn config(spacing_m: f64) -> PlanConfig {
        PlanConfig {
            spacing_m: Some(spacing_m),
            fence_padding_m: 0.0,
            pattern: ScanPattern::Vertical,
            ..Default::default()
        }
    }

    #[test]
    fn test_unit_square_two_line_square_wave() {
        // Unit-square scenario: padding 0, vertical pattern, spacing so
        // exactly two lines fit → 4 waypoints in a square wave with no
        // along-track jump between the two line ends.
        let plan = SurveyPlanner::new(config(100.0)).plan(&square()).unwrap();
        assert_eq!(plan.waypoint_count(), 4);
        assert_eq!(plan.line_count(), 2);
        assert_eq!(plan.sequence.direction, Direction::Forward);

        let w = &plan.sequence.waypoints;
        assert!((w[1].lat - w[2].lat).abs() < 1e-9, "along-track jump");
        assert!((w[1].distance_m(&w[2]) - 100.0).abs() < 1.0);
    }

    #[test]
    fn test_spacing_exceeding_extent_fails() {
        let r = SurveyPlanner::new(config(500.0)).plan(&square());
        assert!(matches!(r, Err(crate::Error::NoCoverageGenerated(_))));
    }

    #[test]
    fn test_padding_too_large_fails() {
        let cfg = PlanConfig {
            spacing_m: Some(20.0),
            fence_padding_m: 90.0,
            ..Default::default()
        };
        let r = SurveyPlanner::new(cfg).plan(&square());
        assert!(matches!(r, Err(crate::Error::PaddingExceedsGeometry(_))));
    }

    #[test]
    fn test_invalid_config_fails_before_geometry() {
        let cfg = PlanConfig {
            altitude_m: 0,
            ..Default::default()
        };
        let r = SurveyPlanner::new(cfg).plan(&square());
        assert!(matches!(r, Err(crate::Error::InvalidConfiguration(_))));
    }

    #[test]
    fn test_degenerate_polygon_fails() {
        // Sliver with effectively no area.
        let sliver = Polygon::new(vec![
            Coordinate::new(0.0, 0.0),
            Coordinate::new(0.0, 0.001),
            Coordinate::new(1e-9, 0.0005),
        ])
        .unwrap();
        let r = SurveyPlanner::with_defaults().plan(&sliver);
        assert!(matches!(r, Err(crate::Error::InvalidPolygon(_))));
    }

    #[test]
    fn test_padding_keeps_pattern_inside() {
        let cfg = PlanConfig {
            spacing_m: Some(20.0),
            fence_padding_m: 10.0,
            pattern: ScanPattern::Vertical,
            ..Default::default()
        };
        let plan = SurveyPlanner::new(cfg).plan(&square()).unwrap();
        // Corners inset diagonally, so the per-axis margin is
        // padding/√2 ≈ 7 m; every waypoint stays well inside the raw
        // boundary.
        for w in &plan.sequence.waypoints {
            assert!(w.lat > 0.00006 && w.lat < 0.00094);
            assert!(w.lon > 0.00006 && w.lon < 0.00094);
        }
    }

    #[test]
    fn test_home_optimization_changes_start() {
        let mut cfg = config(55.5);
        cfg.home = Some(Coordinate::new(0.0011, 0.0011));
        let plan = SurveyPlanner::new(cfg).plan(&square()).unwrap();
        let first = plan.sequence.first().unwrap();
        assert!(plan.metrics.home_to_first_m.unwrap() < 20.0);
        assert!(first.lat > 0.0009 && first.lon > 0.0009);
        assert!(plan.metrics.total_m() > plan.metrics.path_length_m);
    }

    #[test]
    fn test_auto_spacing_is_used_when_unset() {
        let cfg = PlanConfig {
            altitude_m: 50,
            spacing_m: None,
            fence_padding_m: 0.0,
            pattern: ScanPattern::Vertical,
            ..Default::default()
        };
        let plan = SurveyPlanner::new(cfg.clone()).plan(&square()).unwrap();
        assert!((plan.spacing_m - cfg.camera.auto_spacing_m(50.0)).abs() < 1e-9);
    }
}
