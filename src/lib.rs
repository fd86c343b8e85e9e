//! # Surveyor
//!
//! A survey flight-path planning library for fixed-area drone missions.
//!
//! This library converts a closed ground-survey polygon (WGS84
//! coordinates, typically traced in a KML file) into an ordered
//! lawnmower coverage path usable by an ArduPilot-style autopilot:
//! - Inward polygon buffering (fence padding)
//! - Scan-direction selection (longest-side optimization or fixed axis)
//! - Parallel scan-line generation with polygon-intersection clipping
//! - Alternating (boustrophedon) traversal ordering
//! - Home-proximity-aware start/end/reversal optimization
//! - QGC WPL 110 mission-file assembly with camera trigger commands
//!
//! ## Example
//!
//! ```rust,ignore
//! use surveyor::{parse_kml_file, PlanConfig, SurveyPlanner};
//!
//! let polygon = parse_kml_file("field.kml")?;
//! let config = PlanConfig::default();
//! let plan = SurveyPlanner::new(config.clone()).plan(&polygon)?;
//! let mission = surveyor::mission::assemble(&plan, &config);
//! mission.write_to_file("field.waypoints")?;
//! ```

// Pipeline stages
pub mod buffer;
pub mod config;
pub mod geometry;
pub mod home;
pub mod kml;
pub mod mission;
pub mod pipeline;
pub mod scanline;
pub mod sequence;
pub mod sides;

// Re-export commonly used types
pub use buffer::buffer_inward;
pub use config::{CameraConfig, PlanConfig, ScanPattern};
pub use geometry::{
    haversine_distance_m, initial_bearing_deg, meters_to_degrees_lat, meters_to_degrees_lon,
    Coordinate, GeoBounds, LocalFrame, LocalPoint, Polygon, EARTH_RADIUS_M, METERS_PER_DEGREE_LAT,
};
pub use home::{optimize_for_home, MissionMetrics};
pub use kml::{parse_kml, parse_kml_file};
pub use mission::{assemble, Mission, MissionItem, MissionSummary};
pub use pipeline::{SurveyPlan, SurveyPlanner};
pub use scanline::{generate_scan_lines, ClippedSegment};
pub use sequence::{sequence_segments, Direction, WaypointSequence};
pub use sides::{analyze_sides, CornerLabel, Corners, Edge, SideAnalysis};

/// Result type used throughout the planner.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for planning operations.
///
/// Every failure is detected synchronously at the stage that discovers
/// it and propagated as a distinguishable kind; the planner never
/// returns a partially-correct waypoint sequence.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("KML error: {0}")]
    Kml(String),

    #[error("Invalid polygon: {0}")]
    InvalidPolygon(String),

    #[error("Fence padding exceeds geometry: {0}")]
    PaddingExceedsGeometry(String),

    #[error("No coverage generated: {0}")]
    NoCoverageGenerated(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
