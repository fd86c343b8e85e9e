//! Mission-file assembly.
//!
//! Output glue: merges the optimized waypoint sequence with camera and
//! gimbal commands and the fixed mission header/footer, producing the
//! tab-separated `QGC WPL 110` waypoint file consumed by ArduPilot
//! ground stations, plus the textual mission summary shown by the CLI.

use crate::config::PlanConfig;
use crate::geometry::Coordinate;
use crate::pipeline::SurveyPlan;
use crate::Result;
use std::fmt;
use std::path::Path;

/// Waypoint-file header line.
pub const MISSION_FILE_HEADER: &str = "QGC WPL 110";

/// Navigate to waypoint.
const CMD_WAYPOINT: u16 = 16;
/// Return to launch.
const CMD_RETURN_TO_LAUNCH: u16 = 20;
/// Takeoff to altitude.
const CMD_TAKEOFF: u16 = 22;
/// Set distance-based camera triggering (0 disables).
const CMD_CAM_TRIGG_DIST: u16 = 206;
/// Point the camera mount (pitch in the first parameter).
const CMD_MOUNT_TILT: u16 = 221;

/// Global frame (absolute altitude).
const FRAME_GLOBAL: u8 = 0;
/// Global frame with altitude relative to home.
const FRAME_RELATIVE_ALT: u8 = 3;

/// One record of the waypoint file.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MissionItem {
    /// Sequence number.
    pub seq: u16,
    /// Whether this is the current item (home record convention: 0).
    pub current: u8,
    /// Coordinate frame.
    pub frame: u8,
    /// MAVLink command id.
    pub command: u16,
    /// Command parameters 1-4.
    pub params: [f64; 4],
    /// Latitude in degrees (or command-specific).
    pub lat: f64,
    /// Longitude in degrees (or command-specific).
    pub lon: f64,
    /// Altitude in meters.
    pub alt: f64,
    /// Autocontinue flag.
    pub autocontinue: u8,
}

impl fmt::Display for MissionItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\t{}\t{}\t{}\t{:.6}\t{:.6}\t{:.6}\t{:.6}\t{:.6}\t{:.6}\t{:.6}\t{}",
            self.seq,
            self.current,
            self.frame,
            self.command,
            self.params[0],
            self.params[1],
            self.params[2],
            self.params[3],
            self.lat,
            self.lon,
            self.alt,
            self.autocontinue
        )
    }
}

/// A complete assembled mission.
#[derive(Clone, Debug, Default)]
pub struct Mission {
    items: Vec<MissionItem>,
}

impl Mission {
    /// The mission records in file order.
    pub fn items(&self) -> &[MissionItem] {
        &self.items
    }

    /// Number of mission records.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Write the waypoint file to disk.
    pub fn write_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path, self.to_string())?;
        Ok(())
    }
}

impl fmt::Display for Mission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", MISSION_FILE_HEADER)?;
        for item in &self.items {
            writeln!(f, "{}", item)?;
        }
        Ok(())
    }
}

/// Merge a survey plan with the mission header/footer and camera
/// commands.
///
/// Record order: home, takeoff, optional camera-start (trigger distance
/// and gimbal tilt), one waypoint per survey point, optional
/// camera-stop, return-to-launch.
pub fn assemble(plan: &SurveyPlan, config: &PlanConfig) -> Mission {
    let home = config
        .home
        .or_else(|| plan.sequence.first())
        .unwrap_or_default();
    let altitude = config.altitude_m as f64;

    fn record(
        seq: usize,
        frame: u8,
        command: u16,
        params: [f64; 4],
        position: Option<Coordinate>,
        alt: f64,
    ) -> MissionItem {
        MissionItem {
            seq: seq as u16,
            current: 0,
            frame,
            command,
            params,
            lat: position.map(|p| p.lat).unwrap_or(0.0),
            lon: position.map(|p| p.lon).unwrap_or(0.0),
            alt,
            autocontinue: 1,
        }
    }

    let mut items: Vec<MissionItem> = Vec::with_capacity(plan.waypoint_count() + 6);

    items.push(record(
        items.len(),
        FRAME_GLOBAL,
        CMD_WAYPOINT,
        [0.0; 4],
        Some(home),
        0.1,
    ));
    items.push(record(
        items.len(),
        FRAME_RELATIVE_ALT,
        CMD_TAKEOFF,
        [0.0; 4],
        None,
        altitude,
    ));

    if config.camera.enabled {
        items.push(record(
            items.len(),
            FRAME_RELATIVE_ALT,
            CMD_CAM_TRIGG_DIST,
            [config.camera.trigger_distance_m, 0.0, 0.0, 0.0],
            None,
            0.0,
        ));
        items.push(record(
            items.len(),
            FRAME_RELATIVE_ALT,
            CMD_MOUNT_TILT,
            [config.camera.gimbal_tilt_deg, 0.0, 0.0, 0.0],
            None,
            0.0,
        ));
    }

    for waypoint in &plan.sequence.waypoints {
        items.push(record(
            items.len(),
            FRAME_RELATIVE_ALT,
            CMD_WAYPOINT,
            [0.0; 4],
            Some(*waypoint),
            altitude,
        ));
    }

    if config.camera.enabled {
        items.push(record(
            items.len(),
            FRAME_RELATIVE_ALT,
            CMD_CAM_TRIGG_DIST,
            [0.0; 4],
            None,
            0.0,
        ));
    }

    items.push(record(
        items.len(),
        FRAME_GLOBAL,
        CMD_RETURN_TO_LAUNCH,
        [0.0; 4],
        None,
        0.0,
    ));

    Mission { items }
}

/// Textual mission summary shown after planning.
#[derive(Clone, Debug)]
pub struct MissionSummary {
    pub home: Coordinate,
    pub waypoint_count: usize,
    pub mission_items: usize,
    pub altitude_m: u32,
    pub spacing_m: f64,
    pub fence_padding_m: f64,
    pub scan_bearing_deg: f64,
    pub camera_enabled: bool,
    pub trigger_distance_m: f64,
    pub gimbal_tilt_deg: f64,
    pub overlap_percent: f64,
    pub sidelap_percent: f64,
    pub home_to_first_m: Option<f64>,
    pub survey_length_m: f64,
    pub last_to_home_m: Option<f64>,
}

impl MissionSummary {
    /// Build the summary from a plan and its assembled mission.
    pub fn new(plan: &SurveyPlan, config: &PlanConfig, mission: &Mission) -> Self {
        let home = config
            .home
            .or_else(|| plan.sequence.first())
            .unwrap_or_default();
        Self {
            home,
            waypoint_count: plan.waypoint_count(),
            mission_items: mission.item_count(),
            altitude_m: config.altitude_m,
            spacing_m: plan.spacing_m,
            fence_padding_m: config.fence_padding_m,
            scan_bearing_deg: plan.analysis.scan_bearing_deg,
            camera_enabled: config.camera.enabled,
            trigger_distance_m: config.camera.trigger_distance_m,
            gimbal_tilt_deg: config.camera.gimbal_tilt_deg,
            overlap_percent: config.camera.overlap_percent,
            sidelap_percent: config.camera.sidelap_percent,
            home_to_first_m: plan.metrics.home_to_first_m,
            survey_length_m: plan.metrics.path_length_m,
            last_to_home_m: plan.metrics.last_to_home_m,
        }
    }

    /// Total mission distance including the transit legs.
    pub fn total_m(&self) -> f64 {
        self.survey_length_m
            + self.home_to_first_m.unwrap_or(0.0)
            + self.last_to_home_m.unwrap_or(0.0)
    }
}

impl fmt::Display for MissionSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== MISSION SUMMARY ===")?;
        writeln!(f, "Home position: {:.6}, {:.6}", self.home.lat, self.home.lon)?;
        writeln!(f, "Survey waypoints: {}", self.waypoint_count)?;
        writeln!(f, "Mission items: {}", self.mission_items)?;
        writeln!(f, "Flight altitude: {} m AGL", self.altitude_m)?;
        writeln!(f, "Line spacing: {:.1} m", self.spacing_m)?;
        writeln!(f, "Fence padding: {:.1} m", self.fence_padding_m)?;
        writeln!(f, "Scan bearing: {:.1}°", self.scan_bearing_deg)?;
        if self.camera_enabled {
            writeln!(f, "Camera trigger: ENABLED")?;
            writeln!(f, "  Trigger distance: {:.1} m", self.trigger_distance_m)?;
            writeln!(f, "  Gimbal tilt: {:.0}°", self.gimbal_tilt_deg)?;
            writeln!(f, "  Expected overlap: {:.0}%", self.overlap_percent)?;
            writeln!(f, "  Expected sidelap: {:.0}%", self.sidelap_percent)?;
        } else {
            writeln!(f, "Camera trigger: DISABLED")?;
        }
        if let Some(d) = self.home_to_first_m {
            writeln!(f, "Distance from home to first waypoint: {:.0} m", d)?;
        }
        writeln!(f, "Estimated survey flight distance: {:.0} m", self.survey_length_m)?;
        if let Some(d) = self.last_to_home_m {
            writeln!(f, "Distance from last waypoint to home: {:.0} m", d)?;
        }
        writeln!(f, "Total mission distance: {:.0} m", self.total_m())?;
        write!(f, "=======================")
    }
}
