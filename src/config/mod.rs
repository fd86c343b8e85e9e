//! Plan configuration types.
//!
//! This module provides the configuration bundle consumed by the
//! planning pipeline: flight parameters, scan-pattern selection, the
//! optional home position, and camera/trigger settings (including the
//! ground-footprint auto-spacing derivation).

use crate::geometry::Coordinate;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Scan-direction selection strategy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanPattern {
    /// Scan parallel to the polygon's longest side (trapezoid
    /// optimization).
    #[default]
    Auto,
    /// North/south scan lines (bearing 0°).
    Vertical,
    /// East/west scan lines (bearing 90°).
    Horizontal,
}

impl ScanPattern {
    /// The forced scan bearing for fixed patterns; `None` for `Auto`.
    pub fn fixed_bearing_deg(&self) -> Option<f64> {
        match self {
            ScanPattern::Auto => None,
            ScanPattern::Vertical => Some(0.0),
            ScanPattern::Horizontal => Some(90.0),
        }
    }
}

impl fmt::Display for ScanPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScanPattern::Auto => write!(f, "auto"),
            ScanPattern::Vertical => write!(f, "vertical"),
            ScanPattern::Horizontal => write!(f, "horizontal"),
        }
    }
}

impl FromStr for ScanPattern {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(ScanPattern::Auto),
            "vertical" => Ok(ScanPattern::Vertical),
            "horizontal" => Ok(ScanPattern::Horizontal),
            other => Err(Error::InvalidConfiguration(format!(
                "unknown scan pattern '{}' (expected auto, vertical or horizontal)",
                other
            ))),
        }
    }
}

/// Camera and trigger settings.
///
/// Sensor geometry drives the auto-spacing derivation; the trigger and
/// gimbal fields pass through to the mission assembler.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Whether camera trigger commands are emitted (default: true).
    pub enabled: bool,
    /// Distance between photos in meters (default: 5).
    pub trigger_distance_m: f64,
    /// Camera tilt angle in degrees, -90 = straight down (default: -90).
    pub gimbal_tilt_deg: f64,
    /// Sensor width in millimeters (default: 23.5, APS-C).
    pub sensor_width_mm: f64,
    /// Lens focal length in millimeters (default: 24).
    pub focal_length_mm: f64,
    /// Along-track photo overlap percentage (default: 80).
    pub overlap_percent: f64,
    /// Across-track photo sidelap percentage (default: 60).
    pub sidelap_percent: f64,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            trigger_distance_m: 5.0,
            gimbal_tilt_deg: -90.0,
            sensor_width_mm: 23.5,
            focal_length_mm: 24.0,
            overlap_percent: 80.0,
            sidelap_percent: 60.0,
        }
    }
}

impl CameraConfig {
    /// Ground footprint width in meters at the given altitude.
    pub fn footprint_width_m(&self, altitude_m: f64) -> f64 {
        self.sensor_width_mm * altitude_m / self.focal_length_mm
    }

    /// Line spacing derived from the footprint and the configured
    /// sidelap, floored at 1 m.
    pub fn auto_spacing_m(&self, altitude_m: f64) -> f64 {
        let sidelap_factor = (100.0 - self.sidelap_percent) / 100.0;
        (self.footprint_width_m(altitude_m) * sidelap_factor).max(1.0)
    }
}

/// Planning configuration bundle.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanConfig {
    /// Flight altitude in meters AGL (default: 10).
    pub altitude_m: u32,
    /// Distance between parallel scan lines in meters; `None` derives
    /// the spacing from the camera footprint (default: auto).
    pub spacing_m: Option<f64>,
    /// Inward safety margin from the polygon boundary in meters
    /// (default: 2).
    pub fence_padding_m: f64,
    /// Scan-direction selection strategy (default: auto).
    pub pattern: ScanPattern,
    /// Optional home position; absence disables start/end optimization.
    pub home: Option<Coordinate>,
    /// Camera and trigger settings.
    pub camera: CameraConfig,
}

impl Default for PlanConfig {
    fn default() -> Self {
        Self {
            altitude_m: 10,
            spacing_m: None,
            fence_padding_m: 2.0,
            pattern: ScanPattern::Auto,
            home: None,
            camera: CameraConfig::default(),
        }
    }
}

impl PlanConfig {
    /// Load a configuration from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config: PlanConfig = serde_json::from_str(&text)
            .map_err(|e| Error::InvalidConfiguration(format!("config file: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate ranges; every failure is an
    /// [`Error::InvalidConfiguration`].
    pub fn validate(&self) -> Result<()> {
        if self.altitude_m == 0 {
            return Err(Error::InvalidConfiguration(
                "altitude must be a positive integer".to_string(),
            ));
        }
        if let Some(spacing) = self.spacing_m {
            if !spacing.is_finite() || spacing <= 0.0 {
                return Err(Error::InvalidConfiguration(format!(
                    "spacing must be positive, got {}",
                    spacing
                )));
            }
        }
        if !self.fence_padding_m.is_finite() || self.fence_padding_m < 0.0 {
            return Err(Error::InvalidConfiguration(format!(
                "fence padding must be non-negative, got {}",
                self.fence_padding_m
            )));
        }
        for (name, pct) in [
            ("overlap", self.camera.overlap_percent),
            ("sidelap", self.camera.sidelap_percent),
        ] {
            if !(0.0..100.0).contains(&pct) {
                return Err(Error::InvalidConfiguration(format!(
                    "{} percentage must be in [0, 100), got {}",
                    name, pct
                )));
            }
        }
        if self.camera.trigger_distance_m <= 0.0 {
            return Err(Error::InvalidConfiguration(format!(
                "trigger distance must be positive, got {}",
                self.camera.trigger_distance_m
            )));
        }
        if self.camera.sensor_width_mm <= 0.0 || self.camera.focal_length_mm <= 0.0 {
            return Err(Error::InvalidConfiguration(
                "sensor width and focal length must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// The effective scan-line spacing: the fixed value, or the
    /// camera-derived auto spacing.
    pub fn resolved_spacing_m(&self) -> f64 {
        match self.spacing_m {
            Some(spacing) => spacing,
            None => self.camera.auto_spacing_m(self.altitude_m as f64),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PlanConfig::default();
        assert_eq!(config.altitude_m, 10);
        assert_eq!(config.spacing_m, None);
        assert!((config.fence_padding_m - 2.0).abs() < 1e-12);
        assert_eq!(config.pattern, ScanPattern::Auto);
        assert!(config.camera.enabled);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_auto_spacing_formula() {
        // altitude 50 m, 23.5 mm sensor, 24 mm focal, 60% sidelap:
        // footprint = 23.5 * 50 / 24, spacing = footprint * 0.4
        let camera = CameraConfig::default();
        let footprint = camera.footprint_width_m(50.0);
        assert!((footprint - 23.5 * 50.0 / 24.0).abs() < 1e-9);

        let spacing = camera.auto_spacing_m(50.0);
        assert!((spacing - footprint * 0.4).abs() < 1e-9);
    }

    #[test]
    fn test_auto_spacing_floor() {
        // Very low altitude collapses the footprint; spacing is floored
        // at 1 m.
        let camera = CameraConfig::default();
        assert!((camera.auto_spacing_m(0.5) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_resolved_spacing_prefers_fixed() {
        let config = PlanConfig {
            spacing_m: Some(8.0),
            ..Default::default()
        };
        assert!((config.resolved_spacing_m() - 8.0).abs() < 1e-12);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = PlanConfig {
            altitude_m: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(Error::InvalidConfiguration(_))
        ));

        config.altitude_m = 10;
        config.spacing_m = Some(-1.0);
        assert!(config.validate().is_err());

        config.spacing_m = None;
        config.camera.sidelap_percent = 100.0;
        assert!(config.validate().is_err());

        config.camera.sidelap_percent = 60.0;
        config.fence_padding_m = -0.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_scan_pattern_parse() {
        assert_eq!("auto".parse::<ScanPattern>().unwrap(), ScanPattern::Auto);
        assert_eq!(
            "Vertical".parse::<ScanPattern>().unwrap(),
            ScanPattern::Vertical
        );
        assert!("diagonal".parse::<ScanPattern>().is_err());
    }

    #[test]
    fn test_serde_round_trip() {
        let config = PlanConfig {
            altitude_m: 50,
            spacing_m: Some(8.0),
            pattern: ScanPattern::Horizontal,
            home: Some(Coordinate::new(12.345678, 78.901234)),
            ..Default::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        let back: PlanConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
