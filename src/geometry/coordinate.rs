//! WGS84 coordinate type and great-circle math.

use super::{normalize_bearing_deg, EARTH_RADIUS_M, METERS_PER_DEGREE_LAT};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A WGS84 coordinate: latitude/longitude pair in decimal degrees.
///
/// Immutable value type; no elevation component.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    /// Latitude in decimal degrees (positive north).
    pub lat: f64,
    /// Longitude in decimal degrees (positive east).
    pub lon: f64,
}

impl Coordinate {
    /// Create a new coordinate from latitude and longitude in degrees.
    #[inline]
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Haversine great-circle distance to another coordinate, in meters.
    pub fn distance_m(&self, other: &Coordinate) -> f64 {
        haversine_distance_m(self, other)
    }

    /// Initial bearing toward another coordinate, degrees in [0, 360).
    pub fn bearing_to(&self, other: &Coordinate) -> f64 {
        initial_bearing_deg(self, other)
    }

    /// Coordinate reached by traveling `distance_m` meters along
    /// `bearing_deg` on the spherical Earth.
    pub fn destination(&self, bearing_deg: f64, distance_m: f64) -> Coordinate {
        let lat1 = self.lat.to_radians();
        let lon1 = self.lon.to_radians();
        let bearing = bearing_deg.to_radians();
        let angular = distance_m / EARTH_RADIUS_M;

        let lat2 =
            (lat1.sin() * angular.cos() + lat1.cos() * angular.sin() * bearing.cos()).asin();
        let lon2 = lon1
            + (bearing.sin() * angular.sin() * lat1.cos())
                .atan2(angular.cos() - lat1.sin() * lat2.sin());

        Coordinate::new(lat2.to_degrees(), lon2.to_degrees())
    }

    /// Check if two coordinates are equal within `epsilon_deg` on both axes.
    #[inline]
    pub fn approx_eq(&self, other: &Coordinate, epsilon_deg: f64) -> bool {
        (self.lat - other.lat).abs() < epsilon_deg && (self.lon - other.lon).abs() < epsilon_deg
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lon)
    }
}

/// Haversine great-circle distance between two coordinates, in meters.
///
/// Always defined for valid coordinate ranges; accurate to well under a
/// meter at survey scales.
pub fn haversine_distance_m(a: &Coordinate, b: &Coordinate) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let dlat = (b.lat - a.lat).to_radians();
    let dlon = (b.lon - a.lon).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_M * c
}

/// Initial (forward-azimuth) bearing from `a` to `b`, degrees in [0, 360),
/// measured clockwise from north.
pub fn initial_bearing_deg(a: &Coordinate, b: &Coordinate) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let dlon = (b.lon - a.lon).to_radians();

    let y = dlon.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * dlon.cos();

    normalize_bearing_deg(y.atan2(x).to_degrees())
}

/// Convert a north/south displacement in meters to degrees of latitude.
///
/// Linear approximation; valid for small extents only.
#[inline]
pub fn meters_to_degrees_lat(meters: f64) -> f64 {
    meters / METERS_PER_DEGREE_LAT
}

/// Convert an east/west displacement in meters to degrees of longitude
/// at the given latitude.
#[inline]
pub fn meters_to_degrees_lon(meters: f64, at_latitude_deg: f64) -> f64 {
    meters / (METERS_PER_DEGREE_LAT * at_latitude_deg.to_radians().cos())
}
