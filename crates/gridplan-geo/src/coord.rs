//! Meters ↔ degrees conversion and bounding viewports.
//!
//! Latitude lines are evenly spaced, so latitude uses a constant factor.
//! Longitude lines converge toward the poles, so the longitude factor shrinks
//! with `cos(latitude)` and cells stay roughly square in meters.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

/// Average length of one degree of latitude.
pub const METERS_PER_DEGREE_LATITUDE: f64 = 111_139.0;
/// WGS-84 equatorial radius.
pub const EARTH_RADIUS_METERS: f64 = 6_378_137.0;
pub const METERS_PER_MILE: f64 = 1609.34;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Axis-aligned lat/lng box. `low` is the southwest corner, `high` the northeast.
///
/// When `low.longitude > high.longitude` the box crosses the antimeridian.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub low: Coordinate,
    pub high: Coordinate,
}

impl Viewport {
    #[must_use]
    pub fn crosses_antimeridian(&self) -> bool {
        self.low.longitude > self.high.longitude
    }

    #[must_use]
    pub fn contains(&self, point: Coordinate) -> bool {
        let in_lat = (self.low.latitude..=self.high.latitude).contains(&point.latitude);
        let in_lng = if self.crosses_antimeridian() {
            point.longitude >= self.low.longitude || point.longitude <= self.high.longitude
        } else {
            (self.low.longitude..=self.high.longitude).contains(&point.longitude)
        };
        in_lat && in_lng
    }
}

#[must_use]
pub fn meters_to_degrees_latitude(meters: f64) -> f64 {
    meters / METERS_PER_DEGREE_LATITUDE
}

/// Near ±90° the divisor collapses toward zero and the result grows without
/// bound; callers get very wide cells there rather than an error.
#[must_use]
pub fn meters_to_degrees_longitude(meters: f64, latitude: f64) -> f64 {
    meters / meters_per_degree_longitude(latitude)
}

#[must_use]
pub fn degrees_latitude_to_meters(degrees: f64) -> f64 {
    degrees * METERS_PER_DEGREE_LATITUDE
}

#[must_use]
pub fn degrees_longitude_to_meters(degrees: f64, latitude: f64) -> f64 {
    degrees * meters_per_degree_longitude(latitude)
}

fn meters_per_degree_longitude(latitude: f64) -> f64 {
    latitude.to_radians().cos() * PI * EARTH_RADIUS_METERS / 180.0
}

/// Returns `(latitude_degrees, longitude_degrees)` spanned by `meters` at `center_latitude`.
#[must_use]
pub fn meters_to_degrees(meters: f64, center_latitude: f64) -> (f64, f64) {
    (
        meters_to_degrees_latitude(meters),
        meters_to_degrees_longitude(meters, center_latitude),
    )
}

#[must_use]
pub fn miles_to_meters(miles: f64) -> f64 {
    miles * METERS_PER_MILE
}

#[must_use]
pub fn meters_to_miles(meters: f64) -> f64 {
    meters / METERS_PER_MILE
}

/// Bring a longitude that overshot the antimeridian back into `[-180, 180]`.
///
/// Single correction, not modulo: valid while the overshoot is under a full turn.
#[must_use]
pub fn wrap_longitude(longitude: f64) -> f64 {
    if longitude < -180.0 {
        longitude + 360.0
    } else if longitude > 180.0 {
        longitude - 360.0
    } else {
        longitude
    }
}

/// Bounding box extending `radius_meters` from the center in every direction.
///
/// Latitude is clamped to `[-90, 90]`. Longitude is corrected once into
/// `[-180, 180]`, which holds as long as the box is narrower than a full turn.
#[must_use]
pub fn get_viewport(center_latitude: f64, center_longitude: f64, radius_meters: f64) -> Viewport {
    let (lat_delta, lng_delta) = meters_to_degrees(radius_meters, center_latitude);

    let low_lat = (center_latitude - lat_delta).max(-90.0);
    let high_lat = (center_latitude + lat_delta).min(90.0);

    Viewport {
        low: Coordinate::new(low_lat, wrap_longitude(center_longitude - lng_delta)),
        high: Coordinate::new(high_lat, wrap_longitude(center_longitude + lng_delta)),
    }
}
