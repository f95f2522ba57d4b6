//! Great-circle distance and the constant-speed travel fallback.
//!
//! Less accurate than a road-network provider (ignores roads) but always
//! available; every travel lookup in the engine degrades to this.

use crate::travel::{TravelEstimate, TravelError, TravelEstimator};

/// Earth radius in miles.
const EARTH_RADIUS_MILES: f64 = 3959.0;

/// Assumed average driving speed when no provider estimate exists.
const FALLBACK_SPEED_MPH: f64 = 25.0;

/// Haversine distance between two (lat, lng) points in miles.
pub fn distance_miles(from: (f64, f64), to: (f64, f64)) -> f64 {
    let (lat1, lng1) = from;
    let (lat2, lng2) = to;

    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lng = (lng2 - lng1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().asin();

    EARTH_RADIUS_MILES * c
}

/// Travel estimate for a known straight-line distance at the assumed
/// average speed.
pub fn fallback_travel(distance_miles: f64) -> TravelEstimate {
    TravelEstimate {
        distance_miles,
        duration_minutes: distance_miles / FALLBACK_SPEED_MPH * 60.0,
    }
}

/// Local estimator backed purely by Haversine distance.
///
/// Useful as the provider when no routing backend is deployed; never fails.
#[derive(Debug, Clone)]
pub struct HaversineEstimator {
    /// Assumed average driving speed in mph.
    pub speed_mph: f64,
}

impl Default for HaversineEstimator {
    fn default() -> Self {
        Self {
            speed_mph: FALLBACK_SPEED_MPH,
        }
    }
}

impl HaversineEstimator {
    pub fn new(speed_mph: f64) -> Self {
        Self { speed_mph }
    }
}

impl TravelEstimator for HaversineEstimator {
    fn estimate(
        &self,
        from: (f64, f64),
        to: (f64, f64),
        _vehicle_class: &str,
    ) -> Result<TravelEstimate, TravelError> {
        let miles = distance_miles(from, to);
        Ok(TravelEstimate {
            distance_miles: miles,
            duration_minutes: miles / self.speed_mph * 60.0,
        })
    }
}
