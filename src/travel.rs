//! Travel-time provider contract and the OSRM HTTP adapter.
//!
//! Provider failures are recoverable by contract: callers substitute the
//! Haversine fallback estimate and continue, so no error here is fatal to
//! an optimization run.

use serde::Deserialize;
use thiserror::Error;

/// Point-to-point travel estimate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TravelEstimate {
    pub distance_miles: f64,
    pub duration_minutes: f64,
}

#[derive(Debug, Error)]
pub enum TravelError {
    #[error("travel provider request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("travel provider returned no route")]
    NoRoute,
}

/// External travel-time provider between two coordinate pairs.
///
/// `vehicle_class` is the routing profile tag (e.g. "car", "truck").
/// A timeout counts as any other transport error.
pub trait TravelEstimator {
    fn estimate(
        &self,
        from: (f64, f64),
        to: (f64, f64),
        vehicle_class: &str,
    ) -> Result<TravelEstimate, TravelError>;
}

const METERS_PER_MILE: f64 = 1609.344;

#[derive(Debug, Clone)]
pub struct OsrmConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for OsrmConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            timeout_secs: 10,
        }
    }
}

/// OSRM `route` service adapter.
#[derive(Debug, Clone)]
pub struct OsrmRouteClient {
    config: OsrmConfig,
    client: reqwest::blocking::Client,
}

impl OsrmRouteClient {
    pub fn new(config: OsrmConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }
}

impl TravelEstimator for OsrmRouteClient {
    fn estimate(
        &self,
        from: (f64, f64),
        to: (f64, f64),
        vehicle_class: &str,
    ) -> Result<TravelEstimate, TravelError> {
        // OSRM expects lng,lat ordering.
        let url = format!(
            "{}/route/v1/{}/{:.6},{:.6};{:.6},{:.6}?overview=false",
            self.config.base_url, vehicle_class, from.1, from.0, to.1, to.0
        );

        let body = self
            .client
            .get(url)
            .send()
            .and_then(|resp| resp.error_for_status())
            .and_then(|resp| resp.json::<OsrmRouteResponse>())?;

        let route = body
            .routes
            .and_then(|routes| routes.into_iter().next())
            .ok_or(TravelError::NoRoute)?;

        Ok(TravelEstimate {
            distance_miles: route.distance / METERS_PER_MILE,
            duration_minutes: route.duration / 60.0,
        })
    }
}

#[derive(Debug, Deserialize)]
struct OsrmRouteResponse {
    routes: Option<Vec<OsrmRouteLeg>>,
}

#[derive(Debug, Deserialize)]
struct OsrmRouteLeg {
    /// Meters.
    distance: f64,
    /// Seconds.
    duration: f64,
}
