//! Optimization settings and the persisted-profile seam.
//!
//! The engine itself never reads a settings store; callers resolve a
//! profile up front (falling back to the defaults below) and pass the
//! result into `optimize_routes`.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

/// Profile name used when the caller has no explicit selection.
pub const DEFAULT_PROFILE: &str = "default";

/// Numeric knobs for one optimization run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationSettings {
    pub max_stops_per_route: usize,
    /// Working-hour ceiling in minutes.
    pub max_route_minutes: u32,
    /// Miles. Reserved; not yet consulted by the validator.
    pub max_route_distance: f64,
    /// Minutes. Reserved for short-break insertion.
    pub break_duration: u32,
    /// Minutes added when the lunch window is crossed.
    pub lunch_break_duration: u32,
    /// Percent padding applied on top of the traffic multiplier.
    pub travel_buffer_percent: f64,
    pub traffic_multiplier: f64,
    /// Weight of priority against distance during route construction.
    pub priority_weighting: f64,
    pub distance_weight: f64,
    pub time_weight: f64,
    pub cost_weight: f64,
    /// Relaxes the working-minutes check.
    pub allow_overtime_routes: bool,
}

impl Default for OptimizationSettings {
    fn default() -> Self {
        Self {
            max_stops_per_route: 8,
            max_route_minutes: 480,
            max_route_distance: 100.0,
            break_duration: 30,
            lunch_break_duration: 60,
            travel_buffer_percent: 15.0,
            traffic_multiplier: 1.3,
            priority_weighting: 2.0,
            distance_weight: 0.4,
            time_weight: 0.4,
            cost_weight: 0.2,
            allow_overtime_routes: false,
        }
    }
}

impl OptimizationSettings {
    /// Scoring weights are used unnormalized and must be non-negative.
    pub fn weights_valid(&self) -> bool {
        [self.distance_weight, self.time_weight, self.cost_weight, self.priority_weighting]
            .iter()
            .all(|w| w.is_finite() && *w >= 0.0)
    }
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("settings profile {0:?} not found")]
    ProfileNotFound(String),
    #[error("settings store unavailable: {0}")]
    Backend(String),
}

/// Persisted settings profiles, owned by an external collaborator.
pub trait SettingsStore {
    fn load(&self, profile: &str) -> Result<OptimizationSettings, SettingsError>;
}

/// Loads a profile, substituting defaults on any failure.
///
/// Store errors never propagate; a missing or invalid profile degrades to
/// the hard-coded defaults.
pub fn resolve_settings<S: SettingsStore>(store: &S, profile: &str) -> OptimizationSettings {
    match store.load(profile) {
        Ok(settings) if settings.weights_valid() => settings,
        Ok(_) => {
            warn!(profile, "persisted settings have invalid weights, using defaults");
            OptimizationSettings::default()
        }
        Err(err) => {
            warn!(profile, error = %err, "settings store failed, using defaults");
            OptimizationSettings::default()
        }
    }
}
