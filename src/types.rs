//! Domain data model for a single optimization run.
//!
//! All inputs are read-only for the duration of a run; outputs are plain
//! data handed back to the scheduling/display layer. Geocoding happens
//! upstream — jobs arrive with coordinates already resolved.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Rejection of pathological input at construction time.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("coordinate out of range: lat {lat}, lng {lng}")]
    BadCoordinate { lat: f64, lng: f64 },
    #[error("service duration must be greater than zero")]
    ZeroDuration,
    #[error("priority must be between 1 and 5, got {0}")]
    BadPriority(u8),
    #[error("cost rate must be finite and non-negative, got {0}")]
    BadCostRate(f64),
}

fn check_coordinate(lat: f64, lng: f64) -> Result<(), ValidationError> {
    let ok = lat.is_finite() && lng.is_finite() && (-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lng);
    if ok {
        Ok(())
    } else {
        Err(ValidationError::BadCoordinate { lat, lng })
    }
}

/// Job complexity tier. Prioritization ranks these 1 (simplest) to 4.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Complexity {
    Simple,
    #[default]
    Standard,
    Complex,
    Critical,
}

impl Complexity {
    pub fn rank(self) -> u8 {
        match self {
            Complexity::Simple => 1,
            Complexity::Standard => 2,
            Complexity::Complex => 3,
            Complexity::Critical => 4,
        }
    }
}

/// Optional earliest/latest service window, `HH:MM` local time.
///
/// Read by prioritization only; not enforced as a hard constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub earliest: String,
    pub latest: String,
}

/// A single job visit to be routed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobLocation {
    pub id: String,
    /// Street address, display only.
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Estimated on-site service duration in minutes.
    pub duration_minutes: u32,
    /// 1-5, 5 = highest.
    pub priority: u8,
    #[serde(default)]
    pub time_window: Option<TimeWindow>,
    #[serde(default)]
    pub job_type: String,
    #[serde(default)]
    pub complexity: Complexity,
    #[serde(default)]
    pub required_skills: Vec<String>,
}

impl JobLocation {
    pub fn new(
        id: impl Into<String>,
        address: impl Into<String>,
        latitude: f64,
        longitude: f64,
        duration_minutes: u32,
        priority: u8,
    ) -> Result<Self, ValidationError> {
        check_coordinate(latitude, longitude)?;
        if duration_minutes == 0 {
            return Err(ValidationError::ZeroDuration);
        }
        if !(1..=5).contains(&priority) {
            return Err(ValidationError::BadPriority(priority));
        }

        Ok(Self {
            id: id.into(),
            address: address.into(),
            latitude,
            longitude,
            duration_minutes,
            priority,
            time_window: None,
            job_type: String::new(),
            complexity: Complexity::default(),
            required_skills: Vec::new(),
        })
    }

    pub fn with_time_window(mut self, earliest: impl Into<String>, latest: impl Into<String>) -> Self {
        self.time_window = Some(TimeWindow {
            earliest: earliest.into(),
            latest: latest.into(),
        });
        self
    }

    pub fn with_job_type(mut self, job_type: impl Into<String>) -> Self {
        self.job_type = job_type.into();
        self
    }

    pub fn with_complexity(mut self, complexity: Complexity) -> Self {
        self.complexity = complexity;
        self
    }

    pub fn with_skill(mut self, skill: impl Into<String>) -> Self {
        self.required_skills.push(skill.into());
        self
    }

    /// Location coordinates (lat, lng).
    pub fn coords(&self) -> (f64, f64) {
        (self.latitude, self.longitude)
    }
}

/// A fleet vehicle with its home base and operating cost rates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: String,
    /// Display number/name.
    pub name: String,
    /// Unit capacity. Reserved; not yet consulted by any constraint.
    pub capacity: u32,
    pub base_latitude: f64,
    pub base_longitude: f64,
    /// Operating cost per hour of travel + service time.
    pub hourly_cost: f64,
    /// Cost per mile driven.
    pub mileage_rate: f64,
    /// Routing profile tag forwarded to the travel-time provider.
    #[serde(default = "default_vehicle_class")]
    pub vehicle_class: String,
}

fn default_vehicle_class() -> String {
    "car".to_string()
}

impl Vehicle {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        base_latitude: f64,
        base_longitude: f64,
    ) -> Result<Self, ValidationError> {
        check_coordinate(base_latitude, base_longitude)?;

        Ok(Self {
            id: id.into(),
            name: name.into(),
            capacity: 0,
            base_latitude,
            base_longitude,
            hourly_cost: 0.0,
            mileage_rate: 0.0,
            vehicle_class: default_vehicle_class(),
        })
    }

    pub fn with_costs(mut self, hourly_cost: f64, mileage_rate: f64) -> Result<Self, ValidationError> {
        for rate in [hourly_cost, mileage_rate] {
            if !rate.is_finite() || rate < 0.0 {
                return Err(ValidationError::BadCostRate(rate));
            }
        }
        self.hourly_cost = hourly_cost;
        self.mileage_rate = mileage_rate;
        Ok(self)
    }

    pub fn with_capacity(mut self, capacity: u32) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn with_vehicle_class(mut self, class: impl Into<String>) -> Self {
        self.vehicle_class = class.into();
        self
    }

    /// Home-base coordinates (lat, lng).
    pub fn base_coords(&self) -> (f64, f64) {
        (self.base_latitude, self.base_longitude)
    }
}

/// One scheduled visit within an optimized route.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizedStop {
    pub job_id: String,
    /// 1-based position within the route.
    pub stop_order: u32,
    pub latitude: f64,
    pub longitude: f64,
    /// Wall-clock `HH:MM`.
    pub estimated_arrival: String,
    /// Wall-clock `HH:MM`.
    pub estimated_departure: String,
    pub duration_minutes: u32,
    /// Applied travel minutes from the previous stop (home base for the
    /// first stop), after traffic and buffer adjustment.
    pub travel_minutes: u32,
    /// Travel distance in miles from the previous stop.
    pub travel_distance: f64,
}

/// One vehicle's ordered stop sequence for the operating day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizedRoute {
    pub vehicle_id: String,
    pub route_date: String,
    pub stops: Vec<OptimizedStop>,
    /// Miles, including the return leg to the home base.
    pub total_distance: f64,
    /// Minutes from start_time to end_time, inclusive of travel, service,
    /// and break time.
    pub total_duration: u32,
    pub total_cost: f64,
    /// 0-100.
    pub quality_score: u8,
    pub start_time: String,
    pub end_time: String,
}
