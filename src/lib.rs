//! fieldroute core
//!
//! Route optimization for field-service job visits: prioritization,
//! proximity clustering, nearest-neighbor construction, 2-opt improvement,
//! and timed schedule building for one operating day.

pub mod types;
pub mod settings;
pub mod haversine;
pub mod travel;
pub mod solver;
pub mod schedule;
