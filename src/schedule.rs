//! Timed-schedule construction and the route quality score.
//!
//! Walks a validated stop sequence from the vehicle's home base, asking the
//! travel-time provider for each leg (falling back to the Haversine
//! estimate on any provider error) and producing wall-clock arrival and
//! departure times, running cost, and the return leg to base.

use tracing::{debug, warn};

use crate::haversine;
use crate::settings::OptimizationSettings;
use crate::travel::{TravelEstimate, TravelEstimator};
use crate::types::{JobLocation, OptimizedRoute, OptimizedStop, Vehicle};

/// Lunch window bounds, minutes since midnight (12:00-13:00).
const LUNCH_WINDOW_START: u32 = 720;
const LUNCH_WINDOW_END: u32 = 780;

/// Applied when `start_time` does not parse (08:00).
const DEFAULT_START_MINUTES: u32 = 480;

/// Fixed stand-in for the cost dimension of the score; a real cost-based
/// sub-score is not computed.
const COST_SCORE_BASELINE: f64 = 80.0;

/// Parses a wall-clock `HH:MM` into minutes since midnight.
pub fn parse_hhmm(value: &str) -> Option<u32> {
    let (hours, minutes) = value.split_once(':')?;
    let hours: u32 = hours.parse().ok()?;
    let minutes: u32 = minutes.parse().ok()?;
    if hours > 23 || minutes > 59 {
        return None;
    }
    Some(hours * 60 + minutes)
}

/// Renders minutes since midnight as `HH:MM`, wrapping past 24h.
pub fn format_hhmm(minutes: u32) -> String {
    format!("{:02}:{:02}", (minutes / 60) % 24, minutes % 60)
}

fn travel_leg<E: TravelEstimator>(
    estimator: &E,
    from: (f64, f64),
    to: (f64, f64),
    vehicle_class: &str,
) -> TravelEstimate {
    match estimator.estimate(from, to, vehicle_class) {
        Ok(estimate) => estimate,
        Err(err) => {
            debug!(error = %err, "travel provider unavailable, using haversine fallback");
            haversine::fallback_travel(haversine::distance_miles(from, to))
        }
    }
}

/// Builds the timed schedule for an ordered, already-validated job
/// sequence.
///
/// The clock starts at `start_time` at the vehicle's home base. Each leg's
/// provider duration is padded by the traffic multiplier and the travel
/// buffer, then rounded to whole minutes. The return leg to base gets the
/// traffic multiplier but no buffer; its distance and duration are included
/// in the route totals.
pub fn build_timed_route<E: TravelEstimator>(
    vehicle: &Vehicle,
    jobs: &[&JobLocation],
    route_date: &str,
    start_time: &str,
    settings: &OptimizationSettings,
    estimator: &E,
) -> OptimizedRoute {
    let start = parse_hhmm(start_time).unwrap_or_else(|| {
        warn!(start_time, "unparseable route start time, using 08:00");
        DEFAULT_START_MINUTES
    });

    let mut clock = start;
    let mut current = vehicle.base_coords();
    let mut total_distance = 0.0;
    let mut total_cost = 0.0;
    let mut stops = Vec::with_capacity(jobs.len());
    let midpoint = jobs.len() / 2;

    for (idx, job) in jobs.iter().enumerate() {
        let leg = travel_leg(estimator, current, job.coords(), &vehicle.vehicle_class);
        let buffered_minutes = (leg.duration_minutes
            * settings.traffic_multiplier
            * (1.0 + settings.travel_buffer_percent / 100.0))
            .round() as u32;
        clock += buffered_minutes;

        // Known quirk kept for compatibility: several consecutive stops can
        // each land in the lunch window past the midpoint, inserting more
        // than one break.
        if (LUNCH_WINDOW_START..LUNCH_WINDOW_END).contains(&clock) && idx > midpoint {
            clock += settings.lunch_break_duration;
        }

        let arrival = clock;
        let departure = arrival + job.duration_minutes;

        stops.push(OptimizedStop {
            job_id: job.id.clone(),
            stop_order: (idx + 1) as u32,
            latitude: job.latitude,
            longitude: job.longitude,
            estimated_arrival: format_hhmm(arrival),
            estimated_departure: format_hhmm(departure),
            duration_minutes: job.duration_minutes,
            travel_minutes: buffered_minutes,
            travel_distance: leg.distance_miles,
        });

        total_distance += leg.distance_miles;
        total_cost += leg.distance_miles * vehicle.mileage_rate
            + f64::from(buffered_minutes + job.duration_minutes) / 60.0 * vehicle.hourly_cost;

        clock = departure;
        current = job.coords();
    }

    if !jobs.is_empty() {
        let leg = travel_leg(estimator, current, vehicle.base_coords(), &vehicle.vehicle_class);
        let return_minutes = (leg.duration_minutes * settings.traffic_multiplier).round() as u32;
        clock += return_minutes;
        total_distance += leg.distance_miles;
        total_cost += leg.distance_miles * vehicle.mileage_rate
            + f64::from(return_minutes) / 60.0 * vehicle.hourly_cost;
    }

    let total_duration = clock - start;
    let quality_score = quality_score(&stops, total_distance, total_duration, settings);

    OptimizedRoute {
        vehicle_id: vehicle.id.clone(),
        route_date: route_date.to_string(),
        stops,
        total_distance,
        total_duration,
        total_cost,
        quality_score,
        start_time: format_hhmm(start),
        end_time: format_hhmm(clock),
    }
}

/// 0-100 quality score from average per-stop distance and duration.
///
/// An empty route scores 100. The cost dimension contributes the fixed
/// `COST_SCORE_BASELINE` regardless of actual cost.
pub fn quality_score(
    stops: &[OptimizedStop],
    total_distance: f64,
    total_duration: u32,
    settings: &OptimizationSettings,
) -> u8 {
    if stops.is_empty() {
        return 100;
    }

    let count = stops.len() as f64;
    let avg_distance = total_distance / count;
    let avg_minutes = f64::from(total_duration) / count;

    let distance_score = (100.0 - (avg_distance - 5.0) * 10.0).max(0.0);
    let time_score = (100.0 - (avg_minutes - 60.0) * 2.0).max(0.0);

    let combined = distance_score * settings.distance_weight
        + time_score * settings.time_weight
        + COST_SCORE_BASELINE * settings.cost_weight;

    combined.clamp(0.0, 100.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_formats_wall_clock() {
        assert_eq!(parse_hhmm("08:00"), Some(480));
        assert_eq!(parse_hhmm("23:59"), Some(1439));
        assert_eq!(parse_hhmm("24:00"), None);
        assert_eq!(parse_hhmm("8am"), None);
        assert_eq!(format_hhmm(480), "08:00");
        assert_eq!(format_hhmm(1439), "23:59");
        // past midnight wraps
        assert_eq!(format_hhmm(1500), "01:00");
    }

    #[test]
    fn empty_route_scores_100() {
        let settings = OptimizationSettings::default();
        assert_eq!(quality_score(&[], 0.0, 0, &settings), 100);
    }

    #[test]
    fn score_stays_in_bounds() {
        let settings = OptimizationSettings::default();
        let stop = OptimizedStop {
            job_id: "j1".to_string(),
            stop_order: 1,
            latitude: 0.0,
            longitude: 0.0,
            estimated_arrival: "08:00".to_string(),
            estimated_departure: "08:30".to_string(),
            duration_minutes: 30,
            travel_minutes: 10,
            travel_distance: 3.0,
        };
        let stops = vec![stop];

        for (distance, duration) in [(0.0, 0), (5.0, 60), (1000.0, 10_000), (0.5, 100_000)] {
            let score = quality_score(&stops, distance, duration, &settings);
            assert!(score <= 100, "score {} out of range for ({}, {})", score, distance, duration);
        }
    }

    #[test]
    fn short_tight_route_scores_high() {
        let settings = OptimizationSettings::default();
        let stop = OptimizedStop {
            job_id: "j1".to_string(),
            stop_order: 1,
            latitude: 0.0,
            longitude: 0.0,
            estimated_arrival: "08:00".to_string(),
            estimated_departure: "08:30".to_string(),
            duration_minutes: 30,
            travel_minutes: 5,
            travel_distance: 2.0,
        };
        // 2 miles and 40 minutes for one stop: both sub-scores overshoot
        // 100 and the blend clamps at the ceiling.
        assert_eq!(quality_score(std::slice::from_ref(&stop), 2.0, 40, &settings), 100);

        // 6 miles / 70 minutes: 90 * 0.4 + 80 * 0.4 + 80 * 0.2 = 84.
        assert_eq!(quality_score(&[stop], 6.0, 70, &settings), 84);
    }
}
