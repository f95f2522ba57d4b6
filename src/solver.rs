//! Route optimization pipeline (prioritize, cluster, construct, improve,
//! validate) and the per-day orchestrator.

use std::collections::HashSet;

use rayon::prelude::*;
use tracing::debug;

use crate::haversine;
use crate::schedule;
use crate::settings::OptimizationSettings;
use crate::travel::TravelEstimator;
use crate::types::{JobLocation, OptimizedRoute, Vehicle};

/// Jobs within this Haversine radius of a cluster's seed job join the
/// cluster.
pub const CLUSTER_RADIUS_MILES: f64 = 10.0;

/// Rough per-stop travel allowance used by feasibility validation, before
/// any real travel estimate exists.
const TRAVEL_ESTIMATE_MINUTES_PER_STOP: u32 = 30;

const SHRINK_FACTOR: f64 = 0.75;
const MAX_SHRINK_RETRIES: usize = 32;

/// Orders jobs before any geographic reasoning: priority descending, jobs
/// with a time window ahead of those without, then complexity ascending.
/// The sort is stable, so input order breaks remaining ties.
pub fn prioritize_jobs(jobs: &[JobLocation]) -> Vec<&JobLocation> {
    let mut ordered: Vec<&JobLocation> = jobs.iter().collect();
    ordered.sort_by(|a, b| {
        b.priority
            .cmp(&a.priority)
            .then_with(|| a.time_window.is_none().cmp(&b.time_window.is_none()))
            .then_with(|| a.complexity.rank().cmp(&b.complexity.rank()))
    });
    ordered
}

/// Greedy single-pass proximity clustering.
///
/// Each unprocessed job seeds a cluster and absorbs every remaining job
/// within `CLUSTER_RADIUS_MILES` of the seed. Membership depends only on
/// distance to the seed, so results follow the given iteration order.
/// Clusters come back sorted by summed member priority, highest first.
pub fn cluster_jobs<'a>(jobs: &[&'a JobLocation]) -> Vec<Vec<&'a JobLocation>> {
    let mut processed = vec![false; jobs.len()];
    let mut clusters: Vec<Vec<&JobLocation>> = Vec::new();

    for seed_idx in 0..jobs.len() {
        if processed[seed_idx] {
            continue;
        }
        processed[seed_idx] = true;
        let seed = jobs[seed_idx].coords();

        let near: Vec<bool> = jobs
            .par_iter()
            .enumerate()
            .map(|(idx, job)| {
                !processed[idx]
                    && haversine::distance_miles(seed, job.coords()) <= CLUSTER_RADIUS_MILES
            })
            .collect();

        let mut members = vec![jobs[seed_idx]];
        for (idx, is_near) in near.into_iter().enumerate() {
            if is_near {
                processed[idx] = true;
                members.push(jobs[idx]);
            }
        }
        clusters.push(members);
    }

    clusters.sort_by(|a, b| cluster_priority(b).cmp(&cluster_priority(a)));
    clusters
}

fn cluster_priority(cluster: &[&JobLocation]) -> u32 {
    cluster.iter().map(|job| u32::from(job.priority)).sum()
}

/// Nearest-neighbor construction weighted by distance and priority.
///
/// From the current location, picks the unvisited job minimizing
/// `distance_weight * distance + priority_weighting * (6 - priority)`;
/// the first candidate at the minimum wins. Returns a fresh ordering and
/// leaves the input untouched.
pub fn construct_route<'a>(
    start: (f64, f64),
    jobs: &[&'a JobLocation],
    settings: &OptimizationSettings,
) -> Vec<&'a JobLocation> {
    let mut remaining: Vec<&JobLocation> = jobs.to_vec();
    let mut ordered = Vec::with_capacity(remaining.len());
    let mut current = start;

    while !remaining.is_empty() {
        let mut best_idx = 0;
        let mut best_score = f64::INFINITY;
        for (idx, job) in remaining.iter().enumerate() {
            let distance = haversine::distance_miles(current, job.coords());
            let score = settings.distance_weight * distance
                + settings.priority_weighting * (6.0 - f64::from(job.priority));
            if score < best_score {
                best_score = score;
                best_idx = idx;
            }
        }

        let job = remaining.remove(best_idx);
        current = job.coords();
        ordered.push(job);
    }

    ordered
}

/// Total tour distance including both home-base legs.
pub fn route_distance(base: (f64, f64), route: &[&JobLocation]) -> f64 {
    let Some(first) = route.first() else {
        return 0.0;
    };

    let mut total = haversine::distance_miles(base, first.coords());
    for pair in route.windows(2) {
        total += haversine::distance_miles(pair[0].coords(), pair[1].coords());
    }
    total + haversine::distance_miles(route[route.len() - 1].coords(), base)
}

/// First-improvement 2-opt over the constructed sequence.
///
/// Scans pairs `1 <= i < len - 2`, `i + 1 < j < len` (adjacent pairs
/// skipped), reverses `[i..=j]` whenever that strictly shortens the tour
/// including both home-base legs, and repeats full passes until one
/// completes without an improvement. Routes shorter than 4 stops are
/// returned as-is.
pub fn improve_route<'a>(vehicle: &Vehicle, mut route: Vec<&'a JobLocation>) -> Vec<&'a JobLocation> {
    if route.len() < 4 {
        return route;
    }

    let base = vehicle.base_coords();
    let mut best_distance = route_distance(base, &route);

    loop {
        let mut improved = false;

        for i in 1..route.len() - 2 {
            for j in i + 2..route.len() {
                let mut candidate = route.clone();
                candidate[i..=j].reverse();

                let candidate_distance = route_distance(base, &candidate);
                if candidate_distance < best_distance {
                    route = candidate;
                    best_distance = candidate_distance;
                    improved = true;
                }
            }
        }

        if !improved {
            break;
        }
    }

    route
}

/// Feasibility check against the stop-count and working-minutes ceilings.
///
/// Travel is approximated at `TRAVEL_ESTIMATE_MINUTES_PER_STOP` per stop;
/// real travel times are only computed once a sequence is accepted.
/// `max_route_distance` is carried in settings but not yet enforced here.
pub fn validate_route(route: &[&JobLocation], settings: &OptimizationSettings) -> bool {
    if route.len() > settings.max_stops_per_route {
        return false;
    }

    let service_minutes: u32 = route.iter().map(|job| job.duration_minutes).sum();
    let travel_estimate = TRAVEL_ESTIMATE_MINUTES_PER_STOP * route.len() as u32;
    if service_minutes + travel_estimate > settings.max_route_minutes
        && !settings.allow_overtime_routes
    {
        return false;
    }

    true
}

/// Construct-improve-validate with the shrink-and-retry policy.
///
/// On a failed validation the candidate list is cut to the first 75%
/// (integer floor) of the just-built ordering and the build repeats. An
/// empty candidate list means the (vehicle, cluster) pairing yields no
/// route.
fn build_feasible_route<'a>(
    vehicle: &Vehicle,
    jobs: &[&'a JobLocation],
    settings: &OptimizationSettings,
) -> Option<Vec<&'a JobLocation>> {
    let mut candidates: Vec<&JobLocation> = jobs.to_vec();

    for _ in 0..MAX_SHRINK_RETRIES {
        if candidates.is_empty() {
            return None;
        }

        let constructed = construct_route(vehicle.base_coords(), &candidates, settings);
        let improved = improve_route(vehicle, constructed);
        if validate_route(&improved, settings) {
            return Some(improved);
        }

        let keep = (improved.len() as f64 * SHRINK_FACTOR).floor() as usize;
        candidates = improved[..keep].to_vec();
    }

    None
}

/// Assigns jobs to vehicles for one operating day.
///
/// First-fit over vehicles (outer) and priority-ordered clusters (inner):
/// each pairing may contribute at most one route, a vehicle may collect
/// routes from several clusters, and accepted jobs are excluded from every
/// later pairing. There is no global re-balancing across vehicles. Zero
/// jobs or zero vehicles is a valid input and yields an empty plan.
pub fn optimize_routes<E: TravelEstimator>(
    jobs: &[JobLocation],
    vehicles: &[Vehicle],
    route_date: &str,
    start_time: &str,
    settings: &OptimizationSettings,
    estimator: &E,
) -> Vec<OptimizedRoute> {
    if jobs.is_empty() || vehicles.is_empty() {
        return Vec::new();
    }

    let prioritized = prioritize_jobs(jobs);
    let clusters = cluster_jobs(&prioritized);

    let mut assigned: HashSet<&str> = HashSet::new();
    let mut routes = Vec::new();

    for vehicle in vehicles {
        for cluster in &clusters {
            let available: Vec<&JobLocation> = cluster
                .iter()
                .copied()
                .filter(|job| !assigned.contains(job.id.as_str()))
                .collect();
            if available.is_empty() {
                continue;
            }

            let Some(ordered) = build_feasible_route(vehicle, &available, settings) else {
                continue;
            };

            for job in &ordered {
                assigned.insert(job.id.as_str());
            }

            let route = schedule::build_timed_route(
                vehicle,
                &ordered,
                route_date,
                start_time,
                settings,
                estimator,
            );
            debug!(
                vehicle = %vehicle.id,
                stops = route.stops.len(),
                score = route.quality_score,
                "route accepted"
            );
            routes.push(route);
        }
    }

    routes
}
