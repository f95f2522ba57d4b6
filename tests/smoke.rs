use fieldroute::settings::OptimizationSettings;
use fieldroute::solver::optimize_routes;
use fieldroute::travel::{TravelError, TravelEstimate, TravelEstimator};
use fieldroute::types::{JobLocation, Vehicle};

struct NoProvider;

impl TravelEstimator for NoProvider {
    fn estimate(
        &self,
        _from: (f64, f64),
        _to: (f64, f64),
        _vehicle_class: &str,
    ) -> Result<TravelEstimate, TravelError> {
        Err(TravelError::NoRoute)
    }
}

#[test]
fn assigns_two_jobs_to_one_vehicle() {
    let jobs = vec![
        JobLocation::new("j1", "101 First St", 30.28, -97.74, 45, 4).unwrap(),
        JobLocation::new("j2", "202 Second St", 30.30, -97.75, 30, 2).unwrap(),
    ];
    let vehicles = vec![
        Vehicle::new("t1", "Truck 1", 30.27, -97.73)
            .unwrap()
            .with_costs(55.0, 0.6)
            .unwrap(),
    ];

    let routes = optimize_routes(
        &jobs,
        &vehicles,
        "2026-08-10",
        "08:00",
        &OptimizationSettings::default(),
        &NoProvider,
    );

    assert_eq!(routes.len(), 1);
    let route = &routes[0];
    assert_eq!(route.vehicle_id, "t1");
    assert_eq!(route.stops.len(), 2);
    assert_eq!(route.stops[0].stop_order, 1);
    assert_eq!(route.stops[1].stop_order, 2);
    assert!(route.total_distance > 0.0);
    assert!(route.total_cost > 0.0);
    assert_eq!(route.start_time, "08:00");
}
