//! Structural feasibility checks run before any variable is created.
//!
//! Each check is a necessary condition; passing all of them does not prove
//! the model feasible, but failing one gives a precise diagnostic instead of
//! a bare `INFEASIBLE` status from the solver.

use tracing::warn;

use crate::distance::DistanceMatrix;
use crate::error::InfeasibleModelError;
use crate::models::RoutingInstance;

/// Checks demand against capacity and windows against travel and duration.
///
/// # Examples
///
/// ```
/// use u_routing_milp::models::{Coordinate, Customer, RoutingInstance, TimeWindow, Vehicle};
/// use u_routing_milp::distance::DistanceMatrix;
/// use u_routing_milp::model::precheck;
/// use u_routing_milp::error::InfeasibleModelError;
///
/// let tw = TimeWindow::new(0.0, 480.0).unwrap();
/// let instance = RoutingInstance::new(
///     Coordinate::new(0.0, 0.0),
///     vec![
///         Customer::new(1, Coordinate::new(1.0, 0.0), 400.0, tw, 10.0),
///         Customer::new(2, Coordinate::new(0.0, 1.0), 400.0, tw, 10.0),
///     ],
///     vec![Vehicle::new(0, 500.0, 480.0, 1.0)],
///     0.0,
/// ).unwrap();
/// let dm = DistanceMatrix::from_instance(&instance);
/// assert!(matches!(
///     precheck(&instance, &dm),
///     Err(InfeasibleModelError::FleetCapacityExceeded { .. })
/// ));
/// ```
pub fn precheck(
    instance: &RoutingInstance,
    distances: &DistanceMatrix,
) -> Result<(), InfeasibleModelError> {
    let result = check_capacity(instance).and_then(|()| check_timing(instance, distances));
    if let Err(e) = &result {
        warn!(error = %e, "pre-check rejected instance");
    }
    result
}

fn check_capacity(instance: &RoutingInstance) -> Result<(), InfeasibleModelError> {
    let vehicles = instance.vehicles();
    let max_capacity = vehicles.iter().map(|v| v.capacity()).fold(0.0, f64::max);
    let fleet_capacity: f64 = vehicles.iter().map(|v| v.capacity()).sum();

    for c in instance.customers() {
        if c.demand() > max_capacity {
            return Err(InfeasibleModelError::DemandExceedsCapacity {
                customer: c.id(),
                demand: c.demand(),
                max_capacity,
            });
        }
    }

    let total_demand: f64 = instance.customers().iter().map(|c| c.demand()).sum();
    if total_demand > fleet_capacity {
        return Err(InfeasibleModelError::FleetCapacityExceeded {
            total_demand,
            fleet_capacity,
        });
    }
    Ok(())
}

fn check_timing(
    instance: &RoutingInstance,
    distances: &DistanceMatrix,
) -> Result<(), InfeasibleModelError> {
    let vehicles = instance.vehicles();
    let max_duration = vehicles.iter().map(|v| v.max_duration()).fold(0.0, f64::max);

    for node in 1..instance.num_nodes() {
        let customer = instance.customer(node);
        let (window_start, window_end) = instance.relative_window(node);
        let outbound = distances.get(0, node);
        let inbound = distances.get(node, 0);

        let earliest_arrival = vehicles
            .iter()
            .map(|v| v.travel_time(outbound))
            .fold(f64::INFINITY, f64::min);
        if window_end < earliest_arrival {
            return Err(InfeasibleModelError::WindowUnreachable {
                customer: customer.id(),
                window_end: customer.time_window().end(),
                earliest_arrival: instance.to_clock(earliest_arrival),
            });
        }

        let returns: Vec<(f64, f64)> = vehicles
            .iter()
            .map(|v| {
                let start = window_start.max(v.travel_time(outbound));
                let back = start + customer.service_duration() + v.travel_time(inbound);
                (back, v.max_duration())
            })
            .collect();
        if returns.iter().all(|&(back, limit)| back > limit) {
            let earliest_return = returns
                .iter()
                .map(|&(back, _)| back)
                .fold(f64::INFINITY, f64::min);
            return Err(InfeasibleModelError::RouteDurationExceeded {
                customer: customer.id(),
                earliest_return,
                max_duration,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Coordinate, Customer, TimeWindow, Vehicle};

    fn customer(id: usize, x: f64, demand: f64, window: (f64, f64), service: f64) -> Customer {
        Customer::new(
            id,
            Coordinate::new(x, 0.0),
            demand,
            TimeWindow::new(window.0, window.1).expect("valid"),
            service,
        )
    }

    fn run(
        customers: Vec<Customer>,
        vehicles: Vec<Vehicle>,
        departure: f64,
    ) -> Result<(), InfeasibleModelError> {
        let instance =
            RoutingInstance::new(Coordinate::new(0.0, 0.0), customers, vehicles, departure)
                .expect("valid");
        let dm = DistanceMatrix::from_instance(&instance);
        precheck(&instance, &dm)
    }

    #[test]
    fn test_passes() {
        let result = run(
            vec![customer(1, 10.0, 400.0, (0.0, 100.0), 5.0)],
            vec![Vehicle::new(0, 1000.0, 100.0, 1.0)],
            0.0,
        );
        assert!(result.is_ok());
    }

    #[test]
    fn test_single_demand_too_large() {
        let result = run(
            vec![customer(3, 10.0, 600.0, (0.0, 100.0), 5.0)],
            vec![Vehicle::new(0, 500.0, 100.0, 1.0), Vehicle::new(1, 400.0, 100.0, 1.0)],
            0.0,
        );
        assert_eq!(
            result,
            Err(InfeasibleModelError::DemandExceedsCapacity {
                customer: 3,
                demand: 600.0,
                max_capacity: 500.0
            })
        );
    }

    #[test]
    fn test_fleet_capacity() {
        let result = run(
            vec![
                customer(1, 10.0, 400.0, (0.0, 100.0), 5.0),
                customer(2, 20.0, 400.0, (0.0, 100.0), 5.0),
            ],
            vec![Vehicle::new(0, 500.0, 100.0, 1.0)],
            0.0,
        );
        assert_eq!(
            result,
            Err(InfeasibleModelError::FleetCapacityExceeded {
                total_demand: 800.0,
                fleet_capacity: 500.0
            })
        );
    }

    #[test]
    fn test_window_closes_before_arrival() {
        // 30 units at speed 1 from a 08:00 departure: earliest arrival 510.
        let result = run(
            vec![customer(4, 30.0, 10.0, (480.0, 500.0), 5.0)],
            vec![Vehicle::new(0, 100.0, 480.0, 1.0)],
            480.0,
        );
        assert_eq!(
            result,
            Err(InfeasibleModelError::WindowUnreachable {
                customer: 4,
                window_end: 500.0,
                earliest_arrival: 510.0
            })
        );
    }

    #[test]
    fn test_faster_vehicle_reaches_window() {
        let result = run(
            vec![customer(4, 30.0, 10.0, (0.0, 20.0), 5.0)],
            vec![Vehicle::new(0, 100.0, 480.0, 1.0), Vehicle::new(1, 100.0, 480.0, 2.0)],
            0.0,
        );
        assert!(result.is_ok());
    }

    #[test]
    fn test_return_exceeds_duration() {
        // Window opens at 90, service 20, 10 back: earliest return 120 > 100.
        let result = run(
            vec![customer(2, 10.0, 10.0, (90.0, 95.0), 20.0)],
            vec![Vehicle::new(0, 100.0, 100.0, 1.0)],
            0.0,
        );
        assert_eq!(
            result,
            Err(InfeasibleModelError::RouteDurationExceeded {
                customer: 2,
                earliest_return: 120.0,
                max_duration: 100.0
            })
        );
    }
}
