//! Route evaluator that computes timing, load, and feasibility.

use crate::distance::DistanceMatrix;
use crate::models::{Route, RoutingInstance, Stop, Vehicle, Violation, ViolationType};

/// Slack allowed before a bound counts as violated.
const TOLERANCE: f64 = 1e-6;

/// Evaluates a visiting order for one vehicle: arrival and service times,
/// cumulative load, realized distance and duration, and violations of
/// capacity, delivery windows, and the route duration limit.
///
/// Vehicles leave the depot at the instance departure time and start service
/// as early as the window allows.
///
/// # Examples
///
/// ```
/// use u_routing_milp::models::{Coordinate, Customer, RoutingInstance, TimeWindow, Vehicle};
/// use u_routing_milp::distance::DistanceMatrix;
/// use u_routing_milp::evaluation::RouteEvaluator;
///
/// let tw = TimeWindow::new(0.0, 100.0).unwrap();
/// let instance = RoutingInstance::new(
///     Coordinate::new(0.0, 0.0),
///     vec![
///         Customer::new(1, Coordinate::new(3.0, 4.0), 10.0, tw, 5.0),
///         Customer::new(2, Coordinate::new(6.0, 8.0), 20.0, tw, 5.0),
///     ],
///     vec![Vehicle::new(0, 100.0, 480.0, 1.0)],
///     0.0,
/// ).unwrap();
/// let dm = DistanceMatrix::from_instance(&instance);
///
/// let evaluator = RouteEvaluator::new(&instance, &dm, &instance.vehicles()[0]);
/// let (route, violations) = evaluator.build_route(&[1, 2]);
/// assert_eq!(route.len(), 2);
/// assert!((route.total_distance() - 20.0).abs() < 1e-10);
/// assert!(violations.is_empty());
/// ```
pub struct RouteEvaluator<'a> {
    instance: &'a RoutingInstance,
    distances: &'a DistanceMatrix,
    vehicle: &'a Vehicle,
}

impl<'a> RouteEvaluator<'a> {
    /// Creates a new evaluator for the given problem data.
    pub fn new(
        instance: &'a RoutingInstance,
        distances: &'a DistanceMatrix,
        vehicle: &'a Vehicle,
    ) -> Self {
        Self {
            instance,
            distances,
            vehicle,
        }
    }

    /// Builds a route from customer nodes in visiting order.
    ///
    /// Returns the constructed route and any constraint violations found.
    pub fn build_route(&self, nodes: &[usize]) -> (Route, Vec<Violation>) {
        let mut route = Route::new(self.vehicle.id());
        let mut violations = Vec::new();
        let departure = self.instance.departure_time();
        let mut current_time = departure;
        let mut current_load = 0.0;
        let mut total_distance = 0.0;
        let mut prev = 0;

        for &node in nodes {
            let travel = self.distances.get(prev, node);
            total_distance += travel;
            let arrival = current_time + self.vehicle.travel_time(travel);

            let customer = self.instance.customer(node);
            let tw = customer.time_window();
            let start = arrival.max(tw.start());
            if start > tw.end() + TOLERANCE {
                violations.push(Violation::new(ViolationType::TimeWindowViolated {
                    customer_id: customer.id(),
                    start,
                    window_start: tw.start(),
                    window_end: tw.end(),
                }));
            }

            let departure_time = start + customer.service_duration();
            current_load += customer.demand();

            route.push_stop(Stop {
                customer_id: customer.id(),
                node,
                arrival_time: arrival,
                start_time: start,
                departure_time,
                load_after: current_load,
            });

            current_time = departure_time;
            prev = node;
        }

        if nodes.is_empty() {
            return (route, violations);
        }

        // Return to depot
        let return_travel = self.distances.get(prev, 0);
        total_distance += return_travel;
        let total_duration = current_time + self.vehicle.travel_time(return_travel) - departure;

        route.set_total_distance(total_distance);
        route.set_total_duration(total_duration);

        if current_load > self.vehicle.capacity() + TOLERANCE {
            violations.push(Violation::new(ViolationType::CapacityExceeded {
                vehicle_id: self.vehicle.id(),
                load: current_load,
                capacity: self.vehicle.capacity(),
            }));
        }

        if total_duration > self.vehicle.max_duration() + TOLERANCE {
            violations.push(Violation::new(ViolationType::MaxDurationExceeded {
                vehicle_id: self.vehicle.id(),
                duration: total_duration,
                max_duration: self.vehicle.max_duration(),
            }));
        }

        (route, violations)
    }
}
