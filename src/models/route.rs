//! Route and stop types.

use serde::Serialize;

/// A single stop at a customer within a route.
///
/// All times are clock minutes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stop {
    /// External customer identifier.
    pub customer_id: usize,
    /// Node index in the model.
    pub node: usize,
    /// Time the vehicle reaches the customer.
    pub arrival_time: f64,
    /// Time service begins (after any waiting).
    pub start_time: f64,
    /// Time the vehicle leaves (start + service duration).
    pub departure_time: f64,
    /// Cumulative load delivered after this stop.
    pub load_after: f64,
}

/// An ordered sequence of customer stops assigned to a single vehicle.
///
/// A route starts and ends at the depot (not stored in `stops`).
///
/// # Examples
///
/// ```
/// use u_routing_milp::models::{Route, Stop};
///
/// let mut route = Route::new(0);
/// route.push_stop(Stop {
///     customer_id: 4,
///     node: 1,
///     arrival_time: 10.0,
///     start_time: 12.0,
///     departure_time: 20.0,
///     load_after: 300.0,
/// });
/// assert_eq!(route.len(), 1);
/// assert_eq!(route.total_load(), 300.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Route {
    vehicle_id: usize,
    stops: Vec<Stop>,
    total_distance: f64,
    total_duration: f64,
    total_load: f64,
}

impl Route {
    /// Creates an empty route for the given vehicle.
    pub fn new(vehicle_id: usize) -> Self {
        Self {
            vehicle_id,
            stops: Vec::new(),
            total_distance: 0.0,
            total_duration: 0.0,
            total_load: 0.0,
        }
    }

    /// Appends a stop to the end of this route.
    pub fn push_stop(&mut self, stop: Stop) {
        self.total_load = stop.load_after;
        self.stops.push(stop);
    }

    /// Returns the vehicle assigned to this route.
    pub fn vehicle_id(&self) -> usize {
        self.vehicle_id
    }

    /// Returns the ordered stops.
    pub fn stops(&self) -> &[Stop] {
        &self.stops
    }

    /// Number of customer stops (excluding depot).
    pub fn len(&self) -> usize {
        self.stops.len()
    }

    /// Returns `true` if this route serves no customer.
    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    /// Customer identifiers in visit order.
    pub fn customer_ids(&self) -> Vec<usize> {
        self.stops.iter().map(|s| s.customer_id).collect()
    }

    /// Realized distance, depot to depot.
    pub fn total_distance(&self) -> f64 {
        self.total_distance
    }

    /// Realized duration, depot departure to depot return.
    pub fn total_duration(&self) -> f64 {
        self.total_duration
    }

    /// Total load delivered on this route.
    pub fn total_load(&self) -> f64 {
        self.total_load
    }

    /// Sets the total distance (used by evaluator).
    pub fn set_total_distance(&mut self, d: f64) {
        self.total_distance = d;
    }

    /// Sets the total duration (used by evaluator).
    pub fn set_total_duration(&mut self, d: f64) {
        self.total_duration = d;
    }
}
