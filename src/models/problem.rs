//! Validated routing instance.

use crate::error::ValidationError;

use super::{Coordinate, Customer, PlanningConfig, TimeWindow, Vehicle};

/// A validated CVRPTW instance with node numbering fixed.
///
/// Node 0 is the depot, nodes `1..=N` are the customers in ascending
/// identifier order. Model times are minutes after `departure_time`.
///
/// # Examples
///
/// ```
/// use u_routing_milp::models::{
///     Coordinate, CustomerConfig, FleetConfig, PlanningConfig, RoutingInstance, TimeWindow,
/// };
///
/// let fleet = FleetConfig { size: 2, capacity: 100.0, max_route_duration: 60.0, speed: 1.0 };
/// let config = PlanningConfig::new(fleet, Coordinate::new(0.0, 0.0)).with_customer(
///     9,
///     CustomerConfig {
///         coordinates: Coordinate::new(3.0, 4.0),
///         delivery_amount: 10.0,
///         delivery_window: TimeWindow::new(0.0, 30.0).unwrap(),
///         service_time: 5.0,
///     },
/// );
/// let instance = RoutingInstance::from_config(&config).unwrap();
/// assert_eq!(instance.num_nodes(), 2);
/// assert_eq!(instance.customer(1).id(), 9);
/// assert_eq!(instance.vehicles().len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct RoutingInstance {
    depot: Coordinate,
    customers: Vec<Customer>,
    vehicles: Vec<Vehicle>,
    departure_time: f64,
}

impl RoutingInstance {
    /// Builds an instance from a configuration, validating every field.
    pub fn from_config(config: &PlanningConfig) -> Result<Self, ValidationError> {
        let vehicles: Vec<Vehicle> = match (&config.fleet, config.vehicles.is_empty()) {
            (Some(_), false) => return Err(ValidationError::AmbiguousFleet),
            (Some(fleet), true) => (0..fleet.size)
                .map(|id| Vehicle::new(id, fleet.capacity, fleet.max_route_duration, fleet.speed))
                .collect(),
            (None, _) => config
                .vehicles
                .iter()
                .enumerate()
                .map(|(id, v)| Vehicle::new(id, v.capacity, v.max_route_duration, v.speed))
                .collect(),
        };

        let customers: Vec<Customer> = config
            .customers
            .iter()
            .map(|(&id, row)| {
                Customer::new(
                    id,
                    row.coordinates,
                    row.delivery_amount,
                    row.delivery_window,
                    row.service_time,
                )
            })
            .collect();

        Self::new(config.depot, customers, vehicles, config.departure_time)
    }

    /// Builds an instance from already constructed parts.
    ///
    /// Customers are numbered in the given order.
    pub fn new(
        depot: Coordinate,
        customers: Vec<Customer>,
        vehicles: Vec<Vehicle>,
        departure_time: f64,
    ) -> Result<Self, ValidationError> {
        if vehicles.is_empty() {
            return Err(ValidationError::EmptyFleet);
        }
        if customers.is_empty() {
            return Err(ValidationError::NoCustomers);
        }
        if !depot.is_finite() {
            return Err(ValidationError::InvalidDepot);
        }
        if !departure_time.is_finite() {
            return Err(ValidationError::InvalidDepartureTime(departure_time));
        }
        for v in &vehicles {
            validate_vehicle(v)?;
        }
        for c in &customers {
            validate_customer(c)?;
        }

        Ok(Self {
            depot,
            customers,
            vehicles,
            departure_time,
        })
    }

    /// Depot location (node 0).
    pub fn depot(&self) -> Coordinate {
        self.depot
    }

    /// Customers in node order (node `n` is `customers()[n - 1]`).
    pub fn customers(&self) -> &[Customer] {
        &self.customers
    }

    /// The customer at node `node` (1-based).
    ///
    /// # Panics
    ///
    /// Panics if `node` is 0 or out of range.
    pub fn customer(&self, node: usize) -> &Customer {
        &self.customers[node - 1]
    }

    /// The available vehicles.
    pub fn vehicles(&self) -> &[Vehicle] {
        &self.vehicles
    }

    /// Number of customers (excluding depot).
    pub fn num_customers(&self) -> usize {
        self.customers.len()
    }

    /// Number of nodes including the depot.
    pub fn num_nodes(&self) -> usize {
        self.customers.len() + 1
    }

    /// Clock minute at which vehicles leave the depot.
    pub fn departure_time(&self) -> f64 {
        self.departure_time
    }

    /// Location of a node, depot included.
    pub fn location(&self, node: usize) -> Coordinate {
        if node == 0 {
            self.depot
        } else {
            self.customer(node).location()
        }
    }

    /// Locations of all nodes in node order.
    pub fn locations(&self) -> Vec<Coordinate> {
        (0..self.num_nodes()).map(|n| self.location(n)).collect()
    }

    /// Demand of a node; the depot has none.
    pub fn demand(&self, node: usize) -> f64 {
        if node == 0 {
            0.0
        } else {
            self.customer(node).demand()
        }
    }

    /// Service duration of a node; the depot has none.
    pub fn service_duration(&self, node: usize) -> f64 {
        if node == 0 {
            0.0
        } else {
            self.customer(node).service_duration()
        }
    }

    /// Delivery window of a customer node relative to departure, in model
    /// minutes. The start is clamped at zero.
    pub fn relative_window(&self, node: usize) -> (f64, f64) {
        let tw = self.customer(node).time_window();
        (
            (tw.start() - self.departure_time).max(0.0),
            tw.end() - self.departure_time,
        )
    }

    /// Converts a model time (minutes after departure) to clock minutes.
    pub fn to_clock(&self, model_time: f64) -> f64 {
        model_time + self.departure_time
    }
}

fn validate_vehicle(v: &Vehicle) -> Result<(), ValidationError> {
    if !v.capacity().is_finite() || v.capacity() < 0.0 {
        return Err(ValidationError::InvalidCapacity {
            vehicle: v.id(),
            value: v.capacity(),
        });
    }
    if !v.max_duration().is_finite() || v.max_duration() <= 0.0 {
        return Err(ValidationError::InvalidRouteDuration {
            vehicle: v.id(),
            value: v.max_duration(),
        });
    }
    if !v.speed().is_finite() || v.speed() <= 0.0 {
        return Err(ValidationError::InvalidSpeed {
            vehicle: v.id(),
            value: v.speed(),
        });
    }
    Ok(())
}

fn validate_customer(c: &Customer) -> Result<(), ValidationError> {
    if !c.location().is_finite() {
        return Err(ValidationError::InvalidCoordinate { customer: c.id() });
    }
    if !c.demand().is_finite() || c.demand() < 0.0 {
        return Err(ValidationError::InvalidDemand {
            customer: c.id(),
            value: c.demand(),
        });
    }
    if !c.service_duration().is_finite() || c.service_duration() < 0.0 {
        return Err(ValidationError::InvalidServiceDuration {
            customer: c.id(),
            value: c.service_duration(),
        });
    }
    let tw = c.time_window();
    if TimeWindow::new(tw.start(), tw.end()).is_none() {
        return Err(ValidationError::InvalidWindow {
            customer: c.id(),
            start: tw.start(),
            end: tw.end(),
        });
    }
    Ok(())
}
