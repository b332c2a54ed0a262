//! Domain model types for the routing problem.
//!
//! Customers with demands, delivery windows and service times, vehicles with
//! capacity, duration and speed, the planning configuration they are read
//! from, and the routes and result produced from a solved model.

mod config;
mod customer;
mod problem;
mod route;
mod solution;
mod vehicle;

pub use config::{
    CustomerConfig, FleetConfig, PlanningConfig, VehicleConfig, DEFAULT_TIME_LIMIT_SECS,
};
pub use customer::{Coordinate, Customer, TimeWindow};
pub use problem::RoutingInstance;
pub use route::{Route, Stop};
pub use solution::{NumericToleranceWarning, PlanningResult, Violation, ViolationType};
pub use vehicle::Vehicle;
