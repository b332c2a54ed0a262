//! Error types for validation, pre-check infeasibility, and solving.

use thiserror::Error;

/// Malformed planning input, rejected before any model is built.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("fleet contains no vehicles")]
    EmptyFleet,

    #[error("fleet given both as `fleet` and as explicit `vehicles`")]
    AmbiguousFleet,

    #[error("customer table is empty")]
    NoCustomers,

    #[error("vehicle {vehicle}: capacity must be finite and non-negative, got {value}")]
    InvalidCapacity { vehicle: usize, value: f64 },

    #[error("vehicle {vehicle}: route duration limit must be finite and positive, got {value}")]
    InvalidRouteDuration { vehicle: usize, value: f64 },

    #[error("vehicle {vehicle}: speed must be finite and positive, got {value}")]
    InvalidSpeed { vehicle: usize, value: f64 },

    #[error("departure time must be finite, got {0}")]
    InvalidDepartureTime(f64),

    #[error("depot coordinate is not finite")]
    InvalidDepot,

    #[error("customer {customer}: coordinate is not finite")]
    InvalidCoordinate { customer: usize },

    #[error("customer {customer}: delivery amount must be finite and non-negative, got {value}")]
    InvalidDemand { customer: usize, value: f64 },

    #[error("customer {customer}: service duration must be finite and non-negative, got {value}")]
    InvalidServiceDuration { customer: usize, value: f64 },

    #[error("customer {customer}: delivery window ends ({end}) before it starts ({start})")]
    InvalidWindow { customer: usize, start: f64, end: f64 },
}

/// The instance cannot be satisfied, found before the solver is invoked.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InfeasibleModelError {
    #[error("customer {customer}: demand {demand} exceeds the largest vehicle capacity {max_capacity}")]
    DemandExceedsCapacity {
        customer: usize,
        demand: f64,
        max_capacity: f64,
    },

    #[error("total demand {total_demand} exceeds total fleet capacity {fleet_capacity}")]
    FleetCapacityExceeded {
        total_demand: f64,
        fleet_capacity: f64,
    },

    #[error("customer {customer}: window closes at {window_end} but the earliest arrival is {earliest_arrival}")]
    WindowUnreachable {
        customer: usize,
        window_end: f64,
        earliest_arrival: f64,
    },

    #[error("customer {customer}: earliest depot return after {earliest_return} min exceeds every route duration limit (longest {max_duration} min)")]
    RouteDurationExceeded {
        customer: usize,
        earliest_return: f64,
        max_duration: f64,
    },
}

/// Failure of the solver backend itself, as opposed to a solve outcome.
#[derive(Debug, Error)]
pub enum SolverError {
    #[error("failed to start solver worker: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("solver worker terminated without a result")]
    WorkerLost,

    #[error("solver backend error: {0}")]
    Backend(String),
}

/// Failure of a knapsack solve.
#[derive(Debug, Error)]
pub enum KnapsackError {
    #[error("item name {0:?} appears more than once")]
    DuplicateItem(String),

    #[error(transparent)]
    Solver(#[from] SolverError),
}

/// Any failure of the end-to-end planning pipeline.
#[derive(Debug, Error)]
pub enum PlanningError {
    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Infeasible(#[from] InfeasibleModelError),

    #[error(transparent)]
    Solver(#[from] SolverError),
}
