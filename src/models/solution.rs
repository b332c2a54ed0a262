//! Planning result, violation, and warning types.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use super::Route;
use crate::solver::SolveStatus;

/// A type of constraint violation found when re-evaluating a route.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ViolationType {
    /// Vehicle capacity exceeded.
    CapacityExceeded {
        /// Vehicle whose route is overloaded.
        vehicle_id: usize,
        /// Load that exceeded capacity.
        load: f64,
        /// Vehicle capacity.
        capacity: f64,
    },
    /// Service began outside the customer's delivery window.
    TimeWindowViolated {
        /// Customer identifier where violation occurred.
        customer_id: usize,
        /// Service start (clock minutes).
        start: f64,
        /// Window start.
        window_start: f64,
        /// Window end.
        window_end: f64,
    },
    /// Route duration exceeds the vehicle's maximum.
    MaxDurationExceeded {
        /// Vehicle id.
        vehicle_id: usize,
        /// Actual duration.
        duration: f64,
        /// Maximum allowed duration.
        max_duration: f64,
    },
}

/// A constraint violation in a reconstructed route.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Violation {
    /// The type of violation.
    pub kind: ViolationType,
}

impl Violation {
    /// Creates a new violation.
    pub fn new(kind: ViolationType) -> Self {
        Self { kind }
    }
}

/// A binary variable whose solved value was not within tolerance of 0 or 1.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NumericToleranceWarning {
    /// Variable name, e.g. `x[0,3]`.
    pub variable: String,
    /// Value reported by the solver.
    pub value: f64,
    /// Value it was rounded to.
    pub rounded: u8,
}

impl fmt::Display for NumericToleranceWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} = {} is not integral, rounded to {}",
            self.variable, self.value, self.rounded
        )
    }
}

/// The outcome of one planning run.
///
/// `assignments` holds the raw `x[vehicle,node]` map; `routes` the
/// reconstructed per-vehicle routes (vehicles serving nobody are omitted).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanningResult {
    status: SolveStatus,
    objective_value: Option<f64>,
    total_distance: f64,
    assignments: BTreeMap<String, u8>,
    routes: Vec<Route>,
    warnings: Vec<NumericToleranceWarning>,
    violations: Vec<Violation>,
}

impl PlanningResult {
    /// A result carrying only a status, e.g. for infeasible or timed-out runs.
    pub fn without_solution(status: SolveStatus) -> Self {
        Self {
            status,
            objective_value: None,
            total_distance: 0.0,
            assignments: BTreeMap::new(),
            routes: Vec::new(),
            warnings: Vec::new(),
            violations: Vec::new(),
        }
    }

    /// Creates a result from extracted parts.
    pub fn new(
        status: SolveStatus,
        objective_value: Option<f64>,
        assignments: BTreeMap<String, u8>,
        routes: Vec<Route>,
    ) -> Self {
        let total_distance = routes.iter().map(|r| r.total_distance()).sum();
        Self {
            status,
            objective_value,
            total_distance,
            assignments,
            routes,
            warnings: Vec::new(),
            violations: Vec::new(),
        }
    }

    /// Attaches tolerance warnings.
    pub fn with_warnings(mut self, warnings: Vec<NumericToleranceWarning>) -> Self {
        self.warnings = warnings;
        self
    }

    /// Attaches route violations.
    pub fn with_violations(mut self, violations: Vec<Violation>) -> Self {
        self.violations = violations;
        self
    }

    /// Overall solver status.
    pub fn status(&self) -> SolveStatus {
        self.status
    }

    /// Objective value reported by the model (sum of arc distances).
    pub fn objective_value(&self) -> Option<f64> {
        self.objective_value
    }

    /// Realized distance summed over all routes.
    pub fn total_distance(&self) -> f64 {
        self.total_distance
    }

    /// Raw assignment map keyed `x[vehicle,node]`.
    pub fn assignments(&self) -> &BTreeMap<String, u8> {
        &self.assignments
    }

    /// Routes of vehicles that serve at least one customer.
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// The route of a given vehicle, if it serves anyone.
    pub fn route_of(&self, vehicle_id: usize) -> Option<&Route> {
        self.routes.iter().find(|r| r.vehicle_id() == vehicle_id)
    }

    /// Tolerance warnings raised during extraction.
    pub fn warnings(&self) -> &[NumericToleranceWarning] {
        &self.warnings
    }

    /// Violations found re-evaluating the routes.
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// Total number of customers served across all routes.
    pub fn num_served(&self) -> usize {
        self.routes.iter().map(|r| r.len()).sum()
    }

    /// Renders the result as pretty-printed JSON.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
