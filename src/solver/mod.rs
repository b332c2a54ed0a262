//! The generic MILP solver contract the model builder is written against.
//!
//! - [`MilpSolver`] — variable creation, linear constraints, objective,
//!   time-bounded solve and value queries
//! - [`LinearExpr`] — sparse linear expressions over [`VarId`] handles
//! - [`GoodLpSolver`] — backend solving with `good_lp`'s pure Rust microlp

mod backend;
mod expr;

use std::fmt;
use std::time::Duration;

use serde::Serialize;

use crate::error::SolverError;

pub use backend::GoodLpSolver;
pub use expr::LinearExpr;

/// Handle to a variable owned by a solver instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VarId(usize);

impl VarId {
    /// Wraps a dense variable index.
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    /// Dense index in creation order.
    pub fn index(&self) -> usize {
        self.0
    }
}

/// Domain of a decision variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarKind {
    /// Integer in {0, 1}; bounds are ignored.
    Binary,
    /// Real in `[lower, upper]`.
    Continuous,
}

/// Relation between a linear expression and its right-hand side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    /// `expr ≤ rhs`
    Leq,
    /// `expr = rhs`
    Eq,
    /// `expr ≥ rhs`
    Geq,
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Relation::Leq => "<=",
            Relation::Eq => "=",
            Relation::Geq => ">=",
        })
    }
}

/// Optimization direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Sense {
    #[default]
    Minimize,
    Maximize,
}

/// Outcome of a solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SolveStatus {
    /// Proven optimal.
    Optimal,
    /// Feasible, optimality not proven.
    Feasible,
    /// No assignment satisfies the constraints.
    Infeasible,
    /// The objective can be improved without bound.
    Unbounded,
    /// The time budget ran out.
    Timeout,
}

impl SolveStatus {
    /// Returns `true` if variable values describe an accepted solution.
    pub fn has_solution(&self) -> bool {
        matches!(self, SolveStatus::Optimal | SolveStatus::Feasible)
    }
}

impl fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SolveStatus::Optimal => "OPTIMAL",
            SolveStatus::Feasible => "FEASIBLE",
            SolveStatus::Infeasible => "INFEASIBLE",
            SolveStatus::Unbounded => "UNBOUNDED",
            SolveStatus::Timeout => "TIMEOUT",
        })
    }
}

/// A generic mixed-integer linear programming engine.
///
/// One instance holds exactly one model. Variables and constraints are only
/// ever added; values become available after [`solve`](Self::solve).
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use u_routing_milp::solver::{
///     GoodLpSolver, LinearExpr, MilpSolver, Relation, Sense, SolveStatus, VarKind,
/// };
///
/// let mut solver = GoodLpSolver::new();
/// let x = solver.create_variable(VarKind::Continuous, 0.0, 10.0);
/// let y = solver.create_variable(VarKind::Binary, 0.0, 1.0);
/// solver.add_linear_constraint(LinearExpr::sum([x, y]), Relation::Leq, 4.5);
/// solver.set_objective(LinearExpr::term(x, 1.0).with_term(y, 2.0), Sense::Maximize);
///
/// let status = solver.solve(Duration::from_secs(10)).unwrap();
/// assert_eq!(status, SolveStatus::Optimal);
/// assert!((solver.objective_value().unwrap() - 5.5).abs() < 1e-6);
/// ```
pub trait MilpSolver {
    /// Adds a variable. For [`VarKind::Binary`] the bounds are ignored.
    fn create_variable(&mut self, kind: VarKind, lower: f64, upper: f64) -> VarId;

    /// Adds `expr relation rhs`. A constant inside `expr` is moved to the
    /// right-hand side.
    fn add_linear_constraint(&mut self, expr: LinearExpr, relation: Relation, rhs: f64);

    /// Replaces the objective.
    fn set_objective(&mut self, expr: LinearExpr, sense: Sense);

    /// Solves the model, giving up after `time_budget`.
    ///
    /// Running out of time is reported as [`SolveStatus::Timeout`], not as an
    /// error.
    fn solve(&mut self, time_budget: Duration) -> Result<SolveStatus, SolverError>;

    /// Value of a variable in the last solution, if one exists.
    fn value(&self, var: VarId) -> Option<f64>;

    /// Objective value of the last solution, if one exists.
    fn objective_value(&self) -> Option<f64>;

    /// Number of variables created so far.
    fn num_variables(&self) -> usize;

    /// Number of constraints registered so far.
    fn num_constraints(&self) -> usize;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_display_and_serde() {
        assert_eq!(SolveStatus::Timeout.to_string(), "TIMEOUT");
        assert_eq!(
            serde_json::to_string(&SolveStatus::Optimal).expect("ser"),
            "\"OPTIMAL\""
        );
    }

    #[test]
    fn test_has_solution() {
        assert!(SolveStatus::Optimal.has_solution());
        assert!(SolveStatus::Feasible.has_solution());
        assert!(!SolveStatus::Infeasible.has_solution());
        assert!(!SolveStatus::Timeout.has_solution());
    }

    #[test]
    fn test_relation_display() {
        assert_eq!(Relation::Leq.to_string(), "<=");
        assert_eq!(Relation::Geq.to_string(), ">=");
    }
}
