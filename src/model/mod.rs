//! Mixed-integer formulation of the CVRPTW.
//!
//! - [`ModelBuilder`] — creates variables and constraints through the
//!   [`MilpSolver`](crate::solver::MilpSolver) contract
//! - [`precheck`] — rejects structurally infeasible instances up front
//! - [`RoutingModel`] — handles of the created variables

mod builder;
mod precheck;
mod variables;

pub use builder::ModelBuilder;
pub use precheck::precheck;
pub use variables::{assignment_name, NodeVars, PairVars, RoutingModel};
