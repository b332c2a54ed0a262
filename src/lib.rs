//! # u-routing-milp
//!
//! Exact formulation of the capacitated vehicle routing problem with time
//! windows (CVRPTW) as a mixed-integer linear program, solved through a
//! generic MILP solver interface.
//!
//! ## Modules
//!
//! - [`models`] — Domain model types (Customer, Vehicle, configuration, Route, result)
//! - [`distance`] — Straight-line distance matrix
//! - [`solver`] — Generic MILP solver contract and the `good_lp` backend
//! - [`model`] — CVRPTW model builder and structural pre-check
//! - [`extraction`] — Route reconstruction from solved values
//! - [`evaluation`] — Route feasibility checking
//! - [`planner`] — End-to-end planning run
//! - [`knapsack`] — 0/1 knapsack on the same solver contract
//! - [`error`] — Error types

pub mod distance;
pub mod error;
pub mod evaluation;
pub mod extraction;
pub mod knapsack;
pub mod model;
pub mod models;
pub mod planner;
pub mod solver;
