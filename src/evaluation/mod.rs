//! Route feasibility checking for reconstructed routes.

mod evaluator;

pub use evaluator::RouteEvaluator;
