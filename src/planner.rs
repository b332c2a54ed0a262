//! End-to-end planning run.

use tracing::info;

use crate::distance::DistanceMatrix;
use crate::error::PlanningError;
use crate::extraction::SolutionExtractor;
use crate::model::ModelBuilder;
use crate::models::{PlanningConfig, PlanningResult, RoutingInstance};
use crate::solver::{GoodLpSolver, MilpSolver};

/// Validates `config`, builds the model into `solver`, solves it within the
/// configured time limit and extracts the routes.
///
/// Validation and pre-check failures are returned before the solver sees a
/// single variable. `INFEASIBLE`, `UNBOUNDED` and `TIMEOUT` outcomes are
/// reported through [`PlanningResult::status`], not as errors.
///
/// `solver` must be fresh; it ends up owning the whole model.
pub fn plan<S: MilpSolver + ?Sized>(
    config: &PlanningConfig,
    solver: &mut S,
) -> Result<PlanningResult, PlanningError> {
    let instance = RoutingInstance::from_config(config)?;
    let distances = DistanceMatrix::from_instance(&instance);

    let model = ModelBuilder::new(&instance, &distances).build(solver)?;
    let status = solver.solve(config.time_budget())?;

    let result = SolutionExtractor::new(&instance, &distances).extract(solver, &model, status);
    info!(
        %status,
        objective = ?result.objective_value(),
        routes = result.routes().len(),
        "planning finished"
    );
    Ok(result)
}

/// [`plan`] with a fresh [`GoodLpSolver`].
///
/// # Examples
///
/// ```
/// use u_routing_milp::models::PlanningConfig;
/// use u_routing_milp::planner::plan_with_default_solver;
/// use u_routing_milp::solver::SolveStatus;
///
/// let config = PlanningConfig::from_json_str(r#"{
///     "fleet": { "size": 1, "capacity": 100, "max_route_duration": 120, "speed": 1.0 },
///     "depot": [0, 0],
///     "customers": {
///         "1": { "coordinates": [3, 4], "delivery_amount": 40,
///                "delivery_window": [0, 60], "service_time": 5 }
///     }
/// }"#).unwrap();
/// let result = plan_with_default_solver(&config).unwrap();
/// assert_eq!(result.status(), SolveStatus::Optimal);
/// assert!((result.total_distance() - 10.0).abs() < 1e-6);
/// ```
pub fn plan_with_default_solver(config: &PlanningConfig) -> Result<PlanningResult, PlanningError> {
    plan(config, &mut GoodLpSolver::new())
}

/// [`plan`] on a JSON configuration string.
pub fn plan_json(config: &str) -> Result<PlanningResult, PlanningError> {
    let config = PlanningConfig::from_json_str(config)?;
    plan_with_default_solver(&config)
}
