//! Turns solved variable values back into vehicle routes.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::distance::DistanceMatrix;
use crate::evaluation::RouteEvaluator;
use crate::model::{assignment_name, RoutingModel};
use crate::models::{NumericToleranceWarning, PlanningResult, RoutingInstance};
use crate::solver::{MilpSolver, SolveStatus};

/// Distance from 0 or 1 within which a binary value counts as integral.
pub const DEFAULT_EPSILON: f64 = 1e-6;

/// Rounds a solved binary value.
///
/// Returns the integer and whether the value was outside `epsilon` of it.
///
/// # Examples
///
/// ```
/// use u_routing_milp::extraction::resolve_binary;
///
/// assert_eq!(resolve_binary(0.9999999, 1e-6), (1, false));
/// assert_eq!(resolve_binary(0.7, 1e-6), (1, true));
/// assert_eq!(resolve_binary(0.2, 1e-6), (0, true));
/// ```
pub fn resolve_binary(value: f64, epsilon: f64) -> (u8, bool) {
    if value.abs() <= epsilon {
        (0, false)
    } else if (value - 1.0).abs() <= epsilon {
        (1, false)
    } else {
        (u8::from(value >= 0.5), true)
    }
}

/// Reads a solved model and reconstructs the routes.
///
/// For every vehicle the customers it was assigned are ordered by their
/// solved start time and re-evaluated; times in the result are clock minutes
/// with service starting as early as the window allows.
pub struct SolutionExtractor<'a> {
    instance: &'a RoutingInstance,
    distances: &'a DistanceMatrix,
}

impl<'a> SolutionExtractor<'a> {
    /// Creates an extractor; binaries resolve within [`DEFAULT_EPSILON`].
    pub fn new(instance: &'a RoutingInstance, distances: &'a DistanceMatrix) -> Self {
        Self {
            instance,
            distances,
        }
    }

    /// Builds the result for a solve that ended with `status`.
    ///
    /// When the solver holds no values (infeasible, unbounded, or a timeout
    /// without an incumbent) only the status is reported.
    pub fn extract<S: MilpSolver + ?Sized>(
        &self,
        solver: &S,
        model: &RoutingModel,
        status: SolveStatus,
    ) -> PlanningResult {
        if solver.value(model.x(0, 0)).is_none() {
            debug!(%status, "no variable values to extract");
            return PlanningResult::without_solution(status);
        }
        let value = |var| solver.value(var).unwrap_or(0.0);

        let mut assignments = BTreeMap::new();
        let mut warnings = Vec::new();
        let mut routes = Vec::new();
        let mut violations = Vec::new();

        for (v, vehicle) in self.instance.vehicles().iter().enumerate() {
            let mut served = Vec::new();
            for n in 0..model.num_nodes() {
                let raw = value(model.x(v, n));
                let (bit, loose) = resolve_binary(raw, DEFAULT_EPSILON);
                let name = assignment_name(v, n);
                if loose {
                    let warning = NumericToleranceWarning {
                        variable: name.clone(),
                        value: raw,
                        rounded: bit,
                    };
                    warn!(%warning, "binary variable outside tolerance");
                    warnings.push(warning);
                }
                if bit == 1 && n > 0 {
                    served.push((n, value(model.t(v, n))));
                }
                assignments.insert(name, bit);
            }

            if served.is_empty() {
                continue;
            }
            served.sort_by(|a, b| {
                a.1.partial_cmp(&b.1)
                    .unwrap_or(Ordering::Equal)
                    .then(a.0.cmp(&b.0))
            });
            let order: Vec<usize> = served.into_iter().map(|(n, _)| n).collect();

            let evaluator = RouteEvaluator::new(self.instance, self.distances, vehicle);
            let (route, mut found) = evaluator.build_route(&order);
            for violation in &found {
                warn!(
                    vehicle = vehicle.id(),
                    ?violation,
                    "reconstructed route violates a constraint"
                );
            }
            violations.append(&mut found);
            routes.push(route);
        }

        PlanningResult::new(status, solver.objective_value(), assignments, routes)
            .with_warnings(warnings)
            .with_violations(violations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use crate::error::SolverError;
    use crate::model::ModelBuilder;
    use crate::models::{Coordinate, Customer, TimeWindow, Vehicle};
    use crate::solver::{LinearExpr, Relation, Sense, VarId, VarKind};

    /// Records the model shape and answers with fixed values.
    #[derive(Default)]
    struct ScriptedSolver {
        variables: usize,
        values: BTreeMap<VarId, f64>,
        solved: bool,
    }

    impl MilpSolver for ScriptedSolver {
        fn create_variable(&mut self, _kind: VarKind, _lower: f64, _upper: f64) -> VarId {
            self.variables += 1;
            VarId::new(self.variables - 1)
        }
        fn add_linear_constraint(&mut self, _expr: LinearExpr, _relation: Relation, _rhs: f64) {}
        fn set_objective(&mut self, _expr: LinearExpr, _sense: Sense) {}
        fn solve(&mut self, _time_budget: Duration) -> Result<SolveStatus, SolverError> {
            self.solved = true;
            Ok(SolveStatus::Feasible)
        }
        fn value(&self, var: VarId) -> Option<f64> {
            self.solved.then(|| self.values.get(&var).copied().unwrap_or(0.0))
        }
        fn objective_value(&self) -> Option<f64> {
            self.solved.then_some(99.0)
        }
        fn num_variables(&self) -> usize {
            self.variables
        }
        fn num_constraints(&self) -> usize {
            0
        }
    }

    fn instance() -> RoutingInstance {
        let tw = TimeWindow::new(0.0, 480.0).expect("valid");
        RoutingInstance::new(
            Coordinate::new(0.0, 0.0),
            vec![
                Customer::new(10, Coordinate::new(3.0, 4.0), 100.0, tw, 5.0),
                Customer::new(20, Coordinate::new(6.0, 8.0), 200.0, tw, 5.0),
                Customer::new(30, Coordinate::new(0.0, 5.0), 300.0, tw, 5.0),
            ],
            vec![
                Vehicle::new(0, 1000.0, 480.0, 1.0),
                Vehicle::new(1, 1000.0, 480.0, 1.0),
            ],
            0.0,
        )
        .expect("valid")
    }

    fn scripted(
        model: &RoutingModel,
        solver: &mut ScriptedSolver,
        x: &[(usize, usize, f64)],
        t: &[(usize, usize, f64)],
    ) {
        for &(v, n, val) in x {
            solver.values.insert(model.x(v, n), val);
        }
        for &(v, n, val) in t {
            solver.values.insert(model.t(v, n), val);
        }
    }

    #[test]
    fn test_orders_by_start_time() {
        let inst = instance();
        let dm = DistanceMatrix::from_instance(&inst);
        let mut solver = ScriptedSolver::default();
        let model = ModelBuilder::new(&inst, &dm).build(&mut solver).expect("builds");
        scripted(
            &model,
            &mut solver,
            &[(0, 0, 1.0), (0, 1, 1.0), (0, 2, 1.0), (1, 0, 1.0), (1, 3, 1.0)],
            &[(0, 1, 40.0), (0, 2, 12.0), (1, 3, 5.0)],
        );
        let status = solver.solve(Duration::from_secs(1)).expect("solves");
        let result = SolutionExtractor::new(&inst, &dm).extract(&solver, &model, status);

        assert_eq!(result.status(), SolveStatus::Feasible);
        assert_eq!(result.objective_value(), Some(99.0));
        assert_eq!(result.routes().len(), 2);
        assert_eq!(result.route_of(0).expect("route").customer_ids(), vec![20, 10]);
        assert_eq!(result.route_of(1).expect("route").customer_ids(), vec![30]);
        assert_eq!(result.route_of(0).expect("route").total_load(), 300.0);
        assert_eq!(result.assignments()["x[0,2]"], 1);
        assert_eq!(result.assignments()["x[1,1]"], 0);
        assert_eq!(result.assignments().len(), 2 * 4);
        assert!(result.warnings().is_empty());
        assert!(result.violations().is_empty());
    }

    #[test]
    fn test_loose_binary_warns_and_rounds() {
        let inst = instance();
        let dm = DistanceMatrix::from_instance(&inst);
        let mut solver = ScriptedSolver::default();
        let model = ModelBuilder::new(&inst, &dm).build(&mut solver).expect("builds");
        scripted(
            &model,
            &mut solver,
            &[(0, 0, 1.0), (0, 1, 0.97), (0, 2, 1.0), (0, 3, 1.0 - 1e-9), (1, 1, 0.03)],
            &[(0, 1, 1.0), (0, 2, 2.0), (0, 3, 3.0)],
        );
        let status = solver.solve(Duration::from_secs(1)).expect("solves");
        let result = SolutionExtractor::new(&inst, &dm).extract(&solver, &model, status);

        let names: Vec<&str> = result.warnings().iter().map(|w| w.variable.as_str()).collect();
        assert_eq!(names, vec!["x[0,1]", "x[1,1]"]);
        assert_eq!(result.assignments()["x[0,1]"], 1);
        assert_eq!(result.assignments()["x[1,1]"], 0);
        assert_eq!(result.num_served(), 3);
    }

    #[test]
    fn test_no_values() {
        let inst = instance();
        let dm = DistanceMatrix::from_instance(&inst);
        let mut solver = ScriptedSolver::default();
        let model = ModelBuilder::new(&inst, &dm).build(&mut solver).expect("builds");
        let result =
            SolutionExtractor::new(&inst, &dm).extract(&solver, &model, SolveStatus::Timeout);
        assert_eq!(result.status(), SolveStatus::Timeout);
        assert!(result.assignments().is_empty());
        assert!(result.routes().is_empty());
    }

    #[test]
    fn test_resolve_binary_edges() {
        assert_eq!(resolve_binary(1e-7, 1e-6), (0, false));
        assert_eq!(resolve_binary(-1e-7, 1e-6), (0, false));
        assert_eq!(resolve_binary(0.5, 1e-6), (1, true));
        assert_eq!(resolve_binary(0.5, 0.6), (0, false));
    }
}
