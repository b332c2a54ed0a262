//! Emits the CVRPTW variables, constraints and objective into a solver.

use tracing::debug;

use super::precheck::precheck;
use super::variables::{NodeVars, PairVars, RoutingModel};
use crate::distance::DistanceMatrix;
use crate::error::InfeasibleModelError;
use crate::models::{RoutingInstance, Vehicle};
use crate::solver::{LinearExpr, MilpSolver, Relation, Sense, VarKind};

/// Builds a mixed-integer CVRPTW model against any [`MilpSolver`].
///
/// Each step is a separate method so a model can be assembled piecewise;
/// [`build`](Self::build) runs the pre-check and then every step in a fixed
/// order, which makes construction deterministic.
///
/// Times inside the model are minutes after the fleet departure. Products of
/// binaries never appear in a constraint: arc distances and sequencing are
/// linearized with big-M terms.
///
/// # Examples
///
/// ```
/// use u_routing_milp::models::{Coordinate, Customer, RoutingInstance, TimeWindow, Vehicle};
/// use u_routing_milp::distance::DistanceMatrix;
/// use u_routing_milp::model::ModelBuilder;
/// use u_routing_milp::solver::{GoodLpSolver, MilpSolver};
///
/// let tw = TimeWindow::new(0.0, 480.0).unwrap();
/// let instance = RoutingInstance::new(
///     Coordinate::new(0.0, 0.0),
///     vec![Customer::new(1, Coordinate::new(3.0, 4.0), 10.0, tw, 5.0)],
///     vec![Vehicle::new(0, 100.0, 480.0, 1.0)],
///     0.0,
/// ).unwrap();
/// let dm = DistanceMatrix::from_instance(&instance);
///
/// let mut solver = GoodLpSolver::new();
/// let model = ModelBuilder::new(&instance, &dm).build(&mut solver).unwrap();
/// assert_eq!(model.num_variables(), solver.num_variables());
/// assert_eq!(model.num_nodes(), 2);
/// ```
pub struct ModelBuilder<'a> {
    instance: &'a RoutingInstance,
    distances: &'a DistanceMatrix,
}

impl<'a> ModelBuilder<'a> {
    /// Creates a builder over an instance and its distance matrix.
    pub fn new(instance: &'a RoutingInstance, distances: &'a DistanceMatrix) -> Self {
        debug_assert_eq!(instance.num_nodes(), distances.size());
        Self {
            instance,
            distances,
        }
    }

    fn num_nodes(&self) -> usize {
        self.instance.num_nodes()
    }

    fn customers(&self) -> std::ops::Range<usize> {
        1..self.num_nodes()
    }

    fn travel_time(&self, vehicle: &Vehicle, from: usize, to: usize) -> f64 {
        vehicle.travel_time(self.distances.get(from, to))
    }

    /// Runs the structural feasibility pre-check.
    pub fn precheck(&self) -> Result<(), InfeasibleModelError> {
        precheck(self.instance, self.distances)
    }

    /// Runs the pre-check, then creates every variable and constraint and
    /// sets the objective.
    ///
    /// On error nothing has been added to `solver`.
    pub fn build<S: MilpSolver + ?Sized>(
        &self,
        solver: &mut S,
    ) -> Result<RoutingModel, InfeasibleModelError> {
        self.precheck()?;

        let vars_before = solver.num_variables();
        let constraints_before = solver.num_constraints();

        let x = self.create_assignment_variables(solver);
        let d = self.create_arc_variables(solver);
        let t = self.create_time_variables(solver);
        let p = self.create_precedence_variables(solver);

        self.link_arc_to_assignment(solver, &x, &d);
        self.add_depot_constraints(solver, &x);
        self.add_assignment_constraints(solver, &x);
        self.add_capacity_constraints(solver, &x);
        self.add_time_window_and_sequencing_constraints(solver, &x, &t, &p);
        self.set_objective(solver, &d);

        let model = RoutingModel {
            assignment: x,
            arc: d,
            start_time: t,
            precedence: p,
            num_variables: solver.num_variables() - vars_before,
            num_constraints: solver.num_constraints() - constraints_before,
        };
        debug!(
            vehicles = self.instance.vehicles().len(),
            nodes = self.num_nodes(),
            variables = model.num_variables,
            constraints = model.num_constraints,
            "model built"
        );
        Ok(model)
    }

    /// One binary `x[v,n]` per vehicle and node, depot included.
    pub fn create_assignment_variables<S: MilpSolver + ?Sized>(&self, solver: &mut S) -> NodeVars {
        self.instance
            .vehicles()
            .iter()
            .map(|_| {
                (0..self.num_nodes())
                    .map(|_| solver.create_variable(VarKind::Binary, 0.0, 1.0))
                    .collect()
            })
            .collect()
    }

    /// One non-negative `d[v,j,k]` per vehicle and ordered node pair `j != k`.
    pub fn create_arc_variables<S: MilpSolver + ?Sized>(&self, solver: &mut S) -> PairVars {
        let n = self.num_nodes();
        let mut arcs = PairVars::new();
        for v in 0..self.instance.vehicles().len() {
            for j in 0..n {
                for k in (0..n).filter(|&k| k != j) {
                    let var = solver.create_variable(VarKind::Continuous, 0.0, f64::INFINITY);
                    arcs.insert((v, j, k), var);
                }
            }
        }
        arcs
    }

    /// One `t[v,n]` in `[0, max route duration of v]` per vehicle and node.
    pub fn create_time_variables<S: MilpSolver + ?Sized>(&self, solver: &mut S) -> NodeVars {
        self.instance
            .vehicles()
            .iter()
            .map(|vehicle| {
                let horizon = vehicle.max_duration();
                (0..self.num_nodes())
                    .map(|_| solver.create_variable(VarKind::Continuous, 0.0, horizon))
                    .collect()
            })
            .collect()
    }

    /// One binary `p[v,j,k]` per vehicle and customer pair `j < k`.
    pub fn create_precedence_variables<S: MilpSolver + ?Sized>(&self, solver: &mut S) -> PairVars {
        let mut order = PairVars::new();
        for v in 0..self.instance.vehicles().len() {
            for j in self.customers() {
                for k in (j + 1)..self.num_nodes() {
                    order.insert((v, j, k), solver.create_variable(VarKind::Binary, 0.0, 1.0));
                }
            }
        }
        order
    }

    /// Ties `d[v,j,k]` to `dist(j,k)·x[v,j]·x[v,k]`:
    ///
    /// ```text
    /// d ≤ dist·x[v,j]
    /// d ≤ dist·x[v,k]
    /// d ≥ dist·(x[v,j] + x[v,k] − 1)
    /// ```
    ///
    /// The distance itself is the tightest valid M.
    pub fn link_arc_to_assignment<S: MilpSolver + ?Sized>(
        &self,
        solver: &mut S,
        x: &NodeVars,
        d: &PairVars,
    ) {
        for (&(v, j, k), &arc) in d {
            let dist = self.distances.get(j, k);
            solver.add_linear_constraint(
                LinearExpr::from(arc).with_term(x[v][j], -dist),
                Relation::Leq,
                0.0,
            );
            solver.add_linear_constraint(
                LinearExpr::from(arc).with_term(x[v][k], -dist),
                Relation::Leq,
                0.0,
            );
            solver.add_linear_constraint(
                LinearExpr::from(arc)
                    .with_term(x[v][j], -dist)
                    .with_term(x[v][k], -dist),
                Relation::Geq,
                -dist,
            );
        }
    }

    /// `x[v,j] ≤ x[v,0]`: a vehicle serving anyone leaves the depot.
    pub fn add_depot_constraints<S: MilpSolver + ?Sized>(&self, solver: &mut S, x: &NodeVars) {
        for row in x {
            for j in self.customers() {
                solver.add_linear_constraint(
                    LinearExpr::from(row[j]).with_term(row[0], -1.0),
                    Relation::Leq,
                    0.0,
                );
            }
        }
    }

    /// `Σ_v x[v,j] = 1` for every customer.
    pub fn add_assignment_constraints<S: MilpSolver + ?Sized>(&self, solver: &mut S, x: &NodeVars) {
        for j in self.customers() {
            solver.add_linear_constraint(
                LinearExpr::sum(x.iter().map(|row| row[j])),
                Relation::Eq,
                1.0,
            );
        }
    }

    /// `Σ_j demand(j)·x[v,j] ≤ capacity(v)` for every vehicle.
    pub fn add_capacity_constraints<S: MilpSolver + ?Sized>(&self, solver: &mut S, x: &NodeVars) {
        for (vehicle, row) in self.instance.vehicles().iter().zip(x) {
            let mut load = LinearExpr::new();
            for j in self.customers() {
                load.add_term(row[j], self.instance.demand(j));
            }
            solver.add_linear_constraint(load, Relation::Leq, vehicle.capacity());
        }
    }

    /// Timing constraints of every vehicle `v` with duration limit `D`.
    ///
    /// For each customer `j` served by `v`:
    ///
    /// ```text
    /// t[v,j] ≥ travel(0,j)                      reachable from the depot
    /// start(j) ≤ t[v,j] ≤ end(j)                inside the delivery window
    /// t[v,0] ≥ t[v,j] + service(j) + travel(j,0) back at the depot in time
    /// ```
    ///
    /// For each customer pair `j < k` both served by `v`, exactly one of
    ///
    /// ```text
    /// t[v,k] ≥ t[v,j] + service(j) + travel(j,k)   when p[v,j,k] = 1
    /// t[v,j] ≥ t[v,k] + service(k) + travel(k,j)   when p[v,j,k] = 0
    /// ```
    ///
    /// is enforced. Every row is relaxed by big-M terms when the customers
    /// involved are not on `v`, so routes of other vehicles impose no order.
    pub fn add_time_window_and_sequencing_constraints<S: MilpSolver + ?Sized>(
        &self,
        solver: &mut S,
        x: &NodeVars,
        t: &NodeVars,
        p: &PairVars,
    ) {
        for (v, vehicle) in self.instance.vehicles().iter().enumerate() {
            let horizon = vehicle.max_duration();

            for j in self.customers() {
                let (window_start, window_end) = self.instance.relative_window(j);
                let outbound = self.travel_time(vehicle, 0, j);
                let inbound = self.travel_time(vehicle, j, 0);
                let service = self.instance.service_duration(j);

                solver.add_linear_constraint(
                    LinearExpr::from(t[v][j]).with_term(x[v][j], -outbound),
                    Relation::Geq,
                    0.0,
                );
                solver.add_linear_constraint(
                    LinearExpr::from(t[v][j]).with_term(x[v][j], -window_start),
                    Relation::Geq,
                    0.0,
                );
                // t ≤ end + (D − end)·(1 − x)
                solver.add_linear_constraint(
                    LinearExpr::from(t[v][j]).with_term(x[v][j], horizon - window_end),
                    Relation::Leq,
                    horizon,
                );
                // t[v,0] − t[v,j] ≥ service + inbound − M·(1 − x)
                let m = horizon + service + inbound;
                solver.add_linear_constraint(
                    LinearExpr::from(t[v][0])
                        .with_term(t[v][j], -1.0)
                        .with_term(x[v][j], -m),
                    Relation::Geq,
                    service + inbound - m,
                );
            }

            for j in self.customers() {
                for k in (j + 1)..self.num_nodes() {
                    let order = p[&(v, j, k)];

                    // j before k:
                    // t_k − t_j ≥ s_j + tt_jk − M·(1 − p) − M·(2 − x_j − x_k)
                    let lead = self.instance.service_duration(j) + self.travel_time(vehicle, j, k);
                    let m = horizon + lead;
                    solver.add_linear_constraint(
                        LinearExpr::from(t[v][k])
                            .with_term(t[v][j], -1.0)
                            .with_term(order, -m)
                            .with_term(x[v][j], -m)
                            .with_term(x[v][k], -m),
                        Relation::Geq,
                        lead - 3.0 * m,
                    );

                    // k before j: t_j − t_k ≥ s_k + tt_kj − M·p − M·(2 − x_j − x_k)
                    let lead = self.instance.service_duration(k) + self.travel_time(vehicle, k, j);
                    let m = horizon + lead;
                    solver.add_linear_constraint(
                        LinearExpr::from(t[v][j])
                            .with_term(t[v][k], -1.0)
                            .with_term(order, m)
                            .with_term(x[v][j], -m)
                            .with_term(x[v][k], -m),
                        Relation::Geq,
                        lead - 2.0 * m,
                    );
                }
            }
        }
    }

    /// Minimizes the sum of all arc-distance variables.
    pub fn set_objective<S: MilpSolver + ?Sized>(&self, solver: &mut S, d: &PairVars) {
        solver.set_objective(LinearExpr::sum(d.values().copied()), Sense::Minimize);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Coordinate, Customer, TimeWindow};
    use crate::solver::GoodLpSolver;

    fn instance(vehicles: usize, customers: usize) -> RoutingInstance {
        let tw = TimeWindow::new(0.0, 480.0).expect("valid");
        RoutingInstance::new(
            Coordinate::new(0.0, 0.0),
            (1..=customers)
                .map(|i| Customer::new(i, Coordinate::new(i as f64, 1.0), 10.0, tw, 5.0))
                .collect(),
            (0..vehicles)
                .map(|id| Vehicle::new(id, 1000.0, 480.0, 1.0))
                .collect(),
            0.0,
        )
        .expect("valid")
    }

    fn expected_variables(v: usize, n: usize) -> usize {
        v * (n + 1) + v * (n + 1) * n + v * (n + 1) + v * n * (n - 1) / 2
    }

    fn expected_constraints(v: usize, n: usize) -> usize {
        let arcs = 3 * v * (n + 1) * n;
        let depot = v * n;
        let assignment = n;
        let capacity = v;
        let timing = v * (4 * n + n * (n - 1));
        arcs + depot + assignment + capacity + timing
    }

    #[test]
    fn test_counts() {
        for &(v, n) in &[(1, 1), (1, 2), (2, 3), (3, 4)] {
            let inst = instance(v, n);
            let dm = DistanceMatrix::from_instance(&inst);
            let mut solver = GoodLpSolver::new();
            let model = ModelBuilder::new(&inst, &dm).build(&mut solver).expect("builds");
            assert_eq!(model.num_variables(), expected_variables(v, n), "v={v} n={n}");
            assert_eq!(model.num_constraints(), expected_constraints(v, n), "v={v} n={n}");
            assert_eq!(solver.num_variables(), model.num_variables());
        }
    }

    #[test]
    fn test_variable_layout() {
        let inst = instance(2, 3);
        let dm = DistanceMatrix::from_instance(&inst);
        let mut solver = GoodLpSolver::new();
        let model = ModelBuilder::new(&inst, &dm).build(&mut solver).expect("builds");
        assert_eq!(model.num_vehicles(), 2);
        assert_eq!(model.num_nodes(), 4);
        assert!(model.d(0, 1, 1).is_none());
        assert!(model.d(1, 3, 0).is_some());
        assert!(model.p(0, 1, 3).is_some());
        assert!(model.p(0, 3, 1).is_none());
        assert!(model.p(0, 0, 1).is_none());
        assert_eq!(model.arc_variables().count(), 2 * 4 * 3);
    }

    #[test]
    fn test_rebuild_is_identical() {
        let inst = instance(2, 3);
        let dm = DistanceMatrix::from_instance(&inst);
        let builder = ModelBuilder::new(&inst, &dm);
        let mut first = GoodLpSolver::new();
        let mut second = GoodLpSolver::new();
        let a = builder.build(&mut first).expect("builds");
        let b = builder.build(&mut second).expect("builds");
        assert_eq!(a, b);
    }

    #[test]
    fn test_precheck_failure_adds_nothing() {
        let tw = TimeWindow::new(0.0, 480.0).expect("valid");
        let inst = RoutingInstance::new(
            Coordinate::new(0.0, 0.0),
            vec![Customer::new(1, Coordinate::new(1.0, 1.0), 900.0, tw, 5.0)],
            vec![Vehicle::new(0, 500.0, 480.0, 1.0)],
            0.0,
        )
        .expect("valid");
        let dm = DistanceMatrix::from_instance(&inst);
        let mut solver = GoodLpSolver::new();
        let err = ModelBuilder::new(&inst, &dm).build(&mut solver).unwrap_err();
        assert!(matches!(err, InfeasibleModelError::DemandExceedsCapacity { .. }));
        assert_eq!(solver.num_variables(), 0);
        assert_eq!(solver.num_constraints(), 0);
    }

    #[test]
    fn test_operations_compose_piecewise() {
        let inst = instance(1, 2);
        let dm = DistanceMatrix::from_instance(&inst);
        let builder = ModelBuilder::new(&inst, &dm);
        let mut solver = GoodLpSolver::new();
        let x = builder.create_assignment_variables(&mut solver);
        let d = builder.create_arc_variables(&mut solver);
        assert_eq!(solver.num_variables(), 3 + 6);
        builder.link_arc_to_assignment(&mut solver, &x, &d);
        assert_eq!(solver.num_constraints(), 18);
        builder.add_assignment_constraints(&mut solver, &x);
        assert_eq!(solver.num_constraints(), 20);
    }
}
