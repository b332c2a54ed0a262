//! Handles of the decision variables of a built model.

use std::collections::BTreeMap;

use crate::solver::VarId;

/// Per-(vehicle, node) variables, indexed `[vehicle][node]`.
pub type NodeVars = Vec<Vec<VarId>>;

/// Per-(vehicle, node, node) variables keyed `(vehicle, j, k)`.
pub type PairVars = BTreeMap<(usize, usize, usize), VarId>;

/// Name of the assignment variable `x[vehicle,node]`.
pub fn assignment_name(vehicle: usize, node: usize) -> String {
    format!("x[{vehicle},{node}]")
}

/// All variables of a CVRPTW model plus its size.
///
/// - `x[v][n]` binary: vehicle `v` visits node `n`
/// - `d[(v, j, k)]` continuous: distance `v` covers between `j` and `k`
/// - `t[v][n]` continuous: service start at customer `n`, return time at the
///   depot (`n = 0`), minutes after departure
/// - `p[(v, j, k)]`, `j < k` customers, binary: `v` serves `j` before `k`
#[derive(Debug, Clone, PartialEq)]
pub struct RoutingModel {
    pub(crate) assignment: NodeVars,
    pub(crate) arc: PairVars,
    pub(crate) start_time: NodeVars,
    pub(crate) precedence: PairVars,
    pub(crate) num_variables: usize,
    pub(crate) num_constraints: usize,
}

impl RoutingModel {
    /// Assignment variable of `vehicle` at `node`.
    pub fn x(&self, vehicle: usize, node: usize) -> VarId {
        self.assignment[vehicle][node]
    }

    /// Arc-distance variable, `None` when `j == k`.
    pub fn d(&self, vehicle: usize, j: usize, k: usize) -> Option<VarId> {
        self.arc.get(&(vehicle, j, k)).copied()
    }

    /// Start-time variable of `vehicle` at `node`.
    pub fn t(&self, vehicle: usize, node: usize) -> VarId {
        self.start_time[vehicle][node]
    }

    /// Precedence variable for customers `j < k`.
    pub fn p(&self, vehicle: usize, j: usize, k: usize) -> Option<VarId> {
        self.precedence.get(&(vehicle, j, k)).copied()
    }

    /// Number of vehicles in the model.
    pub fn num_vehicles(&self) -> usize {
        self.assignment.len()
    }

    /// Number of nodes (depot included).
    pub fn num_nodes(&self) -> usize {
        self.assignment.first().map_or(0, Vec::len)
    }

    /// Variables registered while building.
    pub fn num_variables(&self) -> usize {
        self.num_variables
    }

    /// Constraints registered while building.
    pub fn num_constraints(&self) -> usize {
        self.num_constraints
    }

    /// Every arc-distance variable in key order.
    pub fn arc_variables(&self) -> impl Iterator<Item = VarId> + '_ {
        self.arc.values().copied()
    }
}
