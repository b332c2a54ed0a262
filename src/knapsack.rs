//! 0/1 knapsack through the same [`MilpSolver`] contract.
//!
//! A small, fully known problem that exercises binaries, a `≤` row and a
//! maximizing objective end to end, independent of the routing model.

use std::collections::{BTreeMap, BTreeSet};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::KnapsackError;
use crate::extraction::{resolve_binary, DEFAULT_EPSILON};
use crate::solver::{LinearExpr, MilpSolver, Relation, Sense, SolveStatus, VarKind};

/// An item that may be packed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnapsackItem {
    pub name: String,
    pub value: f64,
    pub weight: f64,
}

impl KnapsackItem {
    /// Creates an item.
    pub fn new(name: impl Into<String>, value: f64, weight: f64) -> Self {
        Self {
            name: name.into(),
            value,
            weight,
        }
    }
}

/// Outcome of a knapsack solve.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KnapsackResult {
    pub status: SolveStatus,
    pub total_value: Option<f64>,
    /// Solved value of each item's decision variable.
    pub decision_variables: BTreeMap<String, f64>,
    /// Names of packed items in input order.
    pub selected: Vec<String>,
}

/// Chooses the most valuable subset of `items` whose weight fits `capacity`.
///
/// Item names key the result, so they must be unique; a repeated name is
/// rejected before the solver sees any variable.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use u_routing_milp::knapsack::{solve_knapsack, KnapsackItem};
/// use u_routing_milp::solver::GoodLpSolver;
///
/// let items = [KnapsackItem::new("A", 10.0, 8.0), KnapsackItem::new("B", 6.0, 4.0)];
/// let budget = Duration::from_secs(10);
/// let result = solve_knapsack(&items, 5.0, &mut GoodLpSolver::new(), budget).unwrap();
/// assert_eq!(result.selected, vec!["B"]);
/// ```
pub fn solve_knapsack<S: MilpSolver + ?Sized>(
    items: &[KnapsackItem],
    capacity: f64,
    solver: &mut S,
    time_budget: Duration,
) -> Result<KnapsackResult, KnapsackError> {
    let mut names = BTreeSet::new();
    if let Some(item) = items.iter().find(|item| !names.insert(item.name.as_str())) {
        return Err(KnapsackError::DuplicateItem(item.name.clone()));
    }

    let vars: Vec<_> = items
        .iter()
        .map(|_| solver.create_variable(VarKind::Binary, 0.0, 1.0))
        .collect();

    let mut weight = LinearExpr::new();
    let mut value = LinearExpr::new();
    for (item, &var) in items.iter().zip(&vars) {
        weight.add_term(var, item.weight);
        value.add_term(var, item.value);
    }
    solver.add_linear_constraint(weight, Relation::Leq, capacity);
    solver.set_objective(value, Sense::Maximize);

    let status = solver.solve(time_budget)?;
    debug!(%status, items = items.len(), "knapsack solved");

    let mut decision_variables = BTreeMap::new();
    let mut selected = Vec::new();
    for (item, &var) in items.iter().zip(&vars) {
        let Some(v) = solver.value(var) else {
            continue;
        };
        decision_variables.insert(item.name.clone(), v);
        if resolve_binary(v, DEFAULT_EPSILON).0 == 1 {
            selected.push(item.name.clone());
        }
    }

    Ok(KnapsackResult {
        status,
        total_value: solver.objective_value(),
        decision_variables,
        selected,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::GoodLpSolver;

    const BUDGET: Duration = Duration::from_secs(30);

    fn items() -> Vec<KnapsackItem> {
        vec![
            KnapsackItem::new("A", 10.0, 8.0),
            KnapsackItem::new("B", 6.0, 4.0),
            KnapsackItem::new("C", 6.0, 6.0),
        ]
    }

    fn solve(items: &[KnapsackItem], capacity: f64) -> KnapsackResult {
        solve_knapsack(items, capacity, &mut GoodLpSolver::new(), BUDGET).expect("solves")
    }

    #[test]
    fn test_two_light_items_beat_one_heavy() {
        let result = solve(&items(), 10.0);
        assert_eq!(result.status, SolveStatus::Optimal);
        assert_eq!(result.selected, vec!["B", "C"]);
        assert!((result.total_value.expect("value") - 12.0).abs() < 1e-6);
        assert!(result.decision_variables["A"].abs() < 1e-6);
    }

    #[test]
    fn test_everything_fits() {
        let result = solve(&items(), 100.0);
        assert_eq!(result.selected, vec!["A", "B", "C"]);
        assert!((result.total_value.expect("value") - 22.0).abs() < 1e-6);
    }

    #[test]
    fn test_nothing_fits() {
        let result = solve(&items(), 3.0);
        assert!(result.selected.is_empty());
        assert!(result.total_value.expect("value").abs() < 1e-6);
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let mut items = items();
        items.push(KnapsackItem::new("B", 1.0, 1.0));
        let mut solver = GoodLpSolver::new();
        let err = solve_knapsack(&items, 10.0, &mut solver, BUDGET).unwrap_err();
        assert!(matches!(err, KnapsackError::DuplicateItem(ref name) if name == "B"));
        assert_eq!(solver.num_variables(), 0);
    }

    #[test]
    fn test_output_shape() {
        let result = solve(&items(), 10.0);
        let json = serde_json::to_value(&result).expect("ser");
        assert_eq!(json["status"], "OPTIMAL");
        assert_eq!(json["decision_variables"].as_object().map(|o| o.len()), Some(3));
    }
}
