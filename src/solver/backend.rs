//! [`MilpSolver`] backed by `good_lp` with the pure Rust microlp engine.

use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use good_lp::{
    constraint, microlp, variable, Expression, ProblemVariables, ResolutionError, Solution,
    SolverModel, Variable,
};
use tracing::{debug, info, warn};

use super::{LinearExpr, MilpSolver, Relation, Sense, SolveStatus, VarId, VarKind};
use crate::error::SolverError;

#[derive(Debug, Clone)]
struct VariableDef {
    kind: VarKind,
    lower: f64,
    upper: f64,
}

#[derive(Debug, Clone)]
struct ConstraintDef {
    expr: LinearExpr,
    relation: Relation,
    rhs: f64,
}

/// Everything needed to hand the model to the backend.
#[derive(Debug, Clone, Default)]
struct ModelArena {
    variables: Vec<VariableDef>,
    constraints: Vec<ConstraintDef>,
    objective: LinearExpr,
    sense: Sense,
}

enum Outcome {
    Solved(Vec<f64>),
    Unsolved(SolveStatus),
}

/// A solver instance owning one model.
///
/// Variables and constraints are recorded as they are added and translated
/// into a `good_lp` problem when [`solve`](MilpSolver::solve) is called. The
/// backend runs on a worker thread so the time budget can be enforced.
///
/// The microlp engine cannot be interrupted. When the budget runs out the
/// solve reports [`SolveStatus::Timeout`], no values are committed, and the
/// worker keeps computing on its own copy of the model until the engine
/// returns. Its handle stays with the solver: poll it with
/// [`has_running_worker`](Self::has_running_worker) or wait for it with
/// [`join_worker`](Self::join_worker). Dropping the solver detaches it.
#[derive(Debug, Default)]
pub struct GoodLpSolver {
    arena: ModelArena,
    values: Option<Vec<f64>>,
    objective_value: Option<f64>,
    timed_out_worker: Option<JoinHandle<()>>,
}

impl GoodLpSolver {
    /// Creates an empty model.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the worker of a timed-out solve is still computing.
    pub fn has_running_worker(&self) -> bool {
        self.timed_out_worker
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Blocks until the worker of a timed-out solve has finished.
    ///
    /// Its late result is discarded. Returns immediately when no solve
    /// timed out.
    pub fn join_worker(&mut self) -> Result<(), SolverError> {
        match self.timed_out_worker.take() {
            Some(handle) => handle.join().map_err(|_| SolverError::WorkerLost),
            None => Ok(()),
        }
    }
}

impl MilpSolver for GoodLpSolver {
    fn create_variable(&mut self, kind: VarKind, lower: f64, upper: f64) -> VarId {
        let id = VarId::new(self.arena.variables.len());
        self.arena.variables.push(VariableDef { kind, lower, upper });
        id
    }

    fn add_linear_constraint(&mut self, mut expr: LinearExpr, relation: Relation, rhs: f64) {
        let rhs = rhs - expr.take_constant();
        self.arena.constraints.push(ConstraintDef {
            expr,
            relation,
            rhs,
        });
    }

    fn set_objective(&mut self, expr: LinearExpr, sense: Sense) {
        self.arena.objective = expr;
        self.arena.sense = sense;
    }

    fn solve(&mut self, time_budget: Duration) -> Result<SolveStatus, SolverError> {
        self.values = None;
        self.objective_value = None;
        debug!(
            variables = self.arena.variables.len(),
            constraints = self.arena.constraints.len(),
            ?time_budget,
            "solving model"
        );

        if self.has_running_worker() {
            warn!("previous timed-out worker still running, detaching it");
        }
        self.timed_out_worker = None;

        let arena = self.arena.clone();
        let (tx, rx) = mpsc::channel();
        let started = Instant::now();
        let handle = thread::Builder::new()
            .name("milp-solve".into())
            .spawn(move || {
                // The receiver is gone once the budget ran out.
                let _ = tx.send(run_backend(&arena));
            })?;

        let outcome = match rx.recv_timeout(time_budget) {
            Ok(outcome) => {
                handle.join().map_err(|_| SolverError::WorkerLost)?;
                outcome?
            }
            Err(RecvTimeoutError::Timeout) => {
                warn!(?time_budget, "time budget exhausted, worker left running");
                self.timed_out_worker = Some(handle);
                Outcome::Unsolved(SolveStatus::Timeout)
            }
            Err(RecvTimeoutError::Disconnected) => return Err(SolverError::WorkerLost),
        };

        let status = match outcome {
            Outcome::Solved(values) => {
                self.objective_value = Some(self.arena.objective.evaluate(|v| values[v.index()]));
                self.values = Some(values);
                SolveStatus::Optimal
            }
            Outcome::Unsolved(status) => status,
        };
        info!(%status, elapsed = ?started.elapsed(), "solve finished");
        Ok(status)
    }

    fn value(&self, var: VarId) -> Option<f64> {
        self.values.as_ref()?.get(var.index()).copied()
    }

    fn objective_value(&self) -> Option<f64> {
        self.objective_value
    }

    fn num_variables(&self) -> usize {
        self.arena.variables.len()
    }

    fn num_constraints(&self) -> usize {
        self.arena.constraints.len()
    }
}

fn to_expression(expr: &LinearExpr, handles: &[Variable]) -> Expression {
    let mut out = Expression::from(expr.constant());
    for &(var, coef) in expr.terms() {
        out += coef * handles[var.index()];
    }
    out
}

fn run_backend(arena: &ModelArena) -> Result<Outcome, SolverError> {
    let mut vars = ProblemVariables::new();
    let handles: Vec<Variable> = arena
        .variables
        .iter()
        .map(|def| match def.kind {
            VarKind::Binary => vars.add(variable().binary()),
            VarKind::Continuous => vars.add(variable().min(def.lower).max(def.upper)),
        })
        .collect();

    let objective = to_expression(&arena.objective, &handles);
    let unsolved = match arena.sense {
        Sense::Minimize => vars.minimise(objective),
        Sense::Maximize => vars.maximise(objective),
    };
    let mut problem = unsolved.using(microlp);

    for c in &arena.constraints {
        let lhs = to_expression(&c.expr, &handles);
        let rhs = Expression::from(c.rhs);
        problem = problem.with(match c.relation {
            Relation::Leq => constraint::leq(lhs, rhs),
            Relation::Eq => constraint::eq(lhs, rhs),
            Relation::Geq => constraint::geq(lhs, rhs),
        });
    }

    match problem.solve() {
        Ok(solution) => Ok(Outcome::Solved(
            handles.iter().map(|&h| solution.value(h)).collect(),
        )),
        Err(ResolutionError::Infeasible) => Ok(Outcome::Unsolved(SolveStatus::Infeasible)),
        Err(ResolutionError::Unbounded) => Ok(Outcome::Unsolved(SolveStatus::Unbounded)),
        Err(other) => Err(SolverError::Backend(other.to_string())),
    }
}
