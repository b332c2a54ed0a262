//! Linear expressions over solver variables.

use std::ops::{Add, AddAssign, Mul};

use super::VarId;

/// A sparse linear expression `Σ coef·var + constant`.
///
/// # Examples
///
/// ```
/// use u_routing_milp::solver::{LinearExpr, VarId};
///
/// let a = VarId::new(0);
/// let b = VarId::new(1);
/// let expr = LinearExpr::term(a, 2.0) + LinearExpr::term(b, -1.0) + 3.0;
/// assert_eq!(expr.evaluate(|v| if v == a { 1.0 } else { 4.0 }), 1.0);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinearExpr {
    terms: Vec<(VarId, f64)>,
    constant: f64,
}

impl LinearExpr {
    /// The empty expression (zero).
    pub fn new() -> Self {
        Self::default()
    }

    /// A single `coef·var` term.
    pub fn term(var: VarId, coef: f64) -> Self {
        Self {
            terms: vec![(var, coef)],
            constant: 0.0,
        }
    }

    /// The sum of the given variables with unit coefficients.
    pub fn sum<I: IntoIterator<Item = VarId>>(vars: I) -> Self {
        Self {
            terms: vars.into_iter().map(|v| (v, 1.0)).collect(),
            constant: 0.0,
        }
    }

    /// Appends `coef·var`.
    pub fn add_term(&mut self, var: VarId, coef: f64) {
        self.terms.push((var, coef));
    }

    /// Builder form of [`add_term`](Self::add_term).
    pub fn with_term(mut self, var: VarId, coef: f64) -> Self {
        self.add_term(var, coef);
        self
    }

    /// Terms in insertion order. A variable may appear more than once.
    pub fn terms(&self) -> &[(VarId, f64)] {
        &self.terms
    }

    /// Constant offset.
    pub fn constant(&self) -> f64 {
        self.constant
    }

    /// Moves the constant out, returning it.
    pub(crate) fn take_constant(&mut self) -> f64 {
        std::mem::take(&mut self.constant)
    }

    /// Evaluates the expression with the given variable values.
    pub fn evaluate<F: Fn(VarId) -> f64>(&self, value: F) -> f64 {
        self.terms
            .iter()
            .fold(self.constant, |acc, &(v, c)| acc + c * value(v))
    }
}

impl From<VarId> for LinearExpr {
    fn from(var: VarId) -> Self {
        Self::term(var, 1.0)
    }
}

impl Add for LinearExpr {
    type Output = LinearExpr;

    fn add(mut self, rhs: LinearExpr) -> LinearExpr {
        self += rhs;
        self
    }
}

impl Add<f64> for LinearExpr {
    type Output = LinearExpr;

    fn add(mut self, rhs: f64) -> LinearExpr {
        self.constant += rhs;
        self
    }
}

impl AddAssign for LinearExpr {
    fn add_assign(&mut self, rhs: LinearExpr) {
        self.terms.extend(rhs.terms);
        self.constant += rhs.constant;
    }
}

impl Mul<f64> for LinearExpr {
    type Output = LinearExpr;

    fn mul(mut self, rhs: f64) -> LinearExpr {
        for (_, c) in &mut self.terms {
            *c *= rhs;
        }
        self.constant *= rhs;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sum_and_scale() {
        let a = VarId::new(0);
        let b = VarId::new(1);
        let expr = LinearExpr::sum([a, b]) * 3.0 + 1.0;
        assert_eq!(expr.terms(), &[(a, 3.0), (b, 3.0)]);
        assert_eq!(expr.constant(), 1.0);
        assert_eq!(expr.evaluate(|_| 2.0), 13.0);
    }

    #[test]
    fn test_take_constant() {
        let mut expr = LinearExpr::from(VarId::new(3)) + 5.0;
        assert_eq!(expr.take_constant(), 5.0);
        assert_eq!(expr.constant(), 0.0);
    }

    #[test]
    fn test_repeated_variable_accumulates() {
        let a = VarId::new(0);
        let expr = LinearExpr::new().with_term(a, 1.0).with_term(a, 2.0);
        assert_eq!(expr.evaluate(|_| 1.5), 4.5);
    }
}
