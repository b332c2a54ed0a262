//! Dense distance matrix.

use crate::models::{Coordinate, RoutingInstance};

/// A dense n×n distance matrix stored in row-major order.
///
/// Index 0 is the depot, indices `1..n` the customers in node order.
///
/// # Examples
///
/// ```
/// use u_routing_milp::models::Coordinate;
/// use u_routing_milp::distance::DistanceMatrix;
///
/// let dm = DistanceMatrix::from_locations(
///     Coordinate::new(0.0, 0.0),
///     &[Coordinate::new(3.0, 4.0), Coordinate::new(6.0, 8.0)],
/// );
/// assert!((dm.get(0, 1) - 5.0).abs() < 1e-10);
/// assert_eq!(dm.size(), 3);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMatrix {
    data: Vec<f64>,
    size: usize,
}

impl DistanceMatrix {
    /// Creates a distance matrix of the given size, initialized to zero.
    pub fn new(size: usize) -> Self {
        Self {
            data: vec![0.0; size * size],
            size,
        }
    }

    /// Computes the Euclidean matrix for a depot and ordered customer
    /// coordinates.
    pub fn from_locations(depot: Coordinate, customers: &[Coordinate]) -> Self {
        let points: Vec<Coordinate> = std::iter::once(depot)
            .chain(customers.iter().copied())
            .collect();
        Self::from_points(&points)
    }

    /// Computes the Euclidean matrix over every node of an instance.
    pub fn from_instance(instance: &RoutingInstance) -> Self {
        Self::from_points(&instance.locations())
    }

    fn from_points(points: &[Coordinate]) -> Self {
        let n = points.len();
        let mut dm = Self::new(n);
        for i in 0..n {
            for j in (i + 1)..n {
                let d = points[i].distance_to(&points[j]);
                dm.set(i, j, d);
                dm.set(j, i, d);
            }
        }
        dm
    }

    /// Creates a distance matrix from an explicit n×n grid.
    ///
    /// Returns `None` if the data length doesn't match `size * size`.
    pub fn from_data(size: usize, data: Vec<f64>) -> Option<Self> {
        if data.len() != size * size {
            return None;
        }
        Some(Self { data, size })
    }

    /// Returns the distance from location `from` to location `to`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    pub fn get(&self, from: usize, to: usize) -> f64 {
        self.data[from * self.size + to]
    }

    /// Sets the distance from location `from` to location `to`.
    pub fn set(&mut self, from: usize, to: usize, distance: f64) {
        self.data[from * self.size + to] = distance;
    }

    /// Number of locations in this matrix.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns `true` if the matrix is symmetric within the given tolerance.
    pub fn is_symmetric(&self, tol: f64) -> bool {
        for i in 0..self.size {
            for j in (i + 1)..self.size {
                if (self.get(i, j) - self.get(j, i)).abs() > tol {
                    return false;
                }
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn sample() -> DistanceMatrix {
        DistanceMatrix::from_locations(
            Coordinate::new(0.0, 0.0),
            &[Coordinate::new(3.0, 4.0), Coordinate::new(0.0, 8.0)],
        )
    }

    #[test]
    fn test_from_locations() {
        let dm = sample();
        assert_eq!(dm.size(), 3);
        assert!((dm.get(0, 1) - 5.0).abs() < 1e-10);
        assert!((dm.get(0, 2) - 8.0).abs() < 1e-10);
        assert!((dm.get(1, 2) - 5.0).abs() < 1e-10);
        assert!((dm.get(0, 0)).abs() < 1e-10);
    }

    #[test]
    fn test_depot_only() {
        let dm = DistanceMatrix::from_locations(Coordinate::new(1.0, 1.0), &[]);
        assert_eq!(dm.size(), 1);
        assert_eq!(dm.get(0, 0), 0.0);
    }

    #[test]
    fn test_from_data() {
        let dm = DistanceMatrix::from_data(2, vec![0.0, 5.0, 5.0, 0.0]).expect("valid");
        assert_eq!(dm.get(0, 1), 5.0);
        assert_eq!(dm.get(1, 0), 5.0);
    }

    #[test]
    fn test_from_data_invalid_size() {
        assert!(DistanceMatrix::from_data(2, vec![0.0, 1.0, 2.0]).is_none());
    }

    #[test]
    fn test_asymmetric_matrix() {
        let mut dm = DistanceMatrix::new(2);
        dm.set(0, 1, 10.0);
        dm.set(1, 0, 15.0);
        assert!(!dm.is_symmetric(1e-10));
    }

    fn coordinate() -> impl Strategy<Value = Coordinate> {
        (-1000.0f64..1000.0, -1000.0f64..1000.0).prop_map(|(x, y)| Coordinate::new(x, y))
    }

    proptest! {
        #[test]
        fn prop_metric(
            depot in coordinate(),
            customers in prop::collection::vec(coordinate(), 0..8)
        ) {
            let dm = DistanceMatrix::from_locations(depot, &customers);
            let n = dm.size();
            prop_assert_eq!(n, customers.len() + 1);
            for i in 0..n {
                prop_assert_eq!(dm.get(i, i), 0.0);
                for j in 0..n {
                    prop_assert_eq!(dm.get(i, j), dm.get(j, i));
                    prop_assert!(dm.get(i, j) >= 0.0);
                    for k in 0..n {
                        prop_assert!(dm.get(i, k) <= dm.get(i, j) + dm.get(j, k) + 1e-9);
                    }
                }
            }
        }
    }
}
