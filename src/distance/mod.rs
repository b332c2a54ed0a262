//! Distance matrices.
//!
//! Provides a dense straight-line distance matrix over the depot and
//! customers.

mod matrix;

pub use matrix::DistanceMatrix;
