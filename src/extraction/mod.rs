//! Reconstruction of routes from solved variable values.

mod extractor;

pub use extractor::{resolve_binary, SolutionExtractor, DEFAULT_EPSILON};
