//! Error types for implore-attributes
//!
//! Every failure is reported synchronously to the caller; nothing is
//! retried. Validation runs before the storage is touched.

use thiserror::Error;

use crate::array::DataArray;

/// Errors raised by attribute set operations
#[derive(Error, Debug)]
pub enum AttributeError {
    /// Integer key past the end of the container
    #[error("Array index ({index}) out of range [0, {len})")]
    IndexOutOfRange { index: usize, len: usize },

    /// Name or index resolves to no array
    #[error("Array {key} not found")]
    KeyNotFound { key: String },

    /// Append called without a value
    #[error("Cannot add an empty value as array '{name}'")]
    NullValue { name: String },

    /// First-axis length differs from the association's valid length
    #[error("Array '{name}' has length {actual} but the data requires length {expected}")]
    LengthMismatch {
        name: String,
        expected: usize,
        actual: usize,
    },

    /// Wrong kind of value, or an operation the association does not support
    #[error("Type mismatch: {message}")]
    TypeMismatch { message: String },

    /// Wrong number of dimensions or components
    #[error("Array '{name}' must have {expected} {what}, got {actual}")]
    DimensionMismatch {
        name: String,
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    /// Reshaping a buffer failed
    #[error("Invalid array shape: {0}")]
    Shape(#[from] ndarray::ShapeError),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type alias for attribute operations
pub type AttributeResult<T> = Result<T, AttributeError>;

/// Validation utilities
pub mod validation {
    use super::*;

    /// Validate an integer key against the array count
    pub fn validate_index(index: usize, len: usize) -> AttributeResult<()> {
        if index >= len {
            return Err(AttributeError::IndexOutOfRange { index, len });
        }
        Ok(())
    }

    /// Validate a first-axis length
    pub fn validate_length(name: &str, expected: usize, actual: usize) -> AttributeResult<()> {
        if expected != actual {
            return Err(AttributeError::LengthMismatch {
                name: name.to_string(),
                expected,
                actual,
            });
        }
        Ok(())
    }

    /// Validate the number of dimensions
    pub fn validate_ndim(name: &str, expected: usize, array: &DataArray) -> AttributeResult<()> {
        if array.ndim() != expected {
            return Err(AttributeError::DimensionMismatch {
                name: name.to_string(),
                what: "dimensions",
                expected,
                actual: array.ndim(),
            });
        }
        Ok(())
    }

    /// Validate a rank-2 array with `expected` components per tuple
    pub fn validate_components(
        name: &str,
        expected: usize,
        array: &DataArray,
    ) -> AttributeResult<()> {
        validate_ndim(name, 2, array)?;
        let actual = array.shape()[1];
        if actual != expected {
            return Err(AttributeError::DimensionMismatch {
                name: name.to_string(),
                what: "components",
                expected,
                actual,
            });
        }
        Ok(())
    }
}
