//! Error kinds shared by the exact-diagonalization crates.
//!
//! Every kind is fatal for the sector being processed. "Operator not
//! applicable" is not an error and is reported as `Ok(None)` by the basis
//! and applier crates.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EdError {
    /// Malformed or inconsistent parameters, detected at construction.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A word outside the sector was handed to an indexing routine.
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// A dense or debug path was asked to handle a dimension above its bound.
    #[error("size limit exceeded in {what}: dimension {dim} > {limit}")]
    SizeLimit { what: String, dim: usize, limit: usize },

    /// The operator kind is not implemented for this basis or model.
    #[error("unsupported operator '{operator}' in {context}")]
    UnsupportedOperator { operator: String, context: String },

    /// A computed index does not fit the declared vector or block.
    #[error("index {index} out of range for length {len} ({context})")]
    IndexOutOfRange { index: usize, len: usize, context: String },

    #[error("cannot read {path}: {message}")]
    Io { path: String, message: String },
}

pub type Result<T> = std::result::Result<T, EdError>;
