//! Errors raised by registry lookups, conversions and quantity arithmetic

use std::path::PathBuf;

use dunit_core::NumberError;
use thiserror::Error;

use crate::Dimension;

/// Errors that can occur while resolving units or combining quantities
#[derive(Debug, Error)]
pub enum UnitError {
    /// Key is not registered under any unit
    #[error("unknown unit: {0}")]
    UnitNotFound(String),

    /// Comparison, arithmetic or conversion across dimensions
    #[error("incompatible dimensions: cannot combine {from} with {to}")]
    IncompatibleDimension { from: Dimension, to: Dimension },

    /// Numeric coercion of a quantity that carries a dimension
    #[error("cannot coerce a quantity in {unit} ({dimension}) to a plain number")]
    DimensionError { unit: String, dimension: Dimension },

    #[error("no quantity found in {0:?}")]
    NoQuantityFound(String),

    #[error("unsupported operation: {0}")]
    UnsupportedOperation(&'static str),

    /// A name, symbol or alias already belongs to another unit
    #[error("key {key:?} is already registered to unit {existing:?}")]
    DuplicateKey { key: String, existing: String },

    #[error("invalid unit record: {0}")]
    InvalidRecord(String),

    #[error("numeric error: {0}")]
    Number(#[from] NumberError),

    #[error("invalid unit definitions: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl UnitError {
    pub(crate) fn incompatible(from: &Dimension, to: &Dimension) -> Self {
        UnitError::IncompatibleDimension { from: from.clone(), to: to.clone() }
    }
}
