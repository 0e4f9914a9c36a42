//! Error types for Lattica

use thiserror::Error;

/// Main error type for Lattica operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CRS mismatch: {left} vs {right}")]
    CrsMismatch { left: String, right: String },

    #[error("Duplicate unit id: {0}")]
    DuplicateUnitId(String),

    #[error("Unknown unit id: {0}")]
    UnknownUnit(String),

    #[error("Length mismatch: expected {expected} values, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("Invalid geometry for unit {id}: {reason}")]
    InvalidGeometry { id: String, reason: String },

    #[error("Island units (zero neighbors): {}", .0.join(", "))]
    IslandUnits(Vec<String>),

    #[error("{count} missing value(s) in attribute vector")]
    MissingValues { count: usize },

    #[error("Invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        name: &'static str,
        value: String,
        reason: String,
    },

    #[error("Format error in {format}: {reason}")]
    Format { format: &'static str, reason: String },

    #[error("Algorithm error: {0}")]
    Algorithm(String),

    #[error("{0}")]
    Other(String),
}

/// Result type alias for Lattica operations
pub type Result<T> = std::result::Result<T, Error>;
