//! Error types for the data-loader crate.
//!
//! Two families of errors live here:
//! - `DataLoadError`: the precomputed artifacts are missing or malformed.
//!   These are fatal at startup.
//! - `LookupError`: a query against a loaded catalog or matrix could not be
//!   answered (unknown title, index out of range).

use thiserror::Error;

/// Errors that can occur while loading the catalog and similarity artifacts
#[derive(Error, Debug)]
pub enum DataLoadError {
    /// Artifact file does not exist
    #[error("Failed to open file: {path}")]
    FileNotFound { path: String },

    /// I/O error occurred while reading file
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Line in the catalog couldn't be parsed
    #[error("Parse error at line {line} in {file}: {reason}")]
    ParseError {
        file: String,
        line: usize,
        reason: String,
    },

    /// Catalog header is missing a column the loader needs
    #[error("Missing required column '{column}' in {file}")]
    MissingColumn { file: String, column: String },

    /// Expected number of fields in a line doesn't match actual
    #[error("Expected {expected} fields but found {found} in line {line}")]
    FieldCountMismatch {
        expected: usize,
        found: usize,
        line: usize,
    },

    /// Similarity artifact is not valid JSON of the expected shape
    #[error("Malformed similarity matrix: {0}")]
    MalformedMatrix(#[from] serde_json::Error),

    /// A matrix row has a different length than the matrix has rows
    #[error("Similarity matrix row {row} has {found} columns, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    /// Matrix size and catalog size disagree
    #[error("Similarity matrix is {found}x{found} but the catalog has {expected} items")]
    DimensionMismatch { expected: usize, found: usize },

    /// Data validation failed
    #[error("Validation failed: {0}")]
    ValidationError(String),
}

/// Errors returned by lookups against a loaded dataset
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    /// No catalog item has this exact title
    #[error("Movie not found in catalog: {title}")]
    NotFound { title: String },

    /// Index is outside `[0, len)`
    #[error("Index {index} is out of range for a catalog of {len} items")]
    IndexOutOfRange { index: usize, len: usize },
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, DataLoadError>;
