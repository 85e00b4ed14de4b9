//! Error types for the hierarchy pipeline.
//!
//! - [`HierarchyError`] - row-level failures while folding rows into the tree
//! - [`ValidationError`] - the emitted document does not match the schema
//! - [`PipelineError`] - top-level orchestration errors
//!
//! CSV failures live next to the parser as [`crate::parser::CsvError`].
//! Conversion is automatic via `From` implementations, so `?` works across
//! error boundaries.

use thiserror::Error;

use crate::parser::CsvError;

// =============================================================================
// Hierarchy Builder Errors
// =============================================================================

/// Errors raised while folding rows into the hierarchy.
///
/// `row` is the 1-based index of the data row (the header is not counted).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum HierarchyError {
    /// A required column is absent from a row.
    #[error("Row {row}: missing required field '{field}'")]
    MissingField { row: usize, field: String },

    /// A count column holds something other than a non-negative integer.
    #[error("Row {row}: field '{field}' is not a non-negative integer (value '{value}')")]
    MalformedInput {
        row: usize,
        field: String,
        value: String,
    },

    /// Both gender counts are zero and the policy rejects such rows.
    #[error("Row {row}: company '{company}' reports zero male and zero female employees")]
    DegenerateRatio { row: usize, company: String },
}

impl HierarchyError {
    /// Data row the error was raised for.
    pub fn row(&self) -> usize {
        match self {
            Self::MissingField { row, .. }
            | Self::MalformedInput { row, .. }
            | Self::DegenerateRatio { row, .. } => *row,
        }
    }
}

// =============================================================================
// Validation Errors
// =============================================================================

/// Errors from checking a document against the hierarchy schema.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// Schema validation failed.
    #[error("Validation failed: {}", .errors.join("; "))]
    Schema { errors: Vec<String> },
}

// =============================================================================
// Pipeline Errors (top-level)
// =============================================================================

/// Top-level pipeline errors.
///
/// This is the error type returned by
/// [`crate::transform::pipeline::build_from_csv`]. It wraps all lower-level
/// errors and adds I/O and JSON failures.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// CSV parsing error.
    #[error("CSV error: {0}")]
    Csv(#[from] CsvError),

    /// Row could not be folded into the hierarchy.
    #[error("Hierarchy error: {0}")]
    Hierarchy(#[from] HierarchyError),

    /// Emitted document failed schema validation.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Reading the input or writing the output failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for hierarchy building.
pub type HierarchyResult<T> = Result<T, HierarchyError>;

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;
