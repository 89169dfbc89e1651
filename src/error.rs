//! # Row Access Errors
//!
//! Typed errors for the row-access surface. Every failure here is a
//! caller-input or schema-mismatch problem detected before any cell bytes
//! are read; nothing is transient and nothing is retried.
//!
//! | Variant | Raised by |
//! |---------|-----------|
//! | `ColumnNotFound` | name/index resolution against the schema |
//! | `NoIsDeletedColumn` | `RowView::is_deleted` on a schema without the virtual column |
//! | `TypeMismatch` | typed getter whose tag differs from the column's declared tag |
//! | `ValueIsNull` | typed getter on a nullable column whose null bit is set |
//! | `IndexOutOfRange` | `Batch::row` with a row index outside the batch |
//! | `Corrupted` | malformed cell bytes (truncated cell, descriptor outside the indirect pool, invalid UTF-8) |
//!
//! Construction and population surfaces (`Schema::new`, `Batch::new`, the
//! builders) report through `eyre` instead; those failures are programmer
//! errors rather than conditions callers match on.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, RowError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RowError {
    #[error("column '{column}' not found")]
    ColumnNotFound { column: String },

    #[error("IS_DELETED virtual column not found")]
    NoIsDeletedColumn,

    /// The requested type tag differs from the column's declared tag.
    /// Carries both type names for diagnostics; no cell bytes were read.
    #[error("invalid type {requested} provided for column '{column}' (expected {expected})")]
    TypeMismatch {
        requested: &'static str,
        column: String,
        expected: &'static str,
    },

    #[error("column '{column}' is NULL")]
    ValueIsNull { column: String },

    #[error("row index {index} out of range for batch of {num_rows} rows")]
    IndexOutOfRange { index: usize, num_rows: usize },

    #[error("corrupted cell in column '{column}': {reason}")]
    Corrupted { column: String, reason: String },
}

impl RowError {
    pub(crate) fn column_not_found(column: impl Into<String>) -> Self {
        RowError::ColumnNotFound {
            column: column.into(),
        }
    }

    pub(crate) fn corrupted(column: &str, reason: impl Into<String>) -> Self {
        RowError::Corrupted {
            column: column.to_string(),
            reason: reason.into(),
        }
    }
}
