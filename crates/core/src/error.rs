//! Domain error model.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic, business/domain failures (validation,
/// invariants, bad identifiers). Infrastructure concerns belong elsewhere.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value failed validation (e.g. malformed input, bad config).
    #[error("validation failed: {0}")]
    Validation(String),

    /// A domain invariant was violated (e.g. an illegal state transition).
    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// A requested record was not found (domain-level).
    #[error("not found")]
    NotFound,
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::InvariantViolation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn not_found() -> Self {
        Self::NotFound
    }
}

/// Why a single invoice line could not be parsed.
///
/// Line failures are values, not unwound errors: one bad row never aborts the
/// rest of the invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineErrorKind {
    /// A required field (name or quantity) is missing or empty.
    MissingField,
    /// A numeric field could not be parsed as a decimal.
    InvalidNumber,
    /// A date field did not match any accepted format.
    MalformedDate,
    /// Quantity or unit price was negative or otherwise out of range.
    OutOfRange,
}

/// Per-line parse failure, scoped to exactly one input line/row.
#[derive(Debug, Error, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("line {line_index}: {kind:?} ({detail})")]
pub struct LineError {
    /// Zero-based position of the offending line in the original input.
    pub line_index: usize,
    pub kind: LineErrorKind,
    /// Human-readable detail, e.g. the field name or the bad token.
    pub detail: String,
}

impl LineError {
    pub fn new(line_index: usize, kind: LineErrorKind, detail: impl Into<String>) -> Self {
        Self {
            line_index,
            kind,
            detail: detail.into(),
        }
    }

    pub fn missing_field(line_index: usize, field: &str) -> Self {
        Self::new(line_index, LineErrorKind::MissingField, field)
    }

    pub fn invalid_number(line_index: usize, token: &str) -> Self {
        Self::new(line_index, LineErrorKind::InvalidNumber, token)
    }

    pub fn malformed_date(line_index: usize, token: &str) -> Self {
        Self::new(line_index, LineErrorKind::MalformedDate, token)
    }

    pub fn out_of_range(line_index: usize, detail: &str) -> Self {
        Self::new(line_index, LineErrorKind::OutOfRange, detail)
    }
}
