use serde::{Deserialize, Serialize};

/// Stable, machine-readable codes for document schema violations.
///
/// These codes are intended for programmatic handling (retrying agents,
/// tooling, UI), while `message` remains human-oriented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationCode {
    /// `version` is not the document schema version this build supports.
    UnsupportedVersion,
    MissingField,
    UnknownField,
    WrongType,
    OutOfRange,
    /// String value does not match its declared format (email, url, ...).
    BadFormat,
    /// Enumerated field holds a literal outside its allowed set.
    UnknownVariant,
    EmptyValue,
    /// Map key does not match the section-key grammar.
    BadKey,
    /// Item id repeats within one section.
    DuplicateId,
    /// `end_date` precedes `start_date`.
    DateOrder,
    /// `metadata.layout` names a section key that does not exist.
    UnknownLayoutSection,
    DuplicateLayoutEntry,
    /// Shape check passed but typed decoding still failed. Indicates a
    /// drift between the validator tree and the document model.
    DecodeFailed,
}

/// A single schema violation.
///
/// Designed to be:
/// - stable enough for machine handling (via `code`, `path`)
/// - still useful to humans (via `message`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaViolation {
    pub code: ViolationCode,
    /// RFC 6901 pointer to the offending location. `""` is the document
    /// root.
    pub path: String,
    /// The shape the schema wanted at `path`, phrased for an agent that
    /// will correct its patch and retry.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected: Option<String>,
    pub message: String,
}

/// Structured error wrapper for a failed document validation.
///
/// Validation collects every violation it can find rather than stopping
/// at the first, so a caller can fix a whole document in one pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaError {
    pub violations: Vec<SchemaViolation>,
}

impl SchemaError {
    pub fn single(violation: SchemaViolation) -> Self {
        Self {
            violations: vec![violation],
        }
    }

    /// The first violation's message (or a generic fallback).
    pub fn first_message(&self) -> String {
        self.violations
            .first()
            .map(|v| v.message.clone())
            .unwrap_or_else(|| "document validation failed".to_string())
    }
}

impl std::fmt::Display for SchemaError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.violations.len() {
            0 | 1 => write!(f, "{}", self.first_message()),
            n => write!(f, "{} (+{} more)", self.first_message(), n - 1),
        }
    }
}

impl std::error::Error for SchemaError {}
