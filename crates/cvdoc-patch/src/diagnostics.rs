use serde::{Deserialize, Serialize};

use crate::op::OpKind;

/// Stable, machine-readable diagnostic codes for patch failures.
///
/// These codes are intended for programmatic handling (retrying agents,
/// tooling, UI), while `message` remains human-oriented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticCode {
    EmptyBatch,
    TooManyOps,
    /// A batch element is not a JSON object.
    NotAnObject,
    MissingOp,
    UnknownOpCode,
    MissingPath,
    MissingValue,
    MissingFrom,
    /// `path` or `from` is not valid RFC 6901 pointer text.
    MalformedPointer,
    /// A mutating operation targets a pointer under a protected prefix.
    ProtectedPath,
    PathNotFound,
    /// An array was addressed with a token outside the index grammar
    /// (leading zeros, signs, non-digits).
    InvalidArrayIndex,
    IndexOutOfRange,
    /// `-` used somewhere other than the final token of an `add` path.
    AppendNotAllowed,
    CannotRemoveRoot,
    /// `from` is a proper prefix of `path`.
    MoveIntoOwnSubtree,
    /// A `test` guard did not match.
    TestMismatch,
    /// The fully-applied result failed document validation.
    SchemaViolation,
    /// Engine-side failure not attributable to the batch. Nothing was
    /// mutated.
    Internal,
}

/// Coarse error families for callers that do not dispatch on individual
/// codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorClass {
    /// The operation was malformed; nothing was mutated.
    Structural,
    /// A `path`/`from` did not resolve against the working tree.
    PathResolution,
    /// A `test` assertion failed.
    Assertion,
    /// The applied result is not a valid document.
    Schema,
}

impl DiagnosticCode {
    pub fn class(self) -> ErrorClass {
        use DiagnosticCode::*;
        match self {
            EmptyBatch | TooManyOps | NotAnObject | MissingOp | UnknownOpCode | MissingPath
            | MissingValue | MissingFrom | MalformedPointer | ProtectedPath | Internal => {
                ErrorClass::Structural
            }
            PathNotFound | InvalidArrayIndex | IndexOutOfRange | AppendNotAllowed
            | CannotRemoveRoot | MoveIntoOwnSubtree => ErrorClass::PathResolution,
            TestMismatch => ErrorClass::Assertion,
            SchemaViolation => ErrorClass::Schema,
        }
    }
}

/// A single patch diagnostic.
///
/// Designed to be:
/// - stable enough for machine handling (via `code`, `op_index`, `path`)
/// - still useful to humans (via `message`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatchDiagnostic {
    pub code: DiagnosticCode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub op_index: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub op: Option<OpKind>,
    /// RFC 6901 pointer text of the location involved.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// What the engine wanted there, phrased for an agent that will
    /// correct its batch and retry.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected: Option<String>,
    pub message: String,
}

/// Structured error for a rejected patch batch.
///
/// Any failure aborts the whole batch. Structural validation is
/// fail-fast and carries a single diagnostic; schema re-validation can
/// carry several (one per violation).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatchError {
    pub diagnostics: Vec<PatchDiagnostic>,
}

impl PatchError {
    pub fn single(diagnostic: PatchDiagnostic) -> Self {
        Self {
            diagnostics: vec![diagnostic],
        }
    }

    /// The family of the first diagnostic.
    pub fn class(&self) -> ErrorClass {
        self.diagnostics
            .first()
            .map(|d| d.code.class())
            .unwrap_or(ErrorClass::Structural)
    }

    /// The first diagnostic's message (or a generic fallback).
    pub fn first_message(&self) -> String {
        self.diagnostics
            .first()
            .map(|d| d.message.clone())
            .unwrap_or_else(|| "patch rejected".to_string())
    }
}

impl std::fmt::Display for PatchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.diagnostics.len() {
            0 | 1 => write!(f, "{}", self.first_message()),
            n => write!(f, "{} (+{} more)", self.first_message(), n - 1),
        }
    }
}

impl std::error::Error for PatchError {}
