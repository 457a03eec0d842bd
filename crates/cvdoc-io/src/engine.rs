//! The patch tool facade: structural validation, ordered application,
//! then schema re-validation of the result.
//!
//! The engine is pure. It holds no shared state, takes no locks, and
//! never mutates its inputs; concurrent callers each apply to their own
//! snapshot. Committing the result is the caller's responsibility
//! (directly, or through [`apply_to_store`]).

use std::fmt;

use cvdoc_patch::{
    DiagnosticCode, PatchDiagnostic, PatchError, PatchOp, PatchTelemetry, ValidateOptions,
    apply_ops, validate_ops_with_options,
};
use cvdoc_schema::{Document, SchemaError};

use crate::store::DocumentStore;
use crate::tool::PatchRequest;

/// The result of a fully successful patch application.
#[derive(Debug, Clone, PartialEq)]
pub struct PatchOutcome {
    /// The re-validated post-patch document, ready to commit.
    pub document: Document,
    /// The operations that were applied, in order.
    pub applied: Vec<PatchOp>,
    /// Deterministic counters describing the batch.
    pub telemetry: PatchTelemetry,
}

/// Apply a patch request to one document snapshot.
///
/// Sequences the three gates, each only reached when the previous one
/// passed:
/// 1. structural validation of the raw operations;
/// 2. ordered application to an untyped working tree;
/// 3. document validation of the result.
///
/// Any failure rejects the whole batch; the snapshot is untouched
/// either way.
pub fn apply_patch(document: &Document, request: &PatchRequest) -> Result<PatchOutcome, PatchError> {
    apply_patch_with_options(document, request, &ValidateOptions::default())
}

/// [`apply_patch`] with configurable batch limits and protected paths.
pub fn apply_patch_with_options(
    document: &Document,
    request: &PatchRequest,
    opts: &ValidateOptions,
) -> Result<PatchOutcome, PatchError> {
    let ops = validate_ops_with_options(&request.operations, opts)?;
    let snapshot = document.to_value().map_err(snapshot_error)?;
    let patched = apply_ops(&snapshot, &ops)?;
    let document = cvdoc_schema::validate(&patched).map_err(schema_rejection)?;
    let telemetry = PatchTelemetry::from_ops(&ops);
    Ok(PatchOutcome {
        document,
        applied: ops,
        telemetry,
    })
}

/// Fetch, apply, and commit through a [`DocumentStore`].
///
/// The store is written only on full success; on any failure the stored
/// document is untouched.
pub fn apply_to_store<S: DocumentStore>(
    store: &mut S,
    id: &str,
    request: &PatchRequest,
) -> Result<PatchOutcome, EngineError> {
    apply_to_store_with_options(store, id, request, &ValidateOptions::default())
}

/// [`apply_to_store`] with configurable batch limits and protected
/// paths.
pub fn apply_to_store_with_options<S: DocumentStore>(
    store: &mut S,
    id: &str,
    request: &PatchRequest,
    opts: &ValidateOptions,
) -> Result<PatchOutcome, EngineError> {
    let current = store.get(id).ok_or_else(|| EngineError::UnknownDocument {
        id: id.to_string(),
    })?;
    let outcome = apply_patch_with_options(&current, request, opts)?;
    store.set(id, outcome.document.clone());
    Ok(outcome)
}

/// Failure surface of the store-backed entrypoint.
#[derive(Debug)]
pub enum EngineError {
    /// The store has no document under the requested id.
    UnknownDocument { id: String },
    /// The batch was rejected; the diagnostics say why.
    Rejected(PatchError),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::UnknownDocument { id } => {
                write!(f, "no document with id '{id}'")
            }
            EngineError::Rejected(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for EngineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EngineError::UnknownDocument { .. } => None,
            EngineError::Rejected(err) => Some(err),
        }
    }
}

impl From<PatchError> for EngineError {
    fn from(err: PatchError) -> Self {
        EngineError::Rejected(err)
    }
}

/// One schema-class diagnostic per violation, so a generating agent
/// sees every field it has to fix, not just the first.
fn schema_rejection(err: SchemaError) -> PatchError {
    PatchError {
        diagnostics: err
            .violations
            .into_iter()
            .map(|v| PatchDiagnostic {
                code: DiagnosticCode::SchemaViolation,
                op_index: None,
                op: None,
                path: Some(v.path),
                expected: v.expected,
                message: format!("patched document violates the schema: {}", v.message),
            })
            .collect(),
    }
}

fn snapshot_error(err: serde_json::Error) -> PatchError {
    PatchError::single(PatchDiagnostic {
        code: DiagnosticCode::Internal,
        op_index: None,
        op: None,
        path: None,
        expected: None,
        message: format!("internal: document snapshot did not serialize: {err}"),
    })
}
