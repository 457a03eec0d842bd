use cvdoc_pointer::Pointer;
use serde_json::Value;

use crate::diagnostics::{DiagnosticCode, PatchDiagnostic, PatchError};
use crate::op::{OpKind, PatchOp};

/// Default upper bound on operations per batch.
pub const MAX_OPS_DEFAULT: usize = 256;

/// Validator configuration options.
///
/// These options exist to make safety / strictness trade-offs explicit
/// and testable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidateOptions {
    /// Upper bound on operations per batch. Batches from an agent
    /// should be minimal; an enormous batch is a sign of a runaway
    /// generator, not a bigger edit.
    pub max_ops: usize,
    /// Pointer prefixes no mutating operation may target or move from.
    /// `test` is allowed anywhere, protected or not.
    pub protected: Vec<Pointer>,
}

impl Default for ValidateOptions {
    fn default() -> Self {
        Self {
            max_ops: MAX_OPS_DEFAULT,
            protected: Vec::new(),
        }
    }
}

/// Structurally validate a raw operation batch. Strict and fail-fast.
///
/// Rules, per operation:
/// - the element is a JSON object
/// - `op` is present and one of the six RFC 6902 codes
/// - `path` is present and parses as an RFC 6901 pointer
/// - `value` is present for add/replace/test (`null` counts as present)
/// - `from` is present and parses for move/copy
/// - unrecognized extra members are ignored (RFC 6902 §4)
///
/// No document is consulted here; whether paths resolve is the
/// applicator's concern.
pub fn validate_ops(raw: &[Value]) -> Result<Vec<PatchOp>, PatchError> {
    validate_ops_with_options(raw, &ValidateOptions::default())
}

/// Structural validation with configurable limits and protected paths.
pub fn validate_ops_with_options(
    raw: &[Value],
    opts: &ValidateOptions,
) -> Result<Vec<PatchOp>, PatchError> {
    if raw.is_empty() {
        return Err(batch_error(
            DiagnosticCode::EmptyBatch,
            "batch must contain at least one operation".to_string(),
        ));
    }
    if raw.len() > opts.max_ops {
        return Err(batch_error(
            DiagnosticCode::TooManyOps,
            format!("batch has {} operations (limit {})", raw.len(), opts.max_ops),
        ));
    }

    let mut ops = Vec::with_capacity(raw.len());
    for (i, candidate) in raw.iter().enumerate() {
        ops.push(validate_op(i, candidate, opts)?);
    }
    Ok(ops)
}

fn validate_op(i: usize, candidate: &Value, opts: &ValidateOptions) -> Result<PatchOp, PatchError> {
    let Some(members) = candidate.as_object() else {
        return Err(op_error(
            DiagnosticCode::NotAnObject,
            i,
            None,
            None,
            format!("ops[{i}] must be an object"),
        ));
    };

    let op = match members.get("op") {
        None => {
            return Err(op_error(
                DiagnosticCode::MissingOp,
                i,
                None,
                None,
                format!("ops[{i}] missing op"),
            ));
        }
        Some(raw_op) => parse_op_kind(i, raw_op)?,
    };

    let path = match members.get("path") {
        None => {
            return Err(op_error(
                DiagnosticCode::MissingPath,
                i,
                Some(op),
                None,
                format!("ops[{i}] ({op}) missing path"),
            ));
        }
        Some(raw_path) => parse_pointer(i, op, "path", raw_path)?,
    };

    let value = if op.needs_value() {
        match members.get("value") {
            // A present `null` is a legal value; only absence fails.
            Some(v) => Some(v.clone()),
            None => {
                return Err(op_error(
                    DiagnosticCode::MissingValue,
                    i,
                    Some(op),
                    Some(&path),
                    format!("ops[{i}] ({op}) missing value"),
                ));
            }
        }
    } else {
        None
    };

    let from = if op.needs_from() {
        match members.get("from") {
            Some(raw_from) => Some(parse_pointer(i, op, "from", raw_from)?),
            None => {
                return Err(op_error(
                    DiagnosticCode::MissingFrom,
                    i,
                    Some(op),
                    Some(&path),
                    format!("ops[{i}] ({op}) missing from"),
                ));
            }
        }
    } else {
        None
    };

    if op.mutates() {
        for prefix in &opts.protected {
            let hit = if prefix.is_prefix_of(&path) {
                Some(&path)
            } else {
                from.as_ref().filter(|f| prefix.is_prefix_of(f))
            };
            if let Some(pointer) = hit {
                return Err(op_error(
                    DiagnosticCode::ProtectedPath,
                    i,
                    Some(op),
                    Some(pointer),
                    format!("ops[{i}] ({op}) targets protected path '{prefix}'"),
                ));
            }
        }
    }

    Ok(PatchOp {
        op,
        path,
        value,
        from,
    })
}

fn parse_op_kind(i: usize, raw_op: &Value) -> Result<OpKind, PatchError> {
    let Some(text) = raw_op.as_str() else {
        return Err(op_error(
            DiagnosticCode::UnknownOpCode,
            i,
            None,
            None,
            format!("ops[{i}] op must be a string"),
        ));
    };
    OpKind::parse(text).ok_or_else(|| {
        op_error(
            DiagnosticCode::UnknownOpCode,
            i,
            None,
            None,
            format!("ops[{i}] unknown op '{text}'"),
        )
    })
}

fn parse_pointer(i: usize, op: OpKind, member: &str, raw: &Value) -> Result<Pointer, PatchError> {
    let Some(text) = raw.as_str() else {
        return Err(op_error(
            DiagnosticCode::MalformedPointer,
            i,
            Some(op),
            None,
            format!("ops[{i}] ({op}) {member} must be a string"),
        ));
    };
    Pointer::parse(text).map_err(|e| {
        op_error(
            DiagnosticCode::MalformedPointer,
            i,
            Some(op),
            None,
            format!("ops[{i}] ({op}) bad {member} '{text}': {e}"),
        )
    })
}

fn batch_error(code: DiagnosticCode, message: String) -> PatchError {
    PatchError::single(PatchDiagnostic {
        code,
        op_index: None,
        op: None,
        path: None,
        expected: None,
        message,
    })
}

fn op_error(
    code: DiagnosticCode,
    op_index: usize,
    op: Option<OpKind>,
    path: Option<&Pointer>,
    message: String,
) -> PatchError {
    PatchError::single(PatchDiagnostic {
        code,
        op_index: Some(op_index),
        op,
        path: path.map(|p| p.to_string()),
        expected: None,
        message,
    })
}
