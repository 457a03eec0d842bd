use cvdoc_pointer::{ArrayToken, Pointer};
use serde_json::Value;

use crate::diagnostics::{DiagnosticCode, PatchDiagnostic, PatchError};
use crate::op::{OpKind, PatchOp};

/// Apply an ordered batch to one document snapshot.
///
/// The snapshot is cloned into a working tree; operations run strictly
/// in order, each seeing the previous result. Any failure aborts the
/// whole batch and the clone is dropped, so the caller's value is never
/// mutated and there is nothing to roll back.
///
/// Semantics per operation:
/// - add: `-` appends to an array; an object key is set (created or
///   overwritten); index `0..=len` inserts, shifting later elements
///   right; the empty pointer replaces the whole tree
/// - remove: deletes an existing key/index; the root cannot be removed
/// - replace: overwrites an existing element (root allowed)
/// - move: remove at `from`, then add at `path`; `from` must not be a
///   proper prefix of `path`; `from == path` is a no-op
/// - copy: add at `path` of a deep copy of the value at `from`
/// - test: deep equality at `path`, with numbers compared by value
///
/// The result is NOT schema-checked here; callers gate it through
/// document validation before committing.
pub fn apply_ops(doc: &Value, ops: &[PatchOp]) -> Result<Value, PatchError> {
    let mut working = doc.clone();
    for (i, op) in ops.iter().enumerate() {
        apply_one(&mut working, i, op)?;
    }
    Ok(working)
}

fn apply_one(tree: &mut Value, i: usize, op: &PatchOp) -> Result<(), PatchError> {
    let ctx = OpCtx { i, kind: op.op };
    match op.op {
        OpKind::Add => {
            let value = required_value(&ctx, op)?.clone();
            add(tree, &ctx, &op.path, value)
        }
        OpKind::Remove => remove(tree, &ctx, &op.path).map(|_| ()),
        OpKind::Replace => {
            let value = required_value(&ctx, op)?.clone();
            if op.path.is_root() {
                *tree = value;
                return Ok(());
            }
            let slot = resolve_mut(tree, &ctx, &op.path)?;
            *slot = value;
            Ok(())
        }
        OpKind::Move => {
            let from = required_from(&ctx, op)?;
            if *from == op.path {
                return Ok(());
            }
            if from.is_proper_prefix_of(&op.path) {
                return Err(ctx.fail(
                    DiagnosticCode::MoveIntoOwnSubtree,
                    &op.path,
                    format!("cannot move '{from}' into its own subtree at '{}'", op.path),
                ));
            }
            let taken = remove(tree, &ctx, from)?;
            add(tree, &ctx, &op.path, taken)
        }
        OpKind::Copy => {
            let from = required_from(&ctx, op)?;
            let copied = resolve(tree, &ctx, from)?.clone();
            add(tree, &ctx, &op.path, copied)
        }
        OpKind::Test => {
            let expected = required_value(&ctx, op)?;
            let actual = resolve(tree, &ctx, &op.path)?;
            if json_eq(actual, expected) {
                Ok(())
            } else {
                Err(ctx.fail_expecting(
                    DiagnosticCode::TestMismatch,
                    &op.path,
                    expected.to_string(),
                    format!("value mismatch at '{}'", op.path),
                ))
            }
        }
    }
}

/// Per-operation failure context; every diagnostic names the index, the
/// op kind, and a pointer.
struct OpCtx {
    i: usize,
    kind: OpKind,
}

impl OpCtx {
    fn fail(&self, code: DiagnosticCode, pointer: &Pointer, detail: String) -> PatchError {
        PatchError::single(PatchDiagnostic {
            code,
            op_index: Some(self.i),
            op: Some(self.kind),
            path: Some(pointer.to_string()),
            expected: None,
            message: format!("ops[{}] ({}) {detail}", self.i, self.kind),
        })
    }

    fn fail_expecting(
        &self,
        code: DiagnosticCode,
        pointer: &Pointer,
        expected: String,
        detail: String,
    ) -> PatchError {
        let mut err = self.fail(code, pointer, detail);
        err.diagnostics[0].expected = Some(expected);
        err
    }
}

fn required_value<'a>(ctx: &OpCtx, op: &'a PatchOp) -> Result<&'a Value, PatchError> {
    op.value.as_ref().ok_or_else(|| {
        ctx.fail(
            DiagnosticCode::MissingValue,
            &op.path,
            "missing value".to_string(),
        )
    })
}

fn required_from<'a>(ctx: &OpCtx, op: &'a PatchOp) -> Result<&'a Pointer, PatchError> {
    op.from.as_ref().ok_or_else(|| {
        ctx.fail(
            DiagnosticCode::MissingFrom,
            &op.path,
            "missing from".to_string(),
        )
    })
}

/// One descent step through a container. The closed node kinds are
/// object, array, and scalar: a scalar has no children, an array only
/// accepts index-grammar tokens addressing existing elements.
///
/// `parent` is the pointer of `current`; `full` is the whole pointer
/// being resolved (what the diagnostic's `path` names).
fn step<'a>(
    current: &'a Value,
    token: &str,
    ctx: &OpCtx,
    parent: &Pointer,
    full: &Pointer,
) -> Result<&'a Value, PatchError> {
    match current {
        Value::Object(map) => map.get(token).ok_or_else(|| {
            ctx.fail(
                DiagnosticCode::PathNotFound,
                full,
                format!("'{}' does not resolve", parent.child(token)),
            )
        }),
        Value::Array(items) => match ArrayToken::parse(token) {
            Some(ArrayToken::Index(index)) if index < items.len() => Ok(&items[index]),
            Some(ArrayToken::Index(index)) => Err(ctx.fail(
                DiagnosticCode::IndexOutOfRange,
                full,
                format!(
                    "index {index} out of range (length {}) at '{parent}'",
                    items.len()
                ),
            )),
            Some(ArrayToken::Append) => Err(ctx.fail(
                DiagnosticCode::AppendNotAllowed,
                full,
                format!("'-' does not address an existing element at '{parent}'"),
            )),
            None => Err(ctx.fail(
                DiagnosticCode::InvalidArrayIndex,
                full,
                format!("'{token}' is not a valid array index at '{parent}'"),
            )),
        },
        _ => Err(ctx.fail(
            DiagnosticCode::PathNotFound,
            full,
            format!("'{parent}' is not a container"),
        )),
    }
}

/// Resolve a pointer to a shared reference, failing with a typed
/// diagnostic at the first segment that does not resolve.
fn resolve<'a>(tree: &'a Value, ctx: &OpCtx, pointer: &Pointer) -> Result<&'a Value, PatchError> {
    let mut current = tree;
    let mut parent = Pointer::root();
    for token in pointer.tokens() {
        current = step(current, token, ctx, &parent, pointer)?;
        parent.push(token.clone());
    }
    Ok(current)
}

/// Mutable twin of [`resolve`].
fn resolve_mut<'a>(
    tree: &'a mut Value,
    ctx: &OpCtx,
    pointer: &Pointer,
) -> Result<&'a mut Value, PatchError> {
    let mut current = tree;
    let mut parent = Pointer::root();
    for token in pointer.tokens() {
        current = match current {
            Value::Object(map) => map.get_mut(token).ok_or_else(|| {
                ctx.fail(
                    DiagnosticCode::PathNotFound,
                    pointer,
                    format!("'{}' does not resolve", parent.child(token)),
                )
            })?,
            Value::Array(items) => {
                let len = items.len();
                match ArrayToken::parse(token) {
                    Some(ArrayToken::Index(index)) if index < len => &mut items[index],
                    Some(ArrayToken::Index(index)) => {
                        return Err(ctx.fail(
                            DiagnosticCode::IndexOutOfRange,
                            pointer,
                            format!("index {index} out of range (length {len}) at '{parent}'"),
                        ));
                    }
                    Some(ArrayToken::Append) => {
                        return Err(ctx.fail(
                            DiagnosticCode::AppendNotAllowed,
                            pointer,
                            format!("'-' does not address an existing element at '{parent}'"),
                        ));
                    }
                    None => {
                        return Err(ctx.fail(
                            DiagnosticCode::InvalidArrayIndex,
                            pointer,
                            format!("'{token}' is not a valid array index at '{parent}'"),
                        ));
                    }
                }
            }
            _ => {
                return Err(ctx.fail(
                    DiagnosticCode::PathNotFound,
                    pointer,
                    format!("'{parent}' is not a container"),
                ));
            }
        };
        parent.push(token.clone());
    }
    Ok(current)
}

fn add(tree: &mut Value, ctx: &OpCtx, pointer: &Pointer, value: Value) -> Result<(), PatchError> {
    let (parent_tokens, last) = match pointer.split_last() {
        Some(split) => split,
        // Whole-document replacement; the schema gate still applies.
        None => {
            *tree = value;
            return Ok(());
        }
    };
    let parent_pointer = Pointer::from_tokens(parent_tokens.iter().cloned());
    let parent = resolve_mut(tree, ctx, &parent_pointer)?;

    match parent {
        // RFC 6901 gives `-` no special meaning for objects; it is a
        // plain member name here.
        Value::Object(map) => {
            map.insert(last.to_string(), value);
            Ok(())
        }
        Value::Array(items) => match ArrayToken::parse(last) {
            Some(ArrayToken::Append) => {
                items.push(value);
                Ok(())
            }
            Some(ArrayToken::Index(index)) if index <= items.len() => {
                items.insert(index, value);
                Ok(())
            }
            Some(ArrayToken::Index(index)) => Err(ctx.fail(
                DiagnosticCode::IndexOutOfRange,
                pointer,
                format!(
                    "index {index} out of range (length {}) at '{parent_pointer}'",
                    items.len()
                ),
            )),
            None => Err(ctx.fail(
                DiagnosticCode::InvalidArrayIndex,
                pointer,
                format!("'{last}' is not a valid array index at '{parent_pointer}'"),
            )),
        },
        _ => Err(ctx.fail(
            DiagnosticCode::PathNotFound,
            pointer,
            format!("'{parent_pointer}' is not a container"),
        )),
    }
}

fn remove(tree: &mut Value, ctx: &OpCtx, pointer: &Pointer) -> Result<Value, PatchError> {
    let Some((parent_tokens, last)) = pointer.split_last() else {
        return Err(ctx.fail(
            DiagnosticCode::CannotRemoveRoot,
            pointer,
            "cannot remove the document root".to_string(),
        ));
    };
    let parent_pointer = Pointer::from_tokens(parent_tokens.iter().cloned());
    let parent = resolve_mut(tree, ctx, &parent_pointer)?;

    match parent {
        Value::Object(map) => map.remove(last).ok_or_else(|| {
            ctx.fail(
                DiagnosticCode::PathNotFound,
                pointer,
                format!("'{pointer}' does not resolve"),
            )
        }),
        Value::Array(items) => match ArrayToken::parse(last) {
            Some(ArrayToken::Index(index)) if index < items.len() => Ok(items.remove(index)),
            Some(ArrayToken::Index(index)) => Err(ctx.fail(
                DiagnosticCode::IndexOutOfRange,
                pointer,
                format!(
                    "index {index} out of range (length {}) at '{parent_pointer}'",
                    items.len()
                ),
            )),
            Some(ArrayToken::Append) => Err(ctx.fail(
                DiagnosticCode::AppendNotAllowed,
                pointer,
                format!("'-' does not address an existing element at '{parent_pointer}'"),
            )),
            None => Err(ctx.fail(
                DiagnosticCode::InvalidArrayIndex,
                pointer,
                format!("'{last}' is not a valid array index at '{parent_pointer}'"),
            )),
        },
        _ => Err(ctx.fail(
            DiagnosticCode::PathNotFound,
            pointer,
            format!("'{parent_pointer}' is not a container"),
        )),
    }
}

/// RFC 6902 `test` equality: deep equality with numbers compared by
/// value, so `1` and `1.0` are equal even though their JSON
/// representations differ.
fn json_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => number_eq(x, y),
        (Value::Array(x), Value::Array(y)) => {
            x.len() == y.len() && x.iter().zip(y).all(|(va, vb)| json_eq(va, vb))
        }
        (Value::Object(x), Value::Object(y)) => {
            x.len() == y.len()
                && x.iter()
                    .all(|(k, va)| y.get(k).is_some_and(|vb| json_eq(va, vb)))
        }
        _ => a == b,
    }
}

fn number_eq(x: &serde_json::Number, y: &serde_json::Number) -> bool {
    if let (Some(a), Some(b)) = (x.as_i64(), y.as_i64()) {
        return a == b;
    }
    if let (Some(a), Some(b)) = (x.as_u64(), y.as_u64()) {
        return a == b;
    }
    match (x.as_f64(), y.as_f64()) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}
