use cvdoc_pointer::Pointer;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The six RFC 6902 operation kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpKind {
    Add,
    Remove,
    Replace,
    Move,
    Copy,
    Test,
}

impl OpKind {
    pub const ALL: [OpKind; 6] = [
        OpKind::Add,
        OpKind::Remove,
        OpKind::Replace,
        OpKind::Move,
        OpKind::Copy,
        OpKind::Test,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            OpKind::Add => "add",
            OpKind::Remove => "remove",
            OpKind::Replace => "replace",
            OpKind::Move => "move",
            OpKind::Copy => "copy",
            OpKind::Test => "test",
        }
    }

    /// Parse a wire op code. `None` for anything outside the six kinds.
    pub fn parse(text: &str) -> Option<OpKind> {
        OpKind::ALL.into_iter().find(|k| k.as_str() == text)
    }

    /// `add`/`replace`/`test` carry a `value` member.
    pub fn needs_value(self) -> bool {
        matches!(self, OpKind::Add | OpKind::Replace | OpKind::Test)
    }

    /// `move`/`copy` carry a `from` member.
    pub fn needs_from(self) -> bool {
        matches!(self, OpKind::Move | OpKind::Copy)
    }

    /// Whether the operation can change the tree. `test` cannot.
    pub fn mutates(self) -> bool {
        !matches!(self, OpKind::Test)
    }
}

impl std::fmt::Display for OpKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One structurally valid RFC 6902 operation.
///
/// Produced by the structural validator, which guarantees that `value`
/// and `from` presence matches the kind. Deserializing one directly
/// skips those guarantees; the applicator re-checks defensively.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatchOp {
    pub op: OpKind,
    pub path: Pointer,
    /// `None` means the member was absent. A JSON `null` value is kept
    /// as `Some(Value::Null)`, since `null` is a legal value to add,
    /// replace with, or test against.
    #[serde(
        default,
        deserialize_with = "present_value",
        skip_serializing_if = "Option::is_none"
    )]
    pub value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<Pointer>,
}

/// Only called when the member is present, so `null` maps to
/// `Some(Value::Null)` instead of collapsing into `None`.
fn present_value<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

impl PatchOp {
    pub fn add(path: Pointer, value: Value) -> Self {
        PatchOp {
            op: OpKind::Add,
            path,
            value: Some(value),
            from: None,
        }
    }

    pub fn remove(path: Pointer) -> Self {
        PatchOp {
            op: OpKind::Remove,
            path,
            value: None,
            from: None,
        }
    }

    pub fn replace(path: Pointer, value: Value) -> Self {
        PatchOp {
            op: OpKind::Replace,
            path,
            value: Some(value),
            from: None,
        }
    }

    pub fn mv(from: Pointer, path: Pointer) -> Self {
        PatchOp {
            op: OpKind::Move,
            path,
            value: None,
            from: Some(from),
        }
    }

    pub fn copy(from: Pointer, path: Pointer) -> Self {
        PatchOp {
            op: OpKind::Copy,
            path,
            value: None,
            from: Some(from),
        }
    }

    pub fn test(path: Pointer, value: Value) -> Self {
        PatchOp {
            op: OpKind::Test,
            path,
            value: Some(value),
            from: None,
        }
    }
}
