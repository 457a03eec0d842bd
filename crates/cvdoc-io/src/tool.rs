//! Agent-facing tool-call surface: the request envelope, the input
//! schema handed to the invoking agent, and the reply bodies.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use cvdoc_patch::PatchError;

use crate::engine::PatchOutcome;

/// Tool name advertised to agents.
pub const TOOL_NAME: &str = "apply_resume_patch";

/// Usage guidance shown to the invoking agent alongside the input
/// schema.
pub const TOOL_DESCRIPTION: &str = "Apply an RFC 6902 JSON Patch batch to the resume document. \
Apply the minimal set of operations; prefer replace for updates, add for new content, remove \
for deletions; use the literal '-' path segment to append to arrays. The batch is atomic: if \
any operation fails, the document is unchanged and the reply explains which operation failed \
and why.";

/// Tool-call input envelope: one member, `operations`, with at least
/// one RFC 6902 operation object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatchRequest {
    pub operations: Vec<Value>,
}

impl PatchRequest {
    pub fn new(operations: Vec<Value>) -> Self {
        Self { operations }
    }

    /// Accept either the `{"operations": [...]}` envelope or a bare op
    /// array (the shape RFC 6902 itself uses).
    pub fn from_json(value: Value) -> Result<Self, serde_json::Error> {
        match value {
            Value::Array(operations) => Ok(Self { operations }),
            other => serde_json::from_value(other),
        }
    }
}

/// JSON Schema (draft 2020-12) for [`PatchRequest`].
///
/// Structural only: pointer resolution and document validity are the
/// engine's runtime concern, so an instance passing this schema can
/// still be rejected.
pub fn tool_input_schema() -> Value {
    json!({
        "$schema": "https://json-schema.org/draft/2020-12/schema",
        "title": TOOL_NAME,
        "description": TOOL_DESCRIPTION,
        "type": "object",
        "required": ["operations"],
        "additionalProperties": false,
        "properties": {
            "operations": {
                "type": "array",
                "minItems": 1,
                "items": {
                    "type": "object",
                    "required": ["op", "path"],
                    "properties": {
                        "op": {
                            "enum": ["add", "remove", "replace", "move", "copy", "test"]
                        },
                        "path": { "type": "string", "pattern": "^$|^/" },
                        "from": { "type": "string", "pattern": "^$|^/" },
                        "value": true
                    },
                    "allOf": [
                        {
                            "if": {
                                "properties": {
                                    "op": { "enum": ["add", "replace", "test"] }
                                }
                            },
                            "then": { "required": ["value"] }
                        },
                        {
                            "if": {
                                "properties": {
                                    "op": { "enum": ["move", "copy"] }
                                }
                            },
                            "then": { "required": ["from"] }
                        }
                    ]
                }
            }
        }
    })
}

/// Success reply body: `{"success": true, "applied_operations": [...]}`.
pub fn success_reply(outcome: &PatchOutcome) -> Value {
    json!({
        "success": true,
        "applied_operations": outcome.applied,
    })
}

/// Failure reply body: the error class plus every diagnostic, each
/// carrying the op index, pointer, and reason the agent needs to
/// correct its batch.
pub fn error_reply(error: &PatchError) -> Value {
    json!({
        "success": false,
        "error_class": error.class(),
        "diagnostics": error.diagnostics,
    })
}
