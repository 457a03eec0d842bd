use serde_json::{Value, json};

/// Compact resume-shaped tree for apply tests. The patch crate is
/// schema-agnostic, so this stays smaller than a full document.
#[allow(dead_code)]
pub fn sample_tree() -> Value {
    json!({
        "basics": { "name": "John", "email": "john@doe.dev" },
        "sections": {
            "experience": { "name": "Experience", "visible": true, "items": [] },
            "skills": {
                "name": "Skills",
                "visible": true,
                "items": [
                    { "id": "s1", "name": "Rust" },
                    { "id": "s2", "name": "Go" }
                ]
            }
        },
        "metadata": { "layout": ["experience", "skills"] }
    })
}

/// Split a `json!([...])` batch into the raw op list the validator
/// consumes.
#[allow(dead_code)]
pub fn raw_ops(batch: Value) -> Vec<Value> {
    batch
        .as_array()
        .expect("ops fixture must be an array")
        .clone()
}
