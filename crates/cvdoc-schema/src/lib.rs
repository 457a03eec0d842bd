#![doc = r#"
⚠️ INTERNAL CRATE – NOT A STABLE API

This crate is an internal implementation detail of the cvdoc project.

Do NOT depend on this crate directly.
Use `cvdoc-io` instead.
"#]

pub mod export;
pub mod invariants;
pub mod model;
pub mod schema;
pub mod violation;

pub use model::Document;
pub use schema::{Schema, StrFormat, document_schema};
pub use violation::{SchemaError, SchemaViolation, ViolationCode};

/// Document schema version this build reads and writes.
pub const SCHEMA_VERSION: u32 = 1;

/// Validate an arbitrary JSON tree as a resume document.
///
/// Three stages, each only reached when the previous one passed:
/// 1. shape check against the validator tree (types, required fields,
///    enums, formats, ranges), collecting every violation;
/// 2. typed decode into [`Document`];
/// 3. cross-field invariants on the typed tree (unique item ids, date
///    ordering, layout references).
///
/// Pure: no side effects, the input is never mutated.
pub fn validate(candidate: &serde_json::Value) -> Result<Document, SchemaError> {
    let violations = document_schema().check(candidate);
    if !violations.is_empty() {
        return Err(SchemaError { violations });
    }

    let document: Document = serde_json::from_value(candidate.clone()).map_err(|e| {
        SchemaError::single(SchemaViolation {
            code: ViolationCode::DecodeFailed,
            path: String::new(),
            expected: None,
            message: format!("document decode failed: {e}"),
        })
    })?;

    let violations = invariants::check(&document);
    if violations.is_empty() {
        Ok(document)
    } else {
        Err(SchemaError { violations })
    }
}
