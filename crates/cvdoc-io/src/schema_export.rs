//! Versioned JSON Schema export of the document shape.
//!
//! A read-only, side-effect-free projection of the same validator tree
//! the engine enforces, packaged for third-party validation and
//! documentation tooling.

use serde_json::{Value, json};

use cvdoc_schema::document_schema;
use cvdoc_schema::export::to_json_schema;

use crate::hashing::sha256_canonical_json;

/// The exported document schema with `$schema`, `$id`, and title
/// attached.
///
/// The `$id` is versioned by the document schema version, so cached
/// copies stay valid until the constraints actually change.
pub fn document_json_schema() -> Value {
    let mut schema = to_json_schema(&document_schema());
    if let Value::Object(map) = &mut schema {
        map.insert(
            "$schema".to_string(),
            json!("https://json-schema.org/draft/2020-12/schema"),
        );
        map.insert(
            "$id".to_string(),
            json!(format!(
                "https://cvdoc.dev/schemas/document.v{}.schema.json",
                cvdoc_schema::SCHEMA_VERSION
            )),
        );
        map.insert("title".to_string(), json!("Resume document"));
    }
    schema
}

/// Content hash of an exported schema, `sha256:<hex>`, usable as an
/// HTTP etag.
pub fn export_etag(schema: &Value) -> Result<String, serde_json::Error> {
    Ok(format!("sha256:{}", sha256_canonical_json(schema)?))
}
