//! Deterministic JSON canonicalization.
//!
//! The goal is stable bytes for hashing, fingerprints, and etags:
//! - object keys are sorted lexicographically
//! - arrays preserve order
//! - output is minified JSON with no extra whitespace

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

/// Convert a serializable value to canonical JSON bytes.
pub fn to_canonical_json_bytes<T: Serialize>(value: &T) -> Result<Vec<u8>, serde_json::Error> {
    let canon = canonicalize(serde_json::to_value(value)?);
    let mut out = Vec::new();
    serde_json::to_writer(&mut out, &canon)?;
    Ok(out)
}

/// Convert a serializable value to a canonical JSON string.
pub fn to_canonical_json_string<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    let bytes = to_canonical_json_bytes(value)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

// Sorts explicitly instead of relying on serde_json's map type: any
// crate in the build graph can switch on `preserve_order` and change
// the iteration order of `serde_json::Map`.
fn canonicalize(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let sorted: BTreeMap<String, Value> = map
                .into_iter()
                .map(|(k, v)| (k, canonicalize(v)))
                .collect();
            Value::Object(sorted.into_iter().collect())
        }
        Value::Array(items) => Value::Array(items.into_iter().map(canonicalize).collect()),
        scalar => scalar,
    }
}
