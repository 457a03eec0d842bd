//! Hash helpers for canonical JSON and document fingerprints.

use serde::Serialize;

use cvdoc_schema::Document;

use crate::canonical_json::to_canonical_json_bytes;

/// Return lowercase hex SHA-256 of bytes.
pub fn sha256_hex(bytes: &[u8]) -> String {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// Hash canonical JSON bytes using SHA-256 and return lowercase hex.
pub fn sha256_canonical_json<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    let bytes = to_canonical_json_bytes(value)?;
    Ok(sha256_hex(&bytes))
}

/// Deterministic fingerprint of a document, `sha256:<hex>`.
///
/// Two documents with the same content always fingerprint identically,
/// regardless of how their JSON was formatted or key-ordered, which is
/// what a store needs for optimistic versioning.
pub fn document_fingerprint(document: &Document) -> Result<String, serde_json::Error> {
    Ok(format!("sha256:{}", sha256_canonical_json(document)?))
}
