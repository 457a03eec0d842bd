//! Parsing document JSON payloads with improved diagnostics.
//!
//! serde's "missing field X" errors are technically correct but
//! unhelpful for users hand-writing fixtures or integrating with the
//! engine. These helpers keep strict validation behavior unchanged
//! while naming the required top-level fields up front.

use std::fmt;

use cvdoc_schema::{Document, SchemaError};
use serde_json::Value;

const REQUIRED_TOP_LEVEL_FIELDS: &[&str] = &["version", "basics", "sections", "metadata"];

/// A structured error for parsing a document JSON payload.
#[derive(Debug)]
pub enum DocumentJsonError {
    /// The input was not valid JSON.
    InvalidJson(serde_json::Error),
    /// The input JSON was valid, but missing required top-level fields.
    MissingRequiredTopLevelFields {
        missing: Vec<&'static str>,
        required: Vec<&'static str>,
    },
    /// JSON was valid and shaped like a document, but the schema
    /// rejected it.
    InvalidDocument(SchemaError),
}

impl fmt::Display for DocumentJsonError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentJsonError::InvalidJson(e) => {
                write!(f, "Invalid JSON: {e}")
            }
            DocumentJsonError::MissingRequiredTopLevelFields { missing, required } => {
                write!(
                    f,
                    "Invalid document JSON: missing required top-level field(s): {}. Required top-level fields: {}.",
                    missing.join(", "),
                    required.join(", ")
                )
            }
            DocumentJsonError::InvalidDocument(e) => {
                write!(f, "Invalid document: {e}")
            }
        }
    }
}

impl std::error::Error for DocumentJsonError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DocumentJsonError::InvalidJson(e) => Some(e),
            DocumentJsonError::MissingRequiredTopLevelFields { .. } => None,
            DocumentJsonError::InvalidDocument(e) => Some(e),
        }
    }
}

/// Parse and validate a document JSON string.
///
/// Strictness is unchanged relative to [`cvdoc_schema::validate`]; the
/// missing-top-level-fields case just gets a friendlier message before
/// the full validator runs.
pub fn parse_document_json_str(s: &str) -> Result<Document, DocumentJsonError> {
    let v: Value = serde_json::from_str(s).map_err(DocumentJsonError::InvalidJson)?;

    if let Some(obj) = v.as_object() {
        let missing: Vec<&'static str> = REQUIRED_TOP_LEVEL_FIELDS
            .iter()
            .copied()
            .filter(|k| !obj.contains_key(*k))
            .collect();
        if !missing.is_empty() {
            return Err(DocumentJsonError::MissingRequiredTopLevelFields {
                missing,
                required: REQUIRED_TOP_LEVEL_FIELDS.to_vec(),
            });
        }
    }

    cvdoc_schema::validate(&v).map_err(DocumentJsonError::InvalidDocument)
}
