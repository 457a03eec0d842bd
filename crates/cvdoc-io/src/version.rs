//! Schema and tool-contract version constants.

/// Document schema version this build reads and writes.
///
/// This corresponds to the `version` field in documents.
pub const DOCUMENT_SCHEMA_V: u32 = cvdoc_schema::SCHEMA_VERSION;

/// Tool-call contract version (request envelope + reply shapes).
pub const TOOL_SPEC_V: u8 = 1;

/// JSON Schema export bundle version.
///
/// Bump this if the exported schema constraints change (even if the
/// document `version` stays the same).
pub const SCHEMA_BUNDLE_V: u8 = 1;
