//! `cvdoc-io` is the single supported public entrypoint for the resume
//! document model and its JSON Patch engine (structural validation,
//! ordered application, schema re-validation).
//!
//! This crate intentionally contains **no** rendering, persistence, or
//! AI logic. Those belong in higher layers. `cvdoc-io` focuses on:
//! - stable types
//! - the patch tool facade
//! - canonical JSON and hashing
//! - the versioned schema export

// -----------------------------------------------------------------------------
// Public API contract
// -----------------------------------------------------------------------------
//
// Consumers SHOULD import from `cvdoc_io::prelude::*`.
// Anything not re-exported via the prelude is considered internal and may change
// without notice.

// Re-export the canonical document model and its validator.
#[doc(hidden)]
pub mod schema {
    pub use cvdoc_schema::model::{
        Basics, CoverLetterSection, CustomItem, CustomSection, Document, EducationItem,
        ExperienceItem, Fluency, LanguageItem, ListSection, Metadata, Page, PageFormat,
        ProjectItem, Sections, SkillItem, SummarySection, Theme, Typography,
    };
    pub use cvdoc_schema::{
        SCHEMA_VERSION, Schema, SchemaError, SchemaViolation, StrFormat, ViolationCode,
        document_schema, validate,
    };
}

// Re-export the patch operation types and helpers.
#[doc(hidden)]
pub mod patch {
    pub use cvdoc_patch::{
        DiagnosticCode, ErrorClass, MAX_OPS_DEFAULT, OpKind, PatchDiagnostic, PatchError, PatchOp,
        PatchTelemetry, ValidateOptions, apply_ops, validate_ops, validate_ops_with_options,
    };
}

// Re-export the pointer type shared by both.
#[doc(hidden)]
pub mod pointer {
    pub use cvdoc_pointer::{ArrayToken, Pointer, PointerParseError};
}

/// Deterministic JSON canonicalization helpers.
///
/// These utilities are used for stable hashing, fingerprints, and etags.
pub mod canonical_json;

/// Friendly parsing for document JSON payloads.
pub mod document_json;

/// The validate → apply → re-validate pipeline.
pub mod engine;

/// Hash helpers for canonical JSON and document fingerprints.
pub mod hashing;

/// Versioned JSON Schema export of the document shape.
pub mod schema_export;

/// Persistence boundary and the in-memory reference store.
pub mod store;

/// Agent-facing tool-call surface.
pub mod tool;

/// Version constants for schema and tool-contract gating.
pub mod version;

/// Convenience prelude for consumers.
///
/// This is the **only supported** import surface for external users.
pub mod prelude {
    pub use crate::engine::{
        EngineError, PatchOutcome, apply_patch, apply_patch_with_options, apply_to_store,
        apply_to_store_with_options,
    };
    pub use crate::patch::{
        DiagnosticCode, ErrorClass, OpKind, PatchDiagnostic, PatchError, PatchOp, PatchTelemetry,
        ValidateOptions,
    };
    pub use crate::pointer::Pointer;
    pub use crate::schema::{Document, SchemaError, SchemaViolation, ViolationCode};
    pub use crate::store::{DocumentStore, MemoryStore};
    pub use crate::tool::PatchRequest;
    pub use crate::{canonical_json, hashing};
}
