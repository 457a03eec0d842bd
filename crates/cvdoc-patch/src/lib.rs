#![doc = r#"
⚠️ INTERNAL CRATE – NOT A STABLE API

This crate is an internal implementation detail of the cvdoc project.

Do NOT depend on this crate directly.
Use `cvdoc-io` instead.
"#]

pub mod apply;
pub mod diagnostics;
pub mod op;
pub mod telemetry;
pub mod validate;

pub use apply::apply_ops;
pub use diagnostics::{DiagnosticCode, ErrorClass, PatchDiagnostic, PatchError};
pub use op::{OpKind, PatchOp};
pub use telemetry::PatchTelemetry;
pub use validate::{MAX_OPS_DEFAULT, ValidateOptions, validate_ops, validate_ops_with_options};
