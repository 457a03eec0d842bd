use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::op::PatchOp;

/// Deterministic, machine-readable telemetry for a patch application.
///
/// Notes:
/// - Contains *no* wall-clock data: equal batches produce equal
///   telemetry, so it is safe to assert on in CI.
/// - Intended for operational monitoring and cost/complexity analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatchTelemetry {
    /// Patch ops total.
    pub ops: usize,

    /// Patch ops grouped by kind.
    pub ops_by_kind: BTreeMap<String, usize>,

    /// Distinct `path` pointers targeted.
    pub distinct_paths: usize,

    /// Section keys any `path` or `from` pointer reaches into, sorted.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub touched_sections: Vec<String>,
}

impl PatchTelemetry {
    pub fn from_ops(ops: &[PatchOp]) -> Self {
        let mut by_kind: BTreeMap<String, usize> = BTreeMap::new();
        let mut paths: BTreeSet<String> = BTreeSet::new();
        let mut sections: BTreeSet<String> = BTreeSet::new();

        for op in ops {
            *by_kind.entry(op.op.to_string()).or_insert(0) += 1;
            paths.insert(op.path.to_string());
            if let Some(key) = section_key(op.path.tokens()) {
                sections.insert(key.to_string());
            }
            if let Some(from) = &op.from {
                if let Some(key) = section_key(from.tokens()) {
                    sections.insert(key.to_string());
                }
            }
        }

        PatchTelemetry {
            ops: ops.len(),
            ops_by_kind: by_kind,
            distinct_paths: paths.len(),
            touched_sections: sections.into_iter().collect(),
        }
    }
}

/// The section key a pointer reaches into, if any. Custom sections
/// report the key under `custom`, not `custom` itself.
fn section_key(tokens: &[String]) -> Option<&str> {
    match tokens {
        [first, second, rest @ ..] if first == "sections" => {
            if second == "custom" {
                rest.first().map(String::as_str)
            } else {
                Some(second)
            }
        }
        _ => None,
    }
}
