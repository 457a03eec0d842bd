//! Applicator behavior: in-order application, RFC 6902 add/remove/
//! replace/move/copy/test semantics, and the all-or-nothing guarantee.

mod util;

use cvdoc_patch::{DiagnosticCode, ErrorClass, PatchError, PatchOp, apply_ops};
use cvdoc_pointer::Pointer;
use serde_json::{Value, json};
use util::sample_tree;

fn ptr(text: &str) -> Pointer {
    Pointer::parse(text).expect("test pointer must parse")
}

fn apply_single(doc: &Value, op: PatchOp) -> Result<Value, PatchError> {
    apply_ops(doc, &[op])
}

fn expect_failure(doc: &Value, op: PatchOp, code: DiagnosticCode) -> cvdoc_patch::PatchDiagnostic {
    let err = apply_single(doc, op).expect_err("operation should be rejected");
    let diag = err
        .diagnostics
        .into_iter()
        .next()
        .expect("failures carry a diagnostic");
    assert_eq!(diag.code, code);
    diag
}

#[test]
fn append_lands_at_the_end() {
    let doc = sample_tree();
    let op = PatchOp::add(
        ptr("/sections/skills/items/-"),
        json!({ "id": "s3", "name": "Zig" }),
    );
    let out = apply_single(&doc, op).unwrap();
    let items = out["sections"]["skills"]["items"].as_array().unwrap();
    assert_eq!(items.len(), 3);
    assert_eq!(items[2]["name"], "Zig");
}

#[test]
fn append_works_on_an_empty_array() {
    let doc = sample_tree();
    let op = PatchOp::add(
        ptr("/sections/experience/items/-"),
        json!({ "id": "e1", "company": "Acme" }),
    );
    let out = apply_single(&doc, op).unwrap();
    assert_eq!(
        out["sections"]["experience"]["items"],
        json!([{ "id": "e1", "company": "Acme" }])
    );
}

#[test]
fn insert_shifts_later_elements_right() {
    let doc = json!({ "list": [1, 2, 3] });
    let out = apply_single(&doc, PatchOp::add(ptr("/list/1"), json!(9))).unwrap();
    assert_eq!(out["list"], json!([1, 9, 2, 3]));
}

#[test]
fn insert_at_length_appends() {
    let doc = json!({ "list": [1, 2, 3] });
    let out = apply_single(&doc, PatchOp::add(ptr("/list/3"), json!(9))).unwrap();
    assert_eq!(out["list"], json!([1, 2, 3, 9]));
}

#[test]
fn insert_past_length_fails() {
    let doc = json!({ "list": [1, 2, 3] });
    let diag = expect_failure(
        &doc,
        PatchOp::add(ptr("/list/4"), json!(9)),
        DiagnosticCode::IndexOutOfRange,
    );
    assert_eq!(diag.code.class(), ErrorClass::PathResolution);
    assert_eq!(
        diag.message,
        "ops[0] (add) index 4 out of range (length 3) at '/list'"
    );
    assert_eq!(diag.path.as_deref(), Some("/list/4"));
}

#[test]
fn leading_zero_index_fails() {
    let doc = json!({ "list": [1, 2, 3] });
    let diag = expect_failure(
        &doc,
        PatchOp::add(ptr("/list/01"), json!(9)),
        DiagnosticCode::InvalidArrayIndex,
    );
    assert_eq!(
        diag.message,
        "ops[0] (add) '01' is not a valid array index at '/list'"
    );
}

#[test]
fn signed_index_fails() {
    let doc = json!({ "list": [1, 2, 3] });
    expect_failure(
        &doc,
        PatchOp::remove(ptr("/list/+1")),
        DiagnosticCode::InvalidArrayIndex,
    );
    let diag = expect_failure(
        &doc,
        PatchOp::remove(ptr("/list/-1")),
        DiagnosticCode::InvalidArrayIndex,
    );
    assert_eq!(
        diag.message,
        "ops[0] (remove) '-1' is not a valid array index at '/list'"
    );
}

#[test]
fn add_creates_then_overwrites_object_members() {
    let doc = sample_tree();
    let created = apply_single(&doc, PatchOp::add(ptr("/basics/phone"), json!("555"))).unwrap();
    assert_eq!(created["basics"]["phone"], "555");

    let overwritten =
        apply_single(&created, PatchOp::add(ptr("/basics/phone"), json!("556"))).unwrap();
    assert_eq!(overwritten["basics"]["phone"], "556");
    assert_eq!(
        overwritten["basics"].as_object().unwrap().len(),
        created["basics"].as_object().unwrap().len()
    );
}

#[test]
fn dash_is_a_plain_member_name_for_objects() {
    let doc = json!({ "o": {} });
    let out = apply_single(&doc, PatchOp::add(ptr("/o/-"), json!(1))).unwrap();
    assert_eq!(out["o"]["-"], 1);
}

#[test]
fn add_at_root_replaces_the_whole_tree() {
    let doc = sample_tree();
    let out = apply_single(&doc, PatchOp::add(ptr(""), json!({ "fresh": true }))).unwrap();
    assert_eq!(out, json!({ "fresh": true }));
}

#[test]
fn add_with_missing_parent_fails() {
    let doc = json!({ "a": {} });
    let diag = expect_failure(
        &doc,
        PatchOp::add(ptr("/x/y"), json!(1)),
        DiagnosticCode::PathNotFound,
    );
    // The diagnostic names the pointer that failed to resolve, which is
    // the parent of the add target.
    assert_eq!(diag.message, "ops[0] (add) '/x' does not resolve");
    assert_eq!(diag.path.as_deref(), Some("/x"));
}

#[test]
fn descending_through_a_scalar_fails() {
    let doc = json!({ "a": 1 });
    let diag = expect_failure(
        &doc,
        PatchOp::add(ptr("/a/b"), json!(2)),
        DiagnosticCode::PathNotFound,
    );
    assert_eq!(diag.message, "ops[0] (add) '/a' is not a container");
}

#[test]
fn remove_deletes_an_object_member() {
    let doc = sample_tree();
    let out = apply_single(&doc, PatchOp::remove(ptr("/basics/email"))).unwrap();
    assert!(out["basics"].get("email").is_none());
    assert_eq!(out["basics"]["name"], "John");
}

#[test]
fn remove_shifts_array_elements_left() {
    let doc = json!({ "list": [1, 2, 3] });
    let out = apply_single(&doc, PatchOp::remove(ptr("/list/0"))).unwrap();
    assert_eq!(out["list"], json!([2, 3]));
}

#[test]
fn remove_missing_member_fails() {
    let doc = sample_tree();
    let diag = expect_failure(
        &doc,
        PatchOp::remove(ptr("/basics/fax")),
        DiagnosticCode::PathNotFound,
    );
    assert_eq!(diag.message, "ops[0] (remove) '/basics/fax' does not resolve");
}

#[test]
fn remove_out_of_range_index_fails() {
    let doc = sample_tree();
    let diag = expect_failure(
        &doc,
        PatchOp::remove(ptr("/sections/experience/items/0")),
        DiagnosticCode::IndexOutOfRange,
    );
    assert_eq!(
        diag.message,
        "ops[0] (remove) index 0 out of range (length 0) at '/sections/experience/items'"
    );
}

#[test]
fn remove_root_fails() {
    let doc = sample_tree();
    let diag = expect_failure(&doc, PatchOp::remove(ptr("")), DiagnosticCode::CannotRemoveRoot);
    assert_eq!(diag.message, "ops[0] (remove) cannot remove the document root");
}

#[test]
fn remove_append_token_fails() {
    let doc = json!({ "list": [1] });
    let diag = expect_failure(
        &doc,
        PatchOp::remove(ptr("/list/-")),
        DiagnosticCode::AppendNotAllowed,
    );
    assert_eq!(
        diag.message,
        "ops[0] (remove) '-' does not address an existing element at '/list'"
    );
}

#[test]
fn replace_overwrites_an_existing_element() {
    let doc = sample_tree();
    let out = apply_single(&doc, PatchOp::replace(ptr("/basics/name"), json!("Jane"))).unwrap();
    assert_eq!(out["basics"]["name"], "Jane");
}

#[test]
fn replace_missing_element_fails() {
    let doc = sample_tree();
    // Unlike add, replace cannot create the member.
    expect_failure(
        &doc,
        PatchOp::replace(ptr("/basics/fax"), json!("none")),
        DiagnosticCode::PathNotFound,
    );
}

#[test]
fn replace_at_root_swaps_the_document() {
    let doc = sample_tree();
    let out = apply_single(&doc, PatchOp::replace(ptr(""), json!(42))).unwrap();
    assert_eq!(out, json!(42));
}

#[test]
fn move_relocates_between_objects() {
    let doc = json!({ "a": { "x": 1 }, "b": {} });
    let out = apply_single(&doc, PatchOp::mv(ptr("/a/x"), ptr("/b/y"))).unwrap();
    assert_eq!(out, json!({ "a": {}, "b": { "y": 1 } }));
}

#[test]
fn move_reorders_within_an_array() {
    // Indices are interpreted against the intermediate tree: the value
    // is removed first, then inserted into the shorter array.
    let doc = json!({ "list": [1, 2, 3] });
    let out = apply_single(&doc, PatchOp::mv(ptr("/list/0"), ptr("/list/2"))).unwrap();
    assert_eq!(out["list"], json!([2, 3, 1]));
}

#[test]
fn move_onto_itself_is_a_noop() {
    let doc = sample_tree();
    let out = apply_single(&doc, PatchOp::mv(ptr("/basics"), ptr("/basics"))).unwrap();
    assert_eq!(out, doc);
}

#[test]
fn move_into_own_subtree_fails() {
    let doc = json!({ "a": { "b": {} } });
    let diag = expect_failure(
        &doc,
        PatchOp::mv(ptr("/a"), ptr("/a/b/c")),
        DiagnosticCode::MoveIntoOwnSubtree,
    );
    assert_eq!(diag.code.class(), ErrorClass::PathResolution);
    assert_eq!(
        diag.message,
        "ops[0] (move) cannot move '/a' into its own subtree at '/a/b/c'"
    );
}

#[test]
fn move_with_missing_from_fails() {
    let doc = sample_tree();
    expect_failure(
        &doc,
        PatchOp::mv(ptr("/nope"), ptr("/basics/label")),
        DiagnosticCode::PathNotFound,
    );
}

#[test]
fn copy_makes_a_deep_copy() {
    let doc = json!({ "a": { "x": [1] } });
    let ops = [
        PatchOp::copy(ptr("/a"), ptr("/b")),
        PatchOp::replace(ptr("/b/x/0"), json!(9)),
    ];
    let out = apply_ops(&doc, &ops).unwrap();
    assert_eq!(out["a"]["x"], json!([1]));
    assert_eq!(out["b"]["x"], json!([9]));
}

#[test]
fn copy_with_missing_from_fails() {
    let doc = sample_tree();
    expect_failure(
        &doc,
        PatchOp::copy(ptr("/nope"), ptr("/basics/label")),
        DiagnosticCode::PathNotFound,
    );
}

#[test]
fn test_compares_numbers_by_value() {
    let doc = json!({ "n": 1, "m": 1.5 });
    apply_single(&doc, PatchOp::test(ptr("/n"), json!(1.0))).unwrap();
    apply_single(&doc, PatchOp::test(ptr("/m"), json!(1.5))).unwrap();
}

#[test]
fn test_does_not_coerce_strings() {
    let doc = json!({ "n": 10 });
    expect_failure(
        &doc,
        PatchOp::test(ptr("/n"), json!("10")),
        DiagnosticCode::TestMismatch,
    );
}

#[test]
fn test_mismatch_reports_the_expected_value() {
    let doc = sample_tree();
    let diag = expect_failure(
        &doc,
        PatchOp::test(ptr("/basics/name"), json!("Wrong")),
        DiagnosticCode::TestMismatch,
    );
    assert_eq!(diag.code.class(), ErrorClass::Assertion);
    assert_eq!(diag.message, "ops[0] (test) value mismatch at '/basics/name'");
    assert_eq!(diag.expected.as_deref(), Some("\"Wrong\""));
}

#[test]
fn failed_test_guard_aborts_the_batch() {
    let doc = sample_tree();
    let ops = [
        PatchOp::test(ptr("/basics/name"), json!("Someone Else")),
        PatchOp::replace(ptr("/basics/name"), json!("Jane")),
    ];
    let err = apply_ops(&doc, &ops).unwrap_err();
    assert_eq!(err.diagnostics[0].op_index, Some(0));
    assert_eq!(doc["basics"]["name"], "John");
}

#[test]
fn failure_leaves_the_input_untouched() {
    let doc = sample_tree();
    let snapshot = doc.clone();
    let ops = [
        PatchOp::replace(ptr("/basics/name"), json!("Jane")),
        PatchOp::remove(ptr("/does/not/exist")),
    ];
    assert!(apply_ops(&doc, &ops).is_err());
    assert_eq!(doc, snapshot);
}

#[test]
fn operations_apply_in_order() {
    let doc = json!({});
    let forward = [
        PatchOp::add(ptr("/c"), json!(1)),
        PatchOp::replace(ptr("/c"), json!(2)),
    ];
    let out = apply_ops(&doc, &forward).unwrap();
    assert_eq!(out, json!({ "c": 2 }));

    // Reversed, replace runs before the member exists.
    let reversed = [
        PatchOp::replace(ptr("/c"), json!(2)),
        PatchOp::add(ptr("/c"), json!(1)),
    ];
    let err = apply_ops(&doc, &reversed).unwrap_err();
    assert_eq!(err.diagnostics[0].code, DiagnosticCode::PathNotFound);
    assert_eq!(err.diagnostics[0].op_index, Some(0));
}

#[test]
fn later_operations_see_earlier_results() {
    let doc = sample_tree();
    let ops = [
        PatchOp::add(ptr("/sections/skills/items/-"), json!({ "id": "s3" })),
        PatchOp::test(ptr("/sections/skills/items/2/id"), json!("s3")),
    ];
    apply_ops(&doc, &ops).expect("the test sees the appended item");
}

#[test]
fn escaped_tokens_address_literal_names() {
    let doc = json!({ "a/b": { "~x": 1 } });
    let out = apply_single(&doc, PatchOp::replace(ptr("/a~1b/~0x"), json!(2))).unwrap();
    assert_eq!(out["a/b"]["~x"], 2);
}

#[test]
fn diagnostics_pin_the_failing_op_index() {
    let doc = sample_tree();
    let ops = [
        PatchOp::add(ptr("/basics/label"), json!("Engineer")),
        PatchOp::remove(ptr("/basics/fax")),
    ];
    let err = apply_ops(&doc, &ops).unwrap_err();
    assert_eq!(err.diagnostics[0].op_index, Some(1));
    assert_eq!(err.diagnostics[0].op, Some(cvdoc_patch::OpKind::Remove));
}
