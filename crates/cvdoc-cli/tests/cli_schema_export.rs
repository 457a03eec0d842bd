use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

fn fixture_path(file: &str) -> std::path::PathBuf {
    std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join("fixtures")
        .join(file)
}

#[test]
fn schema_prints_the_versioned_document_schema() {
    let mut cmd = cargo_bin_cmd!("cvdoc");
    cmd.args(["schema"]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("document.v1.schema.json"))
        .stdout(predicate::str::contains("\"title\": \"Resume document\""));
}

#[test]
fn schema_kind_patch_prints_the_tool_input_schema() {
    let mut cmd = cargo_bin_cmd!("cvdoc");
    cmd.args(["schema", "--kind", "patch"]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("apply_resume_patch"))
        .stdout(predicate::str::contains("\"minItems\": 1"));
}

#[test]
fn schema_min_is_a_single_line() {
    let mut cmd = cargo_bin_cmd!("cvdoc");
    cmd.args(["schema", "--min"]);

    let out = cmd.assert().success().get_output().stdout.clone();
    let out = String::from_utf8(out).unwrap();
    assert_eq!(out.lines().count(), 1);
    assert!(out.starts_with('{'));
}

#[test]
fn schema_etag_is_stable_across_runs() {
    let mut cmd = cargo_bin_cmd!("cvdoc");
    cmd.args(["schema", "--etag"]);
    let first = cmd.assert().success().get_output().stdout.clone();

    let mut cmd = cargo_bin_cmd!("cvdoc");
    cmd.args(["schema", "--etag"]);
    let second = cmd.assert().success().get_output().stdout.clone();

    assert_eq!(first, second);
    let etag = String::from_utf8(first).unwrap();
    assert!(etag.starts_with("sha256:"));
}

#[test]
fn schema_verify_accepts_the_golden_document() {
    let doc = fixture_path("document.json");

    let mut cmd = cargo_bin_cmd!("cvdoc");
    cmd.args(["schema", "--verify", doc.to_str().unwrap()]);

    cmd.assert().success().code(0).stdout("OK\n");
}

#[test]
fn schema_verify_rejects_invalid_instances_with_exit_2() {
    let doc = fixture_path("document.missing_fields.json");

    let mut cmd = cargo_bin_cmd!("cvdoc");
    cmd.args(["schema", "--verify", doc.to_str().unwrap()]);

    cmd.assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("required property"))
        .stderr(predicate::str::contains("(at instance path"));
}

#[test]
fn schema_verify_checks_patches_against_the_patch_schema() {
    let good = fixture_path("patch.valid.json");
    let bad = fixture_path("patch.missing_value.json");

    let mut cmd = cargo_bin_cmd!("cvdoc");
    cmd.args(["schema", "--kind", "patch", "--verify", good.to_str().unwrap()]);
    cmd.assert().success().code(0).stdout("OK\n");

    let mut cmd = cargo_bin_cmd!("cvdoc");
    cmd.args(["schema", "--kind", "patch", "--verify", bad.to_str().unwrap()]);
    cmd.assert().failure().code(2);
}
