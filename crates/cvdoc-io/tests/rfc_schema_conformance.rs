//! Third-party validation parity: the exported JSON Schemas, compiled
//! with the `jsonschema` crate, must agree with the engine's own
//! verdicts on everything the schema language can express.

use anyhow::Result;
use jsonschema::Validator;
use once_cell::sync::Lazy;
use serde_json::{Value, json};

use cvdoc_io::schema_export::{document_json_schema, export_etag};
use cvdoc_io::tool::tool_input_schema;

static DOCUMENT_SCHEMA: Lazy<std::result::Result<Validator, String>> = Lazy::new(|| {
    let schema_json = document_json_schema();
    Validator::new(&schema_json).map_err(|e| format!("compile document schema: {e}"))
});

static TOOL_INPUT_SCHEMA: Lazy<std::result::Result<Validator, String>> = Lazy::new(|| {
    let schema_json = tool_input_schema();
    Validator::new(&schema_json).map_err(|e| format!("compile tool input schema: {e}"))
});

fn document_schema() -> &'static Validator {
    DOCUMENT_SCHEMA.as_ref().unwrap()
}

fn tool_schema() -> &'static Validator {
    TOOL_INPUT_SCHEMA.as_ref().unwrap()
}

fn assert_valid(schema: &Validator, instance: &Value) {
    let mut errors = schema.iter_errors(instance).peekable();
    if errors.peek().is_some() {
        let msgs: Vec<String> = errors.map(|e| e.to_string()).collect();
        panic!("schema validation failed:\n{}", msgs.join("\n"));
    }
}

#[test]
fn fixture_document_conforms_to_the_exported_schema() -> Result<()> {
    let doc: Value = serde_json::from_str(include_str!("../../../fixtures/document.json"))?;
    assert_valid(document_schema(), &doc);
    Ok(())
}

#[test]
fn fixture_patches_match_the_tool_input_schema() -> Result<()> {
    let valid: Value = serde_json::from_str(include_str!("../../../fixtures/patch.valid.json"))?;
    assert_valid(tool_schema(), &valid);

    // Structural problems are visible to the schema.
    let bad_op: Value = serde_json::from_str(include_str!("../../../fixtures/patch.bad_op.json"))?;
    assert!(!tool_schema().is_valid(&bad_op));

    let missing_value: Value =
        serde_json::from_str(include_str!("../../../fixtures/patch.missing_value.json"))?;
    assert!(!tool_schema().is_valid(&missing_value));

    // Whether a pointer resolves is a runtime concern; the schema
    // accepts this one, the engine rejects it later.
    let unknown_path: Value =
        serde_json::from_str(include_str!("../../../fixtures/patch.unknown_path.json"))?;
    assert_valid(tool_schema(), &unknown_path);

    Ok(())
}

#[test]
fn engine_and_exported_schema_agree_on_rejections() -> Result<()> {
    fn drop_name(doc: &mut Value) {
        doc["basics"].as_object_mut().unwrap().remove("name");
    }
    fn wrong_version(doc: &mut Value) {
        doc["version"] = json!(2);
    }
    fn bad_page_format(doc: &mut Value) {
        doc["metadata"]["page"]["format"] = json!("legal");
    }
    fn oversized_font(doc: &mut Value) {
        doc["metadata"]["typography"]["font_size"] = json!(99);
    }
    fn unknown_member(doc: &mut Value) {
        doc["basics"]["nickname"] = json!("JD");
    }
    fn bad_custom_key(doc: &mut Value) {
        let custom = doc["sections"]["custom"].as_object_mut().unwrap();
        let section = custom.remove("certifications").unwrap();
        custom.insert("Bad Key!".to_string(), section);
        // Keep the layout pointing at section keys that still exist.
        doc["metadata"]["layout"] = json!(["summary", "experience"]);
    }

    let base: Value = serde_json::from_str(include_str!("../../../fixtures/document.json"))?;
    let cases: Vec<(&str, fn(&mut Value))> = vec![
        ("missing-required-name", drop_name),
        ("unsupported-version", wrong_version),
        ("bad-page-format", bad_page_format),
        ("oversized-font", oversized_font),
        ("unknown-member", unknown_member),
        ("bad-custom-key", bad_custom_key),
    ];

    for (id, mutate) in cases {
        let mut doc = base.clone();
        mutate(&mut doc);
        assert!(
            !document_schema().is_valid(&doc),
            "{id}: exported schema accepted a document the engine rejects"
        );
        assert!(
            cvdoc_io::schema::validate(&doc).is_err(),
            "{id}: engine accepted a document the exported schema rejects"
        );
    }
    Ok(())
}

#[test]
fn engine_is_stricter_than_the_projection_on_float_integers() -> Result<()> {
    // JSON Schema's "integer" accepts 3.0; the engine requires a true
    // integer. This is the one documented place the engine is stricter
    // than the export.
    let mut doc: Value = serde_json::from_str(include_str!("../../../fixtures/document.json"))?;
    doc["sections"]["skills"]["items"][0]["level"] = json!(3.0);

    assert!(document_schema().is_valid(&doc));
    assert!(cvdoc_io::schema::validate(&doc).is_err());
    Ok(())
}

#[test]
fn cross_field_rules_survive_as_descriptions() {
    let schema = document_json_schema();
    let text = schema.to_string();
    assert!(text.contains("item ids must be unique"));
    assert!(text.contains("start_date must not be later than end_date"));
    assert!(text.contains("existing section key"));
}

#[test]
fn export_is_versioned_and_etagged() -> Result<()> {
    let schema = document_json_schema();
    assert_eq!(
        schema["$schema"],
        "https://json-schema.org/draft/2020-12/schema"
    );
    assert_eq!(
        schema["$id"],
        "https://cvdoc.dev/schemas/document.v1.schema.json"
    );

    let e1 = export_etag(&schema)?;
    let e2 = export_etag(&document_json_schema())?;
    assert_eq!(e1, e2);
    assert!(e1.starts_with("sha256:"));
    Ok(())
}
