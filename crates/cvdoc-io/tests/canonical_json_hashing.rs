use std::collections::HashMap;

use cvdoc_io::document_json::parse_document_json_str;
use cvdoc_io::{canonical_json, hashing};

#[test]
fn canonical_json_sorts_object_keys() {
    let mut m = HashMap::new();
    m.insert("b", 2);
    m.insert("a", 1);

    let s = canonical_json::to_canonical_json_string(&m).expect("canonical json");
    assert_eq!(s, "{\"a\":1,\"b\":2}");
}

#[test]
fn canonical_json_sorts_nested_objects() {
    let v = serde_json::json!({ "z": { "y": 2, "x": 1 }, "a": [ { "c": 3, "b": 2 } ] });
    let s = canonical_json::to_canonical_json_string(&v).expect("canonical json");
    assert_eq!(s, "{\"a\":[{\"b\":2,\"c\":3}],\"z\":{\"x\":1,\"y\":2}}");
}

#[test]
fn canonical_hash_is_stable() {
    let v = serde_json::json!({ "z": 9, "a": 1 });
    let h1 = hashing::sha256_canonical_json(&v).expect("hash1");
    let h2 = hashing::sha256_canonical_json(&v).expect("hash2");
    assert_eq!(h1, h2);
}

#[test]
fn canonical_hash_changes_on_value_change() {
    let v1 = serde_json::json!({ "a": 1 });
    let v2 = serde_json::json!({ "a": 2 });
    let h1 = hashing::sha256_canonical_json(&v1).expect("hash1");
    let h2 = hashing::sha256_canonical_json(&v2).expect("hash2");
    assert_ne!(h1, h2);
}

#[test]
fn canonical_preserves_array_order() {
    let a1 = serde_json::json!([1, 2, 3]);
    let a2 = serde_json::json!([3, 2, 1]);
    let h1 = hashing::sha256_canonical_json(&a1).expect("hash1");
    let h2 = hashing::sha256_canonical_json(&a2).expect("hash2");
    assert_ne!(h1, h2);
}

#[test]
fn document_fingerprint_ignores_json_formatting() {
    let text = include_str!("../../../fixtures/document.json");
    let doc = parse_document_json_str(text).expect("fixture document is valid");

    // Re-serialize pretty and re-parse; the fingerprint must not move.
    let pretty = serde_json::to_string_pretty(&doc).expect("serialize");
    let reparsed = parse_document_json_str(&pretty).expect("round trip");

    let f1 = hashing::document_fingerprint(&doc).expect("fingerprint");
    let f2 = hashing::document_fingerprint(&reparsed).expect("fingerprint");
    assert_eq!(f1, f2);
    assert!(f1.starts_with("sha256:"));
    assert_eq!(f1.len(), "sha256:".len() + 64);
}

#[test]
fn document_fingerprint_tracks_content() {
    let text = include_str!("../../../fixtures/document.json");
    let doc = parse_document_json_str(text).expect("fixture document is valid");
    let mut changed = doc.clone();
    changed.basics.name = "Jane Doe".to_string();

    let f1 = hashing::document_fingerprint(&doc).expect("fingerprint");
    let f2 = hashing::document_fingerprint(&changed).expect("fingerprint");
    assert_ne!(f1, f2);
}
