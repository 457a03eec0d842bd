//! Projection of the validator tree onto JSON Schema (draft 2020-12).
//!
//! Pure function over the same tree that `check` walks, so the exported
//! schema can never drift from what validation enforces. Rules the
//! schema language cannot express travel as `description` text instead
//! of being dropped.

use serde_json::{Map, Value, json};

use crate::schema::Schema;

/// Render one validator node as a JSON Schema fragment.
pub fn to_json_schema(schema: &Schema) -> Value {
    match schema {
        Schema::Annotated {
            description,
            schema,
        } => {
            let mut inner = to_json_schema(schema);
            if let Value::Object(map) = &mut inner {
                map.insert("description".to_string(), json!(description));
            }
            inner
        }
        Schema::Bool => json!({"type": "boolean"}),
        Schema::UInt { min, max } => json!({
            "type": "integer",
            "minimum": min,
            "maximum": max,
        }),
        Schema::Number { min, max } => json!({
            "type": "number",
            "minimum": min,
            "maximum": max,
        }),
        Schema::Str { min_len, format } => {
            let mut map = Map::new();
            map.insert("type".to_string(), json!("string"));
            if *min_len > 0 {
                map.insert("minLength".to_string(), json!(min_len));
            }
            if let Some(fmt) = format {
                map.insert("pattern".to_string(), json!(fmt.pattern()));
            }
            Value::Object(map)
        }
        Schema::Enum { allowed } => json!({"type": "string", "enum": allowed}),
        Schema::Version { supported } => json!({"type": "integer", "const": supported}),
        Schema::Array { items } => json!({
            "type": "array",
            "items": to_json_schema(items),
        }),
        Schema::Map { keys, values } => json!({
            "type": "object",
            "propertyNames": {"pattern": keys.pattern()},
            "additionalProperties": to_json_schema(values),
        }),
        Schema::Object {
            fields,
            deny_unknown,
        } => {
            let mut properties = Map::new();
            let mut required = Vec::new();
            for field in fields {
                properties.insert(field.name.to_string(), to_json_schema(&field.schema));
                if field.required {
                    required.push(json!(field.name));
                }
            }
            let mut map = Map::new();
            map.insert("type".to_string(), json!("object"));
            map.insert("properties".to_string(), Value::Object(properties));
            if !required.is_empty() {
                map.insert("required".to_string(), Value::Array(required));
            }
            if *deny_unknown {
                map.insert("additionalProperties".to_string(), Value::Bool(false));
            }
            Value::Object(map)
        }
    }
}
