use cvdoc_pointer::Pointer;
use serde_json::Value;

use crate::violation::{SchemaViolation, ViolationCode};

/// Format rule for a string leaf.
///
/// Each format is a hand-rolled check plus an equivalent anchored regex
/// source for the JSON Schema projection. The two MUST stay in
/// agreement; `rfc_schema_conformance` in cvdoc-io exercises the pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrFormat {
    /// `local@domain.tld`-ish. Intentionally loose: one `@`, a dotted
    /// domain, no whitespace.
    Email,
    /// Absolute http(s) URL.
    Url,
    /// `YYYY-MM` or `YYYY-MM-DD` with real month/day ranges.
    Date,
    /// `#rrggbb` hex color.
    HexColor,
    /// Section key: lowercase letters, digits, `_`, `-`.
    Key,
}

impl StrFormat {
    pub fn check(self, text: &str) -> bool {
        match self {
            StrFormat::Email => email_ok(text),
            StrFormat::Url => url_ok(text),
            StrFormat::Date => date_parts(text).is_some(),
            StrFormat::HexColor => hex_color_ok(text),
            StrFormat::Key => key_ok(text),
        }
    }

    /// Human label used in violation messages and `expected` hints.
    pub fn label(self) -> &'static str {
        match self {
            StrFormat::Email => "email address",
            StrFormat::Url => "absolute http(s) url",
            StrFormat::Date => "date (YYYY-MM or YYYY-MM-DD)",
            StrFormat::HexColor => "hex color (#rrggbb)",
            StrFormat::Key => "section key ([a-z0-9_-]+)",
        }
    }

    /// Anchored regex source for the JSON Schema projection.
    pub fn pattern(self) -> &'static str {
        match self {
            StrFormat::Email => r"^[^@\s]+@[^@\s]+\.[^@\s]+$",
            StrFormat::Url => r"^https?://\S+$",
            StrFormat::Date => r"^[0-9]{4}-(0[1-9]|1[0-2])(-(0[1-9]|[12][0-9]|3[01]))?$",
            StrFormat::HexColor => r"^#[0-9a-fA-F]{6}$",
            StrFormat::Key => r"^[a-z0-9_-]+$",
        }
    }
}

fn email_ok(text: &str) -> bool {
    if text.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = text.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain
            .char_indices()
            .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
}

fn url_ok(text: &str) -> bool {
    let rest = text
        .strip_prefix("https://")
        .or_else(|| text.strip_prefix("http://"));
    match rest {
        Some(rest) => !rest.is_empty() && !text.chars().any(char::is_whitespace),
        None => false,
    }
}

fn digits(text: &str) -> Option<u32> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

/// Parse `YYYY-MM` or `YYYY-MM-DD` into `(year, month, day)`; the day is
/// `0` for month precision so tuples order correctly across precisions.
pub(crate) fn date_parts(text: &str) -> Option<(u32, u32, u32)> {
    if !text.is_ascii() {
        return None;
    }
    let (ym, day) = match text.len() {
        7 => (text, 0),
        10 => {
            if text.as_bytes()[7] != b'-' {
                return None;
            }
            (&text[..7], digits(&text[8..10])?)
        }
        _ => return None,
    };
    if ym.as_bytes()[4] != b'-' {
        return None;
    }
    let year = digits(&ym[..4])?;
    let month = digits(&ym[5..7])?;
    if !(1..=12).contains(&month) {
        return None;
    }
    if text.len() == 10 && !(1..=31).contains(&day) {
        return None;
    }
    Some((year, month, day))
}

fn hex_color_ok(text: &str) -> bool {
    match text.strip_prefix('#') {
        Some(hex) => hex.len() == 6 && hex.bytes().all(|b| b.is_ascii_hexdigit()),
        None => false,
    }
}

fn key_ok(text: &str) -> bool {
    !text.is_empty()
        && text
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'_' || b == b'-')
}

/// One field of an [`Schema::Object`] node.
#[derive(Debug, Clone)]
pub struct Field {
    pub name: &'static str,
    pub required: bool,
    pub schema: Schema,
}

impl Field {
    pub fn required(name: &'static str, schema: Schema) -> Self {
        Field {
            name,
            required: true,
            schema,
        }
    }

    pub fn optional(name: &'static str, schema: Schema) -> Self {
        Field {
            name,
            required: false,
            schema,
        }
    }
}

/// One node of the document validator tree.
///
/// The tree is data, not code: the same value drives candidate checking
/// here and the JSON Schema projection in [`crate::export`]. Checking
/// collects violations instead of stopping at the first one.
#[derive(Debug, Clone)]
pub enum Schema {
    /// JSON boolean.
    Bool,
    /// Unsigned integer within an inclusive range.
    UInt { min: u64, max: u64 },
    /// JSON number within an inclusive range.
    Number { min: f64, max: f64 },
    /// String with a minimum length and an optional format rule.
    Str {
        min_len: usize,
        format: Option<StrFormat>,
    },
    /// String restricted to a closed set of literals.
    Enum { allowed: &'static [&'static str] },
    /// The document version tag: an exact integer.
    Version { supported: u64 },
    /// Homogeneous array.
    Array { items: Box<Schema> },
    /// Open map with format-checked keys and homogeneous values.
    Map { keys: StrFormat, values: Box<Schema> },
    /// Closed object shape. Absent optional fields are fine; a present
    /// `null` is not a stand-in for absent and fails the field's check.
    Object {
        fields: Vec<Field>,
        deny_unknown: bool,
    },
    /// Attaches prose to a node for the JSON Schema projection. Checking
    /// is unaffected. Carries the rules the schema language cannot
    /// express (unique ids, date ordering, layout references).
    Annotated {
        description: &'static str,
        schema: Box<Schema>,
    },
}

impl Schema {
    /// Short type word for messages and `expected` hints.
    pub fn type_name(&self) -> &'static str {
        match self {
            Schema::Bool => "boolean",
            Schema::UInt { .. } | Schema::Version { .. } => "integer",
            Schema::Number { .. } => "number",
            Schema::Str { .. } | Schema::Enum { .. } => "string",
            Schema::Array { .. } => "array",
            Schema::Map { .. } | Schema::Object { .. } => "object",
            Schema::Annotated { schema, .. } => schema.type_name(),
        }
    }

    /// Check `value` against this node, collecting every violation found.
    pub fn check(&self, value: &Value) -> Vec<SchemaViolation> {
        let mut out = Vec::new();
        let mut cursor = Pointer::root();
        self.check_at(value, &mut cursor, &mut out);
        out
    }

    fn check_at(&self, value: &Value, cursor: &mut Pointer, out: &mut Vec<SchemaViolation>) {
        match self {
            Schema::Annotated { schema, .. } => schema.check_at(value, cursor, out),
            Schema::Bool => {
                if !value.is_boolean() {
                    out.push(wrong_type(cursor, "boolean"));
                }
            }
            Schema::UInt { min, max } => match value.as_u64() {
                Some(n) if (*min..=*max).contains(&n) => {}
                Some(n) => out.push(SchemaViolation {
                    code: ViolationCode::OutOfRange,
                    path: cursor.to_string(),
                    expected: Some(format!("integer in {min}..={max}")),
                    message: format!("{n} is outside {min}..={max}"),
                }),
                None => out.push(wrong_type(cursor, "integer")),
            },
            Schema::Number { min, max } => match value.as_f64() {
                Some(n) if n >= *min && n <= *max => {}
                Some(n) => out.push(SchemaViolation {
                    code: ViolationCode::OutOfRange,
                    path: cursor.to_string(),
                    expected: Some(format!("number in {min}..={max}")),
                    message: format!("{n} is outside {min}..={max}"),
                }),
                None => out.push(wrong_type(cursor, "number")),
            },
            Schema::Str { min_len, format } => match value.as_str() {
                None => out.push(wrong_type(cursor, "string")),
                Some(text) => {
                    if text.chars().count() < *min_len {
                        out.push(SchemaViolation {
                            code: ViolationCode::EmptyValue,
                            path: cursor.to_string(),
                            expected: Some("non-empty string".to_string()),
                            message: "string must not be empty".to_string(),
                        });
                    } else if let Some(fmt) = format {
                        if !fmt.check(text) {
                            out.push(SchemaViolation {
                                code: ViolationCode::BadFormat,
                                path: cursor.to_string(),
                                expected: Some(fmt.label().to_string()),
                                message: format!("'{text}' is not a valid {}", fmt.label()),
                            });
                        }
                    }
                }
            },
            Schema::Enum { allowed } => match value.as_str() {
                None => out.push(wrong_type(cursor, "string")),
                Some(text) => {
                    if !allowed.contains(&text) {
                        out.push(SchemaViolation {
                            code: ViolationCode::UnknownVariant,
                            path: cursor.to_string(),
                            expected: Some(format!("one of: {}", allowed.join(" | "))),
                            message: format!("'{text}' is not an allowed value"),
                        });
                    }
                }
            },
            Schema::Version { supported } => match value.as_u64() {
                Some(n) if n == *supported => {}
                Some(n) => out.push(SchemaViolation {
                    code: ViolationCode::UnsupportedVersion,
                    path: cursor.to_string(),
                    expected: Some(format!("version {supported}")),
                    message: format!("unsupported document version {n}"),
                }),
                None => out.push(wrong_type(cursor, "integer")),
            },
            Schema::Array { items } => match value.as_array() {
                None => out.push(wrong_type(cursor, "array")),
                Some(elements) => {
                    for (index, element) in elements.iter().enumerate() {
                        cursor.push(index.to_string());
                        items.check_at(element, cursor, out);
                        cursor.pop();
                    }
                }
            },
            Schema::Map { keys, values } => match value.as_object() {
                None => out.push(wrong_type(cursor, "object")),
                Some(map) => {
                    for (key, entry) in map {
                        cursor.push(key.clone());
                        if !keys.check(key) {
                            out.push(SchemaViolation {
                                code: ViolationCode::BadKey,
                                path: cursor.to_string(),
                                expected: Some(keys.label().to_string()),
                                message: format!("'{key}' is not a valid {}", keys.label()),
                            });
                        }
                        values.check_at(entry, cursor, out);
                        cursor.pop();
                    }
                }
            },
            Schema::Object {
                fields,
                deny_unknown,
            } => match value.as_object() {
                None => out.push(wrong_type(cursor, "object")),
                Some(map) => {
                    for field in fields {
                        match map.get(field.name) {
                            Some(entry) => {
                                cursor.push(field.name);
                                field.schema.check_at(entry, cursor, out);
                                cursor.pop();
                            }
                            None if field.required => out.push(SchemaViolation {
                                code: ViolationCode::MissingField,
                                path: cursor.child(field.name).to_string(),
                                expected: Some(field.schema.type_name().to_string()),
                                message: format!("missing required field '{}'", field.name),
                            }),
                            None => {}
                        }
                    }
                    if *deny_unknown {
                        for key in map.keys() {
                            if fields.iter().all(|f| f.name != key.as_str()) {
                                out.push(SchemaViolation {
                                    code: ViolationCode::UnknownField,
                                    path: cursor.child(key.clone()).to_string(),
                                    expected: None,
                                    message: format!("unknown field '{key}'"),
                                });
                            }
                        }
                    }
                }
            },
        }
    }
}

fn wrong_type(cursor: &Pointer, expected: &'static str) -> SchemaViolation {
    SchemaViolation {
        code: ViolationCode::WrongType,
        path: cursor.to_string(),
        expected: Some(expected.to_string()),
        message: format!("expected {expected}"),
    }
}

fn required_str() -> Schema {
    Schema::Str {
        min_len: 1,
        format: None,
    }
}

fn any_str() -> Schema {
    Schema::Str {
        min_len: 0,
        format: None,
    }
}

fn fmt_str(format: StrFormat) -> Schema {
    Schema::Str {
        min_len: 1,
        format: Some(format),
    }
}

fn str_array() -> Schema {
    Schema::Array {
        items: Box::new(any_str()),
    }
}

/// `name` / `visible` / `items` shape shared by every list section.
fn list_section(item: Schema) -> Schema {
    Schema::Object {
        deny_unknown: true,
        fields: vec![
            Field::required("name", required_str()),
            Field::required("visible", Schema::Bool),
            Field::required(
                "items",
                Schema::Annotated {
                    description: "item ids must be unique within the section",
                    schema: Box::new(Schema::Array {
                        items: Box::new(item),
                    }),
                },
            ),
        ],
    }
}

fn dated(fields: Vec<Field>) -> Schema {
    Schema::Annotated {
        description: "start_date must not be later than end_date",
        schema: Box::new(Schema::Object {
            deny_unknown: true,
            fields,
        }),
    }
}

fn experience_item() -> Schema {
    dated(vec![
        Field::required("id", required_str()),
        Field::required("company", required_str()),
        Field::optional("position", any_str()),
        Field::optional("start_date", fmt_str(StrFormat::Date)),
        Field::optional("end_date", fmt_str(StrFormat::Date)),
        Field::optional("url", fmt_str(StrFormat::Url)),
        Field::optional("summary", any_str()),
        Field::optional("highlights", str_array()),
    ])
}

fn education_item() -> Schema {
    dated(vec![
        Field::required("id", required_str()),
        Field::required("institution", required_str()),
        Field::optional("area", any_str()),
        Field::optional("score", any_str()),
        Field::optional("start_date", fmt_str(StrFormat::Date)),
        Field::optional("end_date", fmt_str(StrFormat::Date)),
        Field::optional("summary", any_str()),
    ])
}

fn skill_item() -> Schema {
    Schema::Object {
        deny_unknown: true,
        fields: vec![
            Field::required("id", required_str()),
            Field::required("name", required_str()),
            Field::optional("level", Schema::UInt { min: 0, max: 5 }),
            Field::optional("keywords", str_array()),
        ],
    }
}

fn project_item() -> Schema {
    dated(vec![
        Field::required("id", required_str()),
        Field::required("name", required_str()),
        Field::optional("description", any_str()),
        Field::optional("url", fmt_str(StrFormat::Url)),
        Field::optional("start_date", fmt_str(StrFormat::Date)),
        Field::optional("end_date", fmt_str(StrFormat::Date)),
        Field::optional("keywords", str_array()),
    ])
}

fn language_item() -> Schema {
    Schema::Object {
        deny_unknown: true,
        fields: vec![
            Field::required("id", required_str()),
            Field::required("name", required_str()),
            Field::optional(
                "fluency",
                Schema::Enum {
                    allowed: &["basic", "conversational", "fluent", "native"],
                },
            ),
        ],
    }
}

fn custom_item() -> Schema {
    Schema::Object {
        deny_unknown: true,
        fields: vec![
            Field::required("id", required_str()),
            Field::required("title", required_str()),
            Field::optional("subtitle", any_str()),
            Field::optional("date", any_str()),
            Field::optional("description", any_str()),
            Field::optional("url", fmt_str(StrFormat::Url)),
        ],
    }
}

fn freeform_section(fields: Vec<Field>) -> Schema {
    let mut all = vec![
        Field::required("name", required_str()),
        Field::required("visible", Schema::Bool),
    ];
    all.extend(fields);
    Schema::Object {
        deny_unknown: true,
        fields: all,
    }
}

fn basics_schema() -> Schema {
    Schema::Object {
        deny_unknown: true,
        fields: vec![
            Field::required("name", required_str()),
            Field::optional("headline", any_str()),
            Field::optional("email", fmt_str(StrFormat::Email)),
            Field::optional("phone", any_str()),
            Field::optional("location", any_str()),
            Field::optional("url", fmt_str(StrFormat::Url)),
        ],
    }
}

fn sections_schema() -> Schema {
    Schema::Object {
        deny_unknown: true,
        fields: vec![
            Field::required(
                "summary",
                freeform_section(vec![Field::required("content", any_str())]),
            ),
            Field::required("experience", list_section(experience_item())),
            Field::required("education", list_section(education_item())),
            Field::required("skills", list_section(skill_item())),
            Field::required("projects", list_section(project_item())),
            Field::required("languages", list_section(language_item())),
            Field::required(
                "cover_letter",
                freeform_section(vec![
                    Field::optional("recipient", any_str()),
                    Field::required("content", any_str()),
                ]),
            ),
            Field::optional(
                "custom",
                Schema::Map {
                    keys: StrFormat::Key,
                    values: Box::new(list_section(custom_item())),
                },
            ),
        ],
    }
}

fn metadata_schema() -> Schema {
    Schema::Object {
        deny_unknown: true,
        fields: vec![
            Field::required("template", required_str()),
            Field::required(
                "layout",
                Schema::Annotated {
                    description: "every entry must name an existing section key; no duplicates",
                    schema: Box::new(Schema::Array {
                        items: Box::new(fmt_str(StrFormat::Key)),
                    }),
                },
            ),
            Field::required(
                "page",
                Schema::Object {
                    deny_unknown: true,
                    fields: vec![
                        Field::required(
                            "format",
                            Schema::Enum {
                                allowed: &["a4", "letter"],
                            },
                        ),
                        Field::required("margin", Schema::UInt { min: 18, max: 144 }),
                    ],
                },
            ),
            Field::required(
                "theme",
                Schema::Object {
                    deny_unknown: true,
                    fields: vec![
                        Field::required("primary", fmt_str(StrFormat::HexColor)),
                        Field::required("background", fmt_str(StrFormat::HexColor)),
                        Field::required("text", fmt_str(StrFormat::HexColor)),
                    ],
                },
            ),
            Field::required(
                "typography",
                Schema::Object {
                    deny_unknown: true,
                    fields: vec![
                        Field::required("font_family", required_str()),
                        Field::required("font_size", Schema::UInt { min: 6, max: 36 }),
                        Field::required("line_height", Schema::Number { min: 1.0, max: 3.0 }),
                    ],
                },
            ),
            Field::optional("notes", any_str()),
        ],
    }
}

/// The full validator tree for a resume document.
pub fn document_schema() -> Schema {
    Schema::Object {
        deny_unknown: true,
        fields: vec![
            Field::required(
                "version",
                Schema::Version {
                    supported: crate::SCHEMA_VERSION as u64,
                },
            ),
            Field::required("basics", basics_schema()),
            Field::required("sections", sections_schema()),
            Field::required("metadata", metadata_schema()),
        ],
    }
}
