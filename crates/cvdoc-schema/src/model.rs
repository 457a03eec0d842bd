use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A stable identifier for a list item. Never reassigned by a patch
/// unless the patch targets it explicitly.
pub type ItemId = String;

/// The root resume document.
///
/// This shape is the single source of truth for what a committed
/// document looks like. `crate::validate` guarantees that any value
/// reaching typed form also satisfies the cross-field rules the type
/// system cannot carry (unique item ids, date ordering, layout keys).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Document {
    /// Document schema version tag. Must equal [`crate::SCHEMA_VERSION`].
    pub version: u32,
    pub basics: Basics,
    pub sections: Sections,
    pub metadata: Metadata,
}

impl Document {
    /// Serialize into a `serde_json` tree (the patch applicator's input).
    pub fn to_value(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}

/// Singleton personal record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Basics {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headline: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// The closed set of sections. Every built-in section is always present;
/// `visible` controls display, not existence, so patch paths stay
/// stable. Additional sections live under `custom`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Sections {
    pub summary: SummarySection,
    pub experience: ListSection<ExperienceItem>,
    pub education: ListSection<EducationItem>,
    pub skills: ListSection<SkillItem>,
    pub projects: ListSection<ProjectItem>,
    pub languages: ListSection<LanguageItem>,
    pub cover_letter: CoverLetterSection,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub custom: BTreeMap<String, CustomSection>,
}

impl Sections {
    /// Keys of the built-in sections, in canonical order.
    pub const BUILTIN_KEYS: [&'static str; 7] = [
        "summary",
        "experience",
        "education",
        "skills",
        "projects",
        "languages",
        "cover_letter",
    ];

    /// True when `key` names a built-in or custom section.
    pub fn contains_key(&self, key: &str) -> bool {
        Self::BUILTIN_KEYS.contains(&key) || self.custom.contains_key(key)
    }

    /// All section keys: built-ins in canonical order, then custom keys
    /// in lexicographic order.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = Self::BUILTIN_KEYS.iter().map(|k| k.to_string()).collect();
        keys.extend(self.custom.keys().cloned());
        keys
    }
}

/// Freeform prose section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SummarySection {
    pub name: String,
    pub visible: bool,
    pub content: String,
}

/// Freeform letter section with an optional addressee.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CoverLetterSection {
    pub name: String,
    pub visible: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient: Option<String>,
    pub content: String,
}

/// A list-type section: display name, visibility flag, ordered items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ListSection<T> {
    pub name: String,
    pub visible: bool,
    pub items: Vec<T>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExperienceItem {
    pub id: ItemId,
    pub company: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub highlights: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EducationItem {
    pub id: ItemId,
    pub institution: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SkillItem {
    pub id: ItemId,
    pub name: String,
    /// Self-assessed proficiency, 0 (unrated) through 5.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<u8>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectItem {
    pub id: ItemId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LanguageItem {
    pub id: ItemId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fluency: Option<Fluency>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Fluency {
    Basic,
    Conversational,
    Fluent,
    Native,
}

/// Custom sections reuse the list shape with a generic item.
pub type CustomSection = ListSection<CustomItem>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CustomItem {
    pub id: ItemId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    /// Free-text date label ("2020", "Mar 2021 – now").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Styling and layout configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Metadata {
    pub template: String,
    /// Ordered section keys to render. Every entry must name an existing
    /// section; duplicates are rejected.
    pub layout: Vec<String>,
    pub page: Page,
    pub theme: Theme,
    pub typography: Typography,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Page {
    pub format: PageFormat,
    /// Page margin in points.
    pub margin: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageFormat {
    A4,
    Letter,
}

/// `#rrggbb` colors; format is enforced by the validator tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Theme {
    pub primary: String,
    pub background: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Typography {
    pub font_family: String,
    pub font_size: u32,
    pub line_height: f64,
}
