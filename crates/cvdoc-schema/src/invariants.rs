//! Cross-field rules the shape tree cannot express. These run on the
//! typed document, after shape checking and decoding, so they can rely
//! on every field already having the right type.

use std::collections::HashSet;

use cvdoc_pointer::Pointer;

use crate::model::{Document, EducationItem, ExperienceItem, ListSection, ProjectItem};
use crate::schema::date_parts;
use crate::violation::{SchemaViolation, ViolationCode};

/// Check unique item ids, date ordering, and layout references.
pub fn check(doc: &Document) -> Vec<SchemaViolation> {
    let mut out = Vec::new();

    let sections = Pointer::from_tokens(["sections"]);

    check_ids(
        doc.sections.experience.items.iter().map(|i| i.id.as_str()),
        &sections.child("experience"),
        &mut out,
    );
    check_ids(
        doc.sections.education.items.iter().map(|i| i.id.as_str()),
        &sections.child("education"),
        &mut out,
    );
    check_ids(
        doc.sections.skills.items.iter().map(|i| i.id.as_str()),
        &sections.child("skills"),
        &mut out,
    );
    check_ids(
        doc.sections.projects.items.iter().map(|i| i.id.as_str()),
        &sections.child("projects"),
        &mut out,
    );
    check_ids(
        doc.sections.languages.items.iter().map(|i| i.id.as_str()),
        &sections.child("languages"),
        &mut out,
    );
    for (key, section) in &doc.sections.custom {
        check_ids(
            section.items.iter().map(|i| i.id.as_str()),
            &sections.child("custom").child(key.clone()),
            &mut out,
        );
    }

    check_dates(
        &doc.sections.experience,
        &sections.child("experience"),
        ExperienceItem::date_range,
        &mut out,
    );
    check_dates(
        &doc.sections.education,
        &sections.child("education"),
        EducationItem::date_range,
        &mut out,
    );
    check_dates(
        &doc.sections.projects,
        &sections.child("projects"),
        ProjectItem::date_range,
        &mut out,
    );

    check_layout(doc, &mut out);

    out
}

fn check_ids<'a>(
    ids: impl Iterator<Item = &'a str>,
    section_path: &Pointer,
    out: &mut Vec<SchemaViolation>,
) {
    let mut seen = HashSet::new();
    for (index, id) in ids.enumerate() {
        if !seen.insert(id) {
            out.push(SchemaViolation {
                code: ViolationCode::DuplicateId,
                path: section_path
                    .child("items")
                    .child(index.to_string())
                    .child("id")
                    .to_string(),
                expected: Some("id unique within the section".to_string()),
                message: format!("duplicate item id '{id}'"),
            });
        }
    }
}

fn check_dates<T>(
    section: &ListSection<T>,
    section_path: &Pointer,
    range: fn(&T) -> (Option<&str>, Option<&str>),
    out: &mut Vec<SchemaViolation>,
) {
    for (index, item) in section.items.iter().enumerate() {
        let (Some(start), Some(end)) = range(item) else {
            continue;
        };
        // Unparseable dates were already reported by the format check.
        let (Some(start_key), Some(end_key)) = (date_parts(start), date_parts(end)) else {
            continue;
        };
        if start_key > end_key {
            out.push(SchemaViolation {
                code: ViolationCode::DateOrder,
                path: section_path
                    .child("items")
                    .child(index.to_string())
                    .child("end_date")
                    .to_string(),
                expected: Some("end_date on or after start_date".to_string()),
                message: format!("end_date '{end}' precedes start_date '{start}'"),
            });
        }
    }
}

fn check_layout(doc: &Document, out: &mut Vec<SchemaViolation>) {
    let layout = Pointer::from_tokens(["metadata", "layout"]);
    let mut seen = HashSet::new();
    for (index, key) in doc.metadata.layout.iter().enumerate() {
        let entry = layout.child(index.to_string());
        if !doc.sections.contains_key(key) {
            out.push(SchemaViolation {
                code: ViolationCode::UnknownLayoutSection,
                path: entry.to_string(),
                expected: Some("an existing section key".to_string()),
                message: format!("layout entry '{key}' does not name a section"),
            });
        }
        if !seen.insert(key.as_str()) {
            out.push(SchemaViolation {
                code: ViolationCode::DuplicateLayoutEntry,
                path: entry.to_string(),
                expected: Some("each section key at most once".to_string()),
                message: format!("layout entry '{key}' appears more than once"),
            });
        }
    }
}

impl ExperienceItem {
    fn date_range(&self) -> (Option<&str>, Option<&str>) {
        (self.start_date.as_deref(), self.end_date.as_deref())
    }
}

impl EducationItem {
    fn date_range(&self) -> (Option<&str>, Option<&str>) {
        (self.start_date.as_deref(), self.end_date.as_deref())
    }
}

impl ProjectItem {
    fn date_range(&self) -> (Option<&str>, Option<&str>) {
        (self.start_date.as_deref(), self.end_date.as_deref())
    }
}
