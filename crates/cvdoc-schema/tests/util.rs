use serde_json::{Value, json};

/// A fully valid document exercising every section kind, including one
/// custom section referenced from the layout.
#[allow(dead_code)]
pub fn sample_document() -> Value {
    json!({
        "version": 1,
        "basics": {
            "name": "John Doe",
            "headline": "Systems Engineer",
            "email": "john@doe.dev",
            "phone": "+31 6 1234 5678",
            "location": "Eindhoven, NL",
            "url": "https://johndoe.dev"
        },
        "sections": {
            "summary": {
                "name": "Summary",
                "visible": true,
                "content": "Engineer of fifteen years."
            },
            "experience": {
                "name": "Experience",
                "visible": true,
                "items": [
                    {
                        "id": "exp-1",
                        "company": "Acme",
                        "position": "Engineer",
                        "start_date": "2019-03",
                        "end_date": "2022-11",
                        "url": "https://acme.test",
                        "summary": "Built things.",
                        "highlights": ["Shipped v2", "Led a team of four"]
                    }
                ]
            },
            "education": {
                "name": "Education",
                "visible": true,
                "items": [
                    {
                        "id": "edu-1",
                        "institution": "TU Eindhoven",
                        "area": "Computer Science",
                        "score": "8/10",
                        "start_date": "2010-09",
                        "end_date": "2014-07"
                    }
                ]
            },
            "skills": {
                "name": "Skills",
                "visible": true,
                "items": [
                    {
                        "id": "skill-1",
                        "name": "Rust",
                        "level": 5,
                        "keywords": ["systems", "tooling"]
                    }
                ]
            },
            "projects": {
                "name": "Projects",
                "visible": true,
                "items": [
                    {
                        "id": "proj-1",
                        "name": "cvdoc",
                        "description": "Document patch engine",
                        "url": "https://example.org/cvdoc"
                    }
                ]
            },
            "languages": {
                "name": "Languages",
                "visible": true,
                "items": [
                    { "id": "lang-1", "name": "Dutch", "fluency": "native" }
                ]
            },
            "cover_letter": {
                "name": "Cover Letter",
                "visible": false,
                "recipient": "Hiring Team",
                "content": "Dear team,"
            },
            "custom": {
                "certifications": {
                    "name": "Certifications",
                    "visible": true,
                    "items": [
                        { "id": "cert-1", "title": "CKA", "date": "2021" }
                    ]
                }
            }
        },
        "metadata": {
            "template": "onyx",
            "layout": [
                "summary",
                "experience",
                "education",
                "skills",
                "projects",
                "languages",
                "certifications"
            ],
            "page": { "format": "a4", "margin": 36 },
            "theme": {
                "primary": "#1e66f5",
                "background": "#ffffff",
                "text": "#111111"
            },
            "typography": {
                "font_family": "Inter",
                "font_size": 10,
                "line_height": 1.4
            },
            "notes": "sample fixture"
        }
    })
}
