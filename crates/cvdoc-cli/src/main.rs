use std::fs;
use std::io::Write as _;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use once_cell::sync::Lazy;
use serde_json::Value;
use tabwriter::TabWriter;

use cvdoc_io::document_json::{DocumentJsonError, parse_document_json_str};
use cvdoc_io::prelude::*;
use cvdoc_io::schema_export::{document_json_schema, export_etag};
use cvdoc_io::tool::{TOOL_DESCRIPTION, TOOL_NAME, error_reply, tool_input_schema};
use cvdoc_io::version::TOOL_SPEC_V;

// Built once per process; `schema --verify` and the plain export share them.
static DOCUMENT_SCHEMA: Lazy<Value> = Lazy::new(document_json_schema);
static PATCH_SCHEMA: Lazy<Value> = Lazy::new(tool_input_schema);

#[derive(Debug, Parser)]
#[command(name = "cvdoc", version, about = "Resume document and JSON Patch toolbox")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Check a document JSON file against the document schema.
    ///
    /// Exit codes: 0 valid, 1 unreadable or not JSON, 2 invalid document.
    Validate {
        /// Document JSON path
        document: String,
        /// Emit violations as JSON on stderr
        #[arg(long)]
        diagnostics_json: bool,
    },
    /// Apply a patch batch to a document and re-validate the result.
    ///
    /// Exit codes: 0 applied, 1 unreadable or unparseable input,
    /// 2 batch rejected.
    Apply {
        /// Document JSON path
        document: String,
        /// Patch JSON path (a bare op array or {"operations": [...]})
        patch: String,
        /// Write the patched document here instead of stdout
        #[arg(long)]
        out: Option<String>,
        /// Output minified JSON
        #[arg(long)]
        min: bool,
        /// Reject mutating ops under this pointer (repeatable)
        #[arg(long)]
        protect: Vec<String>,
        /// Per-batch operation limit
        #[arg(long)]
        max_ops: Option<usize>,
        /// Print batch telemetry on stderr after a successful apply
        #[arg(long)]
        telemetry: bool,
        /// Emit diagnostics as JSON on stderr
        #[arg(long)]
        diagnostics_json: bool,
    },
    /// Print an exported JSON Schema.
    Schema {
        /// Which schema to print
        #[arg(long, value_enum, default_value_t = SchemaKind::Document)]
        kind: SchemaKind,
        /// Output minified JSON
        #[arg(long)]
        min: bool,
        /// Print the export etag instead of the schema body
        #[arg(long)]
        etag: bool,
        /// Validate this JSON file against the schema instead of printing it
        #[arg(long)]
        verify: Option<String>,
    },
    /// List the sections of a document, one row per section.
    Inspect {
        /// Document JSON path
        document: String,
        /// Include sections with visible=false
        #[arg(long)]
        hidden: bool,
        /// Only show this section key
        #[arg(long)]
        section: Option<String>,
        /// Align columns for human reading
        #[arg(long)]
        aligned: bool,
    },
    /// Print the agent-facing tool contract as JSON.
    ToolSpec {
        /// Output minified JSON
        #[arg(long)]
        min: bool,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SchemaKind {
    /// The resume document schema
    Document,
    /// The patch tool input schema
    Patch,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.cmd {
        Command::Validate {
            document,
            diagnostics_json,
        } => {
            let s = read_or_exit(&document);
            match parse_document_json_str(&s) {
                Ok(_) => println!("OK"),
                Err(err @ DocumentJsonError::InvalidJson(_)) => {
                    eprintln!("{err}");
                    process::exit(1);
                }
                Err(DocumentJsonError::InvalidDocument(err)) => {
                    if diagnostics_json {
                        eprintln!("{}", serde_json::json!({ "diagnostics": err.violations }));
                    } else {
                        for v in &err.violations {
                            eprintln!("{}: {}", v.path, v.message);
                        }
                    }
                    process::exit(2);
                }
                Err(err) => {
                    // Parsed as JSON but not shaped like a document. Still a
                    // verdict on the document, so exit 2.
                    eprintln!("{err}");
                    process::exit(2);
                }
            }
        }

        Command::Apply {
            document,
            patch,
            out,
            min,
            protect,
            max_ops,
            telemetry,
            diagnostics_json,
        } => {
            let doc = load_document(&document);

            let patch_s = read_or_exit(&patch);
            let patch_v: Value = match serde_json::from_str(&patch_s) {
                Ok(v) => v,
                Err(e) => {
                    eprintln!("Invalid JSON: {e}");
                    process::exit(1);
                }
            };
            let request = match PatchRequest::from_json(patch_v) {
                Ok(r) => r,
                Err(e) => {
                    eprintln!("Invalid patch payload: {e}");
                    process::exit(1);
                }
            };

            let mut opts = ValidateOptions::default();
            if let Some(n) = max_ops {
                opts.max_ops = n;
            }
            for p in &protect {
                match Pointer::parse(p) {
                    Ok(ptr) => opts.protected.push(ptr),
                    Err(e) => {
                        eprintln!("bad --protect pointer '{p}': {e}");
                        process::exit(1);
                    }
                }
            }

            match apply_patch_with_options(&doc, &request, &opts) {
                Ok(outcome) => {
                    if telemetry {
                        eprintln!("{}", serde_json::to_string(&outcome.telemetry)?);
                    }
                    let rendered = if min {
                        serde_json::to_string(&outcome.document)?
                    } else {
                        serde_json::to_string_pretty(&outcome.document)?
                    };
                    match out {
                        Some(path) => {
                            fs::write(&path, format!("{rendered}\n"))?;
                            println!("OK");
                        }
                        None => println!("{rendered}"),
                    }
                }
                Err(err) => {
                    if diagnostics_json {
                        eprintln!("{}", error_reply(&err));
                    } else {
                        for d in &err.diagnostics {
                            eprintln!("{}", d.message);
                        }
                    }
                    process::exit(2);
                }
            }
        }

        Command::Schema {
            kind,
            min,
            etag,
            verify,
        } => {
            let schema: &Value = match kind {
                SchemaKind::Document => &DOCUMENT_SCHEMA,
                SchemaKind::Patch => &PATCH_SCHEMA,
            };

            if let Some(path) = verify {
                let validator = match jsonschema::Validator::new(schema) {
                    Ok(v) => v,
                    Err(e) => {
                        eprintln!("schema did not compile: {e}");
                        process::exit(1);
                    }
                };
                let s = read_or_exit(&path);
                let instance: Value = match serde_json::from_str(&s) {
                    Ok(v) => v,
                    Err(e) => {
                        eprintln!("Invalid JSON: {e}");
                        process::exit(1);
                    }
                };
                let mut errors = validator.iter_errors(&instance).peekable();
                if errors.peek().is_none() {
                    println!("OK");
                } else {
                    for e in errors {
                        eprintln!("{e} (at instance path '{}')", e.instance_path());
                    }
                    process::exit(2);
                }
            } else if etag {
                println!("{}", export_etag(schema)?);
            } else {
                let rendered = if min {
                    serde_json::to_string(schema)?
                } else {
                    serde_json::to_string_pretty(schema)?
                };
                println!("{rendered}");
            }
        }

        Command::Inspect {
            document,
            hidden,
            section,
            aligned,
        } => {
            let doc = load_document(&document);

            let mut out = String::from("section\tvisible\titems\ttitle\n");
            for (key, visible, items, title) in section_rows(&doc) {
                if !visible && !hidden {
                    continue;
                }
                if let Some(want) = &section {
                    if want != &key {
                        continue;
                    }
                }
                let items = items.map_or_else(|| "-".to_string(), |n| n.to_string());
                out.push_str(&format!("{key}\t{visible}\t{items}\t{title}\n"));
            }

            if aligned {
                let mut tw = TabWriter::new(Vec::new());
                tw.write_all(out.as_bytes())?;
                tw.flush()?;
                let aligned = tw
                    .into_inner()
                    .map_err(|_| anyhow::anyhow!("column alignment failed"))?;
                print!("{}", String::from_utf8(aligned)?);
            } else {
                print!("{out}");
            }
        }

        Command::ToolSpec { min } => {
            let spec = serde_json::json!({
                "name": TOOL_NAME,
                "tool_spec_version": TOOL_SPEC_V,
                "description": TOOL_DESCRIPTION,
                "input_schema": tool_input_schema(),
            });
            let rendered = if min {
                serde_json::to_string(&spec)?
            } else {
                serde_json::to_string_pretty(&spec)?
            };
            println!("{rendered}");
        }
    }

    Ok(())
}

fn read_or_exit(path: &str) -> String {
    match fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("{e}");
            process::exit(1);
        }
    }
}

/// Parse a document for commands that consume it as input. Any problem
/// with the document means the command cannot run, so everything maps
/// to exit 1 here.
fn load_document(path: &str) -> Document {
    let s = read_or_exit(path);
    match parse_document_json_str(&s) {
        Ok(doc) => doc,
        Err(e) => {
            eprintln!("{e}");
            process::exit(1);
        }
    }
}

/// One row per section: key, visibility, item count (None for prose
/// sections), display title. Built-ins in canonical order, then custom
/// sections in key order.
fn section_rows(doc: &Document) -> Vec<(String, bool, Option<usize>, String)> {
    let s = &doc.sections;
    let mut rows = vec![
        (
            "summary".to_string(),
            s.summary.visible,
            None,
            s.summary.name.clone(),
        ),
        (
            "experience".to_string(),
            s.experience.visible,
            Some(s.experience.items.len()),
            s.experience.name.clone(),
        ),
        (
            "education".to_string(),
            s.education.visible,
            Some(s.education.items.len()),
            s.education.name.clone(),
        ),
        (
            "skills".to_string(),
            s.skills.visible,
            Some(s.skills.items.len()),
            s.skills.name.clone(),
        ),
        (
            "projects".to_string(),
            s.projects.visible,
            Some(s.projects.items.len()),
            s.projects.name.clone(),
        ),
        (
            "languages".to_string(),
            s.languages.visible,
            Some(s.languages.items.len()),
            s.languages.name.clone(),
        ),
        (
            "cover_letter".to_string(),
            s.cover_letter.visible,
            None,
            s.cover_letter.name.clone(),
        ),
    ];
    for (key, sec) in &s.custom {
        rows.push((key.clone(), sec.visible, Some(sec.items.len()), sec.name.clone()));
    }
    rows
}
