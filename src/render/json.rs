//! JSON renderer — structured output for tooling integration.
//!
//! Serializes the visible part of the documentation tree directly; like the
//! other renderers it drops suppressed entries.

use crate::model::{DocEntry, Document, EntryKind, VariableValue};
use crate::render::Renderer;

pub struct JsonRenderer;

impl Renderer for JsonRenderer {
    fn render(&self, doc: &Document) -> String {
        let mut out = String::new();
        out.push_str("{\n");

        out.push_str("  \"module\": {\n");
        match doc.module.name {
            Some(ref name) => {
                out.push_str(&format!("    \"name\": \"{}\",\n", json_escape(name)))
            }
            None => out.push_str("    \"name\": null,\n"),
        }
        if doc.module.suppressed {
            out.push_str("    \"body\": \"\"\n");
        } else {
            out.push_str(&format!(
                "    \"body\": \"{}\"\n",
                json_escape(&doc.module.body.join("\n"))
            ));
        }
        out.push_str("  },\n");

        let visible: Vec<&DocEntry> = if doc.module.suppressed {
            Vec::new()
        } else {
            doc.entries.iter().filter(|e| !e.suppressed).collect()
        };
        out.push_str("  \"entries\": [\n");
        for (i, entry) in visible.iter().enumerate() {
            out.push_str(&render_entry_json(entry));
            if i < visible.len() - 1 {
                out.push_str(",\n");
            } else {
                out.push('\n');
            }
        }
        out.push_str("  ]\n");
        out.push_str("}\n");
        out
    }

    fn file_extension(&self) -> &str {
        "json"
    }
}

fn kind_label(kind: EntryKind) -> &'static str {
    match kind {
        EntryKind::Function => "function",
        EntryKind::Macro => "macro",
        EntryKind::Variable => "variable",
        EntryKind::Other => "command",
    }
}

fn render_entry_json(entry: &DocEntry) -> String {
    let mut out = String::new();
    out.push_str("    {\n");
    out.push_str(&format!("      \"kind\": \"{}\",\n", kind_label(entry.kind)));
    out.push_str(&format!(
        "      \"name\": \"{}\",\n",
        json_escape(&entry.name)
    ));

    if !entry.params.is_empty() {
        out.push_str("      \"params\": [");
        for (i, param) in entry.params.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            out.push_str(&format!("\"{}\"", json_escape(param)));
        }
        out.push_str("],\n");
    }

    if entry.has_kwargs {
        out.push_str("      \"has_kwargs\": true,\n");
    }

    if let Some(ref value) = entry.value {
        match value {
            VariableValue::String(v) => out.push_str(&format!(
                "      \"value\": \"{}\",\n",
                json_escape(v)
            )),
            VariableValue::List(v) => out.push_str(&format!(
                "      \"value\": \"{}\",\n",
                json_escape(v)
            )),
            VariableValue::Unset => out.push_str("      \"value\": null,\n"),
        }
    }

    out.push_str(&format!(
        "      \"body\": \"{}\"\n",
        json_escape(&entry.body.join("\n"))
    ));
    out.push_str("    }");
    out
}

fn json_escape(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
        .replace('\t', "\\t")
}
