//! Markdown renderer.

use crate::model::{DocEntry, Document, EntryKind, VariableValue};
use crate::render::Renderer;
use crate::toc;

pub struct MarkdownRenderer;

impl Renderer for MarkdownRenderer {
    fn render(&self, doc: &Document) -> String {
        if doc.module.suppressed {
            return String::new();
        }
        let mut out = String::new();

        if let Some(ref name) = doc.module.name {
            out.push_str(&format!("# {}\n\n", name));
        }
        if !doc.module.body.is_empty() {
            for line in &doc.module.body {
                out.push_str(line);
                out.push('\n');
            }
            out.push('\n');
        }

        let visible: Vec<&DocEntry> = doc.entries.iter().filter(|e| !e.suppressed).collect();
        if !visible.is_empty() {
            out.push_str("## Index\n\n");
            for entry in &visible {
                out.push_str(&toc::render_toc_item(&entry.name));
                out.push('\n');
            }
            out.push('\n');
        }

        for entry in &visible {
            out.push_str(&render_entry(entry));
        }
        out
    }

    fn file_extension(&self) -> &str {
        "md"
    }
}

fn render_entry(entry: &DocEntry) -> String {
    let mut out = String::new();
    out.push_str(&format!("### {}\n\n", entry.name));

    // function is the default; everything else gets a kind badge
    if entry.kind != EntryKind::Function {
        let label = match entry.kind {
            EntryKind::Macro => "macro",
            EntryKind::Variable => "variable",
            _ => "command",
        };
        out.push_str(&format!("> `{}`\n\n", label));
    }

    if matches!(entry.kind, EntryKind::Function | EntryKind::Macro) {
        let mut params = entry.params.join(" ");
        if entry.has_kwargs {
            if !params.is_empty() {
                params.push(' ');
            }
            params.push_str("<keyword args>");
        }
        out.push_str(&format!("```cmake\n{}({})\n```\n\n", entry.name, params));
    }

    if !entry.body.is_empty() {
        for line in &entry.body {
            out.push_str(line);
            out.push('\n');
        }
        out.push('\n');
    }

    if let Some(ref value) = entry.value {
        match value {
            VariableValue::String(v) => out.push_str(&format!("Default value: `{}`\n\n", v)),
            VariableValue::List(v) => out.push_str(&format!("Default values: `{}`\n\n", v)),
            VariableValue::Unset => {}
        }
    }

    if entry.kind == EntryKind::Macro {
        out.push_str("_This is a macro, and so does not introduce a new scope._\n\n");
    }

    out
}
