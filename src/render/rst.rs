//! reStructuredText renderer — the default output format.

use crate::model::{DocEntry, Document, EntryKind, VariableValue};
use crate::render::Renderer;

const MACRO_NOTE: &str = "This is a macro, and so does not introduce a new scope.";

/// Directive names per entry kind. Callers may override individual entries
/// to target a different RST domain.
pub struct RstRenderer {
    pub function_directive: &'static str,
    pub macro_directive: &'static str,
    pub variable_directive: &'static str,
    pub other_directive: &'static str,
}

impl Default for RstRenderer {
    fn default() -> Self {
        Self {
            function_directive: "function",
            macro_directive: "macro",
            variable_directive: "data",
            other_directive: "command",
        }
    }
}

impl RstRenderer {
    fn directive(&self, kind: EntryKind) -> &str {
        match kind {
            EntryKind::Function => self.function_directive,
            EntryKind::Macro => self.macro_directive,
            EntryKind::Variable => self.variable_directive,
            EntryKind::Other => self.other_directive,
        }
    }
}

impl Renderer for RstRenderer {
    fn render(&self, doc: &Document) -> String {
        if doc.module.suppressed {
            return String::new();
        }
        let mut out = String::new();

        if let Some(ref name) = doc.module.name {
            let bar = "#".repeat(name.len() + 2);
            out.push_str(&format!("{}\n {}\n{}\n\n", bar, name, bar));
            out.push_str(&format!(".. module:: {}\n\n", name));
        }
        if !doc.module.body.is_empty() {
            for line in &doc.module.body {
                out.push_str(line);
                out.push('\n');
            }
            out.push('\n');
        }

        for entry in &doc.entries {
            if entry.suppressed {
                continue;
            }
            out.push_str(&self.render_entry(entry));
        }
        out
    }

    fn file_extension(&self) -> &str {
        "rst"
    }
}

impl RstRenderer {
    fn render_entry(&self, entry: &DocEntry) -> String {
        let signature = match entry.kind {
            EntryKind::Function | EntryKind::Macro => {
                let mut params = entry.params.clone();
                if entry.has_kwargs {
                    params.push("**kwargs".to_string());
                }
                format!("{}({})", entry.name, params.join(", "))
            }
            _ => entry.name.clone(),
        };

        let mut block = entry.body.clone();
        if let Some(ref value) = entry.value {
            let line = match value {
                VariableValue::String(v) => Some(format!("Default value: ``{}``", v)),
                VariableValue::List(v) => Some(format!("Default values: ``{}``", v)),
                VariableValue::Unset => None,
            };
            if let Some(line) = line {
                if !block.is_empty() {
                    block.push(String::new());
                }
                block.push(line);
            }
        }
        if entry.kind == EntryKind::Macro {
            if !block.is_empty() {
                block.push(String::new());
            }
            block.push(format!(".. note:: {}", MACRO_NOTE));
        }

        let mut out = format!(".. {}:: {}\n", self.directive(entry.kind), signature);
        if !block.is_empty() {
            out.push('\n');
            for line in &block {
                if line.is_empty() {
                    out.push('\n');
                } else {
                    out.push_str("   ");
                    out.push_str(line);
                    out.push('\n');
                }
            }
        }
        out.push('\n');
        out
    }
}
