//! Immutable resolver configuration: tag vocabulary, kind mapping, and the
//! dangling doc-comment policy. Built once per run and shared read-only by
//! every pipeline invocation.

use crate::model::EntryKind;

/// A command that defines a construct with a matching end command.
/// Everything between the opener and its closer is part of the definition
/// body and produces no documentation entries of its own.
#[derive(Debug, Clone)]
pub struct Definition {
    pub opener: String,
    pub closer: String,
    pub kind: EntryKind,
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Tag claiming a doc-comment for the module ("module").
    pub module_tag: String,
    /// Tag suppressing an entry from rendered output ("no-doc").
    pub suppress_tag: String,
    pub definitions: Vec<Definition>,
    /// Commands documented as variables.
    pub variable_commands: Vec<String>,
    /// Whether a dangling untagged doc-comment claims the module.
    pub dangling_doc_to_module: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            module_tag: "module".to_string(),
            suppress_tag: "no-doc".to_string(),
            definitions: vec![
                Definition {
                    opener: "function".to_string(),
                    closer: "endfunction".to_string(),
                    kind: EntryKind::Function,
                },
                Definition {
                    opener: "macro".to_string(),
                    closer: "endmacro".to_string(),
                    kind: EntryKind::Macro,
                },
            ],
            variable_commands: vec!["set".to_string(), "option".to_string()],
            dangling_doc_to_module: true,
        }
    }
}

impl Config {
    /// Definition entry for a lowercased command name, if it opens a block.
    pub fn definition(&self, command: &str) -> Option<&Definition> {
        self.definitions.iter().find(|d| d.opener == command)
    }

    /// Entry kind for a command name (case-insensitive).
    pub fn kind_of(&self, command: &str) -> EntryKind {
        let lower = command.to_ascii_lowercase();
        if let Some(def) = self.definition(&lower) {
            def.kind
        } else if self.variable_commands.iter().any(|c| *c == lower) {
            EntryKind::Variable
        } else {
            EntryKind::Other
        }
    }
}
