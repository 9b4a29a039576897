//! Data model for extracted documentation — format-agnostic.

/// Documentation tree for a single source file: one module-level entry plus
/// zero or more command entries in source order. Suppressed entries stay in
/// the tree; renderers drop them at output time.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Document {
    pub module: ModuleDoc,
    pub entries: Vec<DocEntry>,
}

/// Module-level documentation, claimed by an `@module` tag or a dangling
/// doc-comment. `name` stays None until a tag names it; the binary fills in
/// a name derived from the source path before rendering.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ModuleDoc {
    pub name: Option<String>,
    pub body: Vec<String>,
    pub suppressed: bool,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Function,
    Macro,
    Variable,
    #[default]
    Other,
}

/// A single documented command.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DocEntry {
    pub kind: EntryKind,
    pub name: String,
    /// Cleaned doc-comment lines, tag lines stripped, escapes resolved.
    pub body: Vec<String>,
    pub suppressed: bool,
    /// Declared parameters (function/macro) or recorded arguments (other).
    pub params: Vec<String>,
    /// Set when `cmake_parse_arguments` appears in the definition body.
    pub has_kwargs: bool,
    pub value: Option<VariableValue>,
}

/// Value recorded for a documented `set()` or `option()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VariableValue {
    String(String),
    /// Two or more values, joined by spaces.
    List(String),
    Unset,
}
