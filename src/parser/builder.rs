//! Folds the element sequence into the final Document.
//!
//! Tracks open definition blocks (function/endfunction, macro/endmacro) so
//! commands inside a body stay opaque, claims the module entry from tagged
//! or dangling doc-comments, and synthesizes an empty module entry when no
//! block claims it.

use crate::config::Config;
use crate::error::Warning;
use crate::model::{DocEntry, Document, EntryKind, ModuleDoc, VariableValue};
use crate::parser::annotations::{self, Resolution};
use crate::parser::elements::{CommandInvocation, DocBlock, Element};

/// An open definition block. `entry` points at the documented entry whose
/// body we are inside, for `cmake_parse_arguments` detection.
struct OpenBlock {
    closer: String,
    entry: Option<usize>,
}

pub fn build(elements: Vec<Element>, config: &Config, warnings: &mut Vec<Warning>) -> Document {
    let mut doc = Document::default();
    let mut module_claimed = false;
    let mut blocks: Vec<OpenBlock> = Vec::new();

    for element in elements {
        match element {
            Element::BareCommand(inv) => {
                track_bare(&inv, &mut blocks, &mut doc, config);
            }
            Element::DocumentedCommand(block, inv) => {
                if !blocks.is_empty() {
                    // definition bodies are opaque; the doc-comment is
                    // dropped but nesting still advances
                    track_bare(&inv, &mut blocks, &mut doc, config);
                    continue;
                }
                match annotations::resolve(&block, module_claimed, config, warnings) {
                    Resolution::Module { name, body } => {
                        doc.module = ModuleDoc {
                            name,
                            body,
                            suppressed: false,
                        };
                        module_claimed = true;
                        // the invocation keeps its structural role but is
                        // left undocumented
                        track_bare(&inv, &mut blocks, &mut doc, config);
                    }
                    Resolution::Command { body, suppressed } => {
                        push_entry(&inv, body, suppressed, &mut doc, &mut blocks, config, warnings);
                    }
                }
            }
            Element::DanglingDocBlock(block) | Element::CommandDocBlockOnly(block) => {
                if !blocks.is_empty() {
                    continue;
                }
                resolve_dangling(block, &mut doc, &mut module_claimed, config, warnings);
            }
        }
    }
    doc
}

/// Advance block nesting for an undocumented invocation and detect
/// `cmake_parse_arguments` inside a documented definition body.
fn track_bare(
    inv: &CommandInvocation,
    blocks: &mut Vec<OpenBlock>,
    doc: &mut Document,
    config: &Config,
) {
    let name = inv.name.to_ascii_lowercase();
    if blocks.last().is_some_and(|b| b.closer == name) {
        blocks.pop();
        return;
    }
    if name == "cmake_parse_arguments" {
        if let Some(idx) = blocks.last().and_then(|b| b.entry) {
            doc.entries[idx].has_kwargs = true;
        }
        return;
    }
    if let Some(def) = config.definition(&name) {
        blocks.push(OpenBlock {
            closer: def.closer.clone(),
            entry: None,
        });
    }
}

/// A doc block with no invocation to attach to: module claims, top-level
/// suppression, or the dangling-to-module policy.
fn resolve_dangling(
    block: DocBlock,
    doc: &mut Document,
    module_claimed: &mut bool,
    config: &Config,
    warnings: &mut Vec<Warning>,
) {
    let line = block.line;
    let command_targeted = block.command_targeted;
    match annotations::resolve(&block, *module_claimed, config, warnings) {
        Resolution::Module { name, body } => {
            doc.module = ModuleDoc {
                name,
                body,
                suppressed: false,
            };
            *module_claimed = true;
        }
        Resolution::Command { body, suppressed } => {
            let top_level = !*module_claimed && doc.entries.is_empty();
            if suppressed && top_level {
                // top-level @no-doc suppresses the whole module
                doc.module = ModuleDoc {
                    name: None,
                    body,
                    suppressed: true,
                };
                *module_claimed = true;
            } else if !suppressed
                && !command_targeted
                && !*module_claimed
                && config.dangling_doc_to_module
            {
                doc.module = ModuleDoc {
                    name: None,
                    body,
                    suppressed: false,
                };
                *module_claimed = true;
            } else {
                warnings.push(Warning {
                    line,
                    message: "dangling doc-comment with no command invocation to document; ignoring"
                        .to_string(),
                });
            }
        }
    }
}

fn push_entry(
    inv: &CommandInvocation,
    body: Vec<String>,
    suppressed: bool,
    doc: &mut Document,
    blocks: &mut Vec<OpenBlock>,
    config: &Config,
    warnings: &mut Vec<Warning>,
) {
    let lower = inv.name.to_ascii_lowercase();
    let kind = config.kind_of(&lower);
    match kind {
        EntryKind::Function | EntryKind::Macro => {
            let simple = inv.simple_args();
            let def = config.definition(&lower).expect("definition kinds have a table entry");
            if simple.is_empty() {
                warnings.push(Warning {
                    line: inv.line,
                    message: format!(
                        "{}() called without a name; documenting as a plain command",
                        inv.name
                    ),
                });
                doc.entries.push(DocEntry {
                    kind: EntryKind::Other,
                    name: inv.name.clone(),
                    body,
                    suppressed,
                    ..DocEntry::default()
                });
                blocks.push(OpenBlock {
                    closer: def.closer.clone(),
                    entry: None,
                });
                return;
            }
            doc.entries.push(DocEntry {
                kind,
                name: simple[0].to_string(),
                body,
                suppressed,
                params: simple[1..].iter().map(|s| s.to_string()).collect(),
                ..DocEntry::default()
            });
            let entry = doc.entries.len() - 1;
            blocks.push(OpenBlock {
                closer: def.closer.clone(),
                entry: Some(entry),
            });
        }
        EntryKind::Variable => {
            let simple = inv.simple_args();
            let Some(name) = simple.first() else {
                warnings.push(Warning {
                    line: inv.line,
                    message: format!(
                        "{}() called without a variable name; documenting as a plain command",
                        inv.name
                    ),
                });
                doc.entries.push(DocEntry {
                    kind: EntryKind::Other,
                    name: inv.name.clone(),
                    body,
                    suppressed,
                    ..DocEntry::default()
                });
                return;
            };
            let mut body = body;
            let value = if lower == "option" {
                // option(NAME "help text" [default])
                if let Some(help) = simple.get(1) {
                    if !body.is_empty() {
                        body.push(String::new());
                    }
                    body.push((*help).to_string());
                }
                match simple.get(2) {
                    Some(default) => VariableValue::String((*default).to_string()),
                    None => VariableValue::Unset,
                }
            } else {
                match simple.len() {
                    1 => VariableValue::Unset,
                    2 => VariableValue::String(simple[1].to_string()),
                    _ => VariableValue::List(simple[1..].join(" ")),
                }
            };
            doc.entries.push(DocEntry {
                kind,
                name: (*name).to_string(),
                body,
                suppressed,
                value: Some(value),
                ..DocEntry::default()
            });
        }
        EntryKind::Other => {
            doc.entries.push(DocEntry {
                kind,
                name: inv.name.clone(),
                body,
                suppressed,
                params: inv.simple_args().iter().map(|s| s.to_string()).collect(),
                ..DocEntry::default()
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser;

    fn build_doc(input: &str) -> (Document, Vec<Warning>) {
        let parsed = parser::parse(input, &Config::default()).unwrap();
        (parsed.document, parsed.warnings)
    }

    #[test]
    fn entries_preserve_source_order() {
        let input = "\
#[[[
# a
#]]
function(a)
endfunction()

#[[[
# @no-doc
#]]
function(b)
endfunction()

#[[[
# c
#]]
function(c)
endfunction()
";
        let (doc, warnings) = build_doc(input);
        assert!(warnings.is_empty());
        let names: Vec<&str> = doc.entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
        assert!(doc.entries[1].suppressed);
    }

    #[test]
    fn function_params_recorded() {
        let (doc, _) = build_doc("#[[[\n# docs\n#]]\nfunction(foo a b c)\nendfunction()");
        assert_eq!(doc.entries[0].kind, EntryKind::Function);
        assert_eq!(doc.entries[0].name, "foo");
        assert_eq!(doc.entries[0].params, vec!["a", "b", "c"]);
    }

    #[test]
    fn macro_kind_from_name() {
        let (doc, _) = build_doc("#[[[\n# docs\n#]]\nmacro(m x)\nendmacro()");
        assert_eq!(doc.entries[0].kind, EntryKind::Macro);
    }

    #[test]
    fn definition_bodies_are_opaque() {
        let input = "\
#[[[
# outer
#]]
function(outer)
  #[[[
  # inner
  #]]
  set(X inner_value)
endfunction()

#[[[
# after
#]]
function(after)
endfunction()
";
        let (doc, _) = build_doc(input);
        let names: Vec<&str> = doc.entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["outer", "after"]);
    }

    #[test]
    fn kwargs_detected_in_body() {
        let input = "\
#[[[
# docs
#]]
function(foo)
  cmake_parse_arguments(PARSE_ARGV 0 arg \"\" \"\" \"\")
endfunction()
";
        let (doc, _) = build_doc(input);
        assert!(doc.entries[0].has_kwargs);
    }

    #[test]
    fn set_value_types() {
        let input = "\
#[[[
# a string
#]]
set(A \"hello\")

#[[[
# a list
#]]
set(B one two three)

#[[[
# unset
#]]
set(C)
";
        let (doc, _) = build_doc(input);
        assert_eq!(doc.entries[0].kind, EntryKind::Variable);
        assert_eq!(
            doc.entries[0].value,
            Some(VariableValue::String("hello".to_string()))
        );
        assert_eq!(
            doc.entries[1].value,
            Some(VariableValue::List("one two three".to_string()))
        );
        assert_eq!(doc.entries[2].value, Some(VariableValue::Unset));
    }

    #[test]
    fn option_records_help_and_default() {
        let (doc, _) = build_doc("#[[[\n# docs\n#]]\noption(FOO \"Enable foo\" ON)");
        assert_eq!(doc.entries[0].kind, EntryKind::Variable);
        assert_eq!(doc.entries[0].name, "FOO");
        assert!(doc.entries[0].body.contains(&"Enable foo".to_string()));
        assert_eq!(
            doc.entries[0].value,
            Some(VariableValue::String("ON".to_string()))
        );
    }

    #[test]
    fn other_kind_for_unknown_commands() {
        let (doc, _) = build_doc("#[[[\n# docs\n#]]\nadd_library(widget STATIC)");
        assert_eq!(doc.entries[0].kind, EntryKind::Other);
        assert_eq!(doc.entries[0].name, "add_library");
        assert_eq!(doc.entries[0].params, vec!["widget", "STATIC"]);
    }

    #[test]
    fn module_tag_claims_module_and_leaves_command_bare() {
        let input = "\
#[[[
# @module widgets
# Module docs.
#]]
function(foo)
endfunction()
";
        let (doc, _) = build_doc(input);
        assert_eq!(doc.module.name.as_deref(), Some("widgets"));
        assert!(doc.entries.is_empty());
    }

    #[test]
    fn dangling_block_claims_module_by_default() {
        let (doc, warnings) = build_doc("#[[[\n# Just some text.\n#]]\n");
        assert!(warnings.is_empty());
        assert!(doc.module.name.is_none());
        assert_eq!(doc.module.body, vec!["Just some text.".to_string()]);
    }

    #[test]
    fn dangling_block_dropped_when_policy_off() {
        let mut config = Config::default();
        config.dangling_doc_to_module = false;
        let parsed = parser::parse("#[[[\n# Just some text.\n#]]\n", &config).unwrap();
        assert!(parsed.document.module.body.is_empty());
        assert_eq!(parsed.warnings.len(), 1);
    }

    #[test]
    fn module_synthesized_when_absent() {
        let (doc, _) = build_doc("add_library(widget STATIC)");
        assert!(doc.module.name.is_none());
        assert!(doc.module.body.is_empty());
        assert!(!doc.module.suppressed);
    }

    #[test]
    fn top_level_no_doc_suppresses_module() {
        // the @no-doc block is dangling (followed by another block, not a
        // command), so it applies to the module itself
        let input = "\
#[[[
# @no-doc
#]]

#[[[
# docs
#]]
function(foo)
endfunction()
";
        let (doc, warnings) = build_doc(input);
        assert!(warnings.is_empty());
        assert!(doc.module.suppressed);
        assert_eq!(doc.entries[0].name, "foo");
    }

    #[test]
    fn second_module_declaration_warns() {
        let input = "\
#[[[
# @module one
#]]

#[[[
# @module two
#]]
";
        let (doc, warnings) = build_doc(input);
        assert_eq!(doc.module.name.as_deref(), Some("one"));
        assert!(!warnings.is_empty());
    }

    #[test]
    fn orphaned_tagged_block_warns() {
        let input = "\
function(first)
endfunction()

#[[[
# @whatever orphan
#]]
";
        let (_, warnings) = build_doc(input);
        assert_eq!(warnings.len(), 1);
    }
}
