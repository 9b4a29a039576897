//! Doc-comment annotation resolution.
//!
//! Strips comment leaders from a doc block's raw text, scans the result for
//! `@tag` lines, and applies tag precedence: a module tag claims the block
//! outright and turns every later tag-looking line into literal text; a
//! suppression tag hides the entry from rendered output; unknown tags stay
//! literal. Malformed tag syntax degrades the whole block to plain text with
//! a warning.

use std::sync::LazyLock;

use regex::Regex;

use crate::config::Config;
use crate::error::Warning;
use crate::parser::elements::DocBlock;

static RE_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[ \t]*@([A-Za-z][A-Za-z0-9-]*)[ \t]*(.*)$").unwrap());

static RE_ESCAPED_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[ \t]*\\@").unwrap());

// `@` at a line start with no tag identifier following it
static RE_MALFORMED_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[ \t]*@([^A-Za-z]|$)").unwrap());

/// What a doc block resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The block claims module-level documentation.
    Module {
        name: Option<String>,
        body: Vec<String>,
    },
    /// The block documents the command that follows it (or is dangling).
    Command { body: Vec<String>, suppressed: bool },
}

/// Resolve a doc block's annotations. `module_seen` reports whether an
/// earlier block already claimed the module; a second claim degrades to
/// plain text.
pub fn resolve(
    block: &DocBlock,
    module_seen: bool,
    config: &Config,
    warnings: &mut Vec<Warning>,
) -> Resolution {
    let lines = clean_lines(&block.text);

    let mut suppressed = false;
    let mut stripped: Vec<usize> = Vec::new();

    for i in 0..lines.len() {
        if RE_ESCAPED_TAG.is_match(&lines[i]) {
            continue;
        }
        if RE_MALFORMED_TAG.is_match(&lines[i]) {
            warnings.push(Warning {
                line: block.line + i,
                message: "malformed documentation tag (expected an identifier after '@'); \
                          treating doc-comment as plain text"
                    .to_string(),
            });
            return Resolution::Command {
                body: finish(lines),
                suppressed: false,
            };
        }
        let Some((tag, argument)) = capture_tag(&lines[i]) else {
            continue;
        };
        if tag.eq_ignore_ascii_case(&config.module_tag) {
            if module_seen {
                warnings.push(Warning {
                    line: block.line + i,
                    message: "multiple module declarations in file; \
                              treating doc-comment as plain text"
                        .to_string(),
                });
                return Resolution::Command {
                    body: finish(lines),
                    suppressed: false,
                };
            }
            // The module tag claims the block; everything else stays
            // verbatim, including later tag-looking lines.
            let name = if argument.is_empty() {
                None
            } else {
                Some(argument)
            };
            let mut body = lines;
            body.remove(i);
            return Resolution::Module {
                name,
                body: finish(body),
            };
        }
        if tag.eq_ignore_ascii_case(&config.suppress_tag) {
            suppressed = true;
            stripped.push(i);
        }
        // unrecognized tags are literal text
    }

    let body = lines
        .into_iter()
        .enumerate()
        .filter(|(i, _)| !stripped.contains(i))
        .map(|(_, l)| l)
        .collect();
    Resolution::Command {
        body: finish(body),
        suppressed,
    }
}

/// Tag name and trimmed argument text from a `@tag ...` line.
fn capture_tag(line: &str) -> Option<(String, String)> {
    let caps = RE_TAG.captures(line)?;
    let tag = caps.get(1).map_or("", |m| m.as_str()).to_string();
    let argument = caps.get(2).map_or("", |m| m.as_str()).trim().to_string();
    Some((tag, argument))
}

/// Strip doc-comment delimiters and per-line comment leaders.
///
/// Each line loses its leading whitespace, the `#[[[` opener (plus one
/// following space, plus a trailing ` #]]` on single-line blocks), the
/// `#]]` closer, or the `#` leader plus one following space or tab.
/// Indentation after the leader is preserved. Blank edges are dropped.
pub fn clean_lines(raw: &str) -> Vec<String> {
    let mut cleaned: Vec<String> = Vec::new();
    for raw_line in raw.split('\n') {
        let line = raw_line.trim_start_matches([' ', '\t']);
        let content = if let Some(rest) = line.strip_prefix("#[[[") {
            let rest = rest.strip_prefix(' ').unwrap_or(rest);
            match rest.strip_suffix("#]]") {
                Some(r) => r.strip_suffix(' ').unwrap_or(r),
                None => rest,
            }
        } else if let Some(rest) = line.strip_prefix("#]]") {
            rest
        } else if let Some(rest) = line.strip_prefix('#') {
            rest.strip_prefix([' ', '\t']).unwrap_or(rest)
        } else {
            line
        };
        cleaned.push(content.to_string());
    }
    while cleaned.first().is_some_and(|l| l.trim().is_empty()) {
        cleaned.remove(0);
    }
    while cleaned.last().is_some_and(|l| l.trim().is_empty()) {
        cleaned.pop();
    }
    cleaned
}

/// Drop blank edges left by stripped tag lines and resolve `\@` escapes.
fn finish(body: Vec<String>) -> Vec<String> {
    let mut body: Vec<String> = body
        .into_iter()
        .map(|l| {
            if l.contains("\\@") {
                l.replace("\\@", "@")
            } else {
                l
            }
        })
        .collect();
    while body.first().is_some_and(|l| l.trim().is_empty()) {
        body.remove(0);
    }
    while body.last().is_some_and(|l| l.trim().is_empty()) {
        body.pop();
    }
    body
}
