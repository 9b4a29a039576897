//! Structural parser: folds the token stream into top-level elements.
//!
//! A doc block immediately followed by a command invocation (whitespace and
//! discarded comments between them) forms a documented command; anything
//! else yields a dangling block or a bare invocation.

use crate::error::{Error, ParseError, ParseErrorKind};
use crate::lexer::{Lexer, Token, TokenKind};

/// A value passed to a command invocation. Compound arguments nest
/// arbitrarily; the nesting must be balanced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Argument {
    Simple(String),
    Compound(Vec<Argument>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandInvocation {
    pub name: String,
    pub args: Vec<Argument>,
    pub line: usize,
}

impl CommandInvocation {
    /// Simple arguments in order, skipping compound groups.
    pub fn simple_args(&self) -> Vec<&str> {
        self.args
            .iter()
            .filter_map(|a| match a {
                Argument::Simple(s) => Some(s.as_str()),
                Argument::Compound(_) => None,
            })
            .collect()
    }
}

/// A doc-comment as lexed: raw span text, starting line, and whether the
/// opening delimiter carried a command tag marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocBlock {
    pub text: String,
    pub line: usize,
    pub command_targeted: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Element {
    /// A plain doc block with no invocation following it.
    DanglingDocBlock(DocBlock),
    /// A command-targeted doc block with no invocation following it.
    CommandDocBlockOnly(DocBlock),
    DocumentedCommand(DocBlock, CommandInvocation),
    BareCommand(CommandInvocation),
}

struct Cursor {
    tokens: Vec<Token>,
    pos: usize,
    eof_offset: usize,
    eof_line: usize,
}

impl Cursor {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<Token> {
        let tok = self.tokens.get(self.pos).cloned();
        if tok.is_some() {
            self.pos += 1;
        }
        tok
    }

    fn eof_error(&self, expected: &'static str) -> ParseError {
        ParseError {
            kind: ParseErrorKind::UnexpectedEof { expected },
            offset: self.eof_offset,
            line: self.eof_line,
        }
    }
}

fn unexpected(tok: &Token, expected: &'static str) -> ParseError {
    ParseError {
        kind: ParseErrorKind::UnexpectedToken {
            found: format!("`{}`", tok.text),
            expected,
        },
        offset: tok.offset,
        line: tok.line,
    }
}

/// Tokenize and parse source text into the top-level element sequence.
pub fn parse_elements(input: &str) -> Result<Vec<Element>, Error> {
    let mut tokens = Vec::new();
    for tok in Lexer::new(input) {
        tokens.push(tok?);
    }
    let mut cur = Cursor {
        tokens,
        pos: 0,
        eof_offset: input.len(),
        eof_line: input.lines().count().max(1),
    };

    let mut elements = Vec::new();
    while let Some(kind) = cur.peek().map(|t| t.kind) {
        match kind {
            TokenKind::DocBlock | TokenKind::CommandDocBlock => {
                let tok = cur.next().unwrap();
                let block = DocBlock {
                    command_targeted: tok.kind == TokenKind::CommandDocBlock,
                    text: tok.text,
                    line: tok.line,
                };
                if cur.peek().map(|t| t.kind) == Some(TokenKind::Identifier) {
                    let invocation = parse_invocation(&mut cur)?;
                    elements.push(Element::DocumentedCommand(block, invocation));
                } else if block.command_targeted {
                    elements.push(Element::CommandDocBlockOnly(block));
                } else {
                    elements.push(Element::DanglingDocBlock(block));
                }
            }
            TokenKind::Identifier => {
                let invocation = parse_invocation(&mut cur)?;
                elements.push(Element::BareCommand(invocation));
            }
            _ => {
                let tok = cur.next().unwrap();
                return Err(unexpected(&tok, "a command invocation or doc-comment").into());
            }
        }
    }
    Ok(elements)
}

fn parse_invocation(cur: &mut Cursor) -> Result<CommandInvocation, ParseError> {
    let name = cur.next().unwrap(); // Identifier, checked by caller
    match cur.next() {
        Some(tok) if tok.kind == TokenKind::LParen => {}
        Some(tok) => return Err(unexpected(&tok, "`(`")),
        None => return Err(cur.eof_error("`(`")),
    }
    let args = parse_argument_list(cur)?;
    Ok(CommandInvocation {
        name: name.text,
        args,
        line: name.line,
    })
}

/// Parse arguments up to and including the matching `)`. Recurses for
/// compound arguments.
fn parse_argument_list(cur: &mut Cursor) -> Result<Vec<Argument>, ParseError> {
    let mut args = Vec::new();
    loop {
        let Some(tok) = cur.next() else {
            return Err(cur.eof_error("`)`"));
        };
        match tok.kind {
            TokenKind::RParen => return Ok(args),
            TokenKind::LParen => args.push(Argument::Compound(parse_argument_list(cur)?)),
            TokenKind::Identifier
            | TokenKind::UnquotedArgument
            | TokenKind::QuotedArgument
            | TokenKind::BracketArgument => args.push(Argument::Simple(tok.text)),
            TokenKind::DocBlock | TokenKind::CommandDocBlock => {
                return Err(unexpected(&tok, "an argument or `)`"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(input: &str) -> Vec<Element> {
        parse_elements(input).unwrap()
    }

    #[test]
    fn bare_command() {
        let elements = parse("add_library(widget STATIC widget.c)");
        assert_eq!(elements.len(), 1);
        let Element::BareCommand(inv) = &elements[0] else {
            panic!("expected bare command");
        };
        assert_eq!(inv.name, "add_library");
        assert_eq!(inv.simple_args(), vec!["widget", "STATIC", "widget.c"]);
    }

    #[test]
    fn documented_command_association() {
        let elements = parse("#[[[\n# Makes a foo.\n#]]\nfunction(foo)");
        assert_eq!(elements.len(), 1);
        let Element::DocumentedCommand(block, inv) = &elements[0] else {
            panic!("expected documented command");
        };
        assert!(!block.command_targeted);
        assert_eq!(inv.name, "function");
    }

    #[test]
    fn comment_between_block_and_command_keeps_association() {
        let elements = parse("#[[[\n# docs\n#]]\n# line comment\n#[=[ bracket ]=]\nfoo()");
        assert_eq!(elements.len(), 1);
        assert!(matches!(elements[0], Element::DocumentedCommand(..)));
    }

    #[test]
    fn block_followed_by_block_is_dangling() {
        let elements = parse("#[[[\n# one\n#]]\n#[[[\n# two\n#]]\nfoo()");
        assert_eq!(elements.len(), 2);
        assert!(matches!(elements[0], Element::DanglingDocBlock(_)));
        assert!(matches!(elements[1], Element::DocumentedCommand(..)));
    }

    #[test]
    fn orphaned_command_doc_block() {
        let elements = parse("#[[[\n# @module widgets\n#]]\n");
        assert_eq!(elements.len(), 1);
        assert!(matches!(elements[0], Element::CommandDocBlockOnly(_)));
    }

    #[test]
    fn compound_arguments_nest() {
        let elements = parse("if(a (b (c (d))))");
        let Element::BareCommand(inv) = &elements[0] else {
            panic!();
        };
        assert_eq!(inv.args.len(), 2);
        let Argument::Compound(level1) = &inv.args[1] else {
            panic!("expected compound");
        };
        let Argument::Compound(level2) = &level1[1] else {
            panic!("expected compound");
        };
        let Argument::Compound(level3) = &level2[1] else {
            panic!("expected compound");
        };
        assert_eq!(level3[0], Argument::Simple("d".to_string()));
    }

    #[test]
    fn missing_close_paren_is_eof_error() {
        let err = parse_elements("if(a (b (c (d)))").unwrap_err();
        let Error::Parse(err) = err else {
            panic!("expected parse error");
        };
        assert!(matches!(err.kind, ParseErrorKind::UnexpectedEof { .. }));
    }

    #[test]
    fn unmatched_close_paren_reports_offset() {
        let err = parse_elements("foo()\n)").unwrap_err();
        let Error::Parse(err) = err else {
            panic!("expected parse error");
        };
        assert_eq!(err.offset, 6);
        assert_eq!(err.line, 2);
    }

    #[test]
    fn identifier_without_paren_is_error() {
        let err = parse_elements("foo bar()").unwrap_err();
        let Error::Parse(err) = err else {
            panic!("expected parse error");
        };
        assert!(matches!(
            err.kind,
            ParseErrorKind::UnexpectedToken { expected: "`(`", .. }
        ));
    }

    #[test]
    fn doc_block_inside_invocation_is_error() {
        let err = parse_elements("foo(a\n#[[[\n# text\n#]]\nb)").unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
    }
}
