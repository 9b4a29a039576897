//! Lexer for CMake source files.
//!
//! Converts raw source text into a token stream, handling:
//! - doc-comments (`#[[[` ... `#]]`), plain and command-targeted
//! - bracket comments and bracket arguments with `=`-level matching
//! - quoted and unquoted arguments with escape sequences
//! - line comments, whitespace, and newlines (discarded)
//!
//! The grammar is ambiguous at `#` and `[`; ambiguity is resolved by a fixed
//! match-attempt order, never by backtracking: command-doc block, plain doc
//! block, bracket comment, line comment. At `[`, a well-formed bracket
//! opener (`[` `=`* `[`) starts a bracket argument, anything else is part of
//! an unquoted argument.

use crate::error::{LexError, LexErrorKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Doc-comment containing an unescaped `@tag` marker.
    CommandDocBlock,
    /// Plain doc-comment.
    DocBlock,
    Identifier,
    UnquotedArgument,
    QuotedArgument,
    BracketArgument,
    LParen,
    RParen,
}

/// A classified lexeme.
///
/// `text` holds the resolved content for arguments (escapes processed,
/// quote/bracket delimiters stripped) and the raw span for doc blocks,
/// whose comment leaders are cleaned later by the annotation resolver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub offset: usize,
    pub line: usize,
}

pub struct Lexer<'a> {
    input: &'a str,
    src: &'a [u8],
    pos: usize,
    line: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            src: input.as_bytes(),
            pos: 0,
            line: 1,
        }
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn peek(&self) -> Option<u8> {
        self.src.get(self.pos).copied()
    }

    fn peek_char(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn advance_to(&mut self, new_pos: usize) {
        for &b in &self.src[self.pos..new_pos] {
            if b == b'\n' {
                self.line += 1;
            }
        }
        self.pos = new_pos;
    }

    fn advance_char(&mut self) {
        if let Some(c) = self.peek_char() {
            self.advance_to(self.pos + c.len_utf8());
        }
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(|b| b.is_ascii_whitespace()) {
            self.advance_to(self.pos + 1);
        }
    }

    fn skip_line(&mut self) {
        let end = self
            .rest()
            .find('\n')
            .map_or(self.input.len(), |i| self.pos + i);
        self.advance_to(end);
    }

    fn next_token(&mut self) -> Option<Result<Token, LexError>> {
        loop {
            self.skip_whitespace();
            let b = self.peek()?;
            match b {
                b'#' => {
                    if self.rest().starts_with("#[[[") {
                        if let Some(tok) = self.lex_doc_block() {
                            return Some(Ok(tok));
                        }
                        // no `#]]` ahead: not a doc block, fall through
                    }
                    if let Some(level) = bracket_open_level(&self.src[self.pos + 1..]) {
                        // bracket comment: discard body, keep scanning
                        match self.scan_bracket_region_at(self.pos + 1, level) {
                            Ok(_) => continue,
                            Err(e) => return Some(Err(e)),
                        }
                    }
                    self.skip_line();
                }
                b'[' => {
                    if let Some(level) = bracket_open_level(&self.src[self.pos..]) {
                        let offset = self.pos;
                        let line = self.line;
                        return Some(match self.scan_bracket_region_at(self.pos, level) {
                            Ok(content) => Ok(Token {
                                kind: TokenKind::BracketArgument,
                                text: content.to_string(),
                                offset,
                                line,
                            }),
                            Err(e) => Err(e),
                        });
                    }
                    return Some(self.lex_word());
                }
                b'"' => return Some(self.lex_quoted()),
                b'(' => return Some(Ok(self.punct(TokenKind::LParen, "("))),
                b')' => return Some(Ok(self.punct(TokenKind::RParen, ")"))),
                _ => return Some(self.lex_word()),
            }
        }
    }

    fn punct(&mut self, kind: TokenKind, text: &str) -> Token {
        let tok = Token {
            kind,
            text: text.to_string(),
            offset: self.pos,
            line: self.line,
        };
        self.advance_to(self.pos + 1);
        tok
    }

    /// Doc block: `#[[[` scanned non-greedily to the first `#]]`. The span
    /// is a command-doc block when it contains an unescaped `@` followed by
    /// a letter, a plain doc block otherwise. Returns None when no closer
    /// exists ahead (the bracket-comment and line-comment rules then apply).
    fn lex_doc_block(&mut self) -> Option<Token> {
        let rel = self.input[self.pos + 4..].find("#]]")?;
        let end = self.pos + 4 + rel + 3;
        let span = &self.input[self.pos..end];
        let kind = if contains_tag_marker(span.as_bytes()) {
            TokenKind::CommandDocBlock
        } else {
            TokenKind::DocBlock
        };
        let tok = Token {
            kind,
            text: span.to_string(),
            offset: self.pos,
            line: self.line,
        };
        self.advance_to(end);
        Some(tok)
    }

    /// Scan the bracket region opening at `open_start`, returning its raw
    /// content. The closer must mirror the opener's `=` count exactly;
    /// shorter or longer runs inside are ordinary content.
    fn scan_bracket_region_at(&mut self, open_start: usize, level: usize) -> Result<&'a str, LexError> {
        let content_start = open_start + level + 2;
        let closer = format!("]{}]", "=".repeat(level));
        match self.input[content_start..].find(&closer) {
            Some(rel) => {
                let content_end = content_start + rel;
                let content = &self.input[content_start..content_end];
                self.advance_to(content_end + closer.len());
                Ok(content)
            }
            None => Err(LexError {
                kind: LexErrorKind::UnterminatedBracket,
                offset: self.pos,
                line: self.line,
            }),
        }
    }

    fn lex_quoted(&mut self) -> Result<Token, LexError> {
        let offset = self.pos;
        let line = self.line;
        self.advance_to(self.pos + 1); // opening quote
        let mut text = String::new();
        loop {
            match self.peek_char() {
                None => {
                    return Err(LexError {
                        kind: LexErrorKind::UnterminatedQuote,
                        offset,
                        line,
                    })
                }
                Some('"') => {
                    self.advance_to(self.pos + 1);
                    return Ok(Token {
                        kind: TokenKind::QuotedArgument,
                        text,
                        offset,
                        line,
                    });
                }
                Some('\\') => {
                    if let Some(c) = self.resolve_escape(true)? {
                        text.push(c);
                    }
                }
                Some(c) => {
                    self.advance_char();
                    text.push(c);
                }
            }
        }
    }

    /// Identifier or unquoted argument: a maximal run excluding whitespace,
    /// parens, `#`, `"`, and backslash, except where an escape sequence
    /// matches. The run lexes as an identifier when it fits the identifier
    /// pattern and used no escapes.
    fn lex_word(&mut self) -> Result<Token, LexError> {
        let offset = self.pos;
        let line = self.line;
        let mut text = String::new();
        let mut had_escape = false;
        loop {
            match self.peek_char() {
                None => break,
                Some(c) if c.is_whitespace() => break,
                Some('(') | Some(')') | Some('#') | Some('"') => break,
                Some('\\') => {
                    had_escape = true;
                    if let Some(c) = self.resolve_escape(false)? {
                        text.push(c);
                    }
                }
                Some(c) => {
                    self.advance_char();
                    text.push(c);
                }
            }
        }
        let kind = if !had_escape && is_identifier(&text) {
            TokenKind::Identifier
        } else {
            TokenKind::UnquotedArgument
        };
        Ok(Token {
            kind,
            text,
            offset,
            line,
        })
    }

    /// Resolve one escape sequence at the current backslash. Returns None
    /// for a quoted-argument line continuation (`\` + newline elides both
    /// characters).
    fn resolve_escape(&mut self, in_quoted: bool) -> Result<Option<char>, LexError> {
        let offset = self.pos;
        let line = self.line;
        self.advance_to(self.pos + 1); // backslash
        let Some(c) = self.peek_char() else {
            return Err(LexError {
                kind: LexErrorKind::TrailingBackslash,
                offset,
                line,
            });
        };
        self.advance_char();
        match c {
            't' => Ok(Some('\t')),
            'r' => Ok(Some('\r')),
            'n' => Ok(Some('\n')),
            ';' => Ok(Some(';')),
            '\n' if in_quoted => Ok(None),
            c if c.is_alphanumeric() => Err(LexError {
                kind: LexErrorKind::UndefinedEscape(c),
                offset,
                line,
            }),
            c => Ok(Some(c)),
        }
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Result<Token, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token()
    }
}

/// `[` followed by a run of `=` and another `[`. Returns the `=` count.
fn bracket_open_level(bytes: &[u8]) -> Option<usize> {
    if bytes.first() != Some(&b'[') {
        return None;
    }
    let mut i = 1;
    while bytes.get(i) == Some(&b'=') {
        i += 1;
    }
    if bytes.get(i) == Some(&b'[') {
        Some(i - 1)
    } else {
        None
    }
}

/// An unescaped `@` immediately followed by a letter.
fn contains_tag_marker(span: &[u8]) -> bool {
    span.iter().enumerate().any(|(i, &b)| {
        b == b'@'
            && (i == 0 || span[i - 1] != b'\\')
            && span.get(i + 1).is_some_and(|c| c.is_ascii_alphabetic())
    })
}

fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex(input: &str) -> Vec<Token> {
        Lexer::new(input).collect::<Result<Vec<_>, _>>().unwrap()
    }

    fn lex_err(input: &str) -> LexError {
        Lexer::new(input)
            .collect::<Result<Vec<_>, _>>()
            .unwrap_err()
    }

    fn kinds(tokens: &[Token]) -> Vec<TokenKind> {
        tokens.iter().map(|t| t.kind).collect()
    }

    #[test]
    fn bare_invocation() {
        let tokens = lex("foo(bar \"baz\")");
        assert_eq!(
            kinds(&tokens),
            vec![
                TokenKind::Identifier,
                TokenKind::LParen,
                TokenKind::Identifier,
                TokenKind::QuotedArgument,
                TokenKind::RParen,
            ]
        );
        assert_eq!(tokens[3].text, "baz");
    }

    #[test]
    fn escapes_resolve_to_literals() {
        let tokens = lex(r"foo(a\tb c\;d x\$y)");
        assert_eq!(tokens[2].text, "a\tb");
        assert_eq!(tokens[3].text, "c;d");
        assert_eq!(tokens[4].text, "x$y");
        assert_eq!(tokens[2].kind, TokenKind::UnquotedArgument);
    }

    #[test]
    fn control_escapes() {
        let tokens = lex(r#"set(X "a\nb\rc\td")"#);
        assert_eq!(tokens[3].text, "a\nb\rc\td");
    }

    #[test]
    fn undefined_escape_is_error() {
        let err = lex_err(r"foo(\d)");
        assert_eq!(err.kind, LexErrorKind::UndefinedEscape('d'));
    }

    #[test]
    fn quoted_line_continuation_elides() {
        let tokens = lex("foo(\"a\\\nb\")");
        assert_eq!(tokens[2].text, "ab");
    }

    #[test]
    fn quoted_spans_lines() {
        let tokens = lex("foo(\"a\nb\")");
        assert_eq!(tokens[2].text, "a\nb");
    }

    #[test]
    fn unterminated_quote_is_error() {
        let err = lex_err("foo(\"abc");
        assert_eq!(err.kind, LexErrorKind::UnterminatedQuote);
    }

    #[test]
    fn bracket_argument_level_matching() {
        let tokens = lex("foo([==[x]=]y]==])");
        assert_eq!(tokens[2].kind, TokenKind::BracketArgument);
        assert_eq!(tokens[2].text, "x]=]y");
    }

    #[test]
    fn bracket_argument_longer_run_is_content() {
        let tokens = lex("foo([=[a]==]b]=])");
        assert_eq!(tokens[2].text, "a]==]b");
    }

    #[test]
    fn unterminated_bracket_is_error() {
        let err = lex_err("foo([=[abc)");
        assert_eq!(err.kind, LexErrorKind::UnterminatedBracket);
    }

    #[test]
    fn line_comment_discarded() {
        let tokens = lex("# a comment\nfoo()");
        assert_eq!(
            kinds(&tokens),
            vec![TokenKind::Identifier, TokenKind::LParen, TokenKind::RParen]
        );
    }

    #[test]
    fn bracket_comment_discarded() {
        let tokens = lex("#[=[ multi\nline ]=]foo()");
        assert_eq!(tokens[0].text, "foo");
        assert_eq!(tokens[0].line, 2);
    }

    #[test]
    fn plain_doc_block() {
        let tokens = lex("#[[[\n# some text\n#]]\n");
        assert_eq!(kinds(&tokens), vec![TokenKind::DocBlock]);
        assert!(tokens[0].text.starts_with("#[[["));
        assert!(tokens[0].text.ends_with("#]]"));
    }

    #[test]
    fn command_doc_block_needs_tag_marker() {
        let tokens = lex("#[[[\n# @module widgets\n#]]\n");
        assert_eq!(kinds(&tokens), vec![TokenKind::CommandDocBlock]);
    }

    #[test]
    fn escaped_marker_is_plain_block() {
        let tokens = lex("#[[[\n# \\@module widgets\n#]]\n");
        assert_eq!(kinds(&tokens), vec![TokenKind::DocBlock]);
    }

    #[test]
    fn doc_block_stops_at_first_closer() {
        let tokens = lex("#[[[\n# one\n#]]\n#[[[\n# two\n#]]\n");
        assert_eq!(kinds(&tokens), vec![TokenKind::DocBlock, TokenKind::DocBlock]);
        assert!(tokens[0].text.contains("one"));
        assert!(tokens[1].text.contains("two"));
    }

    #[test]
    fn unclosed_doc_block_falls_through_to_bracket_comment() {
        // `#[[[ x ]]` has no `#]]`, so the bracket-comment rule consumes it
        let tokens = lex("#[[[ x ]]foo()");
        assert_eq!(tokens[0].text, "foo");
    }

    #[test]
    fn identifier_vs_unquoted() {
        let tokens = lex("foo(foo_bar foo-bar 1.2.3)");
        assert_eq!(tokens[2].kind, TokenKind::Identifier);
        assert_eq!(tokens[3].kind, TokenKind::UnquotedArgument);
        assert_eq!(tokens[4].kind, TokenKind::UnquotedArgument);
    }

    #[test]
    fn offsets_and_lines() {
        let tokens = lex("foo()\nbar()");
        assert_eq!(tokens[0].offset, 0);
        assert_eq!(tokens[0].line, 1);
        assert_eq!(tokens[3].text, "bar");
        assert_eq!(tokens[3].line, 2);
        assert_eq!(tokens[3].offset, 6);
    }
}
