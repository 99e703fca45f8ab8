//! A minimal tokenizer: greedy literal matching over a named-token table,
//! integer literals, and a trailing end-of-stream token.
//!
//! This is the external contract the generated parser's runtime driver is
//! built against; a project feeding its own lexer into [`crate::driver`]
//! can skip this module entirely.

use crate::symbol::Symbol;
use std::collections::HashMap;

/// A source location: file name plus 0-based line, column, and byte
/// offset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Loc {
    pub file: String,
    pub line: usize,
    pub col: usize,
    pub offset: usize,
}

impl Loc {
    pub fn new(file: impl Into<String>, line: usize, col: usize, offset: usize) -> Self {
        Self {
            file: file.into(),
            line,
            col,
            offset,
        }
    }
}

/// A single lexed token: its terminal kind (matching a [`Symbol::Terminal`]
/// name), the exact text matched, and where it was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: String,
    pub lexeme: String,
    pub loc: Loc,
}

impl Token {
    /// The [`Symbol`] this token is classified as for table lookup.
    pub fn symbol(&self) -> Symbol {
        if self.kind == "eof" {
            Symbol::eof()
        } else {
            Symbol::terminal(self.kind.clone())
        }
    }
}

/// A greedy literal-table lexer over a source string.
///
/// Named tokens (e.g. keywords and operators) are matched longest-first;
/// anything left over that starts with an ASCII digit is matched as an
/// `integer`, anything left over that is a run of word characters is
/// matched as a `word`, and whitespace is skipped (never yielded). The
/// stream always ends with one `eof` token.
pub struct Lexer<'a> {
    code: &'a str,
    filename: String,
    named_tokens: Vec<(String, String)>,
    offset: usize,
    line: usize,
    col: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(code: &'a str, named_tokens: HashMap<String, String>, filename: impl Into<String>) -> Self {
        let mut named_tokens: Vec<(String, String)> = named_tokens.into_iter().collect();
        named_tokens.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
        Self {
            code,
            filename: filename.into(),
            named_tokens,
            offset: 0,
            line: 0,
            col: 0,
        }
    }

    fn remaining(&self) -> &'a str {
        &self.code[self.offset..]
    }

    fn advance(&mut self, n: usize) {
        for ch in self.remaining()[..n].chars() {
            if ch == '\n' {
                self.line += 1;
                self.col = 0;
            } else {
                self.col += 1;
            }
        }
        self.offset += n;
    }

    fn loc(&self) -> Loc {
        Loc::new(self.filename.clone(), self.line, self.col, self.offset)
    }

    fn match_literal(&self) -> Option<(String, String)> {
        let remaining = self.remaining();
        self.named_tokens
            .iter()
            .find(|(matching, _)| remaining.starts_with(matching.as_str()))
            .map(|(matching, identifier)| (matching.clone(), identifier.clone()))
    }

    fn match_integer(&self) -> Option<String> {
        let remaining = self.remaining();
        let digits: String = remaining.chars().take_while(|c| c.is_ascii_digit()).collect();
        if digits.is_empty() {
            None
        } else {
            Some(digits)
        }
    }

    fn match_word(&self) -> Option<String> {
        let remaining = self.remaining();
        let word: String = remaining
            .chars()
            .take_while(|c| c.is_alphanumeric() || *c == '_')
            .collect();
        if word.is_empty() {
            None
        } else {
            Some(word)
        }
    }

    /// Produces the full token stream, always ending with one `eof` token.
    /// Whitespace is skipped rather than yielded.
    pub fn tokenize(mut self) -> Vec<Token> {
        let mut tokens = Vec::new();

        while self.offset < self.code.len() {
            let ch = self.remaining().chars().next().unwrap();
            if ch.is_whitespace() {
                self.advance(ch.len_utf8());
                continue;
            }

            let loc = self.loc();

            if let Some((matching, identifier)) = self.match_literal() {
                self.advance(matching.len());
                tokens.push(Token {
                    kind: identifier,
                    lexeme: matching,
                    loc,
                });
                continue;
            }

            if ch.is_ascii_digit() {
                let lexeme = self.match_integer().unwrap();
                self.advance(lexeme.len());
                tokens.push(Token {
                    kind: "integer".to_string(),
                    lexeme,
                    loc,
                });
                continue;
            }

            if let Some(lexeme) = self.match_word() {
                self.advance(lexeme.len());
                tokens.push(Token {
                    kind: "word".to_string(),
                    lexeme,
                    loc,
                });
                continue;
            }

            let lexeme = ch.to_string();
            self.advance(ch.len_utf8());
            tokens.push(Token {
                kind: "char".to_string(),
                lexeme,
                loc,
            });
        }

        let loc = self.loc();
        tokens.push(Token {
            kind: "eof".to_string(),
            lexeme: String::new(),
            loc,
        });
        tokens
    }
}
