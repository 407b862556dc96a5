// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Java tokenizer.
//!
//! Every token carries the trivia (whitespace and comments) that precedes it
//! as a borrowed `prefix` slice, so the concatenation of `prefix + string` over
//! all tokens, followed by the end marker's prefix, is exactly the input.
//!
//! `>` is always emitted as a single-character token. The parser joins adjacent
//! `>` tokens into shift operators where an expression expects them, which
//! keeps nested generic arguments such as `List<List<String>>` unambiguous.

#[cfg(test)]
mod tests;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokType {
    Identifier,
    String,
    TextBlock,
    Char,
    Number,
    Op,
    EndMarker,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub r#type: TokType,
    pub string: &'a str,
    /// Whitespace and comments before the token.
    pub prefix: &'a str,
    /// Byte offset of `string` in the source.
    pub start: usize,
}

impl Token<'_> {
    /// Byte offset just past the token.
    pub fn end(&self) -> usize {
        self.start + self.string.len()
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokError {
    #[error("unterminated string literal")]
    UnterminatedString { offset: usize },
    #[error("unterminated text block")]
    UnterminatedTextBlock { offset: usize },
    #[error("unterminated character literal")]
    UnterminatedChar { offset: usize },
    #[error("unterminated block comment")]
    UnterminatedComment { offset: usize },
    #[error("unexpected character {ch:?}")]
    BadCharacter { ch: char, offset: usize },
}

impl TokError {
    pub fn offset(&self) -> usize {
        match self {
            TokError::UnterminatedString { offset }
            | TokError::UnterminatedTextBlock { offset }
            | TokError::UnterminatedChar { offset }
            | TokError::UnterminatedComment { offset }
            | TokError::BadCharacter { offset, .. } => *offset,
        }
    }
}

/// Punctuators, longest first so that the first match wins.
const OPERATORS: &[&str] = &[
    "<<=", "...", "->", "::", "++", "--", "&&", "||", "==", "!=", "<=", "+=", "-=", "*=", "/=",
    "%=", "&=", "|=", "^=", "<<", "(", ")", "{", "}", "[", "]", ";", ",", ".", "@", "=", ">",
    "<", "!", "~", "?", ":", "+", "-", "*", "/", "&", "|", "^", "%",
];

pub struct TokenIterator<'a> {
    text: &'a str,
    pos: usize,
    done: bool,
}

impl<'a> TokenIterator<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            pos: 0,
            done: false,
        }
    }

    fn rest(&self) -> &'a str {
        &self.text[self.pos..]
    }

    fn peek_char(&self) -> Option<char> {
        self.rest().chars().next()
    }

    /// Advances past whitespace and comments.
    fn skip_trivia(&mut self) -> Result<(), TokError> {
        loop {
            let rest = self.rest();
            if let Some(c) = rest
                .chars()
                .next()
                .filter(|c| c.is_whitespace() || *c == '\u{feff}')
            {
                self.pos += c.len_utf8();
            } else if rest.starts_with("//") {
                self.pos += rest.find('\n').unwrap_or(rest.len());
            } else if rest.starts_with("/*") {
                match rest[2..].find("*/") {
                    Some(end) => self.pos += end + 4,
                    None => return Err(TokError::UnterminatedComment { offset: self.pos }),
                }
            } else {
                return Ok(());
            }
        }
    }

    /// Length of a quoted literal starting at the current position, escapes
    /// included.
    fn quoted_len(&self, quote: char) -> Option<usize> {
        let rest = self.rest();
        let mut chars = rest.char_indices().skip(1);
        while let Some((i, c)) = chars.next() {
            match c {
                '\\' => {
                    chars.next();
                }
                '\n' => return None,
                c if c == quote => return Some(i + 1),
                _ => {}
            }
        }
        None
    }

    fn text_block_len(&self) -> Option<usize> {
        let rest = self.rest();
        let mut i = 3;
        let bytes = rest.as_bytes();
        while i < bytes.len() {
            if bytes[i] == b'\\' {
                i += 2;
            } else if bytes[i..].starts_with(b"\"\"\"") {
                return Some(i + 3);
            } else {
                i += 1;
            }
        }
        None
    }

    fn number_len(&self) -> usize {
        let bytes = self.rest().as_bytes();
        let hex = bytes.len() > 1 && bytes[0] == b'0' && matches!(bytes[1], b'x' | b'X');
        let mut i = 0;
        while i < bytes.len() {
            let b = bytes[i];
            let exponent = if hex {
                matches!(b, b'p' | b'P')
            } else {
                matches!(b, b'e' | b'E')
            };
            if exponent && i + 1 < bytes.len() && matches!(bytes[i + 1], b'+' | b'-') {
                i += 2;
            } else if b.is_ascii_alphanumeric() || b == b'_' || b == b'.' {
                i += 1;
            } else {
                break;
            }
        }
        i
    }

    fn identifier_len(&self) -> usize {
        self.rest()
            .char_indices()
            .find(|(_, c)| !is_identifier_part(*c))
            .map(|(i, _)| i)
            .unwrap_or(self.rest().len())
    }

    fn next_token(&mut self) -> Result<Token<'a>, TokError> {
        let trivia_start = self.pos;
        self.skip_trivia()?;
        let prefix = &self.text[trivia_start..self.pos];
        let start = self.pos;
        let rest = self.rest();

        let Some(c) = self.peek_char() else {
            self.done = true;
            return Ok(Token {
                r#type: TokType::EndMarker,
                string: "",
                prefix,
                start,
            });
        };

        let (r#type, len) = if rest.starts_with("\"\"\"") {
            let len = self
                .text_block_len()
                .ok_or(TokError::UnterminatedTextBlock { offset: start })?;
            (TokType::TextBlock, len)
        } else if c == '"' {
            let len = self
                .quoted_len('"')
                .ok_or(TokError::UnterminatedString { offset: start })?;
            (TokType::String, len)
        } else if c == '\'' {
            let len = self
                .quoted_len('\'')
                .ok_or(TokError::UnterminatedChar { offset: start })?;
            (TokType::Char, len)
        } else if c.is_ascii_digit()
            || (c == '.' && rest[1..].starts_with(|d: char| d.is_ascii_digit()))
        {
            (TokType::Number, self.number_len())
        } else if is_identifier_start(c) {
            (TokType::Identifier, self.identifier_len())
        } else if let Some(op) = OPERATORS.iter().find(|op| rest.starts_with(**op)) {
            (TokType::Op, op.len())
        } else {
            return Err(TokError::BadCharacter { ch: c, offset: start });
        };

        self.pos += len;
        Ok(Token {
            r#type,
            string: &self.text[start..self.pos],
            prefix,
            start,
        })
    }
}

impl<'a> Iterator for TokenIterator<'a> {
    type Item = Result<Token<'a>, TokError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let result = self.next_token();
        if result.is_err() {
            self.done = true;
        }
        Some(result)
    }
}

fn is_identifier_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '$'
}

fn is_identifier_part(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

/// Tokenizes `text`, ending with a [`TokType::EndMarker`] token that carries
/// any trailing trivia.
pub fn tokenize(text: &str) -> Result<Vec<Token<'_>>, TokError> {
    TokenIterator::new(text).collect()
}
