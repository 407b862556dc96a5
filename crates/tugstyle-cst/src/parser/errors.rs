// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

use crate::tokenizer::TokError;
use thiserror::Error;

/// Where the parser gave up and what it was looking for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    pub expected: &'static str,
    /// Byte offset of the offending token.
    pub offset: usize,
    /// Text of the offending token; empty at end of file.
    pub found: String,
}

#[allow(clippy::enum_variant_names)]
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParserError<'a> {
    #[error("tokenizer error: {0}")]
    TokenizerError(TokError, &'a str),
    #[error("parser error: expected {} at byte {}", .0.expected, .0.offset)]
    ParserError(SyntaxError, &'a str),
}

impl ParserError<'_> {
    /// Byte offset in the source where the error was detected.
    pub fn offset(&self) -> usize {
        match self {
            ParserError::TokenizerError(err, _) => err.offset(),
            ParserError::ParserError(err, _) => err.offset,
        }
    }
}

pub type Result<'a, T> = std::result::Result<T, ParserError<'a>>;
