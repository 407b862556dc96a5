// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! A Java parser, formatting-preserving Concrete Syntax Tree (CST) and
//! bottom-up rewrite engine.
//!
//! # Overview
//!
//! - **Parsing**: [`parse_compilation_unit`] turns Java source into a
//!   [`CompilationUnit`]. Every byte of whitespace and every comment is kept
//!   on the node that follows it.
//! - **Code Generation**: the [`Codegen`] trait prints a tree back to source.
//!   An unmodified tree prints exactly the text it was parsed from.
//! - **Rewriting**: the [`visitor`] module walks a tree bottom-up with a
//!   [`visitor::Rule`], tracking changes and running scoped follow-up passes.
//!
//! # Quick Start
//!
//! ```
//! use tugstyle_cst::{parse_compilation_unit, Codegen};
//!
//! let source = "class A {\n    // hello\n}\n";
//! let unit = parse_compilation_unit(source).expect("parse error");
//! assert_eq!(unit.to_source(), source);
//! ```

use std::cmp::min;

/// Visitor and rewrite infrastructure.
pub mod visitor;

/// Tokenizer for Java source code.
pub mod tokenizer;
use tokenizer::TokError;

mod nodes;
pub use nodes::*;

mod parser;
use parser::Parser;
pub use parser::{ParserError, Result, SyntaxError};

// ============================================================================
// Parsing functions
// ============================================================================

/// Tokenizes Java source code, ending with an end marker token.
///
/// # Errors
///
/// Returns a [`ParserError::TokenizerError`] for unterminated literals and
/// comments or characters that cannot start a token.
pub fn tokenize(text: &str) -> Result<'_, Vec<tokenizer::Token<'_>>> {
    tokenizer::tokenize(text).map_err(|err: TokError| ParserError::TokenizerError(err, text))
}

/// Parses a Java compilation unit.
///
/// # Example
///
/// ```
/// use tugstyle_cst::parse_compilation_unit;
///
/// let unit = parse_compilation_unit("public class A {}").expect("parse error");
/// assert_eq!(unit.classes().count(), 1);
/// ```
pub fn parse_compilation_unit(text: &str) -> Result<'_, CompilationUnit> {
    let tokens = tokenize(text)?;
    Parser::new(text, &tokens)
        .compilation_unit()
        .map_err(|err| ParserError::ParserError(err, text))
}

/// Parses a single Java expression.
///
/// # Example
///
/// ```
/// use tugstyle_cst::{parse_expression, Expression};
///
/// let expr = parse_expression("x.equals(\"a\")").expect("parse error");
/// assert!(matches!(expr, Expression::MethodInvocation(_)));
/// ```
pub fn parse_expression(text: &str) -> Result<'_, Expression> {
    let tokens = tokenize(text)?;
    Parser::new(text, &tokens)
        .expression_input()
        .map_err(|err| ParserError::ParserError(err, text))
}

// ============================================================================
// Error formatting
// ============================================================================

/// Returns the byte offset of the beginning of line `n` (1-indexed).
fn bol_offset(source: &str, n: usize) -> usize {
    if n <= 1 {
        return 0;
    }
    source
        .match_indices('\n')
        .nth(n - 2)
        .map(|(index, _)| index + 1)
        .unwrap_or(source.len())
}

/// Formats a parser error with the surrounding source lines.
///
/// # Example
///
/// ```
/// use tugstyle_cst::{parse_compilation_unit, prettify_error};
///
/// if let Err(e) = parse_compilation_unit("class A {") {
///     let formatted = prettify_error(e, "A.java");
///     assert!(formatted.contains("A.java"));
/// }
/// ```
pub fn prettify_error(err: ParserError<'_>, label: &str) -> String {
    use annotate_snippets::{Level, Renderer, Snippet};

    let (text, message) = match &err {
        ParserError::TokenizerError(e, text) => (*text, e.to_string()),
        ParserError::ParserError(e, text) => (*text, format!("expected {}", e.expected)),
    };
    let offset = min(err.offset(), text.len());
    let line = text[..offset].matches('\n').count() + 1;
    let context = 1;
    let line_start = line.saturating_sub(context).max(1);
    let start_offset = bol_offset(text, line_start);
    let end_offset = bol_offset(text, line + context + 1);
    let source = &text[start_offset..end_offset];
    let start = offset - start_offset;
    let end = min(start + 1, source.len() + 1);
    let rendered = Renderer::styled()
        .render(
            Level::Error.title(label).snippet(
                Snippet::source(source)
                    .line_start(line_start)
                    .fold(false)
                    .annotations(vec![Level::Error.span(start..end).label(&message)]),
            ),
        )
        .to_string();
    rendered
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_tokenizer_error() {
        let err = parse_compilation_unit("class A { String s = \"open; }").expect_err("error");
        assert_eq!(
            err,
            ParserError::TokenizerError(
                TokError::UnterminatedString { offset: 21 },
                "class A { String s = \"open; }"
            )
        );
    }

    #[test]
    fn test_empty_input() {
        let unit = parse_compilation_unit("").expect("parse error");
        assert!(unit.statements.is_empty());
        assert_eq!(unit.to_source(), "");
    }

    #[test]
    fn test_byte_order_mark_round_trips() {
        let source = "\u{feff}class A {}\n";
        let unit = parse_compilation_unit(source).expect("parse error");
        assert_eq!(unit.to_source(), source);
    }

    #[test]
    fn test_prettify_mentions_label() {
        let err = parse_compilation_unit("class A {\n  void f() {\n").expect_err("error");
        let pretty = prettify_error(err, "A.java");
        assert!(pretty.contains("A.java"));
    }

    #[test]
    fn test_prettify_renders_message_and_line() {
        let err = parse_compilation_unit("class A {\n  String s = \"open;\n}\n").expect_err("error");
        let pretty = prettify_error(err, "B.java");
        assert!(pretty.contains("B.java"));
        assert!(pretty.contains('2'));

        let err = parse_compilation_unit("class A {\n  void f() {\n").expect_err("error");
        let pretty = prettify_error(err, "C.java");
        assert!(pretty.contains("expected"));
    }

    #[test]
    fn bol_offset_lines() {
        assert_eq!(0, bol_offset("hello", 1));
        assert_eq!(0, bol_offset("hello", 0));
        assert_eq!(6, bol_offset("hello\nhello", 2));
        assert_eq!(11, bol_offset("hello\nhello", 3));
        assert_eq!(5, bol_offset("hello", 2));
    }
}
