// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

use super::{tokenize, TokError, TokType};

fn tokenize_all(text: &str) -> Result<Vec<(TokType, &str)>, TokError> {
    let mut result: Vec<_> = tokenize(text)?
        .into_iter()
        .map(|tok| (tok.r#type, tok.string))
        .collect();
    assert_eq!(result.pop().expect("EndMarker").0, TokType::EndMarker);
    Ok(result)
}

#[test]
fn test_identifiers_and_keywords() {
    assert_eq!(
        tokenize_all("public class $Foo_1"),
        Ok(vec![
            (TokType::Identifier, "public"),
            (TokType::Identifier, "class"),
            (TokType::Identifier, "$Foo_1"),
        ])
    );
}

#[test]
fn test_operators_longest_match() {
    assert_eq!(
        tokenize_all("a != b && c <<= 2"),
        Ok(vec![
            (TokType::Identifier, "a"),
            (TokType::Op, "!="),
            (TokType::Identifier, "b"),
            (TokType::Op, "&&"),
            (TokType::Identifier, "c"),
            (TokType::Op, "<<="),
            (TokType::Number, "2"),
        ])
    );
}

#[test]
fn test_greater_than_is_never_joined() {
    assert_eq!(
        tokenize_all("List<List<T>> x >>= 1"),
        Ok(vec![
            (TokType::Identifier, "List"),
            (TokType::Op, "<"),
            (TokType::Identifier, "List"),
            (TokType::Op, "<"),
            (TokType::Identifier, "T"),
            (TokType::Op, ">"),
            (TokType::Op, ">"),
            (TokType::Identifier, "x"),
            (TokType::Op, ">"),
            (TokType::Op, ">"),
            (TokType::Op, "="),
            (TokType::Number, "1"),
        ])
    );
}

#[test]
fn test_literals() {
    assert_eq!(
        tokenize_all(r#""a\"b" 'c' '\n' 0x1F 1_000L 3.5e-2f .5"#),
        Ok(vec![
            (TokType::String, r#""a\"b""#),
            (TokType::Char, "'c'"),
            (TokType::Char, r"'\n'"),
            (TokType::Number, "0x1F"),
            (TokType::Number, "1_000L"),
            (TokType::Number, "3.5e-2f"),
            (TokType::Number, ".5"),
        ])
    );
}

#[test]
fn test_text_block() {
    let text = "String s = \"\"\"\n    hi \"there\"\n    \"\"\";";
    let toks = tokenize_all(text).expect("tokenize");
    assert_eq!(toks[3], (TokType::TextBlock, "\"\"\"\n    hi \"there\"\n    \"\"\""));
    assert_eq!(toks[4], (TokType::Op, ";"));
}

#[test]
fn test_trivia_becomes_prefix() {
    let toks = tokenize("a /* one */ // two\n  b  ").expect("tokenize");
    assert_eq!(toks[0].prefix, "");
    assert_eq!(toks[1].prefix, " /* one */ // two\n  ");
    assert_eq!(toks[1].start, 21);
    assert_eq!(toks[2].r#type, TokType::EndMarker);
    assert_eq!(toks[2].prefix, "  ");
}

#[test]
fn test_tokens_cover_input() {
    let text = "class A {\r\n\tint x = 1; // c\r\n}\r\n";
    let rebuilt: String = tokenize(text)
        .expect("tokenize")
        .iter()
        .map(|tok| format!("{}{}", tok.prefix, tok.string))
        .collect();
    assert_eq!(rebuilt, text);
}

#[test]
fn test_errors() {
    assert_eq!(
        tokenize_all("\"abc"),
        Err(TokError::UnterminatedString { offset: 0 })
    );
    assert_eq!(
        tokenize_all("a /* b"),
        Err(TokError::UnterminatedComment { offset: 2 })
    );
    assert_eq!(
        tokenize_all("a # b"),
        Err(TokError::BadCharacter { ch: '#', offset: 2 })
    );
}
