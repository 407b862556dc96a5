// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Round-trip tests for the tugstyle-cst parser.
//!
//! Printing a freshly parsed tree must reproduce the input byte for byte:
//! comments, blank lines, tabs, CRLF line endings and constructs the parser
//! keeps as opaque text included.
//!
//! To add a fixture-based test, create a `.java` file in `tests/fixtures/`
//! and add a corresponding `roundtrip_fixture_<name>` test function.

use difference::assert_diff;
use itertools::Itertools;
use std::path::PathBuf;
use tugstyle_cst::{parse_compilation_unit, prettify_error, Codegen};

/// Helper to visualize whitespace differences in test output
fn visualize(s: &str) -> String {
    s.replace(' ', "▩").replace('\t', "→").lines().join("↩\n")
}

fn assert_roundtrip(input: &str, label: &str) {
    let unit = match parse_compilation_unit(input) {
        Ok(unit) => unit,
        Err(e) => panic!("{}", prettify_error(e, label)),
    };

    let generated = unit.to_source();
    if generated != input {
        let got = visualize(&generated);
        let expected = visualize(input);
        assert_diff!(expected.as_ref(), got.as_ref(), "", 0);
    }
}

fn assert_roundtrip_fixture(fixture_name: &str) {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(fixture_name);

    let contents = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read fixture {}: {}", fixture_name, e));

    assert_roundtrip(&contents, fixture_name);
}

// =============================================================================
// Fixture-based round-trip tests
// =============================================================================

#[test]
fn roundtrip_fixture_basic_class() {
    assert_roundtrip_fixture("basic_class.java");
}

#[test]
fn roundtrip_fixture_statements() {
    assert_roundtrip_fixture("statements.java");
}

#[test]
fn roundtrip_fixture_expressions() {
    assert_roundtrip_fixture("expressions.java");
}

#[test]
fn roundtrip_fixture_enums_and_records() {
    assert_roundtrip_fixture("enums_and_records.java");
}

#[test]
fn roundtrip_fixture_tabs_and_comments() {
    assert_roundtrip_fixture("tabs_and_comments.java");
}

// =============================================================================
// Inline round-trip tests
// =============================================================================

#[test]
fn roundtrip_empty_input() {
    assert_roundtrip("", "empty");
    assert_roundtrip("   \n\n", "whitespace only");
    assert_roundtrip("// only a comment", "comment only");
}

#[test]
fn roundtrip_crlf_line_endings() {
    let input = "class A {\r\n    void f() {\r\n        if (x) {\r\n            y();\r\n        } else {\r\n            z();\r\n        }\r\n    }\r\n}\r\n";
    assert_roundtrip(input, "crlf");
}

#[test]
fn roundtrip_byte_order_mark() {
    assert_roundtrip("\u{feff}class A {}\n", "bom");
}

#[test]
fn roundtrip_odd_spacing() {
    assert_roundtrip(
        "public   final\tclass  A<T>extends B{int x=1 ,y ;void f( ){a . b ( c , d ) ;}}",
        "odd spacing",
    );
}

#[test]
fn roundtrip_nested_generics() {
    assert_roundtrip(
        "class A { Map<String, List<Map<K, V>>> m = new HashMap<>(); boolean b = x >>> 2 >= y >> 1; }",
        "nested generics",
    );
}

#[test]
fn roundtrip_if_else_chains() {
    let input = r#"class A {
    void f() {
        if (a) b();
        else if (c) { d(); }
        else
        {
            e();
        }
    }
}
"#;
    assert_roundtrip(input, "if else chains");
}

#[test]
fn roundtrip_comment_before_closing_brace() {
    let input = "class A {\n    void f() {\n        x();\n        // done\n    }\n}\n";
    assert_roundtrip(input, "comment before brace");
}

#[test]
fn roundtrip_casts_and_lambdas() {
    let input = "class A { void f() { Object o = (Runnable) () -> {}; int i = (int) -x; var s = (String) (o); g(a -> a + 1, String::valueOf); } }";
    assert_roundtrip(input, "casts and lambdas");
}

#[test]
fn roundtrip_interfaces_and_annotations() {
    let input = "@Deprecated(since = \"1\")\n@interface Tag { int value() default 1; }\n\nsealed interface S permits T {}\n";
    assert_roundtrip(input, "interfaces and annotations");
}
