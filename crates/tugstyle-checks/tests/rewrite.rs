//! End-to-end rewrite tests: parse, apply rules, print.
//!
//! Covers the documented examples for each rule, idempotence of the whole
//! rule set, and isolation of scoped follow-ups.

use std::collections::BTreeSet;
use std::path::PathBuf;

use difference::assert_diff;
use itertools::Itertools;
use tugstyle_checks::{
    build_rules, default_rules, rewrite, rewrite_source, EqualsAvoidsNull, FinalClass,
    RightCurly, RightCurlyPolicy, RuleConfig, Token,
};
use tugstyle_cst::visitor::Rule;
use tugstyle_cst::{parse_compilation_unit, prettify_error, Codegen};

/// Helper to visualize whitespace differences in test output
fn visualize(s: &str) -> String {
    s.replace(' ', "▩").lines().join("↩\n")
}

fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read fixture {}: {}", name, e))
}

fn apply(rules: &[Box<dyn Rule>], source: &str) -> (String, BTreeSet<String>) {
    match rewrite_source(source, rules) {
        Ok(result) => result,
        Err(e) => panic!("{}", prettify_error(e, "input")),
    }
}

fn assert_fixed(rules: &[Box<dyn Rule>], before: &str, after: &str) {
    let (fixed, _) = apply(rules, before);
    if fixed != after {
        let got = visualize(&fixed);
        let expected = visualize(after);
        assert_diff!(expected.as_ref(), got.as_ref(), "", 0);
    }
}

fn one(rule: impl Rule + 'static) -> Vec<Box<dyn Rule>> {
    vec![Box::new(rule)]
}

fn in_method(body: &str) -> String {
    format!("class A {{\n    void f() {{\n        {body}\n    }}\n}}\n")
}

// =============================================================================
// FinalClass
// =============================================================================

#[test]
fn final_class_examples() {
    let rules = one(FinalClass);
    assert_fixed(
        &rules,
        "public class Foo { private Foo() {} }",
        "public final class Foo { private Foo() {} }",
    );
    assert_fixed(
        &rules,
        "class Bar { private Bar() {} }",
        "final class Bar { private Bar() {} }",
    );
    assert_fixed(&rules, "class Baz {}", "final class Baz {}");
    assert_fixed(
        &rules,
        "class Qux { public Qux() {} }",
        "class Qux { public Qux() {} }",
    );
}

// =============================================================================
// EqualsAvoidsNull
// =============================================================================

#[test]
fn equals_avoids_null_examples() {
    let rules = one(EqualsAvoidsNull::default());
    assert_fixed(
        &rules,
        &in_method("x.equals(\"a\");"),
        &in_method("\"a\".equals(x);"),
    );
    assert_fixed(
        &rules,
        &in_method("\"a\".equals(x);"),
        &in_method("\"a\".equals(x);"),
    );
    assert_fixed(
        &rules,
        &in_method("boolean b = x != null && x.equals(\"a\");"),
        &in_method("boolean b = \"a\".equals(x);"),
    );

    let ignoring = one(EqualsAvoidsNull::new(true));
    assert_fixed(
        &ignoring,
        &in_method("x.equalsIgnoreCase(\"a\");"),
        &in_method("x.equalsIgnoreCase(\"a\");"),
    );
}

#[test]
fn null_check_removal_is_scoped_to_its_own_and() {
    // Both `&&` expressions have the same shape; only the one guarding the
    // swapped call loses its left operand.
    let rules = one(EqualsAvoidsNull::default());
    assert_fixed(
        &rules,
        &in_method("boolean b = (s != null && s.equals(\"a\")) && (s != null && s.isEmpty());"),
        &in_method("boolean b = \"a\".equals(s) && (s != null && s.isEmpty());"),
    );
    assert_fixed(
        &rules,
        &in_method("if (s != null && s.equals(\"a\")) { } if (s != null && s.equals(t)) { }"),
        &in_method("if (\"a\".equals(s)) { } if (s != null && s.equals(t)) { }"),
    );
}

// =============================================================================
// RightCurly
// =============================================================================

#[test]
fn right_curly_example() {
    let tokens = [Token::LiteralIf, Token::LiteralElse].into_iter().collect();
    let rules = one(RightCurly::new(RightCurlyPolicy::Alone, tokens));
    let before = in_method("if (c) { a(); } else { b(); }");
    let after = "class A {\n    void f() {\n        if (c) {\n            a();\n        }\n        else {\n            b();\n        }\n    }\n}\n";
    assert_fixed(&rules, &before, after);
    assert_fixed(&rules, after, after);
}

#[test]
fn right_curly_configured_twice() {
    // Checkstyle allows several RightCurly modules, each with its own
    // policy and tokens.
    let rules = build_rules(&[
        RuleConfig::RightCurly {
            option: RightCurlyPolicy::Same,
            tokens: [Token::LiteralTry, Token::LiteralCatch].into_iter().collect(),
        },
        RuleConfig::RightCurly {
            option: RightCurlyPolicy::Alone,
            tokens: [Token::LiteralIf].into_iter().collect(),
        },
    ]);
    let before = in_method("try {\n            a();\n        }\n        catch (E e) {\n            if (c) { d(); }\n        }");
    let after = in_method("try {\n            a();\n        } catch (E e) {\n            if (c) {\n                d();\n            }\n        }");
    assert_fixed(&rules, &before, &after);
}

// =============================================================================
// Whole rule set
// =============================================================================

#[test]
fn fixture_service() {
    let rules = build_rules(&default_rules());
    let before = read_fixture("service.java");
    let after = read_fixture("service.fixed.java");

    let (_, changed) = apply(&rules, &before);
    assert_eq!(
        changed.iter().map(String::as_str).collect::<Vec<_>>(),
        vec![
            "checkstyle.EqualsAvoidsNull",
            "checkstyle.FinalClass",
            "checkstyle.RightCurly"
        ]
    );
    assert_fixed(&rules, &before, &after);
}

#[test]
fn rule_set_is_idempotent() {
    let rules = build_rules(&default_rules());
    let inputs = [
        read_fixture("service.java"),
        in_method("if (x != null && x.equals(\"a\")) { a(); } else if (y) { b(); } else { c(); }"),
        in_method("try { a(); } catch (E e) { b(); } finally { c(); }"),
        "public class P { public static class Q { private Q() {} } }".to_string(),
        "class R {\n\tvoid f() {\n\t\tif (a) { b(); }\n\t}\n}\n".to_string(),
    ];

    for input in inputs {
        let unit = match parse_compilation_unit(&input) {
            Ok(unit) => unit,
            Err(e) => panic!("{}", prettify_error(e, "input")),
        };
        let first = rewrite(unit, &rules);
        let printed = first.unit.to_source();
        let second = rewrite(first.unit, &rules);
        assert!(
            second.changed_rules.is_empty(),
            "second run changed {:?} in:\n{}",
            second.changed_rules,
            printed
        );
        assert_eq!(second.unit.to_source(), printed);

        // Reparsing the printed output gives the same verdict.
        let (_, changed) = apply(&rules, &printed);
        assert!(changed.is_empty(), "reparse changed {:?}", changed);
    }
}

#[test]
fn empty_rule_set_round_trips() {
    let source = read_fixture("service.java");
    let (fixed, changed) = apply(&[], &source);
    assert!(changed.is_empty());
    assert_eq!(fixed, source);
}
