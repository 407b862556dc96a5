//! Running a rule set over one compilation unit.

use std::collections::BTreeSet;

use tugstyle_cst::visitor::{apply_rule, Formatter, RewriteCtx, Rule};
use tugstyle_cst::{parse_compilation_unit, Codegen, CompilationUnit};

/// The rewritten tree and the names of the rules that changed it.
#[derive(Debug, Clone)]
pub struct RewriteResult {
    pub unit: CompilationUnit,
    pub changed_rules: BTreeSet<String>,
}

impl RewriteResult {
    pub fn is_changed(&self) -> bool {
        !self.changed_rules.is_empty()
    }
}

/// Applies `rules` one after another, each to the output of the previous one.
///
/// Indentation for inserted or moved code is sampled once, from the tree as
/// it was before any rule ran.
pub fn rewrite(unit: CompilationUnit, rules: &[Box<dyn Rule>]) -> RewriteResult {
    let formatter = Formatter::detect(&unit.to_source());
    let mut unit = unit;
    let mut changed_rules = BTreeSet::new();

    for rule in rules {
        let mut ctx = RewriteCtx::new(formatter.clone(), unit.node_count);
        let (rewritten, changed) = apply_rule(unit, rule.as_ref(), &mut ctx);
        unit = rewritten;
        if changed {
            tracing::debug!(rule = rule.name(), "rule changed the tree");
            changed_rules.insert(rule.name().to_string());
        }
    }

    RewriteResult {
        unit,
        changed_rules,
    }
}

/// Parses `source`, rewrites it and prints the result.
///
/// Returns the new text together with the names of the rules that changed
/// it; the text equals `source` when that set is empty.
pub fn rewrite_source<'a>(
    source: &'a str,
    rules: &[Box<dyn Rule>],
) -> tugstyle_cst::Result<'a, (String, BTreeSet<String>)> {
    let unit = parse_compilation_unit(source)?;
    let result = rewrite(unit, rules);
    Ok((result.unit.to_source(), result.changed_rules))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::{build_rules, default_rules, FinalClass};

    #[test]
    fn reports_changed_rules_in_name_order() {
        let rules = build_rules(&default_rules());
        let source = "class A {\n    void f() {\n        if (x.equals(\"a\")) { g(); }\n    }\n}\n";
        let (fixed, changed) = rewrite_source(source, &rules).unwrap();
        assert_eq!(
            changed.into_iter().collect::<Vec<_>>(),
            vec![
                "checkstyle.EqualsAvoidsNull",
                "checkstyle.FinalClass",
                "checkstyle.RightCurly"
            ]
        );
        assert_eq!(
            fixed,
            "final class A {\n    void f() {\n        if (\"a\".equals(x)) {\n            g();\n        }\n    }\n}\n"
        );
    }

    #[test]
    fn untouched_source_reports_nothing() {
        let rules = build_rules(&default_rules());
        let source = "public final class A {\n    // nothing to do\n}\n";
        let (fixed, changed) = rewrite_source(source, &rules).unwrap();
        assert!(changed.is_empty());
        assert_eq!(fixed, source);
    }

    #[test]
    fn node_count_covers_inserted_nodes() {
        let unit = parse_compilation_unit("class A {}").unwrap();
        let before = unit.node_count;
        let rules: Vec<Box<dyn Rule>> = vec![Box::new(FinalClass)];
        let result = rewrite(unit, &rules);
        assert!(result.is_changed());
        assert_eq!(result.unit.node_count, before + 1);
    }
}
