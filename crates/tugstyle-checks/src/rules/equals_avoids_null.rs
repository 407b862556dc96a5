//! Puts string literals on the left of `equals` calls.
//!
//! `name.equals("x")` throws when `name` is null; `"x".equals(name)` does
//! not. Once the call is swapped, a null check guarding it on the left of
//! `&&` is redundant and is removed by a scoped follow-up.

use tugstyle_cst::visitor::{Cursor, RewriteCtx, Rule, Transform};
use tugstyle_cst::{
    Argument, Binary, BinaryOp, Expression, Formatted, LiteralKind, MethodInvocation, Space,
};

#[derive(Debug, Clone, Copy, Default)]
pub struct EqualsAvoidsNull {
    /// Leave `equalsIgnoreCase` calls alone.
    pub ignore_equals_ignore_case: bool,
}

impl EqualsAvoidsNull {
    pub const NAME: &'static str = "checkstyle.EqualsAvoidsNull";

    pub fn new(ignore_equals_ignore_case: bool) -> Self {
        Self {
            ignore_equals_ignore_case,
        }
    }

    fn is_target(&self, call: &MethodInvocation) -> bool {
        let name_matches = match call.name() {
            "equals" => true,
            "equalsIgnoreCase" => !self.ignore_equals_ignore_case,
            _ => false,
        };
        let literal_argument = matches!(
            call.args.args.as_slice(),
            [Argument { expr: Expression::Literal(lit), .. }] if lit.kind == LiteralKind::String
        );
        let select_not_literal = call.select.as_deref().is_some_and(|s| !s.is_literal());
        name_matches && literal_argument && select_not_literal
    }
}

fn without_whitespace(expr: &Expression) -> String {
    expr.print_trimmed()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect()
}

/// True if `expr` is `select == null`, `null != select` or similar.
fn is_null_check(expr: &Expression, select: &Expression) -> bool {
    let Expression::Binary(check) = expr else {
        return false;
    };
    if !matches!(check.op, BinaryOp::Equal | BinaryOp::NotEqual) {
        return false;
    }
    let other = if check.left.is_null_literal() {
        &check.right
    } else if check.right.is_null_literal() {
        &check.left
    } else {
        return false;
    };
    without_whitespace(other) == without_whitespace(select)
}

/// The `a && b` whose right operand is the call at `cursor`, when `a` checks
/// the call's receiver against null.
fn guarding_null_check<'c>(
    cursor: &Cursor<'c>,
    call: &MethodInvocation,
    select: &Expression,
) -> Option<&'c Binary> {
    let Some(Expression::Binary(and)) = cursor.parent_tree()?.as_expression() else {
        return None;
    };
    (and.op == BinaryOp::And && and.right.id() == call.id && is_null_check(&and.left, select))
        .then_some(and)
}

impl Rule for EqualsAvoidsNull {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn transform_method_invocation(
        &self,
        mut node: MethodInvocation,
        cursor: &Cursor<'_>,
        ctx: &mut RewriteCtx,
    ) -> Transform<Expression> {
        if !self.is_target(&node) {
            return Transform::Keep(node.into());
        }
        let (Some(select), Some(argument)) = (node.select.take(), node.args.args.pop()) else {
            return Transform::Keep(node.into());
        };

        if let Some(and) = guarding_null_check(cursor, &node, &select) {
            ctx.and_then(and.id, Box::new(RemoveNullCheck));
        }

        let receiver = argument.expr.with_prefix(select.prefix().clone());
        node.select = Some(Box::new(receiver));
        node.args.args = vec![Argument::new(select.with_prefix(Space::empty()))];
        Transform::Replace(node.into())
    }
}

/// Replaces `a && b` with `b`. Only ever run scoped to a single `&&`.
#[derive(Debug)]
struct RemoveNullCheck;

impl Rule for RemoveNullCheck {
    fn name(&self) -> &str {
        EqualsAvoidsNull::NAME
    }

    fn transform_binary(
        &self,
        node: Binary,
        _cursor: &Cursor<'_>,
        _ctx: &mut RewriteCtx,
    ) -> Transform<Expression> {
        if node.op != BinaryOp::And {
            return Transform::Keep(node.into());
        }
        let Binary { prefix, right, .. } = node;
        Transform::Replace((*right).with_prefix(prefix))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::fix;

    fn in_method(body: &str) -> String {
        format!("class A {{\n    void f() {{\n        {body}\n    }}\n}}\n")
    }

    fn check(rule: &EqualsAvoidsNull, before: &str, after: &str) {
        assert_eq!(fix(rule, &in_method(before)), in_method(after));
    }

    #[test]
    fn swaps_receiver_and_literal() {
        let rule = EqualsAvoidsNull::default();
        check(&rule, "x.equals(\"a\");", "\"a\".equals(x);");
        check(
            &rule,
            "if (obj.name.equals(\"a\")) {}",
            "if (\"a\".equals(obj.name)) {}",
        );
        check(
            &rule,
            "return x.equalsIgnoreCase( \"a\" );",
            "return \"a\".equalsIgnoreCase(x);",
        );
    }

    #[test]
    fn literal_receiver_is_unchanged() {
        let rule = EqualsAvoidsNull::default();
        check(&rule, "\"a\".equals(x);", "\"a\".equals(x);");
    }

    #[test]
    fn only_string_literal_arguments() {
        let rule = EqualsAvoidsNull::default();
        for body in ["x.equals(1);", "x.equals(y);", "x.equals(\"a\", b);", "equals(\"a\");"] {
            check(&rule, body, body);
        }
    }

    #[test]
    fn ignore_equals_ignore_case() {
        let rule = EqualsAvoidsNull::new(true);
        check(
            &rule,
            "x.equalsIgnoreCase(\"a\");",
            "x.equalsIgnoreCase(\"a\");",
        );
        check(&rule, "x.equals(\"a\");", "\"a\".equals(x);");
    }

    #[test]
    fn removes_null_check() {
        let rule = EqualsAvoidsNull::default();
        check(
            &rule,
            "boolean b = x != null && x.equals(\"a\");",
            "boolean b = \"a\".equals(x);",
        );
        check(
            &rule,
            "if (null != x && x.equals(\"a\")) {}",
            "if (\"a\".equals(x)) {}",
        );
        check(
            &rule,
            "if (s.t == null && s . t.equals(\"a\")) {}",
            "if (\"a\".equals(s . t)) {}",
        );
    }

    #[test]
    fn unwraps_parentheses_left_behind() {
        let rule = EqualsAvoidsNull::default();
        check(
            &rule,
            "boolean b = (x != null && x.equals(\"a\"));",
            "boolean b = \"a\".equals(x);",
        );
        check(
            &rule,
            "boolean b = flag || (x != null && x.equals(\"a\"));",
            "boolean b = flag || \"a\".equals(x);",
        );
    }

    #[test]
    fn keeps_unrelated_null_checks() {
        let rule = EqualsAvoidsNull::default();
        check(
            &rule,
            "boolean b = y != null && x.equals(\"a\");",
            "boolean b = y != null && \"a\".equals(x);",
        );
        check(
            &rule,
            "boolean b = x.equals(\"a\") && x != null;",
            "boolean b = \"a\".equals(x) && x != null;",
        );
    }

    #[test]
    fn follow_up_is_limited_to_its_own_and() {
        let rule = EqualsAvoidsNull::default();
        check(
            &rule,
            "boolean b = (x != null && x.equals(\"a\")) || (x != null && x.isEmpty());",
            "boolean b = \"a\".equals(x) || (x != null && x.isEmpty());",
        );
    }
}
