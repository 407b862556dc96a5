// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Bottom-up rewriting of Java CSTs.
//!
//! A [`Rule`] overrides `transform_*` methods for the node kinds it cares
//! about. [`apply_rule`] walks the tree once with the rule, then drains the
//! follow-ups the rule queued with [`RewriteCtx::and_then`], one scoped pass
//! per follow-up.
//!
//! ```ignore
//! use tugstyle_cst::visitor::{Cursor, Rule, RewriteCtx, Transform};
//! use tugstyle_cst::{Expression, Literal};
//!
//! #[derive(Debug)]
//! struct Shout;
//!
//! impl Rule for Shout {
//!     fn name(&self) -> &str {
//!         "shout"
//!     }
//!
//!     fn transform_literal(
//!         &self,
//!         mut node: Literal,
//!         _cursor: &Cursor<'_>,
//!         _ctx: &mut RewriteCtx,
//!     ) -> Transform<Expression> {
//!         if node.value == "\"hi\"" {
//!             node.value = "\"HI\"".to_string();
//!             return Transform::Replace(node.into());
//!         }
//!         Transform::Keep(node.into())
//!     }
//! }
//! ```

mod context;
mod cursor;
mod dispatch;
mod format;
mod traits;

pub use context::{FollowUp, RewriteCtx};
pub use cursor::{Cursor, Tree};
pub use dispatch::*;
pub use format::Formatter;
pub use traits::{Rule, Transform};

use crate::nodes::CompilationUnit;

/// Runs `rule` over `unit`, followed by every follow-up it queues.
///
/// Returns the rewritten tree and whether the rule or any of its follow-ups
/// changed something. New ids continue from `unit.node_count`, and the
/// returned tree's `node_count` accounts for them.
pub fn apply_rule(
    unit: CompilationUnit,
    rule: &dyn Rule,
    ctx: &mut RewriteCtx,
) -> (CompilationUnit, bool) {
    ctx.begin_pass(None);
    let mut unit = walk_compilation_unit(rule, &unit, ctx);
    let mut changed = ctx.take_changed();

    while let Some(follow_up) = ctx.next_follow_up() {
        ctx.begin_pass(Some(follow_up.scope));
        unit = walk_compilation_unit(follow_up.rule.as_ref(), &unit, ctx);
        changed |= ctx.take_changed();
    }
    ctx.begin_pass(None);

    unit.node_count = unit.node_count.max(ctx.id_count());
    (unit, changed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nodes::{
        Binary, BinaryOp, Codegen, Expression, Formatted, Identifier, Literal, LiteralKind,
    };
    use crate::parse_compilation_unit;

    /// Rewrites `"old"` to `"new"`.
    #[derive(Debug)]
    struct RenameLiteral;

    impl Rule for RenameLiteral {
        fn name(&self) -> &str {
            "rename-literal"
        }

        fn transform_literal(
            &self,
            mut node: Literal,
            _cursor: &Cursor<'_>,
            _ctx: &mut RewriteCtx,
        ) -> Transform<Expression> {
            if node.value == "\"old\"" {
                node.value = "\"new\"".to_string();
                return Transform::Replace(node.into());
            }
            Transform::Keep(node.into())
        }
    }

    /// Queues a follow-up for every `+` whose left operand is the literal 1.
    #[derive(Debug)]
    struct MarkOnePlus;

    /// Replaces a binary expression with its right operand.
    #[derive(Debug)]
    struct KeepRight;

    impl Rule for MarkOnePlus {
        fn name(&self) -> &str {
            "mark-one-plus"
        }

        fn transform_binary(
            &self,
            node: Binary,
            _cursor: &Cursor<'_>,
            ctx: &mut RewriteCtx,
        ) -> Transform<Expression> {
            if node.op == BinaryOp::Add
                && matches!(node.left.as_ref(), Expression::Literal(l) if l.value == "1")
                && node.right.print_trimmed() == "first"
            {
                ctx.and_then(node.id, Box::new(KeepRight));
            }
            Transform::Keep(node.into())
        }
    }

    impl Rule for KeepRight {
        fn name(&self) -> &str {
            "keep-right"
        }

        fn transform_binary(
            &self,
            node: Binary,
            _cursor: &Cursor<'_>,
            _ctx: &mut RewriteCtx,
        ) -> Transform<Expression> {
            let prefix = node.prefix.clone();
            Transform::Replace(node.right.with_prefix(prefix))
        }
    }

    /// Inserts a fresh `null` literal in place of every `nothing` identifier.
    #[derive(Debug)]
    struct FreshIds;

    impl Rule for FreshIds {
        fn name(&self) -> &str {
            "fresh-ids"
        }

        fn transform_identifier(
            &self,
            node: Identifier,
            _cursor: &Cursor<'_>,
            ctx: &mut RewriteCtx,
        ) -> Transform<Expression> {
            if node.name != "nothing" {
                return Transform::Keep(node.into());
            }
            Transform::Replace(
                Literal {
                    id: ctx.next_id(),
                    prefix: node.prefix,
                    value: "null".to_string(),
                    kind: LiteralKind::Null,
                }
                .into(),
            )
        }
    }

    fn run(source: &str, rule: &dyn Rule) -> (String, bool) {
        let unit = parse_compilation_unit(source).expect("parse");
        let mut ctx = RewriteCtx::new(Formatter::detect(source), unit.node_count);
        let (unit, changed) = apply_rule(unit, rule, &mut ctx);
        (unit.to_source(), changed)
    }

    #[test]
    fn unchanged_tree_prints_identically() {
        let source = "class A {\n    String s = \"x\"; // keep\n}\n";
        assert_eq!(run(source, &RenameLiteral), (source.to_string(), false));
    }

    #[test]
    fn replacement_is_recorded() {
        let (text, changed) = run("class A { String s = \"old\"; }", &RenameLiteral);
        assert!(changed);
        assert_eq!(text, "class A { String s = \"new\"; }");
    }

    #[test]
    fn follow_up_only_touches_scoped_node() {
        // KeepRight would rewrite any sum; only the scoped ones change.
        let source = "class A { int a = 1 + first; int b = 1 + second; int c = (1 + first); }";
        let (text, changed) = run(source, &MarkOnePlus);
        assert!(changed);
        assert_eq!(text, "class A { int a = first; int b = 1 + second; int c = first; }");
    }

    #[test]
    fn minted_ids_extend_node_count() {
        let source = "class A { Object o = nothing; }";
        let unit = parse_compilation_unit(source).expect("parse");
        let before = unit.node_count;
        let mut ctx = RewriteCtx::new(Formatter::default(), before);
        let (unit, changed) = apply_rule(unit, &FreshIds, &mut ctx);
        assert!(changed);
        assert_eq!(unit.node_count, before + 1);
        assert_eq!(unit.to_source(), "class A { Object o = null; }");
    }

    #[test]
    fn prefixes_survive_replacement() {
        let (text, _) = run("class A { int a = 1 +  first; }", &MarkOnePlus);
        assert_eq!(text, "class A { int a = first; }");
    }
}
