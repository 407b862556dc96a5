//! Placement of closing braces and of the keywords that follow them.
//!
//! Two independent checks share one configuration:
//!
//! - the `}` ending the body of a configured construct is moved onto its own
//!   line at the indentation of the line the construct starts on;
//! - `else`, `catch` and `finally` are either joined to the preceding `}`
//!   (`SAME`) or moved onto their own line (`ALONE`, `ALONE_OR_SINGLELINE`).

use std::collections::BTreeSet;

use tugstyle_cst::visitor::{Cursor, RewriteCtx, Rule, Transform, Tree};
use tugstyle_cst::{Block, Catch, Codegen, Else, Finally, Formatted, Space, Statement};

use crate::policy::{RightCurlyPolicy, Token};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RightCurly {
    pub option: RightCurlyPolicy,
    pub tokens: BTreeSet<Token>,
}

impl Default for RightCurly {
    fn default() -> Self {
        Self {
            option: RightCurlyPolicy::default(),
            tokens: Token::all(),
        }
    }
}

/// True if the block, printed without its prefix, covers more than one line.
fn spans_multiple_lines(block: &Block) -> bool {
    block
        .to_source()
        .get(block.prefix.as_str().len()..)
        .is_some_and(|text| text.contains('\n'))
}

fn has_comment(space: &Space) -> bool {
    !space.as_str().trim().is_empty()
}

impl RightCurly {
    pub const NAME: &'static str = "checkstyle.RightCurly";

    pub fn new(option: RightCurlyPolicy, tokens: BTreeSet<Token>) -> Self {
        Self { option, tokens }
    }

    fn any_token_matches(&self, cursor: &Cursor<'_>) -> bool {
        self.tokens.iter().any(|token| token.matches(cursor))
    }

    /// Whether the closing brace of the block at `cursor` is checked at all.
    fn checks_block(&self, cursor: &Cursor<'_>) -> bool {
        let Some(parent) = cursor.parent() else {
            return false;
        };
        let in_scope = self.any_token_matches(cursor)
            || (self.option != RightCurlyPolicy::AloneOrSingleline
                && self.any_token_matches(parent))
            || parent.tree().is_block();
        in_scope && parent.first_enclosing(Tree::is_block).is_some()
    }

    fn block_satisfied(&self, original: &Block) -> bool {
        original.end.contains_newline()
            || (self.option != RightCurlyPolicy::Alone && !spans_multiple_lines(original))
    }

    fn keyword_satisfied(&self, prefix: &Space) -> bool {
        (self.option == RightCurlyPolicy::Same) != prefix.contains_newline()
    }

    /// New prefix for an `else`, `catch` or `finally` keyword whose owning
    /// statement is at `cursor`'s parent. `None` leaves the keyword alone.
    fn place_keyword(
        &self,
        prefix: &Space,
        cursor: &Cursor<'_>,
        ctx: &RewriteCtx,
    ) -> Option<Space> {
        if self.keyword_satisfied(prefix) {
            return None;
        }
        match self.option {
            // Joining the lines would swallow the comment.
            RightCurlyPolicy::Same if has_comment(prefix) => None,
            RightCurlyPolicy::Same => Some(Space::single()),
            RightCurlyPolicy::Alone | RightCurlyPolicy::AloneOrSingleline => {
                let owner = cursor.parent()?;
                let indent = ctx.formatter().line_indent(owner);
                Some(ctx.formatter().reindent(prefix, &indent))
            }
        }
    }
}

impl Rule for RightCurly {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn transform_block(
        &self,
        mut node: Block,
        cursor: &Cursor<'_>,
        ctx: &mut RewriteCtx,
    ) -> Transform<Block> {
        let Some(original) = cursor.tree().as_block() else {
            return Transform::Keep(node);
        };
        if !self.checks_block(cursor) || self.block_satisfied(original) {
            return Transform::Keep(node);
        }
        let Some(parent) = cursor.parent() else {
            return Transform::Keep(node);
        };

        // A nested block starts its own line; any other block opens on the
        // line of the statement that owns it.
        let owner = if parent.tree().is_block() { cursor } else { parent };
        let formatter = ctx.formatter();
        let indent = formatter.line_indent(owner);
        node.end = formatter.reindent(&node.end, &indent);

        if node.statements.len() == 1 {
            let deeper = formatter.deeper(&indent);
            node.statements = node
                .statements
                .into_iter()
                .map(|stmt| {
                    let prefix = formatter.reindent(stmt.prefix(), &deeper);
                    stmt.with_prefix(prefix)
                })
                .collect();
        }
        Transform::Replace(node)
    }

    fn transform_else_clause(
        &self,
        mut node: Else,
        cursor: &Cursor<'_>,
        ctx: &mut RewriteCtx,
    ) -> Transform<Else> {
        if !self.tokens.contains(&Token::LiteralElse) {
            return Transform::Keep(node);
        }
        // Only an `else` that follows a closing brace.
        let follows_brace = matches!(
            cursor.parent_tree(),
            Some(Tree::If(parent)) if matches!(*parent.then_part, Statement::Block(_))
        );
        if !follows_brace {
            return Transform::Keep(node);
        }
        match self.place_keyword(&node.prefix, cursor, ctx) {
            Some(prefix) => {
                node.prefix = prefix;
                Transform::Replace(node)
            }
            None => Transform::Keep(node),
        }
    }

    fn transform_catch_clause(
        &self,
        mut node: Catch,
        cursor: &Cursor<'_>,
        ctx: &mut RewriteCtx,
    ) -> Transform<Catch> {
        if !self.tokens.contains(&Token::LiteralCatch) {
            return Transform::Keep(node);
        }
        match self.place_keyword(&node.prefix, cursor, ctx) {
            Some(prefix) => {
                node.prefix = prefix;
                Transform::Replace(node)
            }
            None => Transform::Keep(node),
        }
    }

    fn transform_finally_clause(
        &self,
        mut node: Finally,
        cursor: &Cursor<'_>,
        ctx: &mut RewriteCtx,
    ) -> Transform<Finally> {
        if !self.tokens.contains(&Token::LiteralFinally) {
            return Transform::Keep(node);
        }
        match self.place_keyword(&node.prefix, cursor, ctx) {
            Some(prefix) => {
                node.prefix = prefix;
                Transform::Replace(node)
            }
            None => Transform::Keep(node),
        }
    }
}
