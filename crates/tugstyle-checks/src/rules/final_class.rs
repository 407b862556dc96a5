//! Marks classes that cannot be subclassed as `final`.
//!
//! A class whose constructors are all private (or that declares none) gains
//! a `final` modifier. Interfaces, enums, records and annotation types are
//! never touched, and neither are abstract or sealed classes.

use tugstyle_cst::visitor::{Cursor, RewriteCtx, Rule, Transform};
use tugstyle_cst::{ClassDecl, ClassKind, Modifier, ModifierKind, Space, Statement};

#[derive(Debug, Clone, Copy, Default)]
pub struct FinalClass;

impl FinalClass {
    pub const NAME: &'static str = "checkstyle.FinalClass";
}

fn has_visible_constructor(class: &ClassDecl) -> bool {
    class
        .methods()
        .any(|m| m.is_constructor() && !m.has_modifier(ModifierKind::Private))
        || class.body.statements.iter().any(|s| match s {
            Statement::Unknown(member) => mentions_call(&member.text, &class.name.value),
            _ => false,
        })
}

/// True if `text` contains `name` as a whole word followed by `(`.
///
/// Members the parser keeps as raw text may be constructors; any such member
/// naming the class keeps it open.
fn mentions_call(text: &str, name: &str) -> bool {
    let is_ident = |c: char| c.is_alphanumeric() || c == '_' || c == '$';
    text.match_indices(name).any(|(at, _)| {
        let before = text[..at].chars().next_back();
        let after = text[at + name.len()..].trim_start();
        !before.is_some_and(is_ident) && after.starts_with('(')
    })
}

impl Rule for FinalClass {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn transform_class(
        &self,
        mut node: ClassDecl,
        _cursor: &Cursor<'_>,
        ctx: &mut RewriteCtx,
    ) -> Transform<ClassDecl> {
        if node.kind != ClassKind::Class
            || node.has_modifier(ModifierKind::Final)
            || node.has_modifier(ModifierKind::Abstract)
            || node.has_modifier(ModifierKind::Sealed)
            || has_visible_constructor(&node)
        {
            return Transform::Keep(node);
        }

        let position = node
            .modifiers
            .iter()
            .rposition(|m| matches!(m.kind, ModifierKind::Public | ModifierKind::Static))
            .map_or(0, |last| last + 1);

        let prefix = if position > 0 {
            Space::single()
        } else if let Some(first) = node.modifiers.first_mut() {
            std::mem::replace(&mut first.prefix, Space::single())
        } else {
            std::mem::replace(&mut node.kind_prefix, Space::single())
        };

        tracing::trace!(class = %node.name.value, position, "adding final modifier");
        node.modifiers.insert(
            position,
            Modifier::new(ctx.next_id(), prefix, ModifierKind::Final),
        );
        Transform::Replace(node)
    }
}
