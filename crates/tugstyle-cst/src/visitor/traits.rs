// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! The [`Rule`] trait: one `transform_*` method per node kind.

use super::context::RewriteCtx;
use super::cursor::Cursor;
use crate::nodes::{
    Arguments, ArrayAccess, Assignment, Binary, Block, Cast, Catch, ClassDecl, CompilationUnit,
    Else, Expression, ExpressionStatement, FieldAccess, Finally, For, Identifier, If, InstanceOf,
    Literal, MethodDecl, MethodInvocation, NewClass, Parens, Return, StaticInit, Ternary, Throw,
    Try, Unary, VariableDecl, While,
};

/// Outcome of offering a node to a rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transform<T> {
    /// The node is returned as it was offered.
    Keep(T),
    /// The rule changed the node.
    Replace(T),
}

impl<T> Transform<T> {
    pub fn is_replace(&self) -> bool {
        matches!(self, Self::Replace(_))
    }

    pub fn into_inner(self) -> T {
        match self {
            Transform::Keep(t) | Transform::Replace(t) => t,
        }
    }

    /// Maps the inner value, keeping the variant.
    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Transform<U> {
        match self {
            Transform::Keep(t) => Transform::Keep(f(t)),
            Transform::Replace(t) => Transform::Replace(f(t)),
        }
    }
}

impl<T> From<T> for Transform<T> {
    fn from(value: T) -> Self {
        Transform::Keep(value)
    }
}

/// Generates `transform_*` methods whose result has the node's own type.
macro_rules! rule_methods {
    (
        $(
            $(#[$meta:meta])*
            $base_name:ident : $node_type:ty
        ),* $(,)?
    ) => {
        paste::paste! {
            $(
                $(#[$meta])*
                #[doc = concat!("Transform a [`", stringify!($node_type), "`] node.")]
                #[allow(unused_variables)]
                fn [<transform_ $base_name>](
                    &self,
                    node: $node_type,
                    cursor: &Cursor<'_>,
                    ctx: &mut RewriteCtx,
                ) -> Transform<$node_type> {
                    Transform::Keep(node)
                }
            )*
        }
    };
}

/// Generates `transform_*` methods for expression kinds. An expression may be
/// replaced by an expression of a different kind.
macro_rules! rule_expression_methods {
    (
        $(
            $(#[$meta:meta])*
            $base_name:ident : $node_type:ty
        ),* $(,)?
    ) => {
        paste::paste! {
            $(
                $(#[$meta])*
                #[doc = concat!("Transform a [`", stringify!($node_type), "`] expression.")]
                #[allow(unused_variables)]
                fn [<transform_ $base_name>](
                    &self,
                    node: $node_type,
                    cursor: &Cursor<'_>,
                    ctx: &mut RewriteCtx,
                ) -> Transform<Expression> {
                    Transform::Keep(Expression::from(node))
                }
            )*
        }
    };
}

/// A rewrite rule.
///
/// The engine walks the tree bottom-up and offers every node to the rule after
/// the node's children have been rewritten. `node` is that rebuilt node; the
/// `cursor` describes where the ORIGINAL node sat. A rule returns
/// [`Transform::Replace`] only when it changed something, and never fails:
/// shapes it does not recognise are returned with [`Transform::Keep`].
///
/// Configuration is fixed at construction, so methods take `&self`. State that
/// must outlive a single visit (new ids, follow-up passes) goes through
/// [`RewriteCtx`].
pub trait Rule: std::fmt::Debug {
    /// Name reported when the rule changes a tree.
    fn name(&self) -> &str;

    rule_methods! {
        compilation_unit: CompilationUnit,
        class: ClassDecl,
        method: MethodDecl,
        variable: VariableDecl,
        static_init: StaticInit,
        block: Block,
        if_stmt: If,
        else_clause: Else,
        try_stmt: Try,
        catch_clause: Catch,
        finally_clause: Finally,
        while_loop: While,
        for_loop: For,
        return_stmt: Return,
        throw_stmt: Throw,
        expression_statement: ExpressionStatement,
        arguments: Arguments,
    }

    rule_expression_methods! {
        identifier: Identifier,
        literal: Literal,
        field_access: FieldAccess,
        method_invocation: MethodInvocation,
        new_class: NewClass,
        array_access: ArrayAccess,
        unary: Unary,
        binary: Binary,
        assignment: Assignment,
        ternary: Ternary,
        instance_of: InstanceOf,
        cast: Cast,
        parens: Parens,
    }
}
