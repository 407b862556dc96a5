// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Ancestor path from the root to the node being visited.
//!
//! A [`Cursor`] is a stack-allocated frame that borrows its parent frame, so the
//! whole path lives exactly as long as the recursive walk step that built it.
//! Frames always reference the ORIGINAL tree: rules see their surroundings as
//! they were before the current pass rewrote anything.

use crate::nodes::{
    Arguments, Block, Catch, ClassDecl, CompilationUnit, Else, Expression, Finally, Formatted,
    If, MethodDecl, NodeId, Space, Statement, StaticInit, Try, VariableDecl,
};

/// A borrowed reference to any node that can sit on a cursor path.
#[derive(Debug, Clone, Copy)]
pub enum Tree<'a> {
    CompilationUnit(&'a CompilationUnit),
    Class(&'a ClassDecl),
    Method(&'a MethodDecl),
    Variable(&'a VariableDecl),
    StaticInit(&'a StaticInit),
    Block(&'a Block),
    If(&'a If),
    Else(&'a Else),
    Try(&'a Try),
    Catch(&'a Catch),
    Finally(&'a Finally),
    /// Statements without a dedicated variant (`while`, `return`, ...).
    Statement(&'a Statement),
    Expression(&'a Expression),
    Arguments(&'a Arguments),
}

impl<'a> Tree<'a> {
    pub fn id(&self) -> NodeId {
        match self {
            Tree::CompilationUnit(node) => node.id,
            Tree::Class(node) => node.id,
            Tree::Method(node) => node.id,
            Tree::Variable(node) => node.id,
            Tree::StaticInit(node) => node.id,
            Tree::Block(node) => node.id,
            Tree::If(node) => node.id,
            Tree::Else(node) => node.id,
            Tree::Try(node) => node.id,
            Tree::Catch(node) => node.id,
            Tree::Finally(node) => node.id,
            Tree::Statement(node) => node.id(),
            Tree::Expression(node) => node.id(),
            Tree::Arguments(node) => node.id,
        }
    }

    /// Leading whitespace; the compilation unit has none.
    pub fn prefix(&self) -> Option<&'a Space> {
        Some(match *self {
            Tree::CompilationUnit(_) => return None,
            Tree::Class(node) => &node.prefix,
            Tree::Method(node) => &node.prefix,
            Tree::Variable(node) => &node.prefix,
            Tree::StaticInit(node) => &node.prefix,
            Tree::Block(node) => &node.prefix,
            Tree::If(node) => &node.prefix,
            Tree::Else(node) => &node.prefix,
            Tree::Try(node) => &node.prefix,
            Tree::Catch(node) => &node.prefix,
            Tree::Finally(node) => &node.prefix,
            Tree::Statement(node) => node.prefix(),
            Tree::Expression(node) => node.prefix(),
            Tree::Arguments(node) => &node.prefix,
        })
    }

    pub fn is_block(&self) -> bool {
        matches!(self, Tree::Block(_))
    }

    pub fn as_block(&self) -> Option<&'a Block> {
        match *self {
            Tree::Block(block) => Some(block),
            _ => None,
        }
    }

    pub fn as_expression(&self) -> Option<&'a Expression> {
        match *self {
            Tree::Expression(expr) => Some(expr),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Cursor<'c> {
    tree: Tree<'c>,
    parent: Option<&'c Cursor<'c>>,
}

impl<'c> Cursor<'c> {
    pub fn root(tree: Tree<'c>) -> Self {
        Self { tree, parent: None }
    }

    /// A frame for `tree`, one level below this one.
    pub fn child<'b>(&'b self, tree: Tree<'b>) -> Cursor<'b> {
        Cursor {
            tree,
            parent: Some(self),
        }
    }

    pub fn tree(&self) -> Tree<'c> {
        self.tree
    }

    pub fn id(&self) -> NodeId {
        self.tree.id()
    }

    pub fn parent(&self) -> Option<&'c Cursor<'c>> {
        self.parent
    }

    pub fn parent_tree(&self) -> Option<Tree<'c>> {
        self.parent.map(|parent| parent.tree)
    }

    /// This frame followed by each ancestor up to the root.
    pub fn path(&self) -> impl Iterator<Item = &Cursor<'c>> {
        std::iter::successors(Some(self), |cursor| cursor.parent)
    }

    /// Nearest node on the path, starting with this frame, that satisfies
    /// `predicate`.
    pub fn first_enclosing(&self, predicate: impl Fn(&Tree<'c>) -> bool) -> Option<Tree<'c>> {
        self.path()
            .map(|cursor| cursor.tree)
            .find(|tree| predicate(tree))
    }

    /// Nearest block strictly above this frame.
    pub fn enclosing_block(&self) -> Option<&'c Block> {
        self.parent?
            .first_enclosing(Tree::is_block)
            .and_then(|tree| tree.as_block())
    }

    pub fn matches(&self, predicate: impl Fn(&Tree<'c>) -> bool) -> bool {
        predicate(&self.tree)
    }

    /// True if this frame's node is the one identified by `scope`.
    pub fn is_scope(&self, scope: NodeId) -> bool {
        self.id() == scope
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nodes::MethodBody;
    use crate::parse_compilation_unit;

    #[test]
    fn path_queries() {
        let unit = parse_compilation_unit("class A { void f() { if (a) { b(); } } }")
            .expect("parse");
        let class = unit.classes().next().expect("class");
        let method = class.methods().next().expect("method");
        let MethodBody::Block(body) = &method.body else {
            panic!("expected body");
        };
        let Statement::If(if_stmt) = &body.statements[0] else {
            panic!("expected if");
        };
        let Statement::Block(then_block) = if_stmt.then_part.as_ref() else {
            panic!("expected block");
        };

        let root = Cursor::root(Tree::CompilationUnit(&unit));
        let c_class = root.child(Tree::Class(class));
        let c_class_body = c_class.child(Tree::Block(&class.body));
        let c_method = c_class_body.child(Tree::Method(method));
        let c_body = c_method.child(Tree::Block(body));
        let c_if = c_body.child(Tree::If(if_stmt));
        let c_then = c_if.child(Tree::Block(then_block));

        assert_eq!(c_then.id(), then_block.id);
        assert!(c_then.is_scope(then_block.id));
        assert!(!c_then.is_scope(if_stmt.id));
        assert_eq!(c_then.parent_tree().map(|t| t.id()), Some(if_stmt.id));
        assert!(c_then.parent().is_some_and(|p| p.matches(|t| matches!(t, Tree::If(_)))));

        // Inclusive of the starting frame.
        assert_eq!(
            c_then.first_enclosing(Tree::is_block).map(|t| t.id()),
            Some(then_block.id)
        );
        // Strictly above.
        assert_eq!(c_then.enclosing_block().map(|b| b.id), Some(body.id));
        assert_eq!(
            c_then
                .first_enclosing(|t| matches!(t, Tree::Class(_)))
                .map(|t| t.id()),
            Some(class.id)
        );
        assert_eq!(c_then.path().count(), 7);
        assert!(root.enclosing_block().is_none());
    }
}
