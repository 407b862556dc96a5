// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Walk functions for bottom-up rewriting.
//!
//! Each `walk_*` function takes an ORIGINAL node, pushes a cursor frame for
//! it, walks its children, rebuilds the node from the rewritten children
//! (same id, same formatting) and then offers the rebuilt node to the rule.
//! In a scoped pass the rule is only consulted for the node whose id equals
//! the scope; every other node is rebuilt unchanged.

use super::context::RewriteCtx;
use super::cursor::{Cursor, Tree};
use super::traits::{Rule, Transform};
use crate::nodes::{
    Argument, Arguments, ArrayAccess, Assignment, Binary, Block, Cast, Catch, ClassDecl,
    CompilationUnit, ControlParens, Declarator, Else, Expression, ExpressionStatement,
    FieldAccess, Finally, For, Formatted, If, InstanceOf, MethodBody, MethodDecl,
    MethodInvocation, NewClass, Parens, Return, Statement, StaticInit, Ternary, Throw, Try,
    Unary, VariableDecl, VariableInit, While,
};

/// Offers `node` to the rule if the current pass admits `cursor`.
fn offer<T, U>(
    ctx: &mut RewriteCtx,
    cursor: &Cursor<'_>,
    node: T,
    transform: impl FnOnce(T, &mut RewriteCtx) -> Transform<U>,
) -> U
where
    T: Into<U>,
{
    if !ctx.admits(cursor) {
        return node.into();
    }
    let result = transform(node, ctx);
    ctx.record(result)
}

fn walk_boxed(
    rule: &dyn Rule,
    expr: &Expression,
    parent: &Cursor<'_>,
    ctx: &mut RewriteCtx,
) -> Box<Expression> {
    Box::new(walk_expression(rule, expr, parent, ctx))
}

// ============================================================================
// Declarations
// ============================================================================

pub fn walk_compilation_unit(
    rule: &dyn Rule,
    unit: &CompilationUnit,
    ctx: &mut RewriteCtx,
) -> CompilationUnit {
    let cursor = Cursor::root(Tree::CompilationUnit(unit));
    let statements = unit
        .statements
        .iter()
        .map(|stmt| walk_statement(rule, stmt, &cursor, ctx))
        .collect();
    let node = CompilationUnit {
        id: unit.id,
        statements,
        eof: unit.eof.clone(),
        node_count: unit.node_count,
    };
    offer(ctx, &cursor, node, |n, ctx| {
        rule.transform_compilation_unit(n, &cursor, ctx)
    })
}

pub fn walk_class(
    rule: &dyn Rule,
    class: &ClassDecl,
    parent: &Cursor<'_>,
    ctx: &mut RewriteCtx,
) -> ClassDecl {
    let cursor = parent.child(Tree::Class(class));
    let node = ClassDecl {
        id: class.id,
        prefix: class.prefix.clone(),
        annotations: class.annotations.clone(),
        modifiers: class.modifiers.clone(),
        trailing_annotations: class.trailing_annotations.clone(),
        kind_prefix: class.kind_prefix.clone(),
        kind: class.kind,
        name: class.name.clone(),
        header: class.header.clone(),
        body: walk_block(rule, &class.body, &cursor, ctx),
    };
    offer(ctx, &cursor, node, |n, ctx| rule.transform_class(n, &cursor, ctx))
}

pub fn walk_method(
    rule: &dyn Rule,
    method: &MethodDecl,
    parent: &Cursor<'_>,
    ctx: &mut RewriteCtx,
) -> MethodDecl {
    let cursor = parent.child(Tree::Method(method));
    let body = match &method.body {
        MethodBody::Block(block) => MethodBody::Block(walk_block(rule, block, &cursor, ctx)),
        MethodBody::Semicolon(space) => MethodBody::Semicolon(space.clone()),
    };
    let node = MethodDecl {
        id: method.id,
        prefix: method.prefix.clone(),
        annotations: method.annotations.clone(),
        modifiers: method.modifiers.clone(),
        trailing_annotations: method.trailing_annotations.clone(),
        type_parameters: method.type_parameters.clone(),
        return_type: method.return_type.clone(),
        name: method.name.clone(),
        parameters: method.parameters.clone(),
        throws: method.throws.clone(),
        body,
    };
    offer(ctx, &cursor, node, |n, ctx| rule.transform_method(n, &cursor, ctx))
}

pub fn walk_variable(
    rule: &dyn Rule,
    var: &VariableDecl,
    parent: &Cursor<'_>,
    ctx: &mut RewriteCtx,
) -> VariableDecl {
    let cursor = parent.child(Tree::Variable(var));
    let declarators = var
        .declarators
        .iter()
        .map(|d| Declarator {
            id: d.id,
            prefix: d.prefix.clone(),
            name: d.name.clone(),
            initializer: d.initializer.as_ref().map(|init| VariableInit {
                eq: init.eq.clone(),
                value: walk_expression(rule, &init.value, &cursor, ctx),
            }),
            after: d.after.clone(),
        })
        .collect();
    let node = VariableDecl {
        id: var.id,
        prefix: var.prefix.clone(),
        annotations: var.annotations.clone(),
        modifiers: var.modifiers.clone(),
        trailing_annotations: var.trailing_annotations.clone(),
        type_name: var.type_name.clone(),
        declarators,
    };
    offer(ctx, &cursor, node, |n, ctx| rule.transform_variable(n, &cursor, ctx))
}

pub fn walk_static_init(
    rule: &dyn Rule,
    init: &StaticInit,
    parent: &Cursor<'_>,
    ctx: &mut RewriteCtx,
) -> StaticInit {
    let cursor = parent.child(Tree::StaticInit(init));
    let node = StaticInit {
        id: init.id,
        prefix: init.prefix.clone(),
        body: walk_block(rule, &init.body, &cursor, ctx),
    };
    offer(ctx, &cursor, node, |n, ctx| {
        rule.transform_static_init(n, &cursor, ctx)
    })
}

// ============================================================================
// Statements
// ============================================================================

pub fn walk_block(
    rule: &dyn Rule,
    block: &Block,
    parent: &Cursor<'_>,
    ctx: &mut RewriteCtx,
) -> Block {
    let cursor = parent.child(Tree::Block(block));
    let statements = block
        .statements
        .iter()
        .map(|stmt| walk_statement(rule, stmt, &cursor, ctx))
        .collect();
    let node = Block {
        id: block.id,
        prefix: block.prefix.clone(),
        statements,
        end: block.end.clone(),
    };
    offer(ctx, &cursor, node, |n, ctx| rule.transform_block(n, &cursor, ctx))
}

fn walk_control(
    rule: &dyn Rule,
    control: &ControlParens,
    parent: &Cursor<'_>,
    ctx: &mut RewriteCtx,
) -> ControlParens {
    ControlParens {
        prefix: control.prefix.clone(),
        expr: walk_expression(rule, &control.expr, parent, ctx),
        close: control.close.clone(),
    }
}

pub fn walk_statement(
    rule: &dyn Rule,
    stmt: &Statement,
    parent: &Cursor<'_>,
    ctx: &mut RewriteCtx,
) -> Statement {
    match stmt {
        Statement::Class(node) => Statement::Class(walk_class(rule, node, parent, ctx)),
        Statement::Method(node) => Statement::Method(walk_method(rule, node, parent, ctx)),
        Statement::Variable(node) => Statement::Variable(walk_variable(rule, node, parent, ctx)),
        Statement::StaticInit(node) => {
            Statement::StaticInit(walk_static_init(rule, node, parent, ctx))
        }
        Statement::Block(node) => Statement::Block(walk_block(rule, node, parent, ctx)),
        Statement::If(node) => Statement::If(walk_if(rule, node, parent, ctx)),
        Statement::Try(node) => Statement::Try(walk_try(rule, node, parent, ctx)),
        Statement::While(node) => {
            let cursor = parent.child(Tree::Statement(stmt));
            let rebuilt = While {
                id: node.id,
                prefix: node.prefix.clone(),
                condition: walk_control(rule, &node.condition, &cursor, ctx),
                body: Box::new(walk_statement(rule, &node.body, &cursor, ctx)),
            };
            Statement::While(offer(ctx, &cursor, rebuilt, |n, ctx| {
                rule.transform_while_loop(n, &cursor, ctx)
            }))
        }
        Statement::For(node) => {
            let cursor = parent.child(Tree::Statement(stmt));
            let rebuilt = For {
                id: node.id,
                prefix: node.prefix.clone(),
                control: node.control.clone(),
                body: Box::new(walk_statement(rule, &node.body, &cursor, ctx)),
            };
            Statement::For(offer(ctx, &cursor, rebuilt, |n, ctx| {
                rule.transform_for_loop(n, &cursor, ctx)
            }))
        }
        Statement::Return(node) => {
            let cursor = parent.child(Tree::Statement(stmt));
            let rebuilt = Return {
                id: node.id,
                prefix: node.prefix.clone(),
                value: node
                    .value
                    .as_ref()
                    .map(|value| walk_expression(rule, value, &cursor, ctx)),
                semicolon: node.semicolon.clone(),
            };
            Statement::Return(offer(ctx, &cursor, rebuilt, |n, ctx| {
                rule.transform_return_stmt(n, &cursor, ctx)
            }))
        }
        Statement::Throw(node) => {
            let cursor = parent.child(Tree::Statement(stmt));
            let rebuilt = Throw {
                id: node.id,
                prefix: node.prefix.clone(),
                value: walk_expression(rule, &node.value, &cursor, ctx),
                semicolon: node.semicolon.clone(),
            };
            Statement::Throw(offer(ctx, &cursor, rebuilt, |n, ctx| {
                rule.transform_throw_stmt(n, &cursor, ctx)
            }))
        }
        Statement::Expression(node) => {
            let cursor = parent.child(Tree::Statement(stmt));
            let rebuilt = ExpressionStatement {
                id: node.id,
                prefix: node.prefix.clone(),
                expr: walk_expression(rule, &node.expr, &cursor, ctx),
                semicolon: node.semicolon.clone(),
            };
            Statement::Expression(offer(ctx, &cursor, rebuilt, |n, ctx| {
                rule.transform_expression_statement(n, &cursor, ctx)
            }))
        }
        Statement::Empty(_) | Statement::Unknown(_) => stmt.clone(),
    }
}

pub fn walk_if(rule: &dyn Rule, node: &If, parent: &Cursor<'_>, ctx: &mut RewriteCtx) -> If {
    let cursor = parent.child(Tree::If(node));
    let condition = walk_control(rule, &node.condition, &cursor, ctx);
    let then_part = Box::new(walk_statement(rule, &node.then_part, &cursor, ctx));
    let else_part = node
        .else_part
        .as_ref()
        .map(|else_part| walk_else(rule, else_part, &cursor, ctx));
    let rebuilt = If {
        id: node.id,
        prefix: node.prefix.clone(),
        condition,
        then_part,
        else_part,
    };
    offer(ctx, &cursor, rebuilt, |n, ctx| rule.transform_if_stmt(n, &cursor, ctx))
}

pub fn walk_else(
    rule: &dyn Rule,
    node: &Else,
    parent: &Cursor<'_>,
    ctx: &mut RewriteCtx,
) -> Else {
    let cursor = parent.child(Tree::Else(node));
    let rebuilt = Else {
        id: node.id,
        prefix: node.prefix.clone(),
        body: Box::new(walk_statement(rule, &node.body, &cursor, ctx)),
    };
    offer(ctx, &cursor, rebuilt, |n, ctx| {
        rule.transform_else_clause(n, &cursor, ctx)
    })
}

pub fn walk_try(rule: &dyn Rule, node: &Try, parent: &Cursor<'_>, ctx: &mut RewriteCtx) -> Try {
    let cursor = parent.child(Tree::Try(node));
    let body = walk_block(rule, &node.body, &cursor, ctx);
    let catches = node
        .catches
        .iter()
        .map(|catch| walk_catch(rule, catch, &cursor, ctx))
        .collect();
    let finally = node
        .finally
        .as_ref()
        .map(|finally| walk_finally(rule, finally, &cursor, ctx));
    let rebuilt = Try {
        id: node.id,
        prefix: node.prefix.clone(),
        resources: node.resources.clone(),
        body,
        catches,
        finally,
    };
    offer(ctx, &cursor, rebuilt, |n, ctx| rule.transform_try_stmt(n, &cursor, ctx))
}

pub fn walk_catch(
    rule: &dyn Rule,
    node: &Catch,
    parent: &Cursor<'_>,
    ctx: &mut RewriteCtx,
) -> Catch {
    let cursor = parent.child(Tree::Catch(node));
    let rebuilt = Catch {
        id: node.id,
        prefix: node.prefix.clone(),
        parameter: node.parameter.clone(),
        body: walk_block(rule, &node.body, &cursor, ctx),
    };
    offer(ctx, &cursor, rebuilt, |n, ctx| {
        rule.transform_catch_clause(n, &cursor, ctx)
    })
}

pub fn walk_finally(
    rule: &dyn Rule,
    node: &Finally,
    parent: &Cursor<'_>,
    ctx: &mut RewriteCtx,
) -> Finally {
    let cursor = parent.child(Tree::Finally(node));
    let rebuilt = Finally {
        id: node.id,
        prefix: node.prefix.clone(),
        body: walk_block(rule, &node.body, &cursor, ctx),
    };
    offer(ctx, &cursor, rebuilt, |n, ctx| {
        rule.transform_finally_clause(n, &cursor, ctx)
    })
}

// ============================================================================
// Expressions
// ============================================================================

pub fn walk_arguments(
    rule: &dyn Rule,
    node: &Arguments,
    parent: &Cursor<'_>,
    ctx: &mut RewriteCtx,
) -> Arguments {
    let cursor = parent.child(Tree::Arguments(node));
    let args = node
        .args
        .iter()
        .map(|arg| Argument {
            expr: walk_expression(rule, &arg.expr, &cursor, ctx),
            after: arg.after.clone(),
        })
        .collect();
    let rebuilt = Arguments {
        id: node.id,
        prefix: node.prefix.clone(),
        args,
        end: node.end.clone(),
    };
    offer(ctx, &cursor, rebuilt, |n, ctx| rule.transform_arguments(n, &cursor, ctx))
}

pub fn walk_expression(
    rule: &dyn Rule,
    expr: &Expression,
    parent: &Cursor<'_>,
    ctx: &mut RewriteCtx,
) -> Expression {
    let cursor = parent.child(Tree::Expression(expr));
    let cursor = &cursor;
    match expr {
        Expression::Identifier(node) => offer(ctx, cursor, node.clone(), |n, ctx| {
            rule.transform_identifier(n, cursor, ctx)
        }),
        Expression::Literal(node) => offer(ctx, cursor, node.clone(), |n, ctx| {
            rule.transform_literal(n, cursor, ctx)
        }),
        Expression::FieldAccess(node) => {
            let rebuilt = FieldAccess {
                id: node.id,
                prefix: node.prefix.clone(),
                target: walk_boxed(rule, &node.target, cursor, ctx),
                dot: node.dot.clone(),
                name: node.name.clone(),
            };
            offer(ctx, cursor, rebuilt, |n, ctx| {
                rule.transform_field_access(n, cursor, ctx)
            })
        }
        Expression::MethodInvocation(node) => {
            let select = node
                .select
                .as_ref()
                .map(|select| walk_boxed(rule, select, cursor, ctx));
            let rebuilt = MethodInvocation {
                id: node.id,
                prefix: node.prefix.clone(),
                select,
                dot: node.dot.clone(),
                name: node.name.clone(),
                args: walk_arguments(rule, &node.args, cursor, ctx),
            };
            offer(ctx, cursor, rebuilt, |n, ctx| {
                rule.transform_method_invocation(n, cursor, ctx)
            })
        }
        Expression::NewClass(node) => {
            let args = walk_arguments(rule, &node.args, cursor, ctx);
            let body = node
                .body
                .as_ref()
                .map(|body| walk_block(rule, body, cursor, ctx));
            let rebuilt = NewClass {
                id: node.id,
                prefix: node.prefix.clone(),
                clazz: node.clazz.clone(),
                args,
                body,
            };
            offer(ctx, cursor, rebuilt, |n, ctx| {
                rule.transform_new_class(n, cursor, ctx)
            })
        }
        Expression::ArrayAccess(node) => {
            let rebuilt = ArrayAccess {
                id: node.id,
                prefix: node.prefix.clone(),
                indexed: walk_boxed(rule, &node.indexed, cursor, ctx),
                open: node.open.clone(),
                index: walk_boxed(rule, &node.index, cursor, ctx),
                close: node.close.clone(),
            };
            offer(ctx, cursor, rebuilt, |n, ctx| {
                rule.transform_array_access(n, cursor, ctx)
            })
        }
        Expression::Unary(node) => {
            let rebuilt = Unary {
                id: node.id,
                prefix: node.prefix.clone(),
                op: node.op,
                op_prefix: node.op_prefix.clone(),
                operand: walk_boxed(rule, &node.operand, cursor, ctx),
            };
            offer(ctx, cursor, rebuilt, |n, ctx| rule.transform_unary(n, cursor, ctx))
        }
        Expression::Binary(node) => {
            let left = walk_boxed(rule, &node.left, cursor, ctx);
            let right = walk_boxed(rule, &node.right, cursor, ctx);
            let rebuilt = Binary {
                id: node.id,
                prefix: node.prefix.clone(),
                left,
                op_prefix: node.op_prefix.clone(),
                op: node.op,
                right,
            };
            offer(ctx, cursor, rebuilt, |n, ctx| rule.transform_binary(n, cursor, ctx))
        }
        Expression::Assignment(node) => {
            let target = walk_boxed(rule, &node.target, cursor, ctx);
            let value = walk_boxed(rule, &node.value, cursor, ctx);
            let rebuilt = Assignment {
                id: node.id,
                prefix: node.prefix.clone(),
                target,
                op_prefix: node.op_prefix.clone(),
                operator: node.operator.clone(),
                value,
            };
            offer(ctx, cursor, rebuilt, |n, ctx| {
                rule.transform_assignment(n, cursor, ctx)
            })
        }
        Expression::Ternary(node) => {
            let condition = walk_boxed(rule, &node.condition, cursor, ctx);
            let then_part = walk_boxed(rule, &node.then_part, cursor, ctx);
            let else_part = walk_boxed(rule, &node.else_part, cursor, ctx);
            let rebuilt = Ternary {
                id: node.id,
                prefix: node.prefix.clone(),
                condition,
                question: node.question.clone(),
                then_part,
                colon: node.colon.clone(),
                else_part,
            };
            offer(ctx, cursor, rebuilt, |n, ctx| rule.transform_ternary(n, cursor, ctx))
        }
        Expression::InstanceOf(node) => {
            let rebuilt = InstanceOf {
                id: node.id,
                prefix: node.prefix.clone(),
                expr: walk_boxed(rule, &node.expr, cursor, ctx),
                keyword: node.keyword.clone(),
                clazz: node.clazz.clone(),
            };
            offer(ctx, cursor, rebuilt, |n, ctx| {
                rule.transform_instance_of(n, cursor, ctx)
            })
        }
        Expression::Cast(node) => {
            let rebuilt = Cast {
                id: node.id,
                prefix: node.prefix.clone(),
                clazz: node.clazz.clone(),
                close: node.close.clone(),
                expr: walk_boxed(rule, &node.expr, cursor, ctx),
            };
            offer(ctx, cursor, rebuilt, |n, ctx| rule.transform_cast(n, cursor, ctx))
        }
        Expression::Parens(node) => {
            let inner = walk_expression(rule, &node.expr, cursor, ctx);
            // A scoped follow-up that replaced the parenthesized expression
            // with a primary one leaves the parentheses without purpose.
            if let Some(scope) = ctx.scope() {
                if node.expr.id() == scope && inner.id() != scope && inner.is_primary() {
                    return inner.with_prefix(node.prefix.clone());
                }
            }
            let rebuilt = Parens {
                id: node.id,
                prefix: node.prefix.clone(),
                expr: Box::new(inner),
                close: node.close.clone(),
            };
            offer(ctx, cursor, rebuilt, |n, ctx| rule.transform_parens(n, cursor, ctx))
        }
    }
}
