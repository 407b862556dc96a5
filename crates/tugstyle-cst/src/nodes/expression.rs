// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Expression nodes.
//!
//! Composite expressions own the whitespace before their first token: the
//! leftmost child of a `Binary`, `FieldAccess`, `MethodInvocation` (with a
//! select), `ArrayAccess`, `Assignment`, `Ternary` or `InstanceOf` always has
//! an empty prefix.

use super::codegen::{Codegen, CodegenState};
use super::statement::Block;
use super::traits::{impl_formatted, Formatted, NodeId, Space};

/// An identifier token embedded in a larger node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Name {
    pub prefix: Space,
    pub value: String,
}

impl Codegen for Name {
    fn codegen(&self, state: &mut CodegenState) {
        state.add_space(&self.prefix);
        state.add_token(&self.value);
    }
}

/// Verbatim source text for constructs the tree does not model in detail
/// (type parameters, parameter lists, `extends` clauses, catch parameters).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawText {
    pub prefix: Space,
    pub text: String,
}

impl Codegen for RawText {
    fn codegen(&self, state: &mut CodegenState) {
        state.add_space(&self.prefix);
        state.add_token(&self.text);
    }
}

/// A type reference such as `String`, `java.util.List<String>` or `int[]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeName {
    pub id: NodeId,
    pub prefix: Space,
    pub text: String,
}

impl Codegen for TypeName {
    fn codegen(&self, state: &mut CodegenState) {
        state.add_space(&self.prefix);
        state.add_token(&self.text);
    }
}

// ============================================================================
// Leaves
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identifier {
    pub id: NodeId,
    pub prefix: Space,
    pub name: String,
}

/// Primitive type of a literal, as far as it can be told from its spelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LiteralKind {
    String,
    Char,
    Int,
    Long,
    Float,
    Double,
    Boolean,
    Null,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Literal {
    pub id: NodeId,
    pub prefix: Space,
    /// Source spelling, including quotes and suffixes.
    pub value: String,
    pub kind: LiteralKind,
}

// ============================================================================
// Selectors and calls
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldAccess {
    pub id: NodeId,
    pub prefix: Space,
    pub target: Box<Expression>,
    /// Whitespace before the `.`.
    pub dot: Space,
    pub name: Name,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodInvocation {
    pub id: NodeId,
    pub prefix: Space,
    pub select: Option<Box<Expression>>,
    /// Whitespace before the `.`; empty when there is no select.
    pub dot: Space,
    pub name: Name,
    pub args: Arguments,
}

impl MethodInvocation {
    pub fn name(&self) -> &str {
        &self.name.value
    }
}

/// A parenthesized, comma-separated argument list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Arguments {
    pub id: NodeId,
    /// Whitespace before the `(`.
    pub prefix: Space,
    pub args: Vec<Argument>,
    /// Whitespace inside an empty argument list.
    pub end: Space,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Argument {
    pub expr: Expression,
    /// Whitespace between the argument and the following `,` or `)`.
    pub after: Space,
}

impl Argument {
    pub fn new(expr: Expression) -> Self {
        Self {
            expr,
            after: Space::empty(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewClass {
    pub id: NodeId,
    pub prefix: Space,
    /// The instantiated type; its prefix is the whitespace after `new`.
    pub clazz: TypeName,
    pub args: Arguments,
    /// Anonymous class body.
    pub body: Option<Block>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArrayAccess {
    pub id: NodeId,
    pub prefix: Space,
    pub indexed: Box<Expression>,
    /// Whitespace before the `[`.
    pub open: Space,
    pub index: Box<Expression>,
    /// Whitespace before the `]`.
    pub close: Space,
}

// ============================================================================
// Operators
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    Not,
    Complement,
    Plus,
    Minus,
    PreIncrement,
    PreDecrement,
    PostIncrement,
    PostDecrement,
}

impl UnaryOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnaryOp::Not => "!",
            UnaryOp::Complement => "~",
            UnaryOp::Plus => "+",
            UnaryOp::Minus => "-",
            UnaryOp::PreIncrement | UnaryOp::PostIncrement => "++",
            UnaryOp::PreDecrement | UnaryOp::PostDecrement => "--",
        }
    }

    pub fn is_postfix(&self) -> bool {
        matches!(self, UnaryOp::PostIncrement | UnaryOp::PostDecrement)
    }

    pub(crate) fn prefix_from_token(tok: &str) -> Option<Self> {
        Some(match tok {
            "!" => UnaryOp::Not,
            "~" => UnaryOp::Complement,
            "+" => UnaryOp::Plus,
            "-" => UnaryOp::Minus,
            "++" => UnaryOp::PreIncrement,
            "--" => UnaryOp::PreDecrement,
            _ => return None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unary {
    pub id: NodeId,
    pub prefix: Space,
    pub op: UnaryOp,
    /// Whitespace before a postfix operator; empty for prefix operators.
    pub op_prefix: Space,
    pub operand: Box<Expression>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Or,
    And,
    BitOr,
    BitXor,
    BitAnd,
    Equal,
    NotEqual,
    Less,
    Greater,
    LessOrEqual,
    GreaterOrEqual,
    ShiftLeft,
    ShiftRight,
    UnsignedShiftRight,
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
}

impl BinaryOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            BinaryOp::Or => "||",
            BinaryOp::And => "&&",
            BinaryOp::BitOr => "|",
            BinaryOp::BitXor => "^",
            BinaryOp::BitAnd => "&",
            BinaryOp::Equal => "==",
            BinaryOp::NotEqual => "!=",
            BinaryOp::Less => "<",
            BinaryOp::Greater => ">",
            BinaryOp::LessOrEqual => "<=",
            BinaryOp::GreaterOrEqual => ">=",
            BinaryOp::ShiftLeft => "<<",
            BinaryOp::ShiftRight => ">>",
            BinaryOp::UnsignedShiftRight => ">>>",
            BinaryOp::Add => "+",
            BinaryOp::Subtract => "-",
            BinaryOp::Multiply => "*",
            BinaryOp::Divide => "/",
            BinaryOp::Modulo => "%",
        }
    }

    /// Binding strength; higher binds tighter. `instanceof` sits at the
    /// relational level (6).
    pub fn precedence(&self) -> u8 {
        match self {
            BinaryOp::Or => 0,
            BinaryOp::And => 1,
            BinaryOp::BitOr => 2,
            BinaryOp::BitXor => 3,
            BinaryOp::BitAnd => 4,
            BinaryOp::Equal | BinaryOp::NotEqual => 5,
            BinaryOp::Less
            | BinaryOp::Greater
            | BinaryOp::LessOrEqual
            | BinaryOp::GreaterOrEqual => 6,
            BinaryOp::ShiftLeft | BinaryOp::ShiftRight | BinaryOp::UnsignedShiftRight => 7,
            BinaryOp::Add | BinaryOp::Subtract => 8,
            BinaryOp::Multiply | BinaryOp::Divide | BinaryOp::Modulo => 9,
        }
    }

    pub(crate) fn from_token(tok: &str) -> Option<Self> {
        Some(match tok {
            "||" => BinaryOp::Or,
            "&&" => BinaryOp::And,
            "|" => BinaryOp::BitOr,
            "^" => BinaryOp::BitXor,
            "&" => BinaryOp::BitAnd,
            "==" => BinaryOp::Equal,
            "!=" => BinaryOp::NotEqual,
            "<" => BinaryOp::Less,
            ">" => BinaryOp::Greater,
            "<=" => BinaryOp::LessOrEqual,
            ">=" => BinaryOp::GreaterOrEqual,
            "<<" => BinaryOp::ShiftLeft,
            ">>" => BinaryOp::ShiftRight,
            ">>>" => BinaryOp::UnsignedShiftRight,
            "+" => BinaryOp::Add,
            "-" => BinaryOp::Subtract,
            "*" => BinaryOp::Multiply,
            "/" => BinaryOp::Divide,
            "%" => BinaryOp::Modulo,
            _ => return None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binary {
    pub id: NodeId,
    pub prefix: Space,
    pub left: Box<Expression>,
    /// Whitespace before the operator.
    pub op_prefix: Space,
    pub op: BinaryOp,
    pub right: Box<Expression>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub id: NodeId,
    pub prefix: Space,
    pub target: Box<Expression>,
    pub op_prefix: Space,
    /// `=` or a compound operator such as `+=`.
    pub operator: String,
    pub value: Box<Expression>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ternary {
    pub id: NodeId,
    pub prefix: Space,
    pub condition: Box<Expression>,
    pub question: Space,
    pub then_part: Box<Expression>,
    pub colon: Space,
    pub else_part: Box<Expression>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceOf {
    pub id: NodeId,
    pub prefix: Space,
    pub expr: Box<Expression>,
    /// Whitespace before `instanceof`.
    pub keyword: Space,
    pub clazz: TypeName,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cast {
    pub id: NodeId,
    pub prefix: Space,
    /// Target type; its prefix is the whitespace after `(`.
    pub clazz: TypeName,
    /// Whitespace before `)`.
    pub close: Space,
    pub expr: Box<Expression>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parens {
    pub id: NodeId,
    pub prefix: Space,
    pub expr: Box<Expression>,
    /// Whitespace before `)`.
    pub close: Space,
}

// ============================================================================
// Expression
// ============================================================================

#[allow(clippy::large_enum_variant)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expression {
    Identifier(Identifier),
    Literal(Literal),
    FieldAccess(FieldAccess),
    MethodInvocation(MethodInvocation),
    NewClass(NewClass),
    ArrayAccess(ArrayAccess),
    Unary(Unary),
    Binary(Binary),
    Assignment(Assignment),
    Ternary(Ternary),
    InstanceOf(InstanceOf),
    Cast(Cast),
    Parens(Parens),
}

impl_formatted!(
    TypeName,
    Identifier,
    Literal,
    FieldAccess,
    MethodInvocation,
    Arguments,
    NewClass,
    ArrayAccess,
    Unary,
    Binary,
    Assignment,
    Ternary,
    InstanceOf,
    Cast,
    Parens,
);

macro_rules! for_each_expression {
    ($expr:expr, $node:ident => $body:expr) => {
        match $expr {
            Expression::Identifier($node) => $body,
            Expression::Literal($node) => $body,
            Expression::FieldAccess($node) => $body,
            Expression::MethodInvocation($node) => $body,
            Expression::NewClass($node) => $body,
            Expression::ArrayAccess($node) => $body,
            Expression::Unary($node) => $body,
            Expression::Binary($node) => $body,
            Expression::Assignment($node) => $body,
            Expression::Ternary($node) => $body,
            Expression::InstanceOf($node) => $body,
            Expression::Cast($node) => $body,
            Expression::Parens($node) => $body,
        }
    };
}

impl Formatted for Expression {
    fn id(&self) -> NodeId {
        for_each_expression!(self, node => node.id)
    }

    fn prefix(&self) -> &Space {
        for_each_expression!(self, node => &node.prefix)
    }

    fn with_prefix(self, prefix: Space) -> Self {
        for_each_expression!(self, node => node.with_prefix(prefix).into())
    }
}

macro_rules! impl_into_expression {
    ($($variant:ident),* $(,)?) => {
        $(
            impl From<$variant> for Expression {
                fn from(node: $variant) -> Self {
                    Expression::$variant(node)
                }
            }
        )*
    };
}

impl_into_expression!(
    Identifier,
    Literal,
    FieldAccess,
    MethodInvocation,
    NewClass,
    ArrayAccess,
    Unary,
    Binary,
    Assignment,
    Ternary,
    InstanceOf,
    Cast,
    Parens,
);

impl Expression {
    /// Expressions that never need parentheses around them.
    pub fn is_primary(&self) -> bool {
        matches!(
            self,
            Expression::Identifier(_)
                | Expression::Literal(_)
                | Expression::FieldAccess(_)
                | Expression::MethodInvocation(_)
                | Expression::NewClass(_)
                | Expression::ArrayAccess(_)
                | Expression::Parens(_)
        )
    }

    pub fn is_literal(&self) -> bool {
        matches!(self, Expression::Literal(_))
    }

    pub fn is_null_literal(&self) -> bool {
        matches!(self, Expression::Literal(lit) if lit.kind == LiteralKind::Null)
    }

    /// Printed text without the leading prefix.
    pub fn print_trimmed(&self) -> String {
        let mut state = CodegenState::default();
        self.codegen(&mut state);
        state.tokens[self.prefix().as_str().len()..].to_string()
    }
}

// ============================================================================
// Codegen
// ============================================================================

impl Codegen for Identifier {
    fn codegen(&self, state: &mut CodegenState) {
        state.add_space(&self.prefix);
        state.add_token(&self.name);
    }
}

impl Codegen for Literal {
    fn codegen(&self, state: &mut CodegenState) {
        state.add_space(&self.prefix);
        state.add_token(&self.value);
    }
}

impl Codegen for FieldAccess {
    fn codegen(&self, state: &mut CodegenState) {
        state.add_space(&self.prefix);
        self.target.codegen(state);
        state.add_space(&self.dot);
        state.add_token(".");
        self.name.codegen(state);
    }
}

impl Codegen for MethodInvocation {
    fn codegen(&self, state: &mut CodegenState) {
        state.add_space(&self.prefix);
        if let Some(select) = &self.select {
            select.codegen(state);
            state.add_space(&self.dot);
            state.add_token(".");
        }
        self.name.codegen(state);
        self.args.codegen(state);
    }
}

impl Codegen for Arguments {
    fn codegen(&self, state: &mut CodegenState) {
        state.add_space(&self.prefix);
        state.add_token("(");
        let len = self.args.len();
        for (i, arg) in self.args.iter().enumerate() {
            arg.expr.codegen(state);
            state.add_space(&arg.after);
            if i + 1 < len {
                state.add_token(",");
            }
        }
        state.add_space(&self.end);
        state.add_token(")");
    }
}

impl Codegen for NewClass {
    fn codegen(&self, state: &mut CodegenState) {
        state.add_space(&self.prefix);
        state.add_token("new");
        self.clazz.codegen(state);
        self.args.codegen(state);
        self.body.codegen(state);
    }
}

impl Codegen for ArrayAccess {
    fn codegen(&self, state: &mut CodegenState) {
        state.add_space(&self.prefix);
        self.indexed.codegen(state);
        state.add_space(&self.open);
        state.add_token("[");
        self.index.codegen(state);
        state.add_space(&self.close);
        state.add_token("]");
    }
}

impl Codegen for Unary {
    fn codegen(&self, state: &mut CodegenState) {
        state.add_space(&self.prefix);
        if self.op.is_postfix() {
            self.operand.codegen(state);
            state.add_space(&self.op_prefix);
            state.add_token(self.op.as_str());
        } else {
            state.add_token(self.op.as_str());
            self.operand.codegen(state);
        }
    }
}

impl Codegen for Binary {
    fn codegen(&self, state: &mut CodegenState) {
        state.add_space(&self.prefix);
        self.left.codegen(state);
        state.add_space(&self.op_prefix);
        state.add_token(self.op.as_str());
        self.right.codegen(state);
    }
}

impl Codegen for Assignment {
    fn codegen(&self, state: &mut CodegenState) {
        state.add_space(&self.prefix);
        self.target.codegen(state);
        state.add_space(&self.op_prefix);
        state.add_token(&self.operator);
        self.value.codegen(state);
    }
}

impl Codegen for Ternary {
    fn codegen(&self, state: &mut CodegenState) {
        state.add_space(&self.prefix);
        self.condition.codegen(state);
        state.add_space(&self.question);
        state.add_token("?");
        self.then_part.codegen(state);
        state.add_space(&self.colon);
        state.add_token(":");
        self.else_part.codegen(state);
    }
}

impl Codegen for InstanceOf {
    fn codegen(&self, state: &mut CodegenState) {
        state.add_space(&self.prefix);
        self.expr.codegen(state);
        state.add_space(&self.keyword);
        state.add_token("instanceof");
        self.clazz.codegen(state);
    }
}

impl Codegen for Cast {
    fn codegen(&self, state: &mut CodegenState) {
        state.add_space(&self.prefix);
        state.add_token("(");
        self.clazz.codegen(state);
        state.add_space(&self.close);
        state.add_token(")");
        self.expr.codegen(state);
    }
}

impl Codegen for Parens {
    fn codegen(&self, state: &mut CodegenState) {
        state.add_space(&self.prefix);
        state.add_token("(");
        self.expr.codegen(state);
        state.add_space(&self.close);
        state.add_token(")");
    }
}

impl Codegen for Expression {
    fn codegen(&self, state: &mut CodegenState) {
        for_each_expression!(self, node => node.codegen(state))
    }
}
