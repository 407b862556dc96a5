// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Declaration and statement nodes.
//!
//! Class bodies are [`Block`]s whose statements are member declarations, the
//! same way method bodies are blocks of statements. This keeps "the block that
//! encloses this node" a single query regardless of nesting.

use super::codegen::{Codegen, CodegenState};
use super::expression::{Expression, Name, RawText, TypeName};
use super::traits::{impl_formatted, Formatted, NodeId, Space};

// ============================================================================
// Compilation unit
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilationUnit {
    pub id: NodeId,
    /// Package and import declarations are kept as [`Unknown`] statements.
    pub statements: Vec<Statement>,
    /// Whitespace and comments before end of file.
    pub eof: Space,
    /// Number of ids handed out so far; new nodes continue from here.
    pub node_count: u32,
}

impl CompilationUnit {
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Top-level class declarations.
    pub fn classes(&self) -> impl Iterator<Item = &ClassDecl> {
        self.statements.iter().filter_map(|s| match s {
            Statement::Class(c) => Some(c),
            _ => None,
        })
    }
}

// ============================================================================
// Modifiers and annotations
// ============================================================================

/// An annotation such as `@Override` or `@SuppressWarnings("unchecked")`,
/// kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotation {
    pub id: NodeId,
    pub prefix: Space,
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModifierKind {
    Public,
    Protected,
    Private,
    Static,
    Final,
    Abstract,
    Native,
    Synchronized,
    Transient,
    Volatile,
    Strictfp,
    Default,
    Sealed,
}

impl ModifierKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModifierKind::Public => "public",
            ModifierKind::Protected => "protected",
            ModifierKind::Private => "private",
            ModifierKind::Static => "static",
            ModifierKind::Final => "final",
            ModifierKind::Abstract => "abstract",
            ModifierKind::Native => "native",
            ModifierKind::Synchronized => "synchronized",
            ModifierKind::Transient => "transient",
            ModifierKind::Volatile => "volatile",
            ModifierKind::Strictfp => "strictfp",
            ModifierKind::Default => "default",
            ModifierKind::Sealed => "sealed",
        }
    }

    pub fn from_keyword(word: &str) -> Option<Self> {
        Some(match word {
            "public" => ModifierKind::Public,
            "protected" => ModifierKind::Protected,
            "private" => ModifierKind::Private,
            "static" => ModifierKind::Static,
            "final" => ModifierKind::Final,
            "abstract" => ModifierKind::Abstract,
            "native" => ModifierKind::Native,
            "synchronized" => ModifierKind::Synchronized,
            "transient" => ModifierKind::Transient,
            "volatile" => ModifierKind::Volatile,
            "strictfp" => ModifierKind::Strictfp,
            "default" => ModifierKind::Default,
            "sealed" => ModifierKind::Sealed,
            _ => return None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Modifier {
    pub id: NodeId,
    /// Annotations written between the previous modifier and this one.
    pub annotations: Vec<Annotation>,
    pub prefix: Space,
    pub kind: ModifierKind,
}

impl Modifier {
    pub fn new(id: NodeId, prefix: Space, kind: ModifierKind) -> Self {
        Self {
            id,
            annotations: Vec::new(),
            prefix,
            kind,
        }
    }
}

fn has_modifier(modifiers: &[Modifier], kind: ModifierKind) -> bool {
    modifiers.iter().any(|m| m.kind == kind)
}

// ============================================================================
// Declarations
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClassKind {
    Class,
    Interface,
    Enum,
    Record,
    Annotation,
}

impl ClassKind {
    pub fn keyword(&self) -> &'static str {
        match self {
            ClassKind::Class => "class",
            ClassKind::Interface => "interface",
            ClassKind::Enum => "enum",
            ClassKind::Record => "record",
            ClassKind::Annotation => "@interface",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassDecl {
    pub id: NodeId,
    pub prefix: Space,
    pub annotations: Vec<Annotation>,
    pub modifiers: Vec<Modifier>,
    /// Annotations after the last modifier, as in `public @Deprecated Foo()`.
    pub trailing_annotations: Vec<Annotation>,
    /// Whitespace before the `class` (or `interface`, ...) keyword.
    pub kind_prefix: Space,
    pub kind: ClassKind,
    pub name: Name,
    /// Type parameters, record components, `extends` and `implements`.
    pub header: Option<RawText>,
    pub body: Block,
}

impl ClassDecl {
    pub fn has_modifier(&self, kind: ModifierKind) -> bool {
        has_modifier(&self.modifiers, kind)
    }

    pub fn methods(&self) -> impl Iterator<Item = &MethodDecl> {
        self.body.statements.iter().filter_map(|s| match s {
            Statement::Method(m) => Some(m),
            _ => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDecl {
    pub id: NodeId,
    pub prefix: Space,
    pub annotations: Vec<Annotation>,
    pub modifiers: Vec<Modifier>,
    /// Annotations after the last modifier, as in `public @Deprecated Foo()`.
    pub trailing_annotations: Vec<Annotation>,
    pub type_parameters: Option<RawText>,
    /// Absent for constructors.
    pub return_type: Option<TypeName>,
    pub name: Name,
    /// The parenthesized parameter list, verbatim.
    pub parameters: RawText,
    pub throws: Option<RawText>,
    pub body: MethodBody,
}

impl MethodDecl {
    pub fn is_constructor(&self) -> bool {
        self.return_type.is_none()
    }

    pub fn has_modifier(&self, kind: ModifierKind) -> bool {
        has_modifier(&self.modifiers, kind)
    }
}

#[allow(clippy::large_enum_variant)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MethodBody {
    Block(Block),
    /// Abstract or native method; the whitespace before `;`.
    Semicolon(Space),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableDecl {
    pub id: NodeId,
    pub prefix: Space,
    pub annotations: Vec<Annotation>,
    pub modifiers: Vec<Modifier>,
    /// Annotations after the last modifier, as in `public @Deprecated Foo()`.
    pub trailing_annotations: Vec<Annotation>,
    pub type_name: TypeName,
    pub declarators: Vec<Declarator>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declarator {
    pub id: NodeId,
    pub prefix: Space,
    pub name: String,
    pub initializer: Option<VariableInit>,
    /// Whitespace before the following `,` or `;`.
    pub after: Space,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableInit {
    /// Whitespace before `=`.
    pub eq: Space,
    pub value: Expression,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticInit {
    pub id: NodeId,
    pub prefix: Space,
    pub body: Block,
}

// ============================================================================
// Statements
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub id: NodeId,
    pub prefix: Space,
    pub statements: Vec<Statement>,
    /// Whitespace before the closing `}`.
    pub end: Space,
}

/// The parenthesized condition of `if` and `while`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlParens {
    pub prefix: Space,
    pub expr: Expression,
    pub close: Space,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct If {
    pub id: NodeId,
    pub prefix: Space,
    pub condition: ControlParens,
    pub then_part: Box<Statement>,
    pub else_part: Option<Else>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Else {
    pub id: NodeId,
    /// Whitespace before the `else` keyword.
    pub prefix: Space,
    pub body: Box<Statement>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Try {
    pub id: NodeId,
    pub prefix: Space,
    /// try-with-resources resource list, verbatim.
    pub resources: Option<RawText>,
    pub body: Block,
    pub catches: Vec<Catch>,
    pub finally: Option<Finally>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catch {
    pub id: NodeId,
    /// Whitespace before the `catch` keyword.
    pub prefix: Space,
    /// The parenthesized exception parameter, verbatim.
    pub parameter: RawText,
    pub body: Block,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finally {
    pub id: NodeId,
    /// Whitespace before the `finally` keyword.
    pub prefix: Space,
    pub body: Block,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct While {
    pub id: NodeId,
    pub prefix: Space,
    pub condition: ControlParens,
    pub body: Box<Statement>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct For {
    pub id: NodeId,
    pub prefix: Space,
    /// The parenthesized loop control, verbatim.
    pub control: RawText,
    pub body: Box<Statement>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Return {
    pub id: NodeId,
    pub prefix: Space,
    pub value: Option<Expression>,
    pub semicolon: Space,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Throw {
    pub id: NodeId,
    pub prefix: Space,
    pub value: Expression,
    pub semicolon: Space,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpressionStatement {
    pub id: NodeId,
    pub prefix: Space,
    pub expr: Expression,
    pub semicolon: Space,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Empty {
    pub id: NodeId,
    pub prefix: Space,
}

/// Source the parser keeps verbatim: package and import declarations, and
/// statements or members it does not model (`switch`, `do`, lambdas, ...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unknown {
    pub id: NodeId,
    pub prefix: Space,
    pub text: String,
}

#[allow(clippy::large_enum_variant)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    Class(ClassDecl),
    Method(MethodDecl),
    Variable(VariableDecl),
    StaticInit(StaticInit),
    Block(Block),
    If(If),
    Try(Try),
    While(While),
    For(For),
    Return(Return),
    Throw(Throw),
    Expression(ExpressionStatement),
    Empty(Empty),
    Unknown(Unknown),
}

impl_formatted!(
    Annotation,
    Modifier,
    ClassDecl,
    MethodDecl,
    VariableDecl,
    Declarator,
    StaticInit,
    Block,
    If,
    Else,
    Try,
    Catch,
    Finally,
    While,
    For,
    Return,
    Throw,
    ExpressionStatement,
    Empty,
    Unknown,
);

macro_rules! for_each_statement {
    ($stmt:expr, $node:ident => $body:expr) => {
        match $stmt {
            Statement::Class($node) => $body,
            Statement::Method($node) => $body,
            Statement::Variable($node) => $body,
            Statement::StaticInit($node) => $body,
            Statement::Block($node) => $body,
            Statement::If($node) => $body,
            Statement::Try($node) => $body,
            Statement::While($node) => $body,
            Statement::For($node) => $body,
            Statement::Return($node) => $body,
            Statement::Throw($node) => $body,
            Statement::Expression($node) => $body,
            Statement::Empty($node) => $body,
            Statement::Unknown($node) => $body,
        }
    };
}

impl Formatted for Statement {
    fn id(&self) -> NodeId {
        for_each_statement!(self, node => node.id)
    }

    fn prefix(&self) -> &Space {
        for_each_statement!(self, node => &node.prefix)
    }

    fn with_prefix(self, prefix: Space) -> Self {
        for_each_statement!(self, node => Statement::from(node.with_prefix(prefix)))
    }
}

macro_rules! impl_into_statement {
    ($($variant:ident($node:ident)),* $(,)?) => {
        $(
            impl From<$node> for Statement {
                fn from(node: $node) -> Self {
                    Statement::$variant(node)
                }
            }
        )*
    };
}

impl_into_statement!(
    Class(ClassDecl),
    Method(MethodDecl),
    Variable(VariableDecl),
    StaticInit(StaticInit),
    Block(Block),
    If(If),
    Try(Try),
    While(While),
    For(For),
    Return(Return),
    Throw(Throw),
    Expression(ExpressionStatement),
    Empty(Empty),
    Unknown(Unknown),
);

// ============================================================================
// Codegen
// ============================================================================

impl Codegen for CompilationUnit {
    fn codegen(&self, state: &mut CodegenState) {
        self.statements.codegen(state);
        state.add_space(&self.eof);
    }
}

impl Codegen for Annotation {
    fn codegen(&self, state: &mut CodegenState) {
        state.add_space(&self.prefix);
        state.add_token(&self.text);
    }
}

impl Codegen for Modifier {
    fn codegen(&self, state: &mut CodegenState) {
        self.annotations.codegen(state);
        state.add_space(&self.prefix);
        state.add_token(self.kind.as_str());
    }
}

impl Codegen for ClassDecl {
    fn codegen(&self, state: &mut CodegenState) {
        state.add_space(&self.prefix);
        self.annotations.codegen(state);
        self.modifiers.codegen(state);
        self.trailing_annotations.codegen(state);
        state.add_space(&self.kind_prefix);
        state.add_token(self.kind.keyword());
        self.name.codegen(state);
        self.header.codegen(state);
        self.body.codegen(state);
    }
}

impl Codegen for MethodDecl {
    fn codegen(&self, state: &mut CodegenState) {
        state.add_space(&self.prefix);
        self.annotations.codegen(state);
        self.modifiers.codegen(state);
        self.trailing_annotations.codegen(state);
        self.type_parameters.codegen(state);
        self.return_type.codegen(state);
        self.name.codegen(state);
        self.parameters.codegen(state);
        self.throws.codegen(state);
        match &self.body {
            MethodBody::Block(block) => block.codegen(state),
            MethodBody::Semicolon(space) => {
                state.add_space(space);
                state.add_token(";");
            }
        }
    }
}

impl Codegen for VariableDecl {
    fn codegen(&self, state: &mut CodegenState) {
        state.add_space(&self.prefix);
        self.annotations.codegen(state);
        self.modifiers.codegen(state);
        self.trailing_annotations.codegen(state);
        self.type_name.codegen(state);
        let len = self.declarators.len();
        for (i, declarator) in self.declarators.iter().enumerate() {
            declarator.codegen(state);
            state.add_token(if i + 1 < len { "," } else { ";" });
        }
    }
}

impl Codegen for Declarator {
    fn codegen(&self, state: &mut CodegenState) {
        state.add_space(&self.prefix);
        state.add_token(&self.name);
        if let Some(init) = &self.initializer {
            state.add_space(&init.eq);
            state.add_token("=");
            init.value.codegen(state);
        }
        state.add_space(&self.after);
    }
}

impl Codegen for StaticInit {
    fn codegen(&self, state: &mut CodegenState) {
        state.add_space(&self.prefix);
        state.add_token("static");
        self.body.codegen(state);
    }
}

impl Codegen for Block {
    fn codegen(&self, state: &mut CodegenState) {
        state.add_space(&self.prefix);
        state.add_token("{");
        self.statements.codegen(state);
        state.add_space(&self.end);
        state.add_token("}");
    }
}

impl Codegen for ControlParens {
    fn codegen(&self, state: &mut CodegenState) {
        state.add_space(&self.prefix);
        state.add_token("(");
        self.expr.codegen(state);
        state.add_space(&self.close);
        state.add_token(")");
    }
}

impl Codegen for If {
    fn codegen(&self, state: &mut CodegenState) {
        state.add_space(&self.prefix);
        state.add_token("if");
        self.condition.codegen(state);
        self.then_part.codegen(state);
        self.else_part.codegen(state);
    }
}

impl Codegen for Else {
    fn codegen(&self, state: &mut CodegenState) {
        state.add_space(&self.prefix);
        state.add_token("else");
        self.body.codegen(state);
    }
}

impl Codegen for Try {
    fn codegen(&self, state: &mut CodegenState) {
        state.add_space(&self.prefix);
        state.add_token("try");
        self.resources.codegen(state);
        self.body.codegen(state);
        self.catches.codegen(state);
        self.finally.codegen(state);
    }
}

impl Codegen for Catch {
    fn codegen(&self, state: &mut CodegenState) {
        state.add_space(&self.prefix);
        state.add_token("catch");
        self.parameter.codegen(state);
        self.body.codegen(state);
    }
}

impl Codegen for Finally {
    fn codegen(&self, state: &mut CodegenState) {
        state.add_space(&self.prefix);
        state.add_token("finally");
        self.body.codegen(state);
    }
}

impl Codegen for While {
    fn codegen(&self, state: &mut CodegenState) {
        state.add_space(&self.prefix);
        state.add_token("while");
        self.condition.codegen(state);
        self.body.codegen(state);
    }
}

impl Codegen for For {
    fn codegen(&self, state: &mut CodegenState) {
        state.add_space(&self.prefix);
        state.add_token("for");
        self.control.codegen(state);
        self.body.codegen(state);
    }
}

impl Codegen for Return {
    fn codegen(&self, state: &mut CodegenState) {
        state.add_space(&self.prefix);
        state.add_token("return");
        self.value.codegen(state);
        state.add_space(&self.semicolon);
        state.add_token(";");
    }
}

impl Codegen for Throw {
    fn codegen(&self, state: &mut CodegenState) {
        state.add_space(&self.prefix);
        state.add_token("throw");
        self.value.codegen(state);
        state.add_space(&self.semicolon);
        state.add_token(";");
    }
}

impl Codegen for ExpressionStatement {
    fn codegen(&self, state: &mut CodegenState) {
        state.add_space(&self.prefix);
        self.expr.codegen(state);
        state.add_space(&self.semicolon);
        state.add_token(";");
    }
}

impl Codegen for Empty {
    fn codegen(&self, state: &mut CodegenState) {
        state.add_space(&self.prefix);
        state.add_token(";");
    }
}

impl Codegen for Unknown {
    fn codegen(&self, state: &mut CodegenState) {
        state.add_space(&self.prefix);
        state.add_token(&self.text);
    }
}

impl Codegen for Statement {
    fn codegen(&self, state: &mut CodegenState) {
        for_each_statement!(self, node => node.codegen(state))
    }
}
