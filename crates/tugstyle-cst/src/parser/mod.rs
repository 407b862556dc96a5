// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Recursive-descent parser for the Java subset the rewrite rules act on.
//!
//! Constructs the parser does not model (switch statements, lambdas, method
//! references, array initializers, ...) are kept as verbatim [`Unknown`]
//! statements, so any input that tokenizes and has balanced delimiters parses
//! and prints back byte for byte.
//!
//! Whitespace convention: a composite node owns the prefix of its first token,
//! and its first child is left with an empty prefix.

mod errors;

pub use errors::{ParserError, Result, SyntaxError};

use crate::nodes::{
    Annotation, Argument, Arguments, ArrayAccess, Assignment, Binary, BinaryOp, Block, Cast,
    Catch, ClassDecl, ClassKind, CompilationUnit, ControlParens, Declarator, Else, Empty,
    Expression, ExpressionStatement, FieldAccess, Finally, For, Formatted, Identifier, If,
    InstanceOf, Literal, LiteralKind, MethodBody, MethodDecl, MethodInvocation, Modifier,
    ModifierKind, Name, NewClass, NodeId, NodeIdGenerator, Parens, RawText, Return, Space,
    Statement, StaticInit, Ternary, Throw, Try, TypeName, Unary, UnaryOp, Unknown, VariableDecl,
    VariableInit, While,
};
use crate::tokenizer::{TokType, Token};

type PResult<T> = std::result::Result<T, SyntaxError>;

const RESERVED: &[&str] = &[
    "abstract", "assert", "boolean", "break", "byte", "case", "catch", "char", "class", "const",
    "continue", "default", "do", "double", "else", "enum", "extends", "false", "final", "finally",
    "float", "for", "goto", "if", "implements", "import", "instanceof", "int", "interface", "long",
    "native", "new", "null", "package", "private", "protected", "public", "return", "short",
    "static", "strictfp", "super", "switch", "synchronized", "this", "throw", "throws",
    "transient", "true", "try", "void", "volatile", "while",
];

const PRIMITIVES: &[&str] = &[
    "boolean", "byte", "char", "double", "float", "int", "long", "short", "void",
];

/// Tokens after a depth-0 `}` that continue the same unmodelled statement.
const CONTINUES_AFTER_BRACE: &[&str] = &[";", ",", ".", "while", "else", "catch", "finally"];

fn is_reserved(word: &str) -> bool {
    RESERVED.contains(&word)
}

fn is_primitive(word: &str) -> bool {
    PRIMITIVES.contains(&word)
}

fn is_op(tok: &Token<'_>, op: &str) -> bool {
    tok.r#type == TokType::Op && tok.string == op
}

fn space(tok: &Token<'_>) -> Space {
    Space::from(tok.prefix)
}

/// Detaches the prefix of an expression that becomes the first child of a
/// composite node.
fn split_prefix(expr: Expression) -> (Space, Expression) {
    let prefix = expr.prefix().clone();
    (prefix, expr.with_prefix(Space::empty()))
}

fn classify_number(text: &str) -> LiteralKind {
    let lower = text.to_ascii_lowercase();
    let hex = lower.starts_with("0x");
    if lower.ends_with('l') {
        LiteralKind::Long
    } else if hex {
        if lower.contains('p') {
            if lower.ends_with('f') {
                LiteralKind::Float
            } else {
                LiteralKind::Double
            }
        } else {
            LiteralKind::Int
        }
    } else if lower.ends_with('f') {
        LiteralKind::Float
    } else if lower.ends_with('d') || lower.contains('.') || lower.contains('e') {
        LiteralKind::Double
    } else {
        LiteralKind::Int
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DeclContext {
    /// Class body or top level: methods and constructors are allowed.
    Member,
    /// Inside a method body: only local classes and variables.
    Local,
}

#[derive(Debug, Clone, Copy)]
struct Mark {
    pos: usize,
    ids: u32,
}

pub(crate) struct Parser<'t, 'a> {
    text: &'a str,
    tokens: &'t [Token<'a>],
    pos: usize,
    ids: NodeIdGenerator,
}

impl<'t, 'a> Parser<'t, 'a> {
    /// `tokens` must end with the end marker, as produced by
    /// [`crate::tokenizer::tokenize`].
    pub(crate) fn new(text: &'a str, tokens: &'t [Token<'a>]) -> Self {
        Self {
            text,
            tokens,
            pos: 0,
            ids: NodeIdGenerator::new(),
        }
    }

    // ------------------------------------------------------------------------
    // Token access
    // ------------------------------------------------------------------------

    fn peek_nth(&self, n: usize) -> Token<'a> {
        let last = self.tokens.len().saturating_sub(1);
        self.tokens[(self.pos + n).min(last)]
    }

    fn peek(&self) -> Token<'a> {
        self.peek_nth(0)
    }

    fn at_eof(&self) -> bool {
        self.peek().r#type == TokType::EndMarker
    }

    /// True if the next token is the operator or keyword `word`.
    fn at(&self, word: &str) -> bool {
        self.nth_is(0, word)
    }

    fn nth_is(&self, n: usize, word: &str) -> bool {
        let tok = self.peek_nth(n);
        matches!(tok.r#type, TokType::Op | TokType::Identifier) && tok.string == word
    }

    fn at_identifier(&self) -> bool {
        self.peek().r#type == TokType::Identifier
    }

    fn bump(&mut self) -> Token<'a> {
        let tok = self.peek();
        if tok.r#type != TokType::EndMarker {
            self.pos += 1;
        }
        tok
    }

    fn advance(&mut self, n: usize) {
        for _ in 0..n {
            self.bump();
        }
    }

    fn eat(&mut self, word: &str) -> Option<Token<'a>> {
        if self.at(word) {
            Some(self.bump())
        } else {
            None
        }
    }

    fn expect(&mut self, word: &'static str) -> PResult<Token<'a>> {
        self.eat(word).ok_or_else(|| self.error(word))
    }

    fn expect_name(&mut self) -> PResult<Token<'a>> {
        let tok = self.peek();
        if tok.r#type == TokType::Identifier && !is_reserved(tok.string) {
            Ok(self.bump())
        } else {
            Err(self.error("identifier"))
        }
    }

    fn error(&self, expected: &'static str) -> SyntaxError {
        let tok = self.peek();
        SyntaxError {
            expected,
            offset: tok.start,
            found: tok.string.to_string(),
        }
    }

    fn next_id(&mut self) -> NodeId {
        self.ids.next_id()
    }

    fn mark(&self) -> Mark {
        Mark {
            pos: self.pos,
            ids: self.ids.count(),
        }
    }

    fn reset(&mut self, mark: Mark) {
        self.pos = mark.pos;
        self.ids = NodeIdGenerator::starting_at(mark.ids);
    }

    /// Runs `f`, rewinding position and id sequence if it fails.
    fn attempt<T>(&mut self, f: impl FnOnce(&mut Self) -> PResult<T>) -> Option<T> {
        let mark = self.mark();
        match f(self) {
            Ok(value) => Some(value),
            Err(_) => {
                self.reset(mark);
                None
            }
        }
    }

    /// Source text of tokens `from..self.pos`, without the first prefix.
    fn slice_from(&self, from: usize) -> &'a str {
        if from >= self.pos {
            return "";
        }
        &self.text[self.tokens[from].start..self.tokens[self.pos - 1].end()]
    }

    fn raw_from(&self, from: usize) -> RawText {
        RawText {
            prefix: Space::from(self.tokens[from].prefix),
            text: self.slice_from(from).to_string(),
        }
    }

    /// Consumes a bracketed group starting at `open`, returning it verbatim.
    fn group(&mut self, open: &'static str) -> PResult<RawText> {
        let start = self.pos;
        self.expect(open)?;
        let mut depth = 1usize;
        while depth > 0 {
            let tok = self.peek();
            if tok.r#type == TokType::EndMarker {
                return Err(self.error("closing delimiter"));
            }
            self.bump();
            if tok.r#type == TokType::Op {
                match tok.string {
                    "(" | "[" | "{" => depth += 1,
                    ")" | "]" | "}" => depth -= 1,
                    _ => {}
                }
            }
        }
        Ok(self.raw_from(start))
    }

    /// Consumes type arguments or type parameters `<...>`.
    fn angles(&mut self) -> PResult<RawText> {
        let start = self.pos;
        self.expect("<")?;
        let mut depth = 1usize;
        while depth > 0 {
            let tok = self.peek();
            match (tok.r#type, tok.string) {
                (TokType::Op, "<") => depth += 1,
                (TokType::Op, ">") => depth -= 1,
                (TokType::Identifier, _) => {}
                (TokType::Op, "." | "," | "?" | "&" | "[" | "]" | "@") => {}
                _ => return Err(self.error("type argument")),
            }
            self.bump();
        }
        Ok(self.raw_from(start))
    }

    // ------------------------------------------------------------------------
    // Compilation unit and declarations
    // ------------------------------------------------------------------------

    pub(crate) fn compilation_unit(&mut self) -> PResult<CompilationUnit> {
        let id = self.next_id();
        let mut statements = Vec::new();
        while !self.at_eof() {
            statements.push(self.member()?);
        }
        let eof = space(&self.peek());
        Ok(CompilationUnit {
            id,
            statements,
            eof,
            node_count: self.ids.count(),
        })
    }

    /// A top-level declaration or a class body member.
    fn member(&mut self) -> PResult<Statement> {
        if self.at(";") {
            return Ok(self.empty());
        }
        if self.at("{") {
            return Ok(Statement::Block(self.block(Self::statement)?));
        }
        if self.at("static") && self.nth_is(1, "{") {
            let kw = self.bump();
            let id = self.next_id();
            let body = self.block(Self::statement)?;
            return Ok(Statement::StaticInit(StaticInit {
                id,
                prefix: space(&kw),
                body,
            }));
        }
        if !self.at("package") && !self.at("import") {
            if let Some(decl) = self.attempt(|p| p.declaration(DeclContext::Member)) {
                return Ok(decl);
            }
        }
        self.unknown().map(Statement::Unknown)
    }

    fn block(&mut self, item: fn(&mut Self) -> PResult<Statement>) -> PResult<Block> {
        let open = self.expect("{")?;
        let id = self.next_id();
        let mut statements = Vec::new();
        while !self.at("}") {
            if self.at_eof() {
                return Err(self.error("}"));
            }
            statements.push(item(self)?);
        }
        let close = self.bump();
        Ok(Block {
            id,
            prefix: space(&open),
            statements,
            end: space(&close),
        })
    }

    fn at_class_keyword(&self) -> bool {
        (self.at("@") && self.nth_is(1, "interface"))
            || self.at("class")
            || self.at("interface")
            || self.at("enum")
            || (self.at("record")
                && self.peek_nth(1).r#type == TokType::Identifier
                && (self.nth_is(2, "(") || self.nth_is(2, "<")))
    }

    fn declaration(&mut self, context: DeclContext) -> PResult<Statement> {
        let leading = self.annotations()?;
        let (modifiers, trailing) = self.modifiers()?;
        let annotations = (leading, trailing);
        if self.at_class_keyword() {
            return self
                .class_decl(annotations, modifiers)
                .map(Statement::Class);
        }
        if context == DeclContext::Member {
            let type_parameters = if self.at("<") {
                Some(self.angles()?)
            } else {
                None
            };
            if self.at_identifier() && self.nth_is(1, "(") {
                return self
                    .method_decl(annotations, modifiers, type_parameters, None)
                    .map(Statement::Method);
            }
            let return_type = self.type_name()?;
            if self.at_identifier() && self.nth_is(1, "(") {
                return self
                    .method_decl(annotations, modifiers, type_parameters, Some(return_type))
                    .map(Statement::Method);
            }
            if type_parameters.is_some() {
                return Err(self.error("method"));
            }
            return self
                .variable_decl(annotations, modifiers, return_type)
                .map(Statement::Variable);
        }
        let type_name = self.type_name()?;
        self.variable_decl(annotations, modifiers, type_name)
            .map(Statement::Variable)
    }

    fn at_annotation(&self) -> bool {
        self.at("@") && !self.nth_is(1, "interface")
    }

    fn annotations(&mut self) -> PResult<Vec<Annotation>> {
        let mut annotations = Vec::new();
        while self.at_annotation() {
            let start = self.pos;
            let at = self.bump();
            self.expect_name()?;
            while self.at(".") && self.peek_nth(1).r#type == TokType::Identifier {
                self.advance(2);
            }
            if self.at("(") {
                self.group("(")?;
            }
            annotations.push(Annotation {
                id: self.next_id(),
                prefix: space(&at),
                text: self.slice_from(start).to_string(),
            });
        }
        Ok(annotations)
    }

    /// Modifiers with any annotations mixed in among them. Annotations after
    /// the last modifier are returned separately.
    fn modifiers(&mut self) -> PResult<(Vec<Modifier>, Vec<Annotation>)> {
        let mut modifiers = Vec::new();
        let mut pending = Vec::new();
        loop {
            if !modifiers.is_empty() && self.at_annotation() {
                pending.extend(self.annotations()?);
                continue;
            }
            let tok = self.peek();
            if tok.r#type != TokType::Identifier {
                break;
            }
            let Some(kind) = ModifierKind::from_keyword(tok.string) else {
                break;
            };
            // `sealed` is a contextual keyword; elsewhere it is a name.
            if kind == ModifierKind::Sealed {
                let next = self.peek_nth(1);
                if ModifierKind::from_keyword(next.string).is_none()
                    && !matches!(next.string, "class" | "interface")
                {
                    break;
                }
            }
            self.bump();
            modifiers.push(Modifier {
                id: self.next_id(),
                annotations: std::mem::take(&mut pending),
                prefix: space(&tok),
                kind,
            });
        }
        Ok((modifiers, pending))
    }

    fn type_name(&mut self) -> PResult<TypeName> {
        let start = self.pos;
        let first = self.peek();
        if first.r#type != TokType::Identifier
            || (is_reserved(first.string) && !is_primitive(first.string))
        {
            return Err(self.error("type"));
        }
        self.bump();
        if self.at("<") {
            self.angles()?;
        }
        while self.at(".") && self.peek_nth(1).r#type == TokType::Identifier {
            self.advance(2);
            if self.at("<") {
                self.angles()?;
            }
        }
        while self.at("[") && self.nth_is(1, "]") {
            self.advance(2);
        }
        Ok(TypeName {
            id: self.next_id(),
            prefix: space(&first),
            text: self.slice_from(start).to_string(),
        })
    }

    fn class_decl(
        &mut self,
        (mut annotations, trailing_annotations): (Vec<Annotation>, Vec<Annotation>),
        mut modifiers: Vec<Modifier>,
    ) -> PResult<ClassDecl> {
        let kw = self.bump();
        let kind = match kw.string {
            "class" => ClassKind::Class,
            "interface" => ClassKind::Interface,
            "enum" => ClassKind::Enum,
            "record" => ClassKind::Record,
            _ => {
                let interface = self.expect("interface")?;
                if !interface.prefix.is_empty() {
                    return Err(self.error("@interface"));
                }
                ClassKind::Annotation
            }
        };
        let id = self.next_id();
        let name_tok = self.expect_name()?;
        let name = Name {
            prefix: space(&name_tok),
            value: name_tok.string.to_string(),
        };

        let header = if self.at("{") {
            None
        } else {
            let start = self.pos;
            while !self.at("{") {
                if self.at_eof() || self.at(";") || self.at("}") {
                    return Err(self.error("{"));
                }
                if self.at("(") {
                    self.group("(")?;
                } else if self.at("<") {
                    self.angles()?;
                } else {
                    self.bump();
                }
            }
            Some(self.raw_from(start))
        };

        let body = if kind == ClassKind::Enum {
            self.enum_body()?
        } else {
            self.block(Self::member)?
        };

        let mut kind_prefix = space(&kw);
        let prefix = if let Some(first) = annotations.first_mut() {
            std::mem::take(&mut first.prefix)
        } else if let Some(first) = modifiers.first_mut() {
            std::mem::take(&mut first.prefix)
        } else {
            std::mem::take(&mut kind_prefix)
        };

        Ok(ClassDecl {
            id,
            prefix,
            annotations,
            modifiers,
            trailing_annotations,
            kind_prefix,
            kind,
            name,
            header,
            body,
        })
    }

    /// Enum constants are kept verbatim as the first statement of the body.
    fn enum_body(&mut self) -> PResult<Block> {
        let open = self.expect("{")?;
        let id = self.next_id();
        let mut statements = Vec::new();
        if !self.at("}") {
            let start = self.pos;
            let mut depth = 0usize;
            loop {
                let tok = self.peek();
                if tok.r#type == TokType::EndMarker {
                    return Err(self.error("}"));
                }
                if depth == 0 && is_op(&tok, "}") {
                    break;
                }
                self.bump();
                match (tok.r#type, tok.string) {
                    (TokType::Op, "(" | "[" | "{") => depth += 1,
                    (TokType::Op, ")" | "]" | "}") => depth = depth.saturating_sub(1),
                    (TokType::Op, ";") if depth == 0 => break,
                    _ => {}
                }
            }
            statements.push(Statement::Unknown(Unknown {
                id: self.next_id(),
                prefix: Space::from(self.tokens[start].prefix),
                text: self.slice_from(start).to_string(),
            }));
        }
        while !self.at("}") {
            if self.at_eof() {
                return Err(self.error("}"));
            }
            statements.push(self.member()?);
        }
        let close = self.bump();
        Ok(Block {
            id,
            prefix: space(&open),
            statements,
            end: space(&close),
        })
    }

    fn method_decl(
        &mut self,
        (mut annotations, trailing_annotations): (Vec<Annotation>, Vec<Annotation>),
        mut modifiers: Vec<Modifier>,
        mut type_parameters: Option<RawText>,
        mut return_type: Option<TypeName>,
    ) -> PResult<MethodDecl> {
        let name_tok = self.expect_name()?;
        let id = self.next_id();
        let mut name = Name {
            prefix: space(&name_tok),
            value: name_tok.string.to_string(),
        };
        let parameters = self.group("(")?;

        let throws = if self.at("throws") {
            let start = self.pos;
            while !self.at("{") && !self.at(";") {
                if self.at_eof() || self.at("}") {
                    return Err(self.error("method body"));
                }
                self.bump();
            }
            Some(self.raw_from(start))
        } else {
            None
        };

        let body = if self.at("{") {
            MethodBody::Block(self.block(Self::statement)?)
        } else if self.at(";") {
            MethodBody::Semicolon(space(&self.bump()))
        } else {
            return Err(self.error("method body"));
        };

        let prefix = if let Some(first) = annotations.first_mut() {
            std::mem::take(&mut first.prefix)
        } else if let Some(first) = modifiers.first_mut() {
            std::mem::take(&mut first.prefix)
        } else if let Some(first) = type_parameters.as_mut() {
            std::mem::take(&mut first.prefix)
        } else if let Some(first) = return_type.as_mut() {
            std::mem::take(&mut first.prefix)
        } else {
            std::mem::take(&mut name.prefix)
        };

        Ok(MethodDecl {
            id,
            prefix,
            annotations,
            modifiers,
            trailing_annotations,
            type_parameters,
            return_type,
            name,
            parameters,
            throws,
            body,
        })
    }

    fn variable_decl(
        &mut self,
        (mut annotations, trailing_annotations): (Vec<Annotation>, Vec<Annotation>),
        mut modifiers: Vec<Modifier>,
        mut type_name: TypeName,
    ) -> PResult<VariableDecl> {
        let id = self.next_id();
        let mut declarators = Vec::new();
        loop {
            let name_tok = self.expect_name()?;
            let declarator_id = self.next_id();
            let initializer = match self.eat("=") {
                Some(eq) => {
                    if self.at("{") {
                        return Err(self.error("expression"));
                    }
                    Some(VariableInit {
                        eq: space(&eq),
                        value: self.expression()?,
                    })
                }
                None => None,
            };
            let sep = self.peek();
            if !is_op(&sep, ",") && !is_op(&sep, ";") {
                return Err(self.error(";"));
            }
            self.bump();
            declarators.push(Declarator {
                id: declarator_id,
                prefix: space(&name_tok),
                name: name_tok.string.to_string(),
                initializer,
                after: space(&sep),
            });
            if sep.string == ";" {
                break;
            }
        }

        let prefix = if let Some(first) = annotations.first_mut() {
            std::mem::take(&mut first.prefix)
        } else if let Some(first) = modifiers.first_mut() {
            std::mem::take(&mut first.prefix)
        } else {
            std::mem::take(&mut type_name.prefix)
        };

        Ok(VariableDecl {
            id,
            prefix,
            annotations,
            modifiers,
            trailing_annotations,
            type_name,
            declarators,
        })
    }

    // ------------------------------------------------------------------------
    // Statements
    // ------------------------------------------------------------------------

    fn statement(&mut self) -> PResult<Statement> {
        if let Some(stmt) = self.attempt(Self::structured_statement) {
            return Ok(stmt);
        }
        self.unknown().map(Statement::Unknown)
    }

    fn structured_statement(&mut self) -> PResult<Statement> {
        let tok = self.peek();
        match (tok.r#type, tok.string) {
            (TokType::Op, "{") => Ok(Statement::Block(self.block(Self::statement)?)),
            (TokType::Op, ";") => Ok(self.empty()),
            (TokType::Identifier, "if") => self.if_statement(),
            (TokType::Identifier, "try") => self.try_statement(),
            (TokType::Identifier, "while") => self.while_statement(),
            (TokType::Identifier, "for") => self.for_statement(),
            (TokType::Identifier, "return") => self.return_statement(),
            (TokType::Identifier, "throw") => self.throw_statement(),
            (TokType::Op, "@")
            | (
                TokType::Identifier,
                "class" | "interface" | "enum" | "abstract" | "final" | "static" | "strictfp",
            ) => self.declaration(DeclContext::Local),
            (TokType::Identifier, word)
                if is_reserved(word)
                    && !is_primitive(word)
                    && !matches!(word, "this" | "super" | "new" | "true" | "false" | "null") =>
            {
                Err(self.error("statement"))
            }
            _ => {
                if let Some(decl) = self.attempt(|p| p.declaration(DeclContext::Local)) {
                    return Ok(decl);
                }
                self.expression_statement()
            }
        }
    }

    fn empty(&mut self) -> Statement {
        let tok = self.bump();
        Statement::Empty(Empty {
            id: self.next_id(),
            prefix: space(&tok),
        })
    }

    fn control_parens(&mut self) -> PResult<ControlParens> {
        let open = self.expect("(")?;
        let expr = self.expression()?;
        let close = self.expect(")")?;
        Ok(ControlParens {
            prefix: space(&open),
            expr,
            close: space(&close),
        })
    }

    fn if_statement(&mut self) -> PResult<Statement> {
        let kw = self.bump();
        let id = self.next_id();
        let condition = self.control_parens()?;
        let then_part = Box::new(self.statement()?);
        let else_part = match self.eat("else") {
            Some(else_kw) => {
                let else_id = self.next_id();
                Some(Else {
                    id: else_id,
                    prefix: space(&else_kw),
                    body: Box::new(self.statement()?),
                })
            }
            None => None,
        };
        Ok(Statement::If(If {
            id,
            prefix: space(&kw),
            condition,
            then_part,
            else_part,
        }))
    }

    fn try_statement(&mut self) -> PResult<Statement> {
        let kw = self.bump();
        let id = self.next_id();
        let resources = if self.at("(") {
            Some(self.group("(")?)
        } else {
            None
        };
        let body = self.block(Self::statement)?;
        let mut catches = Vec::new();
        while let Some(catch_kw) = self.eat("catch") {
            let catch_id = self.next_id();
            let parameter = self.group("(")?;
            catches.push(Catch {
                id: catch_id,
                prefix: space(&catch_kw),
                parameter,
                body: self.block(Self::statement)?,
            });
        }
        let finally = match self.eat("finally") {
            Some(finally_kw) => {
                let finally_id = self.next_id();
                Some(Finally {
                    id: finally_id,
                    prefix: space(&finally_kw),
                    body: self.block(Self::statement)?,
                })
            }
            None => None,
        };
        Ok(Statement::Try(Try {
            id,
            prefix: space(&kw),
            resources,
            body,
            catches,
            finally,
        }))
    }

    fn while_statement(&mut self) -> PResult<Statement> {
        let kw = self.bump();
        let id = self.next_id();
        let condition = self.control_parens()?;
        let body = Box::new(self.statement()?);
        Ok(Statement::While(While {
            id,
            prefix: space(&kw),
            condition,
            body,
        }))
    }

    fn for_statement(&mut self) -> PResult<Statement> {
        let kw = self.bump();
        let id = self.next_id();
        let control = self.group("(")?;
        let body = Box::new(self.statement()?);
        Ok(Statement::For(For {
            id,
            prefix: space(&kw),
            control,
            body,
        }))
    }

    fn return_statement(&mut self) -> PResult<Statement> {
        let kw = self.bump();
        let id = self.next_id();
        let value = if self.at(";") {
            None
        } else {
            Some(self.expression()?)
        };
        let semicolon = self.expect(";")?;
        Ok(Statement::Return(Return {
            id,
            prefix: space(&kw),
            value,
            semicolon: space(&semicolon),
        }))
    }

    fn throw_statement(&mut self) -> PResult<Statement> {
        let kw = self.bump();
        let id = self.next_id();
        let value = self.expression()?;
        let semicolon = self.expect(";")?;
        Ok(Statement::Throw(Throw {
            id,
            prefix: space(&kw),
            value,
            semicolon: space(&semicolon),
        }))
    }

    fn expression_statement(&mut self) -> PResult<Statement> {
        let (prefix, expr) = split_prefix(self.expression()?);
        let semicolon = self.expect(";")?;
        Ok(Statement::Expression(ExpressionStatement {
            id: self.next_id(),
            prefix,
            expr,
            semicolon: space(&semicolon),
        }))
    }

    /// Consumes one statement or member verbatim: through a `;` at depth 0,
    /// or through a `}` that closes a depth-0 group and is not continued.
    /// Stops before a depth-0 `}` that closes the enclosing block.
    fn unknown(&mut self) -> PResult<Unknown> {
        let start = self.pos;
        let first = self.peek();
        if first.r#type == TokType::EndMarker || is_op(&first, "}") {
            return Err(self.error("statement"));
        }
        let mut depth = 0usize;
        loop {
            let tok = self.peek();
            if tok.r#type == TokType::EndMarker {
                if depth == 0 {
                    break;
                }
                return Err(self.error("closing delimiter"));
            }
            if depth == 0 && is_op(&tok, "}") {
                break;
            }
            self.bump();
            if tok.r#type != TokType::Op {
                continue;
            }
            match tok.string {
                "(" | "[" | "{" => depth += 1,
                ")" | "]" | "}" => {
                    if depth == 0 {
                        return Err(SyntaxError {
                            expected: "statement",
                            offset: tok.start,
                            found: tok.string.to_string(),
                        });
                    }
                    depth -= 1;
                    if depth == 0
                        && tok.string == "}"
                        && !CONTINUES_AFTER_BRACE.iter().any(|word| self.at(word))
                    {
                        break;
                    }
                }
                ";" if depth == 0 => break,
                _ => {}
            }
        }
        Ok(Unknown {
            id: self.next_id(),
            prefix: space(&first),
            text: self.slice_from(start).to_string(),
        })
    }

    // ------------------------------------------------------------------------
    // Expressions
    // ------------------------------------------------------------------------

    pub(crate) fn expression(&mut self) -> PResult<Expression> {
        let target = self.ternary()?;
        let Some((operator, len)) = self.assignment_operator() else {
            return Ok(target);
        };
        let op_tok = self.peek();
        self.advance(len);
        let value = self.expression()?;
        let (prefix, target) = split_prefix(target);
        Ok(Assignment {
            id: self.next_id(),
            prefix,
            target: Box::new(target),
            op_prefix: space(&op_tok),
            operator,
            value: Box::new(value),
        }
        .into())
    }

    /// Number of directly adjacent `>` tokens at the current position, and
    /// whether an adjacent `=` follows them.
    fn joined_greater(&self) -> (usize, bool) {
        let mut count = 0;
        while count < 3
            && is_op(&self.peek_nth(count), ">")
            && (count == 0 || self.peek_nth(count).prefix.is_empty())
        {
            count += 1;
        }
        let next = self.peek_nth(count);
        let eq = count > 0 && next.prefix.is_empty() && is_op(&next, "=");
        (count, eq)
    }

    fn assignment_operator(&self) -> Option<(String, usize)> {
        let tok = self.peek();
        if tok.r#type != TokType::Op {
            return None;
        }
        match tok.string {
            "=" | "+=" | "-=" | "*=" | "/=" | "%=" | "&=" | "|=" | "^=" | "<<=" => {
                Some((tok.string.to_string(), 1))
            }
            ">" => match self.joined_greater() {
                (count @ 2..=3, true) => Some((format!("{}=", ">".repeat(count)), count + 1)),
                _ => None,
            },
            _ => None,
        }
    }

    fn binary_operator(&self) -> Option<(BinaryOp, usize)> {
        let tok = self.peek();
        if tok.r#type != TokType::Op {
            return None;
        }
        if tok.string == ">" {
            return match self.joined_greater() {
                (1, true) => Some((BinaryOp::GreaterOrEqual, 2)),
                (1, false) => Some((BinaryOp::Greater, 1)),
                (2, false) => Some((BinaryOp::ShiftRight, 2)),
                (3, false) => Some((BinaryOp::UnsignedShiftRight, 3)),
                _ => None,
            };
        }
        BinaryOp::from_token(tok.string).map(|op| (op, 1))
    }

    fn ternary(&mut self) -> PResult<Expression> {
        let condition = self.binary(0)?;
        let Some(question) = self.eat("?") else {
            return Ok(condition);
        };
        let then_part = self.expression()?;
        let colon = self.expect(":")?;
        let else_part = self.ternary()?;
        let (prefix, condition) = split_prefix(condition);
        Ok(Ternary {
            id: self.next_id(),
            prefix,
            condition: Box::new(condition),
            question: space(&question),
            then_part: Box::new(then_part),
            colon: space(&colon),
            else_part: Box::new(else_part),
        }
        .into())
    }

    /// Precedence climbing over binary operators and `instanceof`.
    fn binary(&mut self, min_precedence: u8) -> PResult<Expression> {
        const INSTANCEOF_PRECEDENCE: u8 = 6;

        let mut left = self.unary()?;
        loop {
            if self.at("instanceof") {
                if INSTANCEOF_PRECEDENCE < min_precedence {
                    break;
                }
                let kw = self.bump();
                let clazz = self.type_name()?;
                if self.at_identifier() {
                    // Pattern matching `instanceof T name` is not modelled.
                    return Err(self.error("operator"));
                }
                let (prefix, expr) = split_prefix(left);
                left = InstanceOf {
                    id: self.next_id(),
                    prefix,
                    expr: Box::new(expr),
                    keyword: space(&kw),
                    clazz,
                }
                .into();
                continue;
            }
            let Some((op, len)) = self.binary_operator() else {
                break;
            };
            let precedence = op.precedence();
            if precedence < min_precedence {
                break;
            }
            let op_tok = self.peek();
            self.advance(len);
            let right = self.binary(precedence + 1)?;
            let (prefix, left_expr) = split_prefix(left);
            left = Binary {
                id: self.next_id(),
                prefix,
                left: Box::new(left_expr),
                op_prefix: space(&op_tok),
                op,
                right: Box::new(right),
            }
            .into();
        }
        Ok(left)
    }

    fn unary(&mut self) -> PResult<Expression> {
        let tok = self.peek();
        if tok.r#type == TokType::Op {
            if let Some(op) = UnaryOp::prefix_from_token(tok.string) {
                self.bump();
                let operand = self.unary()?;
                return Ok(Unary {
                    id: self.next_id(),
                    prefix: space(&tok),
                    op,
                    op_prefix: Space::empty(),
                    operand: Box::new(operand),
                }
                .into());
            }
            if tok.string == "(" {
                if let Some(cast) = self.attempt(Self::cast) {
                    return Ok(cast);
                }
            }
        }
        self.postfix()
    }

    fn cast(&mut self) -> PResult<Expression> {
        let open = self.expect("(")?;
        let clazz = self.type_name()?;
        let close = self.expect(")")?;
        let base = clazz
            .text
            .split(|c: char| c == '[' || c.is_whitespace())
            .next()
            .unwrap_or_default();
        let primitive = is_primitive(base);
        let next = self.peek();
        let castable = match next.r#type {
            TokType::Identifier => {
                !is_reserved(next.string)
                    || matches!(
                        next.string,
                        "this" | "super" | "new" | "true" | "false" | "null"
                    )
            }
            TokType::String | TokType::TextBlock | TokType::Char | TokType::Number => true,
            TokType::Op => {
                matches!(next.string, "(" | "!" | "~")
                    || (primitive && matches!(next.string, "+" | "-" | "++" | "--"))
            }
            TokType::EndMarker => false,
        };
        if !castable {
            return Err(self.error("expression"));
        }
        let expr = self.unary()?;
        Ok(Cast {
            id: self.next_id(),
            prefix: space(&open),
            clazz,
            close: space(&close),
            expr: Box::new(expr),
        }
        .into())
    }

    fn postfix(&mut self) -> PResult<Expression> {
        let mut expr = self.primary()?;
        loop {
            if self.at(".") {
                let dot = self.peek();
                let name_tok = self.peek_nth(1);
                if name_tok.r#type != TokType::Identifier {
                    return Err(self.error("member name"));
                }
                self.advance(2);
                let name = Name {
                    prefix: space(&name_tok),
                    value: name_tok.string.to_string(),
                };
                let (prefix, target) = split_prefix(expr);
                expr = if self.at("(") {
                    let args = self.arguments()?;
                    MethodInvocation {
                        id: self.next_id(),
                        prefix,
                        select: Some(Box::new(target)),
                        dot: space(&dot),
                        name,
                        args,
                    }
                    .into()
                } else {
                    FieldAccess {
                        id: self.next_id(),
                        prefix,
                        target: Box::new(target),
                        dot: space(&dot),
                        name,
                    }
                    .into()
                };
            } else if self.at("[") {
                let open = self.bump();
                let index = self.expression()?;
                let close = self.expect("]")?;
                let (prefix, indexed) = split_prefix(expr);
                expr = ArrayAccess {
                    id: self.next_id(),
                    prefix,
                    indexed: Box::new(indexed),
                    open: space(&open),
                    index: Box::new(index),
                    close: space(&close),
                }
                .into();
            } else {
                break;
            }
        }
        while self.at("++") || self.at("--") {
            let op_tok = self.bump();
            let op = if op_tok.string == "++" {
                UnaryOp::PostIncrement
            } else {
                UnaryOp::PostDecrement
            };
            let (prefix, operand) = split_prefix(expr);
            expr = Unary {
                id: self.next_id(),
                prefix,
                op,
                op_prefix: space(&op_tok),
                operand: Box::new(operand),
            }
            .into();
        }
        Ok(expr)
    }

    fn literal(&mut self, kind: LiteralKind) -> Expression {
        let tok = self.bump();
        Literal {
            id: self.next_id(),
            prefix: space(&tok),
            value: tok.string.to_string(),
            kind,
        }
        .into()
    }

    fn primary(&mut self) -> PResult<Expression> {
        let tok = self.peek();
        match (tok.r#type, tok.string) {
            (TokType::String | TokType::TextBlock, _) => Ok(self.literal(LiteralKind::String)),
            (TokType::Char, _) => Ok(self.literal(LiteralKind::Char)),
            (TokType::Number, text) => Ok(self.literal(classify_number(text))),
            (TokType::Identifier, "true" | "false") => Ok(self.literal(LiteralKind::Boolean)),
            (TokType::Identifier, "null") => Ok(self.literal(LiteralKind::Null)),
            (TokType::Identifier, "new") => self.new_class(),
            (TokType::Identifier, word)
                if !is_reserved(word)
                    || is_primitive(word)
                    || matches!(word, "this" | "super") =>
            {
                self.bump();
                if self.at("(") {
                    let args = self.arguments()?;
                    Ok(MethodInvocation {
                        id: self.next_id(),
                        prefix: space(&tok),
                        select: None,
                        dot: Space::empty(),
                        name: Name {
                            prefix: Space::empty(),
                            value: word.to_string(),
                        },
                        args,
                    }
                    .into())
                } else {
                    Ok(Identifier {
                        id: self.next_id(),
                        prefix: space(&tok),
                        name: word.to_string(),
                    }
                    .into())
                }
            }
            (TokType::Op, "(") => {
                let open = self.bump();
                let expr = self.expression()?;
                let close = self.expect(")")?;
                Ok(Parens {
                    id: self.next_id(),
                    prefix: space(&open),
                    expr: Box::new(expr),
                    close: space(&close),
                }
                .into())
            }
            _ => Err(self.error("expression")),
        }
    }

    fn new_class(&mut self) -> PResult<Expression> {
        let kw = self.bump();
        let clazz = self.type_name()?;
        if !self.at("(") {
            return Err(self.error("("));
        }
        let args = self.arguments()?;
        let body = if self.at("{") {
            Some(self.block(Self::member)?)
        } else {
            None
        };
        Ok(NewClass {
            id: self.next_id(),
            prefix: space(&kw),
            clazz,
            args,
            body,
        }
        .into())
    }

    fn arguments(&mut self) -> PResult<Arguments> {
        let open = self.expect("(")?;
        let id = self.next_id();
        let mut args = Vec::new();
        if let Some(close) = self.eat(")") {
            return Ok(Arguments {
                id,
                prefix: space(&open),
                args,
                end: space(&close),
            });
        }
        loop {
            let expr = self.expression()?;
            let sep = self.peek();
            if is_op(&sep, ",") || is_op(&sep, ")") {
                self.bump();
                args.push(Argument {
                    expr,
                    after: space(&sep),
                });
                if sep.string == ")" {
                    break;
                }
            } else {
                return Err(self.error(")"));
            }
        }
        Ok(Arguments {
            id,
            prefix: space(&open),
            args,
            end: Space::empty(),
        })
    }

    /// Parses the whole input as a single expression.
    pub(crate) fn expression_input(&mut self) -> PResult<Expression> {
        let expr = self.expression()?;
        if !self.at_eof() {
            return Err(self.error("end of input"));
        }
        Ok(expr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nodes::Codegen;
    use crate::tokenizer::tokenize;

    fn parse(text: &str) -> CompilationUnit {
        let tokens = tokenize(text).expect("tokenize");
        Parser::new(text, &tokens)
            .compilation_unit()
            .expect("parse")
    }

    fn parse_expr(text: &str) -> Expression {
        let tokens = tokenize(text).expect("tokenize");
        Parser::new(text, &tokens)
            .expression_input()
            .expect("parse")
    }

    fn method_body(unit: &CompilationUnit) -> &Block {
        let class = unit.classes().next().expect("class");
        match &class.methods().next().expect("method").body {
            MethodBody::Block(block) => block,
            MethodBody::Semicolon(_) => panic!("abstract method"),
        }
    }

    #[test]
    fn class_with_modifiers_hoists_prefix() {
        let unit = parse("\n\npublic static class A extends B {}");
        let class = unit.classes().next().expect("class");
        assert_eq!(class.prefix.as_str(), "\n\n");
        assert_eq!(class.modifiers.len(), 2);
        assert_eq!(class.modifiers[0].prefix.as_str(), "");
        assert_eq!(class.modifiers[1].prefix.as_str(), " ");
        assert_eq!(class.kind_prefix.as_str(), " ");
        assert_eq!(class.name.value, "A");
        assert_eq!(
            class.header.as_ref().map(|h| h.text.as_str()),
            Some("extends B")
        );
    }

    #[test]
    fn class_without_modifiers_owns_keyword_prefix() {
        let unit = parse("  class A {}");
        let class = unit.classes().next().expect("class");
        assert_eq!(class.prefix.as_str(), "  ");
        assert_eq!(class.kind_prefix.as_str(), "");
    }

    #[test]
    fn annotations_between_modifiers() {
        let source = "class A { public @Deprecated A() {} \
                      protected @Inject static @Nullable final Object o = null; }";
        let unit = parse(source);
        assert_eq!(unit.to_source(), source);

        let class = unit.classes().next().expect("class");
        let ctor = class.methods().next().expect("constructor");
        assert!(ctor.is_constructor());
        assert!(ctor.has_modifier(ModifierKind::Public));
        assert_eq!(ctor.trailing_annotations.len(), 1);
        assert_eq!(ctor.trailing_annotations[0].text, "@Deprecated");

        let Statement::Variable(field) = &class.body.statements[1] else {
            panic!("expected field");
        };
        let kinds: Vec<_> = field.modifiers.iter().map(|m| m.kind).collect();
        assert_eq!(
            kinds,
            vec![ModifierKind::Protected, ModifierKind::Static, ModifierKind::Final]
        );
        assert_eq!(field.modifiers[1].annotations[0].text, "@Inject");
        assert_eq!(field.modifiers[2].annotations[0].text, "@Nullable");
        assert!(field.trailing_annotations.is_empty());
    }

    #[test]
    fn constructors_and_methods() {
        let unit = parse("class A { private A() {} public int f(int x) { return x; } }");
        let class = unit.classes().next().expect("class");
        let methods: Vec<_> = class.methods().collect();
        assert_eq!(methods.len(), 2);
        assert!(methods[0].is_constructor());
        assert!(methods[0].has_modifier(ModifierKind::Private));
        assert!(!methods[1].is_constructor());
        assert_eq!(methods[1].parameters.text, "(int x)");
    }

    #[test]
    fn method_call_shape() {
        let expr = parse_expr("s . equals( \"a\" )");
        let Expression::MethodInvocation(call) = expr else {
            panic!("expected method invocation");
        };
        assert_eq!(call.name(), "equals");
        assert_eq!(call.dot.as_str(), " ");
        assert_eq!(call.args.prefix.as_str(), "");
        assert_eq!(call.args.args.len(), 1);
        assert_eq!(call.args.args[0].expr.prefix().as_str(), " ");
        assert_eq!(call.args.args[0].after.as_str(), " ");
        assert!(matches!(call.select.as_deref(), Some(Expression::Identifier(_))));
    }

    #[test]
    fn binary_precedence() {
        let expr = parse_expr("a != null && a.equals(b) || c");
        let Expression::Binary(or) = expr else {
            panic!("expected binary");
        };
        assert_eq!(or.op, BinaryOp::Or);
        let Expression::Binary(and) = *or.left else {
            panic!("expected binary");
        };
        assert_eq!(and.op, BinaryOp::And);
        assert!(matches!(*and.left, Expression::Binary(ref b) if b.op == BinaryOp::NotEqual));
        assert!(matches!(*and.right, Expression::MethodInvocation(_)));
    }

    #[test]
    fn shift_operators_join_adjacent_greater_than() {
        let Expression::Binary(shift) = parse_expr("a >>> 2") else {
            panic!("expected binary");
        };
        assert_eq!(shift.op, BinaryOp::UnsignedShiftRight);

        let Expression::Binary(ge) = parse_expr("a >= b") else {
            panic!("expected binary");
        };
        assert_eq!(ge.op, BinaryOp::GreaterOrEqual);

        let Expression::Assignment(assign) = parse_expr("a >>= b") else {
            panic!("expected assignment");
        };
        assert_eq!(assign.operator, ">>=");
    }

    #[test]
    fn casts_and_parens() {
        assert!(matches!(parse_expr("(String) o"), Expression::Cast(_)));
        assert!(matches!(parse_expr("(int) -x"), Expression::Cast(_)));
        assert!(matches!(parse_expr("(a) + b"), Expression::Binary(_)));
        assert!(matches!(parse_expr("(a + b)"), Expression::Parens(_)));
    }

    #[test]
    fn literal_kinds() {
        let kind = |text: &str| match parse_expr(text) {
            Expression::Literal(lit) => lit.kind,
            other => panic!("not a literal: {other:?}"),
        };
        assert_eq!(kind("\"a\""), LiteralKind::String);
        assert_eq!(kind("'a'"), LiteralKind::Char);
        assert_eq!(kind("10"), LiteralKind::Int);
        assert_eq!(kind("10L"), LiteralKind::Long);
        assert_eq!(kind("1.5f"), LiteralKind::Float);
        assert_eq!(kind("1.5"), LiteralKind::Double);
        assert_eq!(kind("0xFF"), LiteralKind::Int);
        assert_eq!(kind("true"), LiteralKind::Boolean);
        assert_eq!(kind("null"), LiteralKind::Null);
    }

    #[test]
    fn if_else_and_try_shapes() {
        let unit = parse(
            "class A { void f() { if (c) { a(); } else { b(); } try { x(); } catch (E e) { } finally { } } }",
        );
        let body = method_body(&unit);
        let Statement::If(if_stmt) = &body.statements[0] else {
            panic!("expected if");
        };
        assert!(matches!(*if_stmt.then_part, Statement::Block(_)));
        assert_eq!(
            if_stmt.else_part.as_ref().map(|e| e.prefix.as_str()),
            Some(" ")
        );
        let Statement::Try(try_stmt) = &body.statements[1] else {
            panic!("expected try");
        };
        assert_eq!(try_stmt.catches.len(), 1);
        assert_eq!(try_stmt.catches[0].parameter.text, "(E e)");
        assert!(try_stmt.finally.is_some());
    }

    #[test]
    fn unmodelled_statements_are_kept_verbatim() {
        let text = "class A { void f() { switch (x) { case 1: break; } do { y(); } while (z); list.forEach(v -> { g(v); }); } }";
        let unit = parse(text);
        let body = method_body(&unit);
        let kinds: Vec<_> = body
            .statements
            .iter()
            .map(|s| match s {
                Statement::Unknown(u) => u.text.as_str(),
                _ => "?",
            })
            .collect();
        assert_eq!(
            kinds,
            vec![
                "switch (x) { case 1: break; }",
                "do { y(); } while (z);",
                "list.forEach(v -> { g(v); });",
            ]
        );
        assert_eq!(unit.to_source(), text);
    }

    #[test]
    fn local_variables_and_generics() {
        let unit = parse("class A { void f() { Map<String, List<String>> m = new HashMap<>(), n; } }");
        let body = method_body(&unit);
        let Statement::Variable(var) = &body.statements[0] else {
            panic!("expected variable");
        };
        assert_eq!(var.type_name.text, "Map<String, List<String>>");
        assert_eq!(var.declarators.len(), 2);
        assert!(matches!(
            var.declarators[0].initializer.as_ref().map(|i| &i.value),
            Some(Expression::NewClass(_))
        ));
    }

    #[test]
    fn ids_are_sequential_and_unique() {
        let unit = parse("class A { void f() { if (a) { b(); } } }");
        let again = parse("class A { void f() { if (a) { b(); } } }");
        assert_eq!(unit, again);
        assert_eq!(unit.id, NodeId(0));
        assert!(unit.node_count > 5);
    }

    #[test]
    fn unbalanced_input_fails() {
        let text = "class A { void f() { ";
        let tokens = tokenize(text).expect("tokenize");
        let err = Parser::new(text, &tokens)
            .compilation_unit()
            .expect_err("should fail");
        assert_eq!(err.expected, "closing delimiter");
        assert_eq!(err.offset, text.len());
    }
}
