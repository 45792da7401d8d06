use std::slice::Iter;

use crate::{lexer::tokens::Token, Span};

use super::{
    expressions::Expr,
    statements::Statement,
    types::{Type, TypeSlot},
};

/// Root of a parsed input: either a full program or, when the input does
/// not start with a type keyword, a single bare expression.
#[derive(Debug, Clone)]
pub enum Ast {
    Program(Program),
    Expr(Expr),
}

impl Ast {
    pub fn get_type(&self) -> Option<Type> {
        match self {
            Ast::Program(program) => program.ty.get(),
            Ast::Expr(expr) => expr.get_type(),
        }
    }

    pub fn get_span(&self) -> &Span {
        match self {
            Ast::Program(program) => &program.token.span,
            Ast::Expr(expr) => expr.get_span(),
        }
    }
}

/// `Type IDENT ( ParamList ) Block`
#[derive(Debug, Clone)]
pub struct Program {
    pub token: Token,
    pub identifier: Token,
    pub params: Vec<NameDef>,
    pub block: Block,
    pub ty: TypeSlot,
}

impl Program {
    pub fn name(&self) -> &str {
        &self.identifier.value
    }

    /// The declared return type, read from the leading type keyword.
    pub fn return_type(&self) -> Option<Type> {
        Type::from_token_kind(self.token.kind)
    }
}

#[derive(Debug, Clone)]
pub struct Block {
    pub token: Token,
    pub elems: Vec<BlockElem>,
}

impl Block {
    pub fn iter(&self) -> Iter<'_, BlockElem> {
        self.elems.iter()
    }
}

#[derive(Debug, Clone)]
pub enum BlockElem {
    Declaration(Declaration),
    Statement(Statement),
}

#[derive(Debug, Clone)]
pub struct Declaration {
    pub token: Token,
    pub name_def: NameDef,
    pub initializer: Option<Expr>,
}

/// Identity of a name definition.
///
/// Parsed definitions are numbered by the parser; synthetic ones are
/// numbered by the type checker that creates them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NameDefId {
    Declared(u32),
    Synthetic(u32),
}

#[derive(Debug, Clone)]
pub struct NameDef {
    pub id: NameDefId,
    pub type_token: Token,
    pub dimension: Option<Dimension>,
    pub identifier: Token,
    pub ty: TypeSlot,
}

impl NameDef {
    pub fn name(&self) -> &str {
        &self.identifier.value
    }

    pub fn declared_type(&self) -> Option<Type> {
        Type::from_token_kind(self.type_token.kind)
    }
}

/// `[ width , height ]` following an image type keyword.
#[derive(Debug, Clone)]
pub struct Dimension {
    pub token: Token,
    pub width: Expr,
    pub height: Expr,
}
