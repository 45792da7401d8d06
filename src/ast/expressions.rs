use crate::{lexer::tokens::Token, Span};

use super::{
    ast::NameDefId,
    types::{Type, TypeSlot},
};

/// Expression Types
///
/// One variant per expression node kind; the type checker matches on
/// this exhaustively.
#[derive(Debug, Clone)]
pub enum Expr {
    Conditional(ConditionalExpr),
    Binary(BinaryExpr),
    Unary(UnaryExpr),
    Postfix(PostfixExpr),
    Ident(IdentExpr),
    NumLit(NumLitExpr),
    StringLit(StringLitExpr),
    BooleanLit(BooleanLitExpr),
    Const(ConstExpr),
    ExpandedPixel(ExpandedPixelExpr),
}

impl Expr {
    /// The token that introduced this expression.
    pub fn get_token(&self) -> &Token {
        match self {
            Expr::Conditional(expr) => &expr.token,
            Expr::Binary(expr) => &expr.token,
            Expr::Unary(expr) => &expr.token,
            Expr::Postfix(expr) => &expr.token,
            Expr::Ident(expr) => &expr.token,
            Expr::NumLit(expr) => &expr.token,
            Expr::StringLit(expr) => &expr.token,
            Expr::BooleanLit(expr) => &expr.token,
            Expr::Const(expr) => &expr.token,
            Expr::ExpandedPixel(expr) => &expr.token,
        }
    }

    pub fn get_span(&self) -> &Span {
        &self.get_token().span
    }

    pub fn get_type(&self) -> Option<Type> {
        self.type_slot().get()
    }

    pub fn type_slot(&self) -> &TypeSlot {
        match self {
            Expr::Conditional(expr) => &expr.ty,
            Expr::Binary(expr) => &expr.ty,
            Expr::Unary(expr) => &expr.ty,
            Expr::Postfix(expr) => &expr.ty,
            Expr::Ident(expr) => &expr.ty,
            Expr::NumLit(expr) => &expr.ty,
            Expr::StringLit(expr) => &expr.ty,
            Expr::BooleanLit(expr) => &expr.ty,
            Expr::Const(expr) => &expr.ty,
            Expr::ExpandedPixel(expr) => &expr.ty,
        }
    }

    pub fn type_slot_mut(&mut self) -> &mut TypeSlot {
        match self {
            Expr::Conditional(expr) => &mut expr.ty,
            Expr::Binary(expr) => &mut expr.ty,
            Expr::Unary(expr) => &mut expr.ty,
            Expr::Postfix(expr) => &mut expr.ty,
            Expr::Ident(expr) => &mut expr.ty,
            Expr::NumLit(expr) => &mut expr.ty,
            Expr::StringLit(expr) => &mut expr.ty,
            Expr::BooleanLit(expr) => &mut expr.ty,
            Expr::Const(expr) => &mut expr.ty,
            Expr::ExpandedPixel(expr) => &mut expr.ty,
        }
    }
}

// LITERALS

#[derive(Debug, Clone)]
pub struct NumLitExpr {
    pub token: Token,
    pub ty: TypeSlot,
}

impl NumLitExpr {
    pub fn value(&self) -> &str {
        &self.token.value
    }
}

#[derive(Debug, Clone)]
pub struct StringLitExpr {
    pub token: Token,
    pub ty: TypeSlot,
}

impl StringLitExpr {
    /// The literal's contents without the surrounding quotes.
    pub fn value(&self) -> &str {
        let text = &self.token.value;
        &text[1..text.len() - 1]
    }
}

/// Either `TRUE`/`FALSE` or the identifiers `true`/`false`.
#[derive(Debug, Clone)]
pub struct BooleanLitExpr {
    pub token: Token,
    pub ty: TypeSlot,
}

impl BooleanLitExpr {
    pub fn value(&self) -> bool {
        self.token.value.eq_ignore_ascii_case("true")
    }
}

/// `Z` or one of the named colors.
#[derive(Debug, Clone)]
pub struct ConstExpr {
    pub token: Token,
    pub ty: TypeSlot,
}

impl ConstExpr {
    pub fn name(&self) -> &str {
        &self.token.value
    }
}

#[derive(Debug, Clone)]
pub struct IdentExpr {
    pub token: Token,
    pub ty: TypeSlot,
    /// The definition this name resolved to, filled by the type checker.
    pub name_def: Option<NameDefId>,
}

impl IdentExpr {
    pub fn name(&self) -> &str {
        &self.token.value
    }
}

// COMPLEX

/// `? guard -> true_expr , false_expr`
#[derive(Debug, Clone)]
pub struct ConditionalExpr {
    pub token: Token,
    pub guard: Box<Expr>,
    pub true_expr: Box<Expr>,
    pub false_expr: Box<Expr>,
    pub ty: TypeSlot,
}

#[derive(Debug, Clone)]
pub struct BinaryExpr {
    pub token: Token,
    pub left: Box<Expr>,
    pub operator: Token,
    pub right: Box<Expr>,
    pub ty: TypeSlot,
}

#[derive(Debug, Clone)]
pub struct UnaryExpr {
    pub token: Token,
    pub operator: Token,
    pub expr: Box<Expr>,
    pub ty: TypeSlot,
}

/// A primary followed by at least one selector.
#[derive(Debug, Clone)]
pub struct PostfixExpr {
    pub token: Token,
    pub primary: Box<Expr>,
    pub pixel_selector: Option<PixelSelector>,
    pub channel_selector: Option<ChannelSelector>,
    pub ty: TypeSlot,
}

/// `[ r , g , b ]`
#[derive(Debug, Clone)]
pub struct ExpandedPixelExpr {
    pub token: Token,
    pub red: Box<Expr>,
    pub green: Box<Expr>,
    pub blue: Box<Expr>,
    pub ty: TypeSlot,
}

// SELECTORS

/// `[ x , y ]`
#[derive(Debug, Clone)]
pub struct PixelSelector {
    pub token: Token,
    pub x: Box<Expr>,
    pub y: Box<Expr>,
}

/// `: red`, `: green` or `: blue`
#[derive(Debug, Clone)]
pub struct ChannelSelector {
    pub token: Token,
    pub color: Token,
    pub ty: TypeSlot,
}
