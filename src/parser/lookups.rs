use std::collections::HashMap;

use lazy_static::lazy_static;

use crate::{ast::statements::Statement, errors::errors::Error, lexer::tokens::TokenKind};

use super::{parser::Parser, stmt::*};

/// Precedence levels, loosest first.
#[derive(PartialEq, PartialOrd, Clone, Copy, Debug)]
pub enum BindingPower {
    Default,
    LogicalOr,
    LogicalAnd,
    Relational,
    Power,
    Additive,
    Multiplicative,
    Unary,
    Postfix,
    Primary,
}

impl BindingPower {
    /// The level whose expressions form the operands of this one.
    pub fn next(self) -> BindingPower {
        match self {
            BindingPower::Default => BindingPower::LogicalOr,
            BindingPower::LogicalOr => BindingPower::LogicalAnd,
            BindingPower::LogicalAnd => BindingPower::Relational,
            BindingPower::Relational => BindingPower::Power,
            BindingPower::Power => BindingPower::Additive,
            BindingPower::Additive => BindingPower::Multiplicative,
            BindingPower::Multiplicative => BindingPower::Unary,
            BindingPower::Unary => BindingPower::Postfix,
            BindingPower::Postfix | BindingPower::Primary => BindingPower::Primary,
        }
    }
}

lazy_static! {
    /// Binding power of every binary operator token.
    pub static ref BP_LOOKUP: HashMap<TokenKind, BindingPower> = {
        let mut map = HashMap::new();
        // Logical and bitwise share a level
        map.insert(TokenKind::Or, BindingPower::LogicalOr);
        map.insert(TokenKind::BitOr, BindingPower::LogicalOr);
        map.insert(TokenKind::And, BindingPower::LogicalAnd);
        map.insert(TokenKind::BitAnd, BindingPower::LogicalAnd);

        // Relational
        map.insert(TokenKind::Lt, BindingPower::Relational);
        map.insert(TokenKind::Gt, BindingPower::Relational);
        map.insert(TokenKind::Eq, BindingPower::Relational);
        map.insert(TokenKind::Le, BindingPower::Relational);
        map.insert(TokenKind::Ge, BindingPower::Relational);

        map.insert(TokenKind::Exp, BindingPower::Power);

        // Additive and multiplicative
        map.insert(TokenKind::Plus, BindingPower::Additive);
        map.insert(TokenKind::Minus, BindingPower::Additive);
        map.insert(TokenKind::Times, BindingPower::Multiplicative);
        map.insert(TokenKind::Div, BindingPower::Multiplicative);
        map.insert(TokenKind::Mod, BindingPower::Multiplicative);
        map
    };
}

/// Binding power of `kind` used as a binary operator, `Default` if it is not one.
pub fn binding_power(kind: TokenKind) -> BindingPower {
    *BP_LOOKUP.get(&kind).unwrap_or(&BindingPower::Default)
}

pub type StmtHandler = fn(&mut Parser) -> Result<Statement, Error>;

pub fn create_token_lookups(parser: &mut Parser) {
    parser.stmt(TokenKind::Identifier, parse_assignment_stmt);
    parser.stmt(TokenKind::Write, parse_write_stmt);
    parser.stmt(TokenKind::Return, parse_return_stmt);
    parser.stmt(TokenKind::BlockOpen, parse_block_stmt);
    parser.stmt(TokenKind::If, parse_if_stmt);
    parser.stmt(TokenKind::Do, parse_do_stmt);
}

// Lookup tables inside parser struct, so it's easier
pub type StmtLookup = HashMap<TokenKind, StmtHandler>;
