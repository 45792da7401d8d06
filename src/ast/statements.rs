use crate::lexer::tokens::Token;

use super::{
    ast::{Block, NameDefId},
    expressions::{ChannelSelector, Expr, PixelSelector},
    types::TypeSlot,
};

/// Statement Types
#[derive(Debug, Clone)]
pub enum Statement {
    Assignment(AssignmentStatement),
    Write(WriteStatement),
    Return(ReturnStatement),
    If(IfStatement),
    Do(DoStatement),
    Block(StatementBlock),
}

/// `LValue = Expr`
#[derive(Debug, Clone)]
pub struct AssignmentStatement {
    pub token: Token,
    pub lvalue: LValue,
    pub value: Expr,
}

/// `write Expr`
#[derive(Debug, Clone)]
pub struct WriteStatement {
    pub token: Token,
    pub value: Expr,
}

/// `^ Expr`
#[derive(Debug, Clone)]
pub struct ReturnStatement {
    pub token: Token,
    pub value: Expr,
}

/// `if GuardedBlock ([] GuardedBlock)* fi`
#[derive(Debug, Clone)]
pub struct IfStatement {
    pub token: Token,
    pub guarded_blocks: Vec<GuardedBlock>,
}

/// `do GuardedBlock ([] GuardedBlock)* od`
#[derive(Debug, Clone)]
pub struct DoStatement {
    pub token: Token,
    pub guarded_blocks: Vec<GuardedBlock>,
}

#[derive(Debug, Clone)]
pub struct StatementBlock {
    pub token: Token,
    pub block: Block,
}

/// `Expr -> Block`
#[derive(Debug, Clone)]
pub struct GuardedBlock {
    pub token: Token,
    pub guard: Expr,
    pub block: Block,
}

/// Assignment target: `IDENT PixelSelector? ChannelSelector?`
#[derive(Debug, Clone)]
pub struct LValue {
    pub token: Token,
    pub pixel_selector: Option<PixelSelector>,
    pub channel_selector: Option<ChannelSelector>,
    pub ty: TypeSlot,
    pub name_def: Option<NameDefId>,
}

impl LValue {
    pub fn name(&self) -> &str {
        &self.token.value
    }
}
