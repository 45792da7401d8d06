use crate::{
    ast::{
        ast::{Block, BlockElem, Declaration, Program},
        statements::{
            AssignmentStatement, DoStatement, GuardedBlock, IfStatement, LValue, ReturnStatement, Statement,
            StatementBlock, WriteStatement,
        },
        types::TypeSlot,
    },
    errors::errors::Error,
    lexer::tokens::TokenKind,
};

use super::{
    expr::{parse_channel_selector, parse_expr, parse_pixel_selector},
    parser::Parser,
    types::{parse_name_def, parse_param_list, parse_type},
};

/// `Type IDENT ( ParamList ) Block`
pub fn parse_program(parser: &mut Parser) -> Result<Program, Error> {
    let token = parse_type(parser)?;

    let error = parser.unexpected("expected program name");
    let identifier = parser.expect_error(TokenKind::Identifier, Some(error))?;

    let params = parse_param_list(parser)?;
    let block = parse_block(parser)?;

    Ok(Program { token, identifier, params, block, ty: TypeSlot::default() })
}

/// `<: ((Declaration | Statement) ;)* :>`
pub fn parse_block(parser: &mut Parser) -> Result<Block, Error> {
    let token = parser.expect(TokenKind::BlockOpen)?;
    let mut elems = Vec::new();

    while parser.has_tokens() && parser.current_token_kind() != TokenKind::BlockClose {
        if parser.current_token_kind().is_type_keyword() {
            elems.push(BlockElem::Declaration(parse_declaration(parser)?));
        } else {
            elems.push(BlockElem::Statement(parse_stmt(parser)?));
        }

        parser.expect(TokenKind::Semi)?;
    }

    parser.expect(TokenKind::BlockClose)?;

    Ok(Block { token, elems })
}

/// `NameDef (= Expr)?`
pub fn parse_declaration(parser: &mut Parser) -> Result<Declaration, Error> {
    let token = parser.current_token().clone();
    let name_def = parse_name_def(parser)?;

    let initializer = if parser.current_token_kind() == TokenKind::Assign {
        parser.advance()?;
        Some(parse_expr(parser)?)
    } else {
        None
    };

    Ok(Declaration { token, name_def, initializer })
}

pub fn parse_stmt(parser: &mut Parser) -> Result<Statement, Error> {
    let handler = parser.get_stmt_lookup().get(&parser.current_token_kind()).copied();

    match handler {
        Some(handler) => handler(parser),
        None => Err(parser.unexpected("expected a statement")),
    }
}

/// `LValue = Expr`
pub fn parse_assignment_stmt(parser: &mut Parser) -> Result<Statement, Error> {
    let token = parser.current_token().clone();
    let lvalue = parse_lvalue(parser)?;
    parser.expect(TokenKind::Assign)?;
    let value = parse_expr(parser)?;

    Ok(Statement::Assignment(AssignmentStatement { token, lvalue, value }))
}

/// `IDENT PixelSelector? ChannelSelector?`
pub fn parse_lvalue(parser: &mut Parser) -> Result<LValue, Error> {
    let token = parser.expect(TokenKind::Identifier)?;

    let pixel_selector = if parser.current_token_kind() == TokenKind::LSquare {
        Some(parse_pixel_selector(parser)?)
    } else {
        None
    };

    let channel_selector = if parser.current_token_kind() == TokenKind::Colon {
        Some(parse_channel_selector(parser)?)
    } else {
        None
    };

    Ok(LValue { token, pixel_selector, channel_selector, ty: TypeSlot::default(), name_def: None })
}

pub fn parse_write_stmt(parser: &mut Parser) -> Result<Statement, Error> {
    let token = parser.expect(TokenKind::Write)?;
    let value = parse_expr(parser)?;

    Ok(Statement::Write(WriteStatement { token, value }))
}

pub fn parse_return_stmt(parser: &mut Parser) -> Result<Statement, Error> {
    let token = parser.expect(TokenKind::Return)?;
    let value = parse_expr(parser)?;

    Ok(Statement::Return(ReturnStatement { token, value }))
}

pub fn parse_block_stmt(parser: &mut Parser) -> Result<Statement, Error> {
    let token = parser.current_token().clone();
    let block = parse_block(parser)?;

    Ok(Statement::Block(StatementBlock { token, block }))
}

pub fn parse_if_stmt(parser: &mut Parser) -> Result<Statement, Error> {
    let token = parser.expect(TokenKind::If)?;
    let guarded_blocks = parse_guarded_blocks(parser)?;
    parser.expect(TokenKind::Fi)?;

    Ok(Statement::If(IfStatement { token, guarded_blocks }))
}

pub fn parse_do_stmt(parser: &mut Parser) -> Result<Statement, Error> {
    let token = parser.expect(TokenKind::Do)?;
    let guarded_blocks = parse_guarded_blocks(parser)?;
    parser.expect(TokenKind::Od)?;

    Ok(Statement::Do(DoStatement { token, guarded_blocks }))
}

/// `GuardedBlock ([] GuardedBlock)*`
fn parse_guarded_blocks(parser: &mut Parser) -> Result<Vec<GuardedBlock>, Error> {
    let mut guarded_blocks = vec![parse_guarded_block(parser)?];

    while parser.current_token_kind() == TokenKind::Box {
        parser.advance()?;
        guarded_blocks.push(parse_guarded_block(parser)?);
    }

    Ok(guarded_blocks)
}

/// `Expr -> Block`
fn parse_guarded_block(parser: &mut Parser) -> Result<GuardedBlock, Error> {
    let token = parser.current_token().clone();
    let guard = parse_expr(parser)?;
    parser.expect(TokenKind::RArrow)?;
    let block = parse_block(parser)?;

    Ok(GuardedBlock { token, guard, block })
}
