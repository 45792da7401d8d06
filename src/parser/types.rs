use crate::{
    ast::{
        ast::{Dimension, NameDef},
        types::TypeSlot,
    },
    errors::errors::Error,
    lexer::tokens::{Token, TokenKind},
};

use super::{expr::parse_expr, parser::Parser};

/// Consumes one of the type keywords.
pub fn parse_type(parser: &mut Parser) -> Result<Token, Error> {
    if !parser.current_token_kind().is_type_keyword() {
        return Err(parser.unexpected("expected a type"));
    }

    parser.advance()
}

/// `Type Dimension? IDENT`
///
/// Each name definition gets a fresh identity from the parser.
pub fn parse_name_def(parser: &mut Parser) -> Result<NameDef, Error> {
    let type_token = parse_type(parser)?;

    let dimension = if parser.current_token_kind() == TokenKind::LSquare {
        Some(parse_dimension(parser)?)
    } else {
        None
    };

    let error = parser.unexpected("expected identifier in declaration");
    let identifier = parser.expect_error(TokenKind::Identifier, Some(error))?;

    Ok(NameDef {
        id: parser.advance_id(),
        type_token,
        dimension,
        identifier,
        ty: TypeSlot::default(),
    })
}

/// `[ width , height ]`
pub fn parse_dimension(parser: &mut Parser) -> Result<Dimension, Error> {
    let token = parser.expect(TokenKind::LSquare)?;
    let width = parse_expr(parser)?;
    parser.expect(TokenKind::Comma)?;
    let height = parse_expr(parser)?;
    parser.expect(TokenKind::RSquare)?;

    Ok(Dimension { token, width, height })
}

/// `( NameDef (, NameDef)* )` or `( )`
pub fn parse_param_list(parser: &mut Parser) -> Result<Vec<NameDef>, Error> {
    let mut params = Vec::new();
    parser.expect(TokenKind::LParen)?;

    if parser.current_token_kind() != TokenKind::RParen {
        params.push(parse_name_def(parser)?);

        while parser.current_token_kind() == TokenKind::Comma {
            parser.advance()?;
            params.push(parse_name_def(parser)?);
        }
    }

    parser.expect(TokenKind::RParen)?;

    Ok(params)
}
