use crate::{
    ast::{
        expressions::{
            BinaryExpr, BooleanLitExpr, ChannelSelector, ConditionalExpr, ConstExpr, ExpandedPixelExpr, Expr, IdentExpr,
            NumLitExpr, PixelSelector, PostfixExpr, StringLitExpr, UnaryExpr,
        },
        types::TypeSlot,
    },
    errors::errors::Error,
    lexer::tokens::{Token, TokenKind},
};

use super::{
    lookups::{binding_power, BindingPower},
    parser::Parser,
};

/// Parses a full expression: a conditional when it starts with `?`,
/// otherwise a logical-or chain.
pub fn parse_expr(parser: &mut Parser) -> Result<Expr, Error> {
    if parser.current_token_kind() == TokenKind::Question {
        return parse_conditional_expr(parser);
    }

    parse_binary_expr(parser, BindingPower::LogicalOr)
}

pub fn parse_conditional_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let token = parser.expect(TokenKind::Question)?;
    let guard = parse_expr(parser)?;
    parser.expect(TokenKind::RArrow)?;
    let true_expr = parse_expr(parser)?;
    parser.expect(TokenKind::Comma)?;
    let false_expr = parse_expr(parser)?;

    Ok(Expr::Conditional(ConditionalExpr {
        token,
        guard: Box::new(guard),
        true_expr: Box::new(true_expr),
        false_expr: Box::new(false_expr),
        ty: TypeSlot::default(),
    }))
}

/// Parses one left-associative precedence level.
///
/// Operands come from the next tighter level. Power and unary have their
/// own shapes and are dispatched to dedicated functions.
pub fn parse_binary_expr(parser: &mut Parser, bp: BindingPower) -> Result<Expr, Error> {
    match bp {
        BindingPower::Power => return parse_power_expr(parser),
        BindingPower::Unary | BindingPower::Postfix | BindingPower::Primary => return parse_unary_expr(parser),
        _ => {}
    }

    let mut left = parse_binary_expr(parser, bp.next())?;

    while binding_power(parser.current_token_kind()) == bp {
        let operator = parser.advance()?;
        let right = parse_binary_expr(parser, bp.next())?;
        left = make_binary(left, operator, right);
    }

    Ok(left)
}

/// `AdditiveExpr (** PowerExpr)?`, so `**` groups to the right.
pub fn parse_power_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let left = parse_binary_expr(parser, BindingPower::Additive)?;

    if parser.current_token_kind() != TokenKind::Exp {
        return Ok(left);
    }

    let operator = parser.advance()?;
    let right = parse_power_expr(parser)?;

    Ok(make_binary(left, operator, right))
}

fn make_binary(left: Expr, operator: Token, right: Expr) -> Expr {
    Expr::Binary(BinaryExpr {
        token: left.get_token().clone(),
        left: Box::new(left),
        operator,
        right: Box::new(right),
        ty: TypeSlot::default(),
    })
}

pub fn parse_unary_expr(parser: &mut Parser) -> Result<Expr, Error> {
    if !parser.current_token().is_one_of_many(&[TokenKind::Bang, TokenKind::Minus, TokenKind::Width, TokenKind::Height]) {
        return parse_postfix_expr(parser);
    }

    let operator = parser.advance()?;
    let expr = parse_unary_expr(parser)?;

    Ok(Expr::Unary(UnaryExpr {
        token: operator.clone(),
        operator,
        expr: Box::new(expr),
        ty: TypeSlot::default(),
    }))
}

/// A primary with optional pixel and channel selectors. Without either
/// selector the primary itself is returned.
pub fn parse_postfix_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let primary = parse_primary_expr(parser)?;

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

    if pixel_selector.is_none() && channel_selector.is_none() {
        return Ok(primary);
    }

    Ok(Expr::Postfix(PostfixExpr {
        token: primary.get_token().clone(),
        primary: Box::new(primary),
        pixel_selector,
        channel_selector,
        ty: TypeSlot::default(),
    }))
}

pub fn parse_primary_expr(parser: &mut Parser) -> Result<Expr, Error> {
    match parser.current_token_kind() {
        TokenKind::StringLit => Ok(Expr::StringLit(StringLitExpr { token: parser.advance()?, ty: TypeSlot::default() })),
        TokenKind::NumLit => Ok(Expr::NumLit(NumLitExpr { token: parser.advance()?, ty: TypeSlot::default() })),
        TokenKind::BooleanLit => Ok(Expr::BooleanLit(BooleanLitExpr { token: parser.advance()?, ty: TypeSlot::default() })),
        TokenKind::Identifier => {
            let token = parser.advance()?;

            // Lower-case spellings are not reserved but still read as booleans
            if token.value == "true" || token.value == "false" {
                return Ok(Expr::BooleanLit(BooleanLitExpr { token, ty: TypeSlot::default() }));
            }

            Ok(Expr::Ident(IdentExpr { token, ty: TypeSlot::default(), name_def: None }))
        }
        TokenKind::LParen => {
            parser.advance()?;
            let expr = parse_expr(parser)?;
            parser.expect(TokenKind::RParen)?;
            Ok(expr)
        }
        TokenKind::Const => Ok(Expr::Const(ConstExpr { token: parser.advance()?, ty: TypeSlot::default() })),
        TokenKind::LSquare => parse_expanded_pixel_expr(parser),
        _ => Err(parser.unexpected("expected an expression")),
    }
}

/// `[ r , g , b ]`
pub fn parse_expanded_pixel_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let token = parser.expect(TokenKind::LSquare)?;
    let red = parse_expr(parser)?;
    parser.expect(TokenKind::Comma)?;
    let green = parse_expr(parser)?;

    if parser.current_token_kind() != TokenKind::Comma {
        return Err(parser.unexpected("expected three components in pixel expression"));
    }
    parser.advance()?;

    let blue = parse_expr(parser)?;
    parser.expect(TokenKind::RSquare)?;

    Ok(Expr::ExpandedPixel(ExpandedPixelExpr {
        token,
        red: Box::new(red),
        green: Box::new(green),
        blue: Box::new(blue),
        ty: TypeSlot::default(),
    }))
}

/// `[ x , y ]`
pub fn parse_pixel_selector(parser: &mut Parser) -> Result<PixelSelector, Error> {
    let token = parser.expect(TokenKind::LSquare)?;
    let x = parse_expr(parser)?;
    parser.expect(TokenKind::Comma)?;
    let y = parse_expr(parser)?;
    parser.expect(TokenKind::RSquare)?;

    Ok(PixelSelector { token, x: Box::new(x), y: Box::new(y) })
}

/// `: red`, `: green` or `: blue`
pub fn parse_channel_selector(parser: &mut Parser) -> Result<ChannelSelector, Error> {
    let token = parser.expect(TokenKind::Colon)?;

    if !parser.current_token_kind().is_color_channel() {
        return Err(parser.unexpected("expected red, green or blue after ':'"));
    }

    let color = parser.advance()?;

    Ok(ChannelSelector { token, color, ty: TypeSlot::default() })
}
