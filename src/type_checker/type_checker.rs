use log::{debug, trace};

use crate::{
    ast::{
        ast::{Ast, Block, BlockElem, Declaration, Dimension, NameDef, NameDefId, Program},
        expressions::{
            BinaryExpr, ChannelSelector, ConditionalExpr, ExpandedPixelExpr, Expr, IdentExpr, PixelSelector,
            PostfixExpr, UnaryExpr,
        },
        statements::{AssignmentStatement, GuardedBlock, LValue, ReturnStatement, Statement},
        types::Type,
    },
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::{Token, TokenKind},
    Position,
};

use super::symbol_table::SymbolTable;

/// Where an expression sits during the traversal.
///
/// `LValue` marks the index expressions of an assignment target's pixel
/// selector, where unresolved bare names become synthetic INT bindings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Context {
    Expression,
    LValue,
}

#[derive(Debug, Default)]
pub struct TypeChecker {
    pub symbols: SymbolTable,
    /// Expected return types of the enclosing program units, innermost last
    pub return_types: Vec<Type>,
    synthetic_count: u32,
}

impl TypeChecker {
    pub fn new() -> Self {
        TypeChecker::default()
    }

    /// Runs `f` inside a fresh scope. The scope is closed on every exit
    /// path, errors included.
    pub fn scoped<T>(&mut self, f: impl FnOnce(&mut TypeChecker) -> Result<T, Error>) -> Result<T, Error> {
        self.symbols.enter_scope();
        let result = f(self);
        self.symbols.leave_scope();

        result
    }

    /// Binds `name` in the innermost scope to a new synthetic INT definition.
    pub fn declare_synthetic(&mut self, name: &str, position: Position) -> Result<NameDefId, Error> {
        let id = NameDefId::Synthetic(self.synthetic_count);
        self.synthetic_count += 1;

        trace!("synthetic binding for {}", name);
        self.symbols.insert(name, id, Type::Int, position)?;

        Ok(id)
    }

    pub fn declare(&mut self, name_def: &NameDef, ty: Type) -> Result<(), Error> {
        self.symbols.insert(name_def.name(), name_def.id, ty, name_def.identifier.span.start.clone())
    }
}

fn type_error(error: ErrorImpl, token: &Token) -> Error {
    Error::new(error, token.span.start.clone())
}

/// Type checks a parsed tree in place, annotating every node.
///
/// Returns the type of the root: the declared return type of a program or
/// the type of a bare expression.
pub fn type_check(ast: &mut Ast) -> Result<Type, Error> {
    let mut type_checker = TypeChecker::new();
    debug!("type checking");

    let ty = match ast {
        Ast::Program(program) => type_check_program(&mut type_checker, program)?,
        Ast::Expr(expr) => type_check_expr(&mut type_checker, expr, Context::Expression)?,
    };

    debug!("type checked, root type {}", ty);
    Ok(ty)
}

pub fn type_check_program(type_checker: &mut TypeChecker, program: &mut Program) -> Result<Type, Error> {
    let return_type = program.return_type().ok_or_else(|| {
        type_error(ErrorImpl::InvalidNameDefType { type_: program.token.value.clone() }, &program.token)
    })?;

    type_checker.return_types.push(return_type);

    let params = &mut program.params;
    let block = &mut program.block;
    let result = type_checker.scoped(|type_checker| {
        for param in params.iter_mut() {
            type_check_name_def(type_checker, param)?;
        }

        type_check_block(type_checker, block)
    });

    type_checker.return_types.pop();
    result?;

    Ok(program.ty.set(return_type))
}

pub fn type_check_block(type_checker: &mut TypeChecker, block: &mut Block) -> Result<(), Error> {
    type_checker.scoped(|type_checker| {
        for elem in block.elems.iter_mut() {
            match elem {
                BlockElem::Declaration(declaration) => {
                    type_check_declaration(type_checker, declaration)?;
                }
                BlockElem::Statement(statement) => type_check_stmt(type_checker, statement)?,
            }
        }

        Ok(())
    })
}

/// The initializer is checked before the name is bound, so it cannot refer
/// to the name being declared.
pub fn type_check_declaration(type_checker: &mut TypeChecker, declaration: &mut Declaration) -> Result<Type, Error> {
    let initializer_type = match declaration.initializer.as_mut() {
        Some(initializer) => {
            let ty = type_check_expr(type_checker, initializer, Context::Expression)?;

            match &*initializer {
                // A channel read is a single INT component
                Expr::Postfix(postfix) if postfix.channel_selector.is_some() => Some(Type::Int),
                _ => Some(ty),
            }
        }
        None => None,
    };

    let declared_type = check_name_def(type_checker, &mut declaration.name_def)?;

    if let (Some(initializer_type), Some(initializer)) = (initializer_type, declaration.initializer.as_ref()) {
        let string_to_image = initializer_type == Type::String && declared_type == Type::Image;

        if initializer_type != declared_type && !string_to_image {
            return Err(type_error(
                ErrorImpl::TypeMatchError {
                    expected: declared_type.to_string(),
                    received: initializer_type.to_string(),
                },
                initializer.get_token(),
            ));
        }
    }

    type_checker.declare(&declaration.name_def, declared_type)?;

    Ok(declared_type)
}

/// Validates a name definition and binds it in the innermost scope.
pub fn type_check_name_def(type_checker: &mut TypeChecker, name_def: &mut NameDef) -> Result<Type, Error> {
    let ty = check_name_def(type_checker, name_def)?;
    type_checker.declare(name_def, ty)?;

    Ok(ty)
}

fn check_name_def(type_checker: &mut TypeChecker, name_def: &mut NameDef) -> Result<Type, Error> {
    let ty = match name_def.declared_type() {
        Some(ty) if ty != Type::Void => ty,
        _ => {
            return Err(type_error(
                ErrorImpl::InvalidNameDefType { type_: name_def.type_token.value.clone() },
                &name_def.type_token,
            ))
        }
    };

    if let Some(dimension) = name_def.dimension.as_mut() {
        if ty != Type::Image {
            return Err(type_error(ErrorImpl::InvalidDimension { type_: ty.to_string() }, &dimension.token));
        }

        type_check_dimension(type_checker, dimension)?;
    }

    Ok(name_def.ty.set(ty))
}

pub fn type_check_dimension(type_checker: &mut TypeChecker, dimension: &mut Dimension) -> Result<(), Error> {
    expect_type(type_checker, &mut dimension.width, Type::Int, Context::Expression)?;
    expect_type(type_checker, &mut dimension.height, Type::Int, Context::Expression)?;

    Ok(())
}

/// Checks `expr` and fails unless its type is `expected`.
fn expect_type(type_checker: &mut TypeChecker, expr: &mut Expr, expected: Type, context: Context) -> Result<(), Error> {
    let received = type_check_expr(type_checker, expr, context)?;

    if received != expected {
        return Err(type_error(
            ErrorImpl::TypeMatchError { expected: expected.to_string(), received: received.to_string() },
            expr.get_token(),
        ));
    }

    Ok(())
}

pub fn type_check_stmt(type_checker: &mut TypeChecker, statement: &mut Statement) -> Result<(), Error> {
    match statement {
        Statement::Assignment(assignment) => type_check_assignment_stmt(type_checker, assignment),
        Statement::Write(write) => {
            // Any type can be written
            type_check_expr(type_checker, &mut write.value, Context::Expression)?;
            Ok(())
        }
        Statement::Return(ret) => type_check_return_stmt(type_checker, ret),
        Statement::If(if_stmt) => type_check_guarded_blocks(type_checker, &mut if_stmt.guarded_blocks),
        Statement::Do(do_stmt) => {
            // One scope shared by every alternative of the loop
            type_checker.scoped(|type_checker| type_check_guarded_blocks(type_checker, &mut do_stmt.guarded_blocks))
        }
        Statement::Block(block_stmt) => type_check_block(type_checker, &mut block_stmt.block),
    }
}

pub fn type_check_assignment_stmt(
    type_checker: &mut TypeChecker,
    assignment: &mut AssignmentStatement,
) -> Result<(), Error> {
    let lvalue_type = if assignment.lvalue.pixel_selector.is_some() {
        let lvalue = &mut assignment.lvalue;
        type_checker.scoped(|type_checker| type_check_lvalue(type_checker, lvalue, Context::LValue))?
    } else {
        type_check_lvalue(type_checker, &mut assignment.lvalue, Context::Expression)?
    };

    let value_type = type_check_expr(type_checker, &mut assignment.value, Context::Expression)?;

    let compatible = lvalue_type == value_type
        || matches!(
            (lvalue_type, value_type),
            (Type::Pixel, Type::Int) | (Type::Image, Type::Pixel | Type::Int | Type::String)
        );

    if !compatible {
        return Err(type_error(
            ErrorImpl::TypeMatchError { expected: lvalue_type.to_string(), received: value_type.to_string() },
            assignment.value.get_token(),
        ));
    }

    Ok(())
}

pub fn type_check_return_stmt(type_checker: &mut TypeChecker, ret: &mut ReturnStatement) -> Result<(), Error> {
    let received = type_check_expr(type_checker, &mut ret.value, Context::Expression)?;

    let expected = *type_checker
        .return_types
        .last()
        .ok_or_else(|| type_error(ErrorImpl::ReturnOutsideFunction, &ret.token))?;

    if received != expected {
        return Err(type_error(
            ErrorImpl::ReturnTypeMismatch { expected: expected.to_string(), received: received.to_string() },
            ret.value.get_token(),
        ));
    }

    Ok(())
}

fn type_check_guarded_blocks(type_checker: &mut TypeChecker, guarded_blocks: &mut [GuardedBlock]) -> Result<(), Error> {
    for guarded_block in guarded_blocks.iter_mut() {
        let guard_type = type_check_expr(type_checker, &mut guarded_block.guard, Context::Expression)?;

        if guard_type != Type::Boolean {
            return Err(type_error(
                ErrorImpl::GuardNotBoolean { received: guard_type.to_string() },
                guarded_block.guard.get_token(),
            ));
        }

        type_check_block(type_checker, &mut guarded_block.block)?;
    }

    Ok(())
}

/// Resolves an assignment target and types it with the selector table
/// shared with postfix expressions.
pub fn type_check_lvalue(type_checker: &mut TypeChecker, lvalue: &mut LValue, context: Context) -> Result<Type, Error> {
    let (name_def, var_type) = type_checker
        .symbols
        .lookup(lvalue.name())
        .map(|symbol| (symbol.name_def, symbol.ty))
        .ok_or_else(|| type_error(ErrorImpl::VariableNotDeclared { variable: lvalue.name().to_string() }, &lvalue.token))?;

    lvalue.name_def = Some(name_def);

    let ty = match (var_type, lvalue.pixel_selector.as_mut(), lvalue.channel_selector.as_mut()) {
        (ty, None, None) => ty,
        (Type::Image, Some(pixel_selector), None) => {
            if context == Context::LValue {
                type_checker.scoped(|type_checker| {
                    // Coordinate names x and y are available to the selector
                    for name in ["x", "y"] {
                        if type_checker.symbols.lookup(name).is_none() {
                            type_checker.declare_synthetic(name, pixel_selector.token.span.start.clone())?;
                        }
                    }

                    type_check_pixel_selector(type_checker, pixel_selector, context)
                })?;
            } else {
                type_check_pixel_selector(type_checker, pixel_selector, context)?;
            }

            Type::Pixel
        }
        (Type::Image, Some(pixel_selector), Some(channel_selector)) => {
            type_check_pixel_selector(type_checker, pixel_selector, context)?;
            type_check_channel_selector(channel_selector)?;
            Type::Int
        }
        // Follows the postfix table, so the target stays IMAGE
        (Type::Image, None, Some(channel_selector)) => {
            type_check_channel_selector(channel_selector)?;
            Type::Image
        }
        (Type::Pixel, None, Some(channel_selector)) => {
            type_check_channel_selector(channel_selector)?;
            Type::Int
        }
        (ty, _, _) => {
            return Err(type_error(ErrorImpl::InvalidSelector { target: ty.to_string() }, &lvalue.token));
        }
    };

    Ok(lvalue.ty.set(ty))
}

/// Checks an expression and records its type on the node.
pub fn type_check_expr(type_checker: &mut TypeChecker, expr: &mut Expr, context: Context) -> Result<Type, Error> {
    let ty = match expr {
        Expr::NumLit(_) => Type::Int,
        Expr::StringLit(_) => Type::String,
        Expr::BooleanLit(_) => Type::Boolean,
        Expr::Const(constant) => {
            if constant.name() == "Z" {
                Type::Int
            } else {
                Type::Pixel
            }
        }
        Expr::Ident(ident) => type_check_ident_expr(type_checker, ident, context)?,
        Expr::Conditional(conditional) => type_check_conditional_expr(type_checker, conditional, context)?,
        Expr::Binary(binary) => type_check_binary_expr(type_checker, binary, context)?,
        Expr::Unary(unary) => type_check_unary_expr(type_checker, unary, context)?,
        Expr::Postfix(postfix) => type_check_postfix_expr(type_checker, postfix)?,
        Expr::ExpandedPixel(pixel) => type_check_expanded_pixel_expr(type_checker, pixel)?,
    };

    Ok(expr.type_slot_mut().set(ty))
}

fn type_check_ident_expr(type_checker: &mut TypeChecker, ident: &mut IdentExpr, context: Context) -> Result<Type, Error> {
    let resolved = type_checker.symbols.lookup(ident.name()).map(|symbol| (symbol.name_def, symbol.ty));

    let (name_def, ty) = match resolved {
        Some(binding) => binding,
        None if context == Context::LValue => {
            let id = type_checker.declare_synthetic(ident.name(), ident.token.span.start.clone())?;
            (id, Type::Int)
        }
        None => {
            return Err(type_error(
                ErrorImpl::VariableNotDeclared { variable: ident.name().to_string() },
                &ident.token,
            ))
        }
    };

    ident.name_def = Some(name_def);
    Ok(ty)
}

fn type_check_conditional_expr(
    type_checker: &mut TypeChecker,
    conditional: &mut ConditionalExpr,
    context: Context,
) -> Result<Type, Error> {
    let guard_type = type_check_expr(type_checker, &mut conditional.guard, context)?;

    if guard_type != Type::Boolean {
        return Err(type_error(
            ErrorImpl::GuardNotBoolean { received: guard_type.to_string() },
            conditional.guard.get_token(),
        ));
    }

    let true_type = type_check_expr(type_checker, &mut conditional.true_expr, context)?;
    let false_type = type_check_expr(type_checker, &mut conditional.false_expr, context)?;

    if true_type != false_type {
        return Err(type_error(
            ErrorImpl::TypeMatchError { expected: true_type.to_string(), received: false_type.to_string() },
            conditional.false_expr.get_token(),
        ));
    }

    Ok(true_type)
}

/// Result type of a binary operator over the given operand types, `None`
/// for an illegal combination.
pub fn binary_result_type(operator: TokenKind, left: Type, right: Type) -> Option<Type> {
    match operator {
        TokenKind::Plus if left == right => Some(left),
        TokenKind::Minus | TokenKind::Times | TokenKind::Div => match (left, right) {
            (Type::Int | Type::Pixel | Type::Image, _) if left == right => Some(left),
            (Type::Pixel | Type::Image, Type::Int) => Some(left),
            _ => None,
        },
        TokenKind::BitAnd | TokenKind::BitOr if left == Type::Pixel && right == Type::Pixel => Some(Type::Pixel),
        TokenKind::And | TokenKind::Or if left == Type::Boolean && right == Type::Boolean => Some(Type::Boolean),
        TokenKind::Lt | TokenKind::Gt | TokenKind::Le | TokenKind::Ge if left == Type::Int && right == Type::Int => {
            Some(Type::Boolean)
        }
        TokenKind::Eq if left == right => Some(Type::Boolean),
        TokenKind::Exp => match (left, right) {
            (Type::Int, Type::Int) => Some(Type::Int),
            (Type::Pixel, Type::Int) => Some(Type::Pixel),
            _ => None,
        },
        _ => None,
    }
}

fn type_check_binary_expr(type_checker: &mut TypeChecker, binary: &mut BinaryExpr, context: Context) -> Result<Type, Error> {
    let left = type_check_expr(type_checker, &mut binary.left, context)?;
    let right = type_check_expr(type_checker, &mut binary.right, context)?;

    binary_result_type(binary.operator.kind, left, right).ok_or_else(|| {
        type_error(
            ErrorImpl::InvalidBinaryOperands {
                operator: binary.operator.value.clone(),
                left: left.to_string(),
                right: right.to_string(),
            },
            &binary.operator,
        )
    })
}

fn type_check_unary_expr(type_checker: &mut TypeChecker, unary: &mut UnaryExpr, context: Context) -> Result<Type, Error> {
    let operand = type_check_expr(type_checker, &mut unary.expr, context)?;

    match (unary.operator.kind, operand) {
        (TokenKind::Minus, Type::Int) => Ok(Type::Int),
        (TokenKind::Bang, Type::Boolean) => Ok(Type::Boolean),
        (TokenKind::Width | TokenKind::Height, Type::Image) => Ok(Type::Int),
        _ => Err(type_error(
            ErrorImpl::InvalidUnaryOperand { operator: unary.operator.value.clone(), operand: operand.to_string() },
            &unary.operator,
        )),
    }
}

fn type_check_postfix_expr(type_checker: &mut TypeChecker, postfix: &mut PostfixExpr) -> Result<Type, Error> {
    let primary = type_check_expr(type_checker, &mut postfix.primary, Context::Expression)?;

    if let Some(pixel_selector) = postfix.pixel_selector.as_mut() {
        type_check_pixel_selector(type_checker, pixel_selector, Context::Expression)?;
    }
    if let Some(channel_selector) = postfix.channel_selector.as_mut() {
        type_check_channel_selector(channel_selector)?;
    }

    match (primary, postfix.pixel_selector.is_some(), postfix.channel_selector.is_some()) {
        (ty, false, false) => Ok(ty),
        (Type::Image, true, false) => Ok(Type::Pixel),
        (Type::Image, true, true) => Ok(Type::Int),
        (Type::Image, false, true) => Ok(Type::Image),
        (Type::Pixel, false, true) => Ok(Type::Int),
        (ty, _, _) => Err(type_error(ErrorImpl::InvalidSelector { target: ty.to_string() }, &postfix.token)),
    }
}

/// Both indexes must be INT. In l-value context the indexes are checked in
/// their own scope, and any undeclared name inside an index is bound there
/// as a synthetic INT.
pub fn type_check_pixel_selector(
    type_checker: &mut TypeChecker,
    pixel_selector: &mut PixelSelector,
    context: Context,
) -> Result<(), Error> {
    match context {
        Context::LValue => type_checker.scoped(|type_checker| check_pixel_indices(type_checker, pixel_selector, context)),
        Context::Expression => check_pixel_indices(type_checker, pixel_selector, context),
    }
}

fn check_pixel_indices(type_checker: &mut TypeChecker, pixel_selector: &mut PixelSelector, context: Context) -> Result<(), Error> {
    for index in [pixel_selector.x.as_mut(), pixel_selector.y.as_mut()] {
        expect_type(type_checker, index, Type::Int, context)?;
    }

    Ok(())
}

pub fn type_check_channel_selector(channel_selector: &mut ChannelSelector) -> Result<Type, Error> {
    if !channel_selector.color.kind.is_color_channel() {
        return Err(type_error(
            ErrorImpl::InvalidSelector { target: channel_selector.color.value.clone() },
            &channel_selector.color,
        ));
    }

    Ok(channel_selector.ty.set(Type::Int))
}

fn type_check_expanded_pixel_expr(type_checker: &mut TypeChecker, pixel: &mut ExpandedPixelExpr) -> Result<Type, Error> {
    for component in [pixel.red.as_mut(), pixel.green.as_mut(), pixel.blue.as_mut()] {
        expect_type(type_checker, component, Type::Int, Context::Expression)?;
    }

    Ok(Type::Pixel)
}
