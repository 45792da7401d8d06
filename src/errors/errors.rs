use std::fmt::Display;

use thiserror::Error;

use crate::Position;

/// The three disjoint failure classes of the front end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Lexical,
    Syntax,
    TypeCheck,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::Lexical => write!(f, "lexical"),
            ErrorKind::Syntax => write!(f, "syntax"),
            ErrorKind::TypeCheck => write!(f, "type check"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Error {
    internal_error: ErrorImpl,
    position: Position,
}

impl Error {
    pub fn new(error_impl: ErrorImpl, position: Position) -> Self {
        Error {
            internal_error: error_impl,
            position,
        }
    }

    pub fn get_position(&self) -> &Position {
        &self.position
    }

    pub fn get_internal_error(&self) -> &ErrorImpl {
        &self.internal_error
    }

    pub fn kind(&self) -> ErrorKind {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. }
            | ErrorImpl::UnterminatedString
            | ErrorImpl::UnterminatedComment
            | ErrorImpl::NumberTooLarge { .. }
            | ErrorImpl::LexerFailed => ErrorKind::Lexical,
            ErrorImpl::UnexpectedToken { .. }
            | ErrorImpl::UnexpectedTokenDetailed { .. }
            | ErrorImpl::TrailingTokens { .. } => ErrorKind::Syntax,
            ErrorImpl::VariableAlreadyDeclared { .. }
            | ErrorImpl::VariableNotDeclared { .. }
            | ErrorImpl::TypeMatchError { .. }
            | ErrorImpl::InvalidBinaryOperands { .. }
            | ErrorImpl::InvalidUnaryOperand { .. }
            | ErrorImpl::InvalidSelector { .. }
            | ErrorImpl::InvalidNameDefType { .. }
            | ErrorImpl::InvalidDimension { .. }
            | ErrorImpl::GuardNotBoolean { .. }
            | ErrorImpl::ReturnTypeMismatch { .. }
            | ErrorImpl::ReturnOutsideFunction => ErrorKind::TypeCheck,
        }
    }

    pub fn get_error_name(&self) -> &str {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } => "UnrecognisedToken",
            ErrorImpl::UnterminatedString => "UnterminatedString",
            ErrorImpl::UnterminatedComment => "UnterminatedComment",
            ErrorImpl::NumberTooLarge { .. } => "NumberTooLarge",
            ErrorImpl::LexerFailed => "LexerFailed",
            ErrorImpl::UnexpectedToken { .. } => "UnexpectedToken",
            ErrorImpl::UnexpectedTokenDetailed { .. } => "UnexpectedTokenDetailed",
            ErrorImpl::TrailingTokens { .. } => "TrailingTokens",
            ErrorImpl::VariableAlreadyDeclared { .. } => "VariableAlreadyDeclared",
            ErrorImpl::VariableNotDeclared { .. } => "VariableNotDeclared",
            ErrorImpl::TypeMatchError { .. } => "TypeMatchError",
            ErrorImpl::InvalidBinaryOperands { .. } => "InvalidBinaryOperands",
            ErrorImpl::InvalidUnaryOperand { .. } => "InvalidUnaryOperand",
            ErrorImpl::InvalidSelector { .. } => "InvalidSelector",
            ErrorImpl::InvalidNameDefType { .. } => "InvalidNameDefType",
            ErrorImpl::InvalidDimension { .. } => "InvalidDimension",
            ErrorImpl::GuardNotBoolean { .. } => "GuardNotBoolean",
            ErrorImpl::ReturnTypeMismatch { .. } => "ReturnTypeMismatch",
            ErrorImpl::ReturnOutsideFunction => "ReturnOutsideFunction",
        }
    }

    pub fn get_tip(&self) -> ErrorTip {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } | ErrorImpl::LexerFailed => ErrorTip::None,
            ErrorImpl::UnterminatedString => ErrorTip::Suggestion(String::from(
                "String literals must be closed on the line they start",
            )),
            ErrorImpl::UnterminatedComment => {
                ErrorTip::Suggestion(String::from("Block comments must be closed with `*/`"))
            }
            ErrorImpl::NumberTooLarge { token } => ErrorTip::Suggestion(format!(
                "Invalid number: `{}`, numerals are limited to 10 digits",
                token
            )),
            ErrorImpl::UnexpectedToken { expected, found } => ErrorTip::Suggestion(format!(
                "Expected `{}` but found `{}`",
                expected, found
            )),
            ErrorImpl::UnexpectedTokenDetailed { token, message } => {
                ErrorTip::Suggestion(format!("Unexpected token: `{}`, {}", token, message))
            }
            ErrorImpl::TrailingTokens { token } => ErrorTip::Suggestion(format!(
                "Unexpected `{}` after the end of the program",
                token
            )),
            ErrorImpl::VariableAlreadyDeclared { variable } => ErrorTip::Suggestion(format!(
                "Variable `{}` already declared in this block",
                variable
            )),
            ErrorImpl::VariableNotDeclared { variable } => {
                ErrorTip::Suggestion(format!("Variable `{}` not declared", variable))
            }
            ErrorImpl::TypeMatchError { expected, received } => ErrorTip::Suggestion(format!(
                "Expected type `{}`, received `{}`",
                expected, received
            )),
            ErrorImpl::InvalidBinaryOperands {
                operator,
                left,
                right,
            } => ErrorTip::Suggestion(format!(
                "Operator `{}` cannot be applied to `{}` and `{}`",
                operator, left, right
            )),
            ErrorImpl::InvalidUnaryOperand { operator, operand } => ErrorTip::Suggestion(
                format!("Operator `{}` cannot be applied to `{}`", operator, operand),
            ),
            ErrorImpl::InvalidSelector { target } => ErrorTip::Suggestion(format!(
                "This selector combination cannot be applied to `{}`",
                target
            )),
            ErrorImpl::InvalidNameDefType { type_ } => {
                ErrorTip::Suggestion(format!("Variables cannot have type `{}`", type_))
            }
            ErrorImpl::InvalidDimension { type_ } => ErrorTip::Suggestion(format!(
                "Only images take a dimension, found `{}`",
                type_
            )),
            ErrorImpl::GuardNotBoolean { received } => ErrorTip::Suggestion(format!(
                "Guards must be `BOOLEAN`, received `{}`",
                received
            )),
            ErrorImpl::ReturnTypeMismatch { expected, received } => ErrorTip::Suggestion(format!(
                "Function returns `{}`, but `{}` was returned",
                expected, received
            )),
            ErrorImpl::ReturnOutsideFunction => {
                ErrorTip::Suggestion(String::from("`^` can only be used inside a program body"))
            }
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} error at {}:{}: {}",
            self.kind(),
            self.position.line,
            self.position.column,
            self.internal_error
        )
    }
}

impl std::error::Error for Error {}

pub enum ErrorTip {
    None,
    Suggestion(String),
}

impl Display for ErrorTip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorTip::None => write!(f, ""),
            ErrorTip::Suggestion(suggestion) => write!(f, "{}", suggestion),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ErrorImpl {
    // Lexical
    #[error("unrecognised token: {token:?}")]
    UnrecognisedToken { token: String },
    #[error("unterminated string literal")]
    UnterminatedString,
    #[error("unterminated block comment")]
    UnterminatedComment,
    #[error("numeric literal too large: {token:?}")]
    NumberTooLarge { token: String },
    #[error("lexer already failed")]
    LexerFailed,

    // Syntax
    #[error("expected {expected} but found {found}")]
    UnexpectedToken { expected: String, found: String },
    #[error("unexpected token ({message}): {token:?}")]
    UnexpectedTokenDetailed { token: String, message: String },
    #[error("expected end of input but found {token:?}")]
    TrailingTokens { token: String },

    // Type checking
    #[error("variable {variable:?} already declared")]
    VariableAlreadyDeclared { variable: String },
    #[error("variable {variable:?} not declared")]
    VariableNotDeclared { variable: String },
    #[error("types do not match: expected {expected}, received {received}")]
    TypeMatchError { expected: String, received: String },
    #[error("invalid operand types for {operator:?}: {left}, {right}")]
    InvalidBinaryOperands {
        operator: String,
        left: String,
        right: String,
    },
    #[error("invalid operand type for {operator:?}: {operand}")]
    InvalidUnaryOperand { operator: String, operand: String },
    #[error("invalid selector combination on {target}")]
    InvalidSelector { target: String },
    #[error("invalid type for a name definition: {type_}")]
    InvalidNameDefType { type_: String },
    #[error("dimension given for non-image type {type_}")]
    InvalidDimension { type_: String },
    #[error("guard must be BOOLEAN, received {received}")]
    GuardNotBoolean { received: String },
    #[error("return type mismatch: expected {expected}, received {received}")]
    ReturnTypeMismatch { expected: String, received: String },
    #[error("return statement with no enclosing function")]
    ReturnOutsideFunction,
}
