#![allow(clippy::module_inception)]

use std::{fmt::Display, rc::Rc};

use crate::{
    ast::ast::Ast, errors::errors::Error, parser::parser::parse,
    type_checker::type_checker::type_check,
};

pub mod ast;
pub mod errors;
pub mod lexer;
pub mod macros;
pub mod parser;
pub mod type_checker;

/// A point in the source text. Lines and columns both start at 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    pub line: u32,
    pub column: u32,
    pub file: Rc<String>,
}

impl Position {
    pub fn new(line: u32, column: u32, file: Rc<String>) -> Self {
        Position { line, column, file }
    }

    pub fn null() -> Self {
        Position::new(0, 0, Rc::new(String::from("<null>")))
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.column)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

/// Runs the whole front end over `source`: tokenizing, parsing and type checking.
///
/// On success every node of the returned tree carries its type.
pub fn compile(source: &str, file: Option<String>) -> Result<Ast, Error> {
    let mut ast = parse(source, file)?;
    type_check(&mut ast)?;
    Ok(ast)
}
