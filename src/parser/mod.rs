//! Parser module for building an Abstract Syntax Tree (AST).
//!
//! This module contains a recursive-descent parser that pulls tokens from
//! the lexer with one token of lookahead. It handles:
//!
//! - Programs, blocks and declarations
//! - Statements, dispatched through a lookup table keyed by the leading token
//! - Expressions, one function per precedence level
//! - Type keywords, name definitions and image dimensions

pub mod expr;
pub mod lookups;
pub mod parser;
pub mod stmt;
pub mod types;
