//! Lexical analysis module for the compiler.
//!
//! This module contains the lexer (tokenizer) that converts source code
//! into a stream of tokens for parsing. It handles:
//!
//! - Tokenization of source code with a hand-written state machine
//! - Recognition of keywords, constants, identifiers, literals, and operators
//! - Line/column tracking for error reporting
//! - Comments and whitespace handling

pub mod lexer;
pub mod tokens;
