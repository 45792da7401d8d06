//! Parser implementation for building the Abstract Syntax Tree.
//!
//! This module contains the main Parser struct and the parse entry point.
//! The parser pulls tokens from the lexer on demand and keeps exactly one
//! token of lookahead; it never backtracks.

use std::{collections::HashMap, rc::Rc};

use log::debug;

use crate::{
    ast::ast::{Ast, NameDefId},
    errors::errors::{Error, ErrorImpl},
    lexer::{
        lexer::Lexer,
        tokens::{Token, TokenKind},
    },
    Position,
};

use super::{
    expr::parse_expr,
    lookups::{create_token_lookups, StmtHandler, StmtLookup},
    stmt::parse_program,
};

/// The main parser structure that maintains parsing state.
pub struct Parser {
    /// Source of tokens, pulled one at a time
    lexer: Lexer,
    /// The single token of lookahead
    token: Token,
    /// The name of the source being parsed
    file: Rc<String>,
    /// Lookup table for statement parsing handlers
    stmt_lookup: StmtLookup,
    /// Counter for numbering name definitions
    current_id: u32,
}

impl Parser {
    /// Creates a new Parser and reads the first token.
    ///
    /// Fails if the very first token is lexically invalid.
    pub fn new(source: &str, file: Option<String>) -> Result<Self, Error> {
        let mut lexer = Lexer::new(source, file);
        let token = lexer.next_token()?;

        let mut parser = Parser {
            file: lexer.file(),
            lexer,
            token,
            stmt_lookup: HashMap::new(),
            current_id: 0,
        };
        create_token_lookups(&mut parser);

        Ok(parser)
    }

    /// Returns the current token without advancing.
    pub fn current_token(&self) -> &Token {
        &self.token
    }

    /// Returns the kind of the current token.
    pub fn current_token_kind(&self) -> TokenKind {
        self.token.kind
    }

    /// Advances to the next token and returns the previous token.
    pub fn advance(&mut self) -> Result<Token, Error> {
        let next = self.lexer.next_token()?;
        Ok(std::mem::replace(&mut self.token, next))
    }

    /// Expects a token of the specified kind, with optional custom error.
    ///
    /// # Returns
    ///
    /// Returns Ok(Token) if the current token matches, otherwise returns an Error.
    pub fn expect_error(
        &mut self,
        expected_kind: TokenKind,
        error: Option<Error>,
    ) -> Result<Token, Error> {
        if self.token.kind != expected_kind {
            match error {
                Some(error) => Err(error),
                None => Err(Error::new(
                    ErrorImpl::UnexpectedToken {
                        expected: expected_kind.to_string(),
                        found: self.token.kind.to_string(),
                    },
                    self.get_position(),
                )),
            }
        } else {
            self.advance()
        }
    }

    /// Expects a token of the specified kind with default error message.
    pub fn expect(&mut self, expected_kind: TokenKind) -> Result<Token, Error> {
        self.expect_error(expected_kind, None)
    }

    /// Builds a syntax error about the current token.
    pub fn unexpected(&self, message: &str) -> Error {
        Error::new(
            ErrorImpl::UnexpectedTokenDetailed {
                token: self.token.value.clone(),
                message: String::from(message),
            },
            self.get_position(),
        )
    }

    /// Returns true if the current token is not EOF.
    pub fn has_tokens(&self) -> bool {
        self.current_token_kind() != TokenKind::EOF
    }

    /// Returns a reference to the statement lookup table.
    pub fn get_stmt_lookup(&self) -> &StmtLookup {
        &self.stmt_lookup
    }

    /// Registers a statement handler for a token.
    pub fn stmt(&mut self, kind: TokenKind, stmt_fn: StmtHandler) {
        self.stmt_lookup.insert(kind, stmt_fn);
    }

    /// Hands out the identity for the next name definition.
    pub fn advance_id(&mut self) -> NameDefId {
        let id = self.current_id;
        self.current_id += 1;
        NameDefId::Declared(id)
    }

    /// Returns the position of the current token.
    pub fn get_position(&self) -> Position {
        self.token.span.start.clone()
    }

    pub fn get_file(&self) -> Rc<String> {
        Rc::clone(&self.file)
    }
}

/// Parses source text into an Abstract Syntax Tree.
///
/// Input starting with a type keyword is a program; anything else is
/// parsed as a single bare expression. Tokens left over after either form
/// are a syntax error.
pub fn parse(source: &str, file: Option<String>) -> Result<Ast, Error> {
    let mut parser = Parser::new(source, file)?;
    debug!("parsing {}", parser.get_file());

    let ast = if parser.current_token_kind().is_type_keyword() {
        Ast::Program(parse_program(&mut parser)?)
    } else {
        Ast::Expr(parse_expr(&mut parser)?)
    };

    if parser.has_tokens() {
        return Err(Error::new(
            ErrorImpl::TrailingTokens {
                token: parser.current_token().value.clone(),
            },
            parser.get_position(),
        ));
    }

    debug!("parsed {}", parser.get_file());
    Ok(ast)
}
