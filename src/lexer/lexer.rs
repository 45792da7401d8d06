use std::rc::Rc;

use log::trace;

use crate::{
    errors::errors::{Error, ErrorImpl},
    Position, Span, MK_TOKEN,
};

use super::tokens::{Token, TokenKind, RESERVED_LOOKUP};

/// Longest numeral the lexer accepts.
pub const MAX_NUMERAL_DIGITS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Start,
    InIdent,
    InString,
    InNum,
    HaveZero,
    HaveEq,
    HaveMinus,
    HaveLt,
    HaveGt,
    HaveAmp,
    HaveLSquare,
    HaveColon,
}

/// Pull-based tokenizer.
///
/// Each call to [`Lexer::next_token`] runs the state machine from the start
/// state until exactly one token has been recognised. Once the input is
/// exhausted every further call yields another `EOF` token. A lexical error
/// leaves the lexer failed: later calls report [`ErrorImpl::LexerFailed`].
#[derive(Debug, Clone)]
pub struct Lexer {
    chars: Vec<char>,
    pos: usize,
    line: u32,
    column: u32,
    file: Rc<String>,
    state: State,
    token_start: usize,
    token_start_position: Position,
    reached_eof: bool,
    failed: bool,
}

impl Lexer {
    pub fn new(source: &str, file: Option<String>) -> Lexer {
        let file = if let Some(file) = file {
            Rc::new(file)
        } else {
            Rc::new(String::from("shell"))
        };

        Lexer {
            chars: source.chars().collect(),
            pos: 0,
            line: 1,
            column: 1,
            token_start: 0,
            token_start_position: Position::new(1, 1, Rc::clone(&file)),
            state: State::Start,
            reached_eof: false,
            failed: false,
            file,
        }
    }

    pub fn file(&self) -> Rc<String> {
        Rc::clone(&self.file)
    }

    /// Produces the next token of the input.
    pub fn next_token(&mut self) -> Result<Token, Error> {
        if self.failed {
            return Err(Error::new(ErrorImpl::LexerFailed, self.get_position()));
        }
        if self.reached_eof {
            return Ok(self.eof_token());
        }

        let result = self.scan();
        match &result {
            Ok(token) => trace!("token {} at {}", token, token.span.start),
            Err(_) => self.failed = true,
        }
        result
    }

    fn scan(&mut self) -> Result<Token, Error> {
        self.state = State::Start;

        loop {
            let ch = self.at();
            let token = match self.state {
                State::Start => self.handle_start(ch)?,
                State::InIdent => self.handle_ident(ch),
                State::InString => self.handle_string(ch)?,
                State::InNum => self.handle_number(ch)?,
                State::HaveZero => Some(self.emit(TokenKind::NumLit)),
                State::HaveEq => Some(self.resolve(ch, &[('=', TokenKind::Eq)], TokenKind::Assign)),
                State::HaveMinus => {
                    Some(self.resolve(ch, &[('>', TokenKind::RArrow)], TokenKind::Minus))
                }
                State::HaveLt => Some(self.resolve(
                    ch,
                    &[('=', TokenKind::Le), (':', TokenKind::BlockOpen)],
                    TokenKind::Lt,
                )),
                State::HaveGt => Some(self.resolve(ch, &[('=', TokenKind::Ge)], TokenKind::Gt)),
                State::HaveAmp => {
                    Some(self.resolve(ch, &[('&', TokenKind::And)], TokenKind::BitAnd))
                }
                State::HaveLSquare => {
                    Some(self.resolve(ch, &[(']', TokenKind::Box)], TokenKind::LSquare))
                }
                State::HaveColon => {
                    Some(self.resolve(ch, &[('>', TokenKind::BlockClose)], TokenKind::Colon))
                }
            };

            if let Some(token) = token {
                self.state = State::Start;
                return Ok(token);
            }
        }
    }

    fn handle_start(&mut self, ch: Option<char>) -> Result<Option<Token>, Error> {
        let Some(ch) = ch else {
            self.reached_eof = true;
            self.mark_start();
            return Ok(Some(self.emit(TokenKind::EOF)));
        };

        match ch {
            ' ' | '\t' | '\r' | '\n' => {
                self.advance();
                return Ok(None);
            }
            '#' if self.peek() == Some('#') => {
                while !matches!(self.at(), Some('\n') | None) {
                    self.advance();
                }
                return Ok(None);
            }
            '/' if self.peek() == Some('*') => {
                self.skip_block_comment()?;
                return Ok(None);
            }
            _ => {}
        }

        self.mark_start();
        self.advance();

        let token = match ch {
            '+' => self.emit(TokenKind::Plus),
            ',' => self.emit(TokenKind::Comma),
            ';' => self.emit(TokenKind::Semi),
            '?' => self.emit(TokenKind::Question),
            '(' => self.emit(TokenKind::LParen),
            ')' => self.emit(TokenKind::RParen),
            ']' => self.emit(TokenKind::RSquare),
            '!' => self.emit(TokenKind::Bang),
            '%' => self.emit(TokenKind::Mod),
            '^' => self.emit(TokenKind::Return),
            '/' => self.emit(TokenKind::Div),
            '*' => self.resolve(self.at(), &[('*', TokenKind::Exp)], TokenKind::Times),
            '|' => self.resolve(self.at(), &[('|', TokenKind::Or)], TokenKind::BitOr),
            _ => {
                self.state = match ch {
                    '=' => State::HaveEq,
                    '-' => State::HaveMinus,
                    '<' => State::HaveLt,
                    '>' => State::HaveGt,
                    '&' => State::HaveAmp,
                    '[' => State::HaveLSquare,
                    ':' => State::HaveColon,
                    '"' => State::InString,
                    '0' => State::HaveZero,
                    c if c.is_ascii_digit() => State::InNum,
                    c if c.is_alphabetic() || c == '_' => State::InIdent,
                    _ => {
                        return Err(Error::new(
                            ErrorImpl::UnrecognisedToken {
                                token: ch.to_string(),
                            },
                            self.token_start_position.clone(),
                        ))
                    }
                };
                return Ok(None);
            }
        };

        Ok(Some(token))
    }

    fn handle_ident(&mut self, ch: Option<char>) -> Option<Token> {
        match ch {
            Some(c) if c.is_alphanumeric() || c == '_' => {
                self.advance();
                None
            }
            _ => {
                let kind = *RESERVED_LOOKUP
                    .get(self.lexeme().as_str())
                    .unwrap_or(&TokenKind::Identifier);
                Some(self.emit(kind))
            }
        }
    }

    fn handle_string(&mut self, ch: Option<char>) -> Result<Option<Token>, Error> {
        match ch {
            Some('"') => {
                self.advance();
                Ok(Some(self.emit(TokenKind::StringLit)))
            }
            Some('\n') | None => Err(Error::new(
                ErrorImpl::UnterminatedString,
                self.token_start_position.clone(),
            )),
            Some(_) => {
                self.advance();
                Ok(None)
            }
        }
    }

    fn handle_number(&mut self, ch: Option<char>) -> Result<Option<Token>, Error> {
        match ch {
            Some(c) if c.is_ascii_digit() => {
                self.advance();
                Ok(None)
            }
            _ => {
                let numeral = self.lexeme();
                if numeral.len() > MAX_NUMERAL_DIGITS {
                    return Err(Error::new(
                        ErrorImpl::NumberTooLarge { token: numeral },
                        self.token_start_position.clone(),
                    ));
                }
                Ok(Some(self.emit(TokenKind::NumLit)))
            }
        }
    }

    fn skip_block_comment(&mut self) -> Result<(), Error> {
        self.mark_start();
        self.advance();
        self.advance();

        loop {
            match (self.at(), self.peek()) {
                (Some('*'), Some('/')) => {
                    self.advance();
                    self.advance();
                    return Ok(());
                }
                (None, _) => {
                    return Err(Error::new(
                        ErrorImpl::UnterminatedComment,
                        self.token_start_position.clone(),
                    ))
                }
                _ => self.advance(),
            }
        }
    }

    /// Finishes a pending one-or-two character operator: consumes `ch` and
    /// emits the paired kind if `ch` continues the operator, otherwise emits
    /// `single` without consuming anything.
    fn resolve(&mut self, ch: Option<char>, pairs: &[(char, TokenKind)], single: TokenKind) -> Token {
        if let Some(ch) = ch {
            if let Some((_, kind)) = pairs.iter().find(|(next, _)| *next == ch) {
                self.advance();
                return self.emit(*kind);
            }
        }
        self.emit(single)
    }

    fn mark_start(&mut self) {
        self.token_start = self.pos;
        self.token_start_position = self.get_position();
    }

    fn lexeme(&self) -> String {
        self.chars[self.token_start..self.pos].iter().collect()
    }

    fn emit(&self, kind: TokenKind) -> Token {
        MK_TOKEN!(
            kind,
            self.lexeme(),
            self.token_start_position.clone(),
            self.get_position()
        )
    }

    fn eof_token(&self) -> Token {
        let position = self.get_position();
        MK_TOKEN!(TokenKind::EOF, String::new(), position.clone(), position)
    }

    fn advance(&mut self) {
        if let Some(ch) = self.at() {
            self.pos += 1;
            if ch == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
    }

    fn at(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos + 1).copied()
    }

    pub fn get_position(&self) -> Position {
        Position::new(self.line, self.column, Rc::clone(&self.file))
    }
}

/// Tokenizes the whole input, up to and including the first `EOF` token.
pub fn tokenize(source: &str, file: Option<String>) -> Result<Vec<Token>, Error> {
    let mut lexer = Lexer::new(source, file);
    let mut tokens = vec![];

    loop {
        let token = lexer.next_token()?;
        let done = token.kind == TokenKind::EOF;
        tokens.push(token);
        if done {
            return Ok(tokens);
        }
    }
}
