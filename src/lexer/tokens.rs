use lazy_static::lazy_static;
use std::{collections::HashMap, fmt::Display};

use crate::Span;

lazy_static! {
    pub static ref RESERVED_LOOKUP: HashMap<&'static str, TokenKind> = {
        let mut map = HashMap::new();
        map.insert("image", TokenKind::Image);
        map.insert("pixel", TokenKind::Pixel);
        map.insert("int", TokenKind::Int);
        map.insert("string", TokenKind::String);
        map.insert("void", TokenKind::Void);
        map.insert("boolean", TokenKind::Boolean);
        map.insert("nil", TokenKind::Nil);
        map.insert("write", TokenKind::Write);
        map.insert("height", TokenKind::Height);
        map.insert("width", TokenKind::Width);
        map.insert("if", TokenKind::If);
        map.insert("fi", TokenKind::Fi);
        map.insert("do", TokenKind::Do);
        map.insert("od", TokenKind::Od);
        map.insert("red", TokenKind::Red);
        map.insert("green", TokenKind::Green);
        map.insert("blue", TokenKind::Blue);

        // Coordinate constant and named colors
        for name in [
            "Z", "BLACK", "BLUE", "CYAN", "LIGHT_GRAY", "DARK_GRAY", "GRAY", "GREEN", "MAGENTA",
            "ORANGE", "PINK", "RED", "WHITE", "YELLOW",
        ] {
            map.insert(name, TokenKind::Const);
        }

        map.insert("TRUE", TokenKind::BooleanLit);
        map.insert("FALSE", TokenKind::BooleanLit);
        map
    };
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum TokenKind {
    EOF,
    Identifier,
    NumLit,
    StringLit,
    BooleanLit,
    Const,

    LParen,
    RParen,
    LSquare,
    RSquare,
    Box,        // []
    BlockOpen,  // <:
    BlockClose, // :>

    Assign, // =
    Eq,     // ==
    Bang,   // !

    Lt,
    Gt,
    Le,
    Ge,

    And,    // &&
    Or,     // ||
    BitAnd, // &
    BitOr,  // |

    Semi,
    Colon,
    Question,
    Comma,
    RArrow, // ->
    Return, // ^

    Plus,
    Minus,
    Times,
    Div,
    Mod,
    Exp, // **

    // Reserved
    Image,
    Pixel,
    Int,
    String,
    Void,
    Boolean,
    Nil,
    Write,
    Height,
    Width,
    If,
    Fi,
    Do,
    Od,
    Red,
    Green,
    Blue,
}

impl TokenKind {
    pub fn is_type_keyword(&self) -> bool {
        matches!(
            self,
            TokenKind::Image
                | TokenKind::Pixel
                | TokenKind::Int
                | TokenKind::String
                | TokenKind::Void
                | TokenKind::Boolean
        )
    }

    pub fn is_color_channel(&self) -> bool {
        matches!(self, TokenKind::Red | TokenKind::Green | TokenKind::Blue)
    }
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub value: String,
    pub span: Span,
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.kind, self.value)
    }
}

impl Token {
    pub fn is_one_of_many(&self, kinds: &[TokenKind]) -> bool {
        kinds.contains(&self.kind)
    }
}
