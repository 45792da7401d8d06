use std::fmt::Display;

use crate::lexer::tokens::TokenKind;

/// The closed set of types the type checker assigns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Type {
    Int,
    Boolean,
    String,
    Pixel,
    Image,
    Void,
}

impl Type {
    /// Maps a type keyword to its type; `None` for any other kind.
    pub fn from_token_kind(kind: TokenKind) -> Option<Type> {
        match kind {
            TokenKind::Int => Some(Type::Int),
            TokenKind::Boolean => Some(Type::Boolean),
            TokenKind::String => Some(Type::String),
            TokenKind::Pixel => Some(Type::Pixel),
            TokenKind::Image => Some(Type::Image),
            TokenKind::Void => Some(Type::Void),
            _ => None,
        }
    }
}

impl Display for Type {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Type::Int => "INT",
            Type::Boolean => "BOOLEAN",
            Type::String => "STRING",
            Type::Pixel => "PIXEL",
            Type::Image => "IMAGE",
            Type::Void => "VOID",
        };
        write!(f, "{}", name)
    }
}

/// Write-once type annotation carried by AST nodes.
///
/// The slot is empty after parsing and filled by the type checker.
/// Setting it again with the same type is a no-op; a conflicting
/// second value is a type checker bug.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TypeSlot(Option<Type>);

impl TypeSlot {
    pub fn get(&self) -> Option<Type> {
        self.0
    }

    pub fn set(&mut self, ty: Type) -> Type {
        match self.0 {
            Some(existing) => {
                assert_eq!(existing, ty, "node re-annotated with a conflicting type");
            }
            None => self.0 = Some(ty),
        }
        ty
    }
}
