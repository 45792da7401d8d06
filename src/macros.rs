//! Utility macros for the compiler.
//!
//! - `MK_TOKEN!` - Creates a Token instance
//!
//! The lexer builds every token through this macro so the span
//! construction lives in one place.

/// Creates a Token instance.
///
/// # Arguments
///
/// * `$kind` - The TokenKind
/// * `$value` - The token's source text
/// * `$start` - The Position of the token's first character
/// * `$end` - The Position just past the token's last character
///
/// # Example
///
/// ```ignore
/// let token = MK_TOKEN!(TokenKind::NumLit, "42".to_string(), start, end);
/// ```
#[macro_export]
macro_rules! MK_TOKEN {
    ($kind:expr, $value:expr, $start:expr, $end:expr) => {
        Token {
            kind: $kind,
            value: $value,
            span: Span {
                start: $start,
                end: $end,
            },
        }
    };
}
