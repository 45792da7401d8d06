//! Type checking and semantic analysis module.
//!
//! This module walks the AST once, in place, and:
//!
//! - Assigns a type to every expression, name definition and l-value
//! - Resolves identifiers through a scoped symbol table
//! - Checks declarations, assignments, guards and return statements
//! - Binds undeclared pixel-selector coordinates in assignment targets
//!
//! Scopes are opened and closed in strict pairs around programs, blocks,
//! loops and assignment targets with pixel selectors.

pub mod symbol_table;
pub mod type_checker;

#[cfg(test)]
mod tests;
