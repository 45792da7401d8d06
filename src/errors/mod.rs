//! Error types and error handling for the compiler.
//!
//! This module defines the single error type shared by every stage of
//! the front end. It includes:
//!
//! - Error structures with source position information
//! - Specific error variants for lexing, parsing and type checking
//! - Classification of every variant into one failure kind
//! - Helpful error messages and suggestions

pub mod errors;
