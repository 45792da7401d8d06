/// AST (Abstract Syntax Tree) module
/// Contains all definitions related to the AST structure
///
/// Submodules:
/// - ast: Program, block and declaration nodes plus the tree root
/// - expressions: Definitions for the expression variants and selectors
/// - statements: Definitions for the statement variants
/// - types: The type tag set and the per-node type annotation slot
/// - display: Rendering nodes back to source text
pub mod ast;
pub mod display;
pub mod expressions;
pub mod statements;
pub mod types;
