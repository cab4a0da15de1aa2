//! Java syntax: lexer, structural parser, tree and visitor.
//!
//! The project driver only talks to this layer through [`Compiler`],
//! [`ParseResult`] and [`visit`], so another front end can be plugged in
//! by implementing [`Compiler`].

mod compiler;
mod error;
pub mod lexer;
pub mod parser;
mod tree;
mod visit;

pub use compiler::{Compiler, JavaCompiler};
pub use error::{CompileError, SyntaxError};
pub use tree::{
    CompilationUnit, ImportDecl, ModuleDecl, ModuleDirective, ParseResult, SyntaxNode, TypeDecl,
    TypeKind,
};
pub use visit::visit;
