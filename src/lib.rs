//! # javelin
//!
//! Project-level compilation driver for a Java front end.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! project → Directory scan, module/package index, diagnostics
//!   ↓
//! syntax  → Lexer + structural parser, CompilationUnit, visitor
//!   ↓
//! base    → Primitives (QualifiedName, spans)
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use javelin::{ProjectUnit, ScanConfig, visit};
//!
//! let project = ProjectUnit::new(ScanConfig::new().with_parallel(true));
//! let summary = project
//!     .scan("src/main/java", |unit| visit(unit, &mut |_node| Ok(())))
//!     .unwrap();
//! println!("{}/{} files parsed", summary.succeeded(), summary.files);
//! ```

/// Foundation types: qualified names, text spans
pub mod base;

/// Project scanning and the module/package index
pub mod project;

/// Java lexer, parser and syntax tree
pub mod syntax;

pub use base::QualifiedName;
pub use project::{
    Accessible, Diagnostic, ProjectError, ProjectUnit, ScanConfig, ScanSummary, Severity,
    Strictness,
};
pub use syntax::{CompilationUnit, CompileError, Compiler, JavaCompiler, ParseResult, visit};
