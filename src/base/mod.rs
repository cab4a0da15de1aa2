//! Foundation types for the javelin front end.
//!
//! - [`QualifiedName`] - dotted names for modules, packages and sources
//! - [`is_identifier`] - whether a file or directory name can be a segment
//! - [`TextRange`], [`TextSize`] - source positions
//! - [`LineCol`], [`LineIndex`] - line/column conversion
//!
//! This module has NO dependencies on other javelin modules.

mod name;
mod span;

pub use name::{NameError, QualifiedName, is_identifier};
pub use span::{LineCol, LineIndex, TextRange, TextSize};
