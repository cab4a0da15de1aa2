use thiserror::Error;

use crate::base::{LineCol, LineIndex, TextRange};

/// A lexical or structural error in one source file.
///
/// Never escapes [`Compiler::compile`](super::Compiler::compile); it is
/// logged and turned into [`ParseResult::Error`](super::ParseResult::Error).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct SyntaxError {
    pub message: String,
    pub range: TextRange,
}

impl SyntaxError {
    pub fn new(message: impl Into<String>, range: TextRange) -> Self {
        Self {
            message: message.into(),
            range,
        }
    }

    /// Start position of the error within `source`.
    pub fn position(&self, source: &str) -> LineCol {
        LineIndex::new(source).line_col(self.range.start())
    }
}

/// Failure raised by a structural query callback.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct CompileError {
    pub message: String,
}

impl CompileError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
