use std::fs;
use std::io;
use std::path::Path;

use super::parser;
use super::tree::ParseResult;

/// Turns one source file into a [`ParseResult`].
///
/// Syntax errors are not failures: they come back as [`ParseResult::Error`].
/// `Err` is reserved for files that cannot be read at all.
pub trait Compiler: Send + Sync {
    fn compile(&self, path: &Path) -> io::Result<ParseResult>;
}

impl<F> Compiler for F
where
    F: Fn(&Path) -> io::Result<ParseResult> + Send + Sync,
{
    fn compile(&self, path: &Path) -> io::Result<ParseResult> {
        self(path)
    }
}

/// The built-in structural Java compiler.
#[derive(Debug, Default, Clone, Copy)]
pub struct JavaCompiler;

impl JavaCompiler {
    pub fn new() -> Self {
        Self
    }

    /// Compile source text that is already in memory.
    pub fn compile_source(&self, path: &Path, source: &str) -> ParseResult {
        match parser::parse(source) {
            Ok(unit) => ParseResult::from(unit),
            Err(err) => {
                tracing::debug!(
                    "{}:{}: syntax error: {}",
                    path.display(),
                    err.position(source),
                    err
                );
                ParseResult::Error
            }
        }
    }
}

impl Compiler for JavaCompiler {
    fn compile(&self, path: &Path) -> io::Result<ParseResult> {
        let bytes = fs::read(path)?;
        match String::from_utf8(bytes) {
            Ok(source) => Ok(self.compile_source(path, &source)),
            Err(_) => {
                tracing::debug!("{}: source is not valid UTF-8", path.display());
                Ok(ParseResult::Error)
            }
        }
    }
}
