use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::accessible::{Accessible, last_segment};
use super::error::ProjectError;
use crate::base::QualifiedName;
use crate::syntax::{CompilationUnit, ParseResult};

/// One compiled `.java` file. Immutable once created.
#[derive(Debug)]
pub struct SourceUnit {
    name: QualifiedName,
    path: PathBuf,
    result: ParseResult,
}

impl SourceUnit {
    pub fn new(name: QualifiedName, path: impl Into<PathBuf>, result: ParseResult) -> Self {
        Self {
            name,
            path: path.into(),
            result,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn result(&self) -> &ParseResult {
        &self.result
    }

    /// The syntax tree, unless the file failed to compile.
    pub fn tree(&self) -> Option<&Arc<CompilationUnit>> {
        self.result.unit()
    }

    pub fn is_error(&self) -> bool {
        self.result.is_error()
    }
}

impl Accessible for SourceUnit {
    fn qualified_name(&self) -> &QualifiedName {
        &self.name
    }

    fn simple_name(&self) -> Result<&str, ProjectError> {
        last_segment("source unit", &self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names() {
        let unit = SourceUnit::new(
            QualifiedName::parse("pkg.sub.Bar").unwrap(),
            "/src/pkg/sub/Bar.java",
            ParseResult::Error,
        );
        assert_eq!(unit.qualified_name().to_string(), "pkg.sub.Bar");
        assert_eq!(unit.simple_name().unwrap(), "Bar");
        assert!(unit.is_error());
        assert!(unit.tree().is_none());
    }
}
