//! Structural syntax tree of a Java compilation unit.
//!
//! The tree keeps what the project driver and structural queries need:
//! the package clause, imports, an optional module declaration and the
//! declared types. Member bodies are not retained.

use std::fmt;
use std::sync::Arc;

use smol_str::SmolStr;

use crate::base::QualifiedName;

/// One parsed `.java` file.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CompilationUnit {
    pub package: Option<QualifiedName>,
    pub imports: Vec<ImportDecl>,
    /// Present only in a `module-info.java` style unit.
    pub module: Option<ModuleDecl>,
    pub types: Vec<TypeDecl>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImportDecl {
    pub name: QualifiedName,
    pub is_static: bool,
    /// `import a.b.*;`
    pub on_demand: bool,
}

/// `[open] module a.b { ... }`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModuleDecl {
    pub name: QualifiedName,
    pub open: bool,
    pub directives: Vec<ModuleDirective>,
}

impl ModuleDecl {
    /// Modules named by `requires` directives.
    pub fn requires(&self) -> impl Iterator<Item = &QualifiedName> {
        self.directives.iter().filter_map(|d| match d {
            ModuleDirective::Requires { module, .. } => Some(module),
            _ => None,
        })
    }

    /// Packages named by `exports` directives.
    pub fn exports(&self) -> impl Iterator<Item = &QualifiedName> {
        self.directives.iter().filter_map(|d| match d {
            ModuleDirective::Exports { package, .. } => Some(package),
            _ => None,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ModuleDirective {
    Requires {
        module: QualifiedName,
        transitive: bool,
        is_static: bool,
    },
    Exports {
        package: QualifiedName,
        to: Vec<QualifiedName>,
    },
    Opens {
        package: QualifiedName,
        to: Vec<QualifiedName>,
    },
    Uses {
        service: QualifiedName,
    },
    Provides {
        service: QualifiedName,
        with: Vec<QualifiedName>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Class,
    Interface,
    Enum,
    Record,
    /// `@interface`
    Annotation,
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TypeKind::Class => "class",
            TypeKind::Interface => "interface",
            TypeKind::Enum => "enum",
            TypeKind::Record => "record",
            TypeKind::Annotation => "@interface",
        })
    }
}

/// A type declaration and the member types declared directly inside it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeDecl {
    pub kind: TypeKind,
    pub name: SmolStr,
    pub members: Vec<TypeDecl>,
}

/// Outcome of compiling one file.
///
/// `Error` is a sentinel, not an exception: it carries nothing, in
/// particular never a module descriptor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParseResult {
    Unit(Arc<CompilationUnit>),
    Error,
}

impl ParseResult {
    pub fn is_error(&self) -> bool {
        matches!(self, ParseResult::Error)
    }

    pub fn unit(&self) -> Option<&Arc<CompilationUnit>> {
        match self {
            ParseResult::Unit(unit) => Some(unit),
            ParseResult::Error => None,
        }
    }

    pub fn module_descriptor(&self) -> Option<&ModuleDecl> {
        self.unit().and_then(|unit| unit.module.as_ref())
    }
}

impl From<CompilationUnit> for ParseResult {
    fn from(unit: CompilationUnit) -> Self {
        ParseResult::Unit(Arc::new(unit))
    }
}

/// A borrowed view of one node, handed to visitor callbacks.
#[derive(Clone, Copy, Debug)]
pub enum SyntaxNode<'a> {
    Unit(&'a CompilationUnit),
    Package(&'a QualifiedName),
    Import(&'a ImportDecl),
    Module(&'a ModuleDecl),
    Directive(&'a ModuleDirective),
    Type(&'a TypeDecl),
}
