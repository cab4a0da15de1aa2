use std::sync::Arc;

use super::error::ProjectError;
use super::package::PackageNode;
use super::source::SourceUnit;
use crate::base::QualifiedName;

/// A named entity managed by the driver: module, package or source unit.
pub trait Accessible {
    fn qualified_name(&self) -> &QualifiedName;

    /// The last segment of the qualified name.
    ///
    /// Fails for modules, which are only ever named by their full dotted
    /// name, and for the default package, whose name is empty.
    fn simple_name(&self) -> Result<&str, ProjectError>;
}

pub(crate) fn last_segment<'a>(
    kind: &'static str,
    name: &'a QualifiedName,
) -> Result<&'a str, ProjectError> {
    name.last().ok_or_else(|| ProjectError::NoSimpleName {
        kind,
        name: name.clone(),
    })
}

/// A value in a package's entry map.
#[derive(Clone, Debug)]
pub enum Entry {
    Package(Arc<PackageNode>),
    Source(Arc<SourceUnit>),
}

impl Entry {
    pub fn as_package(&self) -> Option<&Arc<PackageNode>> {
        match self {
            Entry::Package(package) => Some(package),
            Entry::Source(_) => None,
        }
    }

    pub fn as_source(&self) -> Option<&Arc<SourceUnit>> {
        match self {
            Entry::Source(source) => Some(source),
            Entry::Package(_) => None,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Entry::Package(_) => "package",
            Entry::Source(_) => "source unit",
        }
    }

    /// Whether both entries refer to the same node instance.
    pub fn same_node(&self, other: &Entry) -> bool {
        match (self, other) {
            (Entry::Package(a), Entry::Package(b)) => Arc::ptr_eq(a, b),
            (Entry::Source(a), Entry::Source(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl Accessible for Entry {
    fn qualified_name(&self) -> &QualifiedName {
        match self {
            Entry::Package(package) => package.qualified_name(),
            Entry::Source(source) => source.qualified_name(),
        }
    }

    fn simple_name(&self) -> Result<&str, ProjectError> {
        match self {
            Entry::Package(package) => package.simple_name(),
            Entry::Source(source) => source.simple_name(),
        }
    }
}
