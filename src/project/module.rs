use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;

use super::accessible::Accessible;
use super::error::ProjectError;
use super::package::PackageNode;
use crate::base::QualifiedName;
use crate::syntax::ModuleDecl;

/// Where and how a named module was declared.
#[derive(Clone, Debug)]
pub struct ModuleDeclaration {
    /// Directory holding the `module-info.java`.
    pub directory: PathBuf,
    pub descriptor: ModuleDecl,
}

/// One module scope and the packages discovered while it was active.
///
/// The unnamed module has the empty name and is never declared.
pub struct ModuleNode {
    name: QualifiedName,
    declaration: Mutex<Option<ModuleDeclaration>>,
    packages: Mutex<BTreeMap<QualifiedName, Arc<PackageNode>>>,
}

impl ModuleNode {
    pub fn new(name: QualifiedName) -> Self {
        Self {
            name,
            declaration: Mutex::new(None),
            packages: Mutex::new(BTreeMap::new()),
        }
    }

    pub fn is_unnamed(&self) -> bool {
        self.name.is_empty()
    }

    /// Record the declaring directory. Only the first declaration sticks;
    /// a later one gets back the directory that won.
    pub fn declare(&self, directory: &Path, descriptor: &ModuleDecl) -> Result<(), PathBuf> {
        let mut declaration = self.declaration.lock();
        match declaration.as_ref() {
            Some(existing) if existing.directory != directory => Err(existing.directory.clone()),
            Some(_) => Ok(()),
            None => {
                *declaration = Some(ModuleDeclaration {
                    directory: directory.to_path_buf(),
                    descriptor: descriptor.clone(),
                });
                Ok(())
            }
        }
    }

    pub fn declaration(&self) -> Option<ModuleDeclaration> {
        self.declaration.lock().clone()
    }

    /// Add a package to this module. Returns `false` if it was already there.
    pub fn associate(&self, package: Arc<PackageNode>) -> bool {
        let mut packages = self.packages.lock();
        if packages.contains_key(package.qualified_name()) {
            return false;
        }
        packages.insert(package.qualified_name().clone(), package);
        true
    }

    pub fn contains(&self, package: &QualifiedName) -> bool {
        self.packages.lock().contains_key(package)
    }

    /// Packages ordered by qualified name.
    pub fn packages(&self) -> Vec<Arc<PackageNode>> {
        self.packages.lock().values().cloned().collect()
    }

    pub fn package_names(&self) -> Vec<QualifiedName> {
        self.packages.lock().keys().cloned().collect()
    }
}

impl Accessible for ModuleNode {
    fn qualified_name(&self) -> &QualifiedName {
        &self.name
    }

    fn simple_name(&self) -> Result<&str, ProjectError> {
        Err(ProjectError::NoSimpleName {
            kind: "module",
            name: self.name.clone(),
        })
    }
}

impl fmt::Debug for ModuleNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModuleNode")
            .field("name", &self.name)
            .field("packages", &self.package_names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(s: &str) -> QualifiedName {
        QualifiedName::parse(s).unwrap()
    }

    fn descriptor(module: &str) -> ModuleDecl {
        ModuleDecl {
            name: name(module),
            open: false,
            directives: Vec::new(),
        }
    }

    #[test]
    fn test_module_has_no_simple_name() {
        let module = ModuleNode::new(name("com.example"));
        assert!(matches!(
            module.simple_name(),
            Err(ProjectError::NoSimpleName { kind: "module", .. })
        ));
        assert_eq!(module.qualified_name(), &name("com.example"));
        assert!(!module.is_unnamed());
        assert!(ModuleNode::new(QualifiedName::root()).is_unnamed());
    }

    #[test]
    fn test_associate_is_idempotent() {
        let module = ModuleNode::new(name("m"));
        let package = Arc::new(PackageNode::new(name("a.b")));
        assert!(module.associate(package.clone()));
        assert!(!module.associate(package));
        assert!(module.contains(&name("a.b")));
        assert_eq!(module.packages().len(), 1);
    }

    #[test]
    fn test_packages_are_ordered_by_name() {
        let module = ModuleNode::new(name("m"));
        for package in ["b", "a.c", "a"] {
            module.associate(Arc::new(PackageNode::new(name(package))));
        }
        assert_eq!(module.package_names(), vec![name("a"), name("a.c"), name("b")]);
    }

    #[test]
    fn test_first_declaration_wins() {
        let module = ModuleNode::new(name("m"));
        module.declare(Path::new("/one"), &descriptor("m")).unwrap();
        module.declare(Path::new("/one"), &descriptor("m")).unwrap();
        let winner = module.declare(Path::new("/two"), &descriptor("m")).unwrap_err();
        assert_eq!(winner, PathBuf::from("/one"));
        assert_eq!(module.declaration().unwrap().directory, PathBuf::from("/one"));
    }
}
