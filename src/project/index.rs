//! Module/package index: qualified name → node, for one project.

use std::fmt;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use rustc_hash::FxHashMap;

use super::accessible::Accessible;
use super::config::Strictness;
use super::module::ModuleNode;
use super::package::PackageNode;
use crate::base::QualifiedName;

/// Outcome of [`ProjectIndex::associate`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Association {
    /// First association of this package with this module.
    Added,
    /// The package was already associated with this module.
    Existing,
    /// Associated, but the package already belonged to `other` as well.
    Split { other: QualifiedName },
    /// Refused under [`Strictness::Strict`]: the package belongs to `other`.
    Refused { other: QualifiedName },
}

/// Owns every module and package node of a project.
///
/// The unnamed module and the default package are registered on
/// construction, under the empty name, and are associated with each other.
pub struct ProjectIndex {
    modules: RwLock<FxHashMap<QualifiedName, Arc<ModuleNode>>>,
    packages: RwLock<FxHashMap<QualifiedName, Arc<PackageNode>>>,
    /// Package name → names of the modules it is associated with.
    owners: Mutex<FxHashMap<QualifiedName, Vec<QualifiedName>>>,
    unnamed: Arc<ModuleNode>,
    default_package: Arc<PackageNode>,
}

impl ProjectIndex {
    pub fn new() -> Self {
        let unnamed = Arc::new(ModuleNode::new(QualifiedName::root()));
        let default_package = Arc::new(PackageNode::new(QualifiedName::root()));
        unnamed.associate(default_package.clone());

        let mut modules = FxHashMap::default();
        modules.insert(QualifiedName::root(), unnamed.clone());
        let mut packages = FxHashMap::default();
        packages.insert(QualifiedName::root(), default_package.clone());
        let mut owners = FxHashMap::default();
        owners.insert(QualifiedName::root(), vec![QualifiedName::root()]);

        Self {
            modules: RwLock::new(modules),
            packages: RwLock::new(packages),
            owners: Mutex::new(owners),
            unnamed,
            default_package,
        }
    }

    /// Get or create the module node for `name`.
    pub fn register_module(&self, name: QualifiedName) -> Arc<ModuleNode> {
        // Fast path: read lock
        if let Some(module) = self.modules.read().get(&name) {
            return module.clone();
        }

        // Slow path: write lock, double-checked
        let mut modules = self.modules.write();
        modules
            .entry(name)
            .or_insert_with_key(|name| {
                tracing::debug!("registered module {}", name);
                Arc::new(ModuleNode::new(name.clone()))
            })
            .clone()
    }

    /// Get or create the package node for `name`.
    ///
    /// A second registration returns the same node; callers merge their
    /// entries into it.
    pub fn register_package(&self, name: QualifiedName) -> Arc<PackageNode> {
        if let Some(package) = self.packages.read().get(&name) {
            return package.clone();
        }

        let mut packages = self.packages.write();
        packages
            .entry(name)
            .or_insert_with_key(|name| Arc::new(PackageNode::new(name.clone())))
            .clone()
    }

    /// Record that `package` was discovered while `module` was active.
    pub fn associate(
        &self,
        module: &Arc<ModuleNode>,
        package: &Arc<PackageNode>,
        strictness: Strictness,
    ) -> Association {
        let mut owners = self.owners.lock();
        let modules = owners.entry(package.qualified_name().clone()).or_default();

        if modules.contains(module.qualified_name()) {
            return Association::Existing;
        }
        let outcome = match modules.first() {
            None => Association::Added,
            Some(other) if strictness.is_strict() => {
                return Association::Refused {
                    other: other.clone(),
                };
            }
            Some(other) => Association::Split {
                other: other.clone(),
            },
        };
        modules.push(module.qualified_name().clone());
        module.associate(package.clone());
        outcome
    }

    pub fn module(&self, name: &QualifiedName) -> Option<Arc<ModuleNode>> {
        self.modules.read().get(name).cloned()
    }

    pub fn package(&self, name: &QualifiedName) -> Option<Arc<PackageNode>> {
        self.packages.read().get(name).cloned()
    }

    pub fn unnamed_module(&self) -> &Arc<ModuleNode> {
        &self.unnamed
    }

    pub fn default_package(&self) -> &Arc<PackageNode> {
        &self.default_package
    }

    /// All modules, ordered by name (the unnamed module first).
    pub fn modules(&self) -> Vec<Arc<ModuleNode>> {
        let mut modules: Vec<_> = self.modules.read().values().cloned().collect();
        modules.sort_by(|a, b| a.qualified_name().cmp(b.qualified_name()));
        modules
    }

    /// All packages, ordered by name (the default package first).
    pub fn packages(&self) -> Vec<Arc<PackageNode>> {
        let mut packages: Vec<_> = self.packages.read().values().cloned().collect();
        packages.sort_by(|a, b| a.qualified_name().cmp(b.qualified_name()));
        packages
    }

    /// Modules a package is associated with, in association order.
    pub fn modules_of(&self, package: &QualifiedName) -> Vec<Arc<ModuleNode>> {
        let names = self.owners.lock().get(package).cloned().unwrap_or_default();
        names.iter().filter_map(|name| self.module(name)).collect()
    }

    pub fn module_count(&self) -> usize {
        self.modules.read().len()
    }

    pub fn package_count(&self) -> usize {
        self.packages.read().len()
    }
}

impl Default for ProjectIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ProjectIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProjectIndex")
            .field("modules", &self.module_count())
            .field("packages", &self.package_count())
            .finish()
    }
}
