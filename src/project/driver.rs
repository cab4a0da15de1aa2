//! Project driver: walks a source tree into the module/package index.
//!
//! Each directory goes through `Start → ModuleCheck → {EntryDispatch}* →
//! Finalize`:
//!
//! 1. **Start** lists the directory (sorted by file name).
//! 2. **ModuleCheck** compiles `module-info.java` if present; a declared
//!    module becomes the active module for the directory and below.
//! 3. **EntryDispatch** recurses into subdirectories and compiles `*.java`
//!    files, sequentially or with rayon depending on [`ScanConfig::parallel`].
//! 4. **Finalize** registers (or merges into) the directory's package and
//!    associates it with the active module.
//!
//! Only an unlistable directory ends a subtree. Everything else (parse
//! failures, query failures, unreadable files, index anomalies) is counted
//! and recorded as a [`Diagnostic`] while the scan carries on.

use std::ffi::OsStr;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use rayon::prelude::*;
use smol_str::SmolStr;

use super::accessible::{Accessible, Entry};
use super::config::ScanConfig;
use super::diagnostics::{Diagnostic, DiagnosticCollector, codes};
use super::error::ProjectError;
use super::index::{Association, ProjectIndex};
use super::module::ModuleNode;
use super::package::PackageNode;
use super::source::SourceUnit;
use crate::base::{QualifiedName, is_identifier};
use crate::syntax::{CompilationUnit, CompileError, Compiler, JavaCompiler, ParseResult};

/// File name that declares a module for its directory.
pub const MODULE_INFO: &str = "module-info.java";

const SOURCE_EXTENSION: &str = "java";

// ============================================================================
// SCAN SUMMARY
// ============================================================================

/// What one call to [`ProjectUnit::scan`] did.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScanSummary {
    pub root: PathBuf,
    /// Files handed to the compiler, `module-info.java` included.
    pub files: usize,
    /// Files that were unreadable or did not parse.
    pub failed: usize,
    /// Parsed files on which the query reported an error.
    pub query_failures: usize,
    /// Ordered by path, then code.
    pub diagnostics: Vec<Diagnostic>,
}

impl ScanSummary {
    pub fn succeeded(&self) -> usize {
        self.files - self.failed
    }

    /// Fraction of files that parsed; `1.0` for an empty tree.
    pub fn success_rate(&self) -> f64 {
        if self.files == 0 {
            1.0
        } else {
            self.succeeded() as f64 / self.files as f64
        }
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.is_error())
    }

    pub fn has_errors(&self) -> bool {
        self.errors().next().is_some()
    }

    /// Diagnostics carrying `code`.
    pub fn with_code<'a>(&'a self, code: &'a str) -> impl Iterator<Item = &'a Diagnostic> + 'a {
        self.diagnostics.iter().filter(move |d| &*d.code == code)
    }

    /// Turn error-severity diagnostics into a failure.
    pub fn into_result(self) -> Result<Self, ProjectError> {
        let count = self.errors().count();
        let first_error = self.errors().next().map(ToString::to_string);
        match first_error {
            None => Ok(self),
            Some(first) => Err(ProjectError::ScanFailed {
                root: self.root,
                count,
                first,
            }),
        }
    }
}

// ============================================================================
// PROJECT UNIT
// ============================================================================

/// A project: one index plus the compiler used to fill it.
///
/// Scanning several roots into the same unit merges packages that share a
/// qualified name. Counters live on the unit, never in process-wide state.
pub struct ProjectUnit<C = JavaCompiler> {
    config: ScanConfig,
    compiler: C,
    index: ProjectIndex,
    total_files: AtomicUsize,
    total_failed: AtomicUsize,
}

impl ProjectUnit<JavaCompiler> {
    /// A project compiled with the built-in [`JavaCompiler`].
    pub fn new(config: ScanConfig) -> Self {
        Self::with_compiler(config, JavaCompiler::new())
    }
}

impl Default for ProjectUnit<JavaCompiler> {
    fn default() -> Self {
        Self::new(ScanConfig::default())
    }
}

impl<C: Compiler> ProjectUnit<C> {
    pub fn with_compiler(config: ScanConfig, compiler: C) -> Self {
        Self {
            config,
            compiler,
            index: ProjectIndex::new(),
            total_files: AtomicUsize::new(0),
            total_failed: AtomicUsize::new(0),
        }
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    pub fn index(&self) -> &ProjectIndex {
        &self.index
    }

    pub fn module(&self, name: &QualifiedName) -> Option<Arc<ModuleNode>> {
        self.index.module(name)
    }

    pub fn package(&self, name: &QualifiedName) -> Option<Arc<PackageNode>> {
        self.index.package(name)
    }

    pub fn modules(&self) -> Vec<Arc<ModuleNode>> {
        self.index.modules()
    }

    pub fn packages(&self) -> Vec<Arc<PackageNode>> {
        self.index.packages()
    }

    pub fn unnamed_module(&self) -> &Arc<ModuleNode> {
        self.index.unnamed_module()
    }

    pub fn default_package(&self) -> &Arc<PackageNode> {
        self.index.default_package()
    }

    /// Modules a package was discovered under, in discovery order.
    pub fn modules_of(&self, package: &QualifiedName) -> Vec<Arc<ModuleNode>> {
        self.index.modules_of(package)
    }

    /// Find a source unit by its fully qualified name.
    pub fn source(&self, name: &QualifiedName) -> Option<Arc<SourceUnit>> {
        let package = self.index.package(&name.parent()?)?;
        package.source(name.last()?)
    }

    /// Files compiled by every scan of this unit so far.
    pub fn total_files(&self) -> usize {
        self.total_files.load(Ordering::Relaxed)
    }

    /// Files that failed in every scan of this unit so far.
    pub fn total_failed_files(&self) -> usize {
        self.total_failed.load(Ordering::Relaxed)
    }

    /// Scan `root`, compiling every Java file and running `query` on each
    /// successfully parsed tree.
    ///
    /// Fails only if `root` is not a readable directory. Everything that
    /// goes wrong below the root is reported in the returned summary.
    pub fn scan<Q>(&self, root: impl AsRef<Path>, query: Q) -> Result<ScanSummary, ProjectError>
    where
        Q: Fn(&CompilationUnit) -> Result<(), CompileError> + Sync,
    {
        let root = root.as_ref();
        let metadata = fs::metadata(root).map_err(|source| match source.kind() {
            io::ErrorKind::NotFound => ProjectError::RootNotFound {
                path: root.to_path_buf(),
            },
            _ => ProjectError::Io {
                path: root.to_path_buf(),
                source,
            },
        })?;
        if !metadata.is_dir() {
            return Err(ProjectError::NotADirectory {
                path: root.to_path_buf(),
            });
        }

        let span = tracing::info_span!("scan", root = %root.display());
        let _enter = span.enter();

        let scan = Scan {
            project: self,
            query: &query,
            files: AtomicUsize::new(0),
            failed: AtomicUsize::new(0),
            query_failures: AtomicUsize::new(0),
            diagnostics: DiagnosticCollector::new(),
        };

        let canonical_root = if self.config.follow_links {
            let canonical = fs::canonicalize(root).map_err(|source| ProjectError::Io {
                path: root.to_path_buf(),
                source,
            })?;
            Some(canonical)
        } else {
            None
        };
        let ancestors = Ancestors {
            path: canonical_root,
            parent: None,
        };

        let walk = || {
            scan.directory(
                root,
                &QualifiedName::root(),
                self.index.unnamed_module(),
                &ancestors,
            )
        };
        let outcome = match (self.config.parallel, self.config.threads) {
            (true, Some(threads)) => rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build()?
                .install(walk),
            _ => walk(),
        };
        outcome.map_err(|source| ProjectError::Io {
            path: root.to_path_buf(),
            source,
        })?;

        let summary = scan.finish(root);
        self.total_files.fetch_add(summary.files, Ordering::Relaxed);
        self.total_failed.fetch_add(summary.failed, Ordering::Relaxed);
        tracing::info!(
            files = summary.files,
            failed = summary.failed,
            query_failures = summary.query_failures,
            diagnostics = summary.diagnostics.len(),
            "scanned {}",
            root.display()
        );
        Ok(summary)
    }
}

// ============================================================================
// ONE SCAN
// ============================================================================

/// Per-scan state shared by all workers.
struct Scan<'a, C, Q> {
    project: &'a ProjectUnit<C>,
    query: &'a Q,
    files: AtomicUsize,
    failed: AtomicUsize,
    query_failures: AtomicUsize,
    diagnostics: DiagnosticCollector,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ListedKind {
    Directory,
    File,
}

/// Canonical paths of the directories on the current descent, innermost
/// first. Only filled in when symlinks are followed.
struct Ancestors<'a> {
    path: Option<PathBuf>,
    parent: Option<&'a Ancestors<'a>>,
}

impl Ancestors<'_> {
    fn contains(&self, path: &Path) -> bool {
        let mut current = Some(self);
        while let Some(ancestor) = current {
            if ancestor.path.as_deref() == Some(path) {
                return true;
            }
            current = ancestor.parent;
        }
        false
    }
}

#[derive(Debug)]
struct Listed {
    path: PathBuf,
    name: String,
    kind: ListedKind,
}

impl<C, Q> Scan<'_, C, Q>
where
    C: Compiler,
    Q: Fn(&CompilationUnit) -> Result<(), CompileError> + Sync,
{
    fn directory(
        &self,
        dir: &Path,
        name: &QualifiedName,
        inherited: &Arc<ModuleNode>,
        ancestors: &Ancestors<'_>,
    ) -> io::Result<Arc<PackageNode>> {
        // Start
        let listing = self.list(dir)?;
        tracing::debug!("entering {} as package '{}'", dir.display(), name);

        // ModuleCheck
        let active = match listing
            .iter()
            .find(|item| item.kind == ListedKind::File && item.name == MODULE_INFO)
        {
            Some(module_info) => self.module_check(dir, &module_info.path, inherited),
            None => inherited.clone(),
        };

        // EntryDispatch
        let dispatch = |item: &Listed| self.entry(item, name, &active, ancestors);
        let entries: Vec<(SmolStr, Entry)> = if self.project.config.parallel {
            listing.par_iter().filter_map(dispatch).collect()
        } else {
            listing.iter().filter_map(dispatch).collect()
        };

        // Finalize
        Ok(self.finalize(dir, name, &active, entries))
    }

    fn list(&self, dir: &Path) -> io::Result<Vec<Listed>> {
        let mut listing = Vec::new();
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let path = entry.path();
            let Some(name) = entry.file_name().to_str().map(str::to_owned) else {
                tracing::debug!("skipping non UTF-8 name {}", path.display());
                continue;
            };
            let mut file_type = entry.file_type()?;
            if file_type.is_symlink() {
                if !self.project.config.follow_links {
                    tracing::debug!("not following symlink {}", path.display());
                    continue;
                }
                file_type = match fs::metadata(&path) {
                    Ok(metadata) => metadata.file_type(),
                    Err(err) if err.kind() == io::ErrorKind::NotFound => {
                        tracing::debug!("dangling symlink {}", path.display());
                        continue;
                    }
                    Err(err) => {
                        tracing::warn!("cannot resolve symlink {}: {}", path.display(), err);
                        self.diagnostics.warning(
                            codes::UNFOLLOWED_LINK,
                            &path,
                            format!("cannot resolve symlink: {}", err),
                        );
                        continue;
                    }
                };
            }
            let kind = if file_type.is_dir() {
                ListedKind::Directory
            } else if file_type.is_file() {
                ListedKind::File
            } else {
                continue;
            };
            listing.push(Listed { path, name, kind });
        }
        listing.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(listing)
    }

    fn module_check(
        &self,
        dir: &Path,
        module_info: &Path,
        inherited: &Arc<ModuleNode>,
    ) -> Arc<ModuleNode> {
        let strictness = self.project.config.strictness;
        let result = self.compile(module_info);
        let Some(descriptor) = result.module_descriptor() else {
            let message = if result.is_error() {
                "module-info.java failed to compile; keeping the enclosing module"
            } else {
                "module-info.java declares no module; keeping the enclosing module"
            };
            tracing::warn!("{}: {}", module_info.display(), message);
            self.diagnostics.add(Diagnostic::new(
                strictness.anomaly_severity(),
                codes::INVALID_MODULE_INFO,
                module_info,
                message,
            ));
            return inherited.clone();
        };

        let module = self.project.index.register_module(descriptor.name.clone());
        match module.declare(dir, descriptor) {
            Ok(()) => {
                tracing::debug!("module {} declared in {}", descriptor.name, dir.display());
                module
            }
            Err(first) => {
                let message = format!(
                    "module {} is already declared in {}",
                    descriptor.name,
                    first.display()
                );
                tracing::warn!("{}: {}", module_info.display(), message);
                self.diagnostics.add(Diagnostic::new(
                    strictness.anomaly_severity(),
                    codes::DUPLICATE_MODULE,
                    module_info,
                    message,
                ));
                if strictness.is_strict() {
                    inherited.clone()
                } else {
                    module
                }
            }
        }
    }

    fn entry(
        &self,
        item: &Listed,
        parent: &QualifiedName,
        active: &Arc<ModuleNode>,
        ancestors: &Ancestors<'_>,
    ) -> Option<(SmolStr, Entry)> {
        match item.kind {
            ListedKind::Directory => {
                if !is_identifier(&item.name) {
                    tracing::debug!(
                        "skipping directory {}: not a package name",
                        item.path.display()
                    );
                    return None;
                }
                let here = self.descend(&item.path, ancestors)?;
                let key = SmolStr::new(&item.name);
                match self.directory(&item.path, &parent.child(key.clone()), active, &here) {
                    Ok(package) => Some((key, Entry::Package(package))),
                    Err(err) => {
                        tracing::error!("cannot list {}: {}", item.path.display(), err);
                        self.diagnostics.error(
                            codes::UNREADABLE_DIRECTORY,
                            &item.path,
                            format!("cannot list directory: {}", err),
                        );
                        None
                    }
                }
            }
            ListedKind::File => {
                if item.name == MODULE_INFO {
                    return None;
                }
                let path = Path::new(&item.name);
                if path.extension() != Some(OsStr::new(SOURCE_EXTENSION)) {
                    return None;
                }
                let stem = path.file_stem()?.to_str()?;
                if !is_identifier(stem) {
                    tracing::debug!("skipping {}: not a type name", item.path.display());
                    return None;
                }
                let key = SmolStr::new(stem);
                let result = self.compile(&item.path);
                let unit = SourceUnit::new(parent.child(key.clone()), &item.path, result);
                Some((key, Entry::Source(Arc::new(unit))))
            }
        }
    }

    /// Ancestor chain for a subdirectory, or `None` if it must not be
    /// entered: a followed link that loops back onto the current descent.
    fn descend<'a>(&self, dir: &Path, ancestors: &'a Ancestors<'a>) -> Option<Ancestors<'a>> {
        if !self.project.config.follow_links {
            return Some(Ancestors {
                path: None,
                parent: Some(ancestors),
            });
        }
        let canonical = match fs::canonicalize(dir) {
            Ok(canonical) => canonical,
            Err(err) => {
                tracing::error!("cannot resolve {}: {}", dir.display(), err);
                self.diagnostics.error(
                    codes::UNREADABLE_DIRECTORY,
                    dir,
                    format!("cannot resolve directory: {}", err),
                );
                return None;
            }
        };
        if ancestors.contains(&canonical) {
            tracing::warn!(
                "not following {}: it leads back to {}",
                dir.display(),
                canonical.display()
            );
            self.diagnostics.warning(
                codes::UNFOLLOWED_LINK,
                dir,
                format!("symlink cycle back to {}", canonical.display()),
            );
            return None;
        }
        Some(Ancestors {
            path: Some(canonical),
            parent: Some(ancestors),
        })
    }

    /// Compile one file, count it, and run the query if it parsed.
    fn compile(&self, path: &Path) -> ParseResult {
        self.files.fetch_add(1, Ordering::Relaxed);
        let result = match self.project.compiler.compile(path) {
            Ok(result) => {
                if result.is_error() {
                    tracing::warn!("{}: failed to parse", path.display());
                    self.diagnostics
                        .warning(codes::PARSE_FAILURE, path, "failed to parse");
                }
                result
            }
            Err(err) => {
                tracing::error!("cannot read {}: {}", path.display(), err);
                self.diagnostics.error(
                    codes::UNREADABLE_FILE,
                    path,
                    format!("cannot read file: {}", err),
                );
                ParseResult::Error
            }
        };

        match result.unit() {
            None => {
                self.failed.fetch_add(1, Ordering::Relaxed);
            }
            Some(tree) => {
                tracing::debug!("parsed {}", path.display());
                if let Err(err) = (self.query)(&**tree) {
                    tracing::warn!("{}: query failed: {}", path.display(), err);
                    self.query_failures.fetch_add(1, Ordering::Relaxed);
                    self.diagnostics.warning(
                        codes::QUERY_FAILURE,
                        path,
                        format!("query failed: {}", err),
                    );
                }
            }
        }
        result
    }

    fn finalize(
        &self,
        dir: &Path,
        name: &QualifiedName,
        active: &Arc<ModuleNode>,
        entries: Vec<(SmolStr, Entry)>,
    ) -> Arc<PackageNode> {
        let strictness = self.project.config.strictness;
        let package = self.project.index.register_package(name.clone());

        for collision in package.merge(entries) {
            let message = format!(
                "'{}' in package '{}' is already a {}; the {} was dropped",
                collision.key,
                name,
                collision.existing.kind(),
                collision.rejected.kind()
            );
            tracing::warn!("{}: {}", dir.display(), message);
            self.diagnostics.add(Diagnostic::new(
                strictness.anomaly_severity(),
                codes::ENTRY_COLLISION,
                dir,
                message,
            ));
        }

        // the default package stays with the unnamed module
        if !name.is_empty() {
            match self.project.index.associate(active, &package, strictness) {
                Association::Added | Association::Existing => {}
                Association::Split { other } | Association::Refused { other } => {
                    let message = format!(
                        "package '{}' belongs to module '{}' and is also reached from module '{}'",
                        name,
                        other,
                        active.qualified_name()
                    );
                    tracing::warn!("{}: {}", dir.display(), message);
                    self.diagnostics.add(Diagnostic::new(
                        strictness.anomaly_severity(),
                        codes::SPLIT_PACKAGE,
                        dir,
                        message,
                    ));
                }
            }
        }
        package
    }

    fn finish(self, root: &Path) -> ScanSummary {
        ScanSummary {
            root: root.to_path_buf(),
            files: self.files.into_inner(),
            failed: self.failed.into_inner(),
            query_failures: self.query_failures.into_inner(),
            diagnostics: self.diagnostics.finish(),
        }
    }
}
