//! Scan configuration.

use super::diagnostics::Severity;

/// How the driver treats module/package anomalies: a `module-info.java`
/// that declares nothing, an entry-name collision while merging a package,
/// a package reached from two modules, or one module declared by two
/// directories.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Strictness {
    /// Resolve anomalies first-match-wins and report them as warnings.
    #[default]
    Permissive,
    /// Refuse the conflicting association or declaration and report an error.
    Strict,
}

impl Strictness {
    pub fn is_strict(self) -> bool {
        self == Strictness::Strict
    }

    /// Severity of an anomaly diagnostic under this policy.
    pub fn anomaly_severity(self) -> Severity {
        match self {
            Strictness::Permissive => Severity::Warning,
            Strictness::Strict => Severity::Error,
        }
    }
}

/// Options for [`ProjectUnit`](super::ProjectUnit).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ScanConfig {
    /// Process the entries of each directory concurrently.
    pub parallel: bool,
    /// Size of a dedicated worker pool; `None` uses rayon's global pool.
    /// Ignored unless `parallel` is set.
    pub threads: Option<usize>,
    pub strictness: Strictness,
    /// Descend into symlinked directories and compile symlinked files.
    pub follow_links: bool,
}

impl ScanConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = Some(threads);
        self
    }

    pub fn with_strictness(mut self, strictness: Strictness) -> Self {
        self.strictness = strictness;
        self
    }

    pub fn with_follow_links(mut self, follow_links: bool) -> Self {
        self.follow_links = follow_links;
        self
    }
}
