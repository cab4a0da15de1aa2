//! Diagnostics: records of everything a scan absorbed instead of failing.
//!
//! Parse failures, query failures, unreadable paths and module/package
//! anomalies never abort a scan. Each one becomes a [`Diagnostic`] in the
//! [`ScanSummary`](super::ScanSummary) so callers can decide whether to
//! proceed to later compiler phases.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;

// ============================================================================
// DIAGNOSTIC TYPES
// ============================================================================

/// Severity level of a diagnostic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
        })
    }
}

/// One absorbed failure or anomaly, located at a file or directory.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Diagnostic {
    pub severity: Severity,
    /// Stable code from [`codes`].
    pub code: Arc<str>,
    pub path: PathBuf,
    pub message: Arc<str>,
}

impl Diagnostic {
    pub fn new(
        severity: Severity,
        code: &str,
        path: impl Into<PathBuf>,
        message: impl Into<Arc<str>>,
    ) -> Self {
        Self {
            severity,
            code: Arc::from(code),
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn error(code: &str, path: impl Into<PathBuf>, message: impl Into<Arc<str>>) -> Self {
        Self::new(Severity::Error, code, path, message)
    }

    pub fn warning(code: &str, path: impl Into<PathBuf>, message: impl Into<Arc<str>>) -> Self {
        Self::new(Severity::Warning, code, path, message)
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {}[{}]: {}",
            self.path.display(),
            self.severity,
            self.code,
            self.message
        )
    }
}

// ============================================================================
// DIAGNOSTIC CODES
// ============================================================================

/// Stable diagnostic codes.
pub mod codes {
    /// A directory could not be listed; its subtree was skipped.
    pub const UNREADABLE_DIRECTORY: &str = "E0001";
    /// A source file could not be read.
    pub const UNREADABLE_FILE: &str = "E0002";

    /// A source file did not parse.
    pub const PARSE_FAILURE: &str = "W0001";
    /// The structural query failed on a parsed file.
    pub const QUERY_FAILURE: &str = "W0002";
    /// `module-info.java` did not yield a module declaration.
    pub const INVALID_MODULE_INFO: &str = "W0003";
    /// Two entries with the same simple name in one package.
    pub const ENTRY_COLLISION: &str = "W0004";
    /// A package reached while two different modules were active.
    pub const SPLIT_PACKAGE: &str = "W0005";
    /// One module name declared by two directories.
    pub const DUPLICATE_MODULE: &str = "W0006";
    /// A symlink was not followed: its target is unreadable or it loops back
    /// onto a directory already being scanned.
    pub const UNFOLLOWED_LINK: &str = "W0007";
}

// ============================================================================
// DIAGNOSTIC COLLECTOR
// ============================================================================

/// Collects diagnostics from concurrent scan workers.
#[derive(Debug, Default)]
pub struct DiagnosticCollector {
    diagnostics: Mutex<Vec<Diagnostic>>,
}

impl DiagnosticCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, diagnostic: Diagnostic) {
        self.diagnostics.lock().push(diagnostic);
    }

    pub fn error(&self, code: &str, path: &Path, message: impl Into<Arc<str>>) {
        self.add(Diagnostic::error(code, path, message));
    }

    pub fn warning(&self, code: &str, path: &Path, message: impl Into<Arc<str>>) {
        self.add(Diagnostic::warning(code, path, message));
    }

    pub fn len(&self) -> usize {
        self.diagnostics.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Consume the collector, ordering diagnostics by path then code so the
    /// result does not depend on worker scheduling.
    pub fn finish(self) -> Vec<Diagnostic> {
        let mut diagnostics = self.diagnostics.into_inner();
        diagnostics.sort_by(|a, b| {
            a.path
                .cmp(&b.path)
                .then_with(|| a.code.cmp(&b.code))
                .then_with(|| a.message.cmp(&b.message))
        });
        diagnostics
    }
}
