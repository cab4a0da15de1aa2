use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::base::QualifiedName;

/// Failures that stop a scan, or that a caller explicitly asks to treat
/// as failures via [`ScanSummary::into_result`](super::ScanSummary::into_result).
#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("source root not found: {}", .path.display())]
    RootNotFound { path: PathBuf },

    #[error("source root is not a directory: {}", .path.display())]
    NotADirectory { path: PathBuf },

    #[error("cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to start scan worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("{kind} '{name}' has no simple name")]
    NoSimpleName {
        kind: &'static str,
        name: QualifiedName,
    },

    #[error("scan of {} reported {count} error(s), first: {first}", .root.display())]
    ScanFailed {
        root: PathBuf,
        count: usize,
        first: String,
    },
}
