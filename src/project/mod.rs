//! Project layer: walks a source tree and builds the module/package index.
//!
//! ```text
//! ProjectUnit ──scan(root, query)──► ScanSummary
//!     │
//!     └─ ProjectIndex
//!          ├─ ModuleNode  ──► PackageNode (by qualified name)
//!          └─ PackageNode ──► Entry::{Package, Source}
//! ```

mod accessible;
mod config;
mod diagnostics;
mod driver;
mod error;
mod index;
mod module;
mod package;
mod source;

pub use accessible::{Accessible, Entry};
pub use config::{ScanConfig, Strictness};
pub use diagnostics::{Diagnostic, DiagnosticCollector, Severity, codes};
pub use driver::{MODULE_INFO, ProjectUnit, ScanSummary};
pub use error::ProjectError;
pub use index::{Association, ProjectIndex};
pub use module::{ModuleDeclaration, ModuleNode};
pub use package::{Collision, PackageNode};
pub use source::SourceUnit;
