//! Domain models for commit-series validation.
//!
//! Canonical definitions for the core entities:
//! - `Revision`: A file revision, including the SCM sentinels
//! - `Commit`: One client-submitted commit and its file changes
//! - `ValidationInfo`: The pending chain of validated commits

pub mod commit;
pub mod error;
pub mod revision;
pub mod validation_info;

// Re-export main types and errors
pub use commit::{Commit, FileChange, FileStatus};
pub use error::{DvcsError, Result, ValidationError};
pub use revision::Revision;
pub use validation_info::{ChangeTree, CommitValidation, FileEntry, ValidationInfo};
