//! Repository backends answering "does this file exist at this revision?".
//!
//! The history resolver only falls back to a repository once a lookup walks
//! off the end of the pending commit chain, so backends see one query per
//! unresolved lookup.

pub mod git;
pub mod memory;

use crate::domain::{Result, Revision};

/// A source-code repository that can report file existence.
pub trait Repository: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Whether `path` exists at `revision`.
    ///
    /// `Revision::Unknown` and `Revision::Head` ask about the repository tip.
    fn get_file_exists(&self, path: &str, revision: &Revision) -> Result<bool>;
}

pub use git::GitRepository;
pub use memory::MemoryRepository;
