//! History-aware file existence checks over a pending commit chain.

use std::collections::HashSet;

use tracing::{debug, trace};

use crate::domain::{FileEntry, Result, Revision, ValidationInfo};
use crate::obs::emit_repository_fallback;
use crate::repository::Repository;

fn contains(entries: &[FileEntry], path: &str, revision: &Revision) -> bool {
    entries
        .iter()
        .any(|e| e.filename == path && revision.matches(&e.revision))
}

/// Whether `path` at `revision` exists as of commit `parent_id`.
///
/// Walks the pending chain in `validation_info` from `parent_id` towards
/// older commits. The first commit that added or modified the file at the
/// requested revision answers `true`; the first that removed it answers
/// `false`. Once the walk leaves the pending chain the repository is asked
/// exactly once and its answer returned as-is.
///
/// With `Revision::Unknown` files match by name alone.
///
/// # Errors
///
/// Only errors from `repository` are returned.
pub fn file_exists_in_history<R: Repository + ?Sized>(
    validation_info: &ValidationInfo,
    repository: &R,
    parent_id: &str,
    path: &str,
    revision: &Revision,
) -> Result<bool> {
    let mut commit_id = parent_id;
    let mut seen = HashSet::new();

    while let Some(entry) = validation_info.get(commit_id) {
        if !seen.insert(commit_id) {
            debug!(commit_id = %commit_id, "cycle in validation info; asking repository");
            break;
        }

        let tree = &entry.tree;
        if contains(&tree.added, path, revision) || contains(&tree.modified, path, revision) {
            trace!(commit_id = %commit_id, path = %path, "found in pending chain");
            return Ok(true);
        }
        if contains(&tree.removed, path, revision) {
            trace!(commit_id = %commit_id, path = %path, "removed in pending chain");
            return Ok(false);
        }

        commit_id = &entry.parent_id;
    }

    let exists = repository.get_file_exists(path, revision)?;
    emit_repository_fallback(repository.name(), path, revision, exists);
    Ok(exists)
}
