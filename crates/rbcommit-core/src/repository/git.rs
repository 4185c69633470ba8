//! Git-backed repository queries.

use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::debug;

use super::Repository;
use crate::domain::error::{DvcsError, Result};
use crate::domain::Revision;

/// A git work tree queried through the `git` binary.
#[derive(Debug, Clone)]
pub struct GitRepository {
    root: PathBuf,
    name: String,
}

impl GitRepository {
    /// Open the work tree containing `dir`.
    ///
    /// Returns an error if `dir` is not inside a git work tree.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        if !is_git_repo(dir) {
            return Err(DvcsError::Git(format!(
                "{} is not inside a git work tree",
                dir.display()
            )));
        }
        let name = dir
            .canonicalize()?
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "git".to_string());
        Ok(Self {
            root: dir.to_path_buf(),
            name,
        })
    }

    /// Directory the repository was opened from.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Run `git cat-file -e <object>`; a non-zero exit means the object is missing.
    fn object_exists(&self, object: &str) -> Result<bool> {
        let output = Command::new("git")
            .args(["cat-file", "-e", object])
            .current_dir(&self.root)
            .output()
            .map_err(|e| DvcsError::Git(format!("failed to run git: {e}")))?;

        debug!(
            repo = %self.name,
            object = %object,
            found = output.status.success(),
            "git cat-file"
        );
        Ok(output.status.success())
    }
}

impl Repository for GitRepository {
    fn name(&self) -> &str {
        &self.name
    }

    fn get_file_exists(&self, path: &str, revision: &Revision) -> Result<bool> {
        match revision {
            Revision::PreCreation => Ok(false),
            Revision::Unknown | Revision::Head => self.object_exists(&format!("HEAD:{path}")),
            Revision::Known(rev) => self.object_exists(rev),
        }
    }
}

/// Check whether a directory is inside a git work tree.
pub fn is_git_repo(dir: &Path) -> bool {
    Command::new("git")
        .args(["rev-parse", "--is-inside-work-tree"])
        .current_dir(dir)
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}
