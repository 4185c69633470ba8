//! Per-commit validation info for a pending commit series.
//!
//! A `ValidationInfo` maps each validated commit ID to its parent and the
//! files it added, modified and removed. Clients receive it base64-encoded
//! after each successful commit validation and hand it back with the next
//! commit, so the chain grows one commit at a time without anything being
//! persisted server-side.

use std::collections::BTreeMap;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};

use super::commit::{FileChange, FileStatus};
use super::error::{DvcsError, Result};
use super::revision::Revision;

/// A file and the revision a commit left it at.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FileEntry {
    pub filename: String,
    pub revision: Revision,
}

impl FileEntry {
    pub fn new(filename: impl Into<String>, revision: impl Into<Revision>) -> Self {
        Self {
            filename: filename.into(),
            revision: revision.into(),
        }
    }
}

/// Files changed by a single commit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeTree {
    #[serde(default)]
    pub added: Vec<FileEntry>,
    #[serde(default)]
    pub modified: Vec<FileEntry>,
    #[serde(default)]
    pub removed: Vec<FileEntry>,
}

impl ChangeTree {
    /// Build a tree from a commit's file changes.
    ///
    /// Moved files count as a removal of the source path plus an addition of
    /// the destination path.
    pub fn from_changes(changes: &[FileChange]) -> Self {
        let mut tree = ChangeTree::default();
        for change in changes {
            let source = || FileEntry::new(&change.source_file, change.source_revision.clone());
            let dest = || FileEntry::new(&change.dest_file, change.dest_revision.clone());
            match change.status {
                FileStatus::Added => tree.added.push(dest()),
                FileStatus::Modified => tree.modified.push(dest()),
                FileStatus::Deleted => tree.removed.push(source()),
                FileStatus::Moved => {
                    tree.removed.push(source());
                    tree.added.push(dest());
                }
            }
        }
        tree
    }

    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.modified.is_empty() && self.removed.is_empty()
    }

    pub fn file_count(&self) -> usize {
        self.added.len() + self.modified.len() + self.removed.len()
    }
}

/// Validation record for one commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitValidation {
    pub parent_id: String,
    pub tree: ChangeTree,
}

/// Validation records keyed by commit ID.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationInfo(BTreeMap<String, CommitValidation>);

impl ValidationInfo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, commit_id: &str) -> Option<&CommitValidation> {
        self.0.get(commit_id)
    }

    pub fn contains(&self, commit_id: &str) -> bool {
        self.0.contains_key(commit_id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn commit_ids(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CommitValidation)> {
        self.0.iter().map(|(id, v)| (id.as_str(), v))
    }

    /// Insert a raw record, replacing any previous one for `commit_id`.
    pub fn insert(&mut self, commit_id: impl Into<String>, validation: CommitValidation) {
        self.0.insert(commit_id.into(), validation);
    }

    /// Record a commit's file changes under `commit_id`.
    pub fn record(
        &mut self,
        commit_id: impl Into<String>,
        parent_id: impl Into<String>,
        changes: &[FileChange],
    ) {
        self.insert(
            commit_id,
            CommitValidation {
                parent_id: parent_id.into(),
                tree: ChangeTree::from_changes(changes),
            },
        );
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Encode as base64 JSON, the form handed back to clients.
    pub fn encode(&self) -> Result<String> {
        Ok(STANDARD.encode(self.to_json()?))
    }

    /// Decode a client-submitted validation info.
    ///
    /// Accepts base64 JSON, or bare JSON for call paths that skip the
    /// base64 layer.
    pub fn decode(raw: &str) -> Result<Self> {
        let raw = raw.trim();
        let json = match STANDARD.decode(raw) {
            Ok(bytes) => String::from_utf8(bytes)
                .map_err(|e| DvcsError::InvalidValidationInfo(format!("not UTF-8: {e}")))?,
            Err(_) if raw.starts_with('{') => raw.to_string(),
            Err(e) => {
                return Err(DvcsError::InvalidValidationInfo(format!(
                    "not valid base64: {e}"
                )))
            }
        };
        serde_json::from_str(&json)
            .map_err(|e| DvcsError::InvalidValidationInfo(format!("not valid JSON: {e}")))
    }
}

impl FromIterator<(String, CommitValidation)> for ValidationInfo {
    fn from_iter<I: IntoIterator<Item = (String, CommitValidation)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
