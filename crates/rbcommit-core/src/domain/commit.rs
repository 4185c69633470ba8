//! Client-submitted commit metadata for a multi-commit upload.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::revision::Revision;

const SUMMARY_MAX_CHARS: usize = 80;

/// How a commit changed a single file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    Added,
    Modified,
    Deleted,
    Moved,
}

/// One file touched by a commit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileChange {
    /// Path before the change.
    pub source_file: String,
    /// Revision before the change (`PRE-CREATION` for new files).
    pub source_revision: Revision,
    /// Path after the change.
    pub dest_file: String,
    /// Revision after the change.
    pub dest_revision: Revision,
    pub status: FileStatus,
}

impl FileChange {
    pub fn added(path: impl Into<String>, revision: impl Into<Revision>) -> Self {
        let path = path.into();
        Self {
            source_file: path.clone(),
            source_revision: Revision::PreCreation,
            dest_file: path,
            dest_revision: revision.into(),
            status: FileStatus::Added,
        }
    }

    pub fn modified(
        path: impl Into<String>,
        source_revision: impl Into<Revision>,
        dest_revision: impl Into<Revision>,
    ) -> Self {
        let path = path.into();
        Self {
            source_file: path.clone(),
            source_revision: source_revision.into(),
            dest_file: path,
            dest_revision: dest_revision.into(),
            status: FileStatus::Modified,
        }
    }

    pub fn deleted(path: impl Into<String>, source_revision: impl Into<Revision>) -> Self {
        let path = path.into();
        Self {
            source_file: path.clone(),
            source_revision: source_revision.into(),
            dest_file: path,
            dest_revision: Revision::Unknown,
            status: FileStatus::Deleted,
        }
    }

    pub fn moved(
        source_file: impl Into<String>,
        source_revision: impl Into<Revision>,
        dest_file: impl Into<String>,
        dest_revision: impl Into<Revision>,
    ) -> Self {
        Self {
            source_file: source_file.into(),
            source_revision: source_revision.into(),
            dest_file: dest_file.into(),
            dest_revision: dest_revision.into(),
            status: FileStatus::Moved,
        }
    }

    /// Whether the source side of this change must already exist.
    pub fn requires_source(&self) -> bool {
        self.status != FileStatus::Added && self.source_revision != Revision::PreCreation
    }
}

/// A single commit in an uploaded series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Commit {
    pub commit_id: String,
    pub parent_id: String,

    pub author_name: String,
    pub author_email: String,
    pub author_date: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub committer_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub committer_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub committer_date: Option<DateTime<Utc>>,

    pub commit_message: String,

    #[serde(default)]
    pub files: Vec<FileChange>,
}

impl Commit {
    pub fn new(
        commit_id: impl Into<String>,
        parent_id: impl Into<String>,
        author_name: impl Into<String>,
        author_email: impl Into<String>,
        commit_message: impl Into<String>,
    ) -> Self {
        Self {
            commit_id: commit_id.into(),
            parent_id: parent_id.into(),
            author_name: author_name.into(),
            author_email: author_email.into(),
            author_date: Utc::now(),
            committer_name: None,
            committer_email: None,
            committer_date: None,
            commit_message: commit_message.into(),
            files: Vec::new(),
        }
    }

    pub fn with_files(mut self, files: Vec<FileChange>) -> Self {
        self.files = files;
        self
    }

    /// First line of the commit message, truncated to 80 characters.
    pub fn summary(&self) -> String {
        let first = self.commit_message.lines().next().unwrap_or("").trim_end();
        if first.chars().count() <= SUMMARY_MAX_CHARS {
            first.to_string()
        } else {
            first.chars().take(SUMMARY_MAX_CHARS).collect()
        }
    }
}
