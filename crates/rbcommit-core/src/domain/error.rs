//! Domain-level error taxonomy for commit-series validation.

/// Errors produced when a client-submitted commit or series is rejected.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("commit ID must not be empty")]
    EmptyCommitId,

    #[error("parent ID of commit {commit_id} must not be empty")]
    EmptyParentId { commit_id: String },

    #[error("commit {commit_id} does not change any files")]
    EmptyCommit { commit_id: String },

    #[error("commit {commit_id} was already validated")]
    CommitAlreadyValidated { commit_id: String },

    #[error("parent commit {parent_id} was not validated")]
    ParentNotValidated { parent_id: String },

    #[error("file {path} ({revision}) referenced by commit {commit_id} was not found")]
    FileNotFound {
        commit_id: String,
        path: String,
        revision: String,
    },

    #[error("commit series is empty")]
    EmptySeries,

    #[error(
        "commit series does not match validation info: missing {missing:?}, not validated {unexpected:?}"
    )]
    SeriesMismatch {
        missing: Vec<String>,
        unexpected: Vec<String>,
    },

    #[error("commit {commit_id} has parent {actual} but was validated against {expected}")]
    ParentMismatch {
        commit_id: String,
        expected: String,
        actual: String,
    },

    #[error("commit series is not linear: {0}")]
    NonLinearHistory(String),
}

/// Commit-series domain errors.
#[derive(Debug, thiserror::Error)]
pub enum DvcsError {
    #[error("invalid validation info: {0}")]
    InvalidValidationInfo(String),

    #[error("commit not found: {0}")]
    CommitNotFound(String),

    #[error("repository error: {0}")]
    Repository(String),

    #[error("git error: {0}")]
    Git(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for commit-series operations.
pub type Result<T> = std::result::Result<T, DvcsError>;
