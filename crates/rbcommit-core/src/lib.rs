//! rbcommit Core Library
//!
//! Validation of multi-commit review request uploads: the validation-info
//! chain, history-aware file existence checks, commit-series finalization
//! and commit-history diffs.

pub mod domain;
pub mod history;
pub mod history_diff;
pub mod obs;
pub mod repository;
pub mod series;
pub mod telemetry;

pub use domain::{
    ChangeTree, Commit, CommitValidation, DvcsError, FileChange, FileEntry, FileStatus, Result,
    Revision, ValidationError, ValidationInfo,
};

pub use history::file_exists_in_history;
pub use history_diff::{diff_histories, HistoryDiffEntry};
pub use repository::{GitRepository, MemoryRepository, Repository};
pub use series::{
    base_and_tip_commits, cumulative_changes, finalize_commit_series, order_commits,
    validate_commit, FinalizedSeries,
};

pub use obs::{
    emit_commit_validated, emit_repository_fallback, emit_series_finalized,
    emit_validation_rejected, CommitSpan,
};
pub use telemetry::init_tracing;

/// rbcommit version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
