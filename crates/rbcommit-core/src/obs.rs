//! Structured observability hooks for commit-series validation.
//!
//! This module provides:
//! - Commit-scoped tracing spans via the `CommitSpan` RAII guard
//! - Emission functions for validation outcomes, repository fallbacks and
//!   series finalization
//!
//! Events are emitted at `info!` level, except repository fallbacks which
//! are `debug!` since every unresolved lookup produces one.

use tracing::{debug, info, warn};

use crate::domain::Revision;

/// RAII guard that enters a commit-scoped tracing span.
///
/// # Example
///
/// ```ignore
/// let _span = CommitSpan::enter("r2");
/// // every event logged here carries commit_id = "r2"
/// ```
pub struct CommitSpan {
    _span: tracing::span::EnteredSpan,
}

impl CommitSpan {
    /// Create and enter a span tagged with the commit ID.
    pub fn enter(commit_id: &str) -> Self {
        let span = tracing::info_span!("rbcommit.commit", commit_id = %commit_id);
        Self {
            _span: span.entered(),
        }
    }
}

/// Emit event: a commit passed validation and was added to the chain.
pub fn emit_commit_validated(commit_id: &str, parent_id: &str, files: usize, chain_len: usize) {
    info!(
        event = "commit.validated",
        commit_id = %commit_id,
        parent_id = %parent_id,
        files = files,
        chain_len = chain_len,
    );
}

/// Emit event: a commit was rejected (warning level).
pub fn emit_validation_rejected(commit_id: &str, error: &dyn std::fmt::Display) {
    warn!(event = "commit.rejected", commit_id = %commit_id, error = %error);
}

/// Emit event: a history lookup left the pending chain and asked the repository.
pub fn emit_repository_fallback(repository: &str, path: &str, revision: &Revision, exists: bool) {
    debug!(
        event = "history.repository_fallback",
        repository = %repository,
        path = %path,
        revision = %revision,
        exists = exists,
    );
}

/// Emit event: a commit series was finalized.
pub fn emit_series_finalized(base_commit_id: &str, tip_commit_id: &str, commit_count: usize) {
    info!(
        event = "series.finalized",
        base_commit_id = %base_commit_id,
        tip_commit_id = %tip_commit_id,
        commit_count = commit_count,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commit_span_create() {
        let _span = CommitSpan::enter("r1");
        emit_commit_validated("r1", "r0", 2, 1);
    }
}
