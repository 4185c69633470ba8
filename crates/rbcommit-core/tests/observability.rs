//! Observability tests for commit validation tracing.
//!
//! These tests verify that structured tracing events are emitted for
//! validated and rejected commits and for finalized series.

use rbcommit_core::{
    emit_series_finalized, finalize_commit_series, validate_commit, Commit, CommitSpan,
    FileChange, MemoryRepository, ValidationInfo,
};
use tracing_test::traced_test;

fn commit(id: &str, parent: &str, files: Vec<FileChange>) -> Commit {
    Commit::new(id, parent, "Bob", "bob@example.com", "Change").with_files(files)
}

#[traced_test]
#[test]
fn test_validated_commit_logs_event() {
    let repo = MemoryRepository::new();
    let c = commit("r1", "r0", vec![FileChange::added("foo", "abc")]);
    validate_commit(&repo, &ValidationInfo::new(), &c).unwrap();

    assert!(logs_contain("commit.validated"));
    assert!(logs_contain("r1"));
}

#[traced_test]
#[test]
fn test_rejected_commit_logs_warning() {
    let repo = MemoryRepository::new();
    let c = commit("r1", "r0", vec![FileChange::deleted("missing.txt", "abc")]);
    let result = validate_commit(&repo, &ValidationInfo::new(), &c);

    assert!(result.is_err());
    assert!(logs_contain("commit.rejected"));
    assert!(logs_contain("missing.txt"));
}

#[traced_test]
#[test]
fn test_finalize_logs_series_event() {
    let repo = MemoryRepository::new();
    let c = commit("r1", "r0", vec![FileChange::added("foo", "abc")]);
    let info = validate_commit(&repo, &ValidationInfo::new(), &c).unwrap();
    finalize_commit_series(&[c], &info).unwrap();

    assert!(logs_contain("series.finalized"));
}

#[traced_test]
#[test]
fn test_commit_span_enter_creates_span() {
    let span = CommitSpan::enter("span-commit");
    emit_series_finalized("span-commit", "span-commit", 1);
    drop(span);

    assert!(logs_contain("span-commit"));
}
