//! Commit-series validation and finalization.
//!
//! Commits of a multi-commit upload are validated one at a time. Each
//! successful validation returns a validation info extended by that commit,
//! which the client submits along with the next commit. Once every commit
//! is validated, [`finalize_commit_series`] checks the uploaded series
//! against the chain and computes its cumulative change set.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::{
    ChangeTree, Commit, DvcsError, FileEntry, FileStatus, Result, Revision, ValidationError,
    ValidationInfo,
};
use crate::history::file_exists_in_history;
use crate::obs::{
    emit_commit_validated, emit_series_finalized, emit_validation_rejected, CommitSpan,
};
use crate::repository::Repository;

/// Validate `commit` against the pending chain and the repository.
///
/// An empty `validation_info` starts a new chain whose parent must already
/// exist in the repository. Otherwise the commit must be new to the chain
/// and its parent must be part of it.
///
/// Returns the validation info extended with `commit`; the input is left
/// untouched.
///
/// # Errors
///
/// - `ValidationError::EmptyCommitId` / `EmptyParentId` / `EmptyCommit`
/// - `ValidationError::CommitAlreadyValidated`: `commit_id` is already in the chain.
/// - `ValidationError::ParentNotValidated`: `parent_id` is not in a non-empty chain.
/// - `ValidationError::FileNotFound`: a changed file's source does not exist.
/// - Any repository error.
pub fn validate_commit<R: Repository + ?Sized>(
    repository: &R,
    validation_info: &ValidationInfo,
    commit: &Commit,
) -> Result<ValidationInfo> {
    let _span = CommitSpan::enter(&commit.commit_id);

    check_commit(repository, validation_info, commit).inspect_err(|e| {
        emit_validation_rejected(&commit.commit_id, e);
    })?;

    let mut updated = validation_info.clone();
    updated.record(&commit.commit_id, &commit.parent_id, &commit.files);

    emit_commit_validated(
        &commit.commit_id,
        &commit.parent_id,
        commit.files.len(),
        updated.len(),
    );
    Ok(updated)
}

fn check_commit<R: Repository + ?Sized>(
    repository: &R,
    validation_info: &ValidationInfo,
    commit: &Commit,
) -> Result<()> {
    if commit.commit_id.is_empty() {
        return Err(ValidationError::EmptyCommitId.into());
    }
    if commit.parent_id.is_empty() {
        return Err(ValidationError::EmptyParentId {
            commit_id: commit.commit_id.clone(),
        }
        .into());
    }
    if commit.files.is_empty() {
        return Err(ValidationError::EmptyCommit {
            commit_id: commit.commit_id.clone(),
        }
        .into());
    }

    if !validation_info.is_empty() {
        if validation_info.contains(&commit.commit_id) {
            return Err(ValidationError::CommitAlreadyValidated {
                commit_id: commit.commit_id.clone(),
            }
            .into());
        }
        if !validation_info.contains(&commit.parent_id) {
            return Err(ValidationError::ParentNotValidated {
                parent_id: commit.parent_id.clone(),
            }
            .into());
        }
    }

    for change in commit.files.iter().filter(|c| c.requires_source()) {
        let exists = file_exists_in_history(
            validation_info,
            repository,
            &commit.parent_id,
            &change.source_file,
            &change.source_revision,
        )?;
        if !exists {
            return Err(ValidationError::FileNotFound {
                commit_id: commit.commit_id.clone(),
                path: change.source_file.clone(),
                revision: change.source_revision.to_string(),
            }
            .into());
        }
    }

    Ok(())
}

/// Order a linear series from base to tip.
///
/// # Errors
///
/// `ValidationError::NonLinearHistory` if two commits share a parent, the
/// series has more than one base, or some commits are unreachable from the
/// base (a cycle).
pub fn order_commits(commits: &[Commit]) -> Result<Vec<&Commit>> {
    let by_id: HashMap<&str, &Commit> = commits.iter().map(|c| (c.commit_id.as_str(), c)).collect();
    if by_id.len() != commits.len() {
        let err = ValidationError::NonLinearHistory("duplicate commit IDs".to_string());
        return Err(err.into());
    }

    let mut children: HashMap<&str, &Commit> = HashMap::new();
    for commit in commits {
        if let Some(other) = children.insert(commit.parent_id.as_str(), commit) {
            return Err(ValidationError::NonLinearHistory(format!(
                "commits {} and {} share parent {}",
                other.commit_id, commit.commit_id, commit.parent_id
            ))
            .into());
        }
    }

    let bases: Vec<&Commit> = commits
        .iter()
        .filter(|c| !by_id.contains_key(c.parent_id.as_str()))
        .collect();
    let base = match bases.as_slice() {
        [base] => *base,
        [] => {
            return Err(
                ValidationError::NonLinearHistory("series has no base commit".to_string()).into(),
            )
        }
        _ => {
            let ids: Vec<&str> = bases.iter().map(|c| c.commit_id.as_str()).collect();
            return Err(ValidationError::NonLinearHistory(format!(
                "series has multiple base commits: {}",
                ids.join(", ")
            ))
            .into());
        }
    };

    let mut ordered = Vec::with_capacity(commits.len());
    let mut current = Some(base);
    while let Some(commit) = current {
        ordered.push(commit);
        current = children.get(commit.commit_id.as_str()).copied();
    }

    if ordered.len() != commits.len() {
        return Err(ValidationError::NonLinearHistory(format!(
            "{} commit(s) unreachable from base {}",
            commits.len() - ordered.len(),
            base.commit_id
        ))
        .into());
    }
    Ok(ordered)
}

/// Resolve optional base and tip commit IDs within `commits`.
///
/// # Errors
///
/// `DvcsError::CommitNotFound` for an ID that is not in `commits`.
pub fn base_and_tip_commits<'a>(
    base_commit_id: Option<&str>,
    tip_commit_id: Option<&str>,
    commits: &'a [Commit],
) -> Result<(Option<&'a Commit>, Option<&'a Commit>)> {
    let find = |id: Option<&str>| -> Result<Option<&'a Commit>> {
        match id {
            None => Ok(None),
            Some(id) => commits
                .iter()
                .find(|c| c.commit_id == id)
                .map(Some)
                .ok_or_else(|| DvcsError::CommitNotFound(id.to_string())),
        }
    };
    Ok((find(base_commit_id)?, find(tip_commit_id)?))
}

/// A fully validated, ordered commit series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalizedSeries {
    /// Commit the series applies on top of.
    pub base_parent_id: String,
    pub base_commit_id: String,
    pub tip_commit_id: String,
    /// Commit IDs from base to tip.
    pub commit_ids: Vec<String>,
    /// Net change from `base_parent_id` to the tip.
    pub cumulative: ChangeTree,
}

impl FinalizedSeries {
    pub fn commit_count(&self) -> usize {
        self.commit_ids.len()
    }
}

/// Check an uploaded series against its validation info and finalize it.
///
/// # Errors
///
/// - `ValidationError::EmptySeries`
/// - `ValidationError::SeriesMismatch`: commit IDs differ from the validated set.
/// - `ValidationError::ParentMismatch`: a commit's parent differs from its validated parent.
/// - `ValidationError::NonLinearHistory`
pub fn finalize_commit_series(
    commits: &[Commit],
    validation_info: &ValidationInfo,
) -> Result<FinalizedSeries> {
    if commits.is_empty() {
        return Err(ValidationError::EmptySeries.into());
    }

    let uploaded: BTreeSet<&str> = commits.iter().map(|c| c.commit_id.as_str()).collect();
    let validated: BTreeSet<&str> = validation_info.commit_ids().collect();
    if uploaded != validated {
        return Err(ValidationError::SeriesMismatch {
            missing: validated
                .difference(&uploaded)
                .map(|s| s.to_string())
                .collect(),
            unexpected: uploaded
                .difference(&validated)
                .map(|s| s.to_string())
                .collect(),
        }
        .into());
    }

    for commit in commits {
        if let Some(entry) = validation_info.get(&commit.commit_id) {
            if entry.parent_id != commit.parent_id {
                return Err(ValidationError::ParentMismatch {
                    commit_id: commit.commit_id.clone(),
                    expected: entry.parent_id.clone(),
                    actual: commit.parent_id.clone(),
                }
                .into());
            }
        }
    }

    let ordered = order_commits(commits)?;
    let base = ordered[0];
    let tip = ordered[ordered.len() - 1];

    let cumulative = cumulative_changes(ordered.iter().copied());

    emit_series_finalized(&base.commit_id, &tip.commit_id, ordered.len());

    Ok(FinalizedSeries {
        base_parent_id: base.parent_id.clone(),
        base_commit_id: base.commit_id.clone(),
        tip_commit_id: tip.commit_id.clone(),
        commit_ids: ordered.iter().map(|c| c.commit_id.clone()).collect(),
        cumulative,
    })
}

/// State of one path across the series.
#[derive(Debug)]
struct NetChange {
    /// Revision at the base parent; `None` if the path did not exist there.
    base: Option<Revision>,
    /// Revision at the tip; `None` if the path no longer exists.
    current: Option<Revision>,
}

fn touch<'a>(
    net: &'a mut BTreeMap<String, NetChange>,
    path: &str,
    source_revision: &Revision,
) -> &'a mut NetChange {
    net.entry(path.to_string()).or_insert_with(|| NetChange {
        base: match source_revision {
            Revision::PreCreation => None,
            rev => Some(rev.clone()),
        },
        current: None,
    })
}

/// Fold commits, oldest first, into the net change from the base parent to
/// the tip.
///
/// Each path keeps the source revision of the oldest commit that touched it,
/// so a net removal reports the revision that exists at the base parent.
/// A file added then removed disappears, removed then re-added counts as
/// modified, and added then modified stays added.
pub fn cumulative_changes<'a>(commits: impl IntoIterator<Item = &'a Commit>) -> ChangeTree {
    let mut net: BTreeMap<String, NetChange> = BTreeMap::new();

    for commit in commits {
        for change in &commit.files {
            match change.status {
                FileStatus::Added => {
                    touch(&mut net, &change.dest_file, &Revision::PreCreation).current =
                        Some(change.dest_revision.clone());
                }
                FileStatus::Modified if change.source_file == change.dest_file => {
                    touch(&mut net, &change.dest_file, &change.source_revision).current =
                        Some(change.dest_revision.clone());
                }
                FileStatus::Deleted => {
                    touch(&mut net, &change.source_file, &change.source_revision).current = None;
                }
                FileStatus::Modified | FileStatus::Moved => {
                    touch(&mut net, &change.source_file, &change.source_revision).current = None;
                    touch(&mut net, &change.dest_file, &Revision::PreCreation).current =
                        Some(change.dest_revision.clone());
                }
            }
        }
    }

    debug!(files = net.len(), "computed cumulative change set");

    let mut out = ChangeTree::default();
    for (filename, change) in net {
        match (change.base, change.current) {
            (None, Some(rev)) => out.added.push(FileEntry::new(filename, rev)),
            (Some(base), None) => out.removed.push(FileEntry::new(filename, base)),
            (Some(base), Some(rev)) if base != rev => {
                out.modified.push(FileEntry::new(filename, rev))
            }
            _ => {}
        }
    }
    out
}
