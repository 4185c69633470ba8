//! Diffing two uploads of the same commit series.
//!
//! When a review request is updated with a new series, the commits are
//! compared by position. The shared prefix is unchanged; everything after
//! the first divergence counts as removed from the old series and added in
//! the new one.

use serde::Serialize;

use crate::domain::Commit;

/// One entry in a commit-history diff.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HistoryDiffEntry<'a> {
    Unmodified {
        old_commit: &'a Commit,
        new_commit: &'a Commit,
    },
    Removed {
        old_commit: &'a Commit,
    },
    Added {
        new_commit: &'a Commit,
    },
}

impl HistoryDiffEntry<'_> {
    pub fn is_unmodified(&self) -> bool {
        matches!(self, HistoryDiffEntry::Unmodified { .. })
    }
}

/// Compare two commit histories, each ordered base to tip.
pub fn diff_histories<'a>(old: &'a [Commit], new: &'a [Commit]) -> Vec<HistoryDiffEntry<'a>> {
    let common = old
        .iter()
        .zip(new)
        .take_while(|(o, n)| o.commit_id == n.commit_id)
        .count();

    let mut entries = Vec::with_capacity(old.len() + new.len() - common);
    entries.extend(
        old[..common]
            .iter()
            .zip(&new[..common])
            .map(|(old_commit, new_commit)| HistoryDiffEntry::Unmodified {
                old_commit,
                new_commit,
            }),
    );
    entries.extend(
        old[common..]
            .iter()
            .map(|old_commit| HistoryDiffEntry::Removed { old_commit }),
    );
    entries.extend(
        new[common..]
            .iter()
            .map(|new_commit| HistoryDiffEntry::Added { new_commit }),
    );
    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    fn commits(ids: &[&str]) -> Vec<Commit> {
        let mut parent = "base".to_string();
        ids.iter()
            .map(|id| {
                let c = Commit::new(*id, parent.clone(), "a", "a@b", *id);
                parent = id.to_string();
                c
            })
            .collect()
    }

    fn kinds(entries: &[HistoryDiffEntry<'_>]) -> Vec<String> {
        entries
            .iter()
            .map(|e| match e {
                HistoryDiffEntry::Unmodified { new_commit, .. } => {
                    format!("={}", new_commit.commit_id)
                }
                HistoryDiffEntry::Removed { old_commit } => format!("-{}", old_commit.commit_id),
                HistoryDiffEntry::Added { new_commit } => format!("+{}", new_commit.commit_id),
            })
            .collect()
    }

    #[test]
    fn identical_histories_are_unmodified() {
        let old = commits(&["r1", "r2"]);
        let new = commits(&["r1", "r2"]);
        let diff = diff_histories(&old, &new);
        assert!(diff.iter().all(|e| e.is_unmodified()));
        assert_eq!(diff.len(), 2);
    }

    #[test]
    fn divergence_removes_old_tail_and_adds_new_tail() {
        let old = commits(&["r1", "r2", "r3"]);
        let new = commits(&["r1", "r4"]);
        let diff = diff_histories(&old, &new);
        assert_eq!(kinds(&diff), vec!["=r1", "-r2", "-r3", "+r4"]);
    }

    #[test]
    fn appended_commits_are_added() {
        let old = commits(&["r1"]);
        let new = commits(&["r1", "r2"]);
        assert_eq!(kinds(&diff_histories(&old, &new)), vec!["=r1", "+r2"]);
    }

    #[test]
    fn empty_old_history_adds_everything() {
        let new = commits(&["r1", "r2"]);
        assert_eq!(kinds(&diff_histories(&[], &new)), vec!["+r1", "+r2"]);
    }

    #[test]
    fn serializes_with_type_tag() {
        let old = commits(&["r1"]);
        let new: Vec<Commit> = Vec::new();
        let json = serde_json::to_value(diff_histories(&old, &new)).unwrap();
        assert_eq!(json[0]["type"], "removed");
        assert_eq!(json[0]["old_commit"]["commit_id"], "r1");
    }
}
