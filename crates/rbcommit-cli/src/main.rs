//! rbcommit - commit-series validation CLI
//!
//! The `rbcommit` command validates multi-commit uploads one commit at a
//! time and finalizes the series once every commit has been validated.
//!
//! ## Commands
//!
//! - `validate`: Validate one commit and print the extended validation info
//! - `exists`: Check whether a file exists as of a pending commit
//! - `finalize`: Check a full series against its validation info
//! - `decode`: Pretty-print an encoded validation info
//! - `diff-history`: Compare two uploads of a commit series

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use tracing::{debug, Level};

use rbcommit_core::{
    diff_histories, file_exists_in_history, finalize_commit_series, validate_commit, Commit,
    FinalizedSeries, GitRepository, HistoryDiffEntry, Revision, ValidationInfo,
};

#[derive(Parser)]
#[command(name = "rbcommit")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Commit-series validation for multi-commit review requests", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true, env = "RBCOMMIT_LOG_JSON")]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate one commit against the pending chain and the repository
    Validate {
        /// Path to the git work tree the series applies to
        #[arg(long, env = "RBCOMMIT_REPO", default_value = ".")]
        repo: PathBuf,

        /// Commit description (JSON)
        #[arg(short, long)]
        commit: PathBuf,

        /// Validation info returned by the previous call (empty for the first commit)
        #[arg(long, default_value = "")]
        validation_info: String,
    },

    /// Check whether a file exists as of a commit in the pending chain
    Exists {
        /// Path to the git work tree the series applies to
        #[arg(long, env = "RBCOMMIT_REPO", default_value = ".")]
        repo: PathBuf,

        /// Encoded validation info
        #[arg(long, default_value = "")]
        validation_info: String,

        /// Commit to check from
        #[arg(long)]
        parent: String,

        /// File path
        #[arg(long)]
        path: String,

        /// File revision (UNKNOWN matches by path only)
        #[arg(long, default_value = "UNKNOWN")]
        revision: String,
    },

    /// Finalize a validated commit series
    Finalize {
        /// Commit series (JSON array)
        #[arg(long)]
        commits: PathBuf,

        /// Validation info covering every commit in the series
        #[arg(long)]
        validation_info: String,
    },

    /// Pretty-print an encoded validation info
    Decode {
        /// Encoded validation info
        raw: String,
    },

    /// Compare two uploads of a commit series
    DiffHistory {
        /// Previous commit series (JSON array)
        #[arg(long)]
        old: PathBuf,

        /// New commit series (JSON array)
        #[arg(long)]
        new: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    rbcommit_core::init_tracing(cli.json, level);

    match cli.command {
        Commands::Validate {
            repo,
            commit,
            validation_info,
        } => {
            let encoded = cmd_validate(&repo, &commit, &validation_info)?;
            println!("{}", encoded);
            Ok(())
        }
        Commands::Exists {
            repo,
            validation_info,
            parent,
            path,
            revision,
        } => {
            let exists = cmd_exists(&repo, &validation_info, &parent, &path, &revision)?;
            println!("{}", exists);
            Ok(())
        }
        Commands::Finalize {
            commits,
            validation_info,
        } => {
            let series = cmd_finalize(&commits, &validation_info)?;
            println!("{}", serde_json::to_string_pretty(&series)?);
            Ok(())
        }
        Commands::Decode { raw } => {
            let info = parse_validation_info(&raw)?;
            println!("{}", serde_json::to_string_pretty(&info)?);
            Ok(())
        }
        Commands::DiffHistory { old, new } => cmd_diff_history(&old, &new),
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let data = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&data).with_context(|| format!("Failed to parse {}", path.display()))
}

fn parse_validation_info(raw: &str) -> Result<ValidationInfo> {
    if raw.trim().is_empty() {
        return Ok(ValidationInfo::new());
    }
    ValidationInfo::decode(raw).context("Could not parse validation info")
}

/// Validate one commit and return the encoded, extended validation info
fn cmd_validate(repo: &Path, commit: &Path, validation_info: &str) -> Result<String> {
    let repository = GitRepository::open(repo).context("Failed to open repository")?;
    let commit: Commit = read_json(commit)?;
    let info = parse_validation_info(validation_info)?;
    debug!(
        repo = %repository.root().display(),
        commit_id = %commit.commit_id,
        chain_len = info.len(),
        "validating commit"
    );

    let updated = validate_commit(&repository, &info, &commit)
        .with_context(|| format!("Commit {} failed validation", commit.commit_id))?;
    Ok(updated.encode()?)
}

fn cmd_exists(
    repo: &Path,
    validation_info: &str,
    parent: &str,
    path: &str,
    revision: &str,
) -> Result<bool> {
    let repository = GitRepository::open(repo).context("Failed to open repository")?;
    let info = parse_validation_info(validation_info)?;
    let revision = Revision::from(revision);
    Ok(file_exists_in_history(&info, &repository, parent, path, &revision)?)
}

fn cmd_finalize(commits: &Path, validation_info: &str) -> Result<FinalizedSeries> {
    let commits: Vec<Commit> = read_json(commits)?;
    let info = parse_validation_info(validation_info)?;
    finalize_commit_series(&commits, &info).context("Failed to finalize commit series")
}

/// Print a commit-history diff, one line per commit
fn cmd_diff_history(old: &Path, new: &Path) -> Result<()> {
    let old: Vec<Commit> = read_json(old)?;
    let new: Vec<Commit> = read_json(new)?;

    for line in render_history_diff(&diff_histories(&old, &new)) {
        println!("{}", line);
    }
    Ok(())
}

fn render_history_diff(entries: &[HistoryDiffEntry<'_>]) -> Vec<String> {
    entries
        .iter()
        .map(|entry| match entry {
            HistoryDiffEntry::Unmodified { new_commit, .. } => {
                format!("  {} {}", new_commit.commit_id, new_commit.summary())
            }
            HistoryDiffEntry::Removed { old_commit } => {
                format!("- {} {}", old_commit.commit_id, old_commit.summary())
            }
            HistoryDiffEntry::Added { new_commit } => {
                format!("+ {} {}", new_commit.commit_id, new_commit.summary())
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rbcommit_core::FileChange;

    fn write_json<T: serde::Serialize>(dir: &Path, name: &str, value: &T) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, serde_json::to_string(value).unwrap()).unwrap();
        path
    }

    fn commit(id: &str, parent: &str, message: &str) -> Commit {
        Commit::new(id, parent, "Alice", "alice@example.com", message)
            .with_files(vec![FileChange::added(format!("{id}.txt"), id)])
    }

    #[test]
    fn parses_validate_command() {
        let cli = Cli::try_parse_from([
            "rbcommit",
            "validate",
            "--repo",
            "/tmp/repo",
            "--commit",
            "c.json",
        ])
        .unwrap();
        match cli.command {
            Commands::Validate {
                repo,
                commit,
                validation_info,
            } => {
                assert_eq!(repo, PathBuf::from("/tmp/repo"));
                assert_eq!(commit, PathBuf::from("c.json"));
                assert!(validation_info.is_empty());
            }
            _ => panic!("expected validate"),
        }
    }

    #[test]
    fn exists_defaults_to_unknown_revision() {
        let args = ["rbcommit", "exists", "--parent", "r1", "--path", "foo"];
        let cli = Cli::try_parse_from(args).unwrap();
        match cli.command {
            Commands::Exists { revision, .. } => assert_eq!(revision, "UNKNOWN"),
            _ => panic!("expected exists"),
        }
    }

    #[test]
    fn empty_validation_info_starts_new_chain() {
        assert!(parse_validation_info("  ").unwrap().is_empty());
        assert!(parse_validation_info("%%%").is_err());
    }

    #[test]
    fn finalize_reads_series_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let commits = vec![commit("r1", "r0", "First"), commit("r2", "r1", "Second")];
        let mut info = ValidationInfo::new();
        for c in &commits {
            info.record(&c.commit_id, &c.parent_id, &c.files);
        }
        let path = write_json(dir.path(), "commits.json", &commits);

        let series = cmd_finalize(&path, &info.encode().unwrap()).unwrap();

        assert_eq!(series.commit_ids, vec!["r1", "r2"]);
        assert_eq!(series.cumulative.added.len(), 2);
    }

    #[test]
    fn validate_requires_git_repository() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_json(dir.path(), "c.json", &commit("r1", "r0", "First"));
        let err = cmd_validate(dir.path(), &path, "").unwrap_err();
        assert!(err.to_string().contains("Failed to open repository"));
    }

    #[test]
    fn history_diff_renders_markers() {
        let old = vec![commit("r1", "r0", "First"), commit("r2", "r1", "Second")];
        let new = vec![
            commit("r1", "r0", "First"),
            commit("r3", "r1", "Third\n\nbody"),
        ];
        let lines = render_history_diff(&diff_histories(&old, &new));
        assert_eq!(lines, vec!["  r1 First", "- r2 Second", "+ r3 Third"]);
    }
}
