//! In-memory repository (tests and dry runs).

use std::collections::HashSet;
use std::sync::Mutex;

use super::Repository;
use crate::domain::{Result, Revision};

/// In-memory repository backed by a set of `(path, revision)` pairs.
///
/// Every query is recorded so callers can assert how often the repository
/// was consulted.
#[derive(Debug, Default)]
pub struct MemoryRepository {
    files: HashSet<(String, Revision)>,
    queries: Mutex<Vec<(String, Revision)>>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, path: impl Into<String>, revision: impl Into<Revision>) -> Self {
        self.add_file(path, revision);
        self
    }

    pub fn add_file(&mut self, path: impl Into<String>, revision: impl Into<Revision>) {
        self.files.insert((path.into(), revision.into()));
    }

    /// All queries made so far, oldest first.
    pub fn queries(&self) -> Vec<(String, Revision)> {
        self.queries.lock().unwrap().clone()
    }

    pub fn query_count(&self) -> usize {
        self.queries.lock().unwrap().len()
    }
}

impl Repository for MemoryRepository {
    fn name(&self) -> &str {
        "memory"
    }

    fn get_file_exists(&self, path: &str, revision: &Revision) -> Result<bool> {
        self.queries
            .lock()
            .unwrap()
            .push((path.to_string(), revision.clone()));

        let found = match revision {
            Revision::PreCreation => false,
            Revision::Unknown | Revision::Head => self.files.iter().any(|(p, _)| p == path),
            known => self.files.contains(&(path.to_string(), known.clone())),
        };
        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_known_revisions_only() {
        let repo = MemoryRepository::new().with_file("foo", "abc");
        let (abc, def) = (Revision::known("abc"), Revision::known("def"));
        assert!(repo.get_file_exists("foo", &abc).unwrap());
        assert!(!repo.get_file_exists("foo", &def).unwrap());
        assert!(!repo.get_file_exists("bar", &abc).unwrap());
    }

    #[test]
    fn unknown_revision_matches_by_path() {
        let repo = MemoryRepository::new().with_file("foo", "abc");
        assert!(repo.get_file_exists("foo", &Revision::Unknown).unwrap());
        assert!(!repo.get_file_exists("bar", &Revision::Unknown).unwrap());
    }

    #[test]
    fn records_every_query() {
        let repo = MemoryRepository::new();
        repo.get_file_exists("a", &Revision::Head).unwrap();
        repo.get_file_exists("b", &Revision::known("1")).unwrap();
        assert_eq!(repo.query_count(), 2);
        assert_eq!(repo.queries()[1], ("b".to_string(), Revision::known("1")));
    }
}
