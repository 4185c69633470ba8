//! File revisions as reported by a diff.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Wire form of [`Revision::Unknown`].
pub const UNKNOWN: &str = "UNKNOWN";

/// Wire form of [`Revision::PreCreation`].
pub const PRE_CREATION: &str = "PRE-CREATION";

/// Wire form of [`Revision::Head`].
pub const HEAD: &str = "HEAD";

/// A file revision.
///
/// SCMs that do not track per-file revisions report [`Revision::Unknown`];
/// lookups with that revision match on filename alone.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Revision {
    /// A concrete revision, e.g. a blob SHA or changeset ID.
    Known(String),
    /// The SCM does not track per-file revisions.
    Unknown,
    /// The file did not exist before this change.
    PreCreation,
    /// Tip of the repository.
    Head,
}

impl Revision {
    /// Build a revision from a raw string.
    ///
    /// Sentinel strings map to their variants, so the value always survives
    /// a serialize/deserialize round trip.
    pub fn known(rev: impl Into<String>) -> Self {
        Revision::from(rev.into())
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Revision::Unknown)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Revision::Known(rev) => rev,
            Revision::Unknown => UNKNOWN,
            Revision::PreCreation => PRE_CREATION,
            Revision::Head => HEAD,
        }
    }

    /// Whether a recorded revision satisfies a query for `self`.
    ///
    /// An `Unknown` query matches any recorded revision.
    pub fn matches(&self, recorded: &Revision) -> bool {
        self.is_unknown() || self == recorded
    }
}

impl From<&str> for Revision {
    fn from(s: &str) -> Self {
        match s {
            UNKNOWN => Revision::Unknown,
            PRE_CREATION => Revision::PreCreation,
            HEAD => Revision::Head,
            other => Revision::Known(other.to_string()),
        }
    }
}

impl From<String> for Revision {
    fn from(s: String) -> Self {
        match s.as_str() {
            UNKNOWN | PRE_CREATION | HEAD => Revision::from(s.as_str()),
            _ => Revision::Known(s),
        }
    }
}

impl From<Revision> for String {
    fn from(rev: Revision) -> Self {
        match rev {
            Revision::Known(rev) => rev,
            other => other.as_str().to_string(),
        }
    }
}

impl fmt::Display for Revision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
