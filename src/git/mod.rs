//! Source revision lookup
//!
//! Before archiving a branch the deploy resolves it to a commit so the
//! summary can name exactly what was shipped. The [SourceRepository] trait
//! has two implementations:
//!
//! - [repository::Git2Source]: reads the local repository with `git2`
//! - [mock::MockSource]: fixed answers for testing

pub mod mock;
pub mod repository;

pub use mock::MockSource;
pub use repository::Git2Source;

use crate::error::Result;

/// Commit a branch name resolved to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Revision {
    /// Full commit hash
    pub hash: String,
    /// First line of the commit message
    pub summary: String,
}

impl Revision {
    /// Abbreviated hash, seven characters like `git log --oneline`
    pub fn short_hash(&self) -> &str {
        self.hash.get(..7).unwrap_or(&self.hash)
    }
}

/// Read-only view of the repository being deployed
pub trait SourceRepository {
    /// Resolve a branch, tag or commit-ish to the commit it points at.
    ///
    /// Local branches are tried first, then `origin/<name>`, then any
    /// revision expression `git archive` would accept.
    ///
    /// # Returns
    /// * `Ok(Revision)` - The resolved commit
    /// * `Err` - If nothing by that name exists
    fn resolve(&self, name: &str) -> Result<Revision>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_hash() {
        let rev = Revision {
            hash: "0123456789abcdef".to_string(),
            summary: "init".to_string(),
        };
        assert_eq!(rev.short_hash(), "0123456");

        let short = Revision {
            hash: "abc".to_string(),
            summary: String::new(),
        };
        assert_eq!(short.short_hash(), "abc");
    }

    #[test]
    fn test_short_hash_multibyte() {
        let rev = Revision {
            hash: "ééééé".to_string(),
            summary: String::new(),
        };
        assert_eq!(rev.short_hash(), "ééééé");
    }
}
