use crate::error::{DeployError, Result};
use crate::git::{Revision, SourceRepository};
use std::collections::HashMap;

/// Mock source for testing without a git repository
pub struct MockSource {
    revisions: HashMap<String, Revision>,
}

impl MockSource {
    /// Create a new empty mock source
    pub fn new() -> Self {
        MockSource {
            revisions: HashMap::new(),
        }
    }

    /// Make `name` resolve to the given commit
    pub fn add_revision(
        &mut self,
        name: impl Into<String>,
        hash: impl Into<String>,
        summary: impl Into<String>,
    ) {
        self.revisions.insert(
            name.into(),
            Revision {
                hash: hash.into(),
                summary: summary.into(),
            },
        );
    }
}

impl Default for MockSource {
    fn default() -> Self {
        Self::new()
    }
}

impl SourceRepository for MockSource {
    fn resolve(&self, name: &str) -> Result<Revision> {
        self.revisions
            .get(name)
            .cloned()
            .ok_or_else(|| DeployError::revision_not_found(name, "no such branch"))
    }
}
