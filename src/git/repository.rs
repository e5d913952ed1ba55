use crate::error::{DeployError, Result};
use crate::git::{Revision, SourceRepository};
use git2::{BranchType, Commit, Repository as Git2Repo};
use std::path::Path;

/// Wrapper around git2::Repository with our trait interface
pub struct Git2Source {
    repo: Git2Repo,
}

impl Git2Source {
    /// Open or discover a git repository
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Git2Repo::discover(path)?;

        Ok(Git2Source { repo })
    }

    /// Create from existing git2::Repository
    pub fn from_git2(repo: Git2Repo) -> Self {
        Git2Source { repo }
    }

    fn find_commit(&self, name: &str) -> Result<Commit<'_>> {
        if let Ok(branch) = self.repo.find_branch(name, BranchType::Local) {
            return Ok(branch.get().peel_to_commit()?);
        }

        let remote_name = format!("origin/{}", name);
        if let Ok(branch) = self.repo.find_branch(&remote_name, BranchType::Remote) {
            return Ok(branch.get().peel_to_commit()?);
        }

        let object = self
            .repo
            .revparse_single(name)
            .map_err(|e| DeployError::revision_not_found(name, e.message()))?;
        Ok(object.peel_to_commit()?)
    }
}

impl SourceRepository for Git2Source {
    fn resolve(&self, name: &str) -> Result<Revision> {
        let commit = self.find_commit(name)?;

        Ok(Revision {
            hash: commit.id().to_string(),
            summary: commit.summary().unwrap_or("(empty message)").to_string(),
        })
    }
}
