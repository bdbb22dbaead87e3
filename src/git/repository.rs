use crate::domain::BranchName;
use crate::error::{PackError, Result};
use git2::Repository as Git2Repo;
use std::path::Path;

/// Wrapper around git2::Repository with our trait interface
pub struct Git2Repository {
    repo: Git2Repo,
}

impl Git2Repository {
    /// Open or discover a git repository
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Git2Repo::discover(path)?;

        Ok(Git2Repository { repo })
    }

    /// Create from existing git2::Repository
    pub fn from_git2(repo: Git2Repo) -> Self {
        Git2Repository { repo }
    }
}

impl super::Repository for Git2Repository {
    fn current_branch(&self) -> Result<BranchName> {
        // Read HEAD directly so unborn branches resolve too
        let head = self.repo.find_reference("HEAD")?;

        match head.symbolic_target() {
            Some(target) => BranchName::from_reference(target),
            None => Err(PackError::DetachedHead),
        }
    }
}
