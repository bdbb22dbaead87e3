use crate::domain::BranchName;
use crate::error::{PackError, Result};
use crate::git::Repository;

/// Mock repository for testing without actual git operations
#[derive(Debug, Clone, Default)]
pub struct MockRepository {
    branch: Option<String>,
}

impl MockRepository {
    /// Create a mock with a detached HEAD
    pub fn new() -> Self {
        MockRepository { branch: None }
    }

    /// Create a mock checked out on the given branch
    pub fn on_branch(branch: impl Into<String>) -> Self {
        MockRepository {
            branch: Some(branch.into()),
        }
    }
}

impl Repository for MockRepository {
    fn current_branch(&self) -> Result<BranchName> {
        match &self.branch {
            Some(name) => BranchName::new(name.clone()),
            None => Err(PackError::DetachedHead),
        }
    }
}
