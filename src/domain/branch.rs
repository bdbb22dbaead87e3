use crate::error::{PackError, Result};
use std::fmt;

/// A branch name as read from version control
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BranchName(String);

impl BranchName {
    /// Create a branch name, rejecting empty input
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(PackError::unresolvable(name));
        }
        Ok(BranchName(trimmed.to_string()))
    }

    /// Strip `refs/heads/` from a full reference name
    pub fn from_reference(reference: &str) -> Result<Self> {
        match reference.strip_prefix("refs/heads/") {
            Some(short) => Self::new(short),
            None => Err(PackError::DetachedHead),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BranchName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
