use crate::domain::{BranchMatch, BranchName, DependencyRequirement, RuleTable, VersionSpec};
use crate::error::Result;
use crate::git::Repository;
use crate::location::RepositoryLocation;

/// Derives the package version and the upstream requirement from a branch
pub struct BranchVersionResolver {
    rules: RuleTable,
}

impl BranchVersionResolver {
    /// Create a resolver over a custom rule table
    pub fn new(rules: RuleTable) -> Self {
        BranchVersionResolver { rules }
    }

    /// Create a resolver using the project's branch naming convention
    pub fn standard() -> Result<Self> {
        Ok(Self::new(RuleTable::standard()?))
    }

    /// Version of the package built from the branch at `location`
    pub fn resolve_version(&self, location: &RepositoryLocation) -> Result<VersionSpec> {
        let repo = location.open()?;
        self.version_from_repository(&repo)
    }

    /// Requirement on `dependency_name` for the branch at `location`
    pub fn resolve_dependency_requirement(
        &self,
        location: &RepositoryLocation,
        dependency_name: &str,
    ) -> Result<DependencyRequirement> {
        let repo = location.open()?;
        self.requirement_from_repository(&repo, dependency_name)
    }

    pub fn version_from_repository<R: Repository>(&self, repo: &R) -> Result<VersionSpec> {
        let branch = repo.current_branch()?;
        self.version_for_branch(&branch)
    }

    pub fn requirement_from_repository<R: Repository>(
        &self,
        repo: &R,
        dependency_name: &str,
    ) -> Result<DependencyRequirement> {
        let branch = repo.current_branch()?;
        self.requirement_for_branch(&branch, dependency_name)
    }

    /// Version derived from a branch name alone
    pub fn version_for_branch(&self, branch: &BranchName) -> Result<VersionSpec> {
        Ok(self.classify(branch)?.version)
    }

    /// Requirement derived from a branch name alone
    pub fn requirement_for_branch(
        &self,
        branch: &BranchName,
        dependency_name: &str,
    ) -> Result<DependencyRequirement> {
        let matched = self.classify(branch)?;
        Ok(DependencyRequirement::new(
            dependency_name,
            matched.constraint,
        ))
    }

    /// Full match result, including which rule applied
    pub fn classify(&self, branch: &BranchName) -> Result<BranchMatch> {
        self.rules.first_match(branch)
    }
}
