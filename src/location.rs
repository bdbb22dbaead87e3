use crate::error::{PackError, Result};
use crate::git::Git2Repository;
use crate::sidecar::{GitPathRecord, PathReference};
use std::path::{Path, PathBuf};

/// Where the branch name is read from
///
/// Exactly one source is used per invocation: a live working copy when the
/// recipe directory has `.git`, otherwise the path recorded at export time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepositoryLocation {
    WorkingCopy(PathBuf),
    PersistedReference(GitPathRecord),
}

impl RepositoryLocation {
    /// Pick the source for `recipe_dir`
    pub fn locate(recipe_dir: impl AsRef<Path>, sidecar_name: &str) -> Result<Self> {
        let recipe_dir = recipe_dir.as_ref();

        if recipe_dir.join(".git").exists() {
            tracing::debug!(dir = %recipe_dir.display(), "using live working copy");
            return Ok(RepositoryLocation::WorkingCopy(recipe_dir.to_path_buf()));
        }

        let reference = PathReference::in_dir(recipe_dir, sidecar_name);
        if reference.exists() {
            return Ok(RepositoryLocation::PersistedReference(reference.load()?));
        }

        Err(PackError::RepositoryNotFound {
            path: recipe_dir.to_path_buf(),
        })
    }

    /// Path of the working copy this location points at
    pub fn source_path(&self) -> &Path {
        match self {
            RepositoryLocation::WorkingCopy(path) => path,
            RepositoryLocation::PersistedReference(record) => &record.source_path,
        }
    }

    /// Open the repository behind this location
    pub fn open(&self) -> Result<Git2Repository> {
        let path = self.source_path();
        if !path.exists() {
            return Err(PackError::RepositoryNotFound {
                path: path.to_path_buf(),
            });
        }
        Git2Repository::open(path)
    }
}
