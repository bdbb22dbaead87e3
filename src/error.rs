use std::path::PathBuf;
use thiserror::Error;

/// Unified error type for plugin-pack operations
#[derive(Error, Debug)]
pub enum PackError {
    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("No working copy or persisted path reference found at '{}'", .path.display())]
    RepositoryNotFound { path: PathBuf },

    #[error("Branch '{branch}' does not match any branch naming rule")]
    UnresolvableBranch { branch: String },

    #[error("HEAD is detached; a branch name is required to derive a version")]
    DetachedHead,

    #[error("External tool '{program}' failed with exit code {status}")]
    ExternalTool { program: String, status: i32 },

    #[error("Could not find '{file}' under '{}'", .root.display())]
    ToolkitNotFound { file: String, root: PathBuf },

    #[error("Path reference error: {0}")]
    Sidecar(String),

    #[error("Path reference already written at '{}'", .path.display())]
    SidecarExists { path: PathBuf },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Version error: {0}")]
    Version(#[from] semver::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in plugin-pack
pub type Result<T> = std::result::Result<T, PackError>;

impl PackError {
    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        PackError::Config(msg.into())
    }

    /// Create a path reference error with context
    pub fn sidecar(msg: impl Into<String>) -> Self {
        PackError::Sidecar(msg.into())
    }

    /// Create an unresolvable branch error
    pub fn unresolvable(branch: impl Into<String>) -> Self {
        PackError::UnresolvableBranch {
            branch: branch.into(),
        }
    }
}
