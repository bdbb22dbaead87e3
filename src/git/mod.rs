//! Git operations abstraction layer
//!
//! The packaging lifecycle only ever needs to know which branch a working copy
//! has checked out. The [Repository] trait captures that read-only view so the
//! resolver can be driven by a real repository ([repository::Git2Repository])
//! or by an in-memory one ([mock::MockRepository]) in tests.
//!
//! ```rust
//! # use plugin_pack::git::{MockRepository, Repository};
//! let repo = MockRepository::on_branch("release/2.4");
//! assert_eq!(repo.current_branch().unwrap().as_str(), "release/2.4");
//! ```

pub mod mock;
pub mod repository;

pub use mock::MockRepository;
pub use repository::Git2Repository;

use crate::domain::BranchName;
use crate::error::Result;

/// Read-only access to the branch a working copy has checked out
///
/// ## Error Handling
///
/// Implementations return [crate::error::PackError::DetachedHead] when `HEAD`
/// does not point at a local branch, and map underlying `git2` failures to
/// [crate::error::PackError::Git].
pub trait Repository {
    /// Name of the checked-out branch, without the `refs/heads/` prefix
    ///
    /// An unborn branch (fresh repository with no commits) still has a name
    /// and is reported like any other branch.
    fn current_branch(&self) -> Result<BranchName>;
}
