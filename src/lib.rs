pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod git;
pub mod lifecycle;
pub mod location;
pub mod resolver;
pub mod sidecar;
pub mod ui;

pub use error::{PackError, Result};
pub use location::RepositoryLocation;
pub use resolver::BranchVersionResolver;
