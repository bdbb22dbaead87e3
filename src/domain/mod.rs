//! Domain logic - pure branch naming and versioning rules, independent of git

pub mod branch;
pub mod requirement;
pub mod rules;
pub mod version;

pub use branch::BranchName;
pub use requirement::{DependencyRequirement, VersionConstraint, LATEST_QUALIFIER};
pub use rules::{BranchMatch, BranchRule, ConstraintRule, RuleTable, VersionRule};
pub use version::VersionSpec;
