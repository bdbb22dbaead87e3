use std::fmt;

/// Qualifier carried by development builds of the upstream package
pub const LATEST_QUALIFIER: &str = "latest";

/// Version constraint placed on the upstream package
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionConstraint {
    /// Any release on the `major.minor` line
    ReleaseLine { major: u64, minor: u64 },
    /// The latest development build
    LatestDevelopment,
}

impl VersionConstraint {
    /// Expression used inside a package reference
    pub fn reference_expr(&self) -> String {
        match self {
            VersionConstraint::ReleaseLine { major, minor } => format!("[~{}.{}]", major, minor),
            VersionConstraint::LatestDevelopment => LATEST_QUALIFIER.to_string(),
        }
    }
}

impl fmt::Display for VersionConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionConstraint::ReleaseLine { major, minor } => write!(f, "{}.{}.x", major, minor),
            VersionConstraint::LatestDevelopment => f.write_str(LATEST_QUALIFIER),
        }
    }
}

/// A dependency name bound to a version constraint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyRequirement {
    pub name: String,
    pub constraint: VersionConstraint,
}

impl DependencyRequirement {
    pub fn new(name: impl Into<String>, constraint: VersionConstraint) -> Self {
        DependencyRequirement {
            name: name.into(),
            constraint,
        }
    }

    /// Render as a package reference, e.g. `hdps-core/[~2.4]@lkeb/stable`
    pub fn reference(&self, user: &str, channel: &str) -> String {
        format!(
            "{}/{}@{}/{}",
            self.name,
            self.constraint.reference_expr(),
            user,
            channel
        )
    }
}

impl fmt::Display for DependencyRequirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}=={}", self.name, self.constraint)
    }
}
