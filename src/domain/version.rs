use crate::error::Result;
use std::fmt;

/// Version derived from a branch name
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct VersionSpec {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
    pub qualifier: Option<String>,
}

impl VersionSpec {
    /// Create a release version without qualifier
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        VersionSpec {
            major,
            minor,
            patch,
            qualifier: None,
        }
    }

    /// Create a `0.0.0-<qualifier>` development version
    pub fn development(qualifier: impl Into<String>) -> Self {
        VersionSpec {
            major: 0,
            minor: 0,
            patch: 0,
            qualifier: Some(qualifier.into()),
        }
    }

    /// Convert to a `semver::Version`, validating the qualifier
    pub fn to_semver(&self) -> Result<semver::Version> {
        let mut version = semver::Version::new(self.major, self.minor, self.patch);
        if let Some(qualifier) = &self.qualifier {
            version.pre = semver::Prerelease::new(qualifier)?;
        }
        Ok(version)
    }
}

impl fmt::Display for VersionSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if let Some(qualifier) = &self.qualifier {
            write!(f, "-{}", qualifier)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_display() {
        let v = VersionSpec::new(1, 2, 3);
        assert_eq!(v.to_string(), "1.2.3");
    }

    #[test]
    fn test_development_display() {
        let v = VersionSpec::development("feature.xyz");
        assert_eq!(v.to_string(), "0.0.0-feature.xyz");
        assert_eq!(v.qualifier.as_deref(), Some("feature.xyz"));
    }

    #[test]
    fn test_to_semver_release() {
        let v = VersionSpec::new(2, 4, 0).to_semver().unwrap();
        assert_eq!(v, semver::Version::new(2, 4, 0));
    }

    #[test]
    fn test_to_semver_prerelease() {
        let v = VersionSpec::development("bugfix.crash-on-load")
            .to_semver()
            .unwrap();
        assert_eq!(v.pre.as_str(), "bugfix.crash-on-load");
    }

    #[test]
    fn test_to_semver_invalid_qualifier() {
        assert!(VersionSpec::development("bad qualifier").to_semver().is_err());
    }

    #[test]
    fn test_release_orders_after_prerelease_of_same_number() {
        assert!(VersionSpec::new(0, 0, 0) < VersionSpec::new(0, 0, 1));
    }
}
