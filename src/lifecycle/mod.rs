//! Packaging lifecycle
//!
//! Phases run in a fixed order: `export`, `set_version`, `requirements`,
//! `generate`, `build`, `package`, `package_info`. The first three only touch
//! the branch resolver and the persisted path reference; the rest build
//! command lines for CMake and hand them to a [tools::ToolRunner].

pub mod build;
pub mod generate;
pub mod layout;
pub mod package;
pub mod tools;

pub use build::{build, resolve_install_dir, BuildPlan};
pub use generate::{find_toolkit_root, generate, generator_for, Toolchain, TOOLCHAIN_FILE_NAME};
pub use layout::{DirLayout, PackageLayout};
pub use package::package;
pub use tools::{RecordingRunner, SystemRunner, ToolInvocation, ToolRunner};

use crate::config::BuildConfig;
use crate::error::PackError;
use std::fmt;
use std::str::FromStr;

/// A phase of the packaging lifecycle, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Phase {
    Export,
    SetVersion,
    Requirements,
    Generate,
    Build,
    Package,
    PackageInfo,
}

impl Phase {
    pub const ALL: [Phase; 7] = [
        Phase::Export,
        Phase::SetVersion,
        Phase::Requirements,
        Phase::Generate,
        Phase::Build,
        Phase::Package,
        Phase::PackageInfo,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Phase::Export => "export",
            Phase::SetVersion => "set_version",
            Phase::Requirements => "requirements",
            Phase::Generate => "generate",
            Phase::Build => "build",
            Phase::Package => "package",
            Phase::PackageInfo => "package_info",
        }
    }

    /// Phases from `self` to the end of the lifecycle
    pub fn remaining(self) -> impl Iterator<Item = Phase> {
        Phase::ALL.into_iter().filter(move |p| *p >= self)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A named build variant with its own output prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuildConfiguration {
    Debug,
    Release,
}

impl BuildConfiguration {
    /// Both configurations, in the order they are built
    pub const ALL: [BuildConfiguration; 2] =
        [BuildConfiguration::Debug, BuildConfiguration::Release];

    pub fn name(&self) -> &'static str {
        match self {
            BuildConfiguration::Debug => "Debug",
            BuildConfiguration::Release => "Release",
        }
    }
}

impl fmt::Display for BuildConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Operating system the package is built for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetOs {
    Windows,
    Linux,
    Macos,
}

impl TargetOs {
    /// The OS this binary was compiled for, if supported
    pub fn host() -> Option<Self> {
        match std::env::consts::OS {
            "windows" => Some(TargetOs::Windows),
            "linux" => Some(TargetOs::Linux),
            "macos" => Some(TargetOs::Macos),
            _ => None,
        }
    }

    /// Whether position-independent code is a meaningful option
    pub fn supports_fpic(&self) -> bool {
        !matches!(self, TargetOs::Windows)
    }
}

/// How the plugin library is compiled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LibraryOptions {
    pub shared: bool,
    pub fpic: bool,
}

impl From<&BuildConfig> for LibraryOptions {
    fn from(config: &BuildConfig) -> Self {
        LibraryOptions {
            shared: config.shared,
            fpic: config.fpic,
        }
    }
}

impl FromStr for TargetOs {
    type Err = PackError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "windows" => Ok(TargetOs::Windows),
            "linux" => Ok(TargetOs::Linux),
            "macos" | "darwin" => Ok(TargetOs::Macos),
            other => Err(PackError::config(format!(
                "Unsupported target os: '{}'",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_order() {
        let names: Vec<&str> = Phase::ALL.iter().map(|p| p.name()).collect();
        assert_eq!(
            names,
            vec![
                "export",
                "set_version",
                "requirements",
                "generate",
                "build",
                "package",
                "package_info"
            ]
        );
    }

    #[test]
    fn test_remaining_phases() {
        let rest: Vec<Phase> = Phase::Build.remaining().collect();
        assert_eq!(rest, vec![Phase::Build, Phase::Package, Phase::PackageInfo]);
    }

    #[test]
    fn test_target_os_parse() {
        assert_eq!("Linux".parse::<TargetOs>().unwrap(), TargetOs::Linux);
        assert_eq!("Macos".parse::<TargetOs>().unwrap(), TargetOs::Macos);
        assert_eq!("windows".parse::<TargetOs>().unwrap(), TargetOs::Windows);
        assert!("freebsd".parse::<TargetOs>().is_err());
    }

    #[test]
    fn test_fpic_dropped_on_windows() {
        assert!(!TargetOs::Windows.supports_fpic());
        assert!(TargetOs::Linux.supports_fpic());
        assert!(TargetOs::Macos.supports_fpic());
    }

    #[test]
    fn test_configurations_in_build_order() {
        assert_eq!(
            BuildConfiguration::ALL.map(|c| c.name()),
            ["Debug", "Release"]
        );
    }
}
