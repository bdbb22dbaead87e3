//! Lifecycle orchestration
//!
//! Each packaging phase as a plain function over the loaded [Config], so the
//! binary only parses arguments and prints results, and the phases can be
//! called programmatically without depending on clap.

use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::domain::{BranchMatch, BranchName, DependencyRequirement, VersionSpec};
use crate::error::{PackError, Result};
use crate::git::Repository;
use crate::lifecycle::{
    self, BuildPlan, LibraryOptions, PackageLayout, Phase, TargetOs, ToolRunner,
};
use crate::location::RepositoryLocation;
use crate::resolver::BranchVersionResolver;
use crate::sidecar::{GitPathRecord, PathReference};

/// Where the branch name comes from for one invocation
#[derive(Debug, Clone, PartialEq)]
pub struct BranchSource {
    /// Directory the recipe is evaluated in
    pub recipe_dir: PathBuf,

    /// Explicit branch name, bypassing version control
    pub branch: Option<String>,
}

impl BranchSource {
    pub fn new(recipe_dir: impl Into<PathBuf>) -> Self {
        BranchSource {
            recipe_dir: recipe_dir.into(),
            branch: None,
        }
    }

    pub fn with_branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = Some(branch.into());
        self
    }

    /// Read the branch name, preferring the explicit override
    pub fn branch_name(&self, config: &Config) -> Result<BranchName> {
        if let Some(branch) = &self.branch {
            return BranchName::new(branch.clone());
        }

        let location = RepositoryLocation::locate(&self.recipe_dir, &config.sidecar.file_name)?;
        location.open()?.current_branch()
    }
}

/// Arguments for the phases that drive CMake
#[derive(Debug, Clone, PartialEq)]
pub struct BuildArgs {
    pub os: TargetOs,
    /// Root of the plugin sources
    pub source_root: PathBuf,
    pub build_dir: PathBuf,
    /// Package tree containing the UI toolkit installation
    pub toolkit_tree: Option<PathBuf>,
    /// Root of the installed core package
    pub core_root: Option<PathBuf>,
    /// Current value of the install-dir environment variable
    pub install_dir_value: Option<String>,
    /// Final package folder the staged configurations are copied into
    pub package_folder: PathBuf,
}

impl BuildArgs {
    pub fn plan(&self, config: &Config) -> BuildPlan {
        BuildPlan::new(
            &config.build,
            self.os,
            &self.source_root,
            &self.build_dir,
            self.install_dir_value.as_deref(),
        )
    }
}

/// Outcome of running the CMake-driven phases
#[derive(Debug, Clone, PartialEq)]
pub struct LifecycleReport {
    pub toolchain_file: Option<PathBuf>,
    pub package_dir: Option<PathBuf>,
    pub layout: Option<PackageLayout>,
}

/// `export`: record where the working copy lives
pub fn export(config: &Config, recipe_dir: &Path, export_dir: &Path) -> Result<GitPathRecord> {
    let source = std::fs::canonicalize(recipe_dir)?;
    PathReference::in_dir(export_dir, &config.sidecar.file_name).persist(source)
}

/// Classify the branch, reporting which rule matched
pub fn classify(config: &Config, source: &BranchSource) -> Result<(BranchName, BranchMatch)> {
    let resolver = BranchVersionResolver::standard()?;
    let branch = source.branch_name(config)?;
    let matched = resolver.classify(&branch)?;
    Ok((branch, matched))
}

/// `set_version`: the package version for the current branch
pub fn set_version(config: &Config, source: &BranchSource) -> Result<VersionSpec> {
    let resolver = BranchVersionResolver::standard()?;
    match &source.branch {
        Some(_) => resolver.version_for_branch(&source.branch_name(config)?),
        None => {
            let location =
                RepositoryLocation::locate(&source.recipe_dir, &config.sidecar.file_name)?;
            resolver.resolve_version(&location)
        }
    }
}

/// `requirements`: the requirement on the configured core package
pub fn requirements(config: &Config, source: &BranchSource) -> Result<DependencyRequirement> {
    let resolver = BranchVersionResolver::standard()?;
    let name = &config.dependency.name;
    match &source.branch {
        Some(_) => resolver.requirement_for_branch(&source.branch_name(config)?, name),
        None => {
            let location =
                RepositoryLocation::locate(&source.recipe_dir, &config.sidecar.file_name)?;
            resolver.resolve_dependency_requirement(&location, name)
        }
    }
}

/// Package reference for a requirement, in the configured namespace
pub fn requirement_reference(config: &Config, requirement: &DependencyRequirement) -> String {
    requirement.reference(&config.dependency.user, &config.dependency.channel)
}

/// Run the CMake-driven phases from `from` through `package_info`
///
/// Phases before `generate` are ignored here. The first failing phase aborts
/// the rest.
pub fn run_lifecycle<R: ToolRunner + ?Sized>(
    runner: &R,
    config: &Config,
    args: &BuildArgs,
    from: Phase,
) -> Result<LifecycleReport> {
    run_phases(runner, config, args, from.max(Phase::Generate).remaining())
}

/// Run the given phases in the order supplied
pub fn run_phases<R, I>(
    runner: &R,
    config: &Config,
    args: &BuildArgs,
    phases: I,
) -> Result<LifecycleReport>
where
    R: ToolRunner + ?Sized,
    I: IntoIterator<Item = Phase>,
{
    let plan = args.plan(config);
    let mut report = LifecycleReport {
        toolchain_file: None,
        package_dir: None,
        layout: None,
    };

    for phase in phases {
        tracing::debug!(phase = %phase, "running phase");
        match phase {
            Phase::Generate => {
                let tree = required_path(&args.toolkit_tree, "toolkit tree")?;
                let (_, file) = lifecycle::generate(
                    args.os,
                    LibraryOptions::from(&config.build),
                    tree,
                    &config.build.toolkit_config,
                    &args.build_dir,
                )?;
                report.toolchain_file = Some(file);
            }
            Phase::Build => {
                let core = required_path(&args.core_root, "core package root")?;
                lifecycle::build(runner, &plan, core)?;
            }
            Phase::Package => {
                report.package_dir =
                    Some(lifecycle::package(runner, &plan, &args.package_folder)?);
            }
            Phase::PackageInfo => {
                report.layout = Some(PackageLayout::standard());
            }
            Phase::Export | Phase::SetVersion | Phase::Requirements => {}
        }
    }

    Ok(report)
}

fn required_path<'a>(value: &'a Option<PathBuf>, what: &str) -> Result<&'a Path> {
    value
        .as_deref()
        .ok_or_else(|| PackError::config(format!("Missing {}", what)))
}
