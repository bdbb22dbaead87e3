use super::generate::{generator_for, TOOLCHAIN_FILE_NAME};
use super::tools::{ToolInvocation, ToolRunner};
use super::{BuildConfiguration, TargetOs};
use crate::config::BuildConfig;
use crate::error::{PackError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Everything the build phase needs to drive CMake
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildPlan {
    pub cmake: String,
    /// Folder holding the plugin's top-level CMakeLists.txt
    pub source_dir: PathBuf,
    pub build_dir: PathBuf,
    pub generator: Option<&'static str>,
    pub toolchain_file: PathBuf,
    pub install_dir: PathBuf,
    /// Environment variable through which the install dir reaches CMake
    pub install_dir_env: String,
}

impl BuildPlan {
    /// Plan for building the sources under `source_root` into `build_dir`
    ///
    /// `install_dir_value` is the current value of the install-dir variable,
    /// if any.
    pub fn new(
        config: &BuildConfig,
        os: TargetOs,
        source_root: &Path,
        build_dir: &Path,
        install_dir_value: Option<&str>,
    ) -> Self {
        BuildPlan {
            cmake: config.cmake.clone(),
            source_dir: source_root.join(&config.source_subfolder),
            build_dir: build_dir.to_path_buf(),
            generator: generator_for(os),
            toolchain_file: build_dir.join(TOOLCHAIN_FILE_NAME),
            install_dir: resolve_install_dir(install_dir_value, build_dir),
            install_dir_env: config.install_dir_env.clone(),
        }
    }

    fn cmake(&self) -> ToolInvocation {
        ToolInvocation::new(&self.cmake).env(
            self.install_dir_env.clone(),
            self.install_dir.as_os_str().to_os_string(),
        )
    }

    /// `cmake -S <src> -B <build> [-G <gen>] -DCMAKE_TOOLCHAIN_FILE=<file>`
    pub fn configure_invocation(&self) -> ToolInvocation {
        let mut inv = self
            .cmake()
            .arg("-S")
            .path_arg(&self.source_dir)
            .arg("-B")
            .path_arg(&self.build_dir);
        if let Some(generator) = self.generator {
            inv = inv.arg("-G").arg(generator);
        }
        let mut toolchain = std::ffi::OsString::from("-DCMAKE_TOOLCHAIN_FILE=");
        toolchain.push(self.toolchain_file.as_os_str());
        inv.arg(toolchain)
    }

    pub fn build_invocation(&self, configuration: BuildConfiguration) -> ToolInvocation {
        self.cmake()
            .arg("--build")
            .path_arg(&self.build_dir)
            .arg("--config")
            .arg(configuration.name())
    }

    pub fn install_invocation(&self, configuration: BuildConfiguration) -> ToolInvocation {
        self.cmake()
            .arg("--install")
            .path_arg(&self.build_dir)
            .arg("--config")
            .arg(configuration.name())
    }
}

/// Install dir from the environment value, else `<build_dir>/install`
pub fn resolve_install_dir(value: Option<&str>, build_dir: &Path) -> PathBuf {
    match value {
        Some(dir) if !dir.trim().is_empty() => PathBuf::from(dir),
        _ => build_dir.join("install"),
    }
}

/// Copy a directory tree, merging into an existing destination
pub fn copy_tree(src: &Path, dst: &Path) -> Result<u64> {
    let mut copied = 0;
    for entry in WalkDir::new(src) {
        let entry = entry.map_err(|e| PackError::Io(e.into()))?;
        let relative = entry.path().strip_prefix(src).map_err(|e| {
            PackError::config(format!("Cannot copy '{}': {}", entry.path().display(), e))
        })?;
        let target = dst.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(entry.path(), &target)?;
            copied += 1;
        }
    }
    Ok(copied)
}

/// Run the build phase
///
/// Copies the core package into the install dir, configures once, then
/// builds and installs Debug followed by Release. The first failing tool
/// aborts the sequence.
pub fn build<R: ToolRunner + ?Sized>(runner: &R, plan: &BuildPlan, core_root: &Path) -> Result<()> {
    if !plan.toolchain_file.is_file() {
        return Err(PackError::config(format!(
            "Toolchain file '{}' not found; run the generate phase first",
            plan.toolchain_file.display()
        )));
    }

    let copied = copy_tree(core_root, &plan.install_dir)?;
    tracing::debug!(
        files = copied,
        from = %core_root.display(),
        to = %plan.install_dir.display(),
        "copied core package"
    );

    runner.run(&plan.configure_invocation())?;
    for configuration in BuildConfiguration::ALL {
        runner.run(&plan.build_invocation(configuration))?;
        runner.run(&plan.install_invocation(configuration))?;
    }
    Ok(())
}
