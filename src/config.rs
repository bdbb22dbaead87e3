use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{PackError, Result};
use crate::sidecar::DEFAULT_FILE_NAME;

/// Represents the complete configuration for plugin-pack.
///
/// Contains the packaged plugin's identity, the upstream dependency, the
/// path-reference file name, and the build settings.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub package: PackageConfig,

    #[serde(default)]
    pub dependency: DependencyConfig,

    #[serde(default)]
    pub sidecar: SidecarConfig,

    #[serde(default)]
    pub build: BuildConfig,
}

fn default_package_name() -> String {
    "VTKLoaderPlugin".to_string()
}

/// Identity of the packaged plugin.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct PackageConfig {
    #[serde(default = "default_package_name")]
    pub name: String,
}

impl Default for PackageConfig {
    fn default() -> Self {
        PackageConfig {
            name: default_package_name(),
        }
    }
}

fn default_dependency_name() -> String {
    "hdps-core".to_string()
}

fn default_user() -> String {
    "lkeb".to_string()
}

fn default_channel() -> String {
    "stable".to_string()
}

/// The upstream "core" package and the namespace its references live in.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct DependencyConfig {
    #[serde(default = "default_dependency_name")]
    pub name: String,

    #[serde(default = "default_user")]
    pub user: String,

    #[serde(default = "default_channel")]
    pub channel: String,
}

impl Default for DependencyConfig {
    fn default() -> Self {
        DependencyConfig {
            name: default_dependency_name(),
            user: default_user(),
            channel: default_channel(),
        }
    }
}

fn default_sidecar_file_name() -> String {
    DEFAULT_FILE_NAME.to_string()
}

/// Where the export phase records the original working-copy path.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct SidecarConfig {
    #[serde(default = "default_sidecar_file_name")]
    pub file_name: String,
}

impl Default for SidecarConfig {
    fn default() -> Self {
        SidecarConfig {
            file_name: default_sidecar_file_name(),
        }
    }
}

fn default_source_subfolder() -> String {
    "hdps/VTKLoaderPlugin".to_string()
}

fn default_install_dir_env() -> String {
    "HDPS_INSTALL_DIR".to_string()
}

fn default_toolkit_config() -> String {
    "Qt6Config.cmake".to_string()
}

fn default_cmake() -> String {
    "cmake".to_string()
}

fn default_shared() -> bool {
    true
}

fn default_fpic() -> bool {
    true
}

/// Settings for the generate, build and package phases.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct BuildConfig {
    /// Folder, relative to the source root, holding the top-level CMakeLists.txt
    #[serde(default = "default_source_subfolder")]
    pub source_subfolder: String,

    /// Environment variable naming the install directory
    #[serde(default = "default_install_dir_env")]
    pub install_dir_env: String,

    /// File that marks the root of the UI toolkit installation
    #[serde(default = "default_toolkit_config")]
    pub toolkit_config: String,

    #[serde(default = "default_cmake")]
    pub cmake: String,

    #[serde(default = "default_shared")]
    pub shared: bool,

    /// Position-independent code; ignored on Windows
    #[serde(default = "default_fpic")]
    pub fpic: bool,
}

impl Default for BuildConfig {
    fn default() -> Self {
        BuildConfig {
            source_subfolder: default_source_subfolder(),
            install_dir_env: default_install_dir_env(),
            toolkit_config: default_toolkit_config(),
            cmake: default_cmake(),
            shared: default_shared(),
            fpic: default_fpic(),
        }
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `pluginpack.toml` in current directory
/// 3. `.pluginpack.toml` in the user config directory
/// 4. Default configuration if no file found
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If file exists but cannot be read or parsed
pub fn load_config(config_path: Option<&Path>) -> Result<Config> {
    let config_str = if let Some(path) = config_path {
        fs::read_to_string(path)?
    } else if Path::new("./pluginpack.toml").exists() {
        fs::read_to_string("./pluginpack.toml")?
    } else if let Some(config_dir) = dirs::config_dir() {
        let config_path = config_dir.join(".pluginpack.toml");
        if config_path.exists() {
            fs::read_to_string(config_path)?
        } else {
            return Ok(Config::default());
        }
    } else {
        return Ok(Config::default());
    };

    parse_config(&config_str)
}

/// Parses configuration from a TOML string.
pub fn parse_config(config_str: &str) -> Result<Config> {
    toml::from_str(config_str).map_err(|e| PackError::config(e.to_string()))
}
