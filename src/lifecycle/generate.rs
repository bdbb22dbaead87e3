use super::{LibraryOptions, TargetOs};
use crate::error::{PackError, Result};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// File written into the build directory by [generate]
pub const TOOLCHAIN_FILE_NAME: &str = "plugin_toolchain.cmake";

/// Generator and cache variables handed to the configure step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toolchain {
    pub generator: Option<&'static str>,
    pub variables: BTreeMap<String, String>,
}

impl Toolchain {
    /// Toolchain for `os`, pointing CMake at the toolkit installed under `toolkit_root`
    pub fn for_target(os: TargetOs, options: LibraryOptions, toolkit_root: &Path) -> Self {
        let mut variables = BTreeMap::new();

        variables.insert("BUILD_SHARED_LIBS".to_string(), on_off(options.shared));
        if os.supports_fpic() {
            variables.insert(
                "CMAKE_POSITION_INDEPENDENT_CODE".to_string(),
                on_off(options.fpic),
            );
        }
        if os == TargetOs::Windows && options.shared {
            variables.insert(
                "CMAKE_WINDOWS_EXPORT_ALL_SYMBOLS".to_string(),
                "ON".to_string(),
            );
        }
        if matches!(os, TargetOs::Linux | TargetOs::Macos) {
            variables.insert("CMAKE_CXX_STANDARD_REQUIRED".to_string(), "ON".to_string());
        }
        variables.insert("CMAKE_PREFIX_PATH".to_string(), posix_path(toolkit_root));

        Toolchain {
            generator: generator_for(os),
            variables,
        }
    }

    /// Render as a CMake script of cache assignments
    pub fn render(&self) -> String {
        let mut out = String::from("# Generated by plugin-pack; do not edit\n");
        for (name, value) in &self.variables {
            out.push_str(&format!(
                "set({} \"{}\" CACHE STRING \"\" FORCE)\n",
                name,
                value.replace('"', "\\\"")
            ));
        }
        out
    }

    /// Write the script to `<build_dir>/plugin_toolchain.cmake`
    pub fn write(&self, build_dir: &Path) -> Result<PathBuf> {
        fs::create_dir_all(build_dir)?;
        let path = build_dir.join(TOOLCHAIN_FILE_NAME);
        fs::write(&path, self.render())?;
        Ok(path)
    }
}

/// Multi-config generator for the target; `None` leaves the choice to CMake
pub fn generator_for(os: TargetOs) -> Option<&'static str> {
    match os {
        TargetOs::Macos => Some("Xcode"),
        TargetOs::Linux => Some("Ninja Multi-Config"),
        TargetOs::Windows => None,
    }
}

/// Locate the toolkit installation root inside a package tree
///
/// The marker file lives at `<root>/lib/cmake/<pkg>/<marker>`, so the root is
/// its fourth ancestor. The first match in file-name order wins.
pub fn find_toolkit_root(tree: &Path, marker: &str) -> Result<PathBuf> {
    for entry in WalkDir::new(tree).sort_by_file_name() {
        let entry = entry.map_err(|e| PackError::Io(e.into()))?;
        if !entry.file_type().is_file() || entry.file_name() != marker {
            continue;
        }

        if let Some(root) = entry.path().ancestors().nth(4) {
            tracing::debug!(
                marker = %entry.path().display(),
                root = %root.display(),
                "found toolkit"
            );
            return Ok(root.to_path_buf());
        }
    }

    Err(PackError::ToolkitNotFound {
        file: marker.to_string(),
        root: tree.to_path_buf(),
    })
}

/// Run the generate phase: discover the toolkit and write the toolchain file
pub fn generate(
    os: TargetOs,
    options: LibraryOptions,
    toolkit_tree: &Path,
    marker: &str,
    build_dir: &Path,
) -> Result<(Toolchain, PathBuf)> {
    let toolkit_root = find_toolkit_root(toolkit_tree, marker)?;
    let toolchain = Toolchain::for_target(os, options, &toolkit_root);
    let file = toolchain.write(build_dir)?;
    Ok((toolchain, file))
}

fn on_off(flag: bool) -> String {
    let value = if flag { "ON" } else { "OFF" };
    value.to_string()
}

fn posix_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}
