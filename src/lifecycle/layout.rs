use super::BuildConfiguration;
use serde::Serialize;

/// Directories a consumer should use for one configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirLayout {
    pub libdirs: Vec<String>,
    pub bindirs: Vec<String>,
    pub includedirs: Vec<String>,
}

impl DirLayout {
    /// Layout of a configuration installed under `<name>/`
    pub fn for_configuration(configuration: BuildConfiguration) -> Self {
        let root = configuration.name();
        DirLayout {
            libdirs: vec![format!("{}/lib", root)],
            bindirs: vec![format!("{}/Plugins", root), root.to_string()],
            includedirs: vec![format!("{}/include", root), root.to_string()],
        }
    }
}

/// Output layout of the package, one isolated folder per configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageLayout {
    pub debug: DirLayout,
    pub release: DirLayout,
}

impl PackageLayout {
    pub fn standard() -> Self {
        PackageLayout {
            debug: DirLayout::for_configuration(BuildConfiguration::Debug),
            release: DirLayout::for_configuration(BuildConfiguration::Release),
        }
    }

    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string(self)
    }
}
