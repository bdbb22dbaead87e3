use super::build::copy_tree;
use super::tools::ToolRunner;
use super::{BuildConfiguration, BuildPlan};
use crate::error::Result;
use std::fs;
use std::path::{Path, PathBuf};

/// Staging directory the package phase installs into
pub fn package_dir(plan: &BuildPlan) -> PathBuf {
    plan.build_dir.join("package")
}

/// Run the package phase
///
/// Installs each configuration into its own prefix under the staging
/// directory, `package/Debug` and `package/Release`, then copies the staged
/// tree into `output`. Returns `output`.
pub fn package<R: ToolRunner + ?Sized>(
    runner: &R,
    plan: &BuildPlan,
    output: &Path,
) -> Result<PathBuf> {
    let root = package_dir(plan);

    for configuration in BuildConfiguration::ALL {
        let prefix = root.join(configuration.name());
        fs::create_dir_all(&prefix)?;
        let invocation = plan
            .install_invocation(configuration)
            .arg("--prefix")
            .path_arg(&prefix);
        runner.run(&invocation)?;
        tracing::debug!(
            configuration = %configuration,
            prefix = %prefix.display(),
            "packaged configuration"
        );
    }

    if output != root {
        let copied = copy_tree(&root, output)?;
        tracing::debug!(
            files = copied,
            from = %root.display(),
            to = %output.display(),
            "copied package tree"
        );
    }

    Ok(output.to_path_buf())
}
