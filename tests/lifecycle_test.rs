// tests/lifecycle_test.rs
use plugin_pack::cli::orchestration::{run_lifecycle, run_phases, BuildArgs};
use plugin_pack::config::Config;
use plugin_pack::lifecycle::{
    PackageLayout, Phase, RecordingRunner, TargetOs, TOOLCHAIN_FILE_NAME,
};
use plugin_pack::PackError;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

// Toolkit tree, core package and source folder laid out under one temp dir
fn setup_workspace() -> TempDir {
    let dir = TempDir::new().expect("Could not create temp dir");
    let root = dir.path();

    let qt_cmake = root.join("qt").join("6.3.1").join("lib").join("cmake").join("Qt6");
    fs::create_dir_all(&qt_cmake).unwrap();
    fs::write(qt_cmake.join("Qt6Config.cmake"), "").unwrap();

    let core_lib = root.join("core").join("lib");
    fs::create_dir_all(&core_lib).unwrap();
    fs::write(core_lib.join("libHDPS_Public.so"), "").unwrap();

    fs::create_dir_all(root.join("src").join("hdps").join("VTKLoaderPlugin")).unwrap();
    dir
}

fn build_args(root: &Path, install_dir: Option<&str>) -> BuildArgs {
    BuildArgs {
        os: TargetOs::Linux,
        source_root: root.join("src"),
        build_dir: root.join("build"),
        toolkit_tree: Some(root.join("qt")),
        core_root: Some(root.join("core")),
        install_dir_value: install_dir.map(str::to_string),
        package_folder: root.join("dist"),
    }
}

#[test]
fn test_full_lifecycle_command_sequence() {
    let ws = setup_workspace();
    let root = ws.path();
    let runner = RecordingRunner::new();

    let report = run_lifecycle(
        &runner,
        &Config::default(),
        &build_args(root, None),
        Phase::Generate,
    )
    .unwrap();

    let build = root.join("build");
    let b = build.display();
    let expected = vec![
        format!(
            "cmake -S {} -B {} -G Ninja Multi-Config -DCMAKE_TOOLCHAIN_FILE={}",
            root.join("src").join("hdps").join("VTKLoaderPlugin").display(),
            b,
            build.join(TOOLCHAIN_FILE_NAME).display()
        ),
        format!("cmake --build {} --config Debug", b),
        format!("cmake --install {} --config Debug", b),
        format!("cmake --build {} --config Release", b),
        format!("cmake --install {} --config Release", b),
        format!(
            "cmake --install {} --config Debug --prefix {}",
            b,
            build.join("package").join("Debug").display()
        ),
        format!(
            "cmake --install {} --config Release --prefix {}",
            b,
            build.join("package").join("Release").display()
        ),
    ];
    assert_eq!(runner.command_lines(), expected);

    assert_eq!(report.package_dir, Some(root.join("dist")));
    assert_eq!(report.toolchain_file, Some(build.join(TOOLCHAIN_FILE_NAME)));
    assert_eq!(report.layout, Some(PackageLayout::standard()));

    let toolchain = fs::read_to_string(build.join(TOOLCHAIN_FILE_NAME)).unwrap();
    assert!(toolchain.contains("CMAKE_CXX_STANDARD_REQUIRED \"ON\""));
    assert!(toolchain.contains("BUILD_SHARED_LIBS \"ON\""));
    assert!(toolchain.contains("CMAKE_POSITION_INDEPENDENT_CODE \"ON\""));
    assert!(toolchain.contains(&format!(
        "CMAKE_PREFIX_PATH \"{}\"",
        root.join("qt").join("6.3.1").display()
    )));

    // core package copied into the default install dir
    assert!(build
        .join("install")
        .join("lib")
        .join("libHDPS_Public.so")
        .is_file());

    // both configurations land in the final package folder the layout refers to
    assert!(root.join("dist").join("Debug").is_dir());
    assert!(root.join("dist").join("Release").is_dir());
}

#[test]
fn test_install_dir_from_environment_value() {
    let ws = setup_workspace();
    let root = ws.path();
    let custom = root.join("hdps-install");
    let runner = RecordingRunner::new();

    run_lifecycle(
        &runner,
        &Config::default(),
        &build_args(root, custom.to_str()),
        Phase::Generate,
    )
    .unwrap();

    assert!(custom.join("lib").join("libHDPS_Public.so").is_file());
    for invocation in runner.invocations() {
        assert_eq!(
            invocation.env,
            vec![("HDPS_INSTALL_DIR".to_string(), custom.clone().into_os_string())]
        );
    }
}

#[test]
fn test_failing_tool_aborts_remaining_phases() {
    let ws = setup_workspace();
    let root = ws.path();
    // configure, build Debug, install Debug (fails)
    let runner = RecordingRunner::failing_at(2);

    let result = run_lifecycle(
        &runner,
        &Config::default(),
        &build_args(root, None),
        Phase::Generate,
    );

    assert!(matches!(result, Err(PackError::ExternalTool { status: 1, .. })));
    assert_eq!(runner.invocations().len(), 3);
}

#[test]
fn test_build_without_generate_fails() {
    let ws = setup_workspace();
    let runner = RecordingRunner::new();

    let result = run_lifecycle(
        &runner,
        &Config::default(),
        &build_args(ws.path(), None),
        Phase::Build,
    );

    assert!(matches!(result, Err(PackError::Config(_))));
    assert!(runner.invocations().is_empty());
}

#[test]
fn test_missing_toolkit_fails_generate() {
    let ws = setup_workspace();
    fs::remove_dir_all(ws.path().join("qt")).unwrap();
    fs::create_dir_all(ws.path().join("qt")).unwrap();
    let runner = RecordingRunner::new();

    let result = run_lifecycle(
        &runner,
        &Config::default(),
        &build_args(ws.path(), None),
        Phase::Generate,
    );

    assert!(matches!(result, Err(PackError::ToolkitNotFound { .. })));
    assert!(runner.invocations().is_empty());
}

#[test]
fn test_macos_uses_xcode() {
    let ws = setup_workspace();
    let runner = RecordingRunner::new();
    let mut args = build_args(ws.path(), None);
    args.os = TargetOs::Macos;

    run_lifecycle(&runner, &Config::default(), &args, Phase::Generate).unwrap();

    let configure = runner.invocations()[0].args_lossy();
    let g = configure.iter().position(|a| a == "-G").unwrap();
    assert_eq!(configure[g + 1], "Xcode");
}

#[test]
fn test_library_options_from_config() {
    let ws = setup_workspace();
    let mut config = Config::default();
    config.build.shared = false;
    config.build.fpic = false;

    let report = run_phases(
        &RecordingRunner::new(),
        &config,
        &build_args(ws.path(), None),
        [Phase::Generate],
    )
    .unwrap();

    let toolchain = fs::read_to_string(report.toolchain_file.unwrap()).unwrap();
    assert!(toolchain.contains("BUILD_SHARED_LIBS \"OFF\""));
    assert!(toolchain.contains("CMAKE_POSITION_INDEPENDENT_CODE \"OFF\""));
}

#[test]
fn test_single_phase_runs_only_that_phase() {
    let ws = setup_workspace();
    let runner = RecordingRunner::new();

    let report = run_phases(
        &runner,
        &Config::default(),
        &build_args(ws.path(), None),
        [Phase::Generate],
    )
    .unwrap();

    assert!(report.toolchain_file.is_some());
    assert_eq!(report.package_dir, None);
    assert!(runner.invocations().is_empty());
}

#[test]
fn test_package_copies_installed_files() {
    let ws = setup_workspace();
    let root = ws.path();
    let staged = root.join("build").join("package").join("Debug").join("lib");
    fs::create_dir_all(&staged).unwrap();
    fs::write(staged.join("libVTKLoaderPlugin.so"), "").unwrap();

    run_phases(
        &RecordingRunner::new(),
        &Config::default(),
        &build_args(root, None),
        [Phase::Package],
    )
    .unwrap();

    assert!(root
        .join("dist")
        .join("Debug")
        .join("lib")
        .join("libVTKLoaderPlugin.so")
        .is_file());
    assert!(root.join("dist").join("Release").is_dir());
}
