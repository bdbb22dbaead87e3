use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use plugin_pack::cli::orchestration::{self, BranchSource, BuildArgs};
use plugin_pack::config::{self, Config};
use plugin_pack::domain::RuleTable;
use plugin_pack::lifecycle::{self, PackageLayout, Phase, SystemRunner, TargetOs};
use plugin_pack::ui;

#[derive(Parser)]
#[command(
    name = "plugin-pack",
    version,
    about = "Derive package versions from branch names and drive the plugin packaging lifecycle"
)]
struct Cli {
    #[arg(short, long, global = true, help = "Custom configuration file path")]
    config: Option<PathBuf>,

    #[arg(short, long, global = true, help = "Enable debug logging")]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args)]
struct BranchOpts {
    #[arg(long, default_value = ".", help = "Directory the recipe is evaluated in")]
    recipe_dir: PathBuf,

    #[arg(short, long, help = "Explicitly specify the branch name")]
    branch: Option<String>,
}

impl BranchOpts {
    fn source(&self) -> BranchSource {
        let source = BranchSource::new(&self.recipe_dir);
        match &self.branch {
            Some(branch) => source.with_branch(branch.clone()),
            None => source,
        }
    }
}

#[derive(clap::Args)]
struct BuildOpts {
    #[arg(long, help = "Target OS (windows, linux, macos); defaults to the host")]
    os: Option<String>,

    #[arg(long, default_value = ".", help = "Root of the plugin sources")]
    source: PathBuf,

    #[arg(long, default_value = "build", help = "Build directory")]
    build_dir: PathBuf,

    #[arg(long, help = "Package tree containing the UI toolkit")]
    toolkit: Option<PathBuf>,

    #[arg(long, help = "Root of the installed core package")]
    core: Option<PathBuf>,

    #[arg(long, default_value = "dist", help = "Final package folder")]
    package_folder: PathBuf,
}

impl BuildOpts {
    fn args(&self, config: &Config) -> Result<BuildArgs> {
        let os = match &self.os {
            Some(name) => name.parse::<TargetOs>()?,
            None => TargetOs::host()
                .ok_or_else(|| anyhow::anyhow!("Unsupported host OS; pass --os"))?,
        };

        Ok(BuildArgs {
            os,
            source_root: self.source.clone(),
            build_dir: self.build_dir.clone(),
            toolkit_tree: self.toolkit.clone(),
            core_root: self.core.clone(),
            install_dir_value: std::env::var(&config.build.install_dir_env).ok(),
            package_folder: self.package_folder.clone(),
        })
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Record the working copy path next to the exported recipe
    Export {
        #[arg(long, default_value = ".")]
        recipe_dir: PathBuf,

        #[arg(long)]
        export_dir: PathBuf,
    },

    /// Print the package version derived from the branch
    SetVersion(BranchOpts),

    /// Print the requirement on the core package
    Requirements {
        #[command(flatten)]
        branch: BranchOpts,

        #[arg(long, help = "Print `name==constraint` instead of a package reference")]
        plain: bool,
    },

    /// Locate the UI toolkit and write the CMake toolchain file
    Generate(BuildOpts),

    /// Configure, build and install Debug and Release
    Build(BuildOpts),

    /// Install Debug and Release into the package directory
    Package(BuildOpts),

    /// Print the package directory layout
    PackageInfo,

    /// Run generate, build, package and package_info in order
    Run(BuildOpts),

    /// Show the branch naming rules in priority order, or the rule a branch matches
    Rules {
        #[command(flatten)]
        branch: BranchOpts,

        #[arg(long, help = "Classify the current (or given) branch")]
        check: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .without_time()
        .init();

    if let Err(e) = run(cli) {
        ui::display_error(&e.to_string());
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = config::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Export {
            recipe_dir,
            export_dir,
        } => {
            let record = orchestration::export(&config, &recipe_dir, &export_dir)?;
            ui::display_success(&format!(
                "Recorded working copy {}",
                record.source_path.display()
            ));
        }
        Commands::SetVersion(opts) => {
            let version = orchestration::set_version(&config, &opts.source())?;
            println!("{}", version);
        }
        Commands::Requirements { branch, plain } => {
            let requirement = orchestration::requirements(&config, &branch.source())?;
            if plain {
                println!("{}", requirement);
            } else {
                println!(
                    "{}",
                    orchestration::requirement_reference(&config, &requirement)
                );
            }
        }
        Commands::Generate(opts) => {
            let args = opts.args(&config)?;
            let report =
                orchestration::run_phases(&SystemRunner, &config, &args, [Phase::Generate])?;
            if let Some(generator) = lifecycle::generator_for(args.os) {
                ui::display_status(&format!("Generator: {}", generator));
            }
            if let Some(file) = &report.toolchain_file {
                ui::display_success(&format!("Wrote {}", file.display()));
            }
        }
        Commands::Build(opts) => {
            let args = opts.args(&config)?;
            let plan = args.plan(&config);
            ui::display_status(&format!("Install dir: {}", plan.install_dir.display()));
            orchestration::run_phases(&SystemRunner, &config, &args, [Phase::Build])?;
            ui::display_success("Built and installed Debug and Release");
        }
        Commands::Package(opts) => {
            let args = opts.args(&config)?;
            let report =
                orchestration::run_phases(&SystemRunner, &config, &args, [Phase::Package])?;
            if let Some(dir) = &report.package_dir {
                ui::display_success(&format!("Packaged into {}", dir.display()));
            }
        }
        Commands::PackageInfo => {
            print!("{}", PackageLayout::standard().to_toml()?);
        }
        Commands::Run(opts) => {
            let args = opts.args(&config)?;
            let report =
                orchestration::run_lifecycle(&SystemRunner, &config, &args, Phase::Generate)?;
            if let Some(dir) = &report.package_dir {
                ui::display_success(&format!(
                    "Packaged {} into {}",
                    config.package.name,
                    dir.display()
                ));
            }
            if let Some(layout) = &report.layout {
                print!("{}", layout.to_toml()?);
            }
        }
        Commands::Rules { branch, check } => {
            if check {
                let (name, matched) = orchestration::classify(&config, &branch.source())?;
                ui::display_branch_match(&name, &matched);
                println!("{}", matched.rule);
            } else {
                let table = RuleTable::standard()?;
                for (i, rule) in table.rules().iter().enumerate() {
                    println!("  {}. {:<10} {}", i + 1, rule.name, rule.pattern());
                }
            }
        }
    }

    Ok(())
}
