//! lz4build: configure and build the LZ4 C library.

mod commands;
mod manifest;

use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::build::BuildArgs;
use commands::plan::OutputFormat;
use manifest::Lz4buildManifest;

#[derive(Parser)]
#[command(name = "lz4build", version, about = "Build orchestrator for the LZ4 C library")]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an lz4build.toml in the current directory
    Init {
        /// Project name (default: directory name)
        name: Option<String>,
    },
    /// Show the artifacts a configuration would produce
    Plan {
        /// Override an option (e.g. --set freestanding=true)
        #[arg(long = "set", value_name = "KEY=VALUE")]
        set: Vec<String>,
        /// Output format
        #[arg(long, value_enum, default_value_t)]
        format: OutputFormat,
        /// Treat plan warnings as errors
        #[arg(long)]
        deny_warnings: bool,
    },
    /// Compile the LZ4 sources into the requested artifacts
    Build {
        /// LZ4 checkout or its lib/ directory
        #[arg(long)]
        source: Option<PathBuf>,
        /// Output directory (default: out/ next to lz4build.toml)
        #[arg(long)]
        out_dir: Option<PathBuf>,
        /// Override an option (e.g. --set heap_mode=heap)
        #[arg(long = "set", value_name = "KEY=VALUE")]
        set: Vec<String>,
        /// Print the commands without running them
        #[arg(long)]
        dry_run: bool,
        /// Treat plan warnings as errors
        #[arg(long)]
        deny_warnings: bool,
    },
    /// Print the freestanding memcpy/memset/memmove macro header
    Macros {
        /// Write to a file instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Check toolchain, manifest and source tree
    Doctor {
        /// LZ4 checkout to inspect
        #[arg(long)]
        source: Option<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let cwd = std::env::current_dir()?;

    match cli.command {
        Commands::Init { name } => commands::init::run(&cwd, name.as_deref()),

        Commands::Plan {
            set,
            format,
            deny_warnings,
        } => {
            let (manifest, _) = load_manifest_optional(&cwd)?;
            commands::plan::run(manifest.as_ref(), &set, format, deny_warnings)
        }

        Commands::Build {
            source,
            out_dir,
            set,
            dry_run,
            deny_warnings,
        } => {
            let (manifest, project_dir) = load_manifest_optional(&cwd)?;
            let project_dir = project_dir.unwrap_or(cwd);
            let args = BuildArgs {
                source: source.as_deref(),
                out_dir: out_dir.as_deref(),
                assignments: &set,
                dry_run,
                deny_warnings,
            };
            commands::build::run(&project_dir, manifest.as_ref(), &args)
        }

        Commands::Macros { output } => commands::macros::run(output.as_deref()),

        Commands::Doctor { source } => commands::doctor::run(&cwd, source.as_deref()),
    }
}

/// Try to load a manifest from the current directory upward.
fn load_manifest_optional(
    cwd: &Path,
) -> anyhow::Result<(Option<Lz4buildManifest>, Option<PathBuf>)> {
    match Lz4buildManifest::find_and_load(cwd)? {
        Some((manifest, dir)) => Ok((Some(manifest), Some(dir))),
        None => Ok((None, None)),
    }
}
