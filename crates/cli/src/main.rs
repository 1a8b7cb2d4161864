mod cmd;
mod output;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use cmd::{cmd_build, cmd_clean, cmd_targets};
use output::OutputFormat;

/// hostbuild - headless build automation for game projects
#[derive(Parser)]
#[command(name = "hostbuild")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Enable verbose output
  #[arg(short, long, global = true)]
  verbose: bool,

  /// Project directory (default: current directory)
  #[arg(short, long, global = true, value_name = "DIR")]
  project: Option<PathBuf>,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Build the project as configured by BUILD_TARGET, OUTPUT_DIR and friends
  Build {
    /// Program that performs the platform build
    #[arg(long, env = "BUILD_EXECUTOR", value_name = "PROGRAM")]
    executor: Option<String>,

    /// Output format for the build summary
    #[arg(short = 'o', long, value_enum, default_value = "text")]
    output: OutputFormat,
  },

  /// Delete the host's incremental build caches
  Clean {
    /// Show what would be removed without deleting anything
    #[arg(long)]
    dry_run: bool,

    /// Output format
    #[arg(short = 'o', long, value_enum, default_value = "text")]
    output: OutputFormat,
  },

  /// List the build targets the project's host version supports
  Targets {
    /// Output format
    #[arg(short = 'o', long, value_enum, default_value = "text")]
    output: OutputFormat,
  },
}

fn init_logging(verbose: bool) {
  let default = if verbose { "hostbuild=debug" } else { "hostbuild=info" };
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .without_time()
    .init();
}

fn main() -> Result<()> {
  let cli = Cli::parse();
  init_logging(cli.verbose);

  let project = match cli.project {
    Some(path) => path,
    None => std::env::current_dir().context("Failed to determine current directory")?,
  };

  match cli.command {
    Commands::Build { executor, output } => {
      let code = cmd_build(&project, executor, output)?;
      std::process::exit(code)
    }
    Commands::Clean { dry_run, output } => cmd_clean(&project, dry_run, output),
    Commands::Targets { output } => cmd_targets(&project, output),
  }
}
