use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use depgraph_core::BomMode;
use tracing_subscriber::EnvFilter;

mod cmd;
mod output;

/// depgraph - SBOM generation for cross-platform cargo projects
#[derive(Parser)]
#[command(name = "depgraph")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Enable verbose output
  #[arg(short, long, global = true)]
  verbose: bool,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Generate an SBOM of the project's direct dependencies
  Generate {
    /// Project directory containing Cargo.toml and Cargo.lock
    #[arg(default_value = ".")]
    project: PathBuf,

    /// Settings file (default: <project>/sbom.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the JSON report to stdout instead of writing reports
    #[arg(long)]
    print: bool,

    /// Omit the serial number for reproducible output
    #[arg(long)]
    no_serial: bool,
  },

  /// Generate an aggregate SBOM including transitive dependencies
  Aggregate {
    /// Project directory containing Cargo.toml and Cargo.lock
    #[arg(default_value = ".")]
    project: PathBuf,

    /// Settings file (default: <project>/sbom.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the JSON report to stdout instead of writing reports
    #[arg(long)]
    print: bool,

    /// Omit the serial number for reproducible output
    #[arg(long)]
    no_serial: bool,
  },

  /// Print the greeting for the platform this binary was built for
  Greet,

  /// Show platform and tool information
  Info,
}

fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::from_default_env())
    .without_time()
    .init();

  let cli = Cli::parse();

  match cli.command {
    Commands::Generate {
      project,
      config,
      print,
      no_serial,
    } => cmd::cmd_generate(
      &project,
      config.as_deref(),
      BomMode::Direct,
      print,
      no_serial,
      cli.verbose,
    ),
    Commands::Aggregate {
      project,
      config,
      print,
      no_serial,
    } => cmd::cmd_generate(
      &project,
      config.as_deref(),
      BomMode::Aggregate,
      print,
      no_serial,
      cli.verbose,
    ),
    Commands::Greet => {
      cmd::cmd_greet();
      Ok(())
    }
    Commands::Info => {
      cmd::cmd_info();
      Ok(())
    }
  }
}
