//! Registrar — in-memory student and course registry CLI.
//!
//! # Usage
//!
//! ```text
//! registrar [--config <path>] shell [--seed]
//! registrar [--config <path>] demo
//! ```
//!
//! Nothing is persisted: a registry lives exactly as long as one `shell` or
//! `demo` run. Commands can be typed or piped in, one per line.

mod commands;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use commands::{demo::DemoArgs, shell::ShellArgs};
use registrar_core::{config, RegistryConfig};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "registrar",
    version,
    about = "Manage students, courses, enrollments and grades in memory",
    long_about = None,
)]
struct Cli {
    /// Configuration file. Defaults to ~/.registrar/config.yaml.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Start a session reading one command per line from stdin.
    Shell(ShellArgs),

    /// Run the sample enrollment scenario and print the result.
    Demo(DemoArgs),
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;
    match cli.command {
        Commands::Shell(args) => args.run(config),
        Commands::Demo(args) => args.run(config),
    }
}

fn load_config(path: Option<&Path>) -> Result<RegistryConfig> {
    match path {
        Some(path) => config::load_at(path)
            .with_context(|| format!("failed to load config '{}'", path.display())),
        None => config::load().context("failed to load ~/.registrar/config.yaml"),
    }
}

/// Logs go to stderr so piped stdout stays a clean transcript.
fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("error"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
