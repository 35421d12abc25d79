//! pf-maker - command-line print form maker
//!
//! Reads a print form configuration and writes a `_PF` document next to each
//! source document it lists.

use anyhow::Context;
use clap::Parser;
use print_form::PrintFormMaker;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "pf-maker", version, about = "Turn Word documents into print form templates")]
struct Cli {
    /// Path to the configuration file, absolute or relative to the current directory
    config: Option<PathBuf>,
}

/// Absolute path of the configuration file
fn resolve_config_path(input: &Path) -> anyhow::Result<PathBuf> {
    if input.is_absolute() {
        return Ok(input.to_path_buf());
    }
    let cwd = std::env::current_dir().context("Failed to read the current directory")?;
    Ok(cwd.join(input))
}

fn run(input: &Path) -> anyhow::Result<()> {
    let config_path = resolve_config_path(input)?;

    println!("Creating print form...");
    println!("JSON Config: {}", config_path.display());

    let report = PrintFormMaker::new().make_print_form(&config_path)?;
    for output in &report.outputs {
        tracing::info!("Created {}", output.display());
    }

    Ok(())
}

fn main() -> ExitCode {
    // Logs go to stderr; stdout carries the status lines
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let Some(config) = cli.config else {
        println!("Specify the path to json config file.");
        return ExitCode::FAILURE;
    };

    match run(&config) {
        Ok(()) => {
            println!("Done!");
            ExitCode::SUCCESS
        }
        Err(e) => {
            println!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
