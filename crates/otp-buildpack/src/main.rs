//! Erlang/OTP buildpack
//!
//! Entry point for the `detect` and `build` phases.

mod cli;
mod commands;
mod output;

use anyhow::Result;
use clap::Parser;
use otp_core::ConfigLoader;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize rustls crypto provider (required for rustls 0.23+)
    let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();

    let cli = Cli::parse();

    let mut loader = ConfigLoader::new();
    if let Some(path) = &cli.config {
        loader = loader.with_file(path);
    }
    let config = loader.load()?;

    init_tracing(cli.verbose, cli.quiet, config.log_level.as_deref());

    match cli.command {
        Commands::Detect(args) => commands::detect::run(args, &config),
        Commands::Build(args) => commands::build::run(args, &config, !cli.quiet).await,
    }
}

/// Initialize tracing from the CLI flags and the configured log level
fn init_tracing(verbose: u8, quiet: bool, log_level: Option<&str>) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match (verbose, log_level) {
            (0, Some(level)) if level.eq_ignore_ascii_case("debug") => EnvFilter::new("debug"),
            (0, _) => EnvFilter::new("info"),
            (1, _) => EnvFilter::new("debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .init();
}
