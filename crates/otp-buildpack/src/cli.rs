//! CLI argument parsing with clap

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Erlang/OTP buildpack
#[derive(Parser, Debug)]
#[command(name = "otp-buildpack")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to a YAML configuration overlay
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write the build plan for an application
    Detect(DetectArgs),

    /// Install Erlang/OTP into the layers directory
    Build(BuildArgs),
}

#[derive(Args, Debug)]
pub struct DetectArgs {
    /// Application directory
    #[arg(long, default_value = ".")]
    pub app_dir: PathBuf,

    /// Where to write the build plan
    #[arg(long, env = "CNB_BUILD_PLAN_PATH")]
    pub plan: PathBuf,
}

#[derive(Args, Debug)]
pub struct BuildArgs {
    /// Application directory
    #[arg(long, default_value = ".")]
    pub app_dir: PathBuf,

    /// Buildpack layers directory
    #[arg(long, env = "CNB_LAYERS_DIR")]
    pub layers: PathBuf,

    /// Stack identifier of the build image
    #[arg(long, env = "CNB_STACK_ID")]
    pub stack: String,
}
