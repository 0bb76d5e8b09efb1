//! Command-line interface module.
//!
//! This module defines the CLI structure using Clap, including
//! all commands, arguments, and options.
//!
//! # Commands
//!
//! - `resolve`: Classify every declaration in a fact file
//! - `merge`: Merge the availability of named declarations
//! - `init`: Create an example configuration file
//! - `validate`: Validate a configuration file
//!
//! # Example Usage
//!
//! ```bash
//! # Resolve against the targets in sdkgate.yaml
//! sdkgate resolve facts.json
//!
//! # Override targets on the command line
//! sdkgate resolve facts.json --min macos=10.13 --min ios=12.0 --max ios=17.0
//!
//! # Machine-readable output for the emission layer
//! sdkgate resolve facts.json --format json --output availability.json
//!
//! # Availability of a construct built from two declarations
//! sdkgate merge facts.json NSUserActivity UIScene
//!
//! # Initialize configuration
//! sdkgate init
//! ```

use crate::types::ReportFormat;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// SdkGate - deployment-target availability resolver for header bindings.
#[derive(Parser, Debug)]
#[command(
    name = "sdkgate",
    author,
    version,
    about = "Deployment-target availability resolver for header bindings",
    long_about = "SdkGate classifies native header declarations as always, conditionally, \
                  or never usable within configured per-platform deployment targets, and \
                  renders the attributes and runtime checks binding generators need."
)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true, env = "SDKGATE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Classify declarations against the deployment targets
    #[command(visible_alias = "r")]
    Resolve(ResolveArgs),

    /// Merge the availability of several declarations
    #[command(visible_alias = "m")]
    Merge(MergeArgs),

    /// Create an example configuration file
    Init,

    /// Validate a configuration file
    Validate(ValidateArgs),
}

/// Deployment target overrides shared by commands that resolve.
#[derive(Args, Debug, Default, Clone)]
pub struct TargetArgs {
    /// Minimum deployment target override (PLATFORM=VERSION, repeatable)
    #[arg(long, value_name = "PLATFORM=VERSION")]
    pub min: Vec<String>,

    /// Maximum deployment target override (PLATFORM=VERSION, repeatable)
    #[arg(long, value_name = "PLATFORM=VERSION")]
    pub max: Vec<String>,
}

/// Arguments for the resolve command.
#[derive(Args, Debug)]
pub struct ResolveArgs {
    /// JSON file with declaration facts
    #[arg(value_name = "FACTS")]
    pub facts: PathBuf,

    #[command(flatten)]
    pub targets: TargetArgs,

    /// Output format
    #[arg(short, long, default_value = "text", value_enum)]
    pub format: ReportFormat,

    /// Output file path (stdout if not specified)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Exit with code 2 when any declaration is never usable
    #[arg(long)]
    pub strict: bool,

    /// Evaluate declarations sequentially
    #[arg(long)]
    pub no_parallel: bool,
}

/// Arguments for the merge command.
#[derive(Args, Debug)]
pub struct MergeArgs {
    /// JSON file with declaration facts
    #[arg(value_name = "FACTS")]
    pub facts: PathBuf,

    /// Declarations the composed construct depends on
    #[arg(value_name = "NAME", required = true)]
    pub names: Vec<String>,

    #[command(flatten)]
    pub targets: TargetArgs,
}

/// Arguments for the validate command.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Path to configuration file to validate
    #[arg(id = "file", value_name = "FILE", default_value = "sdkgate.yaml")]
    pub file: PathBuf,
}
