//! SdkGate CLI entry point.
//!
//! This binary provides the command-line interface for SdkGate.

use clap::Parser;
use sdkgate::cli::{Cli, Commands, TargetArgs};
use sdkgate::reporter::Reporter;
use sdkgate::{analyzer, ingest, render, Config, Evaluator, SdkGateError};
use std::path::Path;
use std::process::ExitCode;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() -> ExitCode {
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.quiet);

    match run(&cli) {
        Ok(exit_code) => exit_code,
        Err(e) => {
            tracing::error!(error = %e, "Fatal error");

            eprintln!("Error: {e}");

            let causes: Vec<_> = e.chain().skip(1).collect();
            if !causes.is_empty() {
                eprintln!("\nCaused by:");
                for (i, cause) in causes.iter().enumerate() {
                    eprintln!("  {i}: {cause}");
                }
            }

            if let Some(SdkGateError::Multiple { errors, .. }) = e.downcast_ref::<SdkGateError>() {
                for error in errors {
                    eprintln!("  - {error}");
                }
            }

            let code = e
                .downcast_ref::<SdkGateError>()
                .map_or(1, SdkGateError::exit_code);
            ExitCode::from(u8::try_from(code).unwrap_or(1))
        }
    }
}

fn init_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        // RUST_LOG wins over the verbosity flag
        EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            let base_level = match verbose {
                0 => "warn",
                1 => "info",
                2 => "debug",
                _ => "trace",
            };
            EnvFilter::new(format!("warn,sdkgate={base_level}"))
        })
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_thread_ids(false),
        )
        .with(filter)
        .init();
}

fn run(cli: &Cli) -> anyhow::Result<ExitCode> {
    match &cli.command {
        Commands::Resolve(args) => {
            let mut config = load_config(cli)?;
            apply_overrides(&mut config, &args.targets)?;
            if args.no_parallel {
                config.resolve.parallel = false;
            }

            let evaluator = Evaluator::new(config.clone());
            let report = evaluator.evaluate_file(&args.facts)?;

            let reporter = Reporter::new(&config);
            let output = reporter.generate(&report, args.format)?;

            if let Some(output_path) = &args.output {
                std::fs::write(output_path, &output)?;
                tracing::info!(path = %output_path.display(), "Report written");
            } else {
                println!("{output}");
            }

            if args.strict && report.has_unusable() {
                return Ok(ExitCode::from(2));
            }
            Ok(ExitCode::from(0))
        }

        Commands::Merge(args) => {
            let mut config = load_config(cli)?;
            apply_overrides(&mut config, &args.targets)?;

            let records = ingest::load_declarations(&args.facts)?;
            let evaluator = Evaluator::new(config);
            let merged = evaluator.merge_named(&records, &args.names)?;
            let classification = analyzer::resolve(&merged, &evaluator.config().targets);

            let document = serde_json::json!({
                "inputs": args.names,
                "classification": classification,
                "availability": merged,
                "documentation": render::documentation(&merged, classification),
                "attribute": render::attribute(&merged),
                "runtime_check": render::runtime_check(&merged, classification),
            });
            println!("{}", serde_json::to_string_pretty(&document)?);
            Ok(ExitCode::from(0))
        }

        Commands::Init => {
            let config_path = Path::new("sdkgate.yaml");

            if config_path.exists() {
                anyhow::bail!("Configuration file already exists: {}", config_path.display());
            }

            std::fs::write(config_path, Config::example_yaml())?;
            println!("Created example configuration: sdkgate.yaml");
            Ok(ExitCode::from(0))
        }

        Commands::Validate(args) => {
            let config_content = std::fs::read_to_string(&args.file)?;
            match Config::from_yaml(&config_content) {
                Ok(_) => {
                    println!("Configuration is valid: {}", args.file.display());
                    Ok(ExitCode::from(0))
                }
                Err(e) => {
                    eprintln!("Configuration error: {e}");
                    Ok(ExitCode::from(1))
                }
            }
        }
    }
}

fn apply_overrides(config: &mut Config, targets: &TargetArgs) -> anyhow::Result<()> {
    if !targets.min.is_empty() || !targets.max.is_empty() {
        tracing::debug!(
            min_overrides = targets.min.len(),
            max_overrides = targets.max.len(),
            "Applying deployment target overrides"
        );
        config.merge_cli_args(targets)?;
    }
    Ok(())
}

/// Load the configuration used by commands that resolve declarations.
fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = find_config(cli)?;
    if cli.verbose > 0 {
        config.output.verbose = true;
    }
    Ok(config)
}

fn find_config(cli: &Cli) -> anyhow::Result<Config> {
    if let Some(ref config_path) = cli.config {
        tracing::debug!(path = %config_path.display(), "Loading configuration from explicit path");
        let content = std::fs::read_to_string(config_path)?;
        return Ok(Config::from_yaml(&content)?);
    }

    let default_paths = ["sdkgate.yaml", "sdkgate.yml", ".sdkgate.yaml"];
    tracing::debug!("Searching for default configuration files");
    for path in &default_paths {
        if Path::new(path).exists() {
            tracing::debug!(path = %path, "Found configuration file");
            let content = std::fs::read_to_string(path)?;
            return Ok(Config::from_yaml(&content)?);
        }
    }

    tracing::debug!("No configuration file found, using default configuration");
    Ok(Config::default())
}
