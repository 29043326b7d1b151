use anyhow::{Context, Result};
use bsc::compiler::Compiler;
use bsc::config::CompilerConfig;
use bsc::error::CompileError;
use bsc::features::UnmappedFeature;
use bsc::utils;
use clap::Parser;
use clap::error::ErrorKind;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Bus Schedules Compiler: turns a bus line definition into the normalized
/// schedule format used to build the app resources.
#[derive(Parser)]
#[command(name = "bsc", version, about)]
struct Args {
    /// Bus line definition, e.g. line.in
    input: PathBuf,
    /// TOML file with compiler settings
    #[clap(long)]
    config: Option<PathBuf>,
    /// Policy for unknown feature tokens (empty or reject), overriding the config file
    #[clap(long)]
    unmapped_feature: Option<UnmappedFeature>,
}

fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            print!("{err}");
            return ExitCode::SUCCESS;
        }
        Err(err) => {
            println!("Missing bus line argument");
            print!("{err}");
            return ExitCode::from(2);
        }
    };

    // stdout carries the compiled line, diagnostics go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("BSC_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if let Some(snapshot) = err
                .downcast_ref::<CompileError>()
                .and_then(CompileError::snapshot)
            {
                eprintln!("{snapshot}");
            }
            eprintln!("\nError: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => CompilerConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => CompilerConfig::default(),
    };
    if let Some(policy) = args.unmapped_feature {
        config.unmapped_feature = policy;
    }

    let output = Compiler::new(config).compile_file(&args.input)?;
    utils::write_output(&output)?;
    Ok(())
}
