use anyhow::{Context, Result};
use bsc::{blocks, utils};
use clap::Parser;
use clap::error::ErrorKind;
use std::path::PathBuf;
use std::process::ExitCode;

/// Merges `h=` schedule blocks side by side into full schedule rows.
#[derive(Parser)]
#[command(name = "mixblocks", version, about)]
struct Args {
    /// Text file holding the blocks
    input: PathBuf,
}

fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            print!("{err}");
            return ExitCode::SUCCESS;
        }
        Err(err) => {
            print!("{err}");
            return ExitCode::from(2);
        }
    };

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<()> {
    let text = fs_err::read_to_string(&args.input)?;
    let mut rows = blocks::mix_blocks(&text)
        .with_context(|| format!("mixing blocks of {}", args.input.display()))?
        .join("\n");
    rows.push('\n');
    utils::write_output(&rows)?;
    Ok(())
}
