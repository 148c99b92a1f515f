//! # Du Subcommand

use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use imgdef_helper::measure_directory_size;

/// Arguments for the `imgdef du` subcommand.
#[derive(Args, Debug)]
pub struct DuArgs {
    /// Directory to measure.
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    /// Subtract this many bytes from the result, stopping at zero.
    #[arg(long, value_name = "SIZE")]
    pub minus: Option<imgdef_helper::Size>,
}

pub fn run_du(args: &DuArgs, out: &mut dyn Write) -> Result<u8> {
    let mut size = measure_directory_size(&args.path)?;
    if let Some(minus) = args.minus {
        size = size.saturating_sub(minus);
    }
    writeln!(out, "{size}\t{}", args.path.display())?;
    Ok(0)
}
