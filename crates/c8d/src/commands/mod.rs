//! Command implementations.
//!
//! Each submodule handles a specific CLI command.

mod decompile;
mod tables;

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use crate::cli::{Cli, Commands};

/// Dispatch CLI command to the appropriate handler.
pub fn run_command(cli: &Cli) -> i32 {
    match &cli.command {
        Commands::Decompile {
            input,
            output,
            quirks,
            batch_size,
            no_quirk_comments,
        } => decompile::cmd_decompile(
            input,
            output.as_deref(),
            (*quirks).into(),
            *batch_size,
            !*no_quirk_comments,
            !cli.silent,
        ),
        Commands::Tables {
            input,
            output,
            quirks,
        } => tables::cmd_tables(input, output.as_deref(), (*quirks).into()),
    }
}

/// Write `text` to `output`, or to stdout when no path is given.
fn write_output(output: Option<&Path>, text: &str) -> io::Result<()> {
    match output {
        Some(path) => fs::write(path, text),
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(text.as_bytes())?;
            stdout.flush()
        }
    }
}
