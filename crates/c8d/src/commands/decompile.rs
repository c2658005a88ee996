//! Decompile command.

use std::fs;
use std::path::Path;

use c8d::{EmitConfig, Pipeline, Quirks};
use tracing::{error, info};

use super::write_output;
use crate::cli::{EXIT_FAILURE, EXIT_SUCCESS};
use crate::terminal::Spinner;

/// Batches between spinner updates.
const PROGRESS_INTERVAL: usize = 64;

/// Handle the `decompile` command.
pub fn cmd_decompile(
    input: &Path,
    output: Option<&Path>,
    quirks: Quirks,
    batch_size: usize,
    quirk_comments: bool,
    show_progress: bool,
) -> i32 {
    info!(input = %input.display(), ?quirks, "decompiling");

    match decompile_file(input, output, quirks, batch_size, quirk_comments, show_progress) {
        Ok(()) => {
            if let Some(path) = output {
                info!(output = %path.display(), "done");
            }
            EXIT_SUCCESS
        }
        Err(e) => {
            error!(error = %e, "decompilation failed");
            EXIT_FAILURE
        }
    }
}

fn decompile_file(
    input: &Path,
    output: Option<&Path>,
    quirks: Quirks,
    batch_size: usize,
    quirk_comments: bool,
    show_progress: bool,
) -> c8d::Result<()> {
    let rom = fs::read(input)?;
    let config = EmitConfig::default().with_quirk_comments(quirk_comments);
    let mut pipeline = Pipeline::new(&rom, quirks)?
        .with_batch_size(batch_size)
        .with_emit_config(config);

    let spinner = show_progress.then(|| Spinner::new("analyzing"));
    let mut batches = 0usize;
    while !pipeline.step_batch() {
        batches += 1;
        if batches % PROGRESS_INTERVAL == 0 {
            if let Some(spinner) = &spinner {
                spinner.set_message(format!("analyzing ({} pending)", pipeline.pending()));
            }
        }
    }
    let steps = pipeline.steps();
    pipeline.finalize()?;

    let text = pipeline.format(rom.len())?;
    write_output(output, &text)?;

    if let Some(spinner) = spinner {
        spinner.finish_with_success(&format!("analyzed {} bytes in {steps} steps", rom.len()));
    }
    Ok(())
}
