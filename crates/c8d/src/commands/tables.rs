//! Table export command.

use std::fs;
use std::path::Path;

use c8d::{Error, Pipeline, Quirks, Report};
use tracing::{error, info};

use super::write_output;
use crate::cli::{EXIT_FAILURE, EXIT_SUCCESS};

/// Handle the `tables` command.
pub fn cmd_tables(input: &Path, output: Option<&Path>, quirks: Quirks) -> i32 {
    info!(input = %input.display(), ?quirks, "exporting tables");

    match export_tables(input, output, quirks) {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => {
            error!(error = %e, "table export failed");
            EXIT_FAILURE
        }
    }
}

fn export_tables(input: &Path, output: Option<&Path>, quirks: Quirks) -> c8d::Result<()> {
    let rom = fs::read(input)?;
    let mut pipeline = Pipeline::new(&rom, quirks)?;
    pipeline.run();
    pipeline.finalize()?;

    let analysis = pipeline.analysis().ok_or(Error::NotFinalized("tables"))?;
    let json = Report::new(analysis).to_json()?;
    write_output(output, &json)?;
    Ok(())
}
