//! CLI definitions and argument types.

use std::path::PathBuf;

use c8d::{BATCH_SIZE, Quirks};
use clap::{Args, Parser, Subcommand};

/// Exit code for success.
pub const EXIT_SUCCESS: i32 = 0;
/// Exit code for failure.
pub const EXIT_FAILURE: i32 = 1;

#[derive(Parser)]
#[command(name = "c8d")]
#[command(about = "CHIP-8 decompiler - recovers Octo source from ROM images")]
#[command(version)]
pub struct Cli {
    /// Enable verbose output (sets RUST_LOG=debug)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress output (only show errors)
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub silent: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Decompile a ROM to Octo source
    Decompile {
        /// Input ROM file
        #[arg(value_name = "ROM")]
        input: PathBuf,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        quirks: QuirkArgs,

        /// Worklist pops per analysis batch
        #[arg(long, default_value_t = BATCH_SIZE)]
        batch_size: usize,

        /// Omit the quirk comments at the top of the output
        #[arg(long)]
        no_quirk_comments: bool,
    },
    /// Export the classification and cross-reference tables as JSON
    Tables {
        /// Input ROM file
        #[arg(value_name = "ROM")]
        input: PathBuf,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        quirks: QuirkArgs,
    },
}

/// Interpreter behavior flags shared by the analysis commands.
#[derive(Args, Clone, Copy, Debug, Default)]
pub struct QuirkArgs {
    /// Shifts modify vx in place and ignore vy
    #[arg(long)]
    pub shift_quirks: bool,

    /// Load and store leave i unchanged
    #[arg(long)]
    pub load_store_quirks: bool,

    /// Arithmetic writes vf before the result register
    #[arg(long)]
    pub vf_order_quirks: bool,
}

impl From<QuirkArgs> for Quirks {
    fn from(args: QuirkArgs) -> Self {
        Self::new()
            .with_shift(args.shift_quirks)
            .with_load_store(args.load_store_quirks)
            .with_vf_order(args.vf_order_quirks)
    }
}
