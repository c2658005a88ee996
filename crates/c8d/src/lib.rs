//! C8D - CHIP-8 decompiler
//!
//! Recovers re-assemblable Octo source from CHIP-8, SUPER-CHIP and XO-CHIP
//! ROM images by abstract interpretation over register value sets.
//!
//! # Example
//!
//! ```no_run
//! use c8d::{Pipeline, Quirks};
//!
//! let rom = std::fs::read("game.ch8")?;
//! let mut pipeline = Pipeline::new(&rom, Quirks::new().with_shift(true))?;
//! while !pipeline.step_batch() {}
//! pipeline.finalize()?;
//! println!("{}", pipeline.format(rom.len())?);
//! # Ok::<(), c8d::Error>(())
//! ```

// Re-export from sub-crates
pub use c8d_cfg::{
    Analysis, AnalysisError, Analyzer, BATCH_SIZE, Class, ClassMap, Program, Quirks, Register,
    RegisterState, SymbolTable, ValueSet, XrefTable,
};
pub use c8d_emit::{EmitConfig, Formatter, Indent};
pub use c8d_isa::{Instr, LOAD_ADDRESS, MAX_ROM_SIZE, format_instr};

mod error;
mod pipeline;
mod report;

pub use error::*;
pub use pipeline::*;
pub use report::*;
