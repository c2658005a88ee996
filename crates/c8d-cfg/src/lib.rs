//! Reaching-set analysis for CHIP-8 family programs.
//!
//! Explores a ROM from the load address, tracking a finite set of possible
//! values per register, and classifies every byte as code, data or both.

mod analyzer;
mod error;
mod memory;
mod names;
mod quirks;
mod register;
mod value;
mod xref;

pub use analyzer::*;
pub use error::*;
pub use memory::*;
pub use names::*;
pub use quirks::*;
pub use register::*;
pub use value::*;
pub use xref::*;
