//! Octo source emission for analyzed CHIP-8 programs.

mod config;
mod formatter;
mod loops;

pub use config::*;
pub use formatter::*;
