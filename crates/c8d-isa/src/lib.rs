//! CHIP-8 family instruction set definitions and decoder.
//!
//! Covers CHIP-8, SUPER-CHIP and XO-CHIP encodings, Octo-syntax disassembly,
//! and the COSMAC 1802 opcode table used for machine code called via `0nnn`.

pub mod cosmac;
mod decode;
mod disasm;
mod types;

pub use disasm::*;
pub use types::*;
