//! Program memory and per-address classification.

use c8d_isa::{Instr, LOAD_ADDRESS, MAX_ROM_SIZE, MEMORY_SIZE};

use crate::AnalysisError;

/// Immutable interpreter memory with a ROM loaded at [`LOAD_ADDRESS`].
#[derive(Clone, Debug)]
pub struct Program {
    memory: Box<[u8]>,
    rom_len: usize,
}

impl Program {
    /// Load a ROM image. Everything outside the ROM reads as zero.
    pub fn load(rom: &[u8]) -> Result<Self, AnalysisError> {
        if rom.len() > MAX_ROM_SIZE {
            return Err(AnalysisError::RomTooLarge {
                size: rom.len(),
                max: MAX_ROM_SIZE,
            });
        }
        let mut memory = vec![0u8; MEMORY_SIZE].into_boxed_slice();
        let start = LOAD_ADDRESS as usize;
        memory[start..start + rom.len()].copy_from_slice(rom);
        Ok(Self {
            memory,
            rom_len: rom.len(),
        })
    }

    pub const fn rom_len(&self) -> usize {
        self.rom_len
    }

    /// Byte at `addr`; zero past the end of memory.
    #[inline]
    pub fn byte(&self, addr: u32) -> u8 {
        self.memory.get(addr as usize).copied().unwrap_or(0)
    }

    /// Bytes from `addr` to the end of memory.
    pub fn bytes_from(&self, addr: u16) -> &[u8] {
        &self.memory[addr as usize..]
    }

    /// Decode the instruction at `addr`.
    pub fn instr(&self, addr: u16) -> Instr {
        Instr::decode_at(self.bytes_from(addr))
    }

    /// Saturation bound for computed index pointer values.
    pub fn pointer_limit(&self) -> u16 {
        let limit = self.rom_len + LOAD_ADDRESS as usize + 1;
        u16::try_from(limit).unwrap_or(u16::MAX)
    }
}

/// What the analysis has learned about a byte.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Class {
    #[default]
    Unclassified,
    /// Executed.
    Code,
    /// Read or written by an instruction.
    Data,
    /// Self-modifying: both executed and accessed as data.
    Smc,
}

impl Class {
    /// Join in the lattice `Unclassified < {Code, Data} < Smc`.
    pub const fn join(self, other: Self) -> Self {
        match (self, other) {
            (Self::Unclassified, x) | (x, Self::Unclassified) => x,
            (Self::Code, Self::Code) => Self::Code,
            (Self::Data, Self::Data) => Self::Data,
            _ => Self::Smc,
        }
    }

    /// Whether this byte was executed at some point.
    pub const fn is_executed(self) -> bool {
        matches!(self, Self::Code | Self::Smc)
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Unclassified => "unclassified",
            Self::Code => "code",
            Self::Data => "data",
            Self::Smc => "smc",
        }
    }
}

/// Classification of every address in memory.
#[derive(Clone, Debug)]
pub struct ClassMap {
    classes: Box<[Class]>,
}

impl Default for ClassMap {
    fn default() -> Self {
        Self::new()
    }
}

impl ClassMap {
    pub fn new() -> Self {
        Self {
            classes: vec![Class::Unclassified; MEMORY_SIZE].into_boxed_slice(),
        }
    }

    /// Class at `addr`; addresses past the end of memory are unclassified.
    #[inline]
    pub fn get(&self, addr: u32) -> Class {
        self.classes
            .get(addr as usize)
            .copied()
            .unwrap_or(Class::Unclassified)
    }

    /// Join `class` into `addr`. Addresses past the end of memory are ignored.
    pub fn mark(&mut self, addr: u32, class: Class) {
        if let Some(slot) = self.classes.get_mut(addr as usize) {
            *slot = slot.join(class);
        }
    }

    /// Mark `len` bytes starting at `addr`.
    pub fn mark_range(&mut self, addr: u32, len: u32, class: Class) {
        for offset in 0..len {
            self.mark(addr + offset, class);
        }
    }

    /// Number of addresses with the given class.
    pub fn count(&self, class: Class) -> usize {
        self.classes.iter().filter(|c| **c == class).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, Class)> + '_ {
        (0u32..).zip(self.classes.iter().copied())
    }
}
