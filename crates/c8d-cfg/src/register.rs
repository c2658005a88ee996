//! Abstract register names tracked by the analysis.

use c8d_isa::{NUM_FLAG_REGS, NUM_V_REGS};

/// Every location the analysis tracks a value set for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Register {
    V0,
    V1,
    V2,
    V3,
    V4,
    V5,
    V6,
    V7,
    V8,
    V9,
    VA,
    VB,
    VC,
    VD,
    VE,
    VF,
    /// Index pointer.
    I,
    /// Addresses a `return` at this point may land on.
    Rets,
    F0,
    F1,
    F2,
    F3,
    F4,
    F5,
    F6,
    F7,
    /// XO-CHIP drawing plane mask.
    Plane,
}

const V_REGS: [Register; NUM_V_REGS] = [
    Register::V0,
    Register::V1,
    Register::V2,
    Register::V3,
    Register::V4,
    Register::V5,
    Register::V6,
    Register::V7,
    Register::V8,
    Register::V9,
    Register::VA,
    Register::VB,
    Register::VC,
    Register::VD,
    Register::VE,
    Register::VF,
];

const FLAG_REGS: [Register; NUM_FLAG_REGS] = [
    Register::F0,
    Register::F1,
    Register::F2,
    Register::F3,
    Register::F4,
    Register::F5,
    Register::F6,
    Register::F7,
];

impl Register {
    pub const COUNT: usize = 27;

    /// The `v` register with index `x & 0xF`.
    #[inline]
    pub const fn v(x: u8) -> Self {
        V_REGS[(x & 0xF) as usize]
    }

    /// Flag storage slot `n`, if it exists.
    pub const fn flag(n: u8) -> Option<Self> {
        if (n as usize) < NUM_FLAG_REGS {
            Some(FLAG_REGS[n as usize])
        } else {
            None
        }
    }

    /// Position in a register-indexed array.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }
}
