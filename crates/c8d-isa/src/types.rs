//! Core types for the CHIP-8 instruction set.

/// Address the interpreter loads programs at.
pub const LOAD_ADDRESS: u16 = 0x200;

/// Size of the addressable memory (XO-CHIP extends CHIP-8 to 16-bit addresses).
pub const MEMORY_SIZE: usize = 0x1_0000;

/// Largest ROM that fits between the load address and the end of memory.
pub const MAX_ROM_SIZE: usize = MEMORY_SIZE - LOAD_ADDRESS as usize;

/// Number of general purpose `v` registers.
pub const NUM_V_REGS: usize = 16;

/// Number of persistent flag registers reachable through `saveflags`/`loadflags`.
pub const NUM_FLAG_REGS: usize = 8;

/// Two-operand ALU operations that only write `vx`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AluOp {
    /// `8xy0`
    Set,
    /// `8xy1`
    Or,
    /// `8xy2`
    And,
    /// `8xy3`
    Xor,
}

impl AluOp {
    /// Apply the operation to a pair of byte values.
    #[inline]
    pub const fn eval(self, a: u8, b: u8) -> u8 {
        match self {
            Self::Set => b,
            Self::Or => a | b,
            Self::And => a & b,
            Self::Xor => a ^ b,
        }
    }

    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Set => ":=",
            Self::Or => "|=",
            Self::And => "&=",
            Self::Xor => "^=",
        }
    }
}

/// ALU operations that write `vx` and a carry/borrow flag into `vf`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CarryOp {
    /// `8xy4`: `vx += vy`, flag set on carry out.
    Add,
    /// `8xy5`: `vx -= vy`, flag set when no borrow occurs.
    Sub,
    /// `8xy6`: `vx >>= vy`, flag is the bit shifted out.
    Shr,
    /// `8xy7`: `vx =- vy`, flag set when no borrow occurs.
    SubRev,
    /// `8xyE`: `vx <<= vy`, flag is the bit shifted out.
    Shl,
}

impl CarryOp {
    /// Apply the operation, returning `(value, flag)`.
    #[inline]
    pub const fn eval(self, a: u8, b: u8) -> (u8, u8) {
        match self {
            Self::Add => {
                let (value, carry) = a.overflowing_add(b);
                (value, carry as u8)
            }
            Self::Sub => (a.wrapping_sub(b), (a >= b) as u8),
            Self::Shr => (b >> 1, b & 1),
            Self::SubRev => (b.wrapping_sub(a), (b >= a) as u8),
            Self::Shl => (b << 1, b >> 7),
        }
    }

    /// Whether this is one of the shift forms affected by the shift quirk.
    pub const fn is_shift(self) -> bool {
        matches!(self, Self::Shr | Self::Shl)
    }

    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Add => "+=",
            Self::Sub => "-=",
            Self::Shr => ">>=",
            Self::SubRev => "=-",
            Self::Shl => "<<=",
        }
    }
}

/// Decoded CHIP-8, SUPER-CHIP or XO-CHIP instruction.
///
/// Register operands are `v` register indices in `0..16`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Instr {
    /// `0000`, treated as an implied halt.
    Halt,
    /// `00Cn`
    ScrollDown(u8),
    /// `00Dn`
    ScrollUp(u8),
    /// `00E0`
    Clear,
    /// `00EE`
    Return,
    /// `00FB`
    ScrollRight,
    /// `00FC`
    ScrollLeft,
    /// `00FD`
    Exit,
    /// `00FE`
    Lores,
    /// `00FF`
    Hires,
    /// `0nnn`: call a machine code routine for the host CPU.
    Native(u16),
    /// `1nnn`
    Jump(u16),
    /// `2nnn`
    Call(u16),
    /// `3xnn`: skip when `vx == nn`.
    SkipEqImm { x: u8, nn: u8 },
    /// `4xnn`: skip when `vx != nn`.
    SkipNeImm { x: u8, nn: u8 },
    /// `5xy0`: skip when `vx == vy`.
    SkipEqReg { x: u8, y: u8 },
    /// `5xy2`
    SaveRange { x: u8, y: u8 },
    /// `5xy3`
    LoadRange { x: u8, y: u8 },
    /// `6xnn`
    LoadImm { x: u8, nn: u8 },
    /// `7xnn`
    AddImm { x: u8, nn: u8 },
    /// `8xy0`..`8xy3`
    Alu { op: AluOp, x: u8, y: u8 },
    /// `8xy4`..`8xy7`, `8xyE`
    Carry { op: CarryOp, x: u8, y: u8 },
    /// `9xy0`: skip when `vx != vy`.
    SkipNeReg { x: u8, y: u8 },
    /// `Annn`
    SetIndex(u16),
    /// `Bnnn`
    JumpOffset(u16),
    /// `Cxnn`
    Random { x: u8, nn: u8 },
    /// `Dxyn`
    Sprite { x: u8, y: u8, n: u8 },
    /// `Ex9E`: skip when the key in `vx` is pressed.
    SkipKey(u8),
    /// `ExA1`: skip when the key in `vx` is not pressed.
    SkipNotKey(u8),
    /// `F000 nnnn`
    LongIndex(u16),
    /// `Fn01`
    Plane(u8),
    /// `F002`
    Audio,
    /// `Fx07`
    GetDelay(u8),
    /// `Fx0A`
    WaitKey(u8),
    /// `Fx15`
    SetDelay(u8),
    /// `Fx18`
    SetBuzzer(u8),
    /// `Fx1E`
    AddIndex(u8),
    /// `Fx29`
    HexFont(u8),
    /// `Fx30`
    BigHexFont(u8),
    /// `Fx33`
    Bcd(u8),
    /// `Fx3A`
    Pitch(u8),
    /// `Fx55`
    Save(u8),
    /// `Fx65`
    Load(u8),
    /// `Fx75`
    SaveFlags(u8),
    /// `Fx85`
    LoadFlags(u8),
    /// Any encoding not listed above.
    Invalid(u16),
}

impl Instr {
    /// Size of the encoded instruction in bytes.
    #[inline]
    pub const fn size(&self) -> u16 {
        match self {
            Self::LongIndex(_) => 4,
            _ => 2,
        }
    }

    /// Whether execution never continues past this instruction.
    pub const fn is_halt(&self) -> bool {
        matches!(self, Self::Halt | Self::Exit)
    }

    /// Address recorded as a label reference (jump, jump0, and index loads).
    pub const fn label_target(&self) -> Option<u16> {
        match *self {
            Self::Jump(nnn)
            | Self::JumpOffset(nnn)
            | Self::SetIndex(nnn)
            | Self::LongIndex(nnn) => Some(nnn),
            _ => None,
        }
    }

    /// Address recorded as a subroutine reference.
    pub const fn call_target(&self) -> Option<u16> {
        match *self {
            Self::Call(nnn) => Some(nnn),
            _ => None,
        }
    }

    /// Address recorded as a machine code entry point.
    pub const fn native_target(&self) -> Option<u16> {
        match *self {
            Self::Native(nnn) => Some(nnn),
            _ => None,
        }
    }
}
