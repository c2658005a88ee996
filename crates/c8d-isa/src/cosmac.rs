//! RCA COSMAC 1802 machine code, reachable from CHIP-8 through `0nnn`.
//!
//! The COSMAC VIP interpreter runs `0nnn` as a machine code subroutine; the
//! routine hands control back with `sep r4` (`D4`).

/// Opcode that returns from a machine code routine to the interpreter.
pub const RETURN_TO_INTERPRETER: u8 = 0xD4;

/// Operand layout of an 1802 opcode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operand {
    /// No operand, register number (if any) is in the low nibble.
    None,
    /// Low nibble is a register number.
    Reg,
    /// Low nibble is an I/O port (`out`/`inp`).
    Port,
    /// One immediate byte.
    Imm8,
    /// Short branch: one byte, low byte of the target on the same page.
    Short,
    /// Long branch: two bytes, big-endian absolute target.
    Long,
}

impl Operand {
    /// Operand bytes following the opcode byte.
    pub const fn len(self) -> u16 {
        match self {
            Self::None | Self::Reg | Self::Port => 0,
            Self::Imm8 | Self::Short => 1,
            Self::Long => 2,
        }
    }
}

/// One entry of the opcode table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Opcode {
    pub mnemonic: &'static str,
    pub operand: Operand,
}

impl Opcode {
    const fn new(mnemonic: &'static str, operand: Operand) -> Self {
        Self { mnemonic, operand }
    }

    /// Encoded size in bytes, opcode included.
    pub const fn size(&self) -> u16 {
        1 + self.operand.len()
    }
}

const fn describe(op: u8) -> Opcode {
    use Operand::{Imm8, Long, None, Port, Reg, Short};

    let low = op & 0xF;
    match op >> 4 {
        0x0 if low == 0 => Opcode::new("idl", None),
        0x0 => Opcode::new("ldn", Reg),
        0x1 => Opcode::new("inc", Reg),
        0x2 => Opcode::new("dec", Reg),
        0x3 => match low {
            0x0 => Opcode::new("br", Short),
            0x1 => Opcode::new("bq", Short),
            0x2 => Opcode::new("bz", Short),
            0x3 => Opcode::new("bdf", Short),
            0x4 => Opcode::new("b1", Short),
            0x5 => Opcode::new("b2", Short),
            0x6 => Opcode::new("b3", Short),
            0x7 => Opcode::new("b4", Short),
            0x8 => Opcode::new("skp", None),
            0x9 => Opcode::new("bnq", Short),
            0xA => Opcode::new("bnz", Short),
            0xB => Opcode::new("bnf", Short),
            0xC => Opcode::new("bn1", Short),
            0xD => Opcode::new("bn2", Short),
            0xE => Opcode::new("bn3", Short),
            _ => Opcode::new("bn4", Short),
        },
        0x4 => Opcode::new("lda", Reg),
        0x5 => Opcode::new("str", Reg),
        0x6 => match low {
            0x0 => Opcode::new("irx", None),
            0x8 => Opcode::new("db 0x68", None),
            0x1..=0x7 => Opcode::new("out", Port),
            _ => Opcode::new("inp", Port),
        },
        0x7 => match low {
            0x0 => Opcode::new("ret", None),
            0x1 => Opcode::new("dis", None),
            0x2 => Opcode::new("ldxa", None),
            0x3 => Opcode::new("stxd", None),
            0x4 => Opcode::new("adc", None),
            0x5 => Opcode::new("sdb", None),
            0x6 => Opcode::new("shrc", None),
            0x7 => Opcode::new("smb", None),
            0x8 => Opcode::new("sav", None),
            0x9 => Opcode::new("mark", None),
            0xA => Opcode::new("req", None),
            0xB => Opcode::new("seq", None),
            0xC => Opcode::new("adci", Imm8),
            0xD => Opcode::new("sdbi", Imm8),
            0xE => Opcode::new("shlc", None),
            _ => Opcode::new("smbi", Imm8),
        },
        0x8 => Opcode::new("glo", Reg),
        0x9 => Opcode::new("ghi", Reg),
        0xA => Opcode::new("plo", Reg),
        0xB => Opcode::new("phi", Reg),
        0xC => match low {
            0x0 => Opcode::new("lbr", Long),
            0x1 => Opcode::new("lbq", Long),
            0x2 => Opcode::new("lbz", Long),
            0x3 => Opcode::new("lbdf", Long),
            0x4 => Opcode::new("nop", None),
            0x5 => Opcode::new("lsnq", None),
            0x6 => Opcode::new("lsnz", None),
            0x7 => Opcode::new("lsnf", None),
            0x8 => Opcode::new("lskp", None),
            0x9 => Opcode::new("lbnq", Long),
            0xA => Opcode::new("lbnz", Long),
            0xB => Opcode::new("lbnf", Long),
            0xC => Opcode::new("lsie", None),
            0xD => Opcode::new("lsq", None),
            0xE => Opcode::new("lsz", None),
            _ => Opcode::new("lsdf", None),
        },
        0xD => Opcode::new("sep", Reg),
        0xE => Opcode::new("sex", Reg),
        _ => match low {
            0x0 => Opcode::new("ldx", None),
            0x1 => Opcode::new("or", None),
            0x2 => Opcode::new("and", None),
            0x3 => Opcode::new("xor", None),
            0x4 => Opcode::new("add", None),
            0x5 => Opcode::new("sd", None),
            0x6 => Opcode::new("shr", None),
            0x7 => Opcode::new("sm", None),
            0x8 => Opcode::new("ldi", Imm8),
            0x9 => Opcode::new("ori", Imm8),
            0xA => Opcode::new("ani", Imm8),
            0xB => Opcode::new("xri", Imm8),
            0xC => Opcode::new("adi", Imm8),
            0xD => Opcode::new("sdi", Imm8),
            0xE => Opcode::new("shl", None),
            _ => Opcode::new("smi", Imm8),
        },
    }
}

#[allow(clippy::cast_possible_truncation)]
const fn build_table() -> [Opcode; 256] {
    let mut table = [Opcode::new("", Operand::None); 256];
    let mut op = 0;
    while op < 256 {
        table[op] = describe(op as u8);
        op += 1;
    }
    table
}

/// Flat opcode table indexed by the first byte of an instruction.
pub static OPCODES: [Opcode; 256] = build_table();

/// A decoded 1802 instruction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NativeInstr {
    /// Address of the opcode byte.
    pub addr: u16,
    /// Raw bytes, opcode first.
    pub bytes: Vec<u8>,
    pub opcode: Opcode,
}

impl NativeInstr {
    /// Whether this instruction hands control back to the interpreter.
    pub fn returns_to_interpreter(&self) -> bool {
        self.bytes[0] == RETURN_TO_INTERPRETER
    }

    /// Assembly text, e.g. `ldi 0x1F` or `sep r4`.
    pub fn text(&self) -> String {
        let op = self.bytes[0];
        let mnemonic = self.opcode.mnemonic;
        match self.opcode.operand {
            Operand::None => mnemonic.to_string(),
            Operand::Reg => format!("{mnemonic} r{:X}", op & 0xF),
            Operand::Port => format!("{mnemonic} {}", op & 0x7),
            Operand::Imm8 => format!("{mnemonic} {:#04X}", self.bytes[1]),
            Operand::Short => {
                let target = (self.addr.wrapping_add(1) & 0xFF00) | u16::from(self.bytes[1]);
                format!("{mnemonic} {target:#06X}")
            }
            Operand::Long => {
                let target = u16::from_be_bytes([self.bytes[1], self.bytes[2]]);
                format!("{mnemonic} {target:#06X}")
            }
        }
    }
}

/// Decode the instruction at `addr`, where `bytes[0]` is the opcode byte.
///
/// Returns `None` when `bytes` is too short for the operand.
pub fn decode(bytes: &[u8], addr: u16) -> Option<NativeInstr> {
    let first = *bytes.first()?;
    let opcode = OPCODES[usize::from(first)];
    let size = usize::from(opcode.size());
    let raw = bytes.get(..size)?;
    Some(NativeInstr {
        addr,
        bytes: raw.to_vec(),
        opcode,
    })
}
