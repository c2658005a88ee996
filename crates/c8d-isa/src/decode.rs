//! Instruction decoding.

use crate::{AluOp, CarryOp, Instr};

#[inline]
const fn decode_x(hi: u8) -> u8 {
    hi & 0xF
}

#[inline]
const fn decode_y(lo: u8) -> u8 {
    lo >> 4
}

#[inline]
const fn decode_n(lo: u8) -> u8 {
    lo & 0xF
}

#[inline]
const fn decode_nnn(hi: u8, lo: u8) -> u16 {
    (((hi & 0xF) as u16) << 8) | lo as u16
}

impl Instr {
    /// Decode a two-byte instruction.
    ///
    /// `F000` decodes as `i := long 0`; use [`Instr::decode_at`] to pick up
    /// the address word that follows it.
    pub const fn decode(hi: u8, lo: u8) -> Self {
        let op = u16::from_be_bytes([hi, lo]);
        let x = decode_x(hi);
        let y = decode_y(lo);
        let n = decode_n(lo);
        let nnn = decode_nnn(hi, lo);

        match hi >> 4 {
            0x0 => match op {
                0x0000 => Self::Halt,
                0x00E0 => Self::Clear,
                0x00EE => Self::Return,
                0x00FB => Self::ScrollRight,
                0x00FC => Self::ScrollLeft,
                0x00FD => Self::Exit,
                0x00FE => Self::Lores,
                0x00FF => Self::Hires,
                _ if hi == 0x00 && y == 0xC => Self::ScrollDown(n),
                _ if hi == 0x00 && y == 0xD => Self::ScrollUp(n),
                _ => Self::Native(nnn),
            },
            0x1 => Self::Jump(nnn),
            0x2 => Self::Call(nnn),
            0x3 => Self::SkipEqImm { x, nn: lo },
            0x4 => Self::SkipNeImm { x, nn: lo },
            0x5 => match n {
                0x0 => Self::SkipEqReg { x, y },
                0x2 => Self::SaveRange { x, y },
                0x3 => Self::LoadRange { x, y },
                _ => Self::Invalid(op),
            },
            0x6 => Self::LoadImm { x, nn: lo },
            0x7 => Self::AddImm { x, nn: lo },
            0x8 => match n {
                0x0 => Self::Alu { op: AluOp::Set, x, y },
                0x1 => Self::Alu { op: AluOp::Or, x, y },
                0x2 => Self::Alu { op: AluOp::And, x, y },
                0x3 => Self::Alu { op: AluOp::Xor, x, y },
                0x4 => Self::Carry { op: CarryOp::Add, x, y },
                0x5 => Self::Carry { op: CarryOp::Sub, x, y },
                0x6 => Self::Carry { op: CarryOp::Shr, x, y },
                0x7 => Self::Carry { op: CarryOp::SubRev, x, y },
                0xE => Self::Carry { op: CarryOp::Shl, x, y },
                _ => Self::Invalid(op),
            },
            0x9 if n == 0 => Self::SkipNeReg { x, y },
            0x9 => Self::Invalid(op),
            0xA => Self::SetIndex(nnn),
            0xB => Self::JumpOffset(nnn),
            0xC => Self::Random { x, nn: lo },
            0xD => Self::Sprite { x, y, n },
            0xE => match lo {
                0x9E => Self::SkipKey(x),
                0xA1 => Self::SkipNotKey(x),
                _ => Self::Invalid(op),
            },
            _ => match lo {
                0x00 if x == 0 => Self::LongIndex(0),
                0x01 => Self::Plane(x),
                0x02 if x == 0 => Self::Audio,
                0x07 => Self::GetDelay(x),
                0x0A => Self::WaitKey(x),
                0x15 => Self::SetDelay(x),
                0x18 => Self::SetBuzzer(x),
                0x1E => Self::AddIndex(x),
                0x29 => Self::HexFont(x),
                0x30 => Self::BigHexFont(x),
                0x33 => Self::Bcd(x),
                0x3A => Self::Pitch(x),
                0x55 => Self::Save(x),
                0x65 => Self::Load(x),
                0x75 => Self::SaveFlags(x),
                0x85 => Self::LoadFlags(x),
                _ => Self::Invalid(op),
            },
        }
    }

    /// Decode the instruction at the start of `bytes`.
    ///
    /// Missing bytes read as zero, so a truncated buffer still decodes.
    pub fn decode_at(bytes: &[u8]) -> Self {
        let byte = |i: usize| bytes.get(i).copied().unwrap_or(0);
        match Self::decode(byte(0), byte(1)) {
            Self::LongIndex(_) => Self::LongIndex(u16::from_be_bytes([byte(2), byte(3)])),
            instr => instr,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_system() {
        assert_eq!(Instr::decode(0x00, 0x00), Instr::Halt);
        assert_eq!(Instr::decode(0x00, 0xE0), Instr::Clear);
        assert_eq!(Instr::decode(0x00, 0xEE), Instr::Return);
        assert_eq!(Instr::decode(0x00, 0xFD), Instr::Exit);
        assert_eq!(Instr::decode(0x00, 0xC4), Instr::ScrollDown(4));
        assert_eq!(Instr::decode(0x00, 0xD2), Instr::ScrollUp(2));
        assert_eq!(Instr::decode(0x01, 0x23), Instr::Native(0x123));
        assert_eq!(Instr::decode(0x00, 0x80), Instr::Native(0x080));
    }

    #[test]
    fn test_decode_flow() {
        assert_eq!(Instr::decode(0x12, 0x34), Instr::Jump(0x234));
        assert_eq!(Instr::decode(0x2A, 0xBC), Instr::Call(0xABC));
        assert_eq!(Instr::decode(0xB3, 0x00), Instr::JumpOffset(0x300));
        assert_eq!(Instr::decode(0x35, 0x07), Instr::SkipEqImm { x: 5, nn: 7 });
        assert_eq!(Instr::decode(0x4A, 0xFF), Instr::SkipNeImm { x: 0xA, nn: 0xFF });
        assert_eq!(Instr::decode(0x51, 0x20), Instr::SkipEqReg { x: 1, y: 2 });
        assert_eq!(Instr::decode(0x91, 0x20), Instr::SkipNeReg { x: 1, y: 2 });
        assert_eq!(Instr::decode(0xE3, 0x9E), Instr::SkipKey(3));
        assert_eq!(Instr::decode(0xE3, 0xA1), Instr::SkipNotKey(3));
    }

    #[test]
    fn test_decode_alu() {
        assert_eq!(
            Instr::decode(0x81, 0x23),
            Instr::Alu { op: AluOp::Xor, x: 1, y: 2 }
        );
        assert_eq!(
            Instr::decode(0x81, 0x2E),
            Instr::Carry { op: CarryOp::Shl, x: 1, y: 2 }
        );
        assert_eq!(Instr::decode(0x81, 0x28), Instr::Invalid(0x8128));
    }

    #[test]
    fn test_decode_xo_chip() {
        assert_eq!(Instr::decode(0x51, 0x22), Instr::SaveRange { x: 1, y: 2 });
        assert_eq!(Instr::decode(0x51, 0x23), Instr::LoadRange { x: 1, y: 2 });
        assert_eq!(Instr::decode(0xF3, 0x01), Instr::Plane(3));
        assert_eq!(Instr::decode(0xF0, 0x02), Instr::Audio);
        assert_eq!(Instr::decode(0xF4, 0x3A), Instr::Pitch(4));
        assert_eq!(
            Instr::decode_at(&[0xF0, 0x00, 0x12, 0x34]),
            Instr::LongIndex(0x1234)
        );
        assert_eq!(Instr::decode_at(&[0xF0, 0x00]), Instr::LongIndex(0));
        assert_eq!(Instr::decode(0xF1, 0x00), Instr::Invalid(0xF100));
    }

    #[test]
    fn test_decode_is_total() {
        for op in 0..=u16::MAX {
            let [hi, lo] = op.to_be_bytes();
            let instr = Instr::decode(hi, lo);
            assert!(instr.size() == 2 || instr.size() == 4);
        }
    }
}
