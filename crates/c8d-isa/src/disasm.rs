//! Octo assembly text for decoded instructions.

use crate::Instr;

/// Resolves addresses to symbolic names while rendering instructions.
pub trait SymbolNames {
    fn label(&self, addr: u16) -> Option<&str>;
    fn subroutine(&self, addr: u16) -> Option<&str>;
    fn native(&self, addr: u16) -> Option<&str>;
}

/// Renders every address as a hex literal.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoSymbols;

impl SymbolNames for NoSymbols {
    fn label(&self, _addr: u16) -> Option<&str> {
        None
    }

    fn subroutine(&self, _addr: u16) -> Option<&str> {
        None
    }

    fn native(&self, _addr: u16) -> Option<&str> {
        None
    }
}

fn addr_or_name(name: Option<&str>, addr: u16) -> String {
    name.map_or_else(|| format!("{addr:#05X}"), str::to_string)
}

/// Octo name of a `v` register.
pub fn reg_name(x: u8) -> String {
    format!("v{:X}", x & 0xF)
}

/// Format an instruction as an Octo statement.
pub fn format_instr(instr: &Instr, names: &impl SymbolNames) -> String {
    let v = reg_name;
    match *instr {
        Instr::Halt => "0x00 0x00".to_string(),
        Instr::ScrollDown(n) => format!("scroll-down {n}"),
        Instr::ScrollUp(n) => format!("scroll-up {n}"),
        Instr::Clear => "clear".to_string(),
        Instr::Return => "return".to_string(),
        Instr::ScrollRight => "scroll-right".to_string(),
        Instr::ScrollLeft => "scroll-left".to_string(),
        Instr::Exit => "exit".to_string(),
        Instr::Lores => "lores".to_string(),
        Instr::Hires => "hires".to_string(),
        Instr::Native(nnn) => format!("native {}", addr_or_name(names.native(nnn), nnn)),
        Instr::Jump(nnn) => format!("jump {}", addr_or_name(names.label(nnn), nnn)),
        Instr::Call(nnn) => match names.subroutine(nnn) {
            Some(name) => name.to_string(),
            None => format!(":call {nnn:#05X}"),
        },
        Instr::SkipEqImm { x, nn } => format!("if {} != {nn} then", v(x)),
        Instr::SkipNeImm { x, nn } => format!("if {} == {nn} then", v(x)),
        Instr::SkipEqReg { x, y } => format!("if {} != {} then", v(x), v(y)),
        Instr::SkipNeReg { x, y } => format!("if {} == {} then", v(x), v(y)),
        Instr::SaveRange { x, y } => format!("save {} - {}", v(x), v(y)),
        Instr::LoadRange { x, y } => format!("load {} - {}", v(x), v(y)),
        Instr::LoadImm { x, nn } => format!("{} := {nn}", v(x)),
        Instr::AddImm { x, nn } => format!("{} += {nn}", v(x)),
        Instr::Alu { op, x, y } => format!("{} {} {}", v(x), op.symbol(), v(y)),
        Instr::Carry { op, x, y } => format!("{} {} {}", v(x), op.symbol(), v(y)),
        Instr::SetIndex(nnn) => format!("i := {}", addr_or_name(names.label(nnn), nnn)),
        Instr::JumpOffset(nnn) => format!("jump0 {}", addr_or_name(names.label(nnn), nnn)),
        Instr::Random { x, nn } => format!("{} := random {nn}", v(x)),
        Instr::Sprite { x, y, n } => format!("sprite {} {} {n}", v(x), v(y)),
        Instr::SkipKey(x) => format!("if {} -key then", v(x)),
        Instr::SkipNotKey(x) => format!("if {} key then", v(x)),
        Instr::LongIndex(nnnn) => {
            format!("i := long {}", addr_or_name(names.label(nnnn), nnnn))
        }
        Instr::Plane(n) => format!("plane {n}"),
        Instr::Audio => "audio".to_string(),
        Instr::GetDelay(x) => format!("{} := delay", v(x)),
        Instr::WaitKey(x) => format!("{} := key", v(x)),
        Instr::SetDelay(x) => format!("delay := {}", v(x)),
        Instr::SetBuzzer(x) => format!("buzzer := {}", v(x)),
        Instr::AddIndex(x) => format!("i += {}", v(x)),
        Instr::HexFont(x) => format!("i := hex {}", v(x)),
        Instr::BigHexFont(x) => format!("i := bighex {}", v(x)),
        Instr::Bcd(x) => format!("bcd {}", v(x)),
        Instr::Pitch(x) => format!("pitch := {}", v(x)),
        Instr::Save(x) => format!("save {}", v(x)),
        Instr::Load(x) => format!("load {}", v(x)),
        Instr::SaveFlags(x) => format!("saveflags {}", v(x)),
        Instr::LoadFlags(x) => format!("loadflags {}", v(x)),
        Instr::Invalid(op) => {
            let [hi, lo] = op.to_be_bytes();
            format!("{hi:#04X} {lo:#04X} # bad opcode?")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AluOp, CarryOp};

    struct OneLabel;

    impl SymbolNames for OneLabel {
        fn label(&self, addr: u16) -> Option<&str> {
            (addr == 0x204).then_some("label-0")
        }

        fn subroutine(&self, addr: u16) -> Option<&str> {
            (addr == 0x300).then_some("sub-0")
        }

        fn native(&self, _addr: u16) -> Option<&str> {
            None
        }
    }

    #[test]
    fn test_format_with_names() {
        assert_eq!(format_instr(&Instr::Jump(0x204), &OneLabel), "jump label-0");
        assert_eq!(format_instr(&Instr::SetIndex(0x204), &OneLabel), "i := label-0");
        assert_eq!(format_instr(&Instr::Call(0x300), &OneLabel), "sub-0");
        assert_eq!(format_instr(&Instr::Jump(0x206), &OneLabel), "jump 0x206");
        assert_eq!(format_instr(&Instr::Native(0x0A2), &OneLabel), "native 0x0A2");
    }

    #[test]
    fn test_format_skips_are_inverted() {
        assert_eq!(
            format_instr(&Instr::SkipEqImm { x: 0, nn: 5 }, &NoSymbols),
            "if v0 != 5 then"
        );
        assert_eq!(
            format_instr(&Instr::SkipNeReg { x: 0xA, y: 0xB }, &NoSymbols),
            "if vA == vB then"
        );
    }

    #[test]
    fn test_format_alu() {
        assert_eq!(
            format_instr(&Instr::Alu { op: AluOp::Or, x: 1, y: 2 }, &NoSymbols),
            "v1 |= v2"
        );
        assert_eq!(
            format_instr(&Instr::Carry { op: CarryOp::SubRev, x: 1, y: 2 }, &NoSymbols),
            "v1 =- v2"
        );
    }

    #[test]
    fn test_format_invalid() {
        assert_eq!(
            format_instr(&Instr::Invalid(0x8128), &NoSymbols),
            "0x81 0x28 # bad opcode?"
        );
    }
}
