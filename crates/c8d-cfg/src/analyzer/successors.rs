//! Successor resolution against a reaching state.

use c8d_isa::Instr;

use crate::{Program, Register, RegisterState, ValueSet};

/// Addresses control may flow to after executing `instr` at `addr`.
///
/// Conditional skips are decided per value: the skip-taken address is only
/// included when some combination of reaching values skips, the fall-through
/// only when some combination does not.
pub(super) fn resolve(
    program: &Program,
    addr: u16,
    instr: &Instr,
    state: &RegisterState,
) -> Vec<u16> {
    let next = addr.wrapping_add(instr.size());

    if instr.is_halt() {
        return Vec::new();
    }

    match *instr {
        Instr::Jump(nnn) | Instr::Call(nnn) => vec![nnn],
        Instr::SkipEqImm { x, nn } => {
            let skips = state.get(Register::v(x)).bytes().map(|v| v == nn);
            branch(program, addr, skips)
        }
        Instr::SkipNeImm { x, nn } => {
            let skips = state.get(Register::v(x)).bytes().map(|v| v != nn);
            branch(program, addr, skips)
        }
        Instr::SkipEqReg { x, y } => {
            let skips = compare(state, x, y, |a, b| a == b);
            branch(program, addr, skips)
        }
        Instr::SkipNeReg { x, y } => {
            let skips = compare(state, x, y, |a, b| a != b);
            branch(program, addr, skips)
        }
        Instr::SkipKey(_) | Instr::SkipNotKey(_) => vec![next, skip_target(program, addr)],
        Instr::Return => state.get(Register::Rets).values().to_vec(),
        Instr::JumpOffset(nnn) => state
            .get(Register::V0)
            .iter()
            .map(|v| nnn.wrapping_add(v))
            .collect::<ValueSet>()
            .values()
            .to_vec(),
        _ => vec![next],
    }
}

/// Address reached when the instruction after `addr` is skipped.
fn skip_target(program: &Program, addr: u16) -> u16 {
    let skipped = addr.wrapping_add(2);
    skipped.wrapping_add(program.instr(skipped).size())
}

fn compare(state: &RegisterState, x: u8, y: u8, pred: impl Fn(u8, u8) -> bool) -> Vec<bool> {
    ValueSet::pairwise(
        state.get(Register::v(x)),
        state.get(Register::v(y)),
        x == y,
        pred,
    )
}

fn branch(program: &Program, addr: u16, skips: impl IntoIterator<Item = bool>) -> Vec<u16> {
    let mut taken = false;
    let mut falls = false;
    for skip in skips {
        if skip {
            taken = true;
        } else {
            falls = true;
        }
        if taken && falls {
            break;
        }
    }

    let mut succs = Vec::with_capacity(2);
    if falls {
        succs.push(addr.wrapping_add(2));
    }
    if taken {
        succs.push(skip_target(program, addr));
    }
    succs
}

#[cfg(test)]
mod tests {
    use super::*;

    fn load(rom: &[u8]) -> Program {
        Program::load(rom).unwrap()
    }

    fn with_v(pairs: &[(u8, &[u16])]) -> RegisterState {
        let mut state = RegisterState::new();
        for (x, values) in pairs {
            state.set(Register::v(*x), values.iter().copied().collect());
        }
        state
    }

    #[test]
    fn test_skip_both_ways() {
        let program = load(&[0x30, 0x05, 0x00, 0xE0, 0x00, 0xFD]);
        let state = with_v(&[(0, &[4, 5])]);
        let instr = program.instr(0x200);
        assert_eq!(resolve(&program, 0x200, &instr, &state), vec![0x202, 0x204]);
    }

    #[test]
    fn test_skip_never_taken() {
        let program = load(&[0x30, 0x05, 0x00, 0xE0]);
        let state = with_v(&[(0, &[1, 2, 3])]);
        let instr = program.instr(0x200);
        assert_eq!(resolve(&program, 0x200, &instr, &state), vec![0x202]);
    }

    #[test]
    fn test_skip_over_long_index() {
        // if v0 == 0 then (skip when v0 != 0); i := long 0x1234; exit
        let program = load(&[0x40, 0x00, 0xF0, 0x00, 0x12, 0x34, 0x00, 0xFD]);
        let state = with_v(&[(0, &[0, 1])]);
        let instr = program.instr(0x200);
        assert_eq!(resolve(&program, 0x200, &instr, &state), vec![0x202, 0x206]);
        let long = program.instr(0x202);
        assert_eq!(resolve(&program, 0x202, &long, &state), vec![0x206]);
    }

    #[test]
    fn test_register_skip_same_register() {
        // if v1 != v1 then never skips
        let program = load(&[0x91, 0x10]);
        let state = with_v(&[(1, &[3, 4])]);
        let instr = program.instr(0x200);
        assert_eq!(resolve(&program, 0x200, &instr, &state), vec![0x202]);

        let program2 = load(&[0x91, 0x20]);
        let state = with_v(&[(1, &[3, 4]), (2, &[3])]);
        let instr = program2.instr(0x200);
        assert_eq!(resolve(&program2, 0x200, &instr, &state), vec![0x202, 0x204]);
    }

    #[test]
    fn test_key_skip_and_terminators() {
        let program = load(&[0xE0, 0x9E, 0x00, 0xFD]);
        let state = RegisterState::new();
        let key = program.instr(0x200);
        assert_eq!(resolve(&program, 0x200, &key, &state), vec![0x202, 0x204]);
        let exit = program.instr(0x202);
        assert!(resolve(&program, 0x202, &exit, &state).is_empty());
        assert!(resolve(&program, 0x204, &Instr::Halt, &state).is_empty());
    }

    #[test]
    fn test_return_uses_captured_set() {
        let program = load(&[0x00, 0xEE]);
        let mut state = RegisterState::new();
        state.set(Register::Rets, [0x204, 0x20A].into_iter().collect());
        assert_eq!(
            resolve(&program, 0x200, &Instr::Return, &state),
            vec![0x204, 0x20A]
        );
    }
}
