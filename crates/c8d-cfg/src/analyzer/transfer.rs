//! Abstract transfer function: how one instruction rewrites the register file
//! and which bytes it classifies.

use c8d_isa::{Instr, NUM_FLAG_REGS};

use super::Analyzer;
use crate::{Class, Register, RegisterState, ValueSet};

impl Analyzer {
    /// Apply `instr` at `addr` to `state`, recording classification and
    /// cross references as a side effect.
    pub(super) fn apply(
        &mut self,
        addr: u16,
        instr: &Instr,
        mut state: RegisterState,
    ) -> RegisterState {
        self.classes
            .mark_range(u32::from(addr), u32::from(instr.size()), Class::Code);
        if let Some(target) = instr.label_target() {
            self.labels.add(target, addr);
        }
        if let Some(target) = instr.call_target() {
            self.subroutines.add(target, addr);
        }
        if let Some(target) = instr.native_target() {
            self.natives.add(target, addr);
        }

        let limit = self.program.pointer_limit();

        match *instr {
            Instr::Return => {
                let destinations = self.chase_returns(state.get(Register::Rets));
                self.chased.insert(addr, destinations.clone());
                state.set(Register::Rets, destinations);
            }
            Instr::Call(_) => {
                state.set(Register::Rets, ValueSet::single(addr.wrapping_add(2)));
            }
            Instr::LoadImm { x, nn } => {
                state.set(Register::v(x), ValueSet::single(u16::from(nn)));
            }
            Instr::AddImm { x, nn } => {
                let sums = state
                    .get(Register::v(x))
                    .bytes()
                    .map(|a| u16::from(a.wrapping_add(nn)))
                    .collect();
                state.set(Register::v(x), sums);
            }
            Instr::Alu { op, x, y } => {
                let result = ValueSet::pairwise(
                    state.get(Register::v(x)),
                    state.get(Register::v(y)),
                    x == y,
                    |a, b| u16::from(op.eval(a, b)),
                )
                .into_iter()
                .collect();
                state.set(Register::v(x), result);
            }
            Instr::Carry { op, x, y } => {
                let src = if op.is_shift() && self.quirks.shift { x } else { y };
                let pairs = ValueSet::pairwise(
                    state.get(Register::v(x)),
                    state.get(Register::v(src)),
                    x == src,
                    |a, b| op.eval(a, b),
                );
                let values: ValueSet = pairs.iter().map(|&(v, _)| u16::from(v)).collect();
                let flags: ValueSet = pairs.iter().map(|&(_, f)| u16::from(f)).collect();
                if self.quirks.vf_order {
                    state.set(Register::VF, flags);
                    state.set(Register::v(x), values);
                } else {
                    state.set(Register::v(x), values);
                    state.set(Register::VF, flags);
                }
            }
            Instr::SetIndex(nnn) | Instr::LongIndex(nnn) => {
                state.set(Register::I, ValueSet::single(nnn));
            }
            Instr::Random { x, nn } => {
                state.set(Register::v(x), ValueSet::masked(nn));
            }
            Instr::GetDelay(x) => state.set(Register::v(x), ValueSet::range(0xFF)),
            Instr::WaitKey(x) => state.set(Register::v(x), ValueSet::range(0xF)),
            Instr::AddIndex(x) => {
                let index = state.get(Register::I);
                let offsets = state.get(Register::v(x));
                let sums: ValueSet = index
                    .iter()
                    .flat_map(|i| offsets.iter().map(move |v| i.wrapping_add(v)))
                    .collect();
                state.set(Register::I, sums.cap(limit));
            }
            Instr::HexFont(x) => {
                let glyphs = state.get(Register::v(x)).map(|v| 5 * (v & 0xF)).cap(limit);
                state.set(Register::I, glyphs);
            }
            Instr::BigHexFont(x) => {
                let glyphs = state
                    .get(Register::v(x))
                    .map(|v| 10 * (v & 0xF) + 80)
                    .cap(limit);
                state.set(Register::I, glyphs);
            }
            Instr::Bcd(_) => self.mark_data(&state, 3),
            Instr::Save(x) => {
                self.mark_data(&state, u32::from(x) + 1);
                self.advance_index(&mut state, u16::from(x) + 1, limit);
            }
            Instr::Load(x) => {
                self.mark_data(&state, u32::from(x) + 1);
                for r in 0..=x {
                    state.set(Register::v(r), ValueSet::range(0xFF));
                }
                self.advance_index(&mut state, u16::from(x) + 1, limit);
            }
            Instr::SaveRange { x, y } => {
                self.mark_data(&state, u32::from(x.abs_diff(y)) + 1);
            }
            Instr::LoadRange { x, y } => {
                self.mark_data(&state, u32::from(x.abs_diff(y)) + 1);
                for r in x.min(y)..=x.max(y) {
                    state.set(Register::v(r), ValueSet::range(0xFF));
                }
            }
            Instr::SaveFlags(x) => {
                for n in 0..=last_flag(x) {
                    if let Some(flag) = Register::flag(n) {
                        let value = state.get(Register::v(n)).clone();
                        state.set(flag, value);
                    }
                }
            }
            Instr::LoadFlags(x) => {
                for n in 0..=last_flag(x) {
                    if let Some(flag) = Register::flag(n) {
                        let value = state.get(flag).clone();
                        state.set(Register::v(n), value);
                    }
                }
            }
            Instr::Plane(n) => state.set(Register::Plane, ValueSet::single(u16::from(n))),
            Instr::Audio => self.mark_data(&state, 16),
            Instr::Sprite { n, .. } => {
                let height = if n == 0 { 32 } else { u32::from(n) };
                let planes = state
                    .get(Register::Plane)
                    .iter()
                    .map(|p| (p & 3).count_ones())
                    .max()
                    .unwrap_or(0);
                self.mark_data(&state, height * planes);
                state.set(Register::VF, ValueSet::range(1));
            }
            Instr::Halt
            | Instr::ScrollDown(_)
            | Instr::ScrollUp(_)
            | Instr::Clear
            | Instr::ScrollRight
            | Instr::ScrollLeft
            | Instr::Exit
            | Instr::Lores
            | Instr::Hires
            | Instr::Native(_)
            | Instr::Jump(_)
            | Instr::SkipEqImm { .. }
            | Instr::SkipNeImm { .. }
            | Instr::SkipEqReg { .. }
            | Instr::SkipNeReg { .. }
            | Instr::JumpOffset(_)
            | Instr::SkipKey(_)
            | Instr::SkipNotKey(_)
            | Instr::SetDelay(_)
            | Instr::SetBuzzer(_)
            | Instr::Pitch(_)
            | Instr::Invalid(_) => {}
        }

        state
    }

    /// Mark `len` bytes starting at every possible value of `i` as data.
    fn mark_data(&mut self, state: &RegisterState, len: u32) {
        for base in state.get(Register::I).iter() {
            self.classes.mark_range(u32::from(base), len, Class::Data);
        }
    }

    fn advance_index(&self, state: &mut RegisterState, step: u16, limit: u16) {
        if self.quirks.load_store {
            return;
        }
        let advanced = state
            .get(Register::I)
            .map(|i| i.wrapping_add(step))
            .cap(limit);
        state.set(Register::I, advanced);
    }
}

#[allow(clippy::cast_possible_truncation)]
const fn last_flag(x: u8) -> u8 {
    let last = NUM_FLAG_REGS as u8 - 1;
    if x < last { x } else { last }
}
