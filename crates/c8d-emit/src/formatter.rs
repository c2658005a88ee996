//! Octo source formatter.
//!
//! Walks the program range once, emitting:
//! - quirk comments and `:const` definitions for out-of-range targets
//! - subroutine, label and machine code headers
//! - `loop`/`again` pairs for recovered backward jumps
//! - code, raw data bytes, and speculative decodes of self-modifying words

use std::collections::BTreeMap;

use tracing::debug;

use c8d_cfg::{Analysis, Class, SymbolTable, XrefTable};
use c8d_isa::cosmac::{self, NativeInstr};
use c8d_isa::{Instr, LOAD_ADDRESS, MEMORY_SIZE, format_instr};

use crate::config::EmitConfig;
use crate::loops::is_loop_tail;

const SHIFT_COMMENT: &str = "# analyzed with shifts that modify vx in place and ignore vy.";
const LOAD_STORE_COMMENT: &str = "# analyzed with load and store operations that don't modify i.";
const VF_ORDER_COMMENT: &str = "# analyzed with arithmetic that writes vf before the result.";

#[allow(clippy::cast_possible_truncation)]
const MEMORY_END: u32 = MEMORY_SIZE as u32;

/// Renders a finished analysis as Octo source.
pub struct Formatter<'a> {
    analysis: &'a Analysis,
    config: EmitConfig,
}

impl<'a> Formatter<'a> {
    pub const fn new(analysis: &'a Analysis, config: EmitConfig) -> Self {
        Self { analysis, config }
    }

    /// Render `length` bytes starting at the load address.
    pub fn format(&self, length: usize) -> String {
        let start = u32::from(LOAD_ADDRESS);
        let end = u32::try_from(length)
            .map_or(MEMORY_END, |len| start.saturating_add(len))
            .min(MEMORY_END);

        let mut render = Render::new(self.analysis, &self.config, start, end);
        render.header();
        render.consts();
        render.body();

        debug!(length, bytes = render.out.len(), "formatted program");
        render.out
    }
}

/// What a single step of the walk emits.
enum Unit {
    Again,
    Native(NativeInstr),
    Code(Instr),
    /// `i := long` whose address word is itself a target.
    SplitLong(Instr),
    /// Second word of a split `i := long`.
    Operand,
    Data,
    Smc,
    Unused,
}

impl Unit {
    /// Bytes consumed.
    fn len(&self) -> u32 {
        match self {
            Self::Again | Self::SplitLong(_) | Self::Operand | Self::Smc => 2,
            Self::Native(instr) => u32::from(instr.opcode.size()),
            Self::Code(instr) => u32::from(instr.size()),
            Self::Data | Self::Unused => 1,
        }
    }
}

/// State of one formatting pass.
struct Render<'a> {
    analysis: &'a Analysis,
    config: &'a EmitConfig,
    start: u32,
    end: u32,
    out: String,
    /// Label references not yet consumed by a loop.
    refs: BTreeMap<u16, Vec<u16>>,
    /// Tails of open loops, innermost last.
    pending: Vec<u16>,
    /// Inside a machine code region.
    native: bool,
    /// End of a split `i := long` operand.
    operand_end: u32,
}

impl<'a> Render<'a> {
    fn new(analysis: &'a Analysis, config: &'a EmitConfig, start: u32, end: u32) -> Self {
        let refs = analysis
            .labels()
            .iter()
            .map(|(target, refs)| (target, refs.iter().copied().collect()))
            .collect();
        Self {
            analysis,
            config,
            start,
            end,
            out: String::with_capacity(4096),
            refs,
            pending: Vec::new(),
            native: false,
            operand_end: 0,
        }
    }

    fn writeln(&mut self, depth: usize, s: &str) {
        self.out.push_str(&self.config.indent.repeat(depth));
        self.out.push_str(s);
        self.out.push('\n');
    }

    fn in_range(&self, addr: u16) -> bool {
        (self.start..self.end).contains(&u32::from(addr))
    }

    fn class(&self, addr: u32) -> Class {
        self.analysis.classes().get(addr)
    }

    fn byte(&self, addr: u32) -> u8 {
        self.analysis.program().byte(addr)
    }

    fn header(&mut self) {
        if self.config.quirk_comments {
            let quirks = self.analysis.quirks();
            if quirks.shift {
                self.writeln(0, SHIFT_COMMENT);
            }
            if quirks.load_store {
                self.writeln(0, LOAD_STORE_COMMENT);
            }
            if quirks.vf_order {
                self.writeln(0, VF_ORDER_COMMENT);
            }
        }
        self.out.push('\n');
    }

    /// Targets outside the rendered range would otherwise be undefined names.
    fn consts(&mut self) {
        let analysis = self.analysis;
        let symbols = analysis.symbols();
        let tables: [(&XrefTable, fn(&SymbolTable, u16) -> Option<&str>); 3] = [
            (analysis.labels(), SymbolTable::label),
            (analysis.subroutines(), SymbolTable::subroutine),
            (analysis.natives(), SymbolTable::native),
        ];
        let mut lines = Vec::new();
        for (table, name_of) in tables {
            for target in table.targets().filter(|&t| !self.in_range(t)) {
                if let Some(name) = name_of(symbols, target) {
                    lines.push(format!(":const {name} {target:#05X}"));
                }
            }
        }
        for line in lines {
            self.writeln(0, &line);
        }
    }

    fn body(&mut self) {
        let mut addr = self.start;
        while addr < self.end {
            let Ok(here) = u16::try_from(addr) else {
                break;
            };
            self.headers(here);

            let unit = self.unit(here);
            let len = unit.len();
            if len > 1 {
                self.half_label(here);
            }
            self.emit(here, unit);

            let next = addr + len;
            if self.class(addr) != self.class(next) {
                self.out.push('\n');
            }
            addr = next;
        }
    }

    fn headers(&mut self, here: u16) {
        let analysis = self.analysis;
        let symbols = analysis.symbols();

        if here != LOAD_ADDRESS && analysis.subroutines().contains(here) {
            if let Some(name) = symbols.subroutine(here) {
                self.writeln(0, &format!("\n: {name}"));
            }
        }
        if here == LOAD_ADDRESS {
            self.writeln(0, ": main");
        }

        if let Some(mut refs) = self.refs.remove(&here) {
            // Outermost loop (the furthest tail) opens first.
            for i in (0..refs.len()).rev() {
                if is_loop_tail(analysis, here, refs[i], self.end) {
                    self.pending.push(refs.remove(i));
                    self.writeln(self.pending.len(), "loop");
                }
            }
            if !refs.is_empty() && here != LOAD_ADDRESS {
                if let Some(name) = symbols.label(here) {
                    self.writeln(0, &format!(": {name}"));
                }
            }
        }

        if analysis.natives().contains(here) {
            if let Some(name) = symbols.native(here) {
                self.writeln(0, &format!(": {name}"));
            }
            if self.class(u32::from(here)) == Class::Unclassified {
                self.native = true;
            }
        }
    }

    /// `:next` names the second byte of the unit about to be emitted.
    fn half_label(&mut self, here: u16) {
        let analysis = self.analysis;
        let half = here.wrapping_add(1);
        let name = if analysis.labels().contains(half) {
            analysis.symbols().label(half)
        } else if analysis.subroutines().contains(half) {
            analysis.symbols().subroutine(half)
        } else if analysis.natives().contains(half) {
            analysis.symbols().native(half)
        } else {
            None
        };
        if let Some(name) = name {
            self.writeln(0, &format!(":next {name}"));
        }
    }

    fn unit(&mut self, here: u16) -> Unit {
        let addr = u32::from(here);
        let class = self.class(addr);

        if self.pending.contains(&here) {
            return Unit::Again;
        }
        if self.native {
            if class == Class::Unclassified {
                if let Some(instr) = self.native_instr(here) {
                    if !self.operand_is_target(here, instr.opcode.size()) {
                        return Unit::Native(instr);
                    }
                }
            }
            self.native = false;
        }
        if addr < self.operand_end {
            return Unit::Operand;
        }

        match class {
            Class::Data => Unit::Data,
            Class::Smc => Unit::Smc,
            _ if self.class(addr + 1) == Class::Smc => Unit::Smc,
            Class::Code => {
                let instr = self.analysis.program().instr(here);
                let truncated = addr + u32::from(instr.size()) > self.end;
                if instr.size() > 2 && (truncated || self.operand_is_target(here, instr.size())) {
                    Unit::SplitLong(instr)
                } else {
                    Unit::Code(instr)
                }
            }
            Class::Unclassified => Unit::Unused,
        }
    }

    fn native_instr(&self, here: u16) -> Option<NativeInstr> {
        let bytes = self.analysis.program().bytes_from(here);
        let remaining = (self.end - u32::from(here)) as usize;
        cosmac::decode(&bytes[..remaining.min(bytes.len())], here)
    }

    fn is_target(&self, addr: u16) -> bool {
        let analysis = self.analysis;
        analysis.labels().contains(addr)
            || analysis.subroutines().contains(addr)
            || analysis.natives().contains(addr)
    }

    /// Whether a target lies past the second byte of a `size`-byte unit,
    /// where `:next` can no longer name it.
    fn operand_is_target(&self, here: u16, size: u16) -> bool {
        (2..size).any(|offset| self.is_target(here.wrapping_add(offset)))
    }

    fn emit(&mut self, here: u16, unit: Unit) {
        let addr = u32::from(here);
        let depth = self.pending.len() + 1;
        let analysis = self.analysis;
        let symbols = analysis.symbols();

        match unit {
            Unit::Again => {
                self.pending.retain(|&tail| tail != here);
                self.writeln(self.pending.len() + 1, "again");
            }
            Unit::Native(instr) => {
                let raw: Vec<String> = instr.bytes.iter().map(|b| format!("{b:#04X}")).collect();
                self.writeln(depth, &format!("{} # {}", raw.join(" "), instr.text()));
                if instr.returns_to_interpreter() {
                    self.native = false;
                    // body already separates a class change
                    let next = addr + u32::from(instr.opcode.size());
                    if self.class(next) == self.class(addr) {
                        self.out.push('\n');
                    }
                }
            }
            Unit::Code(instr) => {
                self.writeln(depth, &format_instr(&instr, symbols));
            }
            Unit::SplitLong(instr) => {
                let line = format!(
                    "{:#04X} {:#04X} # {}",
                    self.byte(addr),
                    self.byte(addr + 1),
                    format_instr(&instr, symbols)
                );
                self.writeln(depth, &line);
                self.operand_end = addr + u32::from(instr.size());
            }
            Unit::Operand => {
                let line = format!("{:#04X} {:#04X}", self.byte(addr), self.byte(addr + 1));
                self.writeln(depth, &line);
            }
            Unit::Data => {
                self.writeln(depth, &format!("{:#04X}", self.byte(addr)));
            }
            Unit::Smc => {
                let (hi, lo) = (self.byte(addr), self.byte(addr + 1));
                let guess = format_instr(&Instr::decode(hi, lo), symbols);
                self.writeln(depth, &format!("{hi:#04X} {lo:#04X} # smc? {guess}"));
            }
            Unit::Unused => {
                self.writeln(depth, &format!("{:#04X} # unused?", self.byte(addr)));
            }
        }
    }
}
