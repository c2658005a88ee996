//! Reaching-set fixpoint analysis over CHIP-8 memory.
//!
//! The analyzer explores from the load address with a deduplicated LIFO
//! fringe. Each visit applies the transfer function to the reaching state of
//! an address, resolves its successors against the state *before* the
//! transfer, and merges the output into every successor. The fringe can be
//! drained in bounded batches so a host loop can interleave other work.

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::{debug, trace, trace_span};

use c8d_isa::{Instr, LOAD_ADDRESS};

use crate::{
    AnalysisError, Class, ClassMap, Program, Quirks, Register, RegisterState, SymbolTable,
    ValueSet, XrefTable,
};

mod successors;
mod transfer;

/// Worklist pops performed by [`Analyzer::step_batch`].
pub const BATCH_SIZE: usize = 256;

/// Analysis context for one run over one ROM.
pub struct Analyzer {
    program: Program,
    quirks: Quirks,
    reaching: FxHashMap<u16, RegisterState>,
    classes: ClassMap,
    labels: XrefTable,
    subroutines: XrefTable,
    natives: XrefTable,
    fringe: Vec<u16>,
    in_fringe: FxHashSet<u16>,
    /// Return set each `return` instruction produced when last visited.
    chased: FxHashMap<u16, ValueSet>,
    steps: usize,
}

impl Analyzer {
    /// Load `rom` at the load address and seed the fringe with the entry point.
    pub fn new(rom: &[u8], quirks: Quirks) -> Result<Self, AnalysisError> {
        let program = Program::load(rom)?;

        let mut reaching = FxHashMap::default();
        reaching.insert(LOAD_ADDRESS, RegisterState::new());
        let mut in_fringe = FxHashSet::default();
        in_fringe.insert(LOAD_ADDRESS);

        debug!(rom_len = rom.len(), ?quirks, "analysis initialized");

        Ok(Self {
            program,
            quirks,
            reaching,
            classes: ClassMap::new(),
            labels: XrefTable::new(),
            subroutines: XrefTable::new(),
            natives: XrefTable::new(),
            fringe: vec![LOAD_ADDRESS],
            in_fringe,
            chased: FxHashMap::default(),
            steps: 0,
        })
    }

    /// Pop at most `budget` addresses. Returns true once the fringe is empty.
    pub fn step(&mut self, budget: usize) -> bool {
        let _span = trace_span!("worklist").entered();

        let mut visited = 0;
        while visited < budget {
            let Some(here) = self.fringe.pop() else {
                break;
            };
            self.in_fringe.remove(&here);
            self.visit(here);
            visited += 1;
        }
        self.steps += visited;

        trace!(visited, pending = self.fringe.len(), "batch complete");
        self.is_done()
    }

    /// Run one fixed-size batch. Returns true once the fringe is empty.
    pub fn step_batch(&mut self) -> bool {
        self.step(BATCH_SIZE)
    }

    /// Drive the analysis to its fixpoint.
    pub fn run(&mut self) {
        while !self.step_batch() {}
    }

    pub fn is_done(&self) -> bool {
        self.fringe.is_empty()
    }

    /// Addresses waiting to be (re-)visited.
    pub fn pending(&self) -> usize {
        self.fringe.len()
    }

    /// Total worklist pops so far.
    pub const fn steps(&self) -> usize {
        self.steps
    }

    pub const fn program(&self) -> &Program {
        &self.program
    }

    pub const fn quirks(&self) -> Quirks {
        self.quirks
    }

    pub const fn classes(&self) -> &ClassMap {
        &self.classes
    }

    pub fn class(&self, addr: u16) -> Class {
        self.classes.get(u32::from(addr))
    }

    /// Reaching state at `addr`, if the address has been reached.
    pub fn reaching(&self, addr: u16) -> Option<&RegisterState> {
        self.reaching.get(&addr)
    }

    pub const fn labels(&self) -> &XrefTable {
        &self.labels
    }

    pub const fn subroutines(&self) -> &XrefTable {
        &self.subroutines
    }

    pub const fn natives(&self) -> &XrefTable {
        &self.natives
    }

    /// Name every discovered target, consuming the finished analysis.
    pub fn finish(self) -> Result<Analysis, AnalysisError> {
        if !self.is_done() {
            return Err(AnalysisError::Incomplete {
                pending: self.fringe.len(),
            });
        }

        let symbols = {
            let _span = trace_span!("naming").entered();
            SymbolTable::build(&self.labels, &self.subroutines, &self.natives)
        };

        debug!(
            steps = self.steps,
            reached = self.reaching.len(),
            labels = self.labels.len(),
            subroutines = self.subroutines.len(),
            natives = self.natives.len(),
            smc = self.classes.count(Class::Smc),
            "analysis complete"
        );

        Ok(Analysis {
            program: self.program,
            quirks: self.quirks,
            reaching: self.reaching,
            classes: self.classes,
            labels: self.labels,
            subroutines: self.subroutines,
            natives: self.natives,
            symbols,
        })
    }

    fn visit(&mut self, here: u16) {
        let Some(state) = self.reaching.get(&here).cloned() else {
            return;
        };
        let instr = self.program.instr(here);

        // Successors see the state before the transfer replaces the return set.
        let succs = successors::resolve(&self.program, here, &instr, &state);
        let state_out = self.apply(here, &instr, state);

        for target in succs {
            if let Some(existing) = self.reaching.get_mut(&target) {
                let grew = existing.merge(&state_out);
                if grew || self.return_needs_revisit(target) {
                    self.enqueue(target);
                }
            } else {
                self.reaching.insert(target, state_out.clone());
                self.enqueue(target);
            }
        }
    }

    fn enqueue(&mut self, addr: u16) {
        if self.in_fringe.insert(addr) {
            self.fringe.push(addr);
        }
    }

    /// Union of the return sets recorded at the call site preceding each return address.
    fn chase_returns(&self, rets: &ValueSet) -> ValueSet {
        let mut destinations = ValueSet::new();
        for ret in rets.iter() {
            if let Some(call_site) = self.reaching.get(&ret.wrapping_sub(2)) {
                destinations.merge(call_site.get(Register::Rets));
            }
        }
        destinations
    }

    /// A `return` depends on call-site states elsewhere in the program, so it
    /// is revisited whenever the set it would produce differs from the last one.
    fn return_needs_revisit(&self, addr: u16) -> bool {
        if self.program.instr(addr) != Instr::Return {
            return false;
        }
        let Some(state) = self.reaching.get(&addr) else {
            return false;
        };
        let chased = self.chase_returns(state.get(Register::Rets));
        self.chased.get(&addr) != Some(&chased)
    }
}

/// Result of a converged analysis, with names assigned.
#[derive(Clone, Debug)]
pub struct Analysis {
    program: Program,
    quirks: Quirks,
    reaching: FxHashMap<u16, RegisterState>,
    classes: ClassMap,
    labels: XrefTable,
    subroutines: XrefTable,
    natives: XrefTable,
    symbols: SymbolTable,
}

impl Analysis {
    /// Analyze `rom` to completion.
    pub fn analyze(rom: &[u8], quirks: Quirks) -> Result<Self, AnalysisError> {
        let mut analyzer = Analyzer::new(rom, quirks)?;
        analyzer.run();
        analyzer.finish()
    }

    pub const fn program(&self) -> &Program {
        &self.program
    }

    pub const fn quirks(&self) -> Quirks {
        self.quirks
    }

    pub const fn classes(&self) -> &ClassMap {
        &self.classes
    }

    pub fn class(&self, addr: u16) -> Class {
        self.classes.get(u32::from(addr))
    }

    pub fn reaching(&self, addr: u16) -> Option<&RegisterState> {
        self.reaching.get(&addr)
    }

    pub const fn labels(&self) -> &XrefTable {
        &self.labels
    }

    pub const fn subroutines(&self) -> &XrefTable {
        &self.subroutines
    }

    pub const fn natives(&self) -> &XrefTable {
        &self.natives
    }

    pub const fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    /// Successors of `addr` under its converged reaching state.
    pub fn successors(&self, addr: u16) -> Vec<u16> {
        self.reaching.get(&addr).map_or_else(Vec::new, |state| {
            successors::resolve(&self.program, addr, &self.program.instr(addr), state)
        })
    }
}
