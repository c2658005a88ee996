//! Decompilation pipeline - ROM → reaching sets → names → Octo source.

use c8d_cfg::{Analysis, Analyzer, BATCH_SIZE, Quirks};
use c8d_emit::{EmitConfig, Formatter};
use tracing::debug;

use crate::{Error, Result};

/// Steppable decompilation of one ROM.
///
/// The host drives analysis with [`Pipeline::step_batch`] until it reports
/// completion, then calls [`Pipeline::finalize`] once before formatting.
pub struct Pipeline {
    analyzer: Option<Analyzer>,
    analysis: Option<Analysis>,
    config: EmitConfig,
    batch_size: usize,
}

impl Pipeline {
    /// Load `rom` and seed the analysis at the entry point.
    pub fn new(rom: &[u8], quirks: Quirks) -> Result<Self> {
        let analyzer = Analyzer::new(rom, quirks)?;
        Ok(Self {
            analyzer: Some(analyzer),
            analysis: None,
            config: EmitConfig::default(),
            batch_size: BATCH_SIZE,
        })
    }

    /// Set the formatter configuration.
    #[must_use]
    pub fn with_emit_config(mut self, config: EmitConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the number of worklist pops per batch (at least one).
    #[must_use]
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    /// Run one batch of the fixpoint. Returns true once analysis has converged.
    pub fn step_batch(&mut self) -> bool {
        let batch_size = self.batch_size;
        self.analyzer
            .as_mut()
            .is_none_or(|analyzer| analyzer.step(batch_size))
    }

    /// Drive the analysis to its fixpoint.
    pub fn run(&mut self) {
        while !self.step_batch() {}
    }

    /// Addresses waiting to be visited, zero once finalized.
    pub fn pending(&self) -> usize {
        self.analyzer.as_ref().map_or(0, Analyzer::pending)
    }

    /// Worklist pops performed so far.
    pub fn steps(&self) -> usize {
        self.analyzer.as_ref().map_or(0, Analyzer::steps)
    }

    /// Assign names to every discovered target.
    pub fn finalize(&mut self) -> Result<()> {
        let analyzer = self.analyzer.take().ok_or(Error::AlreadyFinalized)?;
        if !analyzer.is_done() {
            let pending = analyzer.pending();
            self.analyzer = Some(analyzer);
            return Err(Error::AnalysisIncomplete { pending });
        }
        let steps = analyzer.steps();
        self.analysis = Some(analyzer.finish()?);
        debug!(steps, "pipeline finalized");
        Ok(())
    }

    /// The finished analysis, once finalized.
    pub const fn analysis(&self) -> Option<&Analysis> {
        self.analysis.as_ref()
    }

    /// Render `length` bytes from the load address as Octo source.
    pub fn format(&self, length: usize) -> Result<String> {
        let analysis = self.analysis.as_ref().ok_or(Error::NotFinalized("format"))?;
        Ok(Formatter::new(analysis, self.config.clone()).format(length))
    }
}

/// Decompile `rom` in one call.
pub fn decompile(rom: &[u8], quirks: Quirks) -> Result<String> {
    let mut pipeline = Pipeline::new(rom, quirks)?;
    pipeline.run();
    pipeline.finalize()?;
    pipeline.format(rom.len())
}
