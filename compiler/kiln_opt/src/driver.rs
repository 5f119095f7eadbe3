//! Sequences the hoisting and folding passes over a file.

use std::fs;
use std::path::Path;
use std::time::Instant;

use kiln_eval::{Evaluator, PureFunctionRegistry};
use tracing::debug;

use crate::config::OptimizerConfig;
use crate::error::OptimizeError;
use crate::fold::FoldingPass;
use crate::hoist::{Disposition, HoistingPass};
use crate::line::{source_lines, OutputBuffer};
use crate::stats::{OptimizeOutput, PassStats};

/// Optimizer with a fixed configuration and function registry.
///
/// Holds no per-file state, so one instance can serve many files, including
/// from several threads at once.
#[derive(Clone, Debug)]
pub struct Optimizer {
    config: OptimizerConfig,
    registry: PureFunctionRegistry,
}

impl Optimizer {
    /// Optimizer using the builtin pure functions.
    pub fn new(config: OptimizerConfig) -> Self {
        Self::with_registry(config, PureFunctionRegistry::new())
    }

    pub fn with_registry(config: OptimizerConfig, registry: PureFunctionRegistry) -> Self {
        Optimizer { config, registry }
    }

    pub fn config(&self) -> OptimizerConfig {
        self.config
    }

    pub fn registry(&self) -> &PureFunctionRegistry {
        &self.registry
    }

    /// Optimize program text.
    #[tracing::instrument(level = "debug", skip_all, fields(bytes = source.len()))]
    pub fn optimize_source(&self, source: &str) -> OptimizeOutput {
        let start = Instant::now();
        let evaluator = Evaluator::new(&self.registry);
        let folder = FoldingPass::new(&self.registry);
        let mut hoister = HoistingPass::new(evaluator, self.config.hoist);
        let mut output = OutputBuffer::new();
        let mut stats = PassStats::default();

        for line in source_lines(source) {
            stats.lines_read += 1;

            match hoister.process(&line, &mut output) {
                Disposition::Suppress => {}
                Disposition::Verbatim => {
                    output.push(format!("{}{}", line.text, line.terminator), line.flags);
                }
                Disposition::Retain if self.config.fold => {
                    let folded = folder.fold_tokens(line.text, line.tokens.as_slice());
                    stats.expressions_folded += folded.folded;
                    output.push(folded.text + line.terminator, line.flags);
                }
                Disposition::Retain => {
                    output.push(format!("{}{}", line.text, line.terminator), line.flags);
                }
            }
        }

        hoister.finish(&mut output);

        stats.assignments_hoisted = hoister.hoisted();
        stats.lines_written = output.len();
        stats.duration = start.elapsed();
        debug!(%stats, "optimized source");

        OptimizeOutput {
            text: output.into_text(),
            stats,
        }
    }

    /// Optimize `input` into `output`, creating or overwriting it.
    #[tracing::instrument(
        level = "debug",
        skip_all,
        fields(input = %input.display(), output = %output.display())
    )]
    pub fn optimize_file(&self, input: &Path, output: &Path) -> Result<PassStats, OptimizeError> {
        let source = fs::read_to_string(input).map_err(|source| OptimizeError::Read {
            path: input.to_path_buf(),
            source,
        })?;

        let result = self.optimize_source(&source);

        fs::write(output, result.text).map_err(|source| OptimizeError::Write {
            path: output.to_path_buf(),
            source,
        })?;

        Ok(result.stats)
    }
}

impl Default for Optimizer {
    fn default() -> Self {
        Self::new(OptimizerConfig::default())
    }
}

/// Optimize the file at `input` into `output` with both passes enabled.
pub fn optimize(input: impl AsRef<Path>, output: impl AsRef<Path>) -> Result<PassStats, OptimizeError> {
    Optimizer::default().optimize_file(input.as_ref(), output.as_ref())
}

/// Optimize program text with both passes enabled.
pub fn optimize_source(source: &str) -> String {
    Optimizer::default().optimize_source(source).text
}
