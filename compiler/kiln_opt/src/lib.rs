//! Kiln Opt - source-to-source optimization passes.
//!
//! Programs are processed one line at a time:
//!
//! 1. Each line is lexed and classified ([`SourceLine`]).
//! 2. The [`HoistingPass`] updates its [`LoopContext`] and decides whether the
//!    line is structural, retained, or hoisted out of its loop.
//! 3. Retained lines go through the [`FoldingPass`].
//! 4. When `main` closes, hoisted assignments are spliced into the output.
//!
//! The [`Optimizer`] drives this over a whole file. Evaluation failures are
//! never errors: an expression that cannot be proven constant is left as
//! written. Only file-system failures produce an [`OptimizeError`].

mod config;
mod driver;
mod error;
mod fold;
mod hoist;
mod line;
mod stats;

pub use config::OptimizerConfig;
pub use driver::{optimize, optimize_source, Optimizer};
pub use error::OptimizeError;
pub use fold::{fold_line, FoldedLine, FoldingPass};
pub use hoist::{Disposition, HoistedAssignment, HoistingPass, LoopContext, LoopState};
pub use line::{source_lines, OutputBuffer, SourceLine};
pub use stats::{OptimizeOutput, PassStats};

#[cfg(test)]
mod tests;
