//! Per-run statistics.

use std::fmt;
use std::time::Duration;

/// Counters collected while optimizing one file.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PassStats {
    pub lines_read: usize,
    pub lines_written: usize,
    /// Constant sub-expressions replaced by the folding pass.
    pub expressions_folded: usize,
    /// Assignments moved out of loops.
    pub assignments_hoisted: usize,
    pub duration: Duration,
}

impl PassStats {
    /// Whether the output differs from the input.
    pub fn changed(&self) -> bool {
        self.expressions_folded > 0 || self.assignments_hoisted > 0
    }

    /// Add another run's counters to this one.
    pub fn merge(&mut self, other: &PassStats) {
        self.lines_read += other.lines_read;
        self.lines_written += other.lines_written;
        self.expressions_folded += other.expressions_folded;
        self.assignments_hoisted += other.assignments_hoisted;
        self.duration += other.duration;
    }
}

impl fmt::Display for PassStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} lines in, {} lines out, {} folded, {} hoisted ({:.2?})",
            self.lines_read,
            self.lines_written,
            self.expressions_folded,
            self.assignments_hoisted,
            self.duration
        )
    }
}

/// Optimized text together with its statistics.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OptimizeOutput {
    pub text: String,
    pub stats: PassStats,
}
