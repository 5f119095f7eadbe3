//! Optimizer configuration.

/// Which passes run.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct OptimizerConfig {
    /// Fold constant sub-expressions in retained lines.
    pub fold: bool,
    /// Hoist constant assignments out of loops in `main`.
    pub hoist: bool,
}

impl OptimizerConfig {
    /// Both passes enabled.
    pub const fn new() -> Self {
        OptimizerConfig {
            fold: true,
            hoist: true,
        }
    }

    #[must_use]
    pub const fn with_fold(mut self, fold: bool) -> Self {
        self.fold = fold;
        self
    }

    #[must_use]
    pub const fn with_hoist(mut self, hoist: bool) -> Self {
        self.hoist = hoist;
        self
    }
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self::new()
    }
}
