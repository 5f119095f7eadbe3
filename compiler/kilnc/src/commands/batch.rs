//! `kiln batch`: optimize numbered input files.
//!
//! For each `i` in `first..=last`, `dir/input{i}.txt` is optimized into
//! `dir/input{i}_optimized.txt`. Missing inputs are skipped. Files are
//! independent, so they run in parallel on a scoped rayon pool.

use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use kiln_opt::{OptimizeError, Optimizer, PassStats};
use rayon::prelude::*;
use tracing::{debug, info, warn};

/// Which files a batch covers and how it runs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BatchConfig {
    pub dir: PathBuf,
    pub first: u32,
    pub last: u32,
    pub parallel: bool,
}

impl Default for BatchConfig {
    fn default() -> Self {
        BatchConfig {
            dir: PathBuf::from("inputs"),
            first: 1,
            last: 14,
            parallel: true,
        }
    }
}

impl BatchConfig {
    pub fn input_path(&self, index: u32) -> PathBuf {
        self.dir.join(format!("input{index}.txt"))
    }

    pub fn output_path(&self, index: u32) -> PathBuf {
        self.dir.join(format!("input{index}_optimized.txt"))
    }

    /// Apply a batch flag (`--first=N`, `--last=N`, `--no-parallel`).
    ///
    /// Returns `Ok(false)` for flags that are not batch flags.
    pub fn apply_flag(&mut self, arg: &str) -> Result<bool, String> {
        if let Some(value) = arg.strip_prefix("--first=") {
            self.first = parse_index(arg, value)?;
        } else if let Some(value) = arg.strip_prefix("--last=") {
            self.last = parse_index(arg, value)?;
        } else if arg == "--no-parallel" {
            self.parallel = false;
        } else {
            return Ok(false);
        }
        Ok(true)
    }
}

fn parse_index(arg: &str, value: &str) -> Result<u32, String> {
    value
        .parse()
        .map_err(|_| format!("invalid number in `{arg}`"))
}

/// What happened to one numbered input.
#[derive(Debug)]
pub enum BatchOutcome {
    Optimized(PassStats),
    /// The input file does not exist.
    Skipped,
    Failed(OptimizeError),
}

#[derive(Debug)]
pub struct BatchEntry {
    pub index: u32,
    pub input: PathBuf,
    pub output: PathBuf,
    pub outcome: BatchOutcome,
}

/// Results of a batch, in index order.
#[derive(Debug, Default)]
pub struct BatchSummary {
    pub entries: Vec<BatchEntry>,
    pub duration: Duration,
}

impl BatchSummary {
    pub fn optimized(&self) -> usize {
        self.count(|o| matches!(o, BatchOutcome::Optimized(_)))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, BatchOutcome::Skipped))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, BatchOutcome::Failed(_)))
    }

    pub fn has_failures(&self) -> bool {
        self.failed() > 0
    }

    /// Statistics summed over every optimized file.
    pub fn totals(&self) -> PassStats {
        let mut total = PassStats::default();
        for entry in &self.entries {
            if let BatchOutcome::Optimized(stats) = &entry.outcome {
                total.merge(stats);
            }
        }
        total
    }

    fn count(&self, pred: impl Fn(&BatchOutcome) -> bool) -> usize {
        self.entries.iter().filter(|e| pred(&e.outcome)).count()
    }
}

/// Optimize every numbered input in `config`.
#[tracing::instrument(level = "debug", skip_all, fields(dir = %config.dir.display()))]
pub fn run_batch(config: &BatchConfig, optimizer: &Optimizer) -> BatchSummary {
    let start = Instant::now();
    let indices: Vec<u32> = (config.first..=config.last).collect();
    debug!(
        files = indices.len(),
        passes = ?optimizer.config(),
        functions = optimizer.registry().len(),
        "starting batch"
    );

    let entries = if config.parallel {
        run_parallel(config, optimizer, &indices)
    } else {
        run_sequential(config, optimizer, &indices)
    };

    BatchSummary {
        entries,
        duration: start.elapsed(),
    }
}

fn run_sequential(config: &BatchConfig, optimizer: &Optimizer, indices: &[u32]) -> Vec<BatchEntry> {
    indices
        .iter()
        .map(|&index| run_one(config, optimizer, index))
        .collect()
}

/// Scoped pool so no worker threads outlive the batch.
fn run_parallel(config: &BatchConfig, optimizer: &Optimizer, indices: &[u32]) -> Vec<BatchEntry> {
    rayon::ThreadPoolBuilder::new()
        .build_scoped(rayon::ThreadBuilder::run, |pool| {
            pool.install(|| {
                indices
                    .par_iter()
                    .map(|&index| run_one(config, optimizer, index))
                    .collect::<Vec<_>>()
            })
        })
        .unwrap_or_else(|e| {
            warn!("failed to create thread pool ({e}), running sequentially");
            run_sequential(config, optimizer, indices)
        })
}

fn run_one(config: &BatchConfig, optimizer: &Optimizer, index: u32) -> BatchEntry {
    let input = config.input_path(index);
    let output = config.output_path(index);

    let outcome = match optimizer.optimize_file(&input, &output) {
        Ok(stats) => BatchOutcome::Optimized(stats),
        Err(OptimizeError::Read { source, .. }) if source.kind() == io::ErrorKind::NotFound => {
            info!(path = %input.display(), "input missing, skipping");
            BatchOutcome::Skipped
        }
        Err(error) => {
            warn!(path = %input.display(), %error, "optimization failed");
            BatchOutcome::Failed(error)
        }
    };

    BatchEntry {
        index,
        input,
        output,
        outcome,
    }
}
