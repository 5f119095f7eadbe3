//! Command handlers for the `kiln` CLI.
//!
//! Handlers return values instead of printing so they can be tested; the
//! binary decides what goes to stdout, stderr, and the exit code.

use std::error::Error;
use std::path::Path;

use kiln_opt::OptimizeError;

pub mod batch;
mod inspect;
mod optimize;

pub use batch::{run_batch, BatchConfig, BatchEntry, BatchOutcome, BatchSummary};
pub use inspect::{eval_expression, fold_text, lex_file, lex_source, list_functions};
pub use optimize::{apply_optimizer_flag, default_output_path, optimize_file};

/// `optimization failed for <input>: <cause>`, with the full cause chain.
pub fn failure_message(input: &Path, error: &OptimizeError) -> String {
    let mut message = format!("optimization failed for {}: {error}", input.display());
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
