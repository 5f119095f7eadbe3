//! `kiln optimize`: one input file to one output file.

use std::path::{Path, PathBuf};

use kiln_opt::{OptimizeError, Optimizer, OptimizerConfig, PassStats};

/// `dir/name.ext` becomes `dir/name_optimized.ext`.
pub fn default_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map_or_else(|| "output".into(), |s| s.to_string_lossy());
    let name = match input.extension() {
        Some(ext) => format!("{stem}_optimized.{}", ext.to_string_lossy()),
        None => format!("{stem}_optimized"),
    };
    input.with_file_name(name)
}

/// Apply a pass toggle such as `--no-fold`. Returns `false` for other flags.
pub fn apply_optimizer_flag(config: &mut OptimizerConfig, arg: &str) -> bool {
    match arg {
        "--no-fold" => config.fold = false,
        "--no-hoist" => config.hoist = false,
        _ => return false,
    }
    true
}

/// Optimize `input`, writing to `output` or the default output path.
///
/// Returns the path written along with the run's statistics.
pub fn optimize_file(
    input: &Path,
    output: Option<&Path>,
    config: OptimizerConfig,
) -> Result<(PathBuf, PassStats), OptimizeError> {
    let output = output.map_or_else(|| default_output_path(input), Path::to_path_buf);
    let stats = Optimizer::new(config).optimize_file(input, &output)?;
    Ok((output, stats))
}
