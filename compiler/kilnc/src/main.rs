//! Kiln optimizer CLI.

use std::path::Path;

use kiln_eval::PureFunctionRegistry;
use kiln_opt::{Optimizer, OptimizerConfig};
use kilnc::commands::{
    apply_optimizer_flag, eval_expression, failure_message, fold_text, lex_file, list_functions,
    optimize_file, run_batch, BatchConfig, BatchOutcome,
};
use kilnc::tracing_setup::init_tracing;

fn main() {
    init_tracing();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        return;
    }

    let command = &args[1];

    match command.as_str() {
        "optimize" => {
            let mut config = OptimizerConfig::default();
            let mut input: Option<&str> = None;
            let mut output: Option<&str> = None;

            let mut i = 2;
            while i < args.len() {
                let arg = args[i].as_str();
                if arg == "-o" && i + 1 < args.len() {
                    output = Some(args[i + 1].as_str());
                    i += 2;
                    continue;
                }
                if apply_optimizer_flag(&mut config, arg) {
                    i += 1;
                    continue;
                }
                if !arg.starts_with('-') && input.is_none() {
                    input = Some(arg);
                } else {
                    eprintln!("error: unexpected argument '{arg}'");
                    std::process::exit(1);
                }
                i += 1;
            }

            let Some(input) = input else {
                eprintln!("Usage: kiln optimize <input> [-o <output>] [--no-fold] [--no-hoist]");
                std::process::exit(1);
            };

            let input = Path::new(input);
            match optimize_file(input, output.map(Path::new), config) {
                Ok((written, stats)) => {
                    println!("{} -> {} ({stats})", input.display(), written.display());
                }
                Err(e) => {
                    eprintln!("error: {}", failure_message(input, &e));
                    std::process::exit(1);
                }
            }
        }
        "batch" => {
            let mut batch = BatchConfig::default();
            let mut config = OptimizerConfig::default();
            let mut dir_set = false;

            for arg in args.iter().skip(2) {
                match batch.apply_flag(arg) {
                    Ok(true) => {}
                    Ok(false) if apply_optimizer_flag(&mut config, arg) => {}
                    Ok(false) if !arg.starts_with('-') && !dir_set => {
                        batch.dir = arg.into();
                        dir_set = true;
                    }
                    Ok(false) => {
                        eprintln!("error: unexpected argument '{arg}'");
                        std::process::exit(1);
                    }
                    Err(e) => {
                        eprintln!("error: {e}");
                        std::process::exit(1);
                    }
                }
            }

            let summary = run_batch(&batch, &Optimizer::new(config));
            for entry in &summary.entries {
                match &entry.outcome {
                    BatchOutcome::Optimized(stats) => println!(
                        "{} -> {} ({stats})",
                        entry.input.display(),
                        entry.output.display()
                    ),
                    BatchOutcome::Skipped => {}
                    BatchOutcome::Failed(e) => {
                        eprintln!("error: {}", failure_message(&entry.input, e));
                    }
                }
            }
            println!(
                "{} optimized, {} skipped, {} failed ({:.2?})",
                summary.optimized(),
                summary.skipped(),
                summary.failed(),
                summary.duration
            );
            if summary.has_failures() {
                std::process::exit(1);
            }
        }
        "eval" => {
            if args.len() < 3 {
                eprintln!("Usage: kiln eval \"<expression>\"");
                std::process::exit(1);
            }
            println!("{}", eval_expression(&PureFunctionRegistry::new(), &args[2]));
        }
        "fold" => {
            if args.len() < 3 {
                eprintln!("Usage: kiln fold \"<line>\"");
                std::process::exit(1);
            }
            println!("{}", fold_text(&PureFunctionRegistry::new(), &args[2]));
        }
        "lex" => {
            if args.len() < 3 {
                eprintln!("Usage: kiln lex <file>");
                std::process::exit(1);
            }
            match lex_file(Path::new(&args[2])) {
                Ok(listing) => print!("{listing}"),
                Err(e) => {
                    eprintln!("error: {e}");
                    std::process::exit(1);
                }
            }
        }
        "functions" => {
            print!("{}", list_functions(&PureFunctionRegistry::new()));
        }
        "help" | "--help" | "-h" => {
            print_usage();
        }
        "version" | "--version" | "-V" => {
            println!("kiln {}", env!("CARGO_PKG_VERSION"));
        }
        _ => {
            eprintln!("Unknown command: {command}");
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    }
}

fn print_usage() {
    println!("Kiln source-to-source optimizer");
    println!();
    println!("Usage: kiln <command> [options]");
    println!();
    println!("Commands:");
    println!("  optimize <input>     Fold constants and hoist loop invariants");
    println!("  batch [dir]          Optimize dir/input<N>.txt (default dir: inputs)");
    println!("  eval \"<expr>\"        Evaluate a constant expression");
    println!("  fold \"<line>\"        Fold constant sub-expressions in one line");
    println!("  lex <file>           Show line classification and tokens");
    println!("  functions            List pure functions usable in constants");
    println!("  help                 Show this help message");
    println!("  version              Show version information");
    println!();
    println!("Optimize options:");
    println!("  -o <path>           Output path (default: <input>_optimized.<ext>)");
    println!("  --no-fold           Skip constant folding");
    println!("  --no-hoist          Skip loop-invariant hoisting");
    println!();
    println!("Batch options:");
    println!("  --first=<n>         First input number (default: 1)");
    println!("  --last=<n>          Last input number (default: 14)");
    println!("  --no-parallel       Optimize files one at a time");
    println!("  --no-fold, --no-hoist as for optimize");
    println!();
    println!("Environment:");
    println!("  RUST_LOG            Enable logging, e.g. RUST_LOG=kiln_opt=trace");
    println!("  KILN_LOG_TREE       Print logs as an indented span tree");
}
