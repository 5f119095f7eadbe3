//! Inspection commands: `eval`, `fold`, `lex` and `functions`.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use kiln_eval::{evaluate, PureFunctionRegistry};
use kiln_opt::{fold_line, source_lines, OptimizeError};

/// The value of `text`, or `not constant: <reason>`.
pub fn eval_expression(registry: &PureFunctionRegistry, text: &str) -> String {
    match evaluate(registry, text) {
        Ok(value) => value.to_string(),
        Err(reason) => format!("not constant: {reason}"),
    }
}

/// `line` with its constant sub-expressions folded.
pub fn fold_text(registry: &PureFunctionRegistry, line: &str) -> String {
    fold_line(registry, line).text
}

/// Each line's classification followed by its tokens.
pub fn lex_source(source: &str) -> String {
    let mut out = String::new();
    for (number, line) in source_lines(source).enumerate() {
        let _ = writeln!(out, "{:>4} {:?} {:?}", number + 1, line.kind(), line.flags);
        for token in &line.tokens {
            let _ = writeln!(
                out,
                "       {} @ {} {:?}",
                token.kind,
                token.span,
                token.span.slice(line.text)
            );
        }
    }
    out
}

pub fn lex_file(path: &Path) -> Result<String, OptimizeError> {
    let source = fs::read_to_string(path).map_err(|source| OptimizeError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(lex_source(&source))
}

/// One line per registered pure function, sorted by name.
pub fn list_functions(registry: &PureFunctionRegistry) -> String {
    let mut out = String::new();
    for function in registry.names().into_iter().filter_map(|name| registry.lookup(name)) {
        let _ = writeln!(
            out,
            "{:<8} {} ({})",
            function.name, function.description, function.arity
        );
    }
    out
}
