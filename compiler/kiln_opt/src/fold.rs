//! Constant folding over a single line.
//!
//! Each expression region (the right-hand side of `=` or a comparison) is
//! parsed and evaluated node by node. Every maximal constant sub-expression
//! is replaced by its decimal value; runtime parts such as variables are
//! kept, so `x = y + 2 * 3;` becomes `x = y + 6;`.
//!
//! Replacements never overlap and are applied from the end of the line
//! backwards, so earlier spans stay valid while later ones change length.

use kiln_eval::{maximal_constants, Evaluator, PureFunctionRegistry};
use kiln_ir::{Span, Token};
use kiln_lexer::lex;
use kiln_parse::{expression_regions, parse_expression};
use tracing::trace;

/// Result of folding one line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FoldedLine {
    pub text: String,
    /// Number of sub-expressions replaced.
    pub folded: usize,
}

impl FoldedLine {
    pub fn changed(&self) -> bool {
        self.folded > 0
    }
}

#[derive(Copy, Clone, Debug)]
struct Replacement {
    span: Span,
    value: i64,
    /// The folded node sits below the region root.
    nested: bool,
}

impl Replacement {
    fn render(&self) -> String {
        if self.nested && self.value < 0 {
            format!("({})", self.value)
        } else {
            self.value.to_string()
        }
    }
}

/// Stateless line folder.
#[derive(Copy, Clone, Debug)]
pub struct FoldingPass<'r> {
    evaluator: Evaluator<'r>,
}

impl<'r> FoldingPass<'r> {
    pub fn new(registry: &'r PureFunctionRegistry) -> Self {
        FoldingPass {
            evaluator: Evaluator::new(registry),
        }
    }

    pub fn fold(&self, line: &str) -> FoldedLine {
        let tokens = lex(line);
        self.fold_tokens(line, tokens.as_slice())
    }

    /// Fold a line that has already been lexed.
    pub fn fold_tokens(&self, line: &str, tokens: &[Token]) -> FoldedLine {
        let replacements = self.find_replacements(line, tokens);
        if replacements.is_empty() {
            return FoldedLine {
                text: line.to_string(),
                folded: 0,
            };
        }

        let mut text = line.to_string();
        for replacement in replacements.iter().rev() {
            text.replace_range(replacement.span.to_range(), &replacement.render());
        }

        FoldedLine {
            text,
            folded: replacements.len(),
        }
    }

    /// Constant sub-expressions of every region, in source order.
    fn find_replacements(&self, line: &str, tokens: &[Token]) -> Vec<Replacement> {
        let mut replacements = Vec::new();

        for region in expression_regions(tokens) {
            if region.poisoned {
                trace!(tokens = ?region.tokens, "region has unrecognized input");
                continue;
            }

            let parsed = match parse_expression(line, &tokens[region.tokens.clone()]) {
                Ok(parsed) => parsed,
                Err(reason) => {
                    trace!(%reason, "region is not an expression");
                    continue;
                }
            };

            let table = self.evaluator.const_table(&parsed);
            for id in maximal_constants(&parsed, &table) {
                let Some(value) = table.value(id) else {
                    continue;
                };
                let span = parsed.arena.span(id);
                trace!(expr = span.slice(line), value, "folding constant");
                replacements.push(Replacement {
                    span,
                    value,
                    nested: id != parsed.root,
                });
            }
        }

        replacements
    }
}

/// Fold one line with `registry`.
pub fn fold_line(registry: &PureFunctionRegistry, line: &str) -> FoldedLine {
    FoldingPass::new(registry).fold(line)
}
