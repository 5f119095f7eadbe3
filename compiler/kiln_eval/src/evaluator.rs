//! Constant expression evaluator.
//!
//! Evaluation runs over the expression arena front to back. The parser
//! allocates every operand before the node using it, so by the time a node
//! is visited its children already have results. This gives a value (or the
//! reason there is none) for *every* node, not just the root, which the
//! folding pass uses to find constant sub-expressions of runtime
//! expressions.

use kiln_ir::{ExprArena, ExprId, ExprKind, Token};
use kiln_lexer::lex;
use kiln_parse::{parse_expression, ParsedExpr};
use tracing::trace;

use crate::errors::EvalError;
use crate::operators::{evaluate_binary, evaluate_unary};
use crate::registry::PureFunctionRegistry;

/// Per-node evaluation results, indexed by `ExprId`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConstTable {
    values: Vec<Result<i64, EvalError>>,
}

impl ConstTable {
    /// The node's result.
    pub fn result(&self, id: ExprId) -> Result<i64, EvalError> {
        self.values[id.index()].clone()
    }

    /// The node's value, if it is constant.
    pub fn value(&self, id: ExprId) -> Option<i64> {
        self.values[id.index()].as_ref().ok().copied()
    }

    pub fn is_const(&self, id: ExprId) -> bool {
        self.values[id.index()].is_ok()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Evaluates expressions against a pure-function registry.
#[derive(Copy, Clone, Debug)]
pub struct Evaluator<'r> {
    registry: &'r PureFunctionRegistry,
}

impl<'r> Evaluator<'r> {
    pub fn new(registry: &'r PureFunctionRegistry) -> Self {
        Evaluator { registry }
    }

    pub fn registry(&self) -> &'r PureFunctionRegistry {
        self.registry
    }

    /// Evaluate expression text to an integer.
    pub fn evaluate(&self, text: &str) -> Result<i64, EvalError> {
        let tokens = lex(text);
        self.evaluate_tokens(text, tokens.as_slice())
    }

    /// Evaluate a token run lexed from `source`.
    pub fn evaluate_tokens(&self, source: &str, tokens: &[Token]) -> Result<i64, EvalError> {
        let parsed = parse_expression(source, tokens)?;
        let result = self.const_table(&parsed).result(parsed.root);
        trace!(?result, "evaluated expression");
        result
    }

    /// Evaluate every node of a parsed expression.
    pub fn const_table(&self, parsed: &ParsedExpr) -> ConstTable {
        let arena = &parsed.arena;
        let mut values = Vec::with_capacity(arena.len());
        for id in arena.ids() {
            let value = self.eval_node(arena, id, &values);
            values.push(value);
        }
        ConstTable { values }
    }

    /// Evaluate one node whose children are already in `done`.
    fn eval_node(
        &self,
        arena: &ExprArena,
        id: ExprId,
        done: &[Result<i64, EvalError>],
    ) -> Result<i64, EvalError> {
        let operand = |child: ExprId| done[child.index()].clone();

        match arena.kind(id) {
            ExprKind::Int(n) => Ok(*n),
            ExprKind::Ident(name) => Err(EvalError::NonConstant { name: name.clone() }),
            ExprKind::Binary { op, left, right } => {
                let a = operand(*left)?;
                let b = operand(*right)?;
                evaluate_binary(*op, a, b)
            }
            ExprKind::Unary { op, operand: inner } => evaluate_unary(*op, operand(*inner)?),
            ExprKind::Call { callee, args } => {
                let Some(function) = self.registry.lookup(callee) else {
                    return Err(EvalError::UnknownFunction {
                        name: callee.clone(),
                    });
                };
                let args = args
                    .iter()
                    .map(|arg| operand(*arg))
                    .collect::<Result<Vec<_>, _>>()?;
                function.call(&args)
            }
        }
    }
}

/// Evaluate `text` with `registry`.
pub fn evaluate(registry: &PureFunctionRegistry, text: &str) -> Result<i64, EvalError> {
    Evaluator::new(registry).evaluate(text)
}

/// Like [`evaluate`], collapsing every failure into "not constant".
pub fn try_evaluate(registry: &PureFunctionRegistry, text: &str) -> Option<i64> {
    evaluate(registry, text).ok()
}
