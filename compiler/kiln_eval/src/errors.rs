//! Reasons an expression is not a compile-time constant.
//!
//! None of these reach the user. The folding and hoisting passes treat every
//! variant the same way (leave the text alone) and only log which one fired.

use kiln_ir::TokenKind;
use kiln_parse::ParseError;
use std::fmt;

/// Number of arguments a pure function accepts.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Arity {
    Exact(usize),
    AtLeast(usize),
}

impl Arity {
    pub fn accepts(self, count: usize) -> bool {
        match self {
            Arity::Exact(n) => count == n,
            Arity::AtLeast(n) => count >= n,
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arity::Exact(1) => write!(f, "1 argument"),
            Arity::Exact(n) => write!(f, "{n} arguments"),
            Arity::AtLeast(n) => write!(f, "at least {n} arguments"),
        }
    }
}

/// Why evaluation did not produce a value.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EvalError {
    #[error("malformed expression: {0}")]
    Malformed(ParseError),

    #[error("`{name}` is not a constant")]
    NonConstant { name: String },

    #[error("unsupported operator `{op}`")]
    UnsupportedOperator { op: String },

    #[error("unknown function `{name}`")]
    UnknownFunction { name: String },

    #[error("`{name}` takes {expected}, got {found}")]
    ArityMismatch {
        name: String,
        expected: Arity,
        found: usize,
    },

    #[error("division by zero")]
    DivisionByZero,

    #[error("integer overflow in {op}")]
    Overflow { op: &'static str },

    #[error("expression nests deeper than {limit} levels")]
    NestingTooDeep { limit: u32 },
}

impl From<ParseError> for EvalError {
    fn from(e: ParseError) -> Self {
        match e {
            ParseError::NestingTooDeep { limit } => EvalError::NestingTooDeep { limit },
            ParseError::UnaryPlus { .. } => EvalError::UnsupportedOperator {
                op: "unary +".to_string(),
            },
            ParseError::UnexpectedToken { found, .. } | ParseError::TrailingTokens { found, .. }
                if is_operator(found) =>
            {
                EvalError::UnsupportedOperator {
                    op: found.display_name().trim_matches('`').to_string(),
                }
            }
            other => EvalError::Malformed(other),
        }
    }
}

/// Operators the lexer knows but arithmetic evaluation does not support.
fn is_operator(kind: TokenKind) -> bool {
    kind.is_introducer()
        || matches!(
            kind,
            TokenKind::Percent | TokenKind::And | TokenKind::Or | TokenKind::Not
        )
}

// Constructors used by the operator and builtin implementations.

#[cold]
pub fn integer_overflow(op: &'static str) -> EvalError {
    EvalError::Overflow { op }
}

#[cold]
pub fn division_by_zero() -> EvalError {
    EvalError::DivisionByZero
}
