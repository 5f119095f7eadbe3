//! Parse error types.

use kiln_ir::{Span, TokenKind};
use kiln_stack::DepthExceeded;

/// Why a token run is not a well-formed expression.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("empty expression")]
    Empty,

    #[error("unexpected {found} at {span}")]
    UnexpectedToken { found: TokenKind, span: Span },

    #[error("expression ended early, expected {expected}")]
    UnexpectedEnd { expected: &'static str },

    #[error("unexpected trailing {found} at {span}")]
    TrailingTokens { found: TokenKind, span: Span },

    #[error("unary `+` is not supported at {span}")]
    UnaryPlus { span: Span },

    #[error("expression nests deeper than {limit} levels")]
    NestingTooDeep { limit: u32 },
}

impl From<DepthExceeded> for ParseError {
    fn from(e: DepthExceeded) -> Self {
        ParseError::NestingTooDeep { limit: e.limit }
    }
}
