//! Assignment statement recognition.

use kiln_ir::{Span, Token, TokenKind};

/// `name = value` with the statement terminator removed.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Assignment<'t> {
    /// Span of the assigned identifier.
    pub target: Span,
    /// Right-hand side tokens, without trailing `;`.
    pub value: &'t [Token],
}

impl Assignment<'_> {
    pub fn target_name<'s>(&self, source: &'s str) -> &'s str {
        self.target.slice(source)
    }
}

/// Recognize a line of the form `IDENT = expr [;]`.
///
/// Comparisons (`x == 3`, `x <= 5`) and compound targets are not
/// assignments. Returns `None` when the right-hand side is empty.
pub fn split_assignment(tokens: &[Token]) -> Option<Assignment<'_>> {
    let [target, eq, rest @ ..] = tokens else {
        return None;
    };
    if target.kind != TokenKind::Ident || eq.kind != TokenKind::Eq {
        return None;
    }

    let mut value = rest;
    while let [init @ .., last] = value {
        if last.kind != TokenKind::Semicolon {
            break;
        }
        value = init;
    }

    if value.is_empty() {
        return None;
    }

    Some(Assignment {
        target: target.span,
        value,
    })
}
