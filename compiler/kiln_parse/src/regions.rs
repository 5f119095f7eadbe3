//! Expression regions of a statement line.
//!
//! An assignment or comparison operator (an *introducer*) is followed by a
//! right-hand side. The region runs over a balanced stretch of tokens and
//! stops at the first token that cannot belong to that right-hand side:
//!
//! - `;`
//! - `,` outside parentheses
//! - `)` that closes a parenthesis opened before the region
//! - a keyword (`then`, `do`, ...)
//! - another introducer
//!
//! Regions never overlap, and they are returned in source order.

use kiln_ir::{Token, TokenKind};
use std::ops::Range;

/// Tokens following one introducer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Region {
    /// Index range into the line's token slice.
    pub tokens: Range<usize>,
    /// The region contains a token the lexer could not recognize.
    pub poisoned: bool,
}

/// Find every expression region in a line.
pub fn expression_regions(tokens: &[Token]) -> Vec<Region> {
    let mut regions = Vec::new();
    let mut i = 0;

    while i < tokens.len() {
        if !tokens[i].kind.is_introducer() {
            i += 1;
            continue;
        }

        let start = i + 1;
        let mut end = start;
        let mut depth = 0u32;
        let mut poisoned = false;

        while let Some(token) = tokens.get(end) {
            match token.kind {
                TokenKind::Semicolon => break,
                TokenKind::Comma if depth == 0 => break,
                TokenKind::RParen if depth == 0 => break,
                kind if kind.is_keyword() || kind.is_introducer() => break,
                TokenKind::LParen => depth += 1,
                TokenKind::RParen => depth -= 1,
                TokenKind::Error => poisoned = true,
                _ => {}
            }
            end += 1;
        }

        if end > start {
            regions.push(Region {
                tokens: start..end,
                poisoned,
            });
        }
        i = end;
    }

    regions
}
