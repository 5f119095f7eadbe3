//! Structural classification of a lexed line.
//!
//! The hoisting pass only reacts to a handful of fixed markers: the `main`
//! function header, `endfun`, a `while ... do` loop header, `endwhile;` and
//! the `var int` declaration marker. They are detected from tokens, so an
//! identifier such as `done` or a string containing `"while"` never trips
//! them.

use bitflags::bitflags;
use kiln_ir::{Token, TokenKind};

bitflags! {
    /// Structural markers found on one line.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    pub struct LineFlags: u16 {
        /// First token is `fun`.
        const FUN_HEADER = 1 << 0;
        /// Contains `main ( )`.
        const MAIN_MARKER = 1 << 1;
        /// The line is exactly `endfun`.
        const FUNCTION_END = 1 << 2;
        /// Contains the `while` keyword.
        const WHILE = 1 << 3;
        /// Contains the `do` keyword.
        const DO = 1 << 4;
        /// The line is `endwhile` with an optional `;`.
        const LOOP_END = 1 << 5;
        /// Contains `var` immediately followed by `int`.
        const INT_DECLARATION = 1 << 6;
        /// Contains `=` (assignment, not `==`).
        const HAS_ASSIGN = 1 << 7;
        /// Some input failed to lex.
        const HAS_ERROR = 1 << 8;
    }
}

/// What a line means to the hoisting state machine.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum LineKind {
    /// `fun ... main()`.
    MainHeader,
    /// Any other `fun ...` header.
    FunctionHeader,
    /// `endfun`.
    FunctionEnd,
    /// A line holding both `while` and `do`.
    LoopHeader,
    /// `endwhile;`.
    LoopEnd,
    /// Everything else; candidates for folding and hoisting.
    Statement,
}

impl LineKind {
    /// Structural lines are emitted verbatim by the optimizer.
    pub fn is_structural(self) -> bool {
        !matches!(self, LineKind::Statement)
    }
}

impl LineFlags {
    /// Resolve the flags into a single line kind.
    ///
    /// Checked in a fixed order: function header, function end, loop header,
    /// loop end.
    pub fn kind(self) -> LineKind {
        if self.contains(LineFlags::FUN_HEADER) {
            if self.contains(LineFlags::MAIN_MARKER) {
                LineKind::MainHeader
            } else {
                LineKind::FunctionHeader
            }
        } else if self.contains(LineFlags::FUNCTION_END) {
            LineKind::FunctionEnd
        } else if self.contains(LineFlags::WHILE | LineFlags::DO) {
            LineKind::LoopHeader
        } else if self.contains(LineFlags::LOOP_END) {
            LineKind::LoopEnd
        } else {
            LineKind::Statement
        }
    }
}

/// Compute the structural flags for a lexed line.
///
/// `source` is the line the tokens were lexed from; it is needed to tell
/// the `main` identifier apart from other identifiers.
pub fn classify(source: &str, tokens: &[Token]) -> LineFlags {
    let mut flags = LineFlags::empty();
    let kinds: Vec<TokenKind> = tokens.iter().map(|t| t.kind).collect();

    if kinds.first() == Some(&TokenKind::Fun) {
        flags |= LineFlags::FUN_HEADER;
    }
    if kinds == [TokenKind::EndFun] {
        flags |= LineFlags::FUNCTION_END;
    }
    if matches!(
        kinds.as_slice(),
        [TokenKind::EndWhile] | [TokenKind::EndWhile, TokenKind::Semicolon]
    ) {
        flags |= LineFlags::LOOP_END;
    }

    for (i, token) in tokens.iter().enumerate() {
        match token.kind {
            TokenKind::While => flags |= LineFlags::WHILE,
            TokenKind::Do => flags |= LineFlags::DO,
            TokenKind::Eq => flags |= LineFlags::HAS_ASSIGN,
            TokenKind::Error => flags |= LineFlags::HAS_ERROR,
            TokenKind::Var if kinds.get(i + 1) == Some(&TokenKind::IntType) => {
                flags |= LineFlags::INT_DECLARATION;
            }
            TokenKind::Ident
                if token.span.slice(source) == "main"
                    && kinds.get(i + 1) == Some(&TokenKind::LParen)
                    && kinds.get(i + 2) == Some(&TokenKind::RParen) =>
            {
                flags |= LineFlags::MAIN_MARKER;
            }
            _ => {}
        }
    }

    flags
}
