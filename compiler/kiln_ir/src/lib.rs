//! Kiln IR - shared data types for the Kiln optimizer.
//!
//! This crate holds the types every other crate agrees on:
//! - Spans for byte ranges inside a single source line
//! - Tokens and `TokenList` for lexer output
//! - Operators and the flat expression arena produced by the parser
//!
//! # Design
//!
//! - **Flatten Everything**: expressions live in an `ExprArena` and refer to
//!   their children by `ExprId(u32)`. Children are always allocated before
//!   their parent, so arena order is a valid bottom-up evaluation order.
//! - **Line-local spans**: the optimizer works one line at a time, so every
//!   span is relative to the start of the line it was lexed from.

/// Compile-time assertion that a type has a specific size.
///
/// Used to prevent accidental size regressions in frequently-allocated types.
#[macro_export]
macro_rules! static_assert_size {
    ($ty:ty, $size:expr) => {
        const _: [(); $size] = [(); ::std::mem::size_of::<$ty>()];
    };
}

mod arena;
mod ast;
mod span;
mod token;

pub use arena::{CallArgs, Expr, ExprArena, ExprId, ExprKind};
pub use ast::{BinaryOp, UnaryOp};
pub use span::Span;
pub use token::{Token, TokenKind, TokenList};
