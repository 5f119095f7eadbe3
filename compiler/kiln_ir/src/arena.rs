//! Flat expression arena.
//!
//! Expressions refer to their children by `ExprId` instead of boxing them.
//! The parser always allocates operands before the node that uses them, so
//! iterating the arena front to back visits children before parents.

use crate::{BinaryOp, Span, UnaryOp};
use smallvec::SmallVec;
use std::fmt;

/// Index into an `ExprArena`.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
#[repr(transparent)]
pub struct ExprId(u32);

impl ExprId {
    #[inline]
    pub const fn new(index: u32) -> Self {
        ExprId(index)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for ExprId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ExprId({})", self.0)
    }
}

/// Call arguments; most calls in practice take one or two.
pub type CallArgs = SmallVec<[ExprId; 4]>;

/// Expression node kinds.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExprKind {
    /// Integer literal.
    Int(i64),
    /// Variable reference; never constant.
    Ident(String),
    Binary {
        op: BinaryOp,
        left: ExprId,
        right: ExprId,
    },
    Unary {
        op: UnaryOp,
        operand: ExprId,
    },
    Call {
        callee: String,
        args: CallArgs,
    },
}

/// An expression node with its source span.
///
/// A parenthesized expression carries the span of its parentheses; there
/// is no separate grouping node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

impl Expr {
    #[inline]
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Expr { kind, span }
    }
}

/// Storage for the expressions of one parsed region.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExprArena {
    exprs: Vec<Expr>,
}

impl ExprArena {
    pub fn new() -> Self {
        ExprArena { exprs: Vec::new() }
    }

    /// Allocate an expression and return its id.
    pub fn alloc(&mut self, expr: Expr) -> ExprId {
        let index = u32::try_from(self.exprs.len()).unwrap_or(u32::MAX);
        self.exprs.push(expr);
        ExprId::new(index)
    }

    #[inline]
    pub fn get(&self, id: ExprId) -> &Expr {
        &self.exprs[id.index()]
    }

    #[inline]
    pub fn kind(&self, id: ExprId) -> &ExprKind {
        &self.get(id).kind
    }

    #[inline]
    pub fn span(&self, id: ExprId) -> Span {
        self.get(id).span
    }

    /// Widen a node's span, used when the parser closes a parenthesized group.
    pub fn set_span(&mut self, id: ExprId, span: Span) {
        self.exprs[id.index()].span = span;
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.exprs.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.exprs.is_empty()
    }

    /// All ids in allocation order (children before parents).
    pub fn ids(&self) -> impl Iterator<Item = ExprId> + '_ {
        (0..self.exprs.len()).map(|i| ExprId::new(u32::try_from(i).unwrap_or(u32::MAX)))
    }

    /// Direct children of a node, left to right.
    pub fn children(&self, id: ExprId) -> CallArgs {
        match self.kind(id) {
            ExprKind::Int(_) | ExprKind::Ident(_) => CallArgs::new(),
            ExprKind::Binary { left, right, .. } => smallvec::smallvec![*left, *right],
            ExprKind::Unary { operand, .. } => smallvec::smallvec![*operand],
            ExprKind::Call { args, .. } => args.clone(),
        }
    }
}
