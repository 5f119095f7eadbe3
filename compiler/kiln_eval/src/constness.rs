//! Maximal constant sub-expressions.

use kiln_ir::{ExprArena, ExprId, ExprKind, UnaryOp};
use kiln_parse::ParsedExpr;

use crate::evaluator::ConstTable;

/// Nodes that are constant while their parent is not (or that are the root).
///
/// Literal forms (`5`, `-5`, and either in parentheses) are left out: they
/// are already as folded as they get. Results are in source order.
pub fn maximal_constants(parsed: &ParsedExpr, table: &ConstTable) -> Vec<ExprId> {
    let arena = &parsed.arena;
    let mut found = Vec::new();
    let mut stack = vec![parsed.root];

    while let Some(id) = stack.pop() {
        if table.is_const(id) {
            if !is_literal_form(arena, id) {
                found.push(id);
            }
            continue;
        }
        // Reverse so the leftmost child is popped first.
        stack.extend(arena.children(id).into_iter().rev());
    }

    found
}

/// An integer literal, optionally negated once.
pub fn is_literal_form(arena: &ExprArena, id: ExprId) -> bool {
    match arena.kind(id) {
        ExprKind::Int(_) => true,
        ExprKind::Unary {
            op: UnaryOp::Neg,
            operand,
        } => matches!(arena.kind(*operand), ExprKind::Int(_)),
        _ => false,
    }
}
