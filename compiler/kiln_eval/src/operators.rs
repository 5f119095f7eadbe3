//! Integer operator implementations.
//!
//! Every operation is checked: overflow and division by zero are reported
//! as errors, which callers treat as "not constant".

use kiln_ir::{BinaryOp, UnaryOp};

use crate::errors::{division_by_zero, integer_overflow, EvalError};

#[inline]
fn checked_arith(result: Option<i64>, op_name: &'static str) -> Result<i64, EvalError> {
    result.ok_or_else(|| integer_overflow(op_name))
}

/// Division rounding toward negative infinity.
///
/// Returns `None` for a zero divisor or `i64::MIN / -1`.
pub fn checked_floor_div(a: i64, b: i64) -> Option<i64> {
    let quotient = a.checked_div(b)?;
    let remainder = a.checked_rem(b)?;
    if remainder != 0 && ((remainder < 0) != (b < 0)) {
        quotient.checked_sub(1)
    } else {
        Some(quotient)
    }
}

/// Apply a binary operator to two constants.
pub fn evaluate_binary(op: BinaryOp, a: i64, b: i64) -> Result<i64, EvalError> {
    match op {
        BinaryOp::Add => checked_arith(a.checked_add(b), "addition"),
        BinaryOp::Sub => checked_arith(a.checked_sub(b), "subtraction"),
        BinaryOp::Mul => checked_arith(a.checked_mul(b), "multiplication"),
        BinaryOp::Div => {
            if b == 0 {
                Err(division_by_zero())
            } else {
                checked_arith(checked_floor_div(a, b), "division")
            }
        }
    }
}

/// Apply a unary operator to a constant.
pub fn evaluate_unary(op: UnaryOp, value: i64) -> Result<i64, EvalError> {
    match op {
        UnaryOp::Neg => checked_arith(value.checked_neg(), "negation"),
    }
}
