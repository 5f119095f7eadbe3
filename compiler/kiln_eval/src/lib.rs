//! Kiln Eval - constant expression evaluation.
//!
//! Decides whether an arithmetic expression is a compile-time constant and,
//! if so, what its value is. An expression is constant when every leaf is an
//! integer literal and every call names a function in the
//! [`PureFunctionRegistry`] with constant arguments.
//!
//! # Numeric semantics
//!
//! - Values are `i64`; overflow makes the expression non-constant.
//! - `/` is floor division: `-7 / 2 == -4`.
//! - Division by zero is non-constant.
//!
//! Failures are returned as [`EvalError`] so callers can log the reason,
//! but none of them are fatal.

mod constness;
mod errors;
mod evaluator;
mod operators;
mod registry;

pub use constness::{is_literal_form, maximal_constants};
pub use errors::{Arity, EvalError};
pub use evaluator::{evaluate, try_evaluate, ConstTable, Evaluator};
pub use operators::{checked_floor_div, evaluate_binary, evaluate_unary};
pub use registry::{PureFn, PureFunction, PureFunctionRegistry};
