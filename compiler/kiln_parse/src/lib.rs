//! Kiln Parse - expression and statement parsing for one source line.
//!
//! The optimizer does not build a syntax tree for whole programs. It needs
//! three narrow views of a line:
//!
//! - [`parse_expression`]: a token run as an arithmetic expression
//! - [`split_assignment`]: `name = expr;` split into target and value
//! - [`expression_regions`]: the right-hand sides that follow assignment and
//!   comparison operators, which the folding pass rewrites

mod error;
mod parser;
mod regions;
mod statement;

pub use error::ParseError;
pub use parser::{parse_expression, ParsedExpr};
pub use regions::{expression_regions, Region};
pub use statement::{split_assignment, Assignment};
