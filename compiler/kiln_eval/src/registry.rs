//! Registry of pure integer functions callable from constant expressions.
//!
//! A registry is built once, then shared read-only by every evaluation.
//! Functions must be deterministic and side-effect free, because the folding
//! pass runs them while rewriting the program.

use rustc_hash::FxHashMap;
use std::fmt;

use crate::errors::{integer_overflow, Arity, EvalError};

/// Signature of a pure function body. Arity is checked before the call.
pub type PureFn = fn(&[i64]) -> Result<i64, EvalError>;

/// A named pure function.
#[derive(Copy, Clone)]
pub struct PureFunction {
    pub name: &'static str,
    pub description: &'static str,
    pub arity: Arity,
    func: PureFn,
}

impl PureFunction {
    pub const fn new(
        name: &'static str,
        description: &'static str,
        arity: Arity,
        func: PureFn,
    ) -> Self {
        PureFunction {
            name,
            description,
            arity,
            func,
        }
    }

    /// Invoke the function after validating the argument count.
    pub fn call(&self, args: &[i64]) -> Result<i64, EvalError> {
        if !self.arity.accepts(args.len()) {
            return Err(EvalError::ArityMismatch {
                name: self.name.to_string(),
                expected: self.arity,
                found: args.len(),
            });
        }
        (self.func)(args)
    }
}

impl fmt::Debug for PureFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PureFunction")
            .field("name", &self.name)
            .field("arity", &self.arity)
            .finish_non_exhaustive()
    }
}

/// Name-to-function table consulted by the evaluator.
#[derive(Clone, Debug)]
pub struct PureFunctionRegistry {
    functions: FxHashMap<&'static str, PureFunction>,
}

impl PureFunctionRegistry {
    /// Create a registry holding the builtins `fac` and `abs`.
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register_builtins();
        registry
    }

    /// Create a registry with no functions at all.
    pub fn empty() -> Self {
        PureFunctionRegistry {
            functions: FxHashMap::default(),
        }
    }

    fn register_builtins(&mut self) {
        self.register(PureFunction::new(
            "fac",
            "Factorial; 1 for any argument below 2",
            Arity::Exact(1),
            factorial,
        ));
        self.register(PureFunction::new(
            "abs",
            "Absolute value",
            Arity::Exact(1),
            absolute,
        ));
    }

    /// Add a function, returning the entry it replaced if the name was taken.
    pub fn register(&mut self, function: PureFunction) -> Option<PureFunction> {
        self.functions.insert(function.name, function)
    }

    pub fn lookup(&self, name: &str) -> Option<&PureFunction> {
        self.functions.get(name)
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.functions.keys().copied().collect();
        names.sort_unstable();
        names
    }
}

impl Default for PureFunctionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// Builtins

/// `fac(n)`: iterative product, so large inputs cannot exhaust the stack.
/// Overflows past `fac(20)`.
fn factorial(args: &[i64]) -> Result<i64, EvalError> {
    let &[n] = args else {
        return Err(arity_mismatch("fac", args));
    };
    (2..=n).try_fold(1i64, |acc, k| acc.checked_mul(k).ok_or_else(|| integer_overflow("fac")))
}

fn absolute(args: &[i64]) -> Result<i64, EvalError> {
    let &[n] = args else {
        return Err(arity_mismatch("abs", args));
    };
    n.checked_abs().ok_or_else(|| integer_overflow("abs"))
}

#[cold]
fn arity_mismatch(name: &str, args: &[i64]) -> EvalError {
    EvalError::ArityMismatch {
        name: name.to_string(),
        expected: Arity::Exact(1),
        found: args.len(),
    }
}
