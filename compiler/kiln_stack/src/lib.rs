//! Stack safety and nesting limits for recursive expression handling.
//!
//! The parser descends once per parenthesis, unary minus and call argument
//! list. Two guards keep that recursion safe:
//!
//! - [`ensure_sufficient_stack`] grows the native stack on demand through
//!   `stacker`, so deeply nested input cannot overflow it.
//! - [`NestingDepth`] caps how deep an expression may nest at all. Input past
//!   [`MAX_NESTING_DEPTH`] is rejected instead of being evaluated.
//!
//! # Configuration
//!
//! - **Red zone**: 64KB - if less than this remains, the stack is grown
//! - **Growth size**: 1MB per growth

/// Minimum stack space to keep available.
const RED_ZONE: usize = 64 * 1024;

/// Stack space to allocate when growing.
const STACK_PER_RECURSION: usize = 1024 * 1024;

/// Deepest expression nesting accepted by the parser.
pub const MAX_NESTING_DEPTH: u32 = 256;

/// Ensure sufficient stack space is available before executing `f`.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}

/// WASM version - just call directly (WASM has its own stack management).
#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}

/// Error returned when an expression nests past its limit.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DepthExceeded {
    pub limit: u32,
}

/// Nesting counter for one recursive descent.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct NestingDepth {
    current: u32,
    limit: u32,
}

impl NestingDepth {
    pub const fn new() -> Self {
        Self::with_limit(MAX_NESTING_DEPTH)
    }

    pub const fn with_limit(limit: u32) -> Self {
        NestingDepth { current: 0, limit }
    }

    pub const fn current(&self) -> u32 {
        self.current
    }

    /// Enter one nesting level.
    pub fn descend(&mut self) -> Result<(), DepthExceeded> {
        if self.current >= self.limit {
            return Err(DepthExceeded { limit: self.limit });
        }
        self.current += 1;
        Ok(())
    }

    /// Leave one nesting level.
    pub fn ascend(&mut self) {
        self.current = self.current.saturating_sub(1);
    }
}

impl Default for NestingDepth {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests;
