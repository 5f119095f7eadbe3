//! Loop-invariant assignment hoisting.
//!
//! A line-driven state machine tracks whether the current line is inside
//! `main` and inside a `while` loop:
//!
//! ```text
//! OutsideMain --fun main()--> InMain --while..do--> InMainInWhile
//!      ^                        |  ^                   |
//!      +--------endfun----------+  +----endwhile-------+
//! ```
//!
//! Inside a loop, an assignment whose right-hand side is constant is removed
//! from the loop body and remembered. When `main` closes, every remembered
//! assignment is inserted once, after the last `var int` declaration of the
//! body (or at the top of the body if there is none).
//!
//! The state is flat: any `endwhile` returns to `InMain`, so the outer body
//! following a nested loop is no longer treated as loop body.
//!
//! A variable is hoisted at most once per function body; later constant
//! assignments to the same name stay in the loop.

use kiln_eval::Evaluator;
use kiln_lexer::{LineFlags, LineKind};
use kiln_parse::split_assignment;
use rustc_hash::FxHashSet;
use tracing::{debug, trace, warn};

use crate::line::{OutputBuffer, SourceLine};

/// An assignment lifted out of a loop.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HoistedAssignment {
    pub name: String,
    pub value: i64,
    pub indent: String,
    pub terminator: String,
}

impl HoistedAssignment {
    /// `{indent}{name} = {value};` followed by the original terminator.
    pub fn render(&self) -> String {
        format!(
            "{}{} = {};{}",
            self.indent, self.name, self.value, self.terminator
        )
    }
}

/// Position of the current line relative to `main` and its loops.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum LoopState {
    OutsideMain,
    InMain,
    InMainInWhile,
}

/// Per-file hoisting state.
#[derive(Clone, Debug)]
pub struct LoopContext {
    state: LoopState,
    /// Output index of the first line of the `main` body.
    body_start: usize,
    hoisted: Vec<HoistedAssignment>,
    hoisted_names: FxHashSet<String>,
}

impl LoopContext {
    pub fn new() -> Self {
        LoopContext {
            state: LoopState::OutsideMain,
            body_start: 0,
            hoisted: Vec::new(),
            hoisted_names: FxHashSet::default(),
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn inside_main(&self) -> bool {
        !matches!(self.state, LoopState::OutsideMain)
    }

    pub fn inside_while(&self) -> bool {
        matches!(self.state, LoopState::InMainInWhile)
    }

    /// Assignments waiting to be inserted, in the order they were found.
    pub fn pending(&self) -> &[HoistedAssignment] {
        &self.hoisted
    }

    pub fn is_hoisted(&self, name: &str) -> bool {
        self.hoisted_names.contains(name)
    }

    fn enter_main(&mut self, body_start: usize) {
        self.state = LoopState::InMain;
        self.body_start = body_start;
    }

    fn enter_loop(&mut self) {
        self.state = match self.state {
            LoopState::OutsideMain => LoopState::OutsideMain,
            LoopState::InMain | LoopState::InMainInWhile => LoopState::InMainInWhile,
        };
    }

    fn exit_loop(&mut self) {
        self.state = match self.state {
            LoopState::InMainInWhile => LoopState::InMain,
            other => other,
        };
    }

    /// Remember an assignment. Returns `false` if its name was already hoisted.
    fn record(&mut self, assignment: HoistedAssignment) -> bool {
        if !self.hoisted_names.insert(assignment.name.clone()) {
            return false;
        }
        self.hoisted.push(assignment);
        true
    }

    /// Insert pending assignments into `output` and leave `main`.
    ///
    /// Returns the number of lines inserted.
    fn flush(&mut self, output: &mut OutputBuffer) -> usize {
        let pending = std::mem::take(&mut self.hoisted);
        self.hoisted_names.clear();
        self.state = LoopState::OutsideMain;

        if pending.is_empty() {
            return 0;
        }

        let at = output
            .last_declaration_since(self.body_start)
            .map_or(self.body_start, |i| i + 1);
        debug!(count = pending.len(), at, "inserting hoisted assignments");
        output.insert_lines(at, pending.iter().map(HoistedAssignment::render));
        pending.len()
    }
}

impl Default for LoopContext {
    fn default() -> Self {
        Self::new()
    }
}

/// What the driver should do with a line after the hoisting pass saw it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Disposition {
    /// Structural line: emit unchanged.
    Verbatim,
    /// Emit after folding.
    Retain,
    /// Hoisted: do not emit here.
    Suppress,
}

/// Drives a [`LoopContext`] over the lines of one file.
#[derive(Clone, Debug)]
pub struct HoistingPass<'r> {
    ctx: LoopContext,
    evaluator: Evaluator<'r>,
    enabled: bool,
    hoisted: usize,
}

impl<'r> HoistingPass<'r> {
    /// With `enabled == false` structure is still tracked but nothing is
    /// hoisted.
    pub fn new(evaluator: Evaluator<'r>, enabled: bool) -> Self {
        HoistingPass {
            ctx: LoopContext::new(),
            evaluator,
            enabled,
            hoisted: 0,
        }
    }

    pub fn context(&self) -> &LoopContext {
        &self.ctx
    }

    /// Total assignments inserted so far.
    pub fn hoisted(&self) -> usize {
        self.hoisted
    }

    /// Advance the state machine by one line.
    ///
    /// `output` holds every line emitted so far; closing `main` splices the
    /// pending assignments into it.
    pub fn process(&mut self, line: &SourceLine<'_>, output: &mut OutputBuffer) -> Disposition {
        match line.kind() {
            LineKind::MainHeader => {
                if self.ctx.inside_main() {
                    warn!("`main` reopened before `endfun`");
                    self.hoisted += self.ctx.flush(output);
                }
                // The header itself lands at `output.len()`.
                self.ctx.enter_main(output.len() + 1);
                Disposition::Verbatim
            }
            LineKind::FunctionEnd => {
                if self.ctx.inside_main() {
                    self.hoisted += self.ctx.flush(output);
                }
                Disposition::Verbatim
            }
            LineKind::LoopHeader => {
                self.ctx.enter_loop();
                Disposition::Verbatim
            }
            LineKind::LoopEnd => {
                self.ctx.exit_loop();
                Disposition::Verbatim
            }
            LineKind::FunctionHeader => Disposition::Verbatim,
            LineKind::Statement => {
                if self.enabled && self.ctx.inside_while() && self.try_hoist(line) {
                    Disposition::Suppress
                } else {
                    Disposition::Retain
                }
            }
        }
    }

    fn try_hoist(&mut self, line: &SourceLine<'_>) -> bool {
        if line.flags.contains(LineFlags::HAS_ERROR) {
            trace!(line = line.text, "unrecognized input, keeping line in loop");
            return false;
        }
        let Some(assignment) = split_assignment(line.tokens.as_slice()) else {
            return false;
        };
        let name = assignment.target_name(line.text);

        if self.ctx.is_hoisted(name) {
            trace!(name, "already hoisted, keeping assignment in loop");
            return false;
        }

        match self.evaluator.evaluate_tokens(line.text, assignment.value) {
            Ok(value) => {
                trace!(name, value, "hoisting loop-invariant assignment");
                self.ctx.record(HoistedAssignment {
                    name: name.to_string(),
                    value,
                    indent: line.indent().to_string(),
                    terminator: if line.terminator.is_empty() {
                        "\n".to_string()
                    } else {
                        line.terminator.to_string()
                    },
                })
            }
            Err(reason) => {
                trace!(name, %reason, "assignment is not loop invariant");
                false
            }
        }
    }

    /// Flush assignments still pending at end of input.
    pub fn finish(&mut self, output: &mut OutputBuffer) -> usize {
        if !self.ctx.pending().is_empty() {
            warn!(
                count = self.ctx.pending().len(),
                "input ended inside `main`, inserting hoisted assignments"
            );
        }
        let inserted = self.ctx.flush(output);
        self.hoisted += inserted;
        inserted
    }
}
