//! Pull protocol shared by binding-producing operators.
//!
//! The parent drives a child through:
//! 1. `initialize(row)` - resolve inputs from the current outer binding
//! 2. `next(ctx)` - pull until it returns `Ok(false)`
//! 3. `reset()` - re-run the same cycle without re-reading the binding
//!
//! `initialize` may be called again at any point to pick up a new binding.

use std::fmt;

use crate::binding::BindingRow;
use crate::context::ExecutionContext;
use crate::error::Result;
use crate::index::EdgeIndex;

pub trait BindingIter<I: EdgeIndex + ?Sized> {
    /// Resolve inputs against `row` and start a fresh cycle.
    fn initialize(&mut self, row: &BindingRow) -> Result<()>;

    /// Produce the next result. `Ok(false)` means the cycle is exhausted
    /// and every later call in this cycle returns `Ok(false)` again.
    fn next(&mut self, ctx: &ExecutionContext<'_, I>) -> Result<bool>;

    /// Restart the current cycle with the endpoints already resolved.
    fn reset(&mut self) -> Result<()>;

    /// Write this operator's variables into `row` for the last result.
    fn bind_new_variables(&self, row: &mut BindingRow);

    /// Describe the operator and its runtime counters.
    fn explain(&self, out: &mut dyn fmt::Write, indent: usize) -> fmt::Result;
}

/// Lifecycle position of an operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatorState {
    /// Never initialized
    Created,
    /// Initialized; `next` will search
    Open,
    /// Terminal answer given for this cycle
    Exhausted,
    /// The cycle ended in an error; only `initialize` or `reset` recover
    Failed,
}

impl OperatorState {
    pub fn can_next(&self) -> bool {
        matches!(self, OperatorState::Open)
    }

    pub fn is_initialized(&self) -> bool {
        !matches!(self, OperatorState::Created)
    }
}
