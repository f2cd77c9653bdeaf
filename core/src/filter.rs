//! Nested-loop reachability filter.
//!
//! Drives a check once per outer binding row. Each row goes through
//! `initialize`, never `reset` alone: the row is passed by reference, so only
//! `initialize` sees its values.

use std::fmt;
use std::marker::PhantomData;

use tracing::debug;

use crate::binding::BindingRow;
use crate::context::ExecutionContext;
use crate::error::Result;
use crate::index::EdgeIndex;
use crate::operator::BindingIter;

/// Keeps outer rows whose endpoints are connected.
pub struct ReachabilityFilter<I: EdgeIndex + ?Sized, C: BindingIter<I>> {
    check: C,
    rows_in: u64,
    rows_out: u64,
    _index: PhantomData<fn(&I)>,
}

impl<I: EdgeIndex + ?Sized, C: BindingIter<I>> ReachabilityFilter<I, C> {
    pub fn new(check: C) -> Self {
        Self {
            check,
            rows_in: 0,
            rows_out: 0,
            _index: PhantomData,
        }
    }

    /// Whether `row` survives the filter.
    pub fn accepts(&mut self, ctx: &ExecutionContext<'_, I>, row: &BindingRow) -> Result<bool> {
        self.rows_in += 1;
        self.check.initialize(row)?;
        let keep = self.check.next(ctx)?;
        if keep {
            self.rows_out += 1;
        }
        Ok(keep)
    }

    /// Filter a batch of outer rows, preserving order. Errors abort the batch.
    pub fn filter_rows<R>(
        &mut self,
        ctx: &ExecutionContext<'_, I>,
        rows: R,
    ) -> Result<Vec<BindingRow>>
    where
        R: IntoIterator<Item = BindingRow>,
    {
        let mut kept = Vec::new();
        for mut row in rows {
            if self.accepts(ctx, &row)? {
                self.check.bind_new_variables(&mut row);
                kept.push(row);
            }
        }
        debug!(rows_in = self.rows_in, rows_out = self.rows_out, "reachability filter");
        Ok(kept)
    }

    pub fn rows_in(&self) -> u64 {
        self.rows_in
    }

    pub fn rows_out(&self) -> u64 {
        self.rows_out
    }

    pub fn inner(&self) -> &C {
        &self.check
    }

    pub fn explain(&self, out: &mut dyn fmt::Write, indent: usize) -> fmt::Result {
        writeln!(
            out,
            "{:indent$}ReachabilityFilter(rows_in: {}, rows_out: {})",
            "",
            self.rows_in,
            self.rows_out,
            indent = indent
        )?;
        self.check.explain(out, indent + 2)
    }
}
