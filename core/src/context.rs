//! Per-thread execution context.
//!
//! Each thread driving an operator tree builds its own context and passes it
//! into every call. Nothing here is global: two queries on two threads hold
//! two contexts over the same read-only index.

use crate::config::PathOptions;
use crate::index::EdgeIndex;

pub struct ExecutionContext<'a, I: EdgeIndex + ?Sized> {
    /// Shared, read-only edge index
    pub index: &'a I,
    /// Options for checks driven under this context
    pub options: &'a PathOptions,
}

impl<'a, I: EdgeIndex + ?Sized> ExecutionContext<'a, I> {
    pub fn new(index: &'a I, options: &'a PathOptions) -> Self {
        Self { index, options }
    }
}

impl<I: EdgeIndex + ?Sized> Clone for ExecutionContext<'_, I> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<I: EdgeIndex + ?Sized> Copy for ExecutionContext<'_, I> {}
