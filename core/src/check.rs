//! Reachability check for a path pattern with both endpoints known.
//!
//! Product BFS over (automaton state, node): pop a search state, and for each
//! transition of its automaton state open one range scan in the partition for
//! the transition's direction. Every matched edge yields a candidate
//! `(transition.target, neighbor)`. The cycle ends with `true` on the first
//! candidate that is accepting and sits on the end node, or `false` once the
//! frontier drains.
//!
//! Only existence is observable: which path is found first depends on
//! transition order and index key order, and is never reported.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, trace, warn};

use crate::automaton::PathAutomaton;
use crate::binding::{BindingRow, Identifier};
use crate::context::ExecutionContext;
use crate::error::{PathError, Result};
use crate::graph::NodeId;
use crate::index::{EdgeIndex, IndexPartition, ScanPrefix};
use crate::operator::{BindingIter, OperatorState};
use crate::search::{SearchSpace, SearchState};

/// Range scans issued and successes reported.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CheckStats {
    pub scans: u64,
    pub found: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Endpoints {
    start: NodeId,
    end: NodeId,
}

/// Existence-check operator for `(start) =[automaton]=> (end)`.
pub struct PathCheck {
    automaton: Arc<PathAutomaton>,
    start: Identifier,
    end: Identifier,
    /// Resolved in `initialize`
    endpoints: Option<Endpoints>,
    state: OperatorState,
    space: SearchSpace,
    /// Counters for the current cycle
    cycle: CheckStats,
    /// Counters across all cycles, for explain
    total: CheckStats,
}

impl PathCheck {
    pub fn new(automaton: Arc<PathAutomaton>, start: Identifier, end: Identifier) -> Self {
        Self {
            automaton,
            start,
            end,
            endpoints: None,
            state: OperatorState::Created,
            space: SearchSpace::new(),
            cycle: CheckStats::default(),
            total: CheckStats::default(),
        }
    }

    pub fn state(&self) -> OperatorState {
        self.state
    }

    pub fn cycle_stats(&self) -> CheckStats {
        self.cycle
    }

    pub fn total_stats(&self) -> CheckStats {
        self.total
    }

    /// Search states discovered in the current cycle.
    pub fn visited_count(&self) -> usize {
        self.space.visited_count()
    }

    /// Resolved `(start, end)` nodes, once initialized.
    pub fn endpoints(&self) -> Option<(NodeId, NodeId)> {
        self.endpoints.map(|e| (e.start, e.end))
    }

    fn seed(&mut self, ends: Endpoints) {
        self.space
            .reset(SearchState::new(self.automaton.start_state(), ends.start));
        self.cycle = CheckStats::default();
        self.state = OperatorState::Open;
    }

    fn record_scan(&mut self) {
        self.cycle.scans += 1;
        self.total.scans += 1;
    }

    /// Run the search to a terminal answer.
    fn search<I: EdgeIndex + ?Sized>(
        &mut self,
        ctx: &ExecutionContext<'_, I>,
        ends: Endpoints,
    ) -> Result<bool> {
        if ctx.options.check_start_node && !ctx.index.contains_node(ends.start)? {
            debug!(node = ends.start, "start node not in graph");
            self.space.abandon_frontier();
            return Ok(false);
        }

        // Zero-length path
        if self.automaton.accepts_empty() && ends.start == ends.end {
            self.space.abandon_frontier();
            return Ok(true);
        }

        let automaton = Arc::clone(&self.automaton);

        while let Some(current) = self.space.pop() {
            trace!(state = current.state, node = current.node, "expand");

            for transition in automaton.transitions(current.state) {
                let partition = IndexPartition::for_direction(transition.direction);
                let prefix = ScanPrefix::new(transition.label.as_prefix(), current.node);
                let scan = ctx.index.range_scan(partition, prefix)?;
                self.record_scan();

                let accepting = automaton.is_accepting(transition.target);

                for edge in scan {
                    let neighbor = edge?.opposite(transition.direction);

                    if accepting && neighbor == ends.end {
                        self.space.abandon_frontier();
                        return Ok(true);
                    }

                    let candidate = SearchState::new(transition.target, neighbor);
                    if self.space.insert(candidate) {
                        if let Some(limit) = ctx.options.max_visited {
                            if self.space.visited_count() > limit {
                                warn!(limit, "path check exceeded max visited states");
                                self.space.abandon_frontier();
                                return Err(PathError::ResourceLimit(format!(
                                    "path check exceeded max visited states ({})",
                                    limit
                                )));
                            }
                        }
                    }
                }
            }
        }

        Ok(false)
    }

    fn pattern_text(&self) -> String {
        match self.automaton.source() {
            Some(src) => src.to_string(),
            None => format!("automaton/{}", self.automaton.state_count()),
        }
    }
}

impl<I: EdgeIndex + ?Sized> BindingIter<I> for PathCheck {
    fn initialize(&mut self, row: &BindingRow) -> Result<()> {
        self.state = OperatorState::Created;
        self.endpoints = None;
        let ends = Endpoints {
            start: self.start.resolve(row)?,
            end: self.end.resolve(row)?,
        };
        self.endpoints = Some(ends);
        self.seed(ends);
        Ok(())
    }

    fn next(&mut self, ctx: &ExecutionContext<'_, I>) -> Result<bool> {
        if !self.state.can_next() {
            return match self.state {
                OperatorState::Exhausted => Ok(false),
                OperatorState::Failed => Err(PathError::CycleFailed),
                _ => Err(PathError::NotInitialized),
            };
        }
        let ends = self.endpoints.ok_or(PathError::NotInitialized)?;

        let span = tracing::debug_span!(
            "path_check",
            start = ends.start,
            end = ends.end,
            states = self.automaton.state_count(),
            scans = tracing::field::Empty,
            visited = tracing::field::Empty,
        );
        let _guard = span.enter();

        let outcome = self.search(ctx, ends);
        span.record("scans", self.cycle.scans);
        span.record("visited", self.space.visited_count() as u64);

        let found = match outcome {
            Ok(found) => found,
            Err(e) => {
                // Frontier is partly drained
                self.state = OperatorState::Failed;
                debug!(error = %e, "path check failed");
                return Err(e);
            }
        };
        self.state = OperatorState::Exhausted;

        if found {
            self.cycle.found += 1;
            self.total.found += 1;
            debug!("path found");
        } else {
            debug!("no path");
        }
        Ok(found)
    }

    fn reset(&mut self) -> Result<()> {
        if !self.state.is_initialized() {
            return Err(PathError::NotInitialized);
        }
        let ends = self.endpoints.ok_or(PathError::NotInitialized)?;
        self.seed(ends);
        Ok(())
    }

    fn bind_new_variables(&self, _row: &mut BindingRow) {}

    fn explain(&self, out: &mut dyn fmt::Write, indent: usize) -> fmt::Result {
        writeln!(
            out,
            "{:indent$}PathCheck({} =[{}]=> {}, mode: check, scans: {}, found: {})",
            "",
            self.start,
            self.pattern_text(),
            self.end,
            self.total.scans,
            self.total.found,
            indent = indent
        )
    }
}
