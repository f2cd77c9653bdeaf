//! Search bookkeeping for one reachability cycle.
//!
//! States are `(automaton state, node)` pairs. Each is stored once, and only
//! newly discovered states join the breadth-first frontier.

use std::collections::VecDeque;

use rustc_hash::FxHashMap;

use crate::automaton::StateId;
use crate::graph::NodeId;

/// "The path so far ends at `node` with the automaton in `state`."
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SearchState {
    pub state: StateId,
    pub node: NodeId,
}

impl SearchState {
    pub fn new(state: StateId, node: NodeId) -> Self {
        Self { state, node }
    }
}

/// Arena + dedup set + FIFO frontier for one search cycle.
///
/// `arena` owns every state discovered this cycle; `visited` maps a state to
/// its arena slot; `frontier` holds arena slots awaiting expansion. A state
/// enters the arena at most once and is enqueued only on that insertion, so
/// the arena never grows past |states| x |nodes reached|.
#[derive(Debug, Default)]
pub struct SearchSpace {
    arena: Vec<SearchState>,
    visited: FxHashMap<SearchState, usize>,
    frontier: VecDeque<usize>,
}

impl SearchSpace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop everything from the previous cycle and seed with `seed`.
    /// Allocations are kept for the next cycle.
    pub fn reset(&mut self, seed: SearchState) {
        self.clear();
        self.insert(seed);
    }

    pub fn clear(&mut self) {
        self.arena.clear();
        self.visited.clear();
        self.frontier.clear();
    }

    /// Insert `candidate` if unseen and enqueue it. Returns `false` for a duplicate.
    pub fn insert(&mut self, candidate: SearchState) -> bool {
        if self.visited.contains_key(&candidate) {
            return false;
        }
        let slot = self.arena.len();
        self.arena.push(candidate);
        self.visited.insert(candidate, slot);
        self.frontier.push_back(slot);
        true
    }

    /// Next state to expand, breadth-first.
    pub fn pop(&mut self) -> Option<SearchState> {
        self.frontier.pop_front().map(|slot| self.arena[slot])
    }

    /// Stop exploring: the frontier empties, the dedup set is kept.
    pub fn abandon_frontier(&mut self) {
        self.frontier.clear();
    }

    #[cfg(test)]
    pub fn contains(&self, state: &SearchState) -> bool {
        self.visited.contains_key(state)
    }

    /// The state this cycle was seeded with.
    #[cfg(test)]
    pub fn seed(&self) -> Option<SearchState> {
        self.arena.first().copied()
    }

    pub fn visited_count(&self) -> usize {
        self.arena.len()
    }

    #[cfg(test)]
    pub fn frontier_len(&self) -> usize {
        self.frontier.len()
    }

    #[cfg(test)]
    pub fn is_exhausted(&self) -> bool {
        self.frontier.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reset_seeds_single_entry() {
        let mut space = SearchSpace::new();
        space.insert(SearchState::new(3, 3));
        space.reset(SearchState::new(0, 10));
        assert_eq!(space.visited_count(), 1);
        assert_eq!(space.frontier_len(), 1);
        assert_eq!(space.seed(), Some(SearchState::new(0, 10)));
        assert!(!space.contains(&SearchState::new(3, 3)));
    }

    #[test]
    fn test_duplicate_not_enqueued() {
        let mut space = SearchSpace::new();
        space.reset(SearchState::new(0, 1));
        assert!(space.insert(SearchState::new(1, 2)));
        assert!(!space.insert(SearchState::new(1, 2)));
        assert!(!space.insert(SearchState::new(0, 1)));
        assert_eq!(space.visited_count(), 2);
        assert_eq!(space.frontier_len(), 2);
    }

    #[test]
    fn test_same_node_different_state_is_distinct() {
        let mut space = SearchSpace::new();
        space.reset(SearchState::new(0, 1));
        assert!(space.insert(SearchState::new(1, 1)));
        assert_eq!(space.visited_count(), 2);
    }

    #[test]
    fn test_pop_is_fifo() {
        let mut space = SearchSpace::new();
        space.reset(SearchState::new(0, 1));
        space.insert(SearchState::new(0, 2));
        space.insert(SearchState::new(0, 3));
        assert_eq!(space.pop().unwrap().node, 1);
        assert_eq!(space.pop().unwrap().node, 2);
        space.insert(SearchState::new(0, 4));
        assert_eq!(space.pop().unwrap().node, 3);
        assert_eq!(space.pop().unwrap().node, 4);
        assert!(space.pop().is_none());
        assert!(space.is_exhausted());
    }

    #[test]
    fn test_popped_states_still_deduplicated() {
        let mut space = SearchSpace::new();
        space.reset(SearchState::new(0, 1));
        let _ = space.pop();
        assert!(!space.insert(SearchState::new(0, 1)));
    }

    #[test]
    fn test_abandon_frontier_keeps_visited() {
        let mut space = SearchSpace::new();
        space.reset(SearchState::new(0, 1));
        space.insert(SearchState::new(0, 2));
        space.abandon_frontier();
        assert!(space.is_exhausted());
        assert_eq!(space.visited_count(), 2);
    }
}
