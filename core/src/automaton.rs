//! Compiled path automaton, consumed read-only by checks.
//!
//! Compiling a path expression is done elsewhere; this module only holds the
//! result (start state, accepting set, ordered transitions per state) and a
//! validating builder. One automaton may be shared by many concurrent checks.

use crate::error::{PathError, Result};
use crate::graph::{Direction, LabelId};

/// Automaton state index.
pub type StateId = u32;

/// Label predicate on a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LabelMatch {
    Label(LabelId),
    /// Matches any label
    Any,
}

impl LabelMatch {
    /// Fixed label for the scan prefix, `None` for a wildcard.
    pub fn as_prefix(&self) -> Option<LabelId> {
        match self {
            LabelMatch::Label(l) => Some(*l),
            LabelMatch::Any => None,
        }
    }
}

/// One outgoing transition of a state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub target: StateId,
    pub label: LabelMatch,
    pub direction: Direction,
}

/// A single edge step, used by the convenience constructors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    pub label: LabelMatch,
    pub direction: Direction,
}

impl Step {
    pub fn forward(label: LabelId) -> Self {
        Self {
            label: LabelMatch::Label(label),
            direction: Direction::Outgoing,
        }
    }

    pub fn backward(label: LabelId) -> Self {
        Self {
            label: LabelMatch::Label(label),
            direction: Direction::Incoming,
        }
    }

    pub fn any(direction: Direction) -> Self {
        Self {
            label: LabelMatch::Any,
            direction,
        }
    }
}

/// Immutable compiled path expression.
#[derive(Debug, Clone)]
pub struct PathAutomaton {
    start: StateId,
    accepting: Vec<bool>,
    transitions: Vec<Vec<Transition>>,
    /// Path expression text, shown by explain
    source: Option<String>,
}

impl PathAutomaton {
    pub fn start_state(&self) -> StateId {
        self.start
    }

    pub fn is_accepting(&self, state: StateId) -> bool {
        self.accepting.get(state as usize).copied().unwrap_or(false)
    }

    /// Transitions leaving `state`, in declared order.
    pub fn transitions(&self, state: StateId) -> &[Transition] {
        self.transitions
            .get(state as usize)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    pub fn state_count(&self) -> usize {
        self.accepting.len()
    }

    /// Whether the empty label sequence is accepted.
    pub fn accepts_empty(&self) -> bool {
        self.is_accepting(self.start)
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    /// Attach the expression text shown by explain.
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// `step+`: one or more repetitions.
    pub fn one_or_more(step: Step) -> Self {
        let t = |target| Transition {
            target,
            label: step.label,
            direction: step.direction,
        };
        Self {
            start: 0,
            accepting: vec![false, true],
            transitions: vec![vec![t(1)], vec![t(1)]],
            source: None,
        }
    }

    /// `step*`: zero or more repetitions.
    pub fn zero_or_more(step: Step) -> Self {
        Self {
            start: 0,
            accepting: vec![true],
            transitions: vec![vec![Transition {
                target: 0,
                label: step.label,
                direction: step.direction,
            }]],
            source: None,
        }
    }

    /// `s1|s2|...`: exactly one step drawn from `steps`.
    pub fn alternation(steps: &[Step]) -> Self {
        let first = steps
            .iter()
            .map(|s| Transition {
                target: 1,
                label: s.label,
                direction: s.direction,
            })
            .collect();
        Self {
            start: 0,
            accepting: vec![false, true],
            transitions: vec![first, Vec::new()],
            source: None,
        }
    }

    /// `s1/s2/...`: the steps in order. An empty sequence accepts only the empty path.
    pub fn sequence(steps: &[Step]) -> Self {
        let n = steps.len();
        let mut transitions: Vec<Vec<Transition>> = steps
            .iter()
            .enumerate()
            .map(|(i, s)| {
                vec![Transition {
                    target: (i + 1) as StateId,
                    label: s.label,
                    direction: s.direction,
                }]
            })
            .collect();
        transitions.push(Vec::new());
        let mut accepting = vec![false; n + 1];
        accepting[n] = true;
        Self {
            start: 0,
            accepting,
            transitions,
            source: None,
        }
    }
}

/// Incremental constructor for arbitrary automata.
#[derive(Debug, Default)]
pub struct AutomatonBuilder {
    start: StateId,
    accepting: Vec<bool>,
    transitions: Vec<Vec<Transition>>,
    source: Option<String>,
}

impl AutomatonBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a non-accepting state with no transitions.
    pub fn add_state(&mut self) -> StateId {
        self.accepting.push(false);
        self.transitions.push(Vec::new());
        (self.accepting.len() - 1) as StateId
    }

    pub fn set_start(&mut self, state: StateId) -> &mut Self {
        self.start = state;
        self
    }

    pub fn set_accepting(&mut self, state: StateId) -> &mut Self {
        if let Some(flag) = self.accepting.get_mut(state as usize) {
            *flag = true;
        }
        self
    }

    /// Append a transition; order of calls is the exploration order.
    pub fn add_transition(
        &mut self,
        from: StateId,
        to: StateId,
        label: LabelMatch,
        direction: Direction,
    ) -> &mut Self {
        if let Some(list) = self.transitions.get_mut(from as usize) {
            list.push(Transition {
                target: to,
                label,
                direction,
            });
        }
        self
    }

    pub fn set_source(&mut self, source: impl Into<String>) -> &mut Self {
        self.source = Some(source.into());
        self
    }

    /// Validate and freeze.
    pub fn build(self) -> Result<PathAutomaton> {
        let n = self.accepting.len();
        if n == 0 {
            return Err(PathError::InvalidAutomaton("automaton has no states".into()));
        }
        if self.start as usize >= n {
            return Err(PathError::InvalidAutomaton(format!(
                "start state {} out of range (states: {})",
                self.start, n
            )));
        }
        for (from, list) in self.transitions.iter().enumerate() {
            if let Some(t) = list.iter().find(|t| t.target as usize >= n) {
                return Err(PathError::InvalidAutomaton(format!(
                    "transition {} -> {} targets a missing state (states: {})",
                    from, t.target, n
                )));
            }
        }
        Ok(PathAutomaton {
            start: self.start,
            accepting: self.accepting,
            transitions: self.transitions,
            source: self.source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_or_more_shape() {
        let a = PathAutomaton::one_or_more(Step::forward(3));
        assert_eq!(a.state_count(), 2);
        assert!(!a.accepts_empty());
        assert!(a.is_accepting(1));
        assert_eq!(a.transitions(0).len(), 1);
        assert_eq!(a.transitions(1)[0].target, 1);
        assert_eq!(a.transitions(1)[0].label, LabelMatch::Label(3));
    }

    #[test]
    fn test_zero_or_more_accepts_empty() {
        let a = PathAutomaton::zero_or_more(Step::any(Direction::Outgoing));
        assert!(a.accepts_empty());
        assert_eq!(a.transitions(0)[0].label.as_prefix(), None);
    }

    #[test]
    fn test_alternation_keeps_declared_order() {
        let a = PathAutomaton::alternation(&[Step::forward(2), Step::backward(1)]);
        let ts = a.transitions(a.start_state());
        assert_eq!(ts[0].label, LabelMatch::Label(2));
        assert_eq!(ts[1].direction, Direction::Incoming);
        assert!(a.transitions(1).is_empty());
    }

    #[test]
    fn test_sequence() {
        let a = PathAutomaton::sequence(&[Step::forward(0), Step::backward(1)]);
        assert_eq!(a.state_count(), 3);
        assert!(a.is_accepting(2));
        assert!(!a.is_accepting(1));

        let empty = PathAutomaton::sequence(&[]);
        assert!(empty.accepts_empty());
    }

    #[test]
    fn test_out_of_range_queries() {
        let a = PathAutomaton::zero_or_more(Step::forward(0));
        assert!(!a.is_accepting(9));
        assert!(a.transitions(9).is_empty());
    }

    #[test]
    fn test_builder_roundtrip() {
        let mut b = AutomatonBuilder::new();
        let s0 = b.add_state();
        let s1 = b.add_state();
        b.set_start(s0)
            .set_accepting(s1)
            .add_transition(s0, s1, LabelMatch::Any, Direction::Incoming)
            .set_source("^*");
        let a = b.build().unwrap();
        assert_eq!(a.start_state(), s0);
        assert!(a.is_accepting(s1));
        assert_eq!(a.source(), Some("^*"));
    }

    #[test]
    fn test_builder_rejects_empty() {
        assert!(matches!(
            AutomatonBuilder::new().build(),
            Err(PathError::InvalidAutomaton(_))
        ));
    }

    #[test]
    fn test_builder_rejects_bad_start() {
        let mut b = AutomatonBuilder::new();
        b.add_state();
        b.set_start(5);
        assert!(matches!(b.build(), Err(PathError::InvalidAutomaton(_))));
    }

    #[test]
    fn test_builder_rejects_dangling_target() {
        let mut b = AutomatonBuilder::new();
        let s0 = b.add_state();
        b.add_transition(s0, 7, LabelMatch::Label(0), Direction::Outgoing);
        let err = b.build().unwrap_err();
        assert!(err.to_string().contains("missing state"));
    }
}
