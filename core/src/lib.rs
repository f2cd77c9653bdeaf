//! path-accel-core: Index-backed reachability checks for regular path queries.
//!
//! Given a compiled path automaton and two known endpoints, decides whether a
//! path exists whose label sequence the automaton accepts. The search walks
//! the product of automaton states and graph nodes breadth-first, pulling
//! candidate edges from two ordered edge partitions through prefix range
//! scans instead of scanning the edge relation.
//!
//! The operator plugs into a pull protocol ([`BindingIter`]) and can be
//! re-driven per outer binding. No storage-engine dependencies:
//! [`EdgeStore`] is an in-memory [`EdgeIndex`] usable for testing and
//! benchmarking, and any paged index can implement the same trait.

mod automaton;
mod binding;
mod check;
mod config;
mod context;
mod error;
mod filter;
mod graph;
mod index;
mod operator;
mod search;

pub use automaton::{AutomatonBuilder, LabelMatch, PathAutomaton, StateId, Step, Transition};
pub use binding::{BindingRow, Identifier, VarId};
pub use check::{CheckStats, PathCheck};
pub use config::{PathOptions, MAX_MAX_VISITED, MIN_MAX_VISITED};
pub use context::ExecutionContext;
pub use error::{PathError, Result, StorageError};
pub use filter::ReachabilityFilter;
pub use graph::{Direction, Edge, EdgeRecord, EdgeStore, LabelId, NodeId, MAX_LABELS};
pub use index::{EdgeIndex, EdgeScan, IndexPartition, ScanPrefix};
pub use operator::{BindingIter, OperatorState};
pub use search::{SearchSpace, SearchState};
