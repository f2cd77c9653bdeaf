//! Range-scan contract over the two edge partitions.
//!
//! A check never scans the whole edge relation. Each expansion opens one
//! range scan over a key prefix in the partition matching the transition's
//! direction, and consumes matches in ascending key order.

use crate::error::Result;
use crate::graph::{Direction, Edge, LabelId, NodeId};

/// Ordered secondary structure to scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndexPartition {
    /// Keyed `(label, from, to)`; answers "edges leaving `from`"
    LabelFromTo,
    /// Keyed `(label, to, from)`; answers "edges arriving at `to`"
    LabelToFrom,
}

impl IndexPartition {
    /// Partition that answers a traversal in `dir`.
    pub fn for_direction(dir: Direction) -> Self {
        match dir {
            Direction::Outgoing => IndexPartition::LabelFromTo,
            Direction::Incoming => IndexPartition::LabelToFrom,
        }
    }
}

/// Key prefix for a scan: fixed label (or every label) plus the bound node
/// in the partition's second key position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanPrefix {
    pub label: Option<LabelId>,
    pub node: NodeId,
}

impl ScanPrefix {
    pub fn new(label: Option<LabelId>, node: NodeId) -> Self {
        Self { label, node }
    }

    pub fn any_label(node: NodeId) -> Self {
        Self { label: None, node }
    }
}

/// Lazy, ascending sequence of matching edges. Each item may fail
/// independently (page faults are resolved as the scan advances).
pub type EdgeScan<'a> = Box<dyn Iterator<Item = Result<Edge>> + 'a>;

/// Read-only access to the indexed edge relation.
///
/// Implementations are shared across concurrently running checks, so every
/// method takes `&self`. Each call to [`EdgeIndex::range_scan`] returns a
/// fresh, independent scan.
pub trait EdgeIndex {
    /// Open a range scan over `prefix` in `partition`. Edges are returned
    /// normalized as `(label, from, to)` regardless of partition.
    fn range_scan(&self, partition: IndexPartition, prefix: ScanPrefix) -> Result<EdgeScan<'_>>;

    /// Whether `node` exists in the graph.
    fn contains_node(&self, node: NodeId) -> Result<bool>;
}
