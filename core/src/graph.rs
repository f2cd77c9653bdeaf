use std::collections::{BTreeSet, HashMap};

use crate::error::{PathError, Result};
use crate::index::{EdgeIndex, EdgeScan, IndexPartition, ScanPrefix};

/// Node identifier as stored in the edge relation.
pub type NodeId = u64;

/// Interned edge label (avoids storing duplicate strings per edge).
pub type LabelId = u16;

/// Upper bound on distinct labels the dictionary can hold.
pub const MAX_LABELS: usize = LabelId::MAX as usize + 1;

/// Which way an edge is followed during traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// from → to, answered by the (label, from, to) partition
    Outgoing,
    /// to → from, answered by the (label, to, from) partition
    Incoming,
}

/// A directed, labeled edge as returned by a range scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Edge {
    pub label: LabelId,
    pub from: NodeId,
    pub to: NodeId,
}

impl Edge {
    /// Endpoint reached by following this edge in `dir`.
    pub fn opposite(&self, dir: Direction) -> NodeId {
        match dir {
            Direction::Outgoing => self.to,
            Direction::Incoming => self.from,
        }
    }
}

/// Input record for bulk loading.
#[derive(Debug, Clone)]
pub struct EdgeRecord {
    pub from: NodeId,
    pub to: NodeId,
    pub label: String,
}

/// In-memory indexed edge store.
///
/// Holds the edge relation twice, once per partition, each as an ordered set
/// so a key prefix maps onto a contiguous range:
/// `forward` is keyed `(label, from, to)`, `backward` is keyed `(label, to, from)`.
#[derive(Debug)]
pub struct EdgeStore {
    forward: BTreeSet<(LabelId, NodeId, NodeId)>,
    backward: BTreeSet<(LabelId, NodeId, NodeId)>,
    nodes: BTreeSet<NodeId>,
    /// Labels present on at least one edge, interned or not; wildcard scans walk these
    edge_labels: BTreeSet<LabelId>,
    labels: Vec<String>,
    label_map: HashMap<String, LabelId>,
}

impl EdgeStore {
    pub fn new() -> Self {
        Self {
            forward: BTreeSet::new(),
            backward: BTreeSet::new(),
            nodes: BTreeSet::new(),
            edge_labels: BTreeSet::new(),
            labels: Vec::new(),
            label_map: HashMap::new(),
        }
    }

    /// Intern a label string, returning its compact ID.
    pub fn intern_label(&mut self, label: &str) -> Result<LabelId> {
        if let Some(&id) = self.label_map.get(label) {
            return Ok(id);
        }
        if self.labels.len() >= MAX_LABELS {
            return Err(PathError::LabelOverflow { max: MAX_LABELS });
        }
        let id = self.labels.len() as LabelId;
        self.labels.push(label.to_string());
        self.label_map.insert(label.to_string(), id);
        Ok(id)
    }

    /// Resolve a LabelId back to its string name.
    /// Returns None for IDs that were never interned.
    pub fn label_name(&self, id: LabelId) -> Option<&str> {
        self.labels.get(id as usize).map(|s| s.as_str())
    }

    /// Look up an already-interned label.
    pub fn label_id(&self, label: &str) -> Option<LabelId> {
        self.label_map.get(label).copied()
    }

    pub fn label_count(&self) -> usize {
        self.labels.len()
    }

    /// Register a node that may have no edges.
    pub fn add_node(&mut self, id: NodeId) {
        self.nodes.insert(id);
    }

    /// Add a directed edge to both partitions. Duplicate edges collapse.
    pub fn add_edge(&mut self, from: NodeId, to: NodeId, label: LabelId) {
        self.nodes.insert(from);
        self.nodes.insert(to);
        self.edge_labels.insert(label);
        self.forward.insert((label, from, to));
        self.backward.insert((label, to, from));
    }

    /// Bulk load from edge records, interning labels as they appear.
    pub fn load_edges<I>(&mut self, edges: I) -> Result<()>
    where
        I: IntoIterator<Item = EdgeRecord>,
    {
        for rec in edges {
            let label = self.intern_label(&rec.label)?;
            self.add_edge(rec.from, rec.to, label);
        }
        Ok(())
    }

    pub fn contains_node(&self, id: NodeId) -> bool {
        self.nodes.contains(&id)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.forward.len()
    }

    /// Approximate memory usage in bytes.
    pub fn memory_usage(&self) -> usize {
        use std::mem::size_of;

        let key = size_of::<(LabelId, NodeId, NodeId)>();
        // BTreeSet node overhead is roughly one pointer per key
        let partitions = (self.forward.len() + self.backward.len()) * (key + 8);
        let nodes = self.nodes.len() * (size_of::<NodeId>() + 8);
        let edge_labels = self.edge_labels.len() * (size_of::<LabelId>() + 8);
        let labels: usize = self.labels.iter().map(|l| l.len() * 2 + 48).sum();

        partitions + nodes + edge_labels + labels
    }

    fn partition(&self, partition: IndexPartition) -> &BTreeSet<(LabelId, NodeId, NodeId)> {
        match partition {
            IndexPartition::LabelFromTo => &self.forward,
            IndexPartition::LabelToFrom => &self.backward,
        }
    }
}

impl Default for EdgeStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Turn a partition key back into an edge.
fn key_to_edge(partition: IndexPartition, (label, a, b): (LabelId, NodeId, NodeId)) -> Edge {
    match partition {
        IndexPartition::LabelFromTo => Edge { label, from: a, to: b },
        IndexPartition::LabelToFrom => Edge { label, from: b, to: a },
    }
}

impl EdgeIndex for EdgeStore {
    fn range_scan(&self, partition: IndexPartition, prefix: ScanPrefix) -> Result<EdgeScan<'_>> {
        let set = self.partition(partition);
        let node = prefix.node;

        let scan: EdgeScan<'_> = match prefix.label {
            Some(label) => Box::new(
                set.range((label, node, NodeId::MIN)..=(label, node, NodeId::MAX))
                    .map(move |&key| Ok(key_to_edge(partition, key))),
            ),
            // One logical scan: walk each label's range for this node in label order.
            None => Box::new(self.edge_labels.iter().flat_map(move |&label| {
                set.range((label, node, NodeId::MIN)..=(label, node, NodeId::MAX))
                    .map(move |&key| Ok(key_to_edge(partition, key)))
            })),
        };

        Ok(scan)
    }

    fn contains_node(&self, node: NodeId) -> Result<bool> {
        Ok(EdgeStore::contains_node(self, node))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edge(from: u64, to: u64, label: &str) -> EdgeRecord {
        EdgeRecord {
            from,
            to,
            label: label.to_string(),
        }
    }

    fn collect(store: &EdgeStore, partition: IndexPartition, prefix: ScanPrefix) -> Vec<Edge> {
        store
            .range_scan(partition, prefix)
            .unwrap()
            .map(|e| e.unwrap())
            .collect()
    }

    #[test]
    fn test_label_interning() {
        let mut s = EdgeStore::new();
        let a = s.intern_label("a").unwrap();
        let b = s.intern_label("b").unwrap();
        assert_eq!(s.intern_label("a").unwrap(), a);
        assert_ne!(a, b);
        assert_eq!(s.label_name(b), Some("b"));
        assert_eq!(s.label_name(99), None);
        assert_eq!(s.label_id("missing"), None);
        assert_eq!(s.label_count(), 2);
    }

    #[test]
    fn test_label_overflow() {
        let mut s = EdgeStore::new();
        for i in 0..MAX_LABELS {
            s.intern_label(&format!("l{}", i)).unwrap();
        }
        assert!(matches!(
            s.intern_label("one_too_many"),
            Err(PathError::LabelOverflow { .. })
        ));
    }

    #[test]
    fn test_counts_and_duplicates() {
        let mut s = EdgeStore::new();
        s.load_edges(vec![edge(1, 2, "a"), edge(1, 2, "a"), edge(2, 3, "b")])
            .unwrap();
        s.add_node(42);
        assert_eq!(s.edge_count(), 2);
        assert_eq!(s.node_count(), 4);
        assert!(s.contains_node(42));
        assert!(!s.contains_node(7));
        assert!(s.memory_usage() > 0);
    }

    #[test]
    fn test_forward_scan_fixed_label() {
        let mut s = EdgeStore::new();
        s.load_edges(vec![
            edge(1, 5, "a"),
            edge(1, 3, "a"),
            edge(1, 4, "b"),
            edge(2, 9, "a"),
        ])
        .unwrap();
        let a = s.label_id("a").unwrap();
        let got = collect(&s, IndexPartition::LabelFromTo, ScanPrefix::new(Some(a), 1));
        let targets: Vec<NodeId> = got.iter().map(|e| e.to).collect();
        // Ascending key order within the prefix
        assert_eq!(targets, vec![3, 5]);
        assert!(got.iter().all(|e| e.from == 1 && e.label == a));
    }

    #[test]
    fn test_backward_scan_returns_normalized_edges() {
        let mut s = EdgeStore::new();
        s.load_edges(vec![edge(1, 3, "a"), edge(2, 3, "a"), edge(3, 4, "a")])
            .unwrap();
        let a = s.label_id("a").unwrap();
        let got = collect(&s, IndexPartition::LabelToFrom, ScanPrefix::new(Some(a), 3));
        assert_eq!(
            got,
            vec![
                Edge { label: a, from: 1, to: 3 },
                Edge { label: a, from: 2, to: 3 },
            ]
        );
        assert_eq!(got[0].opposite(Direction::Incoming), 1);
    }

    #[test]
    fn test_wildcard_scan_spans_all_labels() {
        let mut s = EdgeStore::new();
        s.load_edges(vec![
            edge(1, 2, "b"),
            edge(1, 3, "a"),
            edge(1, 4, "c"),
            edge(5, 1, "a"),
        ])
        .unwrap();
        let got = collect(&s, IndexPartition::LabelFromTo, ScanPrefix::any_label(1));
        let targets: Vec<NodeId> = got.iter().map(|e| e.to).collect();
        // Label ids are interned in order b=0, a=1, c=2
        assert_eq!(targets, vec![2, 3, 4]);
    }

    #[test]
    fn test_wildcard_scan_includes_uninterned_labels() {
        let mut s = EdgeStore::new();
        let a = s.intern_label("a").unwrap();
        s.add_edge(1, 2, a);
        s.add_edge(1, 3, 40);
        s.add_edge(4, 1, 40);
        assert_eq!(s.label_count(), 1);

        let out = collect(&s, IndexPartition::LabelFromTo, ScanPrefix::any_label(1));
        assert_eq!(
            out,
            vec![
                Edge { label: a, from: 1, to: 2 },
                Edge { label: 40, from: 1, to: 3 },
            ]
        );
        let inc = collect(&s, IndexPartition::LabelToFrom, ScanPrefix::any_label(1));
        assert_eq!(inc, vec![Edge { label: 40, from: 4, to: 1 }]);
    }

    #[test]
    fn test_scan_unknown_node_is_empty() {
        let mut s = EdgeStore::new();
        s.load_edges(vec![edge(1, 2, "a")]).unwrap();
        assert!(collect(&s, IndexPartition::LabelFromTo, ScanPrefix::any_label(99)).is_empty());
        assert!(collect(&s, IndexPartition::LabelToFrom, ScanPrefix::new(Some(0), 1)).is_empty());
    }
}
