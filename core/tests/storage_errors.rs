//! Index failures reach the caller unchanged.

use std::cell::Cell;
use std::io;
use std::sync::Arc;

use path_accel_core::{
    BindingIter, BindingRow, Edge, EdgeIndex, EdgeScan, EdgeStore, ExecutionContext, Identifier,
    IndexPartition, NodeId, OperatorState, PathAutomaton, PathCheck, PathError, PathOptions,
    ScanPrefix, Step, StorageError,
};

/// Where the wrapped store starts failing.
#[derive(Clone, Copy)]
enum Fault {
    /// Opening scan number N fails
    OpenScan(u32),
    /// The first item of scan number N fails
    ScanItem(u32),
    NodeLookup,
}

struct FaultyIndex {
    inner: EdgeStore,
    fault: Fault,
    opened: Cell<u32>,
}

impl FaultyIndex {
    fn new(inner: EdgeStore, fault: Fault) -> Self {
        Self {
            inner,
            fault,
            opened: Cell::new(0),
        }
    }
}

impl EdgeIndex for FaultyIndex {
    fn range_scan(
        &self,
        partition: IndexPartition,
        prefix: ScanPrefix,
    ) -> path_accel_core::Result<EdgeScan<'_>> {
        let n = self.opened.get();
        self.opened.set(n + 1);
        match self.fault {
            Fault::OpenScan(at) if at == n => Err(StorageError::Io(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "short read on page 12",
            ))
            .into()),
            Fault::ScanItem(at) if at == n => {
                let bad = StorageError::Corrupt {
                    page: 7,
                    detail: "bad checksum".to_string(),
                };
                let item: path_accel_core::Result<Edge> = Err(bad.into());
                Ok(Box::new(std::iter::once(item)))
            }
            _ => self.inner.range_scan(partition, prefix),
        }
    }

    fn contains_node(&self, node: NodeId) -> path_accel_core::Result<bool> {
        match self.fault {
            Fault::NodeLookup => Err(StorageError::Corrupt {
                page: 0,
                detail: "node tree root unreadable".to_string(),
            }
            .into()),
            _ => Ok(self.inner.contains_node(node)),
        }
    }
}

fn chain() -> EdgeStore {
    let mut s = EdgeStore::new();
    let a = s.intern_label("a").unwrap();
    for i in 0..5 {
        s.add_edge(i, i + 1, a);
    }
    s
}

fn run(fault: Fault) -> path_accel_core::Result<bool> {
    let index = FaultyIndex::new(chain(), fault);
    let opts = PathOptions::default();
    let ctx = ExecutionContext::new(&index, &opts);
    let mut check = PathCheck::new(
        Arc::new(PathAutomaton::one_or_more(Step::forward(0))),
        Identifier::Node(0),
        Identifier::Node(5),
    );
    BindingIter::<FaultyIndex>::initialize(&mut check, &BindingRow::new(0))?;
    check.next(&ctx)
}

#[test]
fn healthy_index_finds_path() {
    assert!(run(Fault::OpenScan(u32::MAX)).unwrap());
}

#[test]
fn open_failure_propagates() {
    let err = run(Fault::OpenScan(2)).unwrap_err();
    assert!(matches!(err, PathError::Storage(StorageError::Io(_))));
    assert_eq!(err.to_string(), "I/O error: short read on page 12");
}

#[test]
fn item_failure_propagates() {
    let err = run(Fault::ScanItem(0)).unwrap_err();
    assert!(matches!(
        err,
        PathError::Storage(StorageError::Corrupt { page: 7, .. })
    ));
    assert_eq!(err.to_string(), "corrupt index page 7: bad checksum");
}

#[test]
fn node_lookup_failure_propagates() {
    let err = run(Fault::NodeLookup).unwrap_err();
    assert!(matches!(err, PathError::Storage(_)));
}

#[test]
fn failed_cycle_never_reports_no_path() {
    let index = FaultyIndex::new(chain(), Fault::ScanItem(1));
    let opts = PathOptions::default();
    let ctx = ExecutionContext::new(&index, &opts);
    let mut check = PathCheck::new(
        Arc::new(PathAutomaton::one_or_more(Step::forward(0))),
        Identifier::Node(0),
        Identifier::Node(5),
    );
    BindingIter::<FaultyIndex>::initialize(&mut check, &BindingRow::new(0)).unwrap();

    assert!(matches!(check.next(&ctx), Err(PathError::Storage(_))));
    assert_eq!(check.state(), OperatorState::Failed);
    assert!(matches!(check.next(&ctx), Err(PathError::CycleFailed)));

    // The fault fired once; a reset search runs on healthy scans
    BindingIter::<FaultyIndex>::reset(&mut check).unwrap();
    assert!(check.next(&ctx).unwrap());
}
