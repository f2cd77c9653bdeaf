//! Endpoint identifiers and the binding row they resolve against.

use std::fmt;

use crate::error::{PathError, Result};
use crate::graph::NodeId;

/// Query variable index within a binding row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VarId(pub u32);

impl fmt::Display for VarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "?{}", self.0)
    }
}

/// A path endpoint: a fixed node, or a variable bound upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Identifier {
    Var(VarId),
    Node(NodeId),
}

impl Identifier {
    /// Concrete node for this endpoint under `row`.
    ///
    /// A variable must already be assigned; an unassigned one is a planning
    /// defect and surfaces as [`PathError::UnboundEndpoint`].
    pub fn resolve(&self, row: &BindingRow) -> Result<NodeId> {
        match *self {
            Identifier::Node(id) => Ok(id),
            Identifier::Var(var) => row.get(var)?.ok_or(PathError::UnboundEndpoint(var)),
        }
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Identifier::Var(v) => write!(f, "{}", v),
            Identifier::Node(id) => write!(f, "#{}", id),
        }
    }
}

/// Fixed-width assignment of variables to nodes. Produced upstream; checks
/// only read it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindingRow {
    values: Vec<Option<NodeId>>,
}

impl BindingRow {
    /// A row of `width` unassigned variables.
    pub fn new(width: usize) -> Self {
        Self {
            values: vec![None; width],
        }
    }

    pub fn width(&self) -> usize {
        self.values.len()
    }

    pub fn get(&self, var: VarId) -> Result<Option<NodeId>> {
        self.values
            .get(var.0 as usize)
            .copied()
            .ok_or(PathError::VariableOutOfRange {
                var,
                width: self.values.len(),
            })
    }

    pub fn set(&mut self, var: VarId, value: Option<NodeId>) -> Result<()> {
        let width = self.values.len();
        let slot = self
            .values
            .get_mut(var.0 as usize)
            .ok_or(PathError::VariableOutOfRange { var, width })?;
        *slot = value;
        Ok(())
    }

    /// Builder-style assignment.
    pub fn with(mut self, var: VarId, value: NodeId) -> Result<Self> {
        self.set(var, Some(value))?;
        Ok(self)
    }
}
