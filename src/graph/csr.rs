//! Compressed-sparse-row directed graph.

use std::ops::Range;

use crate::graph::{EdgeId, NodeId};
use crate::io::{File, FileError, FileResult, Persist};

/// Read access to a directed graph in CSR layout.
///
/// Decorators implement this by delegation, so every wrapper of a
/// [`CsrGraph`] exposes the full topology of its base.
pub trait Topology {
    /// Number of nodes. Requires a constructed graph.
    fn number_of_nodes(&self) -> usize;

    fn number_of_edges(&self) -> usize;

    /// Targets of `node`'s outgoing edges, in insertion order.
    fn out_edges(&self, node: NodeId) -> &[NodeId];

    /// The half-open range of edge ids leaving `node`.
    fn edge_range(&self, node: NodeId) -> Range<EdgeId>;

    /// Head node of an edge.
    fn target(&self, edge: EdgeId) -> NodeId;

    /// Id of the `k`-th edge leaving `node`.
    fn edge_id(&self, node: NodeId, k: usize) -> EdgeId {
        self.edge_range(node).start + k as EdgeId
    }
}

/// A directed graph as two immutable arrays.
///
/// `offsets` has one entry per node plus a sentinel; the outgoing edges of
/// node `u` occupy `targets[offsets[u]..offsets[u + 1]]`. Instances are
/// produced by [`crate::graph::CsrFactory`] and never mutated afterwards.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CsrGraph {
    pub(crate) offsets: Vec<u64>,
    pub(crate) targets: Vec<NodeId>,
}

impl CsrGraph {
    /// Iterate all node ids.
    pub fn nodes(&self) -> Range<NodeId> {
        0..self.number_of_nodes() as NodeId
    }
}

impl Topology for CsrGraph {
    fn number_of_nodes(&self) -> usize {
        // the factory always writes at least the sentinel offset
        debug_assert!(!self.offsets.is_empty());
        self.offsets.len() - 1
    }

    fn number_of_edges(&self) -> usize {
        self.targets.len()
    }

    fn out_edges(&self, node: NodeId) -> &[NodeId] {
        let range = self.edge_range(node);
        &self.targets[range.start as usize..range.end as usize]
    }

    fn edge_range(&self, node: NodeId) -> Range<EdgeId> {
        self.offsets[node as usize]..self.offsets[node as usize + 1]
    }

    fn target(&self, edge: EdgeId) -> NodeId {
        self.targets[edge as usize]
    }
}

impl Persist for CsrGraph {
    fn store(&self, file: &mut File) -> FileResult<()> {
        if self.offsets.is_empty() {
            return Err(FileError::Precondition(
                "cannot store a graph that was never constructed",
            ));
        }
        file.write_pod_container(&self.offsets)?;
        file.write_pod_container(&self.targets)
    }

    fn load(file: &mut File) -> FileResult<Self> {
        let offsets = file.read_pod_container()?;
        let targets = file.read_pod_container()?;
        Ok(CsrGraph { offsets, targets })
    }
}
