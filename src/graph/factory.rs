//! Construction of CSR graphs from edge lists.

use thiserror::Error;
use tracing::debug;

use crate::graph::csr::CsrGraph;
use crate::graph::NodeId;

/// Graph construction errors
#[derive(Error, Debug)]
pub enum GraphError {
    /// An edge endpoint exceeds the declared node count
    #[error("node id {id} out of range, the graph was declared with {bound} nodes")]
    OutOfRange { id: u64, bound: u64 },
}

pub type GraphResult<T> = Result<T, GraphError>;

/// Extracts the endpoints from an edge record.
pub trait SourceTarget {
    fn source(&self) -> NodeId;
    fn target(&self) -> NodeId;
}

impl SourceTarget for (NodeId, NodeId) {
    fn source(&self) -> NodeId {
        self.0
    }

    fn target(&self) -> NodeId {
        self.1
    }
}

/// Produces [`CsrGraph`] instances from directed edge lists.
pub struct CsrFactory;

impl CsrFactory {
    /// Build a CSR graph over nodes `0..number_of_nodes` from `edges`.
    ///
    /// The edges are sorted in place, stably, by source; edge ids within a
    /// source therefore reflect insertion order, and callers that decorate
    /// the graph afterwards must walk `edges` in this final order. Runs in
    /// O(m log m) time and O(n + m) additional space.
    pub fn directed_from_edges<E: SourceTarget>(
        number_of_nodes: u64,
        edges: &mut [E],
    ) -> GraphResult<CsrGraph> {
        edges.sort_by_key(|edge| edge.source());

        let mut offsets = Vec::with_capacity(number_of_nodes as usize + 1);
        offsets.push(0);
        let mut targets = Vec::with_capacity(edges.len());

        let mut remaining = edges.iter().peekable();
        for node in 0..number_of_nodes {
            while let Some(edge) = remaining.peek() {
                if edge.source() != node {
                    break;
                }
                let target = edge.target();
                if target >= number_of_nodes {
                    return Err(GraphError::OutOfRange {
                        id: target,
                        bound: number_of_nodes,
                    });
                }
                targets.push(target);
                remaining.next();
            }
            // mark the end of the current node's span
            offsets.push(targets.len() as u64);
        }

        // anything left over names a source beyond the declared bound
        if let Some(edge) = remaining.next() {
            return Err(GraphError::OutOfRange {
                id: edge.source(),
                bound: number_of_nodes,
            });
        }

        debug!(
            nodes = number_of_nodes,
            edges = targets.len(),
            "built CSR graph"
        );
        Ok(CsrGraph { offsets, targets })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Topology;

    #[test]
    fn rejects_target_out_of_range() {
        let mut edges = vec![(0, 1), (1, 5)];
        let err = CsrFactory::directed_from_edges(3, &mut edges).unwrap_err();
        match err {
            GraphError::OutOfRange { id, bound } => {
                assert_eq!(id, 5);
                assert_eq!(bound, 3);
            }
        }
    }

    #[test]
    fn rejects_source_out_of_range() {
        let mut edges = vec![(0, 1), (9, 0)];
        let err = CsrFactory::directed_from_edges(3, &mut edges).unwrap_err();
        match err {
            GraphError::OutOfRange { id, bound } => {
                assert_eq!(id, 9);
                assert_eq!(bound, 3);
            }
        }
    }

    #[test]
    fn sort_is_stable_within_a_source() {
        // two parallel edges from node 1 plus an interleaved edge from 0
        let mut edges = vec![(1, 2), (0, 1), (1, 0)];
        let graph = CsrFactory::directed_from_edges(3, &mut edges).unwrap();
        assert_eq!(graph.out_edges(1), &[2, 0]);
        // the input slice now matches edge-id order
        assert_eq!(edges, vec![(0, 1), (1, 2), (1, 0)]);
    }

    #[test]
    fn zero_nodes_give_a_sentinel_only_graph() {
        let mut edges: Vec<(NodeId, NodeId)> = Vec::new();
        let graph = CsrFactory::directed_from_edges(0, &mut edges).unwrap();
        assert_eq!(graph.number_of_nodes(), 0);
        assert_eq!(graph.number_of_edges(), 0);
    }
}
