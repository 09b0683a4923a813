//! Ingestion surface for host runtimes.
//!
//! The builder accepts edges between arbitrary external u64 ids, interns
//! them into dense node ids in first-seen order, and materializes the graph
//! straight into a versioned file. The dense mapping is an implementation
//! detail and not exposed.

use std::path::Path;

use rustc_hash::FxHashMap;
use thiserror::Error;
use tracing::info;

use crate::graph::csr::Topology;
use crate::graph::decorator::DecoratorFactory;
use crate::graph::factory::{CsrFactory, GraphError, SourceTarget};
use crate::graph::routing::{RoutingGraph, WeightTimeDistance};
use crate::graph::NodeId;
use crate::io::{File, FileError, Mode, Persist};

/// Builder errors
#[derive(Error, Debug)]
pub enum BuildError {
    /// Graph construction failed
    #[error(transparent)]
    Graph(#[from] GraphError),

    /// Writing the output file failed
    #[error(transparent)]
    File(#[from] FileError),

    /// A single graph holds either weighted or unweighted edges, not both
    #[error("cannot mix weighted and unweighted edges in one graph")]
    MixedEdgeKinds,
}

pub type BuildResult<T> = Result<T, BuildError>;

#[derive(Debug, Clone)]
struct Edge {
    source: NodeId,
    target: NodeId,
    // opaque host data riding along with the edge, e.g. encoded json or
    // protobuf blobs
    #[allow(dead_code)]
    payload: Vec<u8>,
}

#[derive(Debug, Clone)]
struct WeightedEdge {
    source: NodeId,
    target: NodeId,
    weight: WeightTimeDistance,
    #[allow(dead_code)]
    payload: Vec<u8>,
}

impl SourceTarget for Edge {
    fn source(&self) -> NodeId {
        self.source
    }

    fn target(&self) -> NodeId {
        self.target
    }
}

impl SourceTarget for WeightedEdge {
    fn source(&self) -> NodeId {
        self.source
    }

    fn target(&self) -> NodeId {
        self.target
    }
}

/// Collects edges identified by external ids and builds the stored graph.
#[derive(Debug, Default)]
pub struct GraphBuilder {
    id_map: FxHashMap<u64, NodeId>,
    edges: Vec<Edge>,
    weighted_edges: Vec<WeightedEdge>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct nodes seen so far.
    pub fn number_of_nodes(&self) -> usize {
        self.id_map.len()
    }

    pub fn add_edge(&mut self, source: u64, target: u64, payload: Vec<u8>) {
        let edge = Edge {
            source: self.intern(source),
            target: self.intern(target),
            payload,
        };
        self.edges.push(edge);
    }

    pub fn add_weighted_edge(
        &mut self,
        source: u64,
        target: u64,
        weight: u32,
        time: u32,
        distance: u32,
        payload: Vec<u8>,
    ) {
        let edge = WeightedEdge {
            source: self.intern(source),
            target: self.intern(target),
            weight: WeightTimeDistance::new(weight, time, distance),
            payload,
        };
        self.weighted_edges.push(edge);
    }

    /// Build the graph and write it to `path` behind a version header.
    ///
    /// Weighted edges produce a cost-decorated graph, unweighted edges a
    /// plain one; a mix of both is rejected.
    pub fn build_and_store(&mut self, path: impl AsRef<Path>) -> BuildResult<()> {
        if !self.edges.is_empty() && !self.weighted_edges.is_empty() {
            return Err(BuildError::MixedEdgeKinds);
        }

        let number_of_nodes = self.id_map.len() as u64;
        let mut out = File::open(&path, Mode::WRITE | Mode::BINARY | Mode::VERSIONED)?;

        if !self.weighted_edges.is_empty() {
            let base = CsrFactory::directed_from_edges(number_of_nodes, &mut self.weighted_edges)?;
            let mut graph = RoutingGraph::new(base);
            DecoratorFactory::decorate(&mut graph, &self.weighted_edges, |edge| edge.weight);
            graph.store(&mut out)?;
            info!(
                nodes = graph.number_of_nodes(),
                edges = graph.number_of_edges(),
                path = %path.as_ref().display(),
                "stored weighted graph"
            );
        } else {
            let graph = CsrFactory::directed_from_edges(number_of_nodes, &mut self.edges)?;
            graph.store(&mut out)?;
            info!(
                nodes = graph.number_of_nodes(),
                edges = graph.number_of_edges(),
                path = %path.as_ref().display(),
                "stored graph"
            );
        }

        out.close()?;
        Ok(())
    }

    // external ids become dense internal ids in first-seen order
    fn intern(&mut self, external: u64) -> NodeId {
        let next = self.id_map.len() as NodeId;
        *self.id_map.entry(external).or_insert(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interning_is_first_seen_dense() {
        let mut builder = GraphBuilder::new();
        builder.add_edge(900, 17, Vec::new());
        builder.add_edge(17, 42, Vec::new());
        builder.add_edge(900, 42, Vec::new());

        assert_eq!(builder.number_of_nodes(), 3);
        assert_eq!(builder.edges[0].source, 0);
        assert_eq!(builder.edges[0].target, 1);
        assert_eq!(builder.edges[1].source, 1);
        assert_eq!(builder.edges[1].target, 2);
        assert_eq!(builder.edges[2].source, 0);
        assert_eq!(builder.edges[2].target, 2);
    }

    #[test]
    fn mixed_edge_kinds_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut builder = GraphBuilder::new();
        builder.add_edge(0, 1, Vec::new());
        builder.add_weighted_edge(1, 2, 1, 2, 3, Vec::new());

        let err = builder.build_and_store(dir.path().join("mixed.bin")).unwrap_err();
        assert!(matches!(err, BuildError::MixedEdgeKinds));
    }
}
