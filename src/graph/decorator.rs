//! Per-edge decorations over a CSR graph.
//!
//! Decorators attach one parallel array, indexed by edge id, to a graph and
//! expose the underlying topology transparently. They compose: a
//! `ByteDecorator<DataDecorator<u32, CostDecorator<W, CsrGraph>>>` is a valid
//! stack whose (de)serialization recurses base-first. The decorator sequence
//! is a type, so a mismatched stack shape is caught at the first
//! inconsistent read.

use std::ops::Range;

use crate::graph::csr::Topology;
use crate::graph::{EdgeId, NodeId};
use crate::io::{File, FileResult, Persist, Pod};

/// A topology that carries a routing cost on every edge.
///
/// This is the seam shortest-path algorithms query; outer decorators
/// forward it so the cost stays reachable anywhere in a stack.
pub trait CostGraph: Topology {
    type Cost;

    fn cost(&self, edge: EdgeId) -> &Self::Cost;
}

/// Write access to a decoration array, used by [`DecoratorFactory`].
pub trait Decorate {
    type Item;

    fn decoration_mut(&mut self) -> &mut Vec<Self::Item>;
}

macro_rules! delegate_topology {
    () => {
        fn number_of_nodes(&self) -> usize {
            self.graph.number_of_nodes()
        }

        fn number_of_edges(&self) -> usize {
            self.graph.number_of_edges()
        }

        fn out_edges(&self, node: NodeId) -> &[NodeId] {
            self.graph.out_edges(node)
        }

        fn edge_range(&self, node: NodeId) -> Range<EdgeId> {
            self.graph.edge_range(node)
        }

        fn target(&self, edge: EdgeId) -> NodeId {
            self.graph.target(edge)
        }
    };
}

/// Adds a routing cost to every edge. Shortest-path computation requires
/// exactly one cost decorator somewhere in the stack.
#[derive(Debug, Clone, PartialEq)]
pub struct CostDecorator<W, G> {
    graph: G,
    decoration: Vec<W>,
}

/// Attaches an arbitrary fixed-layout value to every edge: road classes,
/// transit line handles or similar.
#[derive(Debug, Clone, PartialEq)]
pub struct DataDecorator<T, G> {
    graph: G,
    decoration: Vec<T>,
}

/// Attaches a variable-length byte string to every edge, for opaque
/// payloads that ride along with query results.
#[derive(Debug, Clone, PartialEq)]
pub struct ByteDecorator<G> {
    graph: G,
    decoration: Vec<Vec<u8>>,
}

impl<W, G> CostDecorator<W, G> {
    pub fn new(graph: G) -> Self {
        Self {
            graph,
            decoration: Vec::new(),
        }
    }

    pub fn cost(&self, edge: EdgeId) -> &W {
        &self.decoration[edge as usize]
    }

    pub fn cost_mut(&mut self, edge: EdgeId) -> &mut W {
        &mut self.decoration[edge as usize]
    }

    pub fn base(&self) -> &G {
        &self.graph
    }

    pub fn base_mut(&mut self) -> &mut G {
        &mut self.graph
    }
}

impl<T, G> DataDecorator<T, G> {
    pub fn new(graph: G) -> Self {
        Self {
            graph,
            decoration: Vec::new(),
        }
    }

    pub fn data(&self, edge: EdgeId) -> &T {
        &self.decoration[edge as usize]
    }

    pub fn data_mut(&mut self, edge: EdgeId) -> &mut T {
        &mut self.decoration[edge as usize]
    }

    pub fn base(&self) -> &G {
        &self.graph
    }

    pub fn base_mut(&mut self) -> &mut G {
        &mut self.graph
    }
}

impl<G> ByteDecorator<G> {
    pub fn new(graph: G) -> Self {
        Self {
            graph,
            decoration: Vec::new(),
        }
    }

    pub fn bytes(&self, edge: EdgeId) -> &[u8] {
        &self.decoration[edge as usize]
    }

    pub fn bytes_mut(&mut self, edge: EdgeId) -> &mut Vec<u8> {
        &mut self.decoration[edge as usize]
    }

    pub fn base(&self) -> &G {
        &self.graph
    }

    pub fn base_mut(&mut self) -> &mut G {
        &mut self.graph
    }
}

impl<W, G: Topology> Topology for CostDecorator<W, G> {
    delegate_topology!();
}

impl<T, G: Topology> Topology for DataDecorator<T, G> {
    delegate_topology!();
}

impl<G: Topology> Topology for ByteDecorator<G> {
    delegate_topology!();
}

impl<W, G: Topology> CostGraph for CostDecorator<W, G> {
    type Cost = W;

    fn cost(&self, edge: EdgeId) -> &W {
        &self.decoration[edge as usize]
    }
}

impl<T, G: CostGraph> CostGraph for DataDecorator<T, G> {
    type Cost = G::Cost;

    fn cost(&self, edge: EdgeId) -> &G::Cost {
        self.graph.cost(edge)
    }
}

impl<G: CostGraph> CostGraph for ByteDecorator<G> {
    type Cost = G::Cost;

    fn cost(&self, edge: EdgeId) -> &G::Cost {
        self.graph.cost(edge)
    }
}

impl<W, G> Decorate for CostDecorator<W, G> {
    type Item = W;

    fn decoration_mut(&mut self) -> &mut Vec<W> {
        &mut self.decoration
    }
}

impl<T, G> Decorate for DataDecorator<T, G> {
    type Item = T;

    fn decoration_mut(&mut self) -> &mut Vec<T> {
        &mut self.decoration
    }
}

impl<G> Decorate for ByteDecorator<G> {
    type Item = Vec<u8>;

    fn decoration_mut(&mut self) -> &mut Vec<Vec<u8>> {
        &mut self.decoration
    }
}

impl<W: Pod, G: Persist> Persist for CostDecorator<W, G> {
    fn store(&self, file: &mut File) -> FileResult<()> {
        self.graph.store(file)?;
        file.write_pod_container(&self.decoration)
    }

    fn load(file: &mut File) -> FileResult<Self> {
        let graph = G::load(file)?;
        let decoration = file.read_pod_container()?;
        Ok(Self { graph, decoration })
    }
}

impl<T: Pod, G: Persist> Persist for DataDecorator<T, G> {
    fn store(&self, file: &mut File) -> FileResult<()> {
        self.graph.store(file)?;
        file.write_pod_container(&self.decoration)
    }

    fn load(file: &mut File) -> FileResult<Self> {
        let graph = G::load(file)?;
        let decoration = file.read_pod_container()?;
        Ok(Self { graph, decoration })
    }
}

impl<G: Persist> Persist for ByteDecorator<G> {
    fn store(&self, file: &mut File) -> FileResult<()> {
        self.graph.store(file)?;
        file.write_container(&self.decoration)
    }

    fn load(file: &mut File) -> FileResult<Self> {
        let graph = G::load(file)?;
        let decoration = file.read_container()?;
        Ok(Self { graph, decoration })
    }
}

/// Fills decoration arrays in edge-id order.
pub struct DecoratorFactory;

impl DecoratorFactory {
    /// Populate the outermost decoration of `decorated` by converting each
    /// edge record.
    ///
    /// `edges` must be in the order the CSR factory left them (stably
    /// sorted by source), so the k-th converted value lands on the k-th
    /// edge id. Passing the edges in any other order mis-aligns the
    /// decoration with the graph.
    pub fn decorate<D, E, F>(decorated: &mut D, edges: &[E], convert: F)
    where
        D: Decorate,
        F: Fn(&E) -> D::Item,
    {
        let decoration = decorated.decoration_mut();
        decoration.clear();
        decoration.reserve(edges.len());
        for edge in edges {
            decoration.push(convert(edge));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::csr::CsrGraph;
    use crate::graph::factory::{CsrFactory, SourceTarget};
    use crate::graph::NodeId;

    #[derive(Clone)]
    struct Weighted {
        source: NodeId,
        target: NodeId,
        weight: u32,
    }

    impl SourceTarget for Weighted {
        fn source(&self) -> NodeId {
            self.source
        }

        fn target(&self) -> NodeId {
            self.target
        }
    }

    fn weighted(source: NodeId, target: NodeId, weight: u32) -> Weighted {
        Weighted {
            source,
            target,
            weight,
        }
    }

    #[test]
    fn decoration_aligns_with_edge_ids() {
        // deliberately unsorted input; the factory sorts, the decorator
        // walks the sorted sequence
        let mut edges = vec![
            weighted(2, 0, 20),
            weighted(0, 1, 1),
            weighted(2, 1, 21),
            weighted(0, 2, 2),
        ];
        let base = CsrFactory::directed_from_edges(3, &mut edges).unwrap();
        let mut graph = CostDecorator::<u32, CsrGraph>::new(base);
        DecoratorFactory::decorate(&mut graph, &edges, |edge| edge.weight);

        assert_eq!(graph.number_of_edges(), 4);
        for node in [0, 2] {
            for (k, _) in graph.out_edges(node).iter().enumerate() {
                let edge = graph.edge_id(node, k);
                let expected = edges[edge as usize].weight;
                assert_eq!(*graph.cost(edge), expected);
            }
        }
        assert_eq!(*graph.cost(graph.edge_id(2, 1)), 21);
    }

    #[test]
    fn stacked_decorators_compose() {
        let mut edges = vec![weighted(0, 1, 7), weighted(1, 0, 3)];
        let base = CsrFactory::directed_from_edges(2, &mut edges).unwrap();

        let mut graph =
            ByteDecorator::new(DataDecorator::<u64, _>::new(CostDecorator::new(base)));
        DecoratorFactory::decorate(graph.base_mut().base_mut(), &edges, |edge| edge.weight);
        DecoratorFactory::decorate(graph.base_mut(), &edges, |edge| u64::from(edge.weight) * 2);
        DecoratorFactory::decorate(&mut graph, &edges, |edge| vec![edge.weight as u8]);

        // the outermost wrapper still answers topology and cost queries
        assert_eq!(graph.number_of_nodes(), 2);
        assert_eq!(*graph.cost(0), 7);
        assert_eq!(*graph.base().data(1), 6);
        assert_eq!(graph.bytes(1), &[3]);
    }

    #[test]
    fn cost_mut_updates_in_place() {
        let mut edges = vec![weighted(0, 1, 1)];
        let base = CsrFactory::directed_from_edges(2, &mut edges).unwrap();
        let mut graph = CostDecorator::<u32, CsrGraph>::new(base);
        DecoratorFactory::decorate(&mut graph, &edges, |edge| edge.weight);

        *graph.cost_mut(0) = 9;
        assert_eq!(*graph.cost(0), 9);
    }
}
