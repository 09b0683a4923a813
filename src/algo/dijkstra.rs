//! Dijkstra shortest paths over a cost-decorated graph.

use std::ops::Add;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::container::KAryHeap;
use crate::graph::decorator::CostGraph;
use crate::graph::{EdgeId, NodeId};
use crate::route::{Route, Segment};

/// A point to enter or leave the graph: a node plus an additive cost.
///
/// The offset models entries in the middle of a segment; for sources it is
/// added up front, for targets it is added when judging which candidate
/// wins. Offsets must be non-negative under the cost type's order, like
/// every other cost in the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location<W> {
    pub node: NodeId,
    pub offset: W,
}

#[derive(Debug, Clone, Copy)]
struct Parent {
    node: NodeId,
    via_edge: EdgeId,
}

/// Shortest-path engine over an immutable cost-decorated graph.
///
/// The heap and the parents map live across queries so their allocations
/// are reused; each query clears and owns them. Queries never fail: an
/// unreachable target yields an empty route.
pub struct Dijkstra<'a, G: CostGraph> {
    graph: &'a G,
    heap: KAryHeap<NodeId, G::Cost, 2>,
    parents: FxHashMap<NodeId, Parent>,
}

impl<'a, G> Dijkstra<'a, G>
where
    G: CostGraph,
    G::Cost: Copy + Ord + Add<Output = G::Cost>,
{
    pub fn new(graph: &'a G) -> Self {
        Self {
            graph,
            heap: KAryHeap::new(),
            parents: FxHashMap::default(),
        }
    }

    /// A direct path between two locations.
    pub fn route(&mut self, from: Location<G::Cost>, to: Location<G::Cost>) -> Route<G::Cost> {
        self.parents.clear();
        self.heap.clear();
        self.heap.push(from.node, from.offset);

        while let Some(current) = self.heap.peek() {
            if current.key == to.node {
                return self.extract_path(to.node);
            }
            self.relax();
        }

        // no valid path
        Route::empty()
    }

    /// Cheapest path over multiple source and target candidates.
    ///
    /// Sources naming the same node collapse to the smallest offset.
    /// Reaching a target does not end the search by itself; it continues
    /// until no other target's offset could still yield a better total.
    pub fn route_many(
        &mut self,
        from: &[Location<G::Cost>],
        to: &[Location<G::Cost>],
    ) -> Route<G::Cost> {
        self.parents.clear();
        self.heap.clear();
        for source in from {
            match self.heap.entry(source.node) {
                None => self.heap.push(source.node, source.offset),
                Some(entry) if entry.weight > source.offset => {
                    self.heap.update(source.node, source.offset)
                }
                Some(_) => {}
            }
        }

        let Some(min_offset) = to.iter().map(|target| target.offset).min() else {
            return Route::empty();
        };

        let mut best: Option<(NodeId, G::Cost)> = None;

        while let Some(current) = self.heap.peek() {
            let node = current.key;
            let weight = current.weight;

            // the settled node may close several target candidates at once
            for target in to.iter().filter(|target| target.node == node) {
                let total = weight + target.offset;
                if best.map_or(true, |(_, best_total)| total < best_total) {
                    best = Some((node, total));
                }
            }

            if let Some((target, total)) = best {
                // offsets are non-negative, so once the cheapest candidate
                // undercuts the heap minimum plus the smallest target
                // offset, no later pop can improve on it
                if total <= weight + min_offset {
                    return self.extract_path(target);
                }
            }

            self.relax();
        }

        Route::empty()
    }

    /// One step of the search: settle the minimum and relax its out-edges.
    fn relax(&mut self) {
        let Some(minimum) = self.heap.pop() else {
            return;
        };
        let node = minimum.key;
        let weight = minimum.weight;

        for edge in self.graph.edge_range(node) {
            let target = self.graph.target(edge);
            let cost = weight + *self.graph.cost(edge);
            match self.heap.entry(target) {
                // unknown node, open it
                None => {
                    self.heap.push(target, cost);
                    self.parents.insert(target, Parent { node, via_edge: edge });
                }
                // strictly better path to an open node
                Some(entry) if entry.weight > cost => {
                    self.heap.update(target, cost);
                    self.parents.insert(target, Parent { node, via_edge: edge });
                }
                Some(_) => {}
            }
        }
    }

    fn extract_path(&self, destination: NodeId) -> Route<G::Cost> {
        let mut segments = Vec::new();
        let mut current = destination;
        while let Some(parent) = self.parents.get(&current) {
            let settled = self
                .heap
                .entry(current)
                .expect("parented nodes have been pushed onto the heap");
            segments.push(Segment {
                weight_at_end: settled.weight,
                edge: parent.via_edge,
            });
            current = parent.node;
        }
        segments.reverse();
        Route { segments }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::csr::CsrGraph;
    use crate::graph::decorator::{CostDecorator, DecoratorFactory};
    use crate::graph::factory::{CsrFactory, SourceTarget};

    struct Edge {
        source: NodeId,
        target: NodeId,
        weight: u64,
    }

    impl SourceTarget for Edge {
        fn source(&self) -> NodeId {
            self.source
        }

        fn target(&self) -> NodeId {
            self.target
        }
    }

    fn edge(source: NodeId, target: NodeId, weight: u64) -> Edge {
        Edge {
            source,
            target,
            weight,
        }
    }

    //   (2)- - - 2
    //  /         |
    //  |        (5)
    //  |         |
    //  0- (10) - 1 <- (4) - 3
    fn diamond() -> CostDecorator<u64, CsrGraph> {
        let mut edges = vec![edge(0, 1, 10), edge(0, 2, 2), edge(2, 1, 5), edge(3, 1, 4)];
        let base = CsrFactory::directed_from_edges(4, &mut edges).unwrap();
        let mut graph = CostDecorator::new(base);
        DecoratorFactory::decorate(&mut graph, &edges, |edge| edge.weight);
        graph
    }

    fn at(node: NodeId) -> Location<u64> {
        Location { node, offset: 0 }
    }

    #[test]
    fn cheapest_path_is_indirect() {
        let graph = diamond();
        let mut dijkstra = Dijkstra::new(&graph);

        let route = dijkstra.route(at(0), at(1));
        assert_eq!(route.len(), 2);
        assert_eq!(route.total_weight(), Some(&7));
        // 0 -> 2 is edge id 1, 2 -> 1 is edge id 2
        assert_eq!(route.segments[0].edge, 1);
        assert_eq!(route.segments[1].edge, 2);
        assert_eq!(route.segments[0].weight_at_end, 2);

        let no_route = dijkstra.route(at(0), at(3));
        assert!(no_route.is_empty());
    }

    #[test]
    fn trivial_query_yields_empty_route() {
        let graph = diamond();
        let mut dijkstra = Dijkstra::new(&graph);
        assert!(dijkstra.route(at(0), at(0)).is_empty());
    }

    #[test]
    fn multi_source_target_respects_offsets() {
        let graph = diamond();
        let mut dijkstra = Dijkstra::new(&graph);

        let sources = vec![at(0), Location { node: 3, offset: 5 }];
        let targets = vec![
            at(1),
            Location { node: 2, offset: 10 },
            Location { node: 2, offset: 20 },
        ];
        // via source 3 node 1 costs 5 + 4 = 9; via source 0 it costs 7
        let route = dijkstra.route_many(&sources, &targets);
        assert_eq!(route.len(), 2);
        assert_eq!(route.segments[1].edge, 2);
        assert_eq!(route.total_weight(), Some(&7));

        let route = dijkstra.route_many(&[at(0)], &[at(3)]);
        assert!(route.is_empty());
    }

    #[test]
    fn duplicate_sources_collapse_to_smallest_offset() {
        let graph = diamond();
        let mut dijkstra = Dijkstra::new(&graph);

        // node 0 appears three times; the cheapest offset wins and the
        // query runs instead of tripping the heap's uniqueness check
        let sources = vec![
            Location { node: 0, offset: 9 },
            Location { node: 0, offset: 1 },
            Location { node: 0, offset: 3 },
        ];
        let route = dijkstra.route_many(&sources, &[at(1)]);
        assert_eq!(route.len(), 2);
        assert_eq!(route.total_weight(), Some(&8));
    }

    #[test]
    fn no_targets_means_no_route() {
        let graph = diamond();
        let mut dijkstra = Dijkstra::new(&graph);
        assert!(dijkstra.route_many(&[at(0)], &[]).is_empty());
    }

    #[test]
    fn settled_weights_never_improve() {
        // every reachable node keeps its first settled weight
        let graph = diamond();
        let mut dijkstra = Dijkstra::new(&graph);
        let route = dijkstra.route(at(0), at(1));
        assert_eq!(route.total_weight(), Some(&7));

        // node 2 was settled on the way, at its distance from 0
        assert_eq!(dijkstra.heap.entry(2).unwrap().weight, 2);
        assert_eq!(dijkstra.heap.entry(1).unwrap().weight, 7);
    }
}
