//! Embeddable routing-graph library.
//!
//! The crate ingests edges identified by arbitrary external ids, builds a
//! compact compressed-sparse-row directed graph with optional per-edge
//! decorations, persists it in a version-checked binary format, and answers
//! shortest-path and structural queries over it.
//!
//! Construction strictly precedes querying: graphs are immutable once
//! built, and every query owns its mutable state. Nothing here spawns
//! threads or suspends; the crate is plain synchronous library code.
//!
//! # Example
//!
//! ```
//! use routegraph::{CsrFactory, CostDecorator, DecoratorFactory, Dijkstra, Location};
//!
//! // edges as (source, target), weights decorated on top
//! let mut edges = vec![(0u64, 1u64), (1, 2), (0, 2)];
//! let base = CsrFactory::directed_from_edges(3, &mut edges).unwrap();
//!
//! let mut graph = CostDecorator::<u64, _>::new(base);
//! DecoratorFactory::decorate(&mut graph, &edges, |&(s, t)| s + t);
//!
//! let mut dijkstra = Dijkstra::new(&graph);
//! let route = dijkstra.route(
//!     Location { node: 0, offset: 0 },
//!     Location { node: 2, offset: 0 },
//! );
//! assert_eq!(route.total_weight(), Some(&2));
//! ```

pub mod algo;
pub mod builder;
pub mod container;
pub mod graph;
pub mod io;
pub mod route;

pub use algo::{Dijkstra, Location, Scc, UnionFind};
pub use builder::{BuildError, BuildResult, GraphBuilder};
pub use container::{HeapElement, KAryHeap};
pub use graph::{
    ByteDecorator, CostDecorator, CostGraph, CsrFactory, CsrGraph, DataDecorator, Decorate,
    DecoratorFactory, EdgeId, GraphError, GraphResult, NodeId, RoutingGraph, SourceTarget,
    Topology, WeightTimeDistance,
};
pub use io::{File, FileError, FileResult, Mode, Persist, Pod};
pub use route::{Route, Segment};

/// Version stamped into and checked against file headers.
pub const VERSION_MAJOR: u32 = 0;
pub const VERSION_MINOR: u32 = 1;
pub const VERSION_PATCH: u32 = 0;
