//! Graph representation and construction.
//!
//! The base structure is a compressed-sparse-row directed graph built once
//! from an edge list. Per-edge decorations (costs, typed data, byte
//! payloads) layer on top of it as composable wrappers.

pub mod csr;
pub mod decorator;
pub mod factory;
pub mod routing;

pub use csr::{CsrGraph, Topology};
pub use decorator::{
    ByteDecorator, CostDecorator, CostGraph, DataDecorator, Decorate, DecoratorFactory,
};
pub use factory::{CsrFactory, GraphError, GraphResult, SourceTarget};
pub use routing::{RoutingGraph, WeightTimeDistance};

/// Node identifier. Within a built graph, node ids are dense over `0..n`.
pub type NodeId = u64;

/// Edge identifier, dense over `0..m` in construction order.
pub type EdgeId = u64;
