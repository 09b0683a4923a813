//! Query algorithms over built graphs.

pub mod dijkstra;
pub mod scc;
pub mod union_find;

pub use dijkstra::{Dijkstra, Location};
pub use scc::Scc;
pub use union_find::UnionFind;
