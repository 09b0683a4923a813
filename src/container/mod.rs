//! Container primitives backing the query algorithms.

pub mod kary_heap;

pub use kary_heap::{HeapElement, KAryHeap};
