//! The result type of shortest-path queries.

use serde::{Deserialize, Serialize};

use crate::graph::EdgeId;

/// One traversed edge together with the cumulative cost at its end node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment<W> {
    pub weight_at_end: W,
    pub edge: EdgeId,
}

/// A route as a sequence of traversed segments.
///
/// An empty route means no path was found; a trivial query whose source
/// already sits on the target at zero offset is empty as well.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route<W> {
    pub segments: Vec<Segment<W>>,
}

impl<W> Route<W> {
    pub fn empty() -> Self {
        Self {
            segments: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// The cumulative cost at the final node, if the route is non-empty.
    pub fn total_weight(&self) -> Option<&W> {
        self.segments.last().map(|segment| &segment.weight_at_end)
    }
}

impl<W> Default for Route<W> {
    fn default() -> Self {
        Self::empty()
    }
}
