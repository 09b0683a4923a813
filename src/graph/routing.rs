//! The routing cost type and the graph alias queries run on.

use std::ops::{Add, AddAssign, Sub, SubAssign};

use serde::{Deserialize, Serialize};

use crate::graph::csr::CsrGraph;
use crate::graph::decorator::CostDecorator;
use crate::io::Pod;

/// Routing cost as a (weight, time, distance) triple.
///
/// Ordering is lexicographic in field order, so `weight` dominates and the
/// remaining fields break ties deterministically. Addition and subtraction
/// are componentwise; overflow is the caller's responsibility.
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct WeightTimeDistance {
    pub weight: u32,
    pub time: u32,
    pub distance: u32,
}

impl WeightTimeDistance {
    /// The additive identity.
    pub const ZERO: Self = Self {
        weight: 0,
        time: 0,
        distance: 0,
    };

    pub const fn new(weight: u32, time: u32, distance: u32) -> Self {
        Self {
            weight,
            time,
            distance,
        }
    }
}

impl AddAssign for WeightTimeDistance {
    fn add_assign(&mut self, other: Self) {
        self.weight += other.weight;
        self.time += other.time;
        self.distance += other.distance;
    }
}

impl Add for WeightTimeDistance {
    type Output = Self;

    fn add(mut self, other: Self) -> Self {
        self += other;
        self
    }
}

impl SubAssign for WeightTimeDistance {
    fn sub_assign(&mut self, other: Self) {
        self.weight -= other.weight;
        self.time -= other.time;
        self.distance -= other.distance;
    }
}

impl Sub for WeightTimeDistance {
    type Output = Self;

    fn sub(mut self, other: Self) -> Self {
        self -= other;
        self
    }
}

impl Pod for WeightTimeDistance {
    const SIZE: usize = 12;

    fn encode_le(&self, out: &mut Vec<u8>) {
        self.weight.encode_le(out);
        self.time.encode_le(out);
        self.distance.encode_le(out);
    }

    fn decode_le(bytes: &[u8]) -> Self {
        Self {
            weight: u32::decode_le(&bytes[0..4]),
            time: u32::decode_le(&bytes[4..8]),
            distance: u32::decode_le(&bytes[8..12]),
        }
    }
}

/// A weight-decorated CSR graph, ready for shortest-path queries.
pub type RoutingGraph = CostDecorator<WeightTimeDistance, CsrGraph>;
