//! Weighted quick-union with path compression.

/// Groups elements of a fixed universe `0..u` into disjoint sets.
///
/// One signed array holds the whole forest: a non-negative value is a
/// parent index, a negative value marks a root whose absolute value is the
/// size of its set. Operations are amortised near-constant.
#[derive(Debug, Clone)]
pub struct UnionFind {
    reps: Vec<i64>,
}

impl UnionFind {
    /// Every element starts out as its own singleton set.
    pub fn new(universe: usize) -> Self {
        Self {
            reps: vec![-1; universe],
        }
    }

    pub fn len(&self) -> usize {
        self.reps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reps.is_empty()
    }

    /// The representative of the set containing `element`, compressing the
    /// visited path onto the root.
    pub fn find(&mut self, element: u64) -> u64 {
        let mut root = element;
        while self.reps[root as usize] >= 0 {
            root = self.reps[root as usize] as u64;
        }

        let mut current = element;
        while current != root {
            let parent = self.reps[current as usize] as u64;
            self.reps[current as usize] = root as i64;
            current = parent;
        }

        root
    }

    /// Merge the sets containing `lhs` and `rhs`, attaching the smaller
    /// set under the larger. Merging a set with itself is a no-op.
    pub fn unite(&mut self, lhs: u64, rhs: u64) {
        let lhs_rep = self.find(lhs);
        let rhs_rep = self.find(rhs);
        if lhs_rep == rhs_rep {
            return;
        }

        let lhs_size = -self.reps[lhs_rep as usize];
        let rhs_size = -self.reps[rhs_rep as usize];
        if lhs_size < rhs_size {
            self.reps[rhs_rep as usize] -= lhs_size;
            self.reps[lhs_rep as usize] = rhs_rep as i64;
        } else {
            self.reps[lhs_rep as usize] -= rhs_size;
            self.reps[rhs_rep as usize] = lhs_rep as i64;
        }
    }
}
