//! Indexed k-ary min-heap with decrease-key.

use std::hash::Hash;

use rustc_hash::FxHashMap;

// heap index stored for elements that have been popped
const REMOVED: usize = usize::MAX;

/// A (key, weight) pair as stored in and returned from the heap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeapElement<K, W> {
    pub key: K,
    pub weight: W,
}

#[derive(Debug, Clone)]
struct HeapEntry<K, W> {
    weight: W,
    key: K,
    element: usize,
}

#[derive(Debug, Clone)]
struct Element<K, W> {
    data: HeapElement<K, W>,
    heap_index: usize,
}

/// Min-heap over (key, weight) pairs laid out as a k-ary tree, with an
/// auxiliary key index enabling `update` in O(log_k n).
///
/// Entries order by `(weight, key)`, so sift outcomes are deterministic
/// under weight ties. A popped key stays known to the heap: [`Self::contains`]
/// turns false but [`Self::entry`] keeps answering with the settled pair,
/// which is what path reconstruction leans on.
#[derive(Debug, Clone)]
pub struct KAryHeap<K, W, const ARITY: usize = 2> {
    heap: Vec<HeapEntry<K, W>>,
    elements: Vec<Element<K, W>>,
    index: FxHashMap<K, usize>,
}

impl<K, W, const ARITY: usize> KAryHeap<K, W, ARITY>
where
    K: Copy + Eq + Hash + Ord,
    W: Clone + Ord,
{
    pub fn new() -> Self {
        assert!(ARITY >= 2, "heap arity must be at least 2");
        Self {
            heap: Vec::new(),
            elements: Vec::new(),
            index: FxHashMap::default(),
        }
    }

    pub fn clear(&mut self) {
        self.heap.clear();
        self.elements.clear();
        self.index.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Add a new element. The key must not currently occupy a heap slot.
    pub fn push(&mut self, key: K, weight: W) {
        assert!(!self.contains(key), "key is already on the heap");
        self.index.insert(key, self.elements.len());
        self.elements.push(Element {
            data: HeapElement {
                key,
                weight: weight.clone(),
            },
            heap_index: self.heap.len(),
        });
        self.heap.push(HeapEntry {
            weight,
            key,
            element: self.elements.len() - 1,
        });
        self.sift_up(self.heap.len() - 1);
    }

    /// The current minimum, if any.
    pub fn peek(&self) -> Option<&HeapElement<K, W>> {
        self.heap.first().map(|entry| &self.elements[entry.element].data)
    }

    /// Remove and return the minimum. Its last-known pair stays
    /// retrievable through [`Self::entry`].
    pub fn pop(&mut self) -> Option<HeapElement<K, W>> {
        if self.heap.is_empty() {
            return None;
        }
        let min = self.heap[0].element;
        let last = self.heap.len() - 1;
        self.swap(0, last);
        self.elements[self.heap[last].element].heap_index = REMOVED;
        self.heap.pop();
        if !self.heap.is_empty() {
            self.sift_down(0);
        }
        Some(self.elements[min].data.clone())
    }

    /// True iff the key currently occupies a heap slot.
    pub fn contains(&self, key: K) -> bool {
        self.index
            .get(&key)
            .map_or(false, |&element| self.elements[element].heap_index != REMOVED)
    }

    /// The last-known pair for a key ever pushed, popped or not.
    pub fn entry(&self, key: K) -> Option<HeapElement<K, W>> {
        self.index
            .get(&key)
            .map(|&element| self.elements[element].data.clone())
    }

    /// Change the weight of a key currently on the heap, sifting up on a
    /// decrease and down on an increase.
    pub fn update(&mut self, key: K, weight: W) {
        let element = *self
            .index
            .get(&key)
            .expect("update of a key never pushed onto the heap");
        let heap_index = self.elements[element].heap_index;
        assert!(heap_index != REMOVED, "update of a key no longer on the heap");

        let increased = weight > self.elements[element].data.weight;
        self.elements[element].data.weight = weight.clone();
        self.heap[heap_index].weight = weight;
        if increased {
            self.sift_down(heap_index);
        } else {
            self.sift_up(heap_index);
        }
    }

    fn less(lhs: &HeapEntry<K, W>, rhs: &HeapEntry<K, W>) -> bool {
        (&lhs.weight, &lhs.key) < (&rhs.weight, &rhs.key)
    }

    fn swap(&mut self, from: usize, to: usize) {
        self.heap.swap(from, to);
        self.elements[self.heap[from].element].heap_index = from;
        self.elements[self.heap[to].element].heap_index = to;
    }

    fn sift_up(&mut self, mut index: usize) {
        while index > 0 {
            let parent = (index - 1) / ARITY;
            if !Self::less(&self.heap[index], &self.heap[parent]) {
                return;
            }
            self.swap(index, parent);
            index = parent;
        }
    }

    fn sift_down(&mut self, mut index: usize) {
        loop {
            let base = index * ARITY + 1;
            if base >= self.heap.len() {
                return;
            }
            let end = (base + ARITY).min(self.heap.len());
            let mut smallest = base;
            for child in base + 1..end {
                if Self::less(&self.heap[child], &self.heap[smallest]) {
                    smallest = child;
                }
            }
            if !Self::less(&self.heap[smallest], &self.heap[index]) {
                return;
            }
            self.swap(index, smallest);
            index = smallest;
        }
    }
}

impl<K, W, const ARITY: usize> Default for KAryHeap<K, W, ARITY>
where
    K: Copy + Eq + Hash + Ord,
    W: Clone + Ord,
{
    fn default() -> Self {
        Self::new()
    }
}
