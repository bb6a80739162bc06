//! A growable binary max-heap used to track the best-so-far candidates
//! during tree queries.

use crate::error::Result;
use crate::r#type::Coord;

/// Capacity grows by this factor when the heap is full. Kept below 2 so a
/// heap that is already large does not overshoot far past its working set.
const GROWTH_NUMERATOR: usize = 3;
const GROWTH_DENOMINATOR: usize = 2;

/// An entry in a [`BoundedMaxHeap`]: a point index paired with the value it
/// is ordered by (a distance, for tree queries).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeapItem<N: Coord> {
    /// Index of the point in the tree's coordinate buffer.
    pub index: u32,
    /// The heap key.
    pub value: N,
}

/// An array-backed binary max-heap with a soft capacity.
///
/// During a k-nearest-neighbor query the heap holds the current `n` best
/// candidates keyed by distance, with the worst of them at the root where it
/// can be peeked in constant time. Inserting into a full heap grows the
/// capacity rather than failing; the capacity never shrinks.
///
/// Comparisons are strictly-greater only, so entries with equal values keep
/// no particular relative order.
#[derive(Debug, Clone)]
pub struct BoundedMaxHeap<N: Coord> {
    items: Vec<HeapItem<N>>,
    capacity: usize,
}

impl<N: Coord> BoundedMaxHeap<N> {
    /// Create a heap with storage pre-reserved for `capacity` entries.
    ///
    /// The only failure mode is the allocation itself.
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        let mut items = Vec::new();
        items.try_reserve_exact(capacity)?;
        Ok(Self { items, capacity })
    }

    /// The number of entries currently in the heap.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the heap holds no entries.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The current capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Insert an entry, growing the heap first if it is full.
    ///
    /// A failed growth allocation is reported; the heap is unchanged in that
    /// case.
    pub fn insert(&mut self, index: u32, value: N) -> Result<()> {
        if self.items.len() == self.capacity {
            self.grow()?;
        }
        self.items.push(HeapItem { index, value });
        self.sift_up(self.items.len() - 1);
        Ok(())
    }

    /// The entry with the largest value, without removing it.
    pub fn peek_max(&self) -> Option<&HeapItem<N>> {
        self.items.first()
    }

    /// Remove and return the entry with the largest value.
    pub fn pop_max(&mut self) -> Option<HeapItem<N>> {
        if self.items.is_empty() {
            return None;
        }
        let last = self.items.len() - 1;
        self.items.swap(0, last);
        let item = self.items.pop();
        if self.items.len() > 1 {
            self.sift_down(0);
        }
        item
    }

    fn grow(&mut self) -> Result<()> {
        let new_capacity = (self.capacity * GROWTH_NUMERATOR / GROWTH_DENOMINATOR)
            .max(self.capacity + 1);
        self.items
            .try_reserve_exact(new_capacity - self.items.len())?;
        self.capacity = new_capacity;
        Ok(())
    }

    /// Promote the entry at `index` while it is strictly greater than its
    /// parent.
    fn sift_up(&mut self, mut index: usize) {
        while index > 0 {
            let parent = (index - 1) / 2;
            if self.items[index].value > self.items[parent].value {
                self.items.swap(index, parent);
                index = parent;
            } else {
                break;
            }
        }
    }

    /// Demote the entry at `index` while a strictly greater child exists,
    /// always swapping with the larger child.
    fn sift_down(&mut self, mut index: usize) {
        loop {
            let mut greatest = index;
            let left = 2 * index + 1;
            let right = 2 * index + 2;

            if left < self.items.len() && self.items[left].value > self.items[greatest].value {
                greatest = left;
            }
            if right < self.items.len() && self.items[right].value > self.items[greatest].value {
                greatest = right;
            }

            if greatest == index {
                break;
            }
            self.items.swap(index, greatest);
            index = greatest;
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn assert_heap_property(heap: &BoundedMaxHeap<f64>) {
        for i in 1..heap.items.len() {
            let parent = (i - 1) / 2;
            assert!(
                heap.items[parent].value >= heap.items[i].value,
                "heap property violated at {i}"
            );
        }
    }

    #[test]
    fn empty_heap_signals_empty() {
        let mut heap = BoundedMaxHeap::<f64>::with_capacity(4).unwrap();
        assert!(heap.is_empty());
        assert!(heap.peek_max().is_none());
        assert!(heap.pop_max().is_none());
    }

    #[test]
    fn drains_in_non_increasing_order() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut heap = BoundedMaxHeap::<f64>::with_capacity(64).unwrap();
        for i in 0..500u32 {
            heap.insert(i, rng.gen_range(0.0..1000.0)).unwrap();
            assert_heap_property(&heap);
            assert!(heap.len() <= heap.capacity());
        }

        let mut previous = f64::INFINITY;
        while let Some(item) = heap.pop_max() {
            assert!(item.value <= previous);
            previous = item.value;
            assert_heap_property(&heap);
        }
        assert!(heap.is_empty());
    }

    #[test]
    fn grows_when_full_and_keeps_contents() {
        let mut heap = BoundedMaxHeap::<f64>::with_capacity(2).unwrap();
        for i in 0..10u32 {
            heap.insert(i, f64::from(i)).unwrap();
        }
        assert_eq!(heap.len(), 10);
        assert!(heap.capacity() >= 10);

        let mut drained: Vec<u32> = Vec::new();
        while let Some(item) = heap.pop_max() {
            drained.push(item.index);
        }
        assert_eq!(drained, vec![9, 8, 7, 6, 5, 4, 3, 2, 1, 0]);
    }

    #[test]
    fn zero_capacity_heap_grows_on_first_insert() {
        let mut heap = BoundedMaxHeap::<f64>::with_capacity(0).unwrap();
        heap.insert(0, 1.0).unwrap();
        assert_eq!(heap.len(), 1);
        assert_eq!(heap.peek_max().unwrap().index, 0);
    }

    #[test]
    fn equal_values_do_not_swap() {
        let mut heap = BoundedMaxHeap::<f64>::with_capacity(4).unwrap();
        heap.insert(0, 5.0).unwrap();
        heap.insert(1, 5.0).unwrap();
        heap.insert(2, 5.0).unwrap();
        // The first insert stays at the root: later equal values never
        // displace it.
        assert_eq!(heap.peek_max().unwrap().index, 0);
    }
}
