use std::cmp::min;
use std::fmt::Debug;

use crate::heap_primitives::derank;

type HeapIndex = usize;

/// Where the heap reports element moves.
///
/// Elements are small handles (`I`) to nodes that live elsewhere, typically in
/// a search tree. Every time the heap moves a handle it tells the owner of the
/// node its new position, so the node can later be re-ranked in place without
/// a linear search through the heap.
pub trait HeapPositions<I> {
    fn heap_index(&self, item: I) -> HeapIndex;
    fn set_heap_index(&mut self, item: I, heap_index: HeapIndex);
}

/// A heap element.
///
/// Ordered by `rank` first and `item` second, so equally ranked elements pop
/// in `item` order.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct HeapEntry<R, I> {
    pub rank: R,
    pub item: I,
}

const HEAP_ARITY: usize = 8usize;
#[inline(always)]
#[must_use]
fn up(i: usize) -> usize {
    crate::heap_primitives::index_parent::<HEAP_ARITY>(i)
}
#[inline(always)]
#[must_use]
fn down_left(i: usize) -> usize {
    crate::heap_primitives::index_first_children::<HEAP_ARITY>(i)
}

/// "Intrusive" Heap
///
/// A min-heap that keeps the position of each of its elements up to date in a
/// remote structure (see [`HeapPositions`]). This allows re-ranking an element
/// in `O(log n)` once its rank improves.
///
/// Callers pass the positions sink on every mutating call, which lets the heap
/// and the sink be sibling fields of the same search struct.
#[derive(Debug)]
pub struct IntrusiveHeap<R, I> {
    heap: Vec<HeapEntry<R, I>>,
}

impl<R, I> IntrusiveHeap<R, I>
where
    R: Ord + Copy + Debug,
    I: Ord + Copy + Debug,
{
    pub fn new() -> Self {
        Self { heap: vec![] }
    }
    pub fn with_capacity(s: usize) -> Self {
        Self {
            heap: Vec::with_capacity(s),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
    pub fn len(&self) -> usize {
        self.heap.len()
    }
    pub fn capacity(&self) -> usize {
        self.heap.capacity()
    }
    pub fn clear(&mut self) {
        self.heap.clear();
    }

    pub fn peek(&self) -> Option<&HeapEntry<R, I>> {
        self.heap.first()
    }
    pub fn rank(&self, heap_index: HeapIndex) -> R {
        self.heap[heap_index].rank
    }

    /// Inserts an item and returns where it landed.
    pub fn push<P: HeapPositions<I>>(&mut self, rank: R, item: I, positions: &mut P) -> HeapIndex {
        let heap_index = self.heap.len(); // Future heap_index

        self.heap.push(HeapEntry { rank, item });
        positions.set_heap_index(item, heap_index);
        let heap_index = self._unsafe_sift_up(heap_index, positions);

        self.verify_heap(positions);
        heap_index
    }

    /// Removes the best element.
    ///
    /// The popped item keeps its last heap index in `positions`, which is
    /// stale from now on.
    pub fn pop<P: HeapPositions<I>>(&mut self, positions: &mut P) -> Option<HeapEntry<R, I>> {
        #[cfg(feature = "coz_profile")]
        coz::scope!("Pop");

        let last = self.heap.len().checked_sub(1)?;
        if last > 0 {
            self._unsafe_swap(0, last, positions);
        }
        let top = self.heap.pop()?;
        if !self.heap.is_empty() {
            self._unsafe_sift_down(0, positions);
        }

        self.verify_heap(positions);
        Some(top)
    }

    /// Lowers the rank of the element at `heap_index`.
    ///
    /// Returns its new index.
    pub fn improve<P: HeapPositions<I>>(
        &mut self,
        heap_index: HeapIndex,
        rank: R,
        positions: &mut P,
    ) -> HeapIndex {
        debug_assert!(
            rank <= self.heap[heap_index].rank,
            "improve() can't worsen {:?} into {rank:?}",
            self.heap[heap_index]
        );
        self.heap[heap_index].rank = rank;
        let heap_index = self._unsafe_sift_up(heap_index, positions);

        self.verify_heap(positions);
        heap_index
    }

    #[inline(always)]
    #[cfg(not(feature = "verify"))]
    pub(crate) fn verify_heap<P: HeapPositions<I>>(&self, _positions: &P) {
        // All good... (hopefully)
    }

    #[inline(always)]
    #[cfg(feature = "verify")]
    pub(crate) fn verify_heap<P: HeapPositions<I>>(&self, positions: &P) {
        // Every node,
        for i in 0..self.heap.len() {
            // - Has the right intrusive index set.
            assert_eq!(positions.heap_index(self.heap[i].item), i);

            // - Goes after its parent node, if any.
            if i == 0 {
                continue;
            }
            let p = up(i);
            assert!(
                self.heap[p] <= self.heap[i],
                "Node[{p}]={:?} !<= child [{i}]={:?}. Out of heap of len={}",
                self.heap[p],
                self.heap[i],
                self.heap.len(),
            );
        }
    }

    // Implementation details

    /// Raises a node
    /// Returns its new index
    #[inline(always)]
    fn _unsafe_sift_up<P: HeapPositions<I>>(&mut self, mut index: usize, positions: &mut P) -> usize {
        debug_assert!(
            index < self.heap.len(),
            "Node is way out of sync. Index out of bounds..."
        );

        while index > 0 {
            let parent = up(index);
            if self.heap[parent] <= self.heap[index] {
                break;
            }
            self._unsafe_swap(parent, index, positions);
            index = parent;
        }
        index
    }

    /// Lowers a node
    /// Returns its new index
    #[inline(always)]
    fn _unsafe_sift_down<P: HeapPositions<I>>(&mut self, mut index: usize, positions: &mut P) -> usize {
        let len = self.heap.len();
        debug_assert!(
            index < len,
            "Node is way out of sync. Index out of bounds..."
        );

        loop {
            // Find the best child
            let mut child = down_left(index);
            if child >= len {
                break;
            }
            child += derank(&self.heap[child..min(child + HEAP_ARITY, len)]);

            if self.heap[index] <= self.heap[child] {
                break;
            }

            self._unsafe_swap(index, child, positions);
            index = child;
        }
        index
    }

    /// Swaps two elements in the heap.
    ///
    /// For consistency in calling code `l < r` is checked.
    ///
    /// Keeps the intrusive indices in sync.
    #[inline(always)]
    fn _unsafe_swap<P: HeapPositions<I>>(&mut self, l: usize, r: usize, positions: &mut P) {
        debug_assert!(l < r, "Swap({l}, {r}) uses wrong argument order");

        let len = self.heap.len();
        debug_assert!(l < len, "Left  swap index {l} is OUT OF BOUNDS({len})");
        debug_assert!(r < len, "Right swap index {r} is OUT OF BOUNDS({len})");
        self.heap.swap(l, r);
        positions.set_heap_index(self.heap[l].item, l);
        positions.set_heap_index(self.heap[r].item, r);
    }
}

impl<R, I> Default for IntrusiveHeap<R, I>
where
    R: Ord + Copy + Debug,
    I: Ord + Copy + Debug,
{
    fn default() -> Self {
        Self::new()
    }
}
