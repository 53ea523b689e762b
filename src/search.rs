use std::fmt::Debug;

use derive_more::Display;

use crate::data_structures::intrusive_heap::HeapPositions;
use crate::space::Action;
use crate::space::Cost;
use crate::space::Path;
use crate::space::Space;
use crate::space::State;

/// The least-significant bit.
const LEAST_SIGNIFICANT_BIT: usize = 1usize;
/// The bit used to track `is_closed: bool` within indices.
///
/// Indices are stored shifted left by one, so the lowest bit is free to
/// carry whether the node was already expanded.
const IS_CLOSED_BIT: usize = LEAST_SIGNIFICANT_BIT;

/// A reference to a `SearchTreeNode<St, A, C>`.
///
/// It's more like a `(usize, bool)` underneath to help track whether the node
/// is closed. Ordering follows node creation order, the closed bit only
/// breaks ties between two handles to the same node.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct SearchTreeIndex {
    index: usize,
}

impl SearchTreeIndex {
    #[inline(always)]
    fn new(index: usize) -> Self {
        debug_assert!(index <= (usize::MAX >> 1), "Search tree is too large");
        Self { index: index << 1 }
    }

    /// Position of the node in creation order.
    #[inline(always)]
    pub fn get(&self) -> usize {
        self.index >> 1
    }

    #[inline(always)]
    pub fn is_closed(&self) -> bool {
        self.index & IS_CLOSED_BIT == IS_CLOSED_BIT
    }
    #[inline(always)]
    pub fn set_closed(&mut self) {
        debug_assert!(!self.is_closed());
        self.index |= IS_CLOSED_BIT;
    }
    /// Re-opens a closed node after finding a better path to it.
    #[inline(always)]
    pub fn set_open(&mut self) {
        debug_assert!(self.is_closed());
        self.index &= !IS_CLOSED_BIT;
    }
}

#[derive(Clone, Debug)]
pub struct SearchTreeNode<St, A, C>
where
    St: State,
    A: Action,
    C: Cost,
{
    pub(crate) parent: Option<(SearchTreeIndex, A)>,
    pub(crate) state: St,
    pub(crate) g: C,
    pub(crate) heap_index: usize,
}

impl<St, A, C> SearchTreeNode<St, A, C>
where
    St: State,
    A: Action,
    C: Cost,
{
    pub fn new(s: St, parent: Option<(SearchTreeIndex, A)>, g: C) -> Self {
        Self {
            parent,
            state: s,
            g,
            heap_index: usize::MAX,
        }
    }

    /// Gives this Node a better path through a new parent.
    pub fn reach(&mut self, new_parent: (SearchTreeIndex, A), g: C) {
        debug_assert!(g < self.g);
        self.parent = Some(new_parent);
        self.g = g;
    }

    pub fn state(&self) -> &St {
        &self.state
    }
    pub fn g(&self) -> C {
        self.g
    }
}

/// All the nodes reached by a search.
///
/// Each node may have a parent, so they naturally form a search tree rooted at
/// the start. The tree only grows while searching and is dropped with it.
pub(crate) struct SearchTree<St, A, C>
where
    St: State,
    A: Action,
    C: Cost,
{
    nodes: Vec<SearchTreeNode<St, A, C>>,
}

impl<St, A, C> SearchTree<St, A, C>
where
    St: State,
    A: Action,
    C: Cost,
{
    #[inline(always)]
    #[must_use]
    pub(crate) fn new() -> Self {
        Self { nodes: vec![] }
    }

    #[inline(always)]
    pub(crate) fn push(&mut self, node: SearchTreeNode<St, A, C>) -> SearchTreeIndex {
        let index = SearchTreeIndex::new(self.nodes.len());
        self.nodes.push(node);
        index
    }

    #[inline(always)]
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }
    #[inline(always)]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.nodes.capacity()
    }

    /// Follows parent pointers from `node_index` back to the root.
    #[must_use]
    pub fn path<Sp: Space<St, A, C>>(
        &self,
        space: &Sp,
        mut node_index: SearchTreeIndex,
    ) -> Path<St, A, C> {
        #[cfg(feature = "coz_profile")]
        coz::scope!("PathReconstruction");

        let e = &self[node_index];
        let mut path = Path::<St, A, C>::new_from_start(*e.state());

        while let Some((parent_index, a)) = self[node_index].parent {
            let p = &self[parent_index];
            let s = p.state();
            let c: C = space.cost(s, &a);

            path.append((*s, a), c);
            debug_assert!(node_index.get() != parent_index.get());
            node_index = parent_index;
        }

        path.reverse();
        path
    }
}

impl<St, A, C> Default for SearchTree<St, A, C>
where
    St: State,
    A: Action,
    C: Cost,
{
    #[inline(always)]
    fn default() -> Self {
        Self::new()
    }
}

impl<St, A, C> std::ops::Index<SearchTreeIndex> for SearchTree<St, A, C>
where
    St: State,
    A: Action,
    C: Cost,
{
    type Output = SearchTreeNode<St, A, C>;

    #[inline(always)]
    fn index(&self, index: SearchTreeIndex) -> &Self::Output {
        &self.nodes[index.get()]
    }
}

impl<St, A, C> std::ops::IndexMut<SearchTreeIndex> for SearchTree<St, A, C>
where
    St: State,
    A: Action,
    C: Cost,
{
    #[inline(always)]
    fn index_mut(&mut self, index: SearchTreeIndex) -> &mut SearchTreeNode<St, A, C> {
        &mut self.nodes[index.get()]
    }
}

/// Nodes keep track of where the frontier holds them.
impl<St, A, C> HeapPositions<SearchTreeIndex> for SearchTree<St, A, C>
where
    St: State,
    A: Action,
    C: Cost,
{
    #[inline(always)]
    fn heap_index(&self, item: SearchTreeIndex) -> usize {
        self[item].heap_index
    }
    #[inline(always)]
    fn set_heap_index(&mut self, item: SearchTreeIndex, heap_index: usize) {
        self[item].heap_index = heap_index;
    }
}

impl<St, A, C> std::fmt::Debug for SearchTree<St, A, C>
where
    St: State,
    A: Action,
    C: Cost,
{
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "SearchTree{{({} nodes)}}", self.len())
    }
}

/// Counters of the work done by a search.
#[derive(Copy, Clone, Debug, Default, Display, PartialEq, Eq)]
#[display("expanded={expanded} generated={generated} reopened={reopened}")]
pub struct SearchStats {
    /// Nodes popped from the frontier and expanded.
    pub expanded: usize,
    /// Nodes created, including the start.
    pub generated: usize,
    /// Closed nodes re-inserted after finding a cheaper path to them.
    pub reopened: usize,
}
