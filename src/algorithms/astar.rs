//! Implementation of the A* path-finding algorithm.

use std::fmt::Debug;
use std::marker::PhantomData;

use rustc_hash::FxHashMap;

use crate::data_structures::intrusive_heap::IntrusiveHeap;
use crate::problem::Heuristic;
use crate::problem::Problem;
use crate::problem::Query;
use crate::problem::SearchError;
use crate::search::SearchStats;
use crate::search::SearchTree;
use crate::search::SearchTreeIndex;
use crate::search::SearchTreeNode;
use crate::space::Action;
use crate::space::Cost;
use crate::space::Path;
use crate::space::Space;
use crate::space::State;

/// The ranking tuple for A*
///
/// We prefer better f-values, and tie break for lower h.
///
/// Intuition around higher g-value might be slightly easier, but keeping the
/// raw h value helps to avoid recomputing it later.
///
/// ```
/// use pathsearch::algorithms::astar::AStarRank;
///
/// assert!(AStarRank::new(2u32, 0u32) < AStarRank::new(2u32, 1u32));
/// // Same f-value, needs tie-breaking on h
/// assert!(AStarRank::new(2u32, 0u32) < AStarRank::new(0u32, 2u32));
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct AStarRank<C: Cost> {
    f: C,
    h: C,
}
impl<C> AStarRank<C>
where
    C: Cost,
{
    pub fn new(g: C, h: C) -> Self {
        Self {
            f: g.saturating_add(&h),
            h,
        }
    }
    pub fn f(&self) -> C {
        self.f
    }
    pub fn h(&self) -> C {
        self.h
    }
    /// Improves `g` in `Rank{f, h}` without recomputing `h`.
    pub fn improve_g(&mut self, new_g: C) {
        self.f = new_g.saturating_add(&self.h);
    }
}

/// A* search for a single start and goal.
///
/// Frontier ties on `(f, h)` are broken by node creation order, so the same
/// input always expands the same nodes and yields the same path.
pub struct AStarSearch<P, H, Sp, St, A, C>
where
    P: Problem<Sp, St, A, C>,
    H: Heuristic<St, C>,
    Sp: Space<St, A, C>,
    St: State,
    A: Action,
    C: Cost,
{
    /// All the Search Nodes. Naturally forms a Search Tree as each node may
    /// have a parent Node.
    search_tree: SearchTree<St, A, C>,

    /// An intrusive heap of `(AStarRank, SearchTreeIndex)` that keeps the
    /// referenced node updated (`SearchTreeNode::heap_index`).
    /// This allows re-ranking a `SearchTreeNode` in the heap without a linear
    /// search for its `(AStarRank, SearchTreeIndex)` entry.
    open: IntrusiveHeap<AStarRank<C>, SearchTreeIndex>,

    /// Amalgamation of,
    /// - The `HashMap<St, &mut SearchTreeNode>`, but using `SearchTreeIndex`
    ///   - To find existing Search Nodes from their `State`.
    /// - The "Closed Set" `HashSet<St>`
    ///   - To recall whether we had already explored a state.
    ///
    /// It's the same size as the Search Tree.
    node_map: FxHashMap<St, SearchTreeIndex>,

    problem: P,
    heuristic: H,
    stats: SearchStats,
    /// Set once the goal was reached or the frontier ran dry.
    done: bool,

    _phantom_space: PhantomData<Sp>,
    _phantom_action: PhantomData<A>,
}

impl<P, H, Sp, St, A, C> AStarSearch<P, H, Sp, St, A, C>
where
    P: Problem<Sp, St, A, C>,
    H: Heuristic<St, C>,
    Sp: Space<St, A, C>,
    St: State,
    A: Action,
    C: Cost,
{
    /// Initialises the search from the problem's start.
    ///
    /// Fails without searching when an endpoint is not part of the space.
    pub fn new(problem: P, heuristic: H) -> Result<Self, SearchError> {
        problem.validate()?;

        let start = *problem.start();
        let mut search = Self {
            search_tree: SearchTree::<St, A, C>::new(),
            open: IntrusiveHeap::with_capacity(256),
            node_map: FxHashMap::default(),

            problem,
            heuristic,
            stats: SearchStats::default(),
            done: false,

            _phantom_space: PhantomData,
            _phantom_action: PhantomData,
        };

        let h = search.h(&start);
        search.push_new(&start, None, C::zero(), h);
        log::debug!(
            "A* from {:?} to {:?} (h={h})",
            start,
            search.problem.goal()
        );

        Ok(search)
    }

    /// Runs the search until the goal is expanded.
    ///
    /// Returns `None` when the goal is unreachable, and on any call after the
    /// search finished.
    #[must_use]
    pub fn find_path(&mut self) -> Option<Path<St, A, C>> {
        #[cfg(feature = "coz_profile")]
        coz::scope!("FindPath");

        if self.done {
            return None;
        }

        while let Some(node_index) = self.pop() {
            #[cfg(feature = "coz_profile")]
            coz::scope!("NodeExpansion");

            let state = *self.search_tree[node_index].state();
            let g: C = self.search_tree[node_index].g();
            debug_assert!(!self.is_closed(&state));

            // Mark as closed
            self.mark_closed(&state);
            self.stats.expanded += 1;

            if self.problem.is_goal(&state) {
                self.done = true;
                let path = self.search_tree.path(self.problem.space(), node_index);
                log::debug!("A* reached the goal. {path} ({})", self.stats);
                return Some(path);
            }

            // Expand state
            for (s, a) in self.problem.space().neighbours(&state) {
                #[cfg(feature = "coz_profile")]
                coz::scope!("ReachNode");

                let c: C = self.problem.space().cost(&state, &a);
                let new_g = g.saturating_add(&c);
                if !new_g.valid() {
                    // Saturated costs would tie with each other.
                    log::warn!("Cost overflow reaching {s:?} from {state:?}, ignoring that edge");
                    continue;
                }

                // Have we seen this State?
                match self.node_map.get(&s).copied() {
                    Some(neigh_index) if neigh_index.is_closed() => {
                        // Yes, and we expanded the State already. Only an
                        // inconsistent heuristic gets us here with a better
                        // path, in which case the State goes back to the
                        // frontier.
                        if new_g < self.search_tree[neigh_index].g() {
                            self.reopen(&s, neigh_index, (node_index, a), new_g);
                        }
                    }
                    Some(neigh_index) => {
                        // Yes, but it's still unexplored. Update the existing
                        // Node if needed.
                        let neigh = &mut self.search_tree[neigh_index];
                        if new_g < neigh.g {
                            // Found better path to existing node
                            neigh.reach((node_index, a), new_g);
                            let heap_index = neigh.heap_index;
                            let mut rank = self.open.rank(heap_index);
                            rank.improve_g(new_g);
                            self.open.improve(heap_index, rank, &mut self.search_tree);
                        }
                    }
                    None => {
                        // No, let's create a new Node for it.
                        let h = self.h(&s);
                        self.push_new(&s, Some((node_index, a)), new_g, h);
                    }
                }
            }
        }

        self.done = true;
        log::debug!("A* exhausted the frontier. No path ({})", self.stats);
        None
    }

    pub fn stats(&self) -> SearchStats {
        self.stats
    }
    pub fn problem(&self) -> &P {
        &self.problem
    }

    #[inline(always)]
    #[must_use]
    fn h(&self, s: &St) -> C {
        self.heuristic.h(s, self.problem.goal())
    }

    #[inline(always)]
    #[must_use]
    pub(crate) fn is_closed(&self, s: &St) -> bool {
        match self.node_map.get(s) {
            Some(node_index) => node_index.is_closed(),
            None => false,
        }
    }
    #[inline(always)]
    fn mark_closed(&mut self, s: &St) {
        match self.node_map.get_mut(s) {
            Some(node_index) => {
                if !node_index.is_closed() {
                    node_index.set_closed();
                }
            }
            None => {
                unreachable!("Tried closing a state without a node");
            }
        }
    }

    #[inline(always)]
    #[must_use]
    fn pop(&mut self) -> Option<SearchTreeIndex> {
        self.open
            .pop(&mut self.search_tree)
            .map(|heap_node| heap_node.item)
    }

    #[inline(always)]
    fn push_new(&mut self, s: &St, parent: Option<(SearchTreeIndex, A)>, g: C, h: C) {
        debug_assert!(!self.node_map.contains_key(s));

        // 1. Add SearchTreeNode to search_tree
        let node_index: SearchTreeIndex = self
            .search_tree
            .push(SearchTreeNode::<St, A, C>::new(*s, parent, g));

        // 2. Add entry to node_map
        debug_assert!(!node_index.is_closed());
        self.node_map.insert(*s, node_index);

        // 3. Add the node to open using its SearchTreeIndex
        self.open
            .push(AStarRank::new(g, h), node_index, &mut self.search_tree);
        self.stats.generated += 1;
    }

    fn reopen(
        &mut self,
        s: &St,
        mut node_index: SearchTreeIndex,
        parent: (SearchTreeIndex, A),
        g: C,
    ) {
        self.search_tree[node_index].reach(parent, g);

        node_index.set_open();
        self.node_map.insert(*s, node_index);

        let h = self.h(s);
        self.open
            .push(AStarRank::new(g, h), node_index, &mut self.search_tree);
        self.stats.reopened += 1;
        log::trace!("Reopened {s:?} with g={g}");
    }

    pub fn write_memory_stats<W: std::io::Write>(&self, mut out: W) -> std::io::Result<()> {
        use size::Size;
        use std::mem::size_of;
        use thousands::Separable;

        writeln!(out, "AStarSearch Stats:")?;
        let s = size_of::<SearchTreeNode<St, A, C>>();
        let l = self.search_tree.len();
        let c = self.search_tree.capacity();
        writeln!(
            out,
            "  - |Nodes|:  {} ({})",
            l.separate_with_commas(),
            Size::from_bytes(l * s)
        )?;
        writeln!(
            out,
            "  - |Nodes|*: {} ({})",
            c.separate_with_commas(),
            Size::from_bytes(c * s)
        )?;

        let s = size_of::<(AStarRank<C>, SearchTreeIndex)>();
        let l = self.open.len();
        let c = self.open.capacity();
        writeln!(
            out,
            "  - |Open|:   {} ({})",
            l.separate_with_commas(),
            Size::from_bytes(l * s)
        )?;
        writeln!(
            out,
            "  - |Open|*:  {} ({})",
            c.separate_with_commas(),
            Size::from_bytes(c * s)
        )?;

        let s = size_of::<(St, SearchTreeIndex)>();
        let l = self.node_map.len();
        let c = self.node_map.capacity();
        writeln!(
            out,
            "  - |Index|:  {} ({})",
            l.separate_with_commas(),
            Size::from_bytes(l * s)
        )?;
        writeln!(
            out,
            "  - |Index|*: {} ({})",
            c.separate_with_commas(),
            Size::from_bytes(c * s)
        )?;

        writeln!(
            out,
            "  - Expanded nodes: {}",
            self.stats.expanded.separate_with_commas()
        )?;

        Ok(())
    }
}

impl<P, H, Sp, St, A, C> Debug for AStarSearch<P, H, Sp, St, A, C>
where
    P: Problem<Sp, St, A, C>,
    H: Heuristic<St, C>,
    Sp: Space<St, A, C>,
    St: State,
    A: Action,
    C: Cost,
{
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("AStarSearch")
            .field("problem", &self.problem)
            .field("search_tree", &self.search_tree)
            .field("open", &self.open.len())
            .field("stats", &self.stats)
            .finish()
    }
}

/// Finds a cheapest path from `start` to `goal`.
///
/// `Ok(None)` means the goal is unreachable, which is different from an
/// endpoint not being part of the space.
///
/// ```
/// use pathsearch::algorithms::astar::astar;
/// use pathsearch::problem::ZeroHeuristic;
/// use pathsearch::problems::graph::LabeledGraph;
///
/// let graph = LabeledGraph::<u32>::try_from("A B 1\nB C 1\nA C 3").unwrap();
/// let a = graph.node("A").unwrap();
/// let c = graph.node("C").unwrap();
///
/// let path = astar(&graph, a, c, ZeroHeuristic).unwrap().unwrap();
/// assert_eq!(graph.labels_of(&path.states), vec!["A", "B", "C"]);
/// assert_eq!(path.cost, 2);
/// ```
pub fn astar<Sp, St, A, C, H>(
    space: &Sp,
    start: St,
    goal: St,
    heuristic: H,
) -> Result<Option<Path<St, A, C>>, SearchError>
where
    Sp: Space<St, A, C>,
    St: State,
    A: Action,
    C: Cost,
    H: Heuristic<St, C>,
{
    let mut search =
        AStarSearch::<_, _, Sp, St, A, C>::new(Query::new(space, start, goal), heuristic)?;
    Ok(search.find_path())
}
