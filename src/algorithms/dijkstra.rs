//! Implementation of Dijkstra's path-finding algorithm.
//!
//! Kept deliberately apart from the A* machinery. It shares no frontier code
//! with it, so it can check A* results independently.

use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::fmt::Debug;
use std::marker::PhantomData;

use rustc_hash::FxHashMap;

use crate::problem::Problem;
use crate::problem::Query;
use crate::problem::SearchError;
use crate::search::SearchStats;
use crate::space::Action;
use crate::space::Cost;
use crate::space::Path;
use crate::space::Space;
use crate::space::State;

/// A reached state.
#[derive(Clone, Debug)]
struct Slot<St, A, C> {
    state: St,
    g: C,
    /// Slot of the parent and the action taken from it.
    parent: Option<(usize, A)>,
    closed: bool,
}

/// Dijkstra search for a single start and goal.
///
/// The frontier is a `BinaryHeap` with lazy deletion: improving a state
/// pushes a new entry and stale ones are skipped when popped. Entries rank on
/// `(g, slot)`, where slots are handed out in discovery order.
pub struct DijkstraSearch<P, Sp, St, A, C>
where
    P: Problem<Sp, St, A, C>,
    Sp: Space<St, A, C>,
    St: State,
    A: Action,
    C: Cost,
{
    open: BinaryHeap<Reverse<(C, usize)>>,
    slots: Vec<Slot<St, A, C>>,
    slot_of: FxHashMap<St, usize>,

    problem: P,
    stats: SearchStats,
    done: bool,

    _phantom_space: PhantomData<Sp>,
}

impl<P, Sp, St, A, C> DijkstraSearch<P, Sp, St, A, C>
where
    P: Problem<Sp, St, A, C>,
    Sp: Space<St, A, C>,
    St: State,
    A: Action,
    C: Cost,
{
    /// Initialises the Search
    pub fn new(problem: P) -> Result<Self, SearchError> {
        problem.validate()?;

        let start = *problem.start();
        let mut search = Self {
            open: BinaryHeap::with_capacity(256),
            slots: vec![],
            slot_of: FxHashMap::default(),

            problem,
            stats: SearchStats::default(),
            done: false,

            _phantom_space: PhantomData,
        };
        search.push_new(start, None, C::zero());

        Ok(search)
    }

    /// Runs the search until the goal is expanded.
    #[must_use]
    pub fn find_path(&mut self) -> Option<Path<St, A, C>> {
        if self.done {
            return None;
        }

        while let Some(Reverse((g, slot))) = self.open.pop() {
            let current = &mut self.slots[slot];
            if current.closed || current.g != g {
                continue;
            }
            current.closed = true;
            let state = current.state;
            self.stats.expanded += 1;

            if self.problem.is_goal(&state) {
                self.done = true;
                let path = self.path(slot);
                log::debug!("Dijkstra reached the goal. {path} ({})", self.stats);
                return Some(path);
            }

            for (s, a) in self.problem.space().neighbours(&state) {
                let new_g = g.saturating_add(&self.problem.space().cost(&state, &a));
                if !new_g.valid() {
                    log::warn!("Cost overflow reaching {s:?} from {state:?}, ignoring that edge");
                    continue;
                }

                match self.slot_of.get(&s).copied() {
                    Some(neigh) => {
                        let neigh_slot = &mut self.slots[neigh];
                        if !neigh_slot.closed && new_g < neigh_slot.g {
                            neigh_slot.g = new_g;
                            neigh_slot.parent = Some((slot, a));
                            self.open.push(Reverse((new_g, neigh)));
                        }
                    }
                    None => self.push_new(s, Some((slot, a)), new_g),
                }
            }
        }

        self.done = true;
        log::debug!("Dijkstra exhausted the frontier. No path ({})", self.stats);
        None
    }

    pub fn stats(&self) -> SearchStats {
        self.stats
    }

    fn push_new(&mut self, state: St, parent: Option<(usize, A)>, g: C) {
        let slot = self.slots.len();
        self.slots.push(Slot {
            state,
            g,
            parent,
            closed: false,
        });
        self.slot_of.insert(state, slot);
        self.open.push(Reverse((g, slot)));
        self.stats.generated += 1;
    }

    fn path(&self, mut slot: usize) -> Path<St, A, C> {
        let mut path = Path::<St, A, C>::new_from_start(self.slots[slot].state);

        while let Some((parent, a)) = self.slots[slot].parent {
            let s = self.slots[parent].state;
            let c: C = self.problem.space().cost(&s, &a);
            path.append((s, a), c);
            slot = parent;
        }

        path.reverse();
        path
    }
}

impl<P, Sp, St, A, C> Debug for DijkstraSearch<P, Sp, St, A, C>
where
    P: Problem<Sp, St, A, C>,
    Sp: Space<St, A, C>,
    St: State,
    A: Action,
    C: Cost,
{
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("DijkstraSearch")
            .field("problem", &self.problem)
            .field("slots", &self.slots.len())
            .field("open", &self.open.len())
            .field("stats", &self.stats)
            .finish()
    }
}

/// Finds a cheapest path from `start` to `goal` without a heuristic.
///
/// Same contract as [`crate::algorithms::astar::astar`].
pub fn dijkstra<Sp, St, A, C>(
    space: &Sp,
    start: St,
    goal: St,
) -> Result<Option<Path<St, A, C>>, SearchError>
where
    Sp: Space<St, A, C>,
    St: State,
    A: Action,
    C: Cost,
{
    let mut search = DijkstraSearch::<_, Sp, St, A, C>::new(Query::new(space, start, goal))?;
    Ok(search.find_path())
}
