//! Search spaces.
//!
//! A search space is a graph-like structure where from a given state we can
//! find the actions that take us to neighbouring states, and how much each of
//! those actions costs.

use std::fmt::Debug;
use std::hash::Hash;

use num_traits::SaturatingAdd;
use num_traits::Zero;
use num_traits::bounds::UpperBounded;
use smallvec::SmallVec;

pub trait Action: Copy + Clone + Debug + PartialEq + Eq {}
pub trait State: Copy + Clone + Debug + PartialEq + Eq + Hash {}
pub trait Cost:
    Copy
    + Clone
    + Debug
    + std::fmt::Display
    + PartialEq
    + Eq
    + PartialOrd
    + Ord
    + SaturatingAdd
    + Zero
    + num_traits::One
    + UpperBounded
    + std::ops::Add<Self, Output = Self>
    + std::ops::Sub<Self, Output = Self>
    + std::ops::AddAssign
{
    #[inline(always)]
    fn valid(&self) -> bool {
        *self != Self::max_value()
    }

    /// Whether this value can weight an edge.
    ///
    /// Negative weights break the guarantee that expanded states are final.
    #[inline(always)]
    fn valid_weight(&self) -> bool {
        *self >= Self::zero() && self.valid()
    }
}

impl Cost for u32 {}
impl Cost for u64 {}

/// Neighbours of a state.
///
/// Grids have at most 4, so they never spill to the heap.
pub type Neighbours<St, A> = SmallVec<[(St, A); 8]>;

/// A path through a search space.
///
/// `actions[i]` takes `states[i]` to `states[i + 1]`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Path<St, A, C>
where
    St: State,
    A: Action,
    C: Cost,
{
    pub states: Vec<St>,
    pub actions: Vec<A>,
    pub cost: C,
}

impl<St, A, C> Path<St, A, C>
where
    St: State,
    A: Action,
    C: Cost,
{
    #[inline(always)]
    pub fn new_from_start(start: St) -> Self {
        Self {
            states: vec![start],
            actions: vec![],
            cost: C::zero(),
        }
    }

    #[inline(always)]
    pub fn start(&self) -> St {
        self.states[0]
    }
    #[inline(always)]
    pub fn end(&self) -> St {
        self.states[self.states.len() - 1]
    }

    /// Number of actions taken.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.actions.len()
    }
    /// Whether the path stays on its start.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    #[inline(always)]
    pub fn append(&mut self, last_action: (St, A), c: C) {
        let (s, a) = last_action;
        self.actions.push(a);
        self.states.push(s);
        self.cost = self.cost.saturating_add(&c);
    }

    /// Reverses the Path.
    ///
    /// Useful when naturally reconstructing paths in reverse, in which case
    /// the actions need to be appended paired with the state they leave from.
    pub fn reverse(&mut self) {
        self.states.reverse();
        self.actions.reverse();
    }
}

impl<St, A, C> std::fmt::Display for Path<St, A, C>
where
    St: State,
    A: Action,
    C: Cost,
{
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        const MAX_STATES_DISPLAYED: usize = 20;

        write!(f, "Path({}, [", self.cost)?;
        for (i, s) in self.states.iter().take(MAX_STATES_DISPLAYED).enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{s:?}")?;
        }
        if self.states.len() > MAX_STATES_DISPLAYED {
            write!(f, " ...")?;
        }
        write!(f, "])")
    }
}

pub trait Space<St, A, C>: std::fmt::Debug
where
    St: State,
    A: Action,
    C: Cost,
{
    fn apply(&self, s: &St, a: &A) -> Option<St>;

    /// Cost of taking `a` from `s`.
    fn cost(&self, _s: &St, _a: &A) -> C {
        C::one()
    }
    /// Expands a State
    fn neighbours(&self, s: &St) -> Neighbours<St, A>;
    /// Verify is a State is valid.
    fn valid(&self, s: &St) -> bool;

    /// Checks that the actions of a path lead through its states, and that
    /// its cost adds up.
    fn valid_path(&self, p: &Path<St, A, C>) -> bool {
        if p.states.len() != p.actions.len() + 1 {
            return false;
        }
        if !self.valid(&p.states[0]) {
            return false;
        }

        let mut cost = C::zero();
        for (i, a) in p.actions.iter().enumerate() {
            let state = &p.states[i];
            match self.apply(state, a) {
                Some(next) if next == p.states[i + 1] => {
                    cost = cost.saturating_add(&self.cost(state, a));
                }
                _ => return false,
            }
        }
        cost == p.cost
    }

    fn size(&self) -> Option<usize> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
    struct Counter(u32);
    impl State for Counter {}

    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    struct Inc;
    impl Action for Inc {}

    #[derive(Debug)]
    struct Line(u32);

    impl Space<Counter, Inc, u32> for Line {
        fn apply(&self, s: &Counter, _a: &Inc) -> Option<Counter> {
            (s.0 + 1 < self.0).then_some(Counter(s.0 + 1))
        }
        fn neighbours(&self, s: &Counter) -> Neighbours<Counter, Inc> {
            self.apply(s, &Inc).map(|n| (n, Inc)).into_iter().collect()
        }
        fn valid(&self, s: &Counter) -> bool {
            s.0 < self.0
        }
    }

    #[test]
    fn reversed_reconstruction() {
        // Built from the end, as search trees do.
        let mut p = Path::<Counter, Inc, u32>::new_from_start(Counter(2));
        p.append((Counter(1), Inc), 1);
        p.append((Counter(0), Inc), 1);
        p.reverse();

        assert_eq!(p.states, vec![Counter(0), Counter(1), Counter(2)]);
        assert_eq!(p.start(), Counter(0));
        assert_eq!(p.end(), Counter(2));
        assert_eq!(p.len(), 2);
        assert_eq!(p.cost, 2);
        assert!(Line(3).valid_path(&p));
        assert!(!Line(2).valid_path(&p));
    }

    #[test]
    fn cost_mismatch_is_invalid() {
        let mut p = Path::<Counter, Inc, u32>::new_from_start(Counter(0));
        p.append((Counter(1), Inc), 1);
        p.reverse();
        p.cost = 7;
        assert!(!Line(3).valid_path(&p));
    }

    #[test]
    fn single_state_path() {
        let p = Path::<Counter, Inc, u32>::new_from_start(Counter(1));
        assert!(p.is_empty());
        assert_eq!(p.start(), p.end());
        assert!(Line(3).valid_path(&p));
        assert_eq!(p.to_string(), "Path(0, [Counter(1)])");
    }

    #[test]
    fn weights() {
        assert!(0u32.valid_weight());
        assert!(!u32::MAX.valid_weight());
    }
}
