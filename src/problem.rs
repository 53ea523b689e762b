//! Search problems: a space together with where to start and where to go.

use derive_more::Display;
use thiserror::Error;

use crate::space::Action;
use crate::space::Cost;
use crate::space::Space;
use crate::space::State;

/// Which end of a query was at fault.
#[derive(Copy, Clone, Debug, Display, PartialEq, Eq)]
pub enum Endpoint {
    #[display("start")]
    Start,
    #[display("goal")]
    Goal,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SearchError {
    /// A query endpoint is not part of the space. No search is attempted.
    #[error("The {endpoint} {node} is not part of the search space")]
    NotFound { endpoint: Endpoint, node: String },
}

impl SearchError {
    pub fn not_found(endpoint: Endpoint, node: impl std::fmt::Debug) -> Self {
        SearchError::NotFound {
            endpoint,
            node: format!("{node:?}"),
        }
    }
}

pub trait Problem<Sp, St, A, C>: std::fmt::Debug
where
    Sp: Space<St, A, C>,
    St: State,
    A: Action,
    C: Cost,
{
    fn space(&self) -> &Sp;
    fn start(&self) -> &St;
    fn goal(&self) -> &St;

    fn is_goal(&self, s: &St) -> bool {
        self.goal() == s
    }

    /// Checks that both endpoints belong to the space.
    fn validate(&self) -> Result<(), SearchError> {
        let space = self.space();
        if !space.valid(self.start()) {
            return Err(SearchError::not_found(Endpoint::Start, self.start()));
        }
        if !space.valid(self.goal()) {
            return Err(SearchError::not_found(Endpoint::Goal, self.goal()));
        }
        Ok(())
    }
}

/// A problem over a borrowed space.
#[derive(Debug)]
pub struct Query<'s, Sp, St> {
    space: &'s Sp,
    start: St,
    goal: St,
}

impl<'s, Sp, St> Query<'s, Sp, St> {
    pub fn new(space: &'s Sp, start: St, goal: St) -> Self {
        Self { space, start, goal }
    }
}

impl<Sp, St, A, C> Problem<Sp, St, A, C> for Query<'_, Sp, St>
where
    Sp: Space<St, A, C>,
    St: State,
    A: Action,
    C: Cost,
{
    fn space(&self) -> &Sp {
        self.space
    }
    fn start(&self) -> &St {
        &self.start
    }
    fn goal(&self) -> &St {
        &self.goal
    }
}

/// An estimate of the cost left from a state to the goal.
///
/// Searches only return optimal paths with admissible heuristics, that is,
/// heuristics that never overestimate. Any `Fn(&St, &St) -> C` works.
pub trait Heuristic<St, C> {
    fn h(&self, s: &St, goal: &St) -> C;
}

impl<St, C, F> Heuristic<St, C> for F
where
    F: Fn(&St, &St) -> C,
{
    #[inline(always)]
    fn h(&self, s: &St, goal: &St) -> C {
        self(s, goal)
    }
}

/// Knows nothing, which turns A* into Dijkstra.
#[derive(Copy, Clone, Debug, Default)]
pub struct ZeroHeuristic;

impl<St, C: Cost> Heuristic<St, C> for ZeroHeuristic {
    #[inline(always)]
    fn h(&self, _s: &St, _goal: &St) -> C {
        C::zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_message() {
        let e = SearchError::not_found(Endpoint::Goal, "Cafeteria");
        assert_eq!(
            e.to_string(),
            "The goal \"Cafeteria\" is not part of the search space"
        );
    }

    #[test]
    fn closures_are_heuristics() {
        let manhattan = |a: &(i32, i32), b: &(i32, i32)| -> u32 {
            a.0.abs_diff(b.0) + a.1.abs_diff(b.1)
        };
        assert_eq!(manhattan.h(&(0, 0), &(2, -3)), 5);
        assert_eq!(Heuristic::<(i32, i32), u32>::h(&ZeroHeuristic, &(0, 0), &(2, -3)), 0);
    }
}
