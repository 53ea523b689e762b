//! Data structures backing the search frontier.

pub mod intrusive_heap;
