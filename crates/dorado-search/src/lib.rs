//! Generic best-first (A*) search.
//!
//! The engine knows nothing about planning: any state type that can name
//! itself, test for the goal and list its successors can be searched.

#![forbid(unsafe_code)]

pub mod astar;
pub mod metrics;
pub mod path;

pub use astar::{AStar, SearchConfig};
pub use metrics::SearchMetrics;
pub use path::{Path, PathStep};

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of the action that produced an edge. Ids start at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActionId(pub u32);

impl fmt::Display for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One outgoing transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge<S> {
    pub state: S,
    pub cost: u32,
    pub action: ActionId,
}

impl<S> Edge<S> {
    pub fn new(state: S, cost: u32, action: ActionId) -> Self {
        Self {
            state,
            cost,
            action,
        }
    }
}

/// A state space the engine can explore.
///
/// Methods take `&mut self` so implementations can register new states in
/// their own canonical tables while expanding.
pub trait SearchSpace {
    type State: Clone;
    /// Identity of a state; equal ids are the same state.
    type Id: Copy + Ord;
    type Error;

    fn id(&self, state: &Self::State) -> Self::Id;

    fn is_goal(&mut self, state: &Self::State) -> Result<bool, Self::Error>;

    /// Estimated remaining cost. Defaults to zero (uniform-cost search).
    fn heuristic(&mut self, _state: &Self::State) -> Result<u32, Self::Error> {
        Ok(0)
    }

    /// Successors in a stable order.
    fn successors(&mut self, state: &Self::State) -> Result<Vec<Edge<Self::State>>, Self::Error>;
}
