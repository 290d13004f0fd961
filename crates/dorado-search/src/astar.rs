use core::cmp::Ordering;
use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BinaryHeap};
use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::{ActionId, Path, PathStep, SearchMetrics, SearchSpace};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Stop after this many expansions. `None` searches until the frontier
    /// is empty.
    pub max_expansions: Option<usize>,
}

/// Registry entry for a known state.
#[derive(Debug)]
struct NodeRecord<S, I> {
    state: S,
    heuristic: u32,
    cost: u32,
    previous: Option<I>,
    action: Option<ActionId>,
    visited: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct OpenNode<I> {
    f: u32,
    tie: u64,
    id: I,
}

impl<I: Ord> Ord for OpenNode<I> {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering to make BinaryHeap behave like a min-heap; equal
        // priorities pop in insertion order.
        (other.f, other.tie).cmp(&(self.f, self.tie))
    }
}

impl<I: Ord> PartialOrd for OpenNode<I> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A* search with lazy deletion.
///
/// The goal test runs when a state is popped, before the visited check.
/// Successors that were already expanded are never reopened.
#[derive(Debug, Clone, Default)]
pub struct AStar {
    config: SearchConfig,
}

impl AStar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(mut self, config: SearchConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn search<P: SearchSpace>(
        &self,
        space: &mut P,
        start: P::State,
    ) -> Result<Path<P::State>, P::Error> {
        self.search_with_metrics(space, start).map(|(path, _)| path)
    }

    /// Runs the search and reports its counters. An exhausted frontier (or
    /// budget) yields an empty path, not an error.
    pub fn search_with_metrics<P: SearchSpace>(
        &self,
        space: &mut P,
        start: P::State,
    ) -> Result<(Path<P::State>, SearchMetrics), P::Error> {
        let started = Instant::now();
        let mut metrics = SearchMetrics {
            visited_states: 1,
            ..SearchMetrics::default()
        };

        let mut open = BinaryHeap::<OpenNode<P::Id>>::new();
        let mut known: BTreeMap<P::Id, NodeRecord<P::State, P::Id>> = BTreeMap::new();
        let mut tie: u64 = 0;

        let start_id = space.id(&start);
        let start_h = space.heuristic(&start)?;
        known.insert(
            start_id,
            NodeRecord {
                state: start,
                heuristic: start_h,
                cost: 0,
                previous: None,
                action: None,
                visited: false,
            },
        );
        open.push(OpenNode {
            f: start_h,
            tie,
            id: start_id,
        });
        tie += 1;

        let mut goal = None;
        while let Some(node) = open.pop() {
            let Some(current) = known.get(&node.id) else {
                continue;
            };
            if space.is_goal(&current.state)? {
                goal = Some(node.id);
                break;
            }
            if current.visited {
                continue; // stale heap entry
            }
            if let Some(limit) = self.config.max_expansions {
                if metrics.expanded_states >= limit {
                    metrics.budget_exhausted = true;
                    break;
                }
            }

            let state = current.state.clone();
            let cost = current.cost;
            if let Some(current) = known.get_mut(&node.id) {
                current.visited = true;
            }

            let edges = space.successors(&state)?;
            metrics.expanded_states += 1;
            metrics.visited_states += edges.len();

            for edge in edges {
                let next_id = space.id(&edge.state);
                let next_cost = cost.saturating_add(edge.cost);
                let f = match known.entry(next_id) {
                    Entry::Vacant(slot) => {
                        let heuristic = space.heuristic(&edge.state)?;
                        slot.insert(NodeRecord {
                            state: edge.state,
                            heuristic,
                            cost: next_cost,
                            previous: Some(node.id),
                            action: Some(edge.action),
                            visited: false,
                        });
                        next_cost.saturating_add(heuristic)
                    }
                    Entry::Occupied(mut slot) => {
                        let record = slot.get_mut();
                        if record.visited || next_cost >= record.cost {
                            continue;
                        }
                        record.cost = next_cost;
                        record.previous = Some(node.id);
                        record.action = Some(edge.action);
                        next_cost.saturating_add(record.heuristic)
                    }
                };

                open.push(OpenNode {
                    f,
                    tie,
                    id: next_id,
                });
                tie += 1;
            }
        }

        metrics.known_states = known.len();
        let path = match goal {
            Some(id) => reconstruct(&mut known, id),
            None => Path::default(),
        };

        metrics.elapsed = started.elapsed();
        tracing::debug!(
            solved = path.is_solved(),
            actions = path.len(),
            known = metrics.known_states,
            expanded = metrics.expanded_states,
            budget_exhausted = metrics.budget_exhausted,
            "search finished"
        );
        Ok((path, metrics))
    }
}

/// Walks predecessor links back from `goal`, taking the states on the path
/// out of the registry.
fn reconstruct<S, I: Copy + Ord>(known: &mut BTreeMap<I, NodeRecord<S, I>>, goal: I) -> Path<S> {
    let mut steps = Vec::new();
    let mut cursor = Some(goal);
    while let Some(id) = cursor {
        let Some(record) = known.remove(&id) else {
            break;
        };
        cursor = record.previous;
        steps.push(PathStep {
            action: record.action,
            state: record.state,
        });
    }
    steps.reverse();
    Path::new(steps)
}
