//! Farmer, wolf, goat and cabbage: four flags, four moves, unit costs.

use std::convert::Infallible;

use dorado_search::{AStar, ActionId, Edge, SearchSpace};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct Bank {
    farmer: bool,
    wolf: bool,
    goat: bool,
    cabbage: bool,
}

impl Bank {
    fn key(self) -> u8 {
        self.farmer as u8 | (self.wolf as u8) << 1 | (self.goat as u8) << 2 | (self.cabbage as u8) << 3
    }

    fn all_across(self) -> bool {
        self.farmer && self.wolf && self.goat && self.cabbage
    }
}

/// Legal moves from `state`: 4 takes the cabbage, 3 the goat, 2 the wolf,
/// 1 crosses alone.
fn moves(state: Bank) -> Vec<Edge<Bank>> {
    let mut edges = Vec::new();
    if state.farmer == state.cabbage && state.wolf != state.goat {
        edges.push(Edge::new(
            Bank {
                farmer: !state.farmer,
                cabbage: !state.cabbage,
                ..state
            },
            1,
            ActionId(4),
        ));
    }
    if state.farmer == state.goat {
        edges.push(Edge::new(
            Bank {
                farmer: !state.farmer,
                goat: !state.goat,
                ..state
            },
            1,
            ActionId(3),
        ));
    }
    if state.farmer == state.wolf && state.goat != state.cabbage {
        edges.push(Edge::new(
            Bank {
                farmer: !state.farmer,
                wolf: !state.wolf,
                ..state
            },
            1,
            ActionId(2),
        ));
    }
    if state.wolf != state.goat && state.goat != state.cabbage {
        edges.push(Edge::new(
            Bank {
                farmer: !state.farmer,
                ..state
            },
            1,
            ActionId(1),
        ));
    }
    edges
}

struct River<G> {
    goal: G,
}

impl<G: Fn(Bank) -> bool> SearchSpace for River<G> {
    type State = Bank;
    type Id = u8;
    type Error = Infallible;

    fn id(&self, state: &Bank) -> u8 {
        state.key()
    }

    fn is_goal(&mut self, state: &Bank) -> Result<bool, Infallible> {
        Ok((self.goal)(*state))
    }

    fn successors(&mut self, state: &Bank) -> Result<Vec<Edge<Bank>>, Infallible> {
        Ok(moves(*state))
    }
}

#[test]
fn crossing_takes_seven_moves() {
    let mut space = River {
        goal: Bank::all_across,
    };
    let (path, metrics) = AStar::new()
        .search_with_metrics(&mut space, Bank::default())
        .unwrap();

    assert_eq!(path.len(), 7);
    assert_eq!(path.steps.len(), 8);
    assert_eq!(path.steps[0].action, None);
    assert_eq!(path.steps[0].state, Bank::default());
    assert!(path.final_state().is_some_and(|bank| bank.all_across()));

    // First and last moves must ferry the goat.
    let actions: Vec<ActionId> = path.actions().collect();
    assert_eq!(actions.first(), Some(&ActionId(3)));
    assert_eq!(actions.last(), Some(&ActionId(3)));

    // Every step is one of the legal moves from its predecessor.
    for pair in path.steps.windows(2) {
        let legal = moves(pair[0].state);
        assert!(legal
            .iter()
            .any(|edge| edge.state == pair[1].state && Some(edge.action) == pair[1].action));
    }

    assert!(metrics.known_states <= 16);
    assert!(metrics.expanded_states >= 7);
}

#[test]
fn unreachable_goal_yields_empty_path() {
    // The goat can never be left alone with the cabbage on the far bank
    // while the farmer and wolf stay behind.
    let mut space = River {
        goal: |bank: Bank| !bank.farmer && !bank.wolf && bank.goat && bank.cabbage,
    };
    let (path, metrics) = AStar::new()
        .search_with_metrics(&mut space, Bank::default())
        .unwrap();

    assert!(path.is_empty());
    assert_eq!(path.actions().count(), 0);
    assert_eq!(metrics.expanded_states, metrics.known_states);
    assert!(!metrics.budget_exhausted);
}
