//! Worlds as an A* search space.

use dorado_logic::{ExprKey, Session, WorldKey};
use dorado_search::{Edge, SearchSpace};

use crate::grounding::ActionTable;
use crate::heuristic::Heuristic;
use crate::PlanError;

/// States are canonical worlds; every applicable ground action is a unit-cost
/// edge.
pub struct WorldSpace<'a> {
    session: &'a mut Session,
    actions: &'a ActionTable,
    goal: ExprKey,
    heuristic: &'a dyn Heuristic,
}

impl<'a> WorldSpace<'a> {
    pub fn new(
        session: &'a mut Session,
        actions: &'a ActionTable,
        goal: ExprKey,
        heuristic: &'a dyn Heuristic,
    ) -> Self {
        Self {
            session,
            actions,
            goal,
            heuristic,
        }
    }
}

impl SearchSpace for WorldSpace<'_> {
    type State = WorldKey;
    type Id = WorldKey;
    type Error = PlanError;

    fn id(&self, state: &WorldKey) -> WorldKey {
        *state
    }

    fn is_goal(&mut self, state: &WorldKey) -> Result<bool, PlanError> {
        Ok(self.session.evaluate(self.goal, *state)?)
    }

    fn heuristic(&mut self, state: &WorldKey) -> Result<u32, PlanError> {
        self.heuristic.estimate(self.session, *state)
    }

    fn successors(&mut self, state: &WorldKey) -> Result<Vec<Edge<WorldKey>>, PlanError> {
        let mut edges = Vec::new();
        for action in self.actions {
            if self.session.evaluate(action.precondition, *state)? {
                let next = self.session.apply(*state, action.effect)?;
                edges.push(Edge::new(next, 1, action.id));
            }
        }
        Ok(edges)
    }
}
