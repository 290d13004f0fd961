//! Goal-distance estimates.

use std::cmp::Ordering;

use dorado_logic::{AtomSet, ExprKey, Session, WorldKey};

use crate::Result;

pub trait Heuristic {
    fn estimate(&self, session: &Session, world: WorldKey) -> Result<u32>;
}

/// Zero everywhere; turns A* into uniform-cost search.
#[derive(Debug, Clone, Copy, Default)]
pub struct Blind;

impl Heuristic for Blind {
    fn estimate(&self, _session: &Session, _world: WorldKey) -> Result<u32> {
        Ok(0)
    }
}

/// Number of positive goal atoms not yet true.
///
/// Negative goal literals and delete effects are ignored, so the estimate is
/// not admissible in general.
#[derive(Debug, Clone, Default)]
pub struct GoalCount {
    /// Sorted.
    atoms: Vec<ExprKey>,
}

impl GoalCount {
    /// Collects the goal's positive atoms. Fails if the goal contains a
    /// construct that cannot be read as an effect (`or`, `imply`, `exists`, `=`).
    pub fn new(session: &mut Session, goal: ExprKey) -> Result<Self> {
        let mut positive = AtomSet::new();
        let mut negative = AtomSet::new();
        session.apply_positive(goal, &mut positive, &mut negative)?;
        Ok(Self {
            atoms: positive.into_iter().collect(),
        })
    }

    pub fn atoms(&self) -> &[ExprKey] {
        &self.atoms
    }
}

impl Heuristic for GoalCount {
    fn estimate(&self, session: &Session, world: WorldKey) -> Result<u32> {
        Ok(missing(&self.atoms, session.store().atoms(world)?) as u32)
    }
}

/// `|goal \ present|` for two sorted slices.
fn missing(goal: &[ExprKey], present: &[ExprKey]) -> usize {
    let mut count = 0;
    let mut present = present.iter().peekable();
    for atom in goal {
        loop {
            match present.peek().map(|candidate| candidate.cmp(&atom)) {
                Some(Ordering::Less) => {
                    present.next();
                }
                Some(Ordering::Equal) => break,
                Some(Ordering::Greater) | None => {
                    count += 1;
                    break;
                }
            }
        }
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use dorado_logic::LogicError;
    use crate::PlanError;

    fn world(session: &mut Session, atoms: &[&str]) -> WorldKey {
        session
            .make_world(atoms.iter().copied(), [("", vec!["a", "b", "c"])])
            .unwrap()
    }

    #[test]
    fn test_counts_missing_positive_atoms() {
        let mut session = Session::new();
        let state = world(&mut session, &["(on a b)", "(clear a)"]);
        let goal = session
            .parse("(and (on a b) (on b c) (clear c) (not (clear a)))")
            .unwrap();
        let heuristic = GoalCount::new(&mut session, goal).unwrap();

        assert_eq!(heuristic.atoms().len(), 3);
        assert_eq!(heuristic.estimate(&session, state).unwrap(), 2);
        assert_eq!(Blind.estimate(&session, state).unwrap(), 0);
    }

    #[test]
    fn test_quantified_goal() {
        let mut session = Session::new();
        let state = world(&mut session, &["(done b)"]);
        let goal = session.parse("(forall (?x) (done ?x))").unwrap();
        let heuristic = GoalCount::new(&mut session, goal).unwrap();
        assert_eq!(heuristic.estimate(&session, state).unwrap(), 2);
    }

    #[test]
    fn test_disjunctive_goal_is_rejected() {
        let mut session = Session::new();
        let goal = session.parse("(or (p) (q))").unwrap();
        assert!(matches!(
            GoalCount::new(&mut session, goal),
            Err(PlanError::Logic(LogicError::ExpressionKind { .. }))
        ));
    }

    #[test]
    fn test_missing_merges_sorted_slices() {
        let mut session = Session::new();
        let keys: Vec<ExprKey> = ["(a)", "(b)", "(c)", "(d)"]
            .iter()
            .map(|text| session.parse(text).unwrap())
            .collect();
        let mut sorted = keys.clone();
        sorted.sort();

        assert_eq!(missing(&sorted, &[]), 4);
        assert_eq!(missing(&sorted, &sorted), 0);
        assert_eq!(missing(&sorted[..2], &sorted[1..]), 1);
        assert_eq!(missing(&[], &sorted), 0);
    }
}
