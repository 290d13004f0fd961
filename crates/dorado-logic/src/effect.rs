//! Effect application.
//!
//! Effects never touch a world directly. They accumulate add and remove sets
//! which [`Session::apply`] folds into the successor world.

use crate::expr::{Expr, ExprKey};
use crate::session::Session;
use crate::world::{AtomSet, WorldKey};
use crate::{LogicError, Result, Role};

impl Session {
    /// Collects the atoms `effect` adds and removes when applied in `world`.
    ///
    /// `when` guards are evaluated against `world`; `not` swaps the two sets.
    pub fn apply_effect(
        &mut self,
        effect: ExprKey,
        world: WorldKey,
        add: &mut AtomSet,
        remove: &mut AtomSet,
    ) -> Result<()> {
        let node = self.node(effect)?.clone();
        match node {
            Expr::Atom(_) => {
                add.insert(effect);
            }
            Expr::And(args) => {
                for arg in args {
                    self.apply_effect(arg, world, add, remove)?;
                }
            }
            Expr::Not(args) => self.apply_effect(args[0], world, remove, add)?,
            Expr::When(args) => {
                if self.evaluate(args[0], world)? {
                    self.apply_effect(args[1], world, add, remove)?;
                }
            }
            Expr::Forall(args) => {
                for body in self.instances(args[0], args[1])? {
                    self.apply_effect(body, world, add, remove)?;
                }
            }
            other => return Err(not_an_effect(&other)),
        }
        Ok(())
    }

    /// World-independent over-approximation of [`apply_effect`](Self::apply_effect):
    /// every `when` contributes its effect regardless of the guard.
    pub fn apply_positive(
        &mut self,
        effect: ExprKey,
        add: &mut AtomSet,
        remove: &mut AtomSet,
    ) -> Result<()> {
        let node = self.node(effect)?.clone();
        match node {
            Expr::Atom(_) => {
                add.insert(effect);
            }
            Expr::And(args) => {
                for arg in args {
                    self.apply_positive(arg, add, remove)?;
                }
            }
            Expr::Not(args) => self.apply_positive(args[0], remove, add)?,
            Expr::When(args) => self.apply_positive(args[1], add, remove)?,
            Expr::Forall(args) => {
                for body in self.instances(args[0], args[1])? {
                    self.apply_positive(body, add, remove)?;
                }
            }
            other => return Err(not_an_effect(&other)),
        }
        Ok(())
    }
}

fn not_an_effect(node: &Expr) -> LogicError {
    LogicError::ExpressionKind {
        kind: node.kind(),
        role: Role::Effect,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::ExprKind;

    fn setup() -> (Session, WorldKey) {
        let mut session = Session::new();
        let world = session
            .make_world(
                ["(at p1 f0)", "(lift-at f0)"],
                [("", vec!["p1", "p2", "f0", "f1"]), ("passenger", vec!["p1", "p2"])],
            )
            .unwrap();
        (session, world)
    }

    #[test]
    fn test_conditional_effect_checks_guard() {
        let (mut session, world) = setup();
        let effect = session
            .parse(
                "(forall (?p - passenger) (when (at ?p f0) (and (boarded ?p) (not (at ?p f0)))))",
            )
            .unwrap();

        let mut add = AtomSet::new();
        let mut remove = AtomSet::new();
        session.apply_effect(effect, world, &mut add, &mut remove).unwrap();

        let boarded = session.parse("(boarded p1)").unwrap();
        let at = session.parse("(at p1 f0)").unwrap();
        assert_eq!(add.into_iter().collect::<Vec<_>>(), vec![boarded]);
        assert_eq!(remove.into_iter().collect::<Vec<_>>(), vec![at]);
    }

    #[test]
    fn test_positive_ignores_guard() {
        let (mut session, _) = setup();
        let effect = session
            .parse("(forall (?p - passenger) (when (at ?p f1) (boarded ?p)))")
            .unwrap();

        let mut add = AtomSet::new();
        let mut remove = AtomSet::new();
        session.apply_positive(effect, &mut add, &mut remove).unwrap();

        assert_eq!(add.len(), 2);
        assert!(remove.is_empty());
    }

    #[test]
    fn test_double_negation_adds() {
        let (mut session, world) = setup();
        let effect = session.parse("(not (not (lift-at f1)))").unwrap();
        let mut add = AtomSet::new();
        let mut remove = AtomSet::new();
        session.apply_effect(effect, world, &mut add, &mut remove).unwrap();
        assert_eq!(add.len(), 1);
        assert!(remove.is_empty());
    }

    #[test]
    fn test_non_effects_are_rejected() {
        let (mut session, world) = setup();
        for (text, kind) in [
            ("(or (a) (b))", ExprKind::Or),
            ("(= a b)", ExprKind::Equals),
            ("(imply (a) (b))", ExprKind::Imply),
            ("(exists (?x) (a ?x))", ExprKind::Exists),
        ] {
            let key = session.parse(text).unwrap();
            let mut add = AtomSet::new();
            let mut remove = AtomSet::new();
            let expected = LogicError::ExpressionKind {
                kind,
                role: Role::Effect,
            };
            assert_eq!(
                session.apply_effect(key, world, &mut add, &mut remove),
                Err(expected.clone())
            );
            assert_eq!(session.apply_positive(key, &mut add, &mut remove), Err(expected));
        }
    }
}
