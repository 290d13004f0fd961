//! Condition evaluation.

use crate::expr::{Expr, ExprKey};
use crate::session::Session;
use crate::world::WorldKey;
use crate::{LogicError, Result, Role};

impl Session {
    /// Whether `expr` holds in `world`.
    ///
    /// Quantifiers range over the session's group table; an empty group makes
    /// `exists` false and `forall` true.
    pub fn evaluate(&mut self, expr: ExprKey, world: WorldKey) -> Result<bool> {
        let node = self.node(expr)?.clone();
        match node {
            Expr::Atom(_) => self.holds(world, expr),
            Expr::And(args) => {
                for arg in args {
                    if !self.evaluate(arg, world)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            Expr::Or(args) => {
                for arg in args {
                    if self.evaluate(arg, world)? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
            Expr::Not(args) => Ok(!self.evaluate(args[0], world)?),
            Expr::Equals(args) => Ok(args[0] == args[1]),
            Expr::Imply(args) => Ok(!self.evaluate(args[0], world)? || self.evaluate(args[1], world)?),
            Expr::Exists(args) => {
                for body in self.instances(args[0], args[1])? {
                    if self.evaluate(body, world)? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
            Expr::Forall(args) => {
                for body in self.instances(args[0], args[1])? {
                    if !self.evaluate(body, world)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            other => Err(LogicError::ExpressionKind {
                kind: other.kind(),
                role: Role::Condition,
            }),
        }
    }

    /// Optimistic evaluation against a bounding pair of worlds.
    ///
    /// Atoms are tested against `max`; negation and implication antecedents
    /// swap the pair, so a negated atom fails only if it is in `min`.
    pub fn lax_evaluate(&mut self, expr: ExprKey, max: WorldKey, min: WorldKey) -> Result<bool> {
        let node = self.node(expr)?.clone();
        match node {
            Expr::Atom(_) => self.holds(max, expr),
            Expr::And(args) => {
                for arg in args {
                    if !self.lax_evaluate(arg, max, min)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            Expr::Or(args) => {
                for arg in args {
                    if self.lax_evaluate(arg, max, min)? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
            Expr::Not(args) => Ok(!self.lax_evaluate(args[0], min, max)?),
            Expr::Equals(args) => Ok(args[0] == args[1]),
            Expr::Imply(args) => {
                Ok(!self.lax_evaluate(args[0], min, max)? || self.lax_evaluate(args[1], max, min)?)
            }
            Expr::Exists(args) => {
                for body in self.instances(args[0], args[1])? {
                    if self.lax_evaluate(body, max, min)? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
            Expr::Forall(args) => {
                for body in self.instances(args[0], args[1])? {
                    if !self.lax_evaluate(body, max, min)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            other => Err(LogicError::ExpressionKind {
                kind: other.kind(),
                role: Role::Condition,
            }),
        }
    }

    /// `body` with the binder's symbol replaced by each member of its group.
    pub(crate) fn instances(&mut self, binder: ExprKey, body: ExprKey) -> Result<Vec<ExprKey>> {
        let var = match self.node(binder)? {
            Expr::Variable(var) => *var,
            other => {
                return Err(LogicError::ExpressionKind {
                    kind: other.kind(),
                    role: Role::QuantifierVariable,
                })
            }
        };
        let members = self.group_members(var.group).to_vec();
        members
            .into_iter()
            .map(|member| self.substitute(body, var.symbol, member))
            .collect()
    }
}
