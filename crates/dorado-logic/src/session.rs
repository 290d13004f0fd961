//! Planning session context.
//!
//! A [`Session`] owns the interner, the expression arena and the group table
//! for one planning run. Nothing is global: independent sessions can live side
//! by side (each on its own thread if needed), and `reset` clears all three
//! tables between runs.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write as _;

use crate::expr::{Expr, ExprKey, ExprKind};
use crate::store::ExprStore;
use crate::symbol::{Interner, SymbolId};
use crate::world::WorldKey;
use crate::{LogicError, Result};

/// Group id -> sorted member symbols.
pub type Groups = BTreeMap<SymbolId, Vec<SymbolId>>;

#[derive(Debug, Default, Clone)]
pub struct Session {
    interner: Interner,
    store: ExprStore,
    groups: Groups,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn interner(&self) -> &Interner {
        &self.interner
    }

    pub fn store(&self) -> &ExprStore {
        &self.store
    }

    pub(crate) fn store_mut(&mut self) -> &mut ExprStore {
        &mut self.store
    }

    pub fn intern(&mut self, text: &str) -> SymbolId {
        self.interner.intern(text)
    }

    pub fn register_constant(&mut self, text: &str) -> ExprKey {
        let symbol = self.interner.intern(text);
        self.store.constant(symbol)
    }

    /// Registers `text` as a variable; an empty `group` leaves it unqualified.
    pub fn register_variable(&mut self, text: &str, group: &str) -> ExprKey {
        let symbol = self.interner.intern(text);
        let group = self.interner.intern(group);
        self.store.variable(symbol, group)
    }

    pub fn register_expression(&mut self, kind: ExprKind, args: &[ExprKey]) -> Result<ExprKey> {
        self.store.logical(kind, args.iter().copied().collect())
    }

    pub fn node(&self, key: ExprKey) -> Result<&Expr> {
        self.store.get(key)
    }

    /// Members of a group; unknown groups are empty.
    pub fn group_members(&self, group: SymbolId) -> &[SymbolId] {
        self.groups.get(&group).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn groups(&self) -> &Groups {
        &self.groups
    }

    /// Replaces the group table. The empty name is the unnamed group.
    pub fn set_groups<N, M, S>(&mut self, groups: impl IntoIterator<Item = (N, M)>)
    where
        N: AsRef<str>,
        M: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.groups.clear();
        for (name, members) in groups {
            let group = self.interner.intern(name.as_ref());
            let entry = self.groups.entry(group).or_default();
            entry.extend(members.into_iter().map(|m| self.interner.intern(m.as_ref())));
            entry.sort_unstable();
            entry.dedup();
        }
    }

    /// Builds the initial world from atom texts and installs `groups` as the
    /// session's quantification domains.
    pub fn make_world<A, N, M, S>(
        &mut self,
        atoms: impl IntoIterator<Item = A>,
        groups: impl IntoIterator<Item = (N, M)>,
    ) -> Result<WorldKey>
    where
        A: AsRef<str>,
        N: AsRef<str>,
        M: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.set_groups(groups);

        let mut keys = BTreeSet::new();
        for text in atoms {
            keys.insert(self.parse(text.as_ref())?);
        }
        Ok(self.store.world(keys.into_iter().collect()))
    }

    /// Clears interner, arena and groups.
    pub fn reset(&mut self) {
        tracing::debug!(nodes = self.store.len(), symbols = self.interner.len(), "resetting session");
        self.interner.reset();
        self.store.clear();
        self.groups.clear();
    }

    pub fn word(&self, symbol: SymbolId) -> Result<&str> {
        self.interner
            .resolve(symbol)
            .ok_or(LogicError::UnknownSymbol(symbol.index()))
    }

    /// Renders a node back to s-expression text.
    pub fn render(&self, key: ExprKey) -> Result<String> {
        let mut out = String::new();
        self.render_into(key, &mut out)?;
        Ok(out)
    }

    fn render_into(&self, key: ExprKey, out: &mut String) -> Result<()> {
        match self.store.get(key)? {
            Expr::Constant(symbol) => out.push_str(self.word(*symbol)?),
            Expr::Variable(var) => {
                out.push_str(self.word(var.symbol)?);
                if !var.group.is_none() {
                    let _ = write!(out, " - {}", self.word(var.group)?);
                }
            }
            Expr::World(atoms) => {
                out.push_str("World:");
                for &atom in atoms {
                    out.push(' ');
                    self.render_into(atom, out)?;
                }
            }
            node => {
                let kind = node.kind();
                out.push('(');
                let mut first = true;
                if let Some(op) = kind.operator() {
                    out.push_str(op);
                    first = false;
                }
                for (position, &arg) in node.args().iter().enumerate() {
                    if !first {
                        out.push(' ');
                    }
                    first = false;
                    let binder = kind.is_quantifier() && position == 0;
                    if binder {
                        out.push('(');
                    }
                    self.render_into(arg, out)?;
                    if binder {
                        out.push(')');
                    }
                }
                out.push(')');
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_round_trips_reader_output() {
        let mut session = Session::new();
        let text = "(and (not (on a b)) (forall (?v - block) (imply (clear ?v) (= ?v a))))";
        let key = session.parse(text).unwrap();
        assert_eq!(session.render(key).unwrap(), text);
    }

    #[test]
    fn test_render_world() {
        let mut session = Session::new();
        let world = session
            .make_world(["(on a b)"], [("", vec!["a", "b"])])
            .unwrap();
        assert_eq!(session.render(world.key()).unwrap(), "World: (on a b)");
    }

    #[test]
    fn test_groups_are_replaced_by_make_world() {
        let mut session = Session::new();
        session
            .make_world(Vec::<&str>::new(), [("block", vec!["b", "a", "a"])])
            .unwrap();
        let block = session.intern("block");
        assert_eq!(session.group_members(block).len(), 2);

        session
            .make_world(Vec::<&str>::new(), [("table", vec!["t"])])
            .unwrap();
        assert!(session.group_members(block).is_empty());
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut session = Session::new();
        session
            .make_world(["(on a b)"], [("", vec!["a", "b"])])
            .unwrap();
        session.reset();

        assert!(session.store().is_empty());
        assert!(session.groups().is_empty());
        assert!(session.interner().is_empty());
    }

    #[test]
    fn test_unknown_key_is_an_error() {
        let session = Session::new();
        let mut other = Session::new();
        let key = other.register_constant("x");
        assert!(matches!(
            session.render(key),
            Err(LogicError::UnknownExpression(_))
        ));
    }
}
