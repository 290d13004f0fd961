//! Worlds and world transitions.
//!
//! A world is the set of ground atoms that currently hold. Worlds live in the
//! expression arena like any other node, so two worlds with the same atoms are
//! the same key.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::expr::ExprKey;
use crate::session::Session;
use crate::Result;

/// Add or remove list accumulated while applying an effect.
pub type AtomSet = BTreeSet<ExprKey>;

/// Key of a registered world node.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct WorldKey(ExprKey);

impl WorldKey {
    pub(crate) const fn new(key: ExprKey) -> Self {
        Self(key)
    }

    pub const fn key(self) -> ExprKey {
        self.0
    }
}

impl fmt::Debug for WorldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "World({})", self.0.index())
    }
}

impl From<WorldKey> for ExprKey {
    fn from(world: WorldKey) -> Self {
        world.0
    }
}

impl Session {
    /// Successor of `world` under `effect`: `(atoms − remove) ∪ add`.
    pub fn apply(&mut self, world: WorldKey, effect: ExprKey) -> Result<WorldKey> {
        let mut add = AtomSet::new();
        let mut remove = AtomSet::new();
        self.apply_effect(effect, world, &mut add, &mut remove)?;

        let atoms = self.store().atoms(world)?;
        let mut next: Vec<ExprKey> = Vec::with_capacity(atoms.len() + add.len());
        next.extend(atoms.iter().filter(|atom| !remove.contains(*atom)));
        next.extend(add);
        Ok(self.store_mut().world(next))
    }

    /// Whether `world` holds the atom `atom`.
    pub fn holds(&self, world: WorldKey, atom: ExprKey) -> Result<bool> {
        Ok(self.store().atoms(world)?.binary_search(&atom).is_ok())
    }

    /// Registers a world from explicit atom keys.
    pub fn world_from_atoms(&mut self, atoms: impl IntoIterator<Item = ExprKey>) -> WorldKey {
        self.store_mut().world(atoms.into_iter().collect())
    }
}
