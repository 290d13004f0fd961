//! Canonical expression arena.
//!
//! Every node is stored exactly once. Compound nodes are keyed by their
//! variant tag plus the interning index of their child list, so registering
//! the same structure twice hands back the existing key.

use hashbrown::HashMap;

use crate::expr::{Args, Expr, ExprKey, ExprKind, Variable};
use crate::symbol::SymbolId;
use crate::world::WorldKey;
use crate::{LogicError, Result, Role};

#[derive(Debug, Default, Clone)]
pub struct ExprStore {
    nodes: HashMap<ExprKey, Expr>,
    /// Child sequence -> structural index. Shared by every compound kind; the
    /// tag in the key keeps kinds apart.
    signatures: HashMap<Args, u32>,
    next_index: u32,
}

impl ExprStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn signature_index(&mut self, signature: &[ExprKey]) -> u32 {
        if let Some(&index) = self.signatures.get(signature) {
            return index;
        }

        self.next_index += 1;
        let index = self.next_index;
        self.signatures.insert(Args::from_slice(signature), index);
        index
    }

    pub fn constant(&mut self, symbol: SymbolId) -> ExprKey {
        let key = ExprKey::compose(ExprKind::Constant, symbol.index());
        self.nodes.entry(key).or_insert(Expr::Constant(symbol));
        key
    }

    /// Registers a variable. Unqualified variables are keyed by their bare
    /// symbol id, so every unqualified occurrence of a name is one node.
    pub fn variable(&mut self, symbol: SymbolId, group: SymbolId) -> ExprKey {
        let key = if group.is_none() {
            ExprKey::from_symbol(symbol)
        } else {
            let index = self.signature_index(&[
                ExprKey::from_symbol(symbol),
                ExprKey::from_symbol(group),
            ]);
            ExprKey::compose(ExprKind::Variable, index)
        };
        self.nodes
            .entry(key)
            .or_insert(Expr::Variable(Variable { symbol, group }));
        key
    }

    /// Registers a compound node over already registered children.
    pub fn logical(&mut self, kind: ExprKind, args: Args) -> Result<ExprKey> {
        check_arity(kind, args.len())?;
        for &child in &args {
            if !self.nodes.contains_key(&child) {
                return Err(LogicError::UnknownExpression(child));
            }
        }
        if kind.is_quantifier() {
            let binder = self.get(args[0])?;
            if !matches!(binder, Expr::Variable(_)) {
                return Err(LogicError::ExpressionKind {
                    kind: binder.kind(),
                    role: Role::QuantifierVariable,
                });
            }
        }

        let key = ExprKey::compose(kind, self.signature_index(&args));
        if !self.nodes.contains_key(&key) {
            let node = Expr::logical(kind, args).ok_or(LogicError::ExpressionKind {
                kind,
                role: Role::Compound,
            })?;
            self.nodes.insert(key, node);
        }
        Ok(key)
    }

    /// Registers a world over the given atom keys (any order, duplicates allowed).
    pub fn world(&mut self, mut atoms: Vec<ExprKey>) -> WorldKey {
        atoms.sort_unstable();
        atoms.dedup();

        let key = ExprKey::compose(ExprKind::World, self.signature_index(&atoms));
        self.nodes.entry(key).or_insert(Expr::World(atoms));
        WorldKey::new(key)
    }

    pub fn get(&self, key: ExprKey) -> Result<&Expr> {
        self.nodes
            .get(&key)
            .ok_or(LogicError::UnknownExpression(key))
    }

    pub fn contains(&self, key: ExprKey) -> bool {
        self.nodes.contains_key(&key)
    }

    /// Sorted atom keys of a world.
    pub fn atoms(&self, world: WorldKey) -> Result<&[ExprKey]> {
        match self.get(world.key())? {
            Expr::World(atoms) => Ok(atoms),
            other => Err(LogicError::ExpressionKind {
                kind: other.kind(),
                role: Role::World,
            }),
        }
    }

    /// Number of registered nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.signatures.clear();
        self.next_index = 0;
    }
}

fn check_arity(kind: ExprKind, actual: usize) -> Result<()> {
    let expected = match kind {
        ExprKind::And | ExprKind::Or => return Ok(()),
        ExprKind::Atom if actual >= 1 => return Ok(()),
        ExprKind::Atom => "at least 1",
        ExprKind::Not if actual == 1 => return Ok(()),
        ExprKind::Not => "1",
        ExprKind::Equals | ExprKind::Imply | ExprKind::When | ExprKind::Exists | ExprKind::Forall
            if actual == 2 =>
        {
            return Ok(())
        }
        ExprKind::Equals | ExprKind::Imply | ExprKind::When | ExprKind::Exists | ExprKind::Forall => {
            "2"
        }
        ExprKind::Constant | ExprKind::Variable | ExprKind::World => {
            return Err(LogicError::ExpressionKind {
                kind,
                role: Role::Compound,
            })
        }
    };
    Err(LogicError::Arity {
        kind,
        expected,
        actual,
    })
}
