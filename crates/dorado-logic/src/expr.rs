//! Expression node types.
//!
//! Nodes never own their children: compound variants hold the keys of
//! previously registered nodes, so the graph is a DAG by construction.

use std::fmt;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::symbol::SymbolId;

/// Bit position of the variant tag inside an [`ExprKey`].
const KIND_OFFSET: u32 = 32;

/// Child list of a compound node.
pub type Args = SmallVec<[ExprKey; 4]>;

/// The closed set of expression variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExprKind {
    Constant,
    Variable,
    Atom,
    And,
    Or,
    Not,
    Equals,
    Imply,
    When,
    Exists,
    Forall,
    World,
}

impl ExprKind {
    /// Tag stored in the high bits of every key of this kind.
    pub const fn tag(self) -> u32 {
        match self {
            Self::Constant => 0x1,
            Self::Variable => 0x2,
            Self::Atom => 0x4,
            Self::And => 0x8,
            Self::Or => 0x10,
            Self::Not => 0x20,
            Self::Equals => 0x40,
            Self::Imply => 0x80,
            Self::When => 0x100,
            Self::Exists => 0x200,
            Self::Forall => 0x400,
            Self::World => 0x8000,
        }
    }

    /// Reserved leading word that selects this variant in formula text.
    pub const fn operator(self) -> Option<&'static str> {
        match self {
            Self::And => Some("and"),
            Self::Or => Some("or"),
            Self::Not => Some("not"),
            Self::Equals => Some("="),
            Self::Imply => Some("imply"),
            Self::When => Some("when"),
            Self::Exists => Some("exists"),
            Self::Forall => Some("forall"),
            _ => None,
        }
    }

    pub fn from_operator(word: &str) -> Option<Self> {
        match word {
            "and" => Some(Self::And),
            "or" => Some(Self::Or),
            "not" => Some(Self::Not),
            "=" => Some(Self::Equals),
            "imply" => Some(Self::Imply),
            "when" => Some(Self::When),
            "exists" => Some(Self::Exists),
            "forall" => Some(Self::Forall),
            _ => None,
        }
    }

    /// Whether nodes of this kind carry an argument list.
    pub const fn is_logical(self) -> bool {
        !matches!(self, Self::Constant | Self::Variable | Self::World)
    }

    pub const fn is_quantifier(self) -> bool {
        matches!(self, Self::Exists | Self::Forall)
    }
}

impl fmt::Display for ExprKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Constant => "constant",
            Self::Variable => "variable",
            Self::Atom => "atom",
            Self::World => "world",
            other => other.operator().unwrap_or("?"),
        };
        f.write_str(name)
    }
}

/// Canonical identity of a registered node.
///
/// The variant tag lives in the high 32 bits and a structural interning index
/// in the low 32 bits, so two keys are equal exactly when the nodes are
/// structurally equal. An unqualified variable is the one exception: its key
/// is the bare symbol id (tag 0).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ExprKey(u64);

impl ExprKey {
    pub(crate) const fn compose(kind: ExprKind, index: u32) -> Self {
        Self(((kind.tag() as u64) << KIND_OFFSET) | index as u64)
    }

    pub(crate) const fn from_symbol(symbol: SymbolId) -> Self {
        Self(symbol.index() as u64)
    }

    pub const fn raw(self) -> u64 {
        self.0
    }

    /// High-bit variant tag (0 for unqualified variables).
    pub const fn tag(self) -> u32 {
        (self.0 >> KIND_OFFSET) as u32
    }

    pub const fn index(self) -> u32 {
        self.0 as u32
    }
}

impl fmt::Debug for ExprKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Expr({:#x}:{})", self.tag(), self.index())
    }
}

impl fmt::Display for ExprKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:x}", self.0)
    }
}

/// A variable occurrence, optionally qualified by the group it ranges over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Variable {
    pub symbol: SymbolId,
    /// [`SymbolId::NONE`] when unqualified (ranges over every object).
    pub group: SymbolId,
}

/// A node stored in the expression arena.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    /// Opaque object or predicate symbol.
    Constant(SymbolId),

    Variable(Variable),

    /// Ground or lifted predicate application; the first argument is the predicate.
    Atom(Args),

    And(Args),

    Or(Args),

    /// Exactly one argument.
    Not(Args),

    /// Identity of two ground arguments, independent of any world.
    Equals(Args),

    /// (antecedent, consequent), evaluated as ¬a ∨ c.
    Imply(Args),

    /// Conditional effect: (guard, effect).
    When(Args),

    /// (variable, body).
    Exists(Args),

    /// (variable, body).
    Forall(Args),

    /// Sorted, deduplicated keys of the atoms that hold.
    World(Vec<ExprKey>),
}

impl Expr {
    pub(crate) fn logical(kind: ExprKind, args: Args) -> Option<Self> {
        let node = match kind {
            ExprKind::Atom => Self::Atom(args),
            ExprKind::And => Self::And(args),
            ExprKind::Or => Self::Or(args),
            ExprKind::Not => Self::Not(args),
            ExprKind::Equals => Self::Equals(args),
            ExprKind::Imply => Self::Imply(args),
            ExprKind::When => Self::When(args),
            ExprKind::Exists => Self::Exists(args),
            ExprKind::Forall => Self::Forall(args),
            ExprKind::Constant | ExprKind::Variable | ExprKind::World => return None,
        };
        Some(node)
    }

    pub fn kind(&self) -> ExprKind {
        match self {
            Self::Constant(_) => ExprKind::Constant,
            Self::Variable(_) => ExprKind::Variable,
            Self::Atom(_) => ExprKind::Atom,
            Self::And(_) => ExprKind::And,
            Self::Or(_) => ExprKind::Or,
            Self::Not(_) => ExprKind::Not,
            Self::Equals(_) => ExprKind::Equals,
            Self::Imply(_) => ExprKind::Imply,
            Self::When(_) => ExprKind::When,
            Self::Exists(_) => ExprKind::Exists,
            Self::Forall(_) => ExprKind::Forall,
            Self::World(_) => ExprKind::World,
        }
    }

    /// Child keys of a logical node; empty for leaves and worlds.
    pub fn args(&self) -> &[ExprKey] {
        match self {
            Self::Atom(args)
            | Self::And(args)
            | Self::Or(args)
            | Self::Not(args)
            | Self::Equals(args)
            | Self::Imply(args)
            | Self::When(args)
            | Self::Exists(args)
            | Self::Forall(args) => args,
            Self::Constant(_) | Self::Variable(_) | Self::World(_) => &[],
        }
    }

    /// Symbol of a leaf that substitution may replace: constants and
    /// unqualified variables.
    pub(crate) fn substitutable_symbol(&self) -> Option<SymbolId> {
        match self {
            Self::Constant(symbol) => Some(*symbol),
            Self::Variable(var) if var.group.is_none() => Some(var.symbol),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_layout() {
        let key = ExprKey::compose(ExprKind::Forall, 7);
        assert_eq!(key.tag(), 0x400);
        assert_eq!(key.index(), 7);

        let var = ExprKey::from_symbol(SymbolId::new(7));
        assert_eq!(var.tag(), 0);
        assert_ne!(var, ExprKey::compose(ExprKind::Constant, 7));
    }

    #[test]
    fn test_operator_words_round_trip() {
        for kind in [
            ExprKind::And,
            ExprKind::Or,
            ExprKind::Not,
            ExprKind::Equals,
            ExprKind::Imply,
            ExprKind::When,
            ExprKind::Exists,
            ExprKind::Forall,
        ] {
            let word = kind.operator().unwrap();
            assert_eq!(ExprKind::from_operator(word), Some(kind));
        }
        assert_eq!(ExprKind::from_operator("on"), None);
        assert_eq!(ExprKind::Atom.operator(), None);
    }

    #[test]
    fn test_logical_constructor_rejects_leaves() {
        assert!(Expr::logical(ExprKind::Constant, Args::new()).is_none());
        let node = Expr::logical(ExprKind::And, Args::new()).unwrap();
        assert_eq!(node.kind(), ExprKind::And);
        assert!(node.args().is_empty());
    }
}
