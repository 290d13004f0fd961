//! # dorado-logic
//!
//! Hash-consed first-order expressions for classical planning.
//!
//! Every formula, atom and world lives in one canonical arena owned by a
//! [`Session`]: structurally equal nodes always share a key, so equality is a
//! single integer comparison and worlds can be used directly as search states.
//!
//! ## Supported fragment
//!
//! - **Leaves**: constants and (optionally group-qualified) variables
//! - **Connectives**: `and`, `or`, `not`, `=`, `imply`
//! - **Effects**: atoms, `and`, `not`, `forall`, conditional `when`
//! - **Quantifiers**: `exists`, `forall` over a named object group
//!
//! ## Example
//!
//! ```rust
//! use dorado_logic::Session;
//!
//! let mut session = Session::new();
//! let world = session
//!     .make_world(["(on a b)", "(clear a)"], [("", vec!["a", "b"])])
//!     .unwrap();
//!
//! let goal = session.parse("(exists (?x) (on ?x b))").unwrap();
//! assert!(session.evaluate(goal, world).unwrap());
//!
//! let effect = session.parse("(and (on a table) (not (on a b)))").unwrap();
//! let next = session.apply(world, effect).unwrap();
//! assert!(!session.evaluate(goal, next).unwrap());
//! ```

pub mod effect;
pub mod eval;
pub mod expr;
pub mod reader;
pub mod session;
pub mod store;
pub mod substitute;
pub mod symbol;
pub mod world;

pub use expr::{Args, Expr, ExprKey, ExprKind, Variable};
pub use session::{Groups, Session};
pub use store::ExprStore;
pub use symbol::{Interner, SymbolId};
pub use world::{AtomSet, WorldKey};

use std::fmt;

use thiserror::Error;

/// The position an expression was used in when it was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Evaluated against a world.
    Condition,
    /// Applied as an action effect.
    Effect,
    /// First argument of `exists` / `forall`.
    QuantifierVariable,
    /// Expected to be a world node.
    World,
    /// Built as a compound node.
    Compound,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Role::Condition => "condition",
            Role::Effect => "effect",
            Role::QuantifierVariable => "quantifier variable",
            Role::World => "world",
            Role::Compound => "compound expression",
        };
        f.write_str(name)
    }
}

/// Errors raised by the expression engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LogicError {
    #[error("malformed formula `{text}`: {reason}")]
    Parse { text: String, reason: String },

    #[error("unknown symbol id {0}")]
    UnknownSymbol(u32),

    #[error("unknown expression {0}")]
    UnknownExpression(ExprKey),

    #[error("`{kind}` takes {expected} argument(s), got {actual}")]
    Arity {
        kind: ExprKind,
        expected: &'static str,
        actual: usize,
    },

    #[error("`{kind}` cannot be used as a {role}")]
    ExpressionKind { kind: ExprKind, role: Role },
}

pub type Result<T> = std::result::Result<T, LogicError>;
