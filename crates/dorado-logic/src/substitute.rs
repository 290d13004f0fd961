//! Symbol substitution.

use crate::expr::{Args, ExprKey};
use crate::session::Session;
use crate::symbol::SymbolId;
use crate::Result;

impl Session {
    /// Replaces every constant or unqualified variable named `old` below
    /// `expr` with the constant `new`.
    ///
    /// Quantifier binders are left as they are; occurrences inside the body
    /// are replaced even when the quantifier binds the same name. When nothing
    /// changes the original key is returned.
    pub fn substitute(&mut self, expr: ExprKey, old: SymbolId, new: SymbolId) -> Result<ExprKey> {
        let node = self.node(expr)?.clone();
        if let Some(symbol) = node.substitutable_symbol() {
            return Ok(if symbol == old {
                self.store_mut().constant(new)
            } else {
                expr
            });
        }

        let kind = node.kind();
        if !kind.is_logical() {
            return Ok(expr);
        }

        let mut changed = false;
        let mut args = Args::with_capacity(node.args().len());
        for (position, &arg) in node.args().iter().enumerate() {
            if kind.is_quantifier() && position == 0 {
                args.push(arg);
                continue;
            }
            let replaced = self.substitute(arg, old, new)?;
            changed |= replaced != arg;
            args.push(replaced);
        }

        if !changed {
            return Ok(expr);
        }
        self.store_mut().logical(kind, args)
    }

    /// Substitutes several symbols in order.
    pub fn substitute_all(
        &mut self,
        expr: ExprKey,
        bindings: impl IntoIterator<Item = (SymbolId, SymbolId)>,
    ) -> Result<ExprKey> {
        bindings
            .into_iter()
            .try_fold(expr, |key, (old, new)| self.substitute(key, old, new))
    }
}
