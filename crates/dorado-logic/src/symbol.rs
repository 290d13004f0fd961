//! Symbol interning.
//!
//! Every word that appears in a formula (predicate names, objects, variables,
//! group names) is mapped to a dense integer id. Id 0 is reserved for the empty
//! word, which doubles as the unnamed group holding every problem object.

use std::fmt;

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

/// Dense id of an interned word.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SymbolId(u32);

impl SymbolId {
    /// The empty word: "no group" for variables, the universal object set for groups.
    pub const NONE: SymbolId = SymbolId(0);

    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    pub const fn index(self) -> u32 {
        self.0
    }

    pub const fn is_none(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Debug for SymbolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Sym({})", self.0)
    }
}

/// Text ↔ id table, unique per session.
#[derive(Debug, Clone)]
pub struct Interner {
    ids: HashMap<String, SymbolId>,
    words: Vec<String>,
}

impl Default for Interner {
    fn default() -> Self {
        Self::new()
    }
}

impl Interner {
    pub fn new() -> Self {
        let mut interner = Self {
            ids: HashMap::new(),
            words: Vec::new(),
        };
        interner.seed();
        interner
    }

    fn seed(&mut self) {
        self.words.push(String::new());
        self.ids.insert(String::new(), SymbolId::NONE);
    }

    /// Returns the id of `text`, assigning the next dense id on first sight.
    pub fn intern(&mut self, text: &str) -> SymbolId {
        if let Some(&id) = self.ids.get(text) {
            return id;
        }

        let id = SymbolId(self.words.len() as u32);
        self.ids.insert(text.to_string(), id);
        self.words.push(text.to_string());
        id
    }

    /// Looks up an id without interning.
    pub fn get(&self, text: &str) -> Option<SymbolId> {
        self.ids.get(text).copied()
    }

    pub fn resolve(&self, id: SymbolId) -> Option<&str> {
        self.words.get(id.0 as usize).map(String::as_str)
    }

    /// Number of interned words, the reserved empty word included.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.len() <= 1
    }

    /// Forgets every mapping. Ids handed out before the reset must not be reused.
    pub fn reset(&mut self) {
        self.ids.clear();
        self.words.clear();
        self.seed();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_intern_is_idempotent() {
        let mut interner = Interner::new();
        let a = interner.intern("on");
        let b = interner.intern("block-a");
        let c = interner.intern("on");

        assert_eq!(a, c);
        assert_ne!(a, b);
        assert_eq!(interner.resolve(b), Some("block-a"));
    }

    #[test]
    fn test_empty_word_is_none() {
        let mut interner = Interner::new();
        assert_eq!(interner.intern(""), SymbolId::NONE);
        assert!(interner.is_empty());
    }

    #[test]
    fn test_reset_restarts_numbering() {
        let mut interner = Interner::new();
        let first = interner.intern("x");
        interner.intern("y");
        interner.reset();

        assert_eq!(interner.get("y"), None);
        assert_eq!(interner.intern("z"), first);
        assert_eq!(interner.len(), 2);
    }

    proptest! {
        #[test]
        fn prop_ids_are_dense_and_stable(words in proptest::collection::vec("[a-z]{1,6}", 1..40)) {
            let mut interner = Interner::new();
            let ids: Vec<SymbolId> = words.iter().map(|w| interner.intern(w)).collect();
            for (word, id) in words.iter().zip(&ids) {
                prop_assert_eq!(interner.intern(word), *id);
                prop_assert_eq!(interner.resolve(*id), Some(word.as_str()));
                prop_assert!((id.index() as usize) < interner.len());
            }
        }
    }
}
