//! Formula reader.
//!
//! Turns parenthesised s-expression text into canonical expressions:
//!
//! - a reserved word (`and`, `or`, `not`, `=`, `imply`, `when`, `exists`,
//!   `forall`) seen before any argument selects the variant, otherwise the
//!   node is an atom;
//! - `?name` is a variable, and `?name - group` qualifies that one variable;
//! - every other token is a constant.
//!
//! A fragment that reduces to a single variable (other than under `not`) is
//! returned as that variable, which is how the binder `(?v - type)` of a
//! quantifier becomes a variable rather than an atom.

use crate::expr::{Args, ExprKey, ExprKind};
use crate::session::Session;
use crate::{LogicError, Result};

impl Session {
    pub fn parse(&mut self, text: &str) -> Result<ExprKey> {
        let parse_error = |reason: &str| LogicError::Parse {
            text: text.to_string(),
            reason: reason.to_string(),
        };

        let body = strip_outer(text.trim()).map_err(parse_error)?;
        let fragments = split_fragments(body).map_err(parse_error)?;

        let mut kind = ExprKind::Atom;
        let mut args = Args::new();
        let mut saw_variable = false;
        let mut i = 0;
        while i < fragments.len() {
            let fragment = fragments[i];
            if args.is_empty() && kind == ExprKind::Atom {
                if let Some(op) = ExprKind::from_operator(fragment) {
                    kind = op;
                    i += 1;
                    continue;
                }
            }

            let key = if fragment.starts_with('(') {
                self.parse(fragment)?
            } else if fragment.starts_with('?') {
                saw_variable = true;
                if fragments.get(i + 1) == Some(&"-") {
                    match fragments.get(i + 2) {
                        Some(group) => {
                            i += 2;
                            self.register_variable(fragment, group)
                        }
                        None => {
                            i += 1;
                            self.register_variable(fragment, "")
                        }
                    }
                } else {
                    self.register_variable(fragment, "")
                }
            } else {
                self.register_constant(fragment)
            };
            args.push(key);
            i += 1;
        }

        if args.len() == 1 && saw_variable && kind != ExprKind::Not {
            return Ok(args[0]);
        }
        if args.is_empty() && kind == ExprKind::Atom {
            // `()` and blank text read as the empty conjunction.
            return self.store_mut().logical(ExprKind::And, args);
        }
        self.store_mut().logical(kind, args)
    }
}

/// Drops one pair of parentheses when they enclose the whole text.
fn strip_outer(text: &str) -> std::result::Result<&str, &'static str> {
    if !text.starts_with('(') {
        return Ok(text);
    }
    let close = matching_close(text.as_bytes(), 0).ok_or("unbalanced parentheses")?;
    if close + 1 == text.len() {
        Ok(&text[1..close])
    } else {
        Ok(text)
    }
}

fn matching_close(bytes: &[u8], open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (offset, &byte) in bytes[open..].iter().enumerate() {
        match byte {
            b'(' => depth += 1,
            b')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(open + offset);
                }
            }
            _ => {}
        }
    }
    None
}

/// Splits text into top-level fragments: balanced parenthesised groups and
/// whitespace-separated tokens.
fn split_fragments(text: &str) -> std::result::Result<Vec<&str>, &'static str> {
    let bytes = text.as_bytes();
    let mut fragments = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        let byte = bytes[i];
        if byte.is_ascii_whitespace() {
            i += 1;
            continue;
        }
        let start = i;
        match byte {
            b'(' => {
                let close = matching_close(bytes, i).ok_or("unbalanced parentheses")?;
                i = close + 1;
            }
            b')' => return Err("unexpected `)`"),
            _ => {
                while i < bytes.len()
                    && !bytes[i].is_ascii_whitespace()
                    && bytes[i] != b'('
                    && bytes[i] != b')'
                {
                    i += 1;
                }
            }
        }
        fragments.push(&text[start..i]);
    }
    Ok(fragments)
}
