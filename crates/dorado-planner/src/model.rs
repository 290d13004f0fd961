//! Domain and problem descriptions as handed over by the PDDL reader.
//!
//! Formulas stay as flattened s-expression text here; they are only parsed
//! into a [`Session`](dorado_logic::Session) when a problem is grounded.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

/// Type name -> member names. The empty name is the set of every object.
pub type ObjectSets = BTreeMap<String, BTreeSet<String>>;

/// A typed action parameter. An empty `group` means untyped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    pub group: String,
}

impl Parameter {
    pub fn new(name: impl Into<String>, group: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            group: group.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionSchema {
    pub name: String,
    pub parameters: Vec<Parameter>,
    /// Flattened formula text; empty means always applicable.
    pub precondition: String,
    /// Flattened effect text; empty means no effect.
    pub effect: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Domain {
    pub name: String,
    pub requirements: Vec<String>,
    /// Child type -> direct parent types.
    pub types: BTreeMap<String, BTreeSet<String>>,
    /// Objects shared by every problem of the domain, keyed by type.
    pub constants: ObjectSets,
    /// Predicate signatures, kept for display.
    pub predicates: Vec<String>,
    pub actions: Vec<ActionSchema>,
}

impl Domain {
    /// Every type `ty` is a subtype of, transitively, excluding `ty` itself.
    pub fn ancestors(&self, ty: &str) -> BTreeSet<String> {
        let mut found = BTreeSet::new();
        let mut pending: Vec<&str> = vec![ty];
        while let Some(current) = pending.pop() {
            if let Some(parents) = self.types.get(current) {
                for parent in parents {
                    if parent != ty && found.insert(parent.clone()) {
                        pending.push(parent);
                    }
                }
            }
        }
        found
    }

    pub fn action(&self, name: &str) -> Option<&ActionSchema> {
        self.actions.iter().find(|action| action.name == name)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Problem {
    pub name: String,
    pub domain: String,
    pub objects: ObjectSets,
    /// Initial atoms as formula text.
    pub init: BTreeSet<String>,
    pub goal: String,
}

impl Problem {
    /// Adds `object` to `group`, to the unnamed group and to every ancestor
    /// type of `group` in `domain`.
    pub fn add_object(&mut self, domain: &Domain, object: &str, group: &str) {
        self.objects
            .entry(String::new())
            .or_default()
            .insert(object.to_string());
        if group.is_empty() {
            return;
        }
        self.objects
            .entry(group.to_string())
            .or_default()
            .insert(object.to_string());
        for ancestor in domain.ancestors(group) {
            self.objects
                .entry(ancestor)
                .or_default()
                .insert(object.to_string());
        }
    }

    pub fn members(&self, group: &str) -> Option<&BTreeSet<String>> {
        self.objects.get(group)
    }
}

fn write_typed(f: &mut fmt::Formatter<'_>, sets: &ObjectSets, indent: &str) -> fmt::Result {
    for (group, members) in sets.iter().filter(|(group, _)| !group.is_empty()) {
        write!(f, "{indent}")?;
        for member in members {
            write!(f, "{member} ")?;
        }
        writeln!(f, "- {group}")?;
    }
    Ok(())
}

impl fmt::Display for ActionSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "  (:action {}", self.name)?;
        write!(f, "    :parameters (")?;
        for (i, param) in self.parameters.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", param.name)?;
            if !param.group.is_empty() {
                write!(f, " - {}", param.group)?;
            }
        }
        writeln!(f, ")")?;
        if !self.precondition.is_empty() {
            writeln!(f, "    :precondition {}", self.precondition)?;
        }
        if !self.effect.is_empty() {
            writeln!(f, "    :effect {}", self.effect)?;
        }
        write!(f, "  )")
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "(define (domain {})", self.name)?;
        if !self.requirements.is_empty() {
            writeln!(f, "  (:requirements {})", self.requirements.join(" "))?;
        }
        if !self.types.is_empty() {
            // A child listed under several parents gets all of them back.
            let mut by_parent: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
            let mut roots = Vec::new();
            for (child, parents) in &self.types {
                if parents.is_empty() {
                    roots.push(child.as_str());
                }
                for parent in parents {
                    by_parent.entry(parent).or_default().push(child);
                }
            }
            writeln!(f, "  (:types")?;
            for (parent, children) in &by_parent {
                writeln!(f, "    {} - {parent}", children.join(" "))?;
            }
            // Untyped names must come last or they would take the next type.
            if !roots.is_empty() {
                writeln!(f, "    {}", roots.join(" "))?;
            }
            writeln!(f, "  )")?;
        }
        if !self.constants.is_empty() {
            writeln!(f, "  (:constants")?;
            write_typed(f, &self.constants, "    ")?;
            writeln!(f, "  )")?;
        }
        if !self.predicates.is_empty() {
            writeln!(f, "  (:predicates {})", self.predicates.join(" "))?;
        }
        for action in &self.actions {
            writeln!(f, "{action}")?;
        }
        write!(f, ")")
    }
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "(define (problem {})", self.name)?;
        writeln!(f, "  (:domain {})", self.domain)?;
        writeln!(f, "  (:objects")?;
        write_typed(f, &self.objects, "    ")?;
        let untyped: Vec<&str> = self
            .members("")
            .into_iter()
            .flatten()
            .filter(|object| {
                !self
                    .objects
                    .iter()
                    .any(|(group, members)| !group.is_empty() && members.contains(*object))
            })
            .map(String::as_str)
            .collect();
        if !untyped.is_empty() {
            writeln!(f, "    {}", untyped.join(" "))?;
        }
        writeln!(f, "  )")?;
        writeln!(f, "  (:init")?;
        for atom in &self.init {
            writeln!(f, "    {atom}")?;
        }
        writeln!(f, "  )")?;
        writeln!(f, "  (:goal {})", self.goal)?;
        write!(f, ")")
    }
}
