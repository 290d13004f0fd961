//! Grounding and reachability.
//!
//! Every action schema is instantiated once per binding of its parameters to
//! problem objects. Ground actions whose precondition cannot hold even in the
//! delete-relaxed bound of all reachable worlds are then dropped.

use dorado_logic::{AtomSet, ExprKey, Session, WorldKey};
use dorado_search::ActionId;
use serde::Serialize;

use crate::model::{Domain, ObjectSets, Parameter, Problem};
use crate::Result;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroundAction {
    pub id: ActionId,
    /// Schema name followed by the bound objects, space separated.
    pub name: String,
    pub precondition: ExprKey,
    pub effect: ExprKey,
}

/// Ground actions of one planning session, in grounding order.
///
/// Ids are handed out from 1 upwards and never reused, so removing actions
/// leaves gaps rather than renumbering.
#[derive(Debug, Clone, Default)]
pub struct ActionTable {
    actions: Vec<GroundAction>,
    next_id: u32,
}

impl ActionTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, name: String, precondition: ExprKey, effect: ExprKey) -> ActionId {
        self.next_id += 1;
        let id = ActionId(self.next_id);
        self.actions.push(GroundAction {
            id,
            name,
            precondition,
            effect,
        });
        id
    }

    pub fn get(&self, id: ActionId) -> Option<&GroundAction> {
        self.actions
            .binary_search_by_key(&id, |action| action.id)
            .ok()
            .map(|index| &self.actions[index])
    }

    pub fn find(&self, name: &str) -> Option<&GroundAction> {
        self.actions.iter().find(|action| action.name == name)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, GroundAction> {
        self.actions.iter()
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    fn retain_flags(&mut self, keep: Vec<bool>) {
        let mut flags = keep.into_iter();
        self.actions.retain(|_| flags.next().unwrap_or(true));
    }
}

impl<'a> IntoIterator for &'a ActionTable {
    type Item = &'a GroundAction;
    type IntoIter = std::slice::Iter<'a, GroundAction>;

    fn into_iter(self) -> Self::IntoIter {
        self.actions.iter()
    }
}

/// Every binding of `parameters` to members of their groups.
///
/// The first parameter varies fastest. No parameters gives one empty binding;
/// a parameter whose group is missing or empty gives none.
pub fn possible_parameters<'a>(
    objects: &'a ObjectSets,
    parameters: &'a [Parameter],
) -> Vec<Vec<(&'a str, &'a str)>> {
    let mut bindings: Vec<Vec<(&str, &str)>> = vec![Vec::new()];
    for param in parameters {
        let Some(members) = objects.get(&param.group) else {
            return Vec::new();
        };
        let mut next = Vec::with_capacity(bindings.len() * members.len());
        for member in members {
            for binding in &bindings {
                let mut extended = binding.clone();
                extended.push((param.name.as_str(), member.as_str()));
                next.push(extended);
            }
        }
        bindings = next;
    }
    bindings
}

/// Grounds every schema of `domain` over the objects of `problem`.
pub fn ground(session: &mut Session, domain: &Domain, problem: &Problem) -> Result<ActionTable> {
    let mut table = ActionTable::new();
    for schema in &domain.actions {
        let precondition = session.parse(&schema.precondition)?;
        let effect = session.parse(&schema.effect)?;

        let bindings = possible_parameters(&problem.objects, &schema.parameters);
        tracing::debug!(action = %schema.name, bindings = bindings.len(), "grounding schema");
        for binding in bindings {
            let mut name = schema.name.clone();
            let mut pre = precondition;
            let mut eff = effect;
            for (var, object) in binding {
                name.push(' ');
                name.push_str(object);
                let var = session.intern(var);
                let object = session.intern(object);
                pre = session.substitute(pre, var, object)?;
                eff = session.substitute(eff, var, object)?;
            }
            table.push(name, pre, eff);
        }
    }
    Ok(table)
}

/// The optimistic and pessimistic worlds used for reachability.
///
/// `max` is the initial atoms plus everything any action may add; `min` is
/// the initial atoms minus everything any action may delete.
pub fn reachability_bounds(
    session: &mut Session,
    table: &ActionTable,
    initial: WorldKey,
) -> Result<(WorldKey, WorldKey)> {
    let mut adds = AtomSet::new();
    let mut removes = AtomSet::new();
    for action in table {
        session.apply_positive(action.effect, &mut adds, &mut removes)?;
    }

    let atoms = session.store().atoms(initial)?.to_vec();
    let max = session.world_from_atoms(atoms.iter().copied().chain(adds));
    let min = session.world_from_atoms(atoms.into_iter().filter(|atom| !removes.contains(atom)));
    Ok((max, min))
}

/// Drops actions whose precondition fails lax evaluation against the
/// reachability bounds. Single pass; returns how many were dropped.
pub fn prune_unreachable(
    session: &mut Session,
    table: &mut ActionTable,
    initial: WorldKey,
) -> Result<usize> {
    let (max, min) = reachability_bounds(session, table, initial)?;
    let mut keep = Vec::with_capacity(table.len());
    for action in table.iter() {
        keep.push(session.lax_evaluate(action.precondition, max, min)?);
    }

    let before = table.len();
    table.retain_flags(keep);
    Ok(before - table.len())
}

/// A problem prepared for search.
#[derive(Debug, Clone)]
pub struct Grounding {
    pub initial: WorldKey,
    pub goal: ExprKey,
    pub actions: ActionTable,
    /// Ground actions before pruning.
    pub grounded: usize,
    pub pruned: usize,
}

impl Grounding {
    /// Builds the initial world, parses the goal and grounds every action.
    /// The session's group table is replaced by the problem's object sets.
    pub fn build(
        session: &mut Session,
        domain: &Domain,
        problem: &Problem,
        prune: bool,
    ) -> Result<Self> {
        let initial = session.make_world(&problem.init, &problem.objects)?;
        let goal = session.parse(&problem.goal)?;
        let mut actions = ground(session, domain, problem)?;
        let grounded = actions.len();
        let pruned = if prune {
            prune_unreachable(session, &mut actions, initial)?
        } else {
            0
        };

        tracing::debug!(
            problem = %problem.name,
            grounded,
            pruned,
            retained = actions.len(),
            "grounded problem"
        );
        Ok(Self {
            initial,
            goal,
            actions,
            grounded,
            pruned,
        })
    }
}
