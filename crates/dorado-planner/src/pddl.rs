//! PDDL domain and problem reader.
//!
//! Splits the `(define ...)` form into sections and hands formula sections
//! over as flattened single-line text. Beyond balanced parentheses and the
//! presence of required sections, input is not validated.

use crate::model::{ActionSchema, Domain, ObjectSets, Parameter, Problem};
use crate::{PlanError, Result};

/// A top-level piece of a section: a bare word or a parenthesised group
/// (kept with its parentheses).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Fragment<'a> {
    Word(&'a str),
    Group(&'a str),
}

impl<'a> Fragment<'a> {
    fn text(self) -> &'a str {
        match self {
            Fragment::Word(text) | Fragment::Group(text) => text,
        }
    }

    fn word(self) -> Option<&'a str> {
        match self {
            Fragment::Word(text) => Some(text),
            Fragment::Group(_) => None,
        }
    }

    /// Contents of a group without its outer parentheses.
    fn inner(self) -> Option<&'a str> {
        match self {
            Fragment::Group(text) => Some(&text[1..text.len() - 1]),
            Fragment::Word(_) => None,
        }
    }
}

fn strip_comments(text: &str) -> String {
    text.lines()
        .map(|line| line.split(';').next().unwrap_or(""))
        .collect::<Vec<_>>()
        .join("\n")
}

fn split(text: &str) -> Result<Vec<Fragment<'_>>> {
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
                let mut depth = 0usize;
                loop {
                    match bytes.get(i) {
                        Some(b'(') => depth += 1,
                        Some(b')') => {
                            depth -= 1;
                            if depth == 0 {
                                break;
                            }
                        }
                        Some(_) => {}
                        None => {
                            return Err(PlanError::Syntax(format!(
                                "unbalanced parentheses near `{}`",
                                excerpt(&text[start..])
                            )))
                        }
                    }
                    i += 1;
                }
                i += 1;
                fragments.push(Fragment::Group(&text[start..i]));
            }
            b')' => {
                return Err(PlanError::Syntax(format!(
                    "unexpected `)` near `{}`",
                    excerpt(&text[start..])
                )))
            }
            _ => {
                while i < bytes.len()
                    && !bytes[i].is_ascii_whitespace()
                    && bytes[i] != b'('
                    && bytes[i] != b')'
                {
                    i += 1;
                }
                fragments.push(Fragment::Word(&text[start..i]));
            }
        }
    }
    Ok(fragments)
}

fn excerpt(text: &str) -> &str {
    let end = text
        .char_indices()
        .nth(40)
        .map(|(index, _)| index)
        .unwrap_or(text.len());
    &text[..end]
}

/// Collapses every whitespace run to a single space.
pub fn flatten(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Sections of the single top-level `(define ...)` form.
fn define_sections(text: &str) -> Result<Vec<Vec<Fragment<'_>>>> {
    let top = split(text)?;
    let body = match top.as_slice() {
        [form] => form
            .inner()
            .ok_or_else(|| PlanError::Syntax("expected a `(define ...)` form".into()))?,
        [] => return Err(PlanError::MissingSection("define")),
        _ => {
            return Err(PlanError::Syntax(
                "expected exactly one top-level form".into(),
            ))
        }
    };

    let mut fragments = split(body)?.into_iter();
    if fragments.next().and_then(Fragment::word) != Some("define") {
        return Err(PlanError::MissingSection("define"));
    }
    fragments
        .filter_map(|fragment| fragment.inner())
        .map(split)
        .collect()
}

/// Reads `name name - type name ...` lists. Untyped names get the empty group.
fn typed_list<'a>(fragments: &[Fragment<'a>]) -> Result<Vec<(&'a str, &'a str)>> {
    let mut typed = Vec::new();
    let mut pending: Vec<&str> = Vec::new();
    let mut rest = fragments.iter().copied();
    while let Some(fragment) = rest.next() {
        match fragment {
            Fragment::Word("-") => {
                let group = match rest.next() {
                    Some(Fragment::Word(group)) => group,
                    Some(Fragment::Group(group)) => {
                        return Err(PlanError::Syntax(format!(
                            "unsupported type `{}`; `either` types are not supported",
                            excerpt(group)
                        )))
                    }
                    None => "",
                };
                typed.extend(pending.drain(..).map(|name| (name, group)));
            }
            Fragment::Word(name) => pending.push(name),
            Fragment::Group(group) => {
                return Err(PlanError::Syntax(format!(
                    "expected a name in typed list, found `{}`",
                    excerpt(group)
                )))
            }
        }
    }
    typed.extend(pending.into_iter().map(|name| (name, "")));
    Ok(typed)
}

fn section_name<'a>(section: &[Fragment<'a>]) -> Option<&'a str> {
    section.first().and_then(|fragment| fragment.word())
}

/// Reads a `(define (domain ...) ...)` text.
pub fn parse_domain(text: &str) -> Result<Domain> {
    let text = strip_comments(text);
    let mut domain = Domain::default();
    let mut named = false;

    for section in define_sections(&text)? {
        match section_name(&section) {
            Some("domain") => {
                domain.name = section
                    .get(1)
                    .and_then(|fragment| fragment.word())
                    .ok_or(PlanError::MissingSection("domain"))?
                    .to_string();
                named = true;
            }
            Some(":requirements") => {
                domain.requirements = section[1..]
                    .iter()
                    .filter_map(|fragment| fragment.word())
                    .map(str::to_string)
                    .collect();
            }
            Some(":types") => {
                for (child, parent) in typed_list(&section[1..])? {
                    let parents = domain.types.entry(child.to_string()).or_default();
                    if !parent.is_empty() {
                        parents.insert(parent.to_string());
                    }
                }
            }
            Some(":constants") => {
                for (name, group) in typed_list(&section[1..])? {
                    domain
                        .constants
                        .entry(group.to_string())
                        .or_default()
                        .insert(name.to_string());
                }
            }
            Some(":predicates") => {
                domain.predicates = section[1..]
                    .iter()
                    .map(|fragment| flatten(fragment.text()))
                    .collect();
            }
            Some(":action") => domain.actions.push(parse_action(&section)?),
            Some(other) => {
                tracing::warn!(section = other, domain = %domain.name, "ignoring unsupported domain section");
            }
            None => {}
        }
    }

    if !named {
        return Err(PlanError::MissingSection("domain"));
    }
    tracing::debug!(
        domain = %domain.name,
        actions = domain.actions.len(),
        types = domain.types.len(),
        "parsed domain"
    );
    Ok(domain)
}

fn parse_action(section: &[Fragment<'_>]) -> Result<ActionSchema> {
    let name = section
        .get(1)
        .and_then(|fragment| fragment.word())
        .ok_or_else(|| PlanError::Syntax("`:action` without a name".into()))?;
    let mut action = ActionSchema {
        name: name.to_string(),
        ..ActionSchema::default()
    };

    let mut rest = section[2..].iter().copied();
    while let Some(keyword) = rest.next() {
        let value = rest.next();
        match (keyword.word(), value) {
            (Some(":parameters"), Some(list)) => {
                let inner = list.inner().ok_or_else(|| {
                    PlanError::Syntax(format!("parameters of `{name}` must be a list"))
                })?;
                action.parameters = typed_list(&split(inner)?)?
                    .into_iter()
                    .map(|(param, group)| Parameter::new(param, group))
                    .collect();
            }
            (Some(":precondition"), Some(formula)) => action.precondition = flatten(formula.text()),
            (Some(":effect"), Some(formula)) => action.effect = flatten(formula.text()),
            (Some(other), _) => {
                tracing::warn!(action = name, keyword = other, "ignoring unsupported action field");
            }
            (None, _) => {
                return Err(PlanError::Syntax(format!(
                    "expected a keyword in action `{name}`, found `{}`",
                    excerpt(keyword.text())
                )))
            }
        }
    }
    Ok(action)
}

/// Reads a `(define (problem ...) ...)` text against `domain`.
///
/// Object sets include the unnamed group, every ancestor type of each
/// declared type, and the domain's constants.
pub fn parse_problem(text: &str, domain: &Domain) -> Result<Problem> {
    let text = strip_comments(text);
    let mut problem = Problem::default();
    let mut has_domain = false;
    let mut has_goal = false;
    let mut declared: Vec<(String, String)> = Vec::new();

    for section in define_sections(&text)? {
        match section_name(&section) {
            Some("problem") => {
                problem.name = section
                    .get(1)
                    .and_then(|fragment| fragment.word())
                    .unwrap_or_default()
                    .to_string();
            }
            Some(":domain") => {
                let name = section
                    .get(1)
                    .and_then(|fragment| fragment.word())
                    .ok_or(PlanError::MissingSection(":domain"))?;
                if name != domain.name {
                    return Err(PlanError::DomainMismatch {
                        expected: domain.name.clone(),
                        found: name.to_string(),
                    });
                }
                problem.domain = name.to_string();
                has_domain = true;
            }
            Some(":objects") => {
                declared.extend(
                    typed_list(&section[1..])?
                        .into_iter()
                        .map(|(name, group)| (name.to_string(), group.to_string())),
                );
            }
            Some(":init") => {
                problem
                    .init
                    .extend(section[1..].iter().map(|atom| flatten(atom.text())));
            }
            Some(":goal") => {
                let goal = section.get(1).ok_or(PlanError::MissingSection(":goal"))?;
                problem.goal = flatten(goal.text());
                has_goal = true;
            }
            Some(other) => {
                tracing::warn!(section = other, problem = %problem.name, "ignoring unsupported problem section");
            }
            None => {}
        }
    }

    if !has_domain {
        return Err(PlanError::MissingSection(":domain"));
    }
    if !has_goal {
        return Err(PlanError::MissingSection(":goal"));
    }

    problem.objects.entry(String::new()).or_default();
    let constants = constants_of(domain);
    for (name, group) in constants.iter().chain(declared.iter()) {
        problem.add_object(domain, name, group);
    }
    Ok(problem)
}

fn constants_of(domain: &Domain) -> Vec<(String, String)> {
    let sets: &ObjectSets = &domain.constants;
    sets.iter()
        .flat_map(|(group, names)| names.iter().map(move |name| (name.clone(), group.clone())))
        .collect()
}
