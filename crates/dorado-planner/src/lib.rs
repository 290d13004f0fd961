//! # dorado-planner
//!
//! Classical planning over PDDL domains.
//!
//! A [`Planner`] holds one domain. For each problem it grounds every action
//! schema over the problem's objects, drops actions whose preconditions can
//! never hold, and runs A* over canonical worlds from `dorado-logic`.
//!
//! ```rust
//! use dorado_planner::Planner;
//!
//! let domain = "(define (domain switch)
//!     (:action flip :parameters (?s) :precondition (off ?s)
//!         :effect (and (on ?s) (not (off ?s)))))";
//! let problem = "(define (problem two) (:domain switch)
//!     (:objects a b) (:init (off a) (off b)) (:goal (and (on a) (on b))))";
//!
//! let mut planner = Planner::from_source(domain).unwrap();
//! let plan = planner.plan(problem, None).unwrap();
//! assert_eq!(plan.len(), 2);
//! ```

#![forbid(unsafe_code)]

pub mod config;
pub mod grounding;
pub mod heuristic;
pub mod model;
pub mod pddl;
pub mod planner;
pub mod report;
pub mod space;

pub use config::{HeuristicKind, PlannerConfig};
pub use grounding::{ActionTable, GroundAction, Grounding};
pub use heuristic::{Blind, GoalCount, Heuristic};
pub use model::{ActionSchema, Domain, ObjectSets, Parameter, Problem};
pub use planner::{Planner, Solution};
pub use report::{PlanReport, StepReport};
pub use space::WorldSpace;

pub use dorado_logic::LogicError;
pub use dorado_search::{ActionId, SearchConfig, SearchMetrics};

use thiserror::Error;

/// Errors raised while reading, grounding or planning a problem
#[derive(Debug, Error)]
pub enum PlanError {
    #[error("PDDL syntax error: {0}")]
    Syntax(String),

    #[error("missing `{0}` section")]
    MissingSection(&'static str),

    #[error("problem is for domain `{found}`, planner holds `{expected}`")]
    DomainMismatch { expected: String, found: String },

    #[error("unknown action `{0}`")]
    UnknownAction(String),

    #[error(transparent)]
    Logic(#[from] LogicError),
}

pub type Result<T> = std::result::Result<T, PlanError>;
