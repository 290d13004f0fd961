//! Plan reports produced by replaying a plan.

use chrono::{DateTime, Utc};
use dorado_logic::Session;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use dorado_search::SearchMetrics;

use crate::grounding::Grounding;
use crate::{PlanError, Result};

/// Outcome of replaying a plan from the initial world
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanReport {
    /// SHA-256 of the action names, one per line
    pub plan_hash: String,

    pub domain: String,

    pub problem: String,

    /// Rendered initial world
    pub initial_state: String,

    /// Rendered goal formula
    pub goal: String,

    /// Sequence of action names
    pub actions: Vec<String>,

    /// Replayed steps, up to the first failed precondition
    pub steps: Vec<StepReport>,

    /// Every precondition held and the goal holds at the end
    pub valid: bool,

    pub goal_reached: bool,

    /// Search counters, when the plan came from the planner
    #[serde(default, skip_deserializing, skip_serializing_if = "Option::is_none")]
    pub metrics: Option<SearchMetrics>,

    /// Generation timestamp
    pub generated_at: DateTime<Utc>,
}

/// One replayed action
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepReport {
    /// Step index (0-based)
    pub step: usize,

    pub action: String,

    /// Ground precondition
    pub precondition: String,

    /// Ground effect
    pub effect: String,

    pub precondition_held: bool,

    /// Rendered world after the step; unchanged when the precondition failed
    pub state: String,
}

/// Deterministic digest of a plan.
pub fn plan_hash(actions: &[String]) -> String {
    let mut hasher = Sha256::new();
    for action in actions {
        hasher.update(action.as_bytes());
        hasher.update(b"\n");
    }
    hex::encode(hasher.finalize())
}

impl PlanReport {
    /// Replays `actions` against a grounded problem.
    ///
    /// Stops at the first action whose precondition does not hold. Names that
    /// match no ground action are an error.
    pub fn replay(
        session: &mut Session,
        domain: &str,
        problem: &str,
        grounding: &Grounding,
        actions: &[String],
    ) -> Result<Self> {
        let mut report = Self {
            plan_hash: plan_hash(actions),
            domain: domain.to_string(),
            problem: problem.to_string(),
            initial_state: session.render(grounding.initial.key())?,
            goal: session.render(grounding.goal)?,
            actions: actions.to_vec(),
            steps: Vec::with_capacity(actions.len()),
            valid: false,
            goal_reached: false,
            metrics: None,
            generated_at: Utc::now(),
        };

        let mut world = grounding.initial;
        let mut applicable = true;
        for (step, name) in actions.iter().enumerate() {
            let action = grounding
                .actions
                .find(name)
                .ok_or_else(|| PlanError::UnknownAction(name.clone()))?;

            let held = session.evaluate(action.precondition, world)?;
            if held {
                world = session.apply(world, action.effect)?;
            }
            report.steps.push(StepReport {
                step,
                action: name.clone(),
                precondition: session.render(action.precondition)?,
                effect: session.render(action.effect)?,
                precondition_held: held,
                state: session.render(world.key())?,
            });
            if !held {
                applicable = false;
                break;
            }
        }

        report.goal_reached = applicable && session.evaluate(grounding.goal, world)?;
        report.valid = report.goal_reached;
        tracing::debug!(
            problem,
            steps = report.steps.len(),
            valid = report.valid,
            "replayed plan"
        );
        Ok(report)
    }

    pub fn with_metrics(mut self, metrics: SearchMetrics) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// First step whose precondition failed.
    pub fn failed_step(&self) -> Option<&StepReport> {
        self.steps.iter().find(|step| !step.precondition_held)
    }
}
