//! Planner façade: one domain, many problems.

use dorado_logic::{ExprKey, LogicError, Session};
use dorado_search::{AStar, ActionId, SearchMetrics};
use serde::Serialize;

use crate::config::{HeuristicKind, PlannerConfig};
use crate::grounding::Grounding;
use crate::heuristic::{Blind, GoalCount, Heuristic};
use crate::model::{Domain, Problem};
use crate::pddl::{parse_domain, parse_problem};
use crate::report::PlanReport;
use crate::space::WorldSpace;
use crate::{PlanError, Result};

/// Result of one search.
#[derive(Debug, Clone, Serialize)]
pub struct Solution {
    /// Ground action names in execution order
    pub actions: Vec<String>,
    pub ids: Vec<ActionId>,
    /// False when the frontier or the expansion budget ran out
    pub solved: bool,
    pub grounded: usize,
    pub retained: usize,
    pub metrics: SearchMetrics,
}

/// Plans problems against a fixed domain.
///
/// Every call grounds from scratch: the session is reset first, so symbols
/// and worlds from one problem never leak into the next.
#[derive(Debug, Clone)]
pub struct Planner {
    domain: Domain,
    config: PlannerConfig,
    session: Session,
}

impl Planner {
    pub fn new(domain: Domain) -> Self {
        Self {
            domain,
            config: PlannerConfig::default(),
            session: Session::new(),
        }
    }

    /// Reads a PDDL domain definition.
    pub fn from_source(text: &str) -> Result<Self> {
        Ok(Self::new(parse_domain(text)?))
    }

    pub fn with_config(mut self, config: PlannerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn domain(&self) -> &Domain {
        &self.domain
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Reads a PDDL problem for this planner's domain.
    pub fn read_problem(&self, text: &str) -> Result<Problem> {
        parse_problem(text, &self.domain)
    }

    /// Grounds `problem` in a fresh session.
    pub fn ground(&mut self, problem: &Problem, prune: bool) -> Result<Grounding> {
        self.session.reset();
        Grounding::build(&mut self.session, &self.domain, problem, prune)
    }

    /// Plans a problem given as PDDL text.
    ///
    /// Returns the ground action names in order; an empty plan means no plan
    /// was found. Search counters are written to `metrics` when given.
    pub fn plan(
        &mut self,
        problem_source: &str,
        metrics: Option<&mut SearchMetrics>,
    ) -> Result<Vec<String>> {
        let problem = self.read_problem(problem_source)?;
        let solution = self.solve(&problem)?;
        if let Some(sink) = metrics {
            *sink = solution.metrics;
        }
        Ok(solution.actions)
    }

    pub fn solve(&mut self, problem: &Problem) -> Result<Solution> {
        let grounding = self.ground(problem, self.config.prune_unreachable)?;
        let heuristic = self.heuristic(grounding.goal)?;
        let engine = AStar::new().with_config(self.config.search);

        let mut space = WorldSpace::new(
            &mut self.session,
            &grounding.actions,
            grounding.goal,
            heuristic.as_ref(),
        );
        let (path, metrics) = engine.search_with_metrics(&mut space, grounding.initial)?;

        let mut actions = Vec::with_capacity(path.len());
        let mut ids = Vec::with_capacity(path.len());
        for id in path.actions() {
            let action = grounding
                .actions
                .get(id)
                .ok_or_else(|| PlanError::UnknownAction(id.to_string()))?;
            actions.push(action.name.clone());
            ids.push(id);
        }

        let solved = path.is_solved();
        if solved {
            tracing::info!(
                problem = %problem.name,
                steps = actions.len(),
                expanded = metrics.expanded_states,
                "plan found"
            );
        } else {
            tracing::info!(
                problem = %problem.name,
                expanded = metrics.expanded_states,
                budget_exhausted = metrics.budget_exhausted,
                "no plan found"
            );
        }

        Ok(Solution {
            actions,
            ids,
            solved,
            grounded: grounding.grounded,
            retained: grounding.actions.len(),
            metrics,
        })
    }

    /// Replays `plan` on `problem` without pruning, so actions the filter
    /// would drop are still recognised.
    pub fn verify(&mut self, problem: &Problem, plan: &[String]) -> Result<PlanReport> {
        let grounding = self.ground(problem, false)?;
        PlanReport::replay(
            &mut self.session,
            &self.domain.name,
            &problem.name,
            &grounding,
            plan,
        )
    }

    /// Solves `problem` and verifies the result.
    pub fn report(&mut self, problem: &Problem) -> Result<PlanReport> {
        let solution = self.solve(problem)?;
        let report = self.verify(problem, &solution.actions)?;
        Ok(report.with_metrics(solution.metrics))
    }

    fn heuristic(&mut self, goal: ExprKey) -> Result<Box<dyn Heuristic>> {
        match self.config.heuristic {
            HeuristicKind::Blind => Ok(Box::new(Blind)),
            HeuristicKind::GoalCount => match GoalCount::new(&mut self.session, goal) {
                Ok(goal_count) => Ok(Box::new(goal_count)),
                Err(PlanError::Logic(LogicError::ExpressionKind { kind, .. })) => {
                    tracing::warn!(%kind, "goal cannot seed goal-count heuristic, using blind");
                    Ok(Box::new(Blind))
                }
                Err(err) => Err(err),
            },
        }
    }
}
