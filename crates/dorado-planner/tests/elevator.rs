//! End-to-end planning on small elevator problems.

use dorado_planner::{
    HeuristicKind, PlanError, Planner, PlannerConfig, SearchConfig, SearchMetrics,
};

const STRIPS_DOMAIN: &str = include_str!("fixtures/miconic-strips-domain.pddl");
const STRIPS_PROBLEM: &str = include_str!("fixtures/miconic-strips-problem.pddl");
const ADL_DOMAIN: &str = include_str!("fixtures/miconic-adl-domain.pddl");
const ADL_PROBLEM: &str = include_str!("fixtures/miconic-adl-problem.pddl");

fn blind() -> PlannerConfig {
    PlannerConfig {
        heuristic: HeuristicKind::Blind,
        ..PlannerConfig::default()
    }
}

#[test]
fn test_reads_fixture_domains() {
    let planner = Planner::from_source(STRIPS_DOMAIN).unwrap();
    let domain = planner.domain();
    assert_eq!(domain.name, "miconic");
    assert_eq!(domain.actions.len(), 4);
    assert_eq!(domain.predicates.len(), 6);

    let problem = planner.read_problem(STRIPS_PROBLEM).unwrap();
    assert_eq!(problem.members("floor").map(|m| m.len()), Some(4));
    assert_eq!(problem.members("object").map(|m| m.len()), Some(6));
    assert_eq!(problem.init.len(), 11);
}

#[test]
fn test_strips_grounding_and_pruning() {
    let mut planner = Planner::from_source(STRIPS_DOMAIN).unwrap();
    let problem = planner.read_problem(STRIPS_PROBLEM).unwrap();
    let grounding = planner.ground(&problem, true).unwrap();

    assert_eq!(grounding.grounded, 48);
    assert_eq!(grounding.pruned, 32);
    assert_eq!(grounding.actions.len(), 16);
    assert!(grounding.actions.find("up f0 f1").is_some());
    assert!(grounding.actions.find("up f1 f0").is_none());
    assert!(grounding.actions.find("board f1 p0").is_some());
    assert!(grounding.actions.find("board f0 p0").is_none());

    let unpruned = planner.ground(&problem, false).unwrap();
    assert_eq!(unpruned.actions.len(), 48);
}

#[test]
fn test_strips_blind_plan_is_shortest() {
    let mut planner = Planner::from_source(STRIPS_DOMAIN)
        .unwrap()
        .with_config(blind());
    let mut metrics = SearchMetrics::default();
    let plan = planner.plan(STRIPS_PROBLEM, Some(&mut metrics)).unwrap();

    assert_eq!(plan.len(), 7);
    assert_eq!(plan[0], "up f0 f1");
    assert_eq!(plan[1], "board f1 p0");
    assert_eq!(plan[6], "depart f2 p1");
    assert!(metrics.expanded_states > 0);
    assert!(metrics.known_states >= metrics.expanded_states);
    assert!(!metrics.budget_exhausted);

    let problem = planner.read_problem(STRIPS_PROBLEM).unwrap();
    assert!(planner.verify(&problem, &plan).unwrap().valid);
}

#[test]
fn test_strips_goal_count_plan_is_valid() {
    let mut planner = Planner::from_source(STRIPS_DOMAIN).unwrap();
    let problem = planner.read_problem(STRIPS_PROBLEM).unwrap();
    let report = planner.report(&problem).unwrap();

    assert!(report.valid);
    assert!(report.goal_reached);
    assert_eq!(report.steps.len(), report.actions.len());
    assert!(report.steps.iter().all(|step| step.precondition_held));
}

#[test]
fn test_adl_plan() {
    let mut planner = Planner::from_source(ADL_DOMAIN).unwrap().with_config(blind());
    let plan = planner.plan(ADL_PROBLEM, None).unwrap();
    assert_eq!(
        plan,
        vec![
            "up f0 f1", "stop f1", "up f1 f3", "stop f3", "down f3 f2", "stop f2",
        ]
    );
}

#[test]
fn test_adl_grounding_and_report() {
    let mut planner = Planner::from_source(ADL_DOMAIN).unwrap();
    let problem = planner.read_problem(ADL_PROBLEM).unwrap();

    let grounding = planner.ground(&problem, true).unwrap();
    assert_eq!(grounding.grounded, 36);
    assert_eq!(grounding.actions.len(), 16);

    let report = planner.report(&problem).unwrap();
    assert!(report.valid);
    let last = report.steps.last().unwrap();
    assert!(last.state.contains("(served p0)"));
    assert!(last.state.contains("(served p1)"));
    assert!(!last.state.contains("(boarded"));
}

#[test]
fn test_disjunctive_goal_still_plans() {
    let problem = STRIPS_PROBLEM.replace(
        "(:goal (and (served p0) (served p1)))",
        "(:goal (or (served p0) (served p1)))",
    );
    let mut planner = Planner::from_source(STRIPS_DOMAIN).unwrap();
    assert_eq!(planner.config().heuristic, HeuristicKind::GoalCount);

    let plan = planner.plan(&problem, None).unwrap();
    assert_eq!(plan.len(), 4);
}

#[test]
fn test_unsolvable_problem_returns_empty_plan() {
    let problem = STRIPS_PROBLEM
        .replace("(origin p0 f1) ", "")
        .replace("(:goal (and (served p0) (served p1)))", "(:goal (served p0))");
    let mut planner = Planner::from_source(STRIPS_DOMAIN).unwrap();
    let mut metrics = SearchMetrics::default();
    let plan = planner.plan(&problem, Some(&mut metrics)).unwrap();

    assert!(plan.is_empty());
    assert!(!metrics.budget_exhausted);
    assert_eq!(metrics.expanded_states, metrics.known_states);
}

#[test]
fn test_expansion_budget() {
    let config = PlannerConfig {
        search: SearchConfig {
            max_expansions: Some(3),
        },
        ..blind()
    };
    let mut planner = Planner::from_source(STRIPS_DOMAIN)
        .unwrap()
        .with_config(config);
    let problem = planner.read_problem(STRIPS_PROBLEM).unwrap();
    let solution = planner.solve(&problem).unwrap();

    assert!(!solution.solved);
    assert!(solution.actions.is_empty());
    assert!(solution.metrics.budget_exhausted);
    assert_eq!(solution.metrics.expanded_states, 3);
}

#[test]
fn test_problem_for_other_domain_is_rejected() {
    let planner = Planner::from_source(ADL_DOMAIN).unwrap();
    assert!(matches!(
        planner.read_problem(STRIPS_PROBLEM),
        Err(PlanError::DomainMismatch { .. })
    ));
}

#[test]
fn test_report_json() {
    let mut planner = Planner::from_source(ADL_DOMAIN).unwrap();
    let problem = planner.read_problem(ADL_PROBLEM).unwrap();
    let report = planner.report(&problem).unwrap();
    let json = serde_json::to_value(&report).unwrap();

    assert_eq!(json["domain"], "miconic-adl");
    assert_eq!(json["problem"], "two-passengers");
    assert_eq!(json["plan_hash"].as_str().map(str::len), Some(64));
    assert!(json["metrics"]["elapsed_ms"].is_u64());
}
