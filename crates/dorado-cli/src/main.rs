//! Dorado CLI - classical planner.
//!
//! - `dorado plan <domain> <problem>` - search for a plan
//! - `dorado ground <domain> <problem>` - show grounding and pruning counts

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

use dorado_planner::{HeuristicKind, Planner, PlannerConfig, Problem};

#[derive(Parser)]
#[command(name = "dorado")]
#[command(about = "Classical planner for PDDL domains", version)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search for a plan
    Plan {
        /// PDDL domain file
        domain: PathBuf,

        /// PDDL problem file
        problem: PathBuf,

        /// Planner configuration (YAML)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Print a verified plan report as JSON
        #[arg(long)]
        json: bool,

        /// Print search counters after the plan
        #[arg(long)]
        metrics: bool,

        /// Override the expansion budget
        #[arg(long)]
        max_expansions: Option<usize>,

        /// Override the heuristic
        #[arg(long, value_enum)]
        heuristic: Option<HeuristicKind>,
    },

    /// Ground a problem and report what survives pruning
    Ground {
        /// PDDL domain file
        domain: PathBuf,

        /// PDDL problem file
        problem: PathBuf,

        /// List retained action names
        #[arg(long)]
        list: bool,

        /// Keep every grounded action
        #[arg(long)]
        no_prune: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("info")
        }
    });

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Plan {
            domain,
            problem,
            config,
            json,
            metrics,
            max_expansions,
            heuristic,
        } => {
            let mut config = PlannerConfig::load_or_default(config.as_deref())?;
            if max_expansions.is_some() {
                config.search.max_expansions = max_expansions;
            }
            if let Some(heuristic) = heuristic {
                config.heuristic = heuristic;
            }
            run_plan(&domain, &problem, config, json, metrics)
        }
        Commands::Ground {
            domain,
            problem,
            list,
            no_prune,
        } => run_ground(&domain, &problem, list, !no_prune),
    }
}

fn load(domain_path: &Path, problem_path: &Path) -> Result<(Planner, Problem)> {
    let domain_text = std::fs::read_to_string(domain_path)
        .with_context(|| format!("Failed to read domain from {}", domain_path.display()))?;
    let problem_text = std::fs::read_to_string(problem_path)
        .with_context(|| format!("Failed to read problem from {}", problem_path.display()))?;

    let planner = Planner::from_source(&domain_text)
        .with_context(|| format!("Failed to parse domain {}", domain_path.display()))?;
    let problem = planner
        .read_problem(&problem_text)
        .with_context(|| format!("Failed to parse problem {}", problem_path.display()))?;
    Ok((planner, problem))
}

fn run_plan(
    domain_path: &Path,
    problem_path: &Path,
    config: PlannerConfig,
    json: bool,
    show_metrics: bool,
) -> Result<()> {
    let (planner, problem) = load(domain_path, problem_path)?;
    let mut planner = planner.with_config(config);
    tracing::info!(domain = %planner.domain().name, problem = %problem.name, "Planning");

    if json {
        let report = planner.report(&problem)?;
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let solution = planner.solve(&problem)?;
    if solution.solved {
        for action in &solution.actions {
            println!("{action}");
        }
    } else {
        println!("No plan found");
    }

    if show_metrics {
        println!();
        println!("{}", solution.metrics);
    }
    Ok(())
}

fn run_ground(domain_path: &Path, problem_path: &Path, list: bool, prune: bool) -> Result<()> {
    let (mut planner, problem) = load(domain_path, problem_path)?;
    let grounding = planner.ground(&problem, prune)?;

    println!("Grounded actions: {}", grounding.grounded);
    println!("Pruned actions:   {}", grounding.pruned);
    println!("Retained actions: {}", grounding.actions.len());

    if list {
        println!();
        for action in &grounding.actions {
            println!("{:>5}  {}", action.id.0, action.name);
        }
    }
    Ok(())
}
