//! Validate a plan against a domain without producing output
//! Usage: weft check <plan> --domain <file>

use anyhow::{Context, Result};
use colored::Colorize;
use std::path::Path;

use crate::environment::PlanningEnvironment;
use crate::models::node::NodeKind;
use crate::plan::{ContingentPlanParser, PlanParser};

pub fn execute(plan_path: &Path, domain_path: &Path) -> Result<()> {
    let environment = PlanningEnvironment::load(domain_path)?;

    let mut parser = ContingentPlanParser::new();
    parser
        .prepare_plan(plan_path, &environment, 0)
        .with_context(|| format!("Invalid plan: {}", plan_path.display()))?;

    let graph = parser.graph();
    println!(
        "{} {} is well-formed ({} actions, {} branches)",
        "✓".green().bold(),
        plan_path.display(),
        graph.count_kind(NodeKind::Action),
        graph.count_kind(NodeKind::Branch),
    );

    Ok(())
}
