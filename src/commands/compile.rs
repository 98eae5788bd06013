//! Compile a plan into a dispatch graph
//! Usage: weft compile <plan> --domain <file> [--json|--dot]

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use colored::Colorize;
use serde::Serialize;
use std::path::Path;
use uuid::Uuid;

use crate::commands::graph::{build_graph_display, render_dot};
use crate::environment::PlanningEnvironment;
use crate::knowledge::KnowledgeClient;
use crate::models::edge::PlanEdge;
use crate::models::filter::FilterRequest;
use crate::models::node::{NodeKind, PlanNode};
use crate::plan::{ContingentPlanParser, PlanParser};

/// Compiled plan artifact emitted by `--json`
#[derive(Debug, Serialize)]
struct CompiledPlan<'a> {
    plan_id: Uuid,
    compiled_at: DateTime<Utc>,
    source: String,
    nodes: &'a [PlanNode],
    edges: &'a [PlanEdge],
    filter: Option<&'a FilterRequest>,
}

pub fn execute(
    plan_path: &Path,
    domain_path: &Path,
    free_action_id: usize,
    knowledge_url: Option<String>,
    json: bool,
    dot: bool,
) -> Result<()> {
    let environment = PlanningEnvironment::load(domain_path)?;

    let mut parser = match knowledge_url {
        Some(url) => ContingentPlanParser::with_knowledge(KnowledgeClient::new(&url)?),
        None => ContingentPlanParser::new(),
    };

    let filters_delivered = parser
        .produce_esterel(plan_path, &environment, free_action_id)
        .with_context(|| format!("Failed to compile plan: {}", plan_path.display()))?;

    if json {
        let artifact = CompiledPlan {
            plan_id: parser.plan_id(),
            compiled_at: Utc::now(),
            source: plan_path.display().to_string(),
            nodes: parser.graph().nodes(),
            edges: parser.graph().edges(),
            filter: parser.filter(),
        };
        println!("{}", serde_json::to_string_pretty(&artifact)?);
        return Ok(());
    }

    if dot {
        print!("{}", render_dot(parser.graph()));
        return Ok(());
    }

    let graph = parser.graph();
    println!("\n{}", "Compile".bold());
    println!("{}", "─".repeat(40).dimmed());
    println!("  plan:    {}", plan_path.display());
    println!("  domain:  {}", domain_path.display());
    println!(
        "  nodes:   {} ({} actions, {} branches, {} merges)",
        graph.node_count(),
        graph.count_kind(NodeKind::Action),
        graph.count_kind(NodeKind::Branch),
        graph.count_kind(NodeKind::Merge),
    );
    println!("  edges:   {}", graph.edge_count());
    if let Some(filter) = parser.filter() {
        println!("  filters: {} watched predicates", filter.entries.len());
    }
    println!();
    println!("{}", build_graph_display(graph));

    if !filters_delivered {
        println!(
            "{} knowledge store unavailable; branch conditions will not be resolved",
            "warning:".yellow().bold()
        );
    }

    Ok(())
}
