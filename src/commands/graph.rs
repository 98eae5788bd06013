//! Dispatch graph display
//! Usage: weft graph <plan> --domain <file>

use anyhow::Result;
use colored::{ColoredString, Colorize};
use std::path::Path;

use crate::environment::PlanningEnvironment;
use crate::models::node::NodeKind;
use crate::plan::{ContingentPlanParser, DispatchGraph, PlanParser};

/// Kind indicator with color for display
fn kind_indicator(kind: &NodeKind) -> ColoredString {
    match kind {
        NodeKind::Action => "●".cyan().bold(),
        NodeKind::Branch => "◆".yellow().bold(),
        NodeKind::Merge => "○".white().dimmed(),
        NodeKind::End => "■".green().bold(),
    }
}

/// Label an edge destination with its id and signature
fn target_label(graph: &DispatchGraph, target: Option<usize>) -> String {
    match target.and_then(|id| graph.node(id)) {
        Some(node) => format!("[{}] {}", node.id, node.signature()),
        None => "(unresolved)".to_string(),
    }
}

/// Build a textual representation of the dispatch graph in creation order
pub fn build_graph_display(graph: &DispatchGraph) -> String {
    if graph.is_empty() {
        return "(empty plan)".to_string();
    }

    let mut output = String::new();
    for node in graph.nodes() {
        let indicator = kind_indicator(&node.kind);
        output.push_str(&format!("  {indicator} [{}] {}\n", node.id, node.signature()));

        for (position, &edge_id) in node.outgoing.iter().enumerate() {
            let Some(edge) = graph.edge(edge_id) else {
                continue;
            };
            let connector = if position + 1 == node.outgoing.len() {
                "└─"
            } else {
                "├─"
            };
            let destination = target_label(graph, edge.target);
            match &edge.condition {
                Some(condition) => output.push_str(&format!(
                    "      {connector} {} → {destination}\n",
                    condition.to_string().yellow()
                )),
                None => output.push_str(&format!("      {connector} → {destination}\n")),
            }
        }
    }

    output
}

/// Render the graph in Graphviz DOT format
pub fn render_dot(graph: &DispatchGraph) -> String {
    let mut output = String::from("digraph plan {\n  rankdir=TB;\n");

    for node in graph.nodes() {
        let shape = match node.kind {
            NodeKind::Action => "box",
            NodeKind::Branch => "diamond",
            NodeKind::Merge => "circle",
            NodeKind::End => "doublecircle",
        };
        output.push_str(&format!(
            "  n{} [label=\"{}\", shape={shape}];\n",
            node.id,
            node.signature()
        ));
    }

    for edge in graph.edges() {
        let Some(target) = edge.target else {
            continue;
        };
        match &edge.condition {
            Some(condition) => output.push_str(&format!(
                "  n{} -> n{target} [label=\"{condition}\"];\n",
                edge.source
            )),
            None => output.push_str(&format!("  n{} -> n{target};\n", edge.source)),
        }
    }

    output.push_str("}\n");
    output
}

/// Show the dispatch graph for a plan
pub fn execute(plan_path: &Path, domain_path: &Path) -> Result<()> {
    let environment = PlanningEnvironment::load(domain_path)?;
    let mut parser = ContingentPlanParser::new();
    parser.prepare_plan(plan_path, &environment, 0)?;

    println!();
    println!("Dispatch Graph:");
    println!("===============");
    println!();
    println!("{}", build_graph_display(parser.graph()));

    println!();
    print!("Legend: ");
    print!("{} ", "●".cyan().bold());
    print!("action  ");
    print!("{} ", "◆".yellow().bold());
    print!("branch  ");
    print!("{} ", "○".white().dimmed());
    print!("merge  ");
    print!("{} ", "■".green().bold());
    println!("end");
    println!();

    Ok(())
}
