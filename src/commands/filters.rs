//! Derive knowledge-store filters from a plan's branch conditions
//! Usage: weft filters <plan> --domain <file> [--knowledge-url <url>]

use anyhow::{bail, Result};
use colored::Colorize;
use std::path::Path;

use crate::environment::PlanningEnvironment;
use crate::knowledge::KnowledgeClient;
use crate::models::filter::NotificationKind;
use crate::plan::{ContingentPlanParser, PlanError, PlanParser};

pub fn execute(
    plan_path: &Path,
    domain_path: &Path,
    knowledge_url: Option<String>,
    notify: NotificationKind,
) -> Result<()> {
    let environment = PlanningEnvironment::load(domain_path)?;

    let push = knowledge_url.is_some();
    let mut parser = match knowledge_url {
        Some(url) => ContingentPlanParser::with_knowledge(KnowledgeClient::new(&url)?),
        None => ContingentPlanParser::new(),
    };
    parser.set_notification(notify);
    parser.prepare_plan(plan_path, &environment, 0)?;

    let delivered = match parser.generate_filter() {
        Ok(()) => true,
        Err(PlanError::KnowledgeStore { reason }) => {
            println!(
                "{} knowledge store unavailable: {reason}",
                "warning:".yellow().bold()
            );
            false
        }
        Err(err) => return Err(err.into()),
    };

    let Some(request) = parser.filter() else {
        bail!("No filter was derived");
    };

    println!("\n{}", "Filters".bold());
    println!("{}", "─".repeat(40).dimmed());
    if request.is_empty() {
        println!("  (no branch conditions; nothing to watch)");
        return Ok(());
    }

    for entry in &request.entries {
        println!(
            "  {} {} {}",
            "◆".yellow().bold(),
            entry.predicate,
            entry.arguments.join(" ").dimmed()
        );
    }
    println!();
    println!(
        "  {} distinct predicates, notification kind: {:?}",
        request.entries.len(),
        notify
    );
    if push && delivered {
        println!("  {} pushed to knowledge store", "✓".green().bold());
    }

    Ok(())
}
