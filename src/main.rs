use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use weft::commands::{check, compile, filters, graph};
use weft::models::filter::NotificationKind;

#[derive(Parser)]
#[command(name = "weft")]
#[command(about = "Contingent plan compiler", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a plan into a dispatch graph
    Compile {
        /// Path to the planner's output file
        plan: PathBuf,

        /// Path to the domain description (YAML)
        #[arg(short, long)]
        domain: PathBuf,

        /// First node id to assign (keeps ids clear of a previous pass)
        #[arg(long, default_value_t = 0)]
        free_action_id: usize,

        /// Knowledge store base URL; filters are pushed when given
        #[arg(long)]
        knowledge_url: Option<String>,

        /// Emit the compiled plan as JSON
        #[arg(long, conflicts_with = "dot")]
        json: bool,

        /// Emit the graph in Graphviz DOT format
        #[arg(long)]
        dot: bool,
    },

    /// Validate a plan against a domain without producing output
    Check {
        /// Path to the planner's output file
        plan: PathBuf,

        /// Path to the domain description (YAML)
        #[arg(short, long)]
        domain: PathBuf,
    },

    /// List (and optionally push) the knowledge-store filters for a plan
    Filters {
        /// Path to the planner's output file
        plan: PathBuf,

        /// Path to the domain description (YAML)
        #[arg(short, long)]
        domain: PathBuf,

        /// Knowledge store base URL; filters are pushed when given
        #[arg(long)]
        knowledge_url: Option<String>,

        /// Notification kind to request (known, changed)
        #[arg(long, default_value = "known")]
        notify: String,
    },

    /// Show the dispatch graph for a plan
    Graph {
        /// Path to the planner's output file
        plan: PathBuf,

        /// Path to the domain description (YAML)
        #[arg(short, long)]
        domain: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Compile {
            plan,
            domain,
            free_action_id,
            knowledge_url,
            json,
            dot,
        } => compile::execute(&plan, &domain, free_action_id, knowledge_url, json, dot),
        Commands::Check { plan, domain } => check::execute(&plan, &domain),
        Commands::Filters {
            plan,
            domain,
            knowledge_url,
            notify,
        } => {
            let notify = notify.parse::<NotificationKind>()?;
            filters::execute(&plan, &domain, knowledge_url, notify)
        }
        Commands::Graph { plan, domain } => graph::execute(&plan, &domain),
    }
}
