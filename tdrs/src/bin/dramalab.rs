//! dramalab CLI: run a social simulation from a TOML world file.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use repraxis::DBQuery;
use tdrs::{EngineSnapshot, SocialEngine, SocialEngineConfig};

#[derive(Parser)]
#[command(name = "dramalab", version, about = "Social simulation engine")]
struct Cli {
    /// World definition file.
    #[arg(long, global = true, default_value = "world.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Advance the simulation and print the resulting state.
    Run {
        /// Number of ticks to simulate.
        #[arg(long, default_value = "1")]
        ticks: u32,

        /// Print the snapshot as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Run a query against the world's facts.
    Query {
        /// Query clauses, e.g. "?a.relationships.?b" "gte ?r 10".
        #[arg(required = true)]
        clauses: Vec<String>,
    },

    /// Dispatch a social event and print the resulting state.
    Event {
        /// Event name.
        name: String,

        /// Agents bound to the event roles, in order.
        agents: Vec<String>,

        /// Print the snapshot as JSON.
        #[arg(long)]
        json: bool,
    },

    /// List every fact in the world.
    Facts,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let config = SocialEngineConfig::from_file(&cli.config)
        .with_context(|| format!("failed to load world from {}", cli.config.display()))?;
    let mut engine = SocialEngine::from_config(&config).context("failed to build world")?;

    match cli.command {
        Commands::Run { ticks, json } => {
            for _ in 0..ticks {
                engine.tick()?;
            }
            print_snapshot(&engine.snapshot(), json)?;
        }

        Commands::Query { clauses } => {
            let result = DBQuery::from_clauses(clauses).run(engine.db())?;
            if !result.success() {
                println!("No results.");
            } else if result.is_empty() {
                println!("true");
            } else {
                for (i, bindings) in result.bindings().iter().enumerate() {
                    let rendered: Vec<String> = bindings
                        .iter()
                        .map(|(name, value)| format!("{} = {}", name, value))
                        .collect();
                    println!("  {}. {}", i + 1, rendered.join(", "));
                }
            }
        }

        Commands::Event { name, agents, json } => {
            let agents: Vec<&str> = agents.iter().map(String::as_str).collect();
            engine
                .dispatch_event(&name, &agents)
                .with_context(|| format!("event '{}' failed", name))?;
            print_snapshot(&engine.snapshot(), json)?;
        }

        Commands::Facts => {
            for fact in engine.db().sentences() {
                println!("{}", fact);
            }
        }
    }

    Ok(())
}

fn print_snapshot(snapshot: &EngineSnapshot, json: bool) -> Result<()> {
    if json {
        println!("{}", snapshot.to_json()?);
        return Ok(());
    }

    println!("Agents:");
    for agent in &snapshot.agents {
        println!("  {} ({})", agent.uid, agent.agent_type);
        for stat in &agent.stats {
            println!("    {}: {} (base {})", stat.name, stat.value, stat.base_value);
        }
        for instance in &agent.traits {
            println!("    [{}] {}", instance.trait_id, instance.description);
        }
    }

    println!("Relationships:");
    for relationship in &snapshot.relationships {
        match &relationship.relationship_type {
            Some(kind) => println!("  {} -> {} ({})", relationship.owner, relationship.target, kind),
            None => println!("  {} -> {}", relationship.owner, relationship.target),
        }
        for stat in &relationship.stats {
            println!("    {}: {} (base {})", stat.name, stat.value, stat.base_value);
        }
        for rule in &relationship.active_social_rules {
            println!("    rule {}: {}", rule.rule_id, rule.description);
        }
    }

    Ok(())
}
