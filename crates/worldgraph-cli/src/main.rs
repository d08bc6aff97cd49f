use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use worldgraph_api::{AppState, Server};
use worldgraph_core::{GraphSnapshot, InMemoryGraphStore, Settings, DEFAULT_WORKSPACE};
use worldgraph_graph::InsightsEngine;

#[derive(Parser)]
#[command(name = "worldgraph")]
#[command(about = "WorldGraph CLI - insights and paths over a knowledge graph", long_about = None)]
#[command(version)]
struct Cli {
    /// Output format (json, pretty)
    #[arg(short, long, global = true, default_value = "pretty")]
    output: OutputFormat,

    /// Graph snapshot file: {"nodes": [...], "edges": [...]}
    #[arg(long, global = true, env = "WORLDGRAPH_SNAPSHOT")]
    snapshot: Option<PathBuf>,

    /// Workspace to analyze
    #[arg(short, long, global = true, default_value = DEFAULT_WORKSPACE)]
    workspace: String,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    Json,
    Pretty,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the insight analyzers
    Insights {
        /// Only this section (unexpected-connections, key-insights, knowledge-gaps,
        /// influence-analysis, temporal-patterns)
        #[arg(short = 't', long = "type")]
        kind: Option<String>,
    },

    /// Shortest path between two nodes
    Path {
        /// Source node ID
        from: String,

        /// Target node ID
        to: String,

        /// Maximum number of hops
        #[arg(short = 'd', long)]
        max_depth: Option<usize>,
    },

    /// Node, edge, group and year statistics
    Stats,

    /// Serve the HTTP API over the loaded snapshot
    Serve {
        /// Bind address (overrides server.host)
        #[arg(long)]
        host: Option<String>,

        /// Port (overrides server.port)
        #[arg(short, long)]
        port: Option<u16>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let settings = Settings::load().context("Failed to load configuration")?;
    init_tracing(&settings, cli.verbose);

    let store = Arc::new(load_store(cli.snapshot.as_deref())?);

    if let Commands::Serve { host, port } = &cli.command {
        let mut server_config = settings.server.clone();
        if let Some(host) = host {
            server_config.host = host.clone();
        }
        if let Some(port) = port {
            server_config.port = *port;
        }
        let state = AppState::new(store, settings.analytics.clone());
        return Server::new(&server_config, state)
            .run()
            .await
            .context("API server failed");
    }

    let engine = InsightsEngine::with_config(store, settings.analytics.clone());
    match execute_command(&cli, &engine).await {
        Ok(output) => {
            print_output(&cli.output, &output)?;
            Ok(())
        }
        Err(e) => {
            eprintln!("{} {:#}", "Error:".red().bold(), e);
            std::process::exit(1);
        }
    }
}

fn init_tracing(settings: &Settings, verbose: bool) {
    let fallback = if verbose {
        "debug".to_string()
    } else {
        settings.logging.level.clone()
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| fallback.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn load_store(snapshot: Option<&Path>) -> Result<InMemoryGraphStore> {
    let Some(path) = snapshot else {
        warn!("No snapshot given; every workspace is empty");
        return Ok(InMemoryGraphStore::new());
    };
    let snapshot = GraphSnapshot::from_json_file(path)
        .with_context(|| format!("Failed to read snapshot {}", path.display()))?;
    let store = InMemoryGraphStore::from_snapshot(snapshot)
        .with_context(|| format!("Invalid snapshot {}", path.display()))?;
    info!("Loaded snapshot {} (workspaces: {:?})", path.display(), store.workspaces());
    Ok(store)
}

async fn execute_command(cli: &Cli, engine: &InsightsEngine) -> Result<serde_json::Value> {
    let workspace = cli.workspace.as_str();
    match &cli.command {
        Commands::Insights { kind: None } => {
            let insights = engine.generate(workspace).await?;
            Ok(serde_json::to_value(insights)?)
        }
        Commands::Insights { kind: Some(kind) } => {
            let section = engine.generate_named(workspace, kind).await?;
            Ok(serde_json::to_value(section)?)
        }
        Commands::Path { from, to, max_depth } => {
            let outcome = engine
                .path_finder()
                .find_path(workspace, from, to, *max_depth)
                .await?;
            Ok(serde_json::to_value(outcome)?)
        }
        Commands::Stats => {
            let stats = engine.stats(workspace).await?;
            Ok(serde_json::to_value(stats)?)
        }
        Commands::Serve { .. } => anyhow::bail!("serve is not a one-shot command"),
    }
}

fn print_output(format: &OutputFormat, value: &serde_json::Value) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(value)?);
        }
        OutputFormat::Pretty => {
            print_pretty(value, 0);
        }
    }
    Ok(())
}

fn print_pretty(value: &serde_json::Value, indent: usize) {
    let pad = "  ".repeat(indent);
    match value {
        serde_json::Value::Object(map) => {
            for (key, val) in map {
                let key_colored = key.cyan().bold();
                match val {
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        println!("{}{}:", pad, key_colored);
                        print_pretty(val, indent + 1);
                    }
                    _ => println!("{}{}: {}", pad, key_colored, scalar(val)),
                }
            }
        }
        serde_json::Value::Array(arr) => {
            if arr.is_empty() {
                println!("{}{}", pad, "(none)".dimmed());
            }
            for (i, item) in arr.iter().enumerate() {
                match item {
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        println!("{}{}{}:", pad, "Item ".cyan(), (i + 1).to_string().yellow());
                        print_pretty(item, indent + 1);
                    }
                    _ => println!("{}- {}", pad, scalar(item)),
                }
            }
        }
        _ => println!("{}{}", pad, scalar(value)),
    }
}

fn scalar(value: &serde_json::Value) -> colored::ColoredString {
    match value {
        serde_json::Value::String(s) => s.green(),
        serde_json::Value::Number(n) => n.to_string().yellow(),
        serde_json::Value::Bool(true) => "true".green(),
        serde_json::Value::Bool(false) => "false".red(),
        serde_json::Value::Null => "null".dimmed(),
        other => other.to_string().normal(),
    }
}
