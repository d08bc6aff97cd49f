use std::sync::Arc;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use worldgraph_api::{AppState, Server};
use worldgraph_core::{GraphSnapshot, InMemoryGraphStore, Settings};

const SNAPSHOT_VAR: &str = "WORLDGRAPH_SNAPSHOT";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "worldgraph_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let settings = Settings::load().context("Failed to load settings")?;

    let store = InMemoryGraphStore::new();
    if let Ok(path) = std::env::var(SNAPSHOT_VAR) {
        let snapshot = GraphSnapshot::from_json_file(&path)
            .with_context(|| format!("Failed to read snapshot {}", path))?;
        let (nodes, edges) = store
            .import(snapshot)
            .with_context(|| format!("Invalid snapshot {}", path))?;
        info!("Loaded {} nodes and {} edges from {}", nodes, edges, path);
    }

    let state = AppState::new(Arc::new(store), settings.analytics.clone());
    Server::new(&settings.server, state)
        .run()
        .await
        .context("API server failed")?;
    Ok(())
}
