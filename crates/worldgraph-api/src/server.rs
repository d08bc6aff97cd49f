use crate::{create_router, AppState};
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info};
use worldgraph_core::{Result, ServerConfig};

pub struct Server {
    state: AppState,
    host: String,
    port: u16,
}

impl Server {
    pub fn new(config: &ServerConfig, state: AppState) -> Self {
        Self {
            state,
            host: config.host.clone(),
            port: config.port,
        }
    }

    pub async fn run(self) -> Result<()> {
        let router = create_router(self.state);

        let listener = TcpListener::bind((self.host.as_str(), self.port)).await?;
        let addr = listener.local_addr()?;

        info!("WorldGraph API listening on http://{}", addr);
        info!("  GET /api/health");
        info!("  GET /api/insights?workspace=<name>");
        info!("  GET /api/insights/{{type}}?workspace=<name>");
        info!("  GET /api/graph/path?from=<id>&to=<id>&maxDepth=<n>");
        info!("  GET /api/graph/stats?workspace=<name>");

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        Ok(())
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down gracefully");
        },
        _ = terminate => {
            info!("Received SIGTERM, shutting down gracefully");
        },
    }
}
