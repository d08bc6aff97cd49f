use std::sync::Arc;

use worldgraph_core::{AnalyticsConfig, GraphStore};
use worldgraph_graph::InsightsEngine;

#[derive(Clone)]
pub struct AppState {
    pub engine: InsightsEngine,
}

impl AppState {
    pub fn new(store: Arc<dyn GraphStore>, analytics: AnalyticsConfig) -> Self {
        Self {
            engine: InsightsEngine::with_config(store, analytics),
        }
    }
}
