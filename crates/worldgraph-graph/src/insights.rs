// ABOUTME: Runs the five insight analyzers over one workspace snapshot
// ABOUTME: Each analyzer gets its own blocking task so one failure cannot sink the others

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use tracing::{error, info, instrument, warn};
use worldgraph_core::{AnalyticsConfig, GraphStore, Result};

use crate::clusters::find_key_insights;
use crate::context::AnalysisContext;
use crate::degree::find_knowledge_gaps;
use crate::influence::analyze_influence;
use crate::multi_path::find_unexpected_connections;
use crate::path::PathFinder;
use crate::report::{CombinedInsights, InsightSection, InsightType, Section};
use crate::stats::GraphStats;
use crate::temporal::find_temporal_patterns;

#[derive(Clone)]
pub struct InsightsEngine {
    store: Arc<dyn GraphStore>,
    config: AnalyticsConfig,
}

impl InsightsEngine {
    pub fn new(store: Arc<dyn GraphStore>) -> Self {
        Self::with_config(store, AnalyticsConfig::default())
    }

    pub fn with_config(store: Arc<dyn GraphStore>, config: AnalyticsConfig) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> &AnalyticsConfig {
        &self.config
    }

    pub fn path_finder(&self) -> PathFinder {
        PathFinder::new(self.store.clone())
            .with_depths(self.config.default_path_depth, self.config.max_path_depth)
    }

    /// All five sections over a single snapshot read.
    ///
    /// Fails only when the snapshot cannot be loaded. An analyzer that panics
    /// comes back as a failed section next to the others.
    #[instrument(skip(self))]
    pub async fn generate(&self, workspace: &str) -> Result<CombinedInsights> {
        let started = Instant::now();
        let ctx = Arc::new(self.load_context(workspace).await?);

        let (unexpected_connections, key_insights, knowledge_gaps, influence_analysis, temporal_patterns) = tokio::join!(
            run_section(
                ctx.clone(),
                InsightType::UnexpectedConnections,
                find_unexpected_connections
            ),
            run_section(ctx.clone(), InsightType::KeyInsights, find_key_insights),
            run_section(ctx.clone(), InsightType::KnowledgeGaps, find_knowledge_gaps),
            run_section(ctx.clone(), InsightType::InfluenceAnalysis, analyze_influence),
            run_section(ctx.clone(), InsightType::TemporalPatterns, find_temporal_patterns),
        );

        let insights = CombinedInsights {
            unexpected_connections,
            key_insights,
            knowledge_gaps,
            influence_analysis,
            temporal_patterns,
            generated_at: Utc::now(),
        };
        info!(
            "Generated insights for workspace '{}' ({} nodes, {} edges) in {}ms, {} failed sections",
            workspace,
            ctx.nodes().len(),
            ctx.edges().len(),
            started.elapsed().as_millis(),
            insights.failed_sections()
        );
        Ok(insights)
    }

    #[instrument(skip(self))]
    pub async fn generate_one(&self, workspace: &str, kind: InsightType) -> Result<InsightSection> {
        let ctx = Arc::new(self.load_context(workspace).await?);
        let section = match kind {
            InsightType::UnexpectedConnections => InsightSection::UnexpectedConnections(
                run_section(ctx, kind, find_unexpected_connections).await,
            ),
            InsightType::KeyInsights => {
                InsightSection::KeyInsights(run_section(ctx, kind, find_key_insights).await)
            }
            InsightType::KnowledgeGaps => {
                InsightSection::KnowledgeGaps(run_section(ctx, kind, find_knowledge_gaps).await)
            }
            InsightType::InfluenceAnalysis => {
                InsightSection::InfluenceAnalysis(run_section(ctx, kind, analyze_influence).await)
            }
            InsightType::TemporalPatterns => {
                InsightSection::TemporalPatterns(run_section(ctx, kind, find_temporal_patterns).await)
            }
        };
        Ok(section)
    }

    /// Like [`generate_one`](Self::generate_one), taking the route name of the
    /// section. Unknown names are rejected before the store is touched.
    pub async fn generate_named(&self, workspace: &str, name: &str) -> Result<InsightSection> {
        let kind: InsightType = name.parse()?;
        self.generate_one(workspace, kind).await
    }

    pub async fn stats(&self, workspace: &str) -> Result<GraphStats> {
        let snapshot = self.store.load_snapshot(workspace).await?;
        Ok(GraphStats::from_snapshot(&snapshot))
    }

    async fn load_context(&self, workspace: &str) -> Result<AnalysisContext> {
        let snapshot = self.store.load_snapshot(workspace).await.map_err(|e| {
            error!("Failed to load snapshot for workspace '{}': {}", workspace, e);
            e
        })?;
        Ok(AnalysisContext::new(snapshot, self.config.clone()))
    }
}

async fn run_section<T, F>(ctx: Arc<AnalysisContext>, kind: InsightType, analyzer: F) -> Section<T>
where
    T: Send + 'static,
    F: FnOnce(&AnalysisContext) -> Section<T> + Send + 'static,
{
    match tokio::task::spawn_blocking(move || analyzer(&ctx)).await {
        Ok(section) => section,
        Err(e) => {
            warn!("{} analysis failed: {}", kind, e);
            Section::failed(kind, format!("Analysis failed: {}", e))
        }
    }
}
