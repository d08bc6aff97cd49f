use crate::{ApiError, ApiResult, AppState};
use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use worldgraph_core::DEFAULT_WORKSPACE;
use worldgraph_graph::{CombinedInsights, GraphStats, InsightSection, PathOutcome};

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct WorkspaceQuery {
    pub workspace: Option<String>,
}

impl WorkspaceQuery {
    pub fn workspace(&self) -> &str {
        workspace_or_default(self.workspace.as_deref())
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathQuery {
    pub from: Option<String>,
    pub to: Option<String>,
    /// Raw text; read through [`PathQuery::max_depth`]
    pub max_depth: Option<String>,
    pub workspace: Option<String>,
}

impl PathQuery {
    pub fn max_depth(&self) -> ApiResult<Option<usize>> {
        match self.max_depth.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(raw) => raw.parse().map(Some).map_err(|_| {
                ApiError::BadRequest(format!("maxDepth must be a non-negative integer, got '{}'", raw))
            }),
        }
    }
}

fn workspace_or_default(workspace: Option<&str>) -> &str {
    match workspace.map(str::trim) {
        Some(name) if !name.is_empty() => name,
        _ => DEFAULT_WORKSPACE,
    }
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        message: "WorldGraph API is running".to_string(),
    })
}

pub async fn get_insights(
    State(state): State<AppState>,
    Query(query): Query<WorkspaceQuery>,
) -> ApiResult<Json<CombinedInsights>> {
    let insights = state.engine.generate(query.workspace()).await?;
    Ok(Json(insights))
}

pub async fn get_insight(
    State(state): State<AppState>,
    Path(kind): Path<String>,
    Query(query): Query<WorkspaceQuery>,
) -> ApiResult<Json<InsightSection>> {
    let section = state.engine.generate_named(query.workspace(), &kind).await?;
    Ok(Json(section))
}

pub async fn find_path(
    State(state): State<AppState>,
    Query(query): Query<PathQuery>,
) -> ApiResult<Json<PathOutcome>> {
    let workspace = workspace_or_default(query.workspace.as_deref());
    let max_depth = query.max_depth()?;
    let outcome = state
        .engine
        .path_finder()
        .find_path(
            workspace,
            query.from.as_deref().unwrap_or_default(),
            query.to.as_deref().unwrap_or_default(),
            max_depth,
        )
        .await?;
    Ok(Json(outcome))
}

pub async fn graph_stats(
    State(state): State<AppState>,
    Query(query): Query<WorkspaceQuery>,
) -> ApiResult<Json<GraphStats>> {
    let stats = state.engine.stats(query.workspace()).await?;
    Ok(Json(stats))
}
