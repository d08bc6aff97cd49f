// ABOUTME: Drives the WorldGraph router in-process with tower's oneshot
// ABOUTME: Covers status codes and JSON shapes of every route

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;
use worldgraph_api::{create_router, AppState};
use worldgraph_core::{AnalyticsConfig, Edge, InMemoryGraphStore, Node};

fn app() -> Router {
    let store = InMemoryGraphStore::new();
    for (id, group, year) in [
        ("ada", "Person", Some(1843)),
        ("babbage", "Person", Some(1837)),
        ("engine", "Idea", None),
        ("programs", "Idea", None),
    ] {
        let mut node = Node::new(id, id, group);
        node.year = year;
        store.add_node(node).expect("node");
    }
    for (from, to) in [
        ("ada", "engine"),
        ("babbage", "engine"),
        ("ada", "programs"),
        ("babbage", "programs"),
    ] {
        store
            .add_edge(Edge::new(format!("{}-{}", from, to), from, to, "related"))
            .expect("edge");
    }
    create_router(AppState::new(Arc::new(store), AnalyticsConfig::default()))
}

async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri(uri)
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");
    let status = response.status();
    let body = response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes();
    (status, serde_json::from_slice(&body).expect("json body"))
}

#[tokio::test]
async fn health_reports_ok() {
    let (status, body) = get(app(), "/api/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn combined_insights_have_every_section() {
    let (status, body) = get(app(), "/api/insights").await;
    assert_eq!(status, StatusCode::OK);
    for key in [
        "unexpectedConnections",
        "keyInsights",
        "knowledgeGaps",
        "influenceAnalysis",
        "temporalPatterns",
        "generatedAt",
    ] {
        assert!(body.get(key).is_some(), "missing {}", key);
    }
    let first = &body["unexpectedConnections"]["connections"][0];
    assert_eq!(first["nodeA"]["id"], "ada");
    assert_eq!(first["nodeB"]["id"], "babbage");
    assert_eq!(first["pathCount"], 2);
}

#[tokio::test]
async fn single_insight_by_type() {
    let (status, body) = get(app(), "/api/insights/temporal-patterns").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["type"], "temporal-patterns");
    assert_eq!(body["patterns"]["peakYears"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn unknown_insight_type_is_bad_request() {
    let (status, body) = get(app(), "/api/insights/everything").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], 400);
    assert!(body["error"].as_str().unwrap().contains("Invalid insight type"));
}

#[tokio::test]
async fn empty_workspace_reports_insufficient_data() {
    let (status, body) = get(app(), "/api/insights/key-insights?workspace=empty").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["type"], "key-insights");
    assert_eq!(body["message"], "No data available");
}

#[tokio::test]
async fn path_between_people() {
    let (status, body) = get(app(), "/api/graph/path?from=ada&to=babbage&maxDepth=3").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["depth"], 2);
    assert_eq!(body["path"].as_array().unwrap().len(), 3);
    assert_eq!(body["nodes"][0]["id"], "ada");
}

#[tokio::test]
async fn path_without_endpoints_is_bad_request() {
    let (status, body) = get(app(), "/api/graph/path?from=ada").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "from and to node IDs are required");
}

#[tokio::test]
async fn malformed_max_depth_gets_json_error() {
    let (status, body) = get(app(), "/api/graph/path?from=ada&to=babbage&maxDepth=deep").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], 400);
    assert!(body["error"].as_str().unwrap().contains("maxDepth"));
}

#[tokio::test]
async fn empty_max_depth_uses_default() {
    let (status, body) = get(app(), "/api/graph/path?from=ada&to=babbage&maxDepth=").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["depth"], 2);
}

#[tokio::test]
async fn path_beyond_depth_is_null() {
    let (status, body) = get(app(), "/api/graph/path?from=ada&to=babbage&maxDepth=1").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["path"].is_null());
    assert_eq!(body["message"], "No path found within max depth");
}

#[tokio::test]
async fn stats_for_workspace() {
    let (status, body) = get(app(), "/api/graph/stats").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["nodeCount"], 4);
    assert_eq!(body["edgeCount"], 4);
    assert_eq!(body["avgDegree"], 2.0);
    assert_eq!(body["yearRange"]["minYear"], 1837);
}
