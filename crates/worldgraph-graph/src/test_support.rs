use std::sync::Arc;

use worldgraph_core::{AnalyticsConfig, Edge, GraphSnapshot, InMemoryGraphStore, Node, DEFAULT_WORKSPACE};

use crate::context::AnalysisContext;

pub fn node(id: &str, group: &str) -> Node {
    Node::new(id, id, group)
}

pub fn edge(from: &str, to: &str) -> Edge {
    Edge::new(format!("{}-{}", from, to), from, to, "related")
}

pub fn context(nodes: Vec<Node>, edges: Vec<Edge>) -> AnalysisContext {
    AnalysisContext::new(GraphSnapshot::new(nodes, edges), AnalyticsConfig::default())
}

pub fn store_with(nodes: Vec<Node>, edges: Vec<Edge>) -> Arc<InMemoryGraphStore> {
    let store = InMemoryGraphStore::new();
    for node in nodes {
        store.add_node(node.in_workspace(DEFAULT_WORKSPACE)).unwrap();
    }
    for edge in edges {
        store.add_edge(edge.in_workspace(DEFAULT_WORKSPACE)).unwrap();
    }
    Arc::new(store)
}
