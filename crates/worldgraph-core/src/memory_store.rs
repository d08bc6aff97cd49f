// ABOUTME: In-memory implementation of the GraphStore loader boundary
// ABOUTME: Enforces the node/edge model rules that the persistent store would enforce

use crate::{
    clamp_weight, Edge, EdgeId, GraphSnapshot, GraphStore, Node, NodeId, Result, WorldGraphError,
};
use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::collections::HashSet;
use tracing::debug;
use uuid::Uuid;

#[derive(Debug, Default, Clone)]
struct WorkspaceGraph {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
}

impl WorkspaceGraph {
    fn has_node(&self, id: &str) -> bool {
        self.nodes.iter().any(|n| n.id == id)
    }
}

/// Workspace-partitioned graph kept in insertion order.
///
/// Node ids are unique across the whole store, not just within a workspace.
#[derive(Debug, Default)]
pub struct InMemoryGraphStore {
    workspaces: DashMap<String, WorkspaceGraph>,
    /// Owning workspace of every node id
    node_owners: DashMap<NodeId, String>,
}

impl InMemoryGraphStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from a snapshot document whose records carry their own workspace.
    pub fn from_snapshot(snapshot: GraphSnapshot) -> Result<Self> {
        let store = Self::new();
        store.import(snapshot)?;
        Ok(store)
    }

    /// Insert every node, then every edge, of `snapshot`. Stops at the first invalid record.
    pub fn import(&self, snapshot: GraphSnapshot) -> Result<(usize, usize)> {
        let node_count = snapshot.nodes.len();
        let edge_count = snapshot.edges.len();
        for node in snapshot.nodes {
            self.add_node(node)?;
        }
        for edge in snapshot.edges {
            self.add_edge(edge)?;
        }
        debug!("Imported {} nodes and {} edges", node_count, edge_count);
        Ok((node_count, edge_count))
    }

    pub fn workspaces(&self) -> Vec<String> {
        let mut names: Vec<String> = self.workspaces.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }

    pub fn add_node(&self, mut node: Node) -> Result<Node> {
        node.label = required_text("label", &node.label)?;
        node.group = required_text("group", &node.group)?;
        node.description = node.description.trim().to_string();
        node.tags = node
            .tags
            .iter()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect();
        if node.id.trim().is_empty() {
            node.id = Uuid::new_v4().to_string();
        }

        match self.node_owners.entry(node.id.clone()) {
            Entry::Occupied(owner) => {
                return Err(WorldGraphError::Conflict(format!(
                    "node {} already exists in workspace {}",
                    node.id,
                    owner.get()
                )));
            }
            Entry::Vacant(slot) => {
                slot.insert(node.workspace.clone());
            }
        }

        self.workspaces
            .entry(node.workspace.clone())
            .or_default()
            .nodes
            .push(node.clone());
        Ok(node)
    }

    /// Replace an existing node in place. Identity and workspace are kept.
    pub fn update_node(&self, workspace: &str, id: &str, mut node: Node) -> Result<Node> {
        node.label = required_text("label", &node.label)?;
        node.group = required_text("group", &node.group)?;
        node.id = id.to_string();
        node.workspace = workspace.to_string();

        let mut graph = self
            .workspaces
            .get_mut(workspace)
            .ok_or_else(|| WorldGraphError::NodeNotFound(id.to_string()))?;
        let slot = graph
            .nodes
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or_else(|| WorldGraphError::NodeNotFound(id.to_string()))?;
        *slot = node.clone();
        Ok(node)
    }

    /// Remove a node and every edge touching it. Returns the number of edges removed.
    pub fn remove_node(&self, workspace: &str, id: &str) -> Result<usize> {
        let mut graph = self
            .workspaces
            .get_mut(workspace)
            .ok_or_else(|| WorldGraphError::NodeNotFound(id.to_string()))?;
        let before = graph.nodes.len();
        graph.nodes.retain(|n| n.id != id);
        if graph.nodes.len() == before {
            return Err(WorldGraphError::NodeNotFound(id.to_string()));
        }
        self.node_owners.remove(id);
        let edges_before = graph.edges.len();
        graph.edges.retain(|e| !e.touches(id));
        Ok(edges_before - graph.edges.len())
    }

    pub fn add_edge(&self, mut edge: Edge) -> Result<Edge> {
        edge.label = required_text("label", &edge.label)?;
        edge.weight = clamp_weight(edge.weight);
        if edge.id.trim().is_empty() {
            edge.id = Uuid::new_v4().to_string();
        }

        let mut graph = self
            .workspaces
            .get_mut(&edge.workspace)
            .ok_or_else(|| WorldGraphError::NodeNotFound(edge.from.clone()))?;
        for endpoint in [&edge.from, &edge.to] {
            if !graph.has_node(endpoint) {
                return Err(WorldGraphError::NodeNotFound(format!(
                    "{} (workspace {})",
                    endpoint, edge.workspace
                )));
            }
        }
        if graph
            .edges
            .iter()
            .any(|e| e.from == edge.from && e.to == edge.to)
        {
            return Err(WorldGraphError::Conflict(format!(
                "edge {} -> {} already exists in workspace {}",
                edge.from, edge.to, edge.workspace
            )));
        }
        graph.edges.push(edge.clone());
        Ok(edge)
    }

    pub fn remove_edge(&self, workspace: &str, id: &EdgeId) -> Result<Edge> {
        let mut graph = self
            .workspaces
            .get_mut(workspace)
            .ok_or_else(|| WorldGraphError::InvalidInput(format!("unknown edge {}", id)))?;
        let position = graph
            .edges
            .iter()
            .position(|e| &e.id == id)
            .ok_or_else(|| WorldGraphError::InvalidInput(format!("unknown edge {}", id)))?;
        Ok(graph.edges.remove(position))
    }
}

fn required_text(field: &str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(WorldGraphError::InvalidInput(format!(
            "{} must not be empty",
            field
        )));
    }
    Ok(trimmed.to_string())
}

#[async_trait]
impl GraphStore for InMemoryGraphStore {
    async fn load_snapshot(&self, workspace: &str) -> Result<GraphSnapshot> {
        Ok(self
            .workspaces
            .get(workspace)
            .map(|g| GraphSnapshot::new(g.nodes.clone(), g.edges.clone()))
            .unwrap_or_default())
    }

    async fn edges_incident_to(&self, workspace: &str, node_ids: &[NodeId]) -> Result<Vec<Edge>> {
        let wanted: HashSet<&str> = node_ids.iter().map(String::as_str).collect();
        Ok(self
            .workspaces
            .get(workspace)
            .map(|g| {
                g.edges
                    .iter()
                    .filter(|e| wanted.contains(e.from.as_str()) || wanted.contains(e.to.as_str()))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn get_nodes(&self, workspace: &str, ids: &[NodeId]) -> Result<Vec<Node>> {
        let wanted: HashSet<&str> = ids.iter().map(String::as_str).collect();
        Ok(self
            .workspaces
            .get(workspace)
            .map(|g| {
                g.nodes
                    .iter()
                    .filter(|n| wanted.contains(n.id.as_str()))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DEFAULT_WORKSPACE;

    fn seeded() -> InMemoryGraphStore {
        let store = InMemoryGraphStore::new();
        store.add_node(Node::new("a", "Alpha", "Person")).unwrap();
        store.add_node(Node::new("b", "Beta", "Idea")).unwrap();
        store.add_node(Node::new("c", "Gamma", "Idea")).unwrap();
        store.add_edge(Edge::new("ab", "a", "b", "proposed")).unwrap();
        store
    }

    #[test]
    fn rejects_duplicate_ordered_edge() {
        let store = seeded();
        let err = store.add_edge(Edge::new("dup", "a", "b", "again")).unwrap_err();
        assert!(matches!(err, WorldGraphError::Conflict(_)));

        // Reverse direction is a different ordered triple.
        assert!(store.add_edge(Edge::new("ba", "b", "a", "inspired")).is_ok());
    }

    #[test]
    fn rejects_cross_workspace_and_dangling_edges() {
        let store = seeded();
        store
            .add_node(Node::new("z", "Zeta", "Place").in_workspace("other"))
            .unwrap();

        let err = store.add_edge(Edge::new("az", "a", "z", "near")).unwrap_err();
        assert!(matches!(err, WorldGraphError::NodeNotFound(_)));
    }

    #[test]
    fn trims_and_validates_text_fields() {
        let store = InMemoryGraphStore::new();
        let node = store.add_node(Node::new("", "  Padded  ", " Person ")).unwrap();
        assert_eq!(node.label, "Padded");
        assert_eq!(node.group, "Person");
        assert!(!node.id.is_empty());

        let err = store.add_node(Node::new("x", "   ", "Person")).unwrap_err();
        assert!(matches!(err, WorldGraphError::InvalidInput(_)));
    }

    #[test]
    fn remove_node_cascades_edges() {
        let store = seeded();
        store.add_edge(Edge::new("cb", "c", "b", "refines")).unwrap();
        assert_eq!(store.remove_node(DEFAULT_WORKSPACE, "b").unwrap(), 2);
        assert!(store.remove_node(DEFAULT_WORKSPACE, "b").is_err());
    }

    #[test]
    fn update_keeps_identity_and_workspace() {
        let store = seeded();
        let updated = store
            .update_node(
                DEFAULT_WORKSPACE,
                "b",
                Node::new("ignored", " Beta Prime ", "Idea").in_workspace("elsewhere"),
            )
            .unwrap();
        assert_eq!(updated.id, "b");
        assert_eq!(updated.label, "Beta Prime");
        assert_eq!(updated.workspace, DEFAULT_WORKSPACE);

        let err = store
            .update_node(DEFAULT_WORKSPACE, "nope", Node::new("nope", "N", "Idea"))
            .unwrap_err();
        assert!(matches!(err, WorldGraphError::NodeNotFound(_)));
    }

    #[test]
    fn node_ids_are_unique_across_workspaces() {
        let store = seeded();
        let err = store
            .add_node(Node::new("a", "Other Alpha", "Person").in_workspace("other"))
            .unwrap_err();
        assert!(matches!(err, WorldGraphError::Conflict(_)));
        assert!(store.workspaces().iter().all(|w| w != "other"));

        store.remove_node(DEFAULT_WORKSPACE, "a").unwrap();
        let moved = store
            .add_node(Node::new("a", "Other Alpha", "Person").in_workspace("other"))
            .unwrap();
        assert_eq!(moved.workspace, "other");
    }

    #[test]
    fn remove_edge_by_id() {
        let store = seeded();
        let removed = store.remove_edge(DEFAULT_WORKSPACE, &"ab".to_string()).unwrap();
        assert_eq!(removed.from, "a");
        assert!(store.remove_edge(DEFAULT_WORKSPACE, &"ab".to_string()).is_err());
    }

    #[tokio::test]
    async fn incident_edges_cover_both_endpoints() {
        let store = seeded();
        store.add_edge(Edge::new("cb", "c", "b", "refines")).unwrap();

        let edges = store
            .edges_incident_to(DEFAULT_WORKSPACE, &["b".to_string()])
            .await
            .unwrap();
        let ids: Vec<&str> = edges.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["ab", "cb"]);

        let empty = store.load_snapshot("missing").await.unwrap();
        assert!(empty.is_empty());
    }
}
