use crate::{Edge, GraphSnapshot, Node, NodeId, Result};
use async_trait::async_trait;

/// Read side of the storage collaborator, as seen by the analytics engine.
///
/// Every call observes the workspace as it is at call time; nothing is cached
/// across calls.
#[async_trait]
pub trait GraphStore: Send + Sync {
    /// All nodes and all edges of `workspace`.
    async fn load_snapshot(&self, workspace: &str) -> Result<GraphSnapshot>;

    /// Edges of `workspace` with either endpoint in `node_ids`, in storage order.
    async fn edges_incident_to(&self, workspace: &str, node_ids: &[NodeId]) -> Result<Vec<Edge>>;

    /// Nodes of `workspace` whose id is in `ids`. Unknown ids are skipped.
    async fn get_nodes(&self, workspace: &str, ids: &[NodeId]) -> Result<Vec<Node>>;
}
