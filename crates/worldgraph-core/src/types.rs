use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use crate::{Result, WorldGraphError};

pub type NodeId = String;
pub type EdgeId = String;

pub const DEFAULT_WORKSPACE: &str = "default";
pub const MIN_EDGE_WEIGHT: f64 = 0.0;
pub const MAX_EDGE_WEIGHT: f64 = 10.0;
pub const DEFAULT_EDGE_WEIGHT: f64 = 1.0;

fn default_workspace() -> String {
    DEFAULT_WORKSPACE.to_string()
}

fn default_weight() -> f64 {
    DEFAULT_EDGE_WEIGHT
}

/// An entity in the knowledge graph.
///
/// `group` is the entity's type/category. The vocabulary is open: any
/// non-empty string is a valid group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    #[serde(default)]
    pub id: NodeId,
    pub label: String,
    pub group: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i64>,
    #[serde(default, alias = "info")]
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub metadata: HashMap<String, serde_json::Value>,
    #[serde(default = "default_workspace")]
    pub workspace: String,
}

impl Node {
    pub fn new(id: impl Into<NodeId>, label: impl Into<String>, group: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            group: group.into(),
            year: None,
            description: String::new(),
            tags: Vec::new(),
            metadata: HashMap::new(),
            workspace: default_workspace(),
        }
    }

    pub fn with_year(mut self, year: i64) -> Self {
        self.year = Some(year);
        self
    }

    pub fn in_workspace(mut self, workspace: impl Into<String>) -> Self {
        self.workspace = workspace.into();
        self
    }
}

/// A directed, labeled relationship between two nodes of one workspace.
///
/// `weight` is display emphasis only; analytics never read it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    #[serde(default)]
    pub id: EdgeId,
    pub from: NodeId,
    pub to: NodeId,
    pub label: String,
    #[serde(default = "default_weight")]
    pub weight: f64,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub metadata: HashMap<String, serde_json::Value>,
    #[serde(default = "default_workspace")]
    pub workspace: String,
}

impl Edge {
    pub fn new(
        id: impl Into<EdgeId>,
        from: impl Into<NodeId>,
        to: impl Into<NodeId>,
        label: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            from: from.into(),
            to: to.into(),
            label: label.into(),
            weight: DEFAULT_EDGE_WEIGHT,
            metadata: HashMap::new(),
            workspace: default_workspace(),
        }
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = clamp_weight(weight);
        self
    }

    pub fn in_workspace(mut self, workspace: impl Into<String>) -> Self {
        self.workspace = workspace.into();
        self
    }

    /// Whether `id` is one of this edge's endpoints, in either direction.
    pub fn touches(&self, id: &str) -> bool {
        self.from == id || self.to == id
    }

    /// The endpoint opposite `id`, or `None` when `id` is not an endpoint.
    pub fn other_end(&self, id: &str) -> Option<&NodeId> {
        if self.from == id {
            Some(&self.to)
        } else if self.to == id {
            Some(&self.from)
        } else {
            None
        }
    }
}

pub fn clamp_weight(weight: f64) -> f64 {
    if weight.is_nan() {
        return DEFAULT_EDGE_WEIGHT;
    }
    weight.clamp(MIN_EDGE_WEIGHT, MAX_EDGE_WEIGHT)
}

/// The full node and edge set of one workspace at one instant.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphSnapshot {
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub edges: Vec<Edge>,
}

impl GraphSnapshot {
    pub fn new(nodes: Vec<Node>, edges: Vec<Edge>) -> Self {
        Self { nodes, edges }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Read a `{ "nodes": [...], "edges": [...] }` document.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            WorldGraphError::Storage(format!("failed to read {}: {}", path.display(), e))
        })?;
        let snapshot: GraphSnapshot = serde_json::from_str(&raw)?;
        Ok(snapshot)
    }
}
