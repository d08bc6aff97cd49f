use std::collections::HashSet;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, instrument};
use worldgraph_core::{GraphStore, Node, NodeId, Result, WorldGraphError, PATH_DEPTH_CEILING};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PathOutcome {
    Found {
        path: Vec<NodeId>,
        /// Path nodes in path order
        nodes: Vec<Node>,
        /// Hop count
        depth: usize,
    },
    NotFound {
        path: Option<Vec<NodeId>>,
        message: String,
    },
}

impl PathOutcome {
    fn not_found() -> Self {
        PathOutcome::NotFound {
            path: None,
            message: "No path found within max depth".into(),
        }
    }

    pub fn path(&self) -> Option<&[NodeId]> {
        match self {
            PathOutcome::Found { path, .. } => Some(path),
            PathOutcome::NotFound { .. } => None,
        }
    }

    pub fn depth(&self) -> Option<usize> {
        match self {
            PathOutcome::Found { depth, .. } => Some(*depth),
            PathOutcome::NotFound { .. } => None,
        }
    }
}

/// Unweighted shortest paths, read from the store one BFS level at a time.
#[derive(Clone)]
pub struct PathFinder {
    store: Arc<dyn GraphStore>,
    default_depth: usize,
    max_depth: usize,
}

impl PathFinder {
    pub fn new(store: Arc<dyn GraphStore>) -> Self {
        Self {
            store,
            default_depth: 5,
            max_depth: PATH_DEPTH_CEILING,
        }
    }

    pub fn with_depths(mut self, default_depth: usize, max_depth: usize) -> Self {
        self.max_depth = max_depth.min(PATH_DEPTH_CEILING);
        self.default_depth = default_depth.min(self.max_depth);
        self
    }

    /// Shortest hop-count path from `from` to `to` within `max_depth` hops
    /// (the configured default when `None`, clamped to the configured maximum).
    ///
    /// The first path to reach the target in BFS order wins; equal-length
    /// alternatives are not considered.
    #[instrument(skip(self))]
    pub async fn find_path(
        &self,
        workspace: &str,
        from: &str,
        to: &str,
        max_depth: Option<usize>,
    ) -> Result<PathOutcome> {
        let from = from.trim();
        let to = to.trim();
        if from.is_empty() || to.is_empty() {
            return Err(WorldGraphError::InvalidInput(
                "from and to node IDs are required".into(),
            ));
        }
        let bound = max_depth.unwrap_or(self.default_depth).min(self.max_depth);

        let mut visited: HashSet<NodeId> = HashSet::from([from.to_string()]);
        let mut level: Vec<(NodeId, Vec<NodeId>)> = vec![(from.to_string(), vec![from.to_string()])];
        let mut depth = 0;

        let found = loop {
            if let Some((_, path)) = level.iter().find(|(id, _)| id == to) {
                break Some(path.clone());
            }
            if level.is_empty() || depth >= bound {
                break None;
            }

            let frontier: Vec<NodeId> = level.iter().map(|(id, _)| id.clone()).collect();
            let edges = self.store.edges_incident_to(workspace, &frontier).await?;
            debug!(
                "Path search level {}: {} frontier nodes, {} incident edges",
                depth,
                frontier.len(),
                edges.len()
            );

            let mut next_level = Vec::new();
            for (current, path) in &level {
                for edge in edges.iter().filter(|e| e.touches(current)) {
                    let Some(next) = edge.other_end(current) else {
                        continue;
                    };
                    if visited.insert(next.clone()) {
                        let mut extended = path.clone();
                        extended.push(next.clone());
                        next_level.push((next.clone(), extended));
                    }
                }
            }
            level = next_level;
            depth += 1;
        };

        let Some(path) = found else {
            debug!("No path from {} to {} within {} hops", from, to, bound);
            return Ok(PathOutcome::not_found());
        };

        let mut nodes = self.store.get_nodes(workspace, &path).await?;
        nodes.sort_by_key(|n| path.iter().position(|id| *id == n.id));
        let depth = path.len() - 1;
        Ok(PathOutcome::Found { path, nodes, depth })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{edge, node, store_with};
    use worldgraph_core::DEFAULT_WORKSPACE;

    fn chain_finder() -> PathFinder {
        // x - m - leaf, plus x - a - b - c - d - e - f
        let ids = ["x", "m", "leaf", "a", "b", "c", "d", "e", "f", "island"];
        let store = store_with(
            ids.iter().map(|id| node(id, "T")).collect(),
            vec![
                edge("x", "m"),
                edge("leaf", "m"),
                edge("x", "a"),
                edge("a", "b"),
                edge("b", "c"),
                edge("c", "d"),
                edge("d", "e"),
                edge("e", "f"),
            ],
        );
        PathFinder::new(store)
    }

    #[tokio::test]
    async fn two_hop_path_has_three_ids() {
        let finder = chain_finder();
        let outcome = finder
            .find_path(DEFAULT_WORKSPACE, "x", "leaf", None)
            .await
            .unwrap();

        assert_eq!(outcome.path().unwrap(), ["x", "m", "leaf"]);
        assert_eq!(outcome.depth(), Some(2));
        if let PathOutcome::Found { nodes, .. } = &outcome {
            let ids: Vec<&str> = nodes.iter().map(|n| n.id.as_str()).collect();
            assert_eq!(ids, vec!["x", "m", "leaf"]);
        }
    }

    #[tokio::test]
    async fn same_endpoint_is_zero_hops() {
        let finder = chain_finder();
        let outcome = finder.find_path(DEFAULT_WORKSPACE, "m", "m", None).await.unwrap();
        assert_eq!(outcome.path().unwrap(), ["m"]);
        assert_eq!(outcome.depth(), Some(0));
    }

    #[tokio::test]
    async fn edges_are_walked_against_their_direction() {
        let finder = chain_finder();
        let outcome = finder.find_path(DEFAULT_WORKSPACE, "m", "leaf", None).await.unwrap();
        assert_eq!(outcome.depth(), Some(1));
    }

    #[tokio::test]
    async fn depth_bound_is_inclusive() {
        let finder = chain_finder();
        // A target exactly max_depth hops away is within the bound.
        let edge_of_bound = finder.find_path(DEFAULT_WORKSPACE, "x", "leaf", Some(2)).await.unwrap();
        assert_eq!(edge_of_bound.depth(), Some(2));
        let short = finder.find_path(DEFAULT_WORKSPACE, "x", "leaf", Some(1)).await.unwrap();
        assert!(short.path().is_none());

        // x -> e is five hops.
        let within = finder.find_path(DEFAULT_WORKSPACE, "x", "e", Some(5)).await.unwrap();
        assert_eq!(within.depth(), Some(5));

        let beyond = finder.find_path(DEFAULT_WORKSPACE, "x", "f", Some(5)).await.unwrap();
        assert!(matches!(beyond, PathOutcome::NotFound { path: None, .. }));
    }

    #[tokio::test]
    async fn unreachable_target_is_not_an_error() {
        let finder = chain_finder();
        let outcome = finder
            .find_path(DEFAULT_WORKSPACE, "x", "island", None)
            .await
            .unwrap();
        assert!(outcome.path().is_none());
        let value = serde_json::to_value(&outcome).unwrap();
        assert!(value["path"].is_null());
        assert_eq!(value["message"], "No path found within max depth");
    }

    #[tokio::test]
    async fn missing_endpoint_is_rejected() {
        let finder = chain_finder();
        let err = finder.find_path(DEFAULT_WORKSPACE, "", "x", None).await.unwrap_err();
        assert!(matches!(err, WorldGraphError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn requested_depth_is_clamped() {
        let finder = chain_finder().with_depths(2, 3);
        let outcome = finder.find_path(DEFAULT_WORKSPACE, "x", "c", Some(9)).await.unwrap();
        assert_eq!(outcome.depth(), Some(3));

        let defaulted = finder.find_path(DEFAULT_WORKSPACE, "x", "c", None).await.unwrap();
        assert!(defaulted.path().is_none());
    }
}
