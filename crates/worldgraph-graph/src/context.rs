use std::collections::HashSet;

use tracing::warn;
use worldgraph_core::{AnalyticsConfig, Edge, GraphSnapshot, Node};

use crate::adjacency::{Adjacency, UndirectedView};
use crate::degree::DegreeTable;
use crate::report::NodeSummary;

/// One snapshot plus the read-only indexes every analyzer shares.
///
/// Built once per insights run; analyzers only ever borrow it.
#[derive(Debug, Clone)]
pub struct AnalysisContext {
    snapshot: GraphSnapshot,
    adjacency: Adjacency,
    degrees: DegreeTable,
    config: AnalyticsConfig,
}

impl AnalysisContext {
    pub fn new(mut snapshot: GraphSnapshot, config: AnalyticsConfig) -> Self {
        let mut seen = HashSet::with_capacity(snapshot.nodes.len());
        let before = snapshot.nodes.len();
        snapshot.nodes.retain(|n| seen.insert(n.id.clone()));
        if snapshot.nodes.len() != before {
            warn!(
                "Dropped {} duplicate node ids from snapshot",
                before - snapshot.nodes.len()
            );
        }

        let (adjacency, degrees) =
            Adjacency::build_with_degrees(&snapshot.nodes, UndirectedView::new(&snapshot.edges));
        Self {
            snapshot,
            adjacency,
            degrees,
            config,
        }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.snapshot.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.snapshot.edges
    }

    pub fn view(&self) -> UndirectedView<'_> {
        UndirectedView::new(&self.snapshot.edges)
    }

    pub fn adjacency(&self) -> &Adjacency {
        &self.adjacency
    }

    pub fn degrees(&self) -> &DegreeTable {
        &self.degrees
    }

    pub fn config(&self) -> &AnalyticsConfig {
        &self.config
    }

    /// The node in adjacency slot `slot`, if that slot is a snapshot node.
    pub fn node_at(&self, slot: usize) -> Option<&Node> {
        self.snapshot.nodes.get(slot)
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.adjacency.slot_of(id).and_then(|slot| self.node_at(slot))
    }

    pub fn summary_at(&self, slot: usize) -> Option<NodeSummary> {
        self.node_at(slot).map(NodeSummary::from)
    }
}
