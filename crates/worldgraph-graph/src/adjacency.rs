//! Undirected view and adjacency index over a workspace's directed edge list.
//!
//! Stored edges keep their `from`/`to` direction; traversal, degree, clustering
//! and cross-type counting all ignore it. [`UndirectedView`] is that adaptation
//! made explicit, and [`Adjacency`] is the neighbor index every analyzer shares.

use std::collections::HashMap;

use worldgraph_core::{Edge, Node, NodeId};

use crate::degree::DegreeTable;

/// Direction-agnostic reading of a directed edge list.
#[derive(Debug, Clone, Copy)]
pub struct UndirectedView<'a> {
    edges: &'a [Edge],
}

impl<'a> UndirectedView<'a> {
    pub fn new(edges: &'a [Edge]) -> Self {
        Self { edges }
    }

    /// The underlying edges with their stored direction.
    pub fn directed(&self) -> &'a [Edge] {
        self.edges
    }

    /// Every edge as a pair of endpoints, in edge order.
    pub fn links(&self) -> impl Iterator<Item = (&'a NodeId, &'a NodeId)> + 'a {
        self.edges.iter().map(|e| (&e.from, &e.to))
    }

    /// Edges touching `id` at either end.
    pub fn incident<'b>(&'b self, id: &'b str) -> impl Iterator<Item = &'a Edge> + 'b
    where
        'a: 'b,
    {
        self.edges.iter().filter(move |e| e.touches(id))
    }

    /// Whether an edge joins `a` and `b` in either direction.
    pub fn connects(&self, a: &str, b: &str) -> bool {
        self.edges
            .iter()
            .any(|e| (e.from == a && e.to == b) || (e.from == b && e.to == a))
    }
}

/// Symmetric neighbor index keyed by dense slot numbers.
///
/// Slots `0..known_len()` are the snapshot's nodes in snapshot order. Edge
/// endpoints that are not snapshot nodes get slots after those, so they still
/// take part in traversal but never resolve to a node record.
#[derive(Debug, Clone, Default)]
pub struct Adjacency {
    ids: Vec<NodeId>,
    index: HashMap<NodeId, usize>,
    neighbors: Vec<Vec<usize>>,
    known: usize,
}

impl Adjacency {
    pub fn build(nodes: &[Node], view: UndirectedView<'_>) -> Self {
        Self::build_with_degrees(nodes, view).0
    }

    /// Build the adjacency and the degree table in one pass over the edges.
    pub fn build_with_degrees(nodes: &[Node], view: UndirectedView<'_>) -> (Self, DegreeTable) {
        let mut adjacency = Adjacency::default();
        for node in nodes {
            adjacency.slot(&node.id);
        }
        adjacency.known = adjacency.ids.len();

        let mut degrees = DegreeTable::with_slots(adjacency.known);
        for (from, to) in view.links() {
            let a = adjacency.slot(from);
            let b = adjacency.slot(to);
            degrees.record(a, b);
            if a != b {
                adjacency.link(a, b);
                adjacency.link(b, a);
            }
        }
        degrees.grow_to(adjacency.ids.len());

        (adjacency, degrees)
    }

    fn slot(&mut self, id: &NodeId) -> usize {
        if let Some(&idx) = self.index.get(id) {
            return idx;
        }
        let idx = self.ids.len();
        self.ids.push(id.clone());
        self.index.insert(id.clone(), idx);
        self.neighbors.push(Vec::new());
        idx
    }

    fn link(&mut self, from: usize, to: usize) {
        let list = &mut self.neighbors[from];
        if !list.contains(&to) {
            list.push(to);
        }
    }

    /// Number of slots, including endpoints that are not snapshot nodes.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Number of slots that belong to snapshot nodes.
    pub fn known_len(&self) -> usize {
        self.known
    }

    pub fn is_known(&self, slot: usize) -> bool {
        slot < self.known
    }

    pub fn slot_of(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    /// Neighbors of `slot` in the order their edges first appeared.
    pub fn neighbors(&self, slot: usize) -> &[usize] {
        &self.neighbors[slot]
    }

    pub fn are_linked(&self, a: usize, b: usize) -> bool {
        let (small, other) = if self.neighbors[a].len() <= self.neighbors[b].len() {
            (a, b)
        } else {
            (b, a)
        };
        self.neighbors[small].contains(&other)
    }
}
