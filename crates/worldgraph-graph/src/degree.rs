use tracing::debug;

use crate::context::AnalysisContext;
use crate::report::{Gap, Hub, InsightType, KnowledgeGaps, Section};

/// Incident-edge counts per adjacency slot.
///
/// Every edge adds one to each of its endpoints regardless of direction; a
/// self-loop counts once.
#[derive(Debug, Clone, Default)]
pub struct DegreeTable {
    degrees: Vec<usize>,
    /// Slots in the order they first appeared on an edge
    first_seen: Vec<usize>,
}

impl DegreeTable {
    pub(crate) fn with_slots(slots: usize) -> Self {
        Self {
            degrees: vec![0; slots],
            first_seen: Vec::new(),
        }
    }

    pub(crate) fn grow_to(&mut self, slots: usize) {
        if self.degrees.len() < slots {
            self.degrees.resize(slots, 0);
        }
    }

    pub(crate) fn record(&mut self, a: usize, b: usize) {
        self.bump(a);
        if a != b {
            self.bump(b);
        }
    }

    fn bump(&mut self, slot: usize) {
        self.grow_to(slot + 1);
        if self.degrees[slot] == 0 {
            self.first_seen.push(slot);
        }
        self.degrees[slot] += 1;
    }

    /// Degree of `slot`; zero for isolated nodes.
    pub fn degree(&self, slot: usize) -> usize {
        self.degrees.get(slot).copied().unwrap_or(0)
    }

    /// Slots with at least one incident edge, in first-appearance order.
    pub fn connected_slots(&self) -> &[usize] {
        &self.first_seen
    }
}

/// Highest-degree nodes, descending. Ties keep first-appearance order.
pub fn find_hubs(ctx: &AnalysisContext) -> Vec<Hub> {
    let config = ctx.config();
    let adjacency = ctx.adjacency();
    let degrees = ctx.degrees();

    let mut ranked: Vec<(usize, usize)> = degrees
        .connected_slots()
        .iter()
        .filter(|&&slot| adjacency.is_known(slot))
        .map(|&slot| (slot, degrees.degree(slot)))
        .filter(|&(_, degree)| degree >= config.hub_min_degree)
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));

    let hubs: Vec<Hub> = ranked
        .into_iter()
        .take(config.hub_limit)
        .filter_map(|(slot, degree)| ctx.summary_at(slot).map(|node| Hub::new(node, degree)))
        .collect();
    debug!("Degree analysis found {} hubs", hubs.len());
    hubs
}

/// Lowest-degree nodes (degree <= gap threshold), ascending. Isolated nodes
/// count as degree zero. Ties keep snapshot order.
pub fn find_knowledge_gaps(ctx: &AnalysisContext) -> Section<KnowledgeGaps> {
    if ctx.nodes().is_empty() {
        return Section::not_enough_data(InsightType::KnowledgeGaps, "No data available");
    }
    let config = ctx.config();

    let mut candidates: Vec<(usize, usize)> = (0..ctx.nodes().len())
        .map(|slot| (slot, ctx.degrees().degree(slot)))
        .filter(|&(_, degree)| degree <= config.gap_max_degree)
        .collect();
    candidates.sort_by_key(|&(_, degree)| degree);

    let gaps: Vec<Gap> = candidates
        .into_iter()
        .take(config.gap_limit)
        .filter_map(|(slot, degree)| ctx.summary_at(slot).map(|node| Gap::new(node, degree)))
        .collect();
    debug!("Degree analysis found {} knowledge gaps", gaps.len());

    Section::Ready(KnowledgeGaps::new(gaps))
}
