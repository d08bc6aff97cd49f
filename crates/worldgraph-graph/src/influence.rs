use tracing::debug;

use crate::context::AnalysisContext;
use crate::report::{InfluenceAnalysis, Influencer, InsightType, Section};

/// Cross-type bridge counts as `(slot, count)` in first-appearance order.
///
/// An edge whose endpoints belong to different groups adds one to both. Nodes
/// with no such edge are absent. Edges with an endpoint outside the snapshot
/// have no known group on that side and are skipped.
pub fn cross_type_counts(ctx: &AnalysisContext) -> Vec<(usize, usize)> {
    let adjacency = ctx.adjacency();
    let mut counts = vec![0usize; ctx.nodes().len()];
    let mut order = Vec::new();

    for (from, to) in ctx.view().links() {
        let (Some(a), Some(b)) = (adjacency.slot_of(from), adjacency.slot_of(to)) else {
            continue;
        };
        let (Some(from_node), Some(to_node)) = (ctx.node_at(a), ctx.node_at(b)) else {
            continue;
        };
        if from_node.group == to_node.group {
            continue;
        }
        for slot in [a, b] {
            if counts[slot] == 0 {
                order.push(slot);
            }
            counts[slot] += 1;
        }
    }

    order.into_iter().map(|slot| (slot, counts[slot])).collect()
}

pub fn analyze_influence(ctx: &AnalysisContext) -> Section<InfluenceAnalysis> {
    if ctx.nodes().is_empty() {
        return Section::not_enough_data(InsightType::InfluenceAnalysis, "No data available");
    }

    let mut ranked = cross_type_counts(ctx);
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    debug!("Influence analysis found {} bridging nodes", ranked.len());

    let influencers = ranked
        .into_iter()
        .take(ctx.config().influencer_limit)
        .filter_map(|(slot, count)| ctx.summary_at(slot).map(|node| Influencer::new(node, count)))
        .collect();

    Section::Ready(InfluenceAnalysis::new(influencers))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{context, edge, node};

    #[test]
    fn count_matches_incident_cross_type_edges() {
        let ctx = context(
            vec![
                node("p1", "Person"),
                node("p2", "Person"),
                node("i1", "Idea"),
                node("pl", "Place"),
            ],
            vec![
                edge("p1", "i1"),
                edge("p1", "pl"),
                edge("p1", "p2"),
                edge("i1", "pl"),
            ],
        );

        let counts = cross_type_counts(&ctx);
        for (slot, count) in &counts {
            let node = ctx.node_at(*slot).unwrap();
            let expected = ctx
                .edges()
                .iter()
                .filter(|e| e.touches(&node.id))
                .filter_map(|e| e.other_end(&node.id))
                .filter(|other| ctx.node(other).map(|n| n.group != node.group).unwrap_or(false))
                .count();
            assert_eq!(*count, expected, "bridge count of {}", node.id);
        }

        // p2 only touches another Person.
        let p2 = ctx.adjacency().slot_of("p2").unwrap();
        assert!(counts.iter().all(|(slot, _)| *slot != p2));
    }

    #[test]
    fn influencers_are_ranked_descending() {
        let ctx = context(
            vec![
                node("hub", "Person"),
                node("a", "Idea"),
                node("b", "Idea"),
                node("c", "Place"),
            ],
            vec![edge("hub", "a"), edge("hub", "b"), edge("c", "hub"), edge("a", "c")],
        );
        let report = analyze_influence(&ctx).into_ready().unwrap();

        assert_eq!(report.influencers[0].node.id, "hub");
        assert_eq!(report.influencers[0].cross_type_connections, 3);
        let counts: Vec<usize> = report
            .influencers
            .iter()
            .map(|i| i.cross_type_connections)
            .collect();
        assert_eq!(counts, vec![3, 2, 2, 1]);
        assert_eq!(report.count, 4);
    }

    #[test]
    fn single_group_workspace_has_no_influencers() {
        let ctx = context(
            vec![node("a", "Person"), node("b", "Person")],
            vec![edge("a", "b")],
        );
        let report = analyze_influence(&ctx).into_ready().unwrap();
        assert!(report.influencers.is_empty());
        assert_eq!(report.count, 0);
    }
}
