use std::collections::VecDeque;

use tracing::debug;

use crate::adjacency::Adjacency;
use crate::context::AnalysisContext;
use crate::degree::find_hubs;
use crate::report::{Cluster, InsightType, KeyInsights, Section};

/// Connected components of the undirected adjacency.
///
/// Slots are visited in order and each unvisited one is flooded breadth-first,
/// so every slot lands in exactly one component and components come out in
/// order of their lowest slot.
pub fn connected_components(adjacency: &Adjacency) -> Vec<Vec<usize>> {
    let mut visited = vec![false; adjacency.len()];
    let mut components = Vec::new();

    for start in 0..adjacency.len() {
        if visited[start] {
            continue;
        }
        visited[start] = true;
        let mut component = Vec::new();
        let mut queue = VecDeque::from([start]);

        while let Some(current) = queue.pop_front() {
            component.push(current);
            for &next in adjacency.neighbors(current) {
                if !visited[next] {
                    visited[next] = true;
                    queue.push_back(next);
                }
            }
        }
        components.push(component);
    }

    components
}

/// Components with at least `min_cluster_size` members, largest first.
pub fn find_clusters(ctx: &AnalysisContext) -> Vec<Cluster> {
    let config = ctx.config();
    let mut components: Vec<Vec<usize>> = connected_components(ctx.adjacency())
        .into_iter()
        .filter(|c| c.len() >= config.min_cluster_size)
        .collect();
    components.sort_by(|a, b| b.len().cmp(&a.len()));
    debug!(
        "Cluster analysis found {} components of size >= {}",
        components.len(),
        config.min_cluster_size
    );

    components
        .into_iter()
        .take(config.cluster_limit)
        .map(|members| {
            let nodes = members.iter().filter_map(|&slot| ctx.summary_at(slot)).collect();
            Cluster::new(nodes, members.len())
        })
        .collect()
}

/// Hubs and clusters, reported together as the key-insights section.
pub fn find_key_insights(ctx: &AnalysisContext) -> Section<KeyInsights> {
    if ctx.nodes().is_empty() {
        return Section::not_enough_data(InsightType::KeyInsights, "No data available");
    }
    Section::Ready(KeyInsights::new(find_hubs(ctx), find_clusters(ctx)))
}
