//! Unexpected connections: node pairs with no direct edge that are joined by
//! several short indirect paths.
//!
//! Quadratic in node count times a bounded path enumeration per pair. Pairs
//! are fanned out across the rayon pool by their first node and `collect`
//! keeps pair order.

use std::collections::VecDeque;

use rayon::prelude::*;
use tracing::debug;

use crate::adjacency::Adjacency;
use crate::context::AnalysisContext;
use crate::report::{ConnectionPair, ConnectionPath, InsightType, Section, UnexpectedConnections};

/// Enumerate simple paths from `start` to `end` of at most `max_hops` edges,
/// shortest first, stopping once `max_paths` are found.
///
/// Each path lists its slots from `start` to `end` inclusive.
pub fn enumerate_paths(
    adjacency: &Adjacency,
    start: usize,
    end: usize,
    max_hops: usize,
    max_paths: usize,
) -> Vec<Vec<usize>> {
    let mut found = Vec::new();
    if start == end || max_paths == 0 {
        return found;
    }

    let mut queue: VecDeque<Vec<usize>> = VecDeque::new();
    queue.push_back(vec![start]);

    while let Some(path) = queue.pop_front() {
        if found.len() >= max_paths {
            break;
        }
        let current = path[path.len() - 1];
        if current == end {
            found.push(path);
            continue;
        }
        // Hops so far == path.len() - 1; only extend while another hop fits.
        if path.len() > max_hops {
            continue;
        }
        for &next in adjacency.neighbors(current) {
            if !path.contains(&next) {
                let mut extended = Vec::with_capacity(path.len() + 1);
                extended.extend_from_slice(&path);
                extended.push(next);
                queue.push_back(extended);
            }
        }
    }

    found
}

struct Candidate {
    a: usize,
    b: usize,
    paths: Vec<Vec<usize>>,
}

pub fn find_unexpected_connections(ctx: &AnalysisContext) -> Section<UnexpectedConnections> {
    let config = ctx.config();
    let node_count = ctx.nodes().len();
    if node_count < config.min_nodes_for_connections {
        return Section::not_enough_data(
            InsightType::UnexpectedConnections,
            "Not enough data to find unexpected connections",
        );
    }

    let adjacency = ctx.adjacency();
    let mut candidates: Vec<Candidate> = (0..node_count)
        .into_par_iter()
        .flat_map_iter(|a| {
            ((a + 1)..node_count).filter_map(move |b| {
                if adjacency.neighbors(a).is_empty() || adjacency.neighbors(b).is_empty() {
                    return None;
                }
                if adjacency.are_linked(a, b) {
                    return None;
                }
                let paths = enumerate_paths(
                    adjacency,
                    a,
                    b,
                    config.max_path_hops,
                    config.max_paths_per_pair,
                );
                (paths.len() >= config.min_path_count).then_some(Candidate { a, b, paths })
            })
        })
        .collect();

    // Stable: equal path counts keep pair order.
    candidates.sort_by(|x, y| y.paths.len().cmp(&x.paths.len()));
    let count = candidates.len();
    debug!(
        "Multi-path analysis found {} qualifying pairs across {} nodes",
        count, node_count
    );

    let connections = candidates
        .into_iter()
        .take(config.connection_limit)
        .filter_map(|candidate| render_pair(ctx, candidate))
        .collect();

    Section::Ready(UnexpectedConnections::new(connections, count))
}

fn render_pair(ctx: &AnalysisContext, candidate: Candidate) -> Option<ConnectionPair> {
    let node_a = ctx.summary_at(candidate.a)?;
    let node_b = ctx.summary_at(candidate.b)?;
    let path_count = candidate.paths.len();
    let paths = candidate
        .paths
        .iter()
        .take(ctx.config().max_example_paths)
        .map(|path| ConnectionPath {
            nodes: path.iter().filter_map(|&slot| ctx.summary_at(slot)).collect(),
            length: path.len(),
        })
        .collect();
    Some(ConnectionPair::new(node_a, node_b, path_count, paths))
}
