use std::collections::HashMap;

use serde::Serialize;
use worldgraph_core::GraphSnapshot;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphStats {
    pub node_count: usize,
    pub edge_count: usize,
    pub group_stats: Vec<GroupCount>,
    pub year_range: YearRange,
    pub avg_degree: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupCount {
    pub group: String,
    pub count: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YearRange {
    pub min_year: Option<i64>,
    pub max_year: Option<i64>,
}

impl GraphStats {
    pub fn from_snapshot(snapshot: &GraphSnapshot) -> Self {
        let node_count = snapshot.nodes.len();
        let edge_count = snapshot.edges.len();

        let mut per_group: HashMap<&str, usize> = HashMap::new();
        for node in &snapshot.nodes {
            *per_group.entry(node.group.as_str()).or_default() += 1;
        }
        let mut group_stats: Vec<GroupCount> = per_group
            .into_iter()
            .map(|(group, count)| GroupCount {
                group: group.to_string(),
                count,
            })
            .collect();
        group_stats.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.group.cmp(&b.group)));

        let years = snapshot.nodes.iter().filter_map(|n| n.year);
        let year_range = YearRange {
            min_year: years.clone().min(),
            max_year: years.max(),
        };

        let avg_degree = if node_count > 0 && edge_count > 0 {
            let raw = (edge_count * 2) as f64 / node_count as f64;
            (raw * 100.0).round() / 100.0
        } else {
            0.0
        };

        Self {
            node_count,
            edge_count,
            group_stats,
            year_range,
            avg_degree,
        }
    }
}
