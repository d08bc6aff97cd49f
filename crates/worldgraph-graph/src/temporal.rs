use std::collections::BTreeMap;

use tracing::debug;

use crate::context::AnalysisContext;
use crate::report::{DatedNode, InsightType, LongSpanEdge, PeakYear, Section, TemporalPatterns};

/// Node counts per year, ranked by count descending. Equal counts keep the
/// earlier year first.
pub fn peak_years(ctx: &AnalysisContext) -> Vec<PeakYear> {
    let mut per_year: BTreeMap<i64, usize> = BTreeMap::new();
    for year in ctx.nodes().iter().filter_map(|n| n.year) {
        *per_year.entry(year).or_default() += 1;
    }

    let mut ranked: Vec<(i64, usize)> = per_year.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked
        .into_iter()
        .take(ctx.config().peak_year_limit)
        .map(|(year, count)| PeakYear::new(year, count))
        .collect()
}

/// Edges whose dated endpoints lie more than the configured number of years
/// apart. The first matches in edge order are kept, with stored direction.
pub fn long_span_edges(ctx: &AnalysisContext) -> Vec<LongSpanEdge> {
    let config = ctx.config();
    ctx.view()
        .directed()
        .iter()
        .filter_map(|edge| {
            let from = ctx.node(&edge.from)?;
            let to = ctx.node(&edge.to)?;
            let (from_year, to_year) = (from.year?, to.year?);
            if (to_year - from_year).abs() <= config.long_span_years {
                return None;
            }
            Some(LongSpanEdge::new(
                DatedNode {
                    id: from.id.clone(),
                    label: from.label.clone(),
                    year: from_year,
                },
                DatedNode {
                    id: to.id.clone(),
                    label: to.label.clone(),
                    year: to_year,
                },
            ))
        })
        .take(config.long_span_limit)
        .collect()
}

pub fn find_temporal_patterns(ctx: &AnalysisContext) -> Section<TemporalPatterns> {
    let dated = ctx.nodes().iter().filter(|n| n.year.is_some()).count();
    if dated < ctx.config().min_dated_nodes {
        return Section::not_enough_data(
            InsightType::TemporalPatterns,
            "Not enough nodes with year data",
        );
    }

    let peaks = peak_years(ctx);
    let spans = long_span_edges(ctx);
    debug!(
        "Temporal analysis over {} dated nodes: {} peak years, {} long-span edges",
        dated,
        peaks.len(),
        spans.len()
    );
    Section::Ready(TemporalPatterns::new(peaks, spans))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{context, edge, node};

    #[test]
    fn needs_two_dated_nodes() {
        let ctx = context(
            vec![node("a", "T").with_year(1900), node("b", "T")],
            vec![edge("a", "b")],
        );
        assert!(matches!(
            find_temporal_patterns(&ctx),
            Section::NotEnoughData(_)
        ));
    }

    #[test]
    fn year_zero_is_a_real_year() {
        let ctx = context(
            vec![node("a", "T").with_year(0), node("b", "T").with_year(0)],
            vec![],
        );
        let report = find_temporal_patterns(&ctx).into_ready().unwrap();
        assert_eq!(report.patterns.peak_years[0].year, 0);
        assert_eq!(report.patterns.peak_years[0].count, 2);
    }

    #[test]
    fn peak_years_rank_by_count_then_year() {
        let years = [1999, 2001, 2001, 1995, 1995, 2010, 2001, 1980];
        let nodes = years
            .iter()
            .enumerate()
            .map(|(i, y)| node(&format!("n{}", i), "T").with_year(*y))
            .collect();
        let ctx = context(nodes, vec![]);

        let peaks: Vec<(i64, usize)> = peak_years(&ctx).iter().map(|p| (p.year, p.count)).collect();
        assert_eq!(peaks, vec![(2001, 3), (1995, 2), (1980, 1)]);
    }

    #[test]
    fn long_span_edges_keep_direction_and_cap() {
        let mut nodes = vec![node("old", "T").with_year(1900)];
        let mut edges = Vec::new();
        for i in 0..7 {
            let id = format!("new{}", i);
            nodes.push(node(&id, "T").with_year(1950 + i));
            edges.push(edge(&id, "old"));
        }
        nodes.push(node("near", "T").with_year(1904));
        nodes.push(node("undated", "T"));
        edges.insert(0, edge("old", "near"));
        edges.insert(0, edge("old", "undated"));
        let ctx = context(nodes, edges);

        let spans = long_span_edges(&ctx);
        assert_eq!(spans.len(), 5);
        assert_eq!(spans[0].from.id, "new0");
        assert_eq!(spans[0].to.id, "old");
        assert_eq!(spans[0].time_span, 50);
        assert!(spans.iter().all(|s| s.time_span > 5));
    }

    #[test]
    fn exactly_threshold_is_not_long_span() {
        let ctx = context(
            vec![node("a", "T").with_year(2000), node("b", "T").with_year(2005)],
            vec![edge("a", "b")],
        );
        assert!(long_span_edges(&ctx).is_empty());
    }
}
