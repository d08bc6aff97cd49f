// ABOUTME: Read-only view records produced by the analyzers
// ABOUTME: Shapes and insight wording of the JSON returned to clients

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use worldgraph_core::{Node, NodeId, WorldGraphError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InsightType {
    UnexpectedConnections,
    KeyInsights,
    KnowledgeGaps,
    InfluenceAnalysis,
    TemporalPatterns,
}

impl InsightType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InsightType::UnexpectedConnections => "unexpected-connections",
            InsightType::KeyInsights => "key-insights",
            InsightType::KnowledgeGaps => "knowledge-gaps",
            InsightType::InfluenceAnalysis => "influence-analysis",
            InsightType::TemporalPatterns => "temporal-patterns",
        }
    }

    pub fn all() -> [InsightType; 5] {
        [
            InsightType::UnexpectedConnections,
            InsightType::KeyInsights,
            InsightType::KnowledgeGaps,
            InsightType::InfluenceAnalysis,
            InsightType::TemporalPatterns,
        ]
    }

    pub fn title(&self) -> &'static str {
        match self {
            InsightType::UnexpectedConnections => "Unexpected Connections",
            InsightType::KeyInsights => "Key Insights",
            InsightType::KnowledgeGaps => "Knowledge Gaps",
            InsightType::InfluenceAnalysis => "Influential Connectors",
            InsightType::TemporalPatterns => "Temporal Patterns",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            InsightType::UnexpectedConnections => {
                "Nodes that are strongly connected through multiple indirect paths"
            }
            InsightType::KeyInsights => "Important patterns and structures in your graph",
            InsightType::KnowledgeGaps => {
                "Nodes with few connections - opportunities to expand your graph"
            }
            InsightType::InfluenceAnalysis => "Nodes that bridge different types or groups",
            InsightType::TemporalPatterns => "Time-based patterns in your graph",
        }
    }
}

impl fmt::Display for InsightType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InsightType {
    type Err = WorldGraphError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        InsightType::all()
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| WorldGraphError::InvalidInput(format!("Invalid insight type: {}", s)))
    }
}

/// Outcome of one analyzer within an insights run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Section<T> {
    Ready(T),
    /// The workspace is too small for this analyzer; not an error
    NotEnoughData(NotEnoughData),
    /// The analyzer failed; sibling sections are unaffected
    Failed(SectionFailure),
}

impl<T> Section<T> {
    pub fn not_enough_data(kind: InsightType, message: impl Into<String>) -> Self {
        Section::NotEnoughData(NotEnoughData {
            kind,
            message: message.into(),
        })
    }

    pub fn failed(kind: InsightType, error: impl Into<String>) -> Self {
        Section::Failed(SectionFailure {
            kind,
            error: error.into(),
        })
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Section::Ready(_))
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            Section::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn into_ready(self) -> Option<T> {
        match self {
            Section::Ready(value) => Some(value),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NotEnoughData {
    #[serde(rename = "type")]
    pub kind: InsightType,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionFailure {
    #[serde(rename = "type")]
    pub kind: InsightType,
    pub error: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeSummary {
    pub id: NodeId,
    pub label: String,
    pub group: String,
}

impl From<&Node> for NodeSummary {
    fn from(node: &Node) -> Self {
        Self {
            id: node.id.clone(),
            label: node.label.clone(),
            group: node.group.clone(),
        }
    }
}

// Unexpected connections

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnexpectedConnections {
    #[serde(rename = "type")]
    pub kind: InsightType,
    pub title: String,
    pub description: String,
    pub connections: Vec<ConnectionPair>,
    /// Qualifying pairs before the result cap
    pub count: usize,
}

impl UnexpectedConnections {
    pub fn new(connections: Vec<ConnectionPair>, count: usize) -> Self {
        let kind = InsightType::UnexpectedConnections;
        Self {
            kind,
            title: kind.title().into(),
            description: kind.description().into(),
            connections,
            count,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionPair {
    pub node_a: NodeSummary,
    pub node_b: NodeSummary,
    pub path_count: usize,
    pub paths: Vec<ConnectionPath>,
    pub insight: String,
}

impl ConnectionPair {
    pub fn new(
        node_a: NodeSummary,
        node_b: NodeSummary,
        path_count: usize,
        paths: Vec<ConnectionPath>,
    ) -> Self {
        let insight = format!(
            "{} and {} are connected through {} different paths, suggesting a strong but indirect relationship.",
            node_a.label, node_b.label, path_count
        );
        Self {
            node_a,
            node_b,
            path_count,
            paths,
            insight,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConnectionPath {
    pub nodes: Vec<NodeSummary>,
    /// Number of nodes on the path, endpoints included
    pub length: usize,
}

// Key insights

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeyInsights {
    #[serde(rename = "type")]
    pub kind: InsightType,
    pub title: String,
    pub description: String,
    pub insights: Vec<KeyInsight>,
}

impl KeyInsights {
    /// Empty hub or cluster lists are left out of `insights`.
    pub fn new(hubs: Vec<Hub>, clusters: Vec<Cluster>) -> Self {
        let kind = InsightType::KeyInsights;
        let mut insights = Vec::new();
        if !hubs.is_empty() {
            insights.push(KeyInsight::Hubs {
                title: "Key Hubs".into(),
                description: "These nodes are central to your graph, connecting to many others"
                    .into(),
                nodes: hubs,
            });
        }
        if !clusters.is_empty() {
            insights.push(KeyInsight::Clusters {
                title: "Connected Clusters".into(),
                description: "Groups of nodes that are highly interconnected".into(),
                clusters,
            });
        }
        Self {
            kind,
            title: kind.title().into(),
            description: kind.description().into(),
            insights,
        }
    }

    pub fn hubs(&self) -> &[Hub] {
        self.insights
            .iter()
            .find_map(|i| match i {
                KeyInsight::Hubs { nodes, .. } => Some(nodes.as_slice()),
                _ => None,
            })
            .unwrap_or(&[])
    }

    pub fn clusters(&self) -> &[Cluster] {
        self.insights
            .iter()
            .find_map(|i| match i {
                KeyInsight::Clusters { clusters, .. } => Some(clusters.as_slice()),
                _ => None,
            })
            .unwrap_or(&[])
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum KeyInsight {
    Hubs {
        title: String,
        description: String,
        nodes: Vec<Hub>,
    },
    Clusters {
        title: String,
        description: String,
        clusters: Vec<Cluster>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Hub {
    #[serde(flatten)]
    pub node: NodeSummary,
    pub degree: usize,
    pub insight: String,
}

impl Hub {
    pub fn new(node: NodeSummary, degree: usize) -> Self {
        let insight = format!(
            "{} is connected to {} other nodes, making it a central hub.",
            node.label, degree
        );
        Self {
            node,
            degree,
            insight,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Cluster {
    pub nodes: Vec<NodeSummary>,
    /// Component size, counting endpoints that are not workspace nodes
    pub size: usize,
    pub insight: String,
}

impl Cluster {
    pub fn new(nodes: Vec<NodeSummary>, size: usize) -> Self {
        Self {
            nodes,
            size,
            insight: format!("This cluster contains {} highly interconnected nodes.", size),
        }
    }
}

// Knowledge gaps

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KnowledgeGaps {
    #[serde(rename = "type")]
    pub kind: InsightType,
    pub title: String,
    pub description: String,
    pub gaps: Vec<Gap>,
    pub count: usize,
}

impl KnowledgeGaps {
    pub fn new(gaps: Vec<Gap>) -> Self {
        let kind = InsightType::KnowledgeGaps;
        Self {
            kind,
            title: kind.title().into(),
            description: kind.description().into(),
            count: gaps.len(),
            gaps,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Gap {
    #[serde(flatten)]
    pub node: NodeSummary,
    pub degree: usize,
    pub insight: String,
}

impl Gap {
    pub fn new(node: NodeSummary, degree: usize) -> Self {
        let insight = format!(
            "{} has only {} connection{}. Consider exploring how it relates to other nodes.",
            node.label,
            degree,
            plural(degree)
        );
        Self {
            node,
            degree,
            insight,
        }
    }
}

// Influence

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InfluenceAnalysis {
    #[serde(rename = "type")]
    pub kind: InsightType,
    pub title: String,
    pub description: String,
    pub influencers: Vec<Influencer>,
    pub count: usize,
}

impl InfluenceAnalysis {
    pub fn new(influencers: Vec<Influencer>) -> Self {
        let kind = InsightType::InfluenceAnalysis;
        Self {
            kind,
            title: kind.title().into(),
            description: kind.description().into(),
            count: influencers.len(),
            influencers,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Influencer {
    #[serde(flatten)]
    pub node: NodeSummary,
    pub cross_type_connections: usize,
    pub insight: String,
}

impl Influencer {
    pub fn new(node: NodeSummary, cross_type_connections: usize) -> Self {
        let insight = format!(
            "{} bridges {} connection{} between different entity types, making it an influential connector.",
            node.label,
            cross_type_connections,
            plural(cross_type_connections)
        );
        Self {
            node,
            cross_type_connections,
            insight,
        }
    }
}

// Temporal

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TemporalPatterns {
    #[serde(rename = "type")]
    pub kind: InsightType,
    pub title: String,
    pub description: String,
    pub patterns: TemporalSummary,
}

impl TemporalPatterns {
    pub fn new(peak_years: Vec<PeakYear>, long_term_connections: Vec<LongSpanEdge>) -> Self {
        let kind = InsightType::TemporalPatterns;
        Self {
            kind,
            title: kind.title().into(),
            description: kind.description().into(),
            patterns: TemporalSummary {
                peak_years,
                long_term_connections,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemporalSummary {
    pub peak_years: Vec<PeakYear>,
    pub long_term_connections: Vec<LongSpanEdge>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeakYear {
    pub year: i64,
    pub count: usize,
    pub insight: String,
}

impl PeakYear {
    pub fn new(year: i64, count: usize) -> Self {
        Self {
            year,
            count,
            insight: format!("{} was a peak year with {} new entities.", year, count),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatedNode {
    pub id: NodeId,
    pub label: String,
    pub year: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LongSpanEdge {
    pub from: DatedNode,
    pub to: DatedNode,
    pub time_span: i64,
    pub insight: String,
}

impl LongSpanEdge {
    pub fn new(from: DatedNode, to: DatedNode) -> Self {
        let time_span = (to.year - from.year).abs();
        let insight = format!(
            "{} ({}) connects to {} ({}), spanning {} years.",
            from.label, from.year, to.label, to.year, time_span
        );
        Self {
            from,
            to,
            time_span,
            insight,
        }
    }
}

// Combined

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CombinedInsights {
    pub unexpected_connections: Section<UnexpectedConnections>,
    pub key_insights: Section<KeyInsights>,
    pub knowledge_gaps: Section<KnowledgeGaps>,
    pub influence_analysis: Section<InfluenceAnalysis>,
    pub temporal_patterns: Section<TemporalPatterns>,
    pub generated_at: DateTime<Utc>,
}

impl CombinedInsights {
    /// Number of sections that came back as failures.
    pub fn failed_sections(&self) -> usize {
        [
            matches!(self.unexpected_connections, Section::Failed(_)),
            matches!(self.key_insights, Section::Failed(_)),
            matches!(self.knowledge_gaps, Section::Failed(_)),
            matches!(self.influence_analysis, Section::Failed(_)),
            matches!(self.temporal_patterns, Section::Failed(_)),
        ]
        .iter()
        .filter(|failed| **failed)
        .count()
    }
}

/// A single requested section.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum InsightSection {
    UnexpectedConnections(Section<UnexpectedConnections>),
    KeyInsights(Section<KeyInsights>),
    KnowledgeGaps(Section<KnowledgeGaps>),
    InfluenceAnalysis(Section<InfluenceAnalysis>),
    TemporalPatterns(Section<TemporalPatterns>),
}

fn plural(n: usize) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn summary(id: &str) -> NodeSummary {
        NodeSummary {
            id: id.into(),
            label: id.to_uppercase(),
            group: "Person".into(),
        }
    }

    #[test]
    fn insight_type_parses_route_names() {
        for kind in InsightType::all() {
            assert_eq!(kind.as_str().parse::<InsightType>().unwrap(), kind);
        }
        let err = "hubs".parse::<InsightType>().unwrap_err();
        assert!(err.is_client_error());
    }

    #[test]
    fn hub_serializes_flat() {
        let value = serde_json::to_value(Hub::new(summary("x"), 4)).unwrap();
        assert_eq!(value["id"], "x");
        assert_eq!(value["group"], "Person");
        assert_eq!(value["degree"], 4);
    }

    #[test]
    fn key_insights_are_tagged_by_kind() {
        let insights = KeyInsights::new(vec![Hub::new(summary("x"), 3)], vec![]);
        let value = serde_json::to_value(&insights).unwrap();
        assert_eq!(value["type"], "key-insights");
        assert_eq!(value["insights"].as_array().unwrap().len(), 1);
        assert_eq!(value["insights"][0]["type"], "hubs");
        assert_eq!(value["insights"][0]["nodes"][0]["degree"], 3);
    }

    #[test]
    fn section_variants_serialize_inline() {
        let ready: Section<KnowledgeGaps> = Section::Ready(KnowledgeGaps::new(vec![]));
        assert_eq!(serde_json::to_value(&ready).unwrap()["count"], 0);

        let thin: Section<KnowledgeGaps> =
            Section::not_enough_data(InsightType::KnowledgeGaps, "No data available");
        assert_eq!(
            serde_json::to_value(&thin).unwrap(),
            json!({"type": "knowledge-gaps", "message": "No data available"})
        );

        let failed: Section<KnowledgeGaps> = Section::failed(InsightType::KnowledgeGaps, "boom");
        assert_eq!(serde_json::to_value(&failed).unwrap()["error"], "boom");
    }

    #[test]
    fn insight_wording_follows_counts() {
        assert!(Gap::new(summary("a"), 1).insight.contains("only 1 connection."));
        assert!(Gap::new(summary("a"), 2).insight.contains("only 2 connections."));
        assert!(Influencer::new(summary("a"), 1)
            .insight
            .contains("bridges 1 connection between"));

        let span = LongSpanEdge::new(
            DatedNode {
                id: "a".into(),
                label: "A".into(),
                year: 1990,
            },
            DatedNode {
                id: "b".into(),
                label: "B".into(),
                year: 1970,
            },
        );
        assert_eq!(span.time_span, 20);
        assert_eq!(span.insight, "A (1990) connects to B (1970), spanning 20 years.");
    }
}
