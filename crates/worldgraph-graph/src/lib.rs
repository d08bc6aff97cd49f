//! Analytics over a WorldGraph workspace: multi-path connections, hubs and
//! clusters, knowledge gaps, cross-type influencers, temporal patterns, and
//! on-demand shortest paths.

pub mod adjacency;
pub mod clusters;
pub mod context;
pub mod degree;
pub mod influence;
pub mod insights;
pub mod multi_path;
pub mod path;
pub mod report;
pub mod stats;
pub mod temporal;

#[cfg(test)]
mod test_support;

pub use adjacency::{Adjacency, UndirectedView};
pub use clusters::{connected_components, find_clusters, find_key_insights};
pub use context::AnalysisContext;
pub use degree::{find_hubs, find_knowledge_gaps, DegreeTable};
pub use influence::{analyze_influence, cross_type_counts};
pub use insights::InsightsEngine;
pub use multi_path::{enumerate_paths, find_unexpected_connections};
pub use path::{PathFinder, PathOutcome};
pub use report::*;
pub use stats::{GraphStats, GroupCount, YearRange};
pub use temporal::{find_temporal_patterns, long_span_edges, peak_years};
