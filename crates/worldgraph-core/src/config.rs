use std::path::{Path, PathBuf};

use config as cfg;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::{Result, WorldGraphError};

const ENV_PREFIX: &str = "WORLDGRAPH";
const ENV_NAME_VAR: &str = "WORLDGRAPH_ENV";
const CONFIG_DIR_VAR: &str = "WORLDGRAPH_CONFIG_DIR";

/// Hard ceiling on the path finder's depth bound.
pub const PATH_DEPTH_CEILING: usize = 10;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 5001,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Fallback filter directive when `RUST_LOG` is unset
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
        }
    }
}

/// Thresholds and caps used by the analyzers.
///
/// Defaults are the fixed insight constants (degree <= 2 gaps, >= 2 paths,
/// clusters of 3 or more, and so on).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    /// Longest indirect path, in hops, counted towards an unexpected connection
    pub max_path_hops: usize,
    /// Enumeration stops once a pair has this many paths
    pub max_paths_per_pair: usize,
    /// Minimum indirect paths for a pair to be reported
    pub min_path_count: usize,
    pub max_example_paths: usize,
    pub connection_limit: usize,
    /// Workspaces smaller than this have no unexpected connections to report
    pub min_nodes_for_connections: usize,

    pub hub_limit: usize,
    /// Nodes below this degree are never hubs
    pub hub_min_degree: usize,
    pub gap_max_degree: usize,
    pub gap_limit: usize,

    pub min_cluster_size: usize,
    pub cluster_limit: usize,

    pub influencer_limit: usize,

    pub min_dated_nodes: usize,
    pub peak_year_limit: usize,
    /// Edges spanning strictly more years than this are long-span
    pub long_span_years: i64,
    pub long_span_limit: usize,

    pub default_path_depth: usize,
    pub max_path_depth: usize,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            max_path_hops: 3,
            max_paths_per_pair: 10,
            min_path_count: 2,
            max_example_paths: 3,
            connection_limit: 5,
            min_nodes_for_connections: 3,
            hub_limit: 5,
            hub_min_degree: 3,
            gap_max_degree: 2,
            gap_limit: 5,
            min_cluster_size: 3,
            cluster_limit: 3,
            influencer_limit: 5,
            min_dated_nodes: 2,
            peak_year_limit: 3,
            long_span_years: 5,
            long_span_limit: 5,
            default_path_depth: 5,
            max_path_depth: PATH_DEPTH_CEILING,
        }
    }
}

impl AnalyticsConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_path_depth == 0 || self.max_path_depth > PATH_DEPTH_CEILING {
            return Err(WorldGraphError::Config(format!(
                "analytics.max_path_depth must be between 1 and {}",
                PATH_DEPTH_CEILING
            )));
        }
        if self.default_path_depth > self.max_path_depth {
            return Err(WorldGraphError::Config(
                "analytics.default_path_depth exceeds analytics.max_path_depth".into(),
            ));
        }
        if self.max_path_hops < 2 {
            return Err(WorldGraphError::Config(
                "analytics.max_path_hops must be at least 2 for indirect paths to exist".into(),
            ));
        }
        if self.min_path_count == 0 || self.max_paths_per_pair < self.min_path_count {
            return Err(WorldGraphError::Config(
                "analytics.max_paths_per_pair must be >= min_path_count >= 1".into(),
            ));
        }
        if self.hub_min_degree == 0 {
            return Err(WorldGraphError::Config(
                "analytics.hub_min_degree must be positive".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub analytics: AnalyticsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Settings {
    /// Load settings from `WORLDGRAPH_CONFIG_DIR` (default `./config`) for the
    /// environment named by `WORLDGRAPH_ENV` (default `development`).
    pub fn load() -> Result<Self> {
        let dir = std::env::var(CONFIG_DIR_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("config"));
        let env_name = std::env::var(ENV_NAME_VAR).unwrap_or_else(|_| "development".into());
        Self::load_from_sources(&dir, &env_name)
    }

    /// Layering, lowest precedence first:
    /// 1. `default.toml`
    /// 2. `{env}.toml`
    /// 3. `local.toml`
    /// 4. Environment variables (`WORLDGRAPH__*`, `__` as separator)
    pub fn load_from_sources(config_dir: &Path, env_name: &str) -> Result<Self> {
        if !config_dir.exists() {
            warn!(
                "Config directory {} not found, using defaults and environment",
                config_dir.display()
            );
        }

        let settings: Settings = cfg::Config::builder()
            .add_source(cfg::File::from(config_dir.join("default.toml")).required(false))
            .add_source(
                cfg::File::from(config_dir.join(format!("{}.toml", env_name))).required(false),
            )
            .add_source(cfg::File::from(config_dir.join("local.toml")).required(false))
            .add_source(
                cfg::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        settings.validate()?;
        info!(
            "Loaded configuration for env '{}' from {}",
            env_name,
            config_dir.display()
        );
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if self.server.host.trim().is_empty() {
            return Err(WorldGraphError::Config("server.host must not be empty".into()));
        }
        self.analytics.validate()
    }
}
