pub mod config;
pub mod error;
pub mod memory_store;
pub mod traits;
pub mod types;

pub use self::config::{AnalyticsConfig, LoggingConfig, ServerConfig, Settings, PATH_DEPTH_CEILING};
pub use error::*;
pub use memory_store::*;
pub use traits::*;
pub use types::*;
