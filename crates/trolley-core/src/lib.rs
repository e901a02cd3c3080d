use thiserror::Error;

mod app_config;
mod config;
pub mod feed;
pub mod stores;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use feed::{FeedItem, NormalizedSpecial, SpecialsFeed};
pub use stores::{load_stores, StoreConfig, StoresFile};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),
    #[error("invalid value for environment variable {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
    #[error("failed to read stores file {path}: {source}")]
    StoresFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse stores file: {0}")]
    StoresFileParse(#[from] serde_yaml::Error),
    #[error("stores config validation failed: {0}")]
    Validation(String),
}
