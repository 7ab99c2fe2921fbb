//! Shared content model and configuration for the Dadar directory.
//!
//! Everything that more than one crate needs to agree on lives here: the closed
//! set of searchable content types, the per-source field mapping, the
//! normalized search result shape, application config, and seed-file loading.

pub mod app_config;
pub mod config;
pub mod content;
pub mod seed;

use thiserror::Error;

pub use app_config::{AppConfig, Environment, FailurePolicy, StoreConfig};
pub use config::{load_app_config, load_app_config_from_env};
pub use content::{
    descriptor_for, RawDocument, SearchResult, SourceDescriptor, SourceType,
    PLACEHOLDER_IMAGE_URI, SOURCES, UNTITLED,
};
pub use seed::{load_seed_file, SeedCollection, SeedDocument, SeedFile, TypedValue};

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("unknown source type: {0}")]
    UnknownSourceType(String),

    #[error("unknown failure policy: {0}")]
    UnknownFailurePolicy(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read seed file {path}: {source}")]
    SeedFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse seed file: {0}")]
    SeedFileParse(#[source] serde_yaml::Error),

    #[error("seed validation failed: {0}")]
    Validation(String),
}
