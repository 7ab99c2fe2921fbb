use std::path::PathBuf;
use std::str::FromStr;

use crate::CoreError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// How an aggregated search treats a failing source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// One failing source fails the whole search.
    #[default]
    AllOrNothing,
    /// Failing sources are reported alongside the results of the others.
    Partial,
}

impl std::fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FailurePolicy::AllOrNothing => write!(f, "all-or-nothing"),
            FailurePolicy::Partial => write!(f, "partial"),
        }
    }
}

impl FromStr for FailurePolicy {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all-or-nothing" => Ok(FailurePolicy::AllOrNothing),
            "partial" => Ok(FailurePolicy::Partial),
            other => Err(CoreError::UnknownFailurePolicy(other.to_string())),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    pub seed_path: PathBuf,
    pub firebase_project_id: String,
    pub firebase_api_key: Option<String>,
    pub firestore_id_token: Option<String>,
    pub firestore_base_url: String,
    pub firestore_database: String,
    pub store_request_timeout_secs: u64,
    pub store_user_agent: String,
    pub store_page_size: u32,
    pub search_debounce_ms: u64,
    pub search_failure_policy: FailurePolicy,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("log_level", &self.log_level)
            .field("seed_path", &self.seed_path)
            .field("firebase_project_id", &self.firebase_project_id)
            .field(
                "firebase_api_key",
                &self.firebase_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field(
                "firestore_id_token",
                &self.firestore_id_token.as_ref().map(|_| "[redacted]"),
            )
            .field("firestore_base_url", &self.firestore_base_url)
            .field("firestore_database", &self.firestore_database)
            .field(
                "store_request_timeout_secs",
                &self.store_request_timeout_secs,
            )
            .field("store_user_agent", &self.store_user_agent)
            .field("store_page_size", &self.store_page_size)
            .field("search_debounce_ms", &self.search_debounce_ms)
            .field("search_failure_policy", &self.search_failure_policy)
            .finish()
    }
}

/// Connection settings for the document store client.
#[derive(Clone)]
pub struct StoreConfig {
    pub base_url: String,
    pub project_id: String,
    pub database: String,
    pub api_key: Option<String>,
    pub id_token: Option<String>,
    pub timeout_secs: u64,
    pub user_agent: String,
    pub page_size: u32,
}

impl StoreConfig {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            base_url: config.firestore_base_url.clone(),
            project_id: config.firebase_project_id.clone(),
            database: config.firestore_database.clone(),
            api_key: config.firebase_api_key.clone(),
            id_token: config.firestore_id_token.clone(),
            timeout_secs: config.store_request_timeout_secs,
            user_agent: config.store_user_agent.clone(),
            page_size: config.store_page_size,
        }
    }
}

impl std::fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreConfig")
            .field("base_url", &self.base_url)
            .field("project_id", &self.project_id)
            .field("database", &self.database)
            .field("api_key", &self.api_key.as_ref().map(|_| "[redacted]"))
            .field("id_token", &self.id_token.as_ref().map(|_| "[redacted]"))
            .field("timeout_secs", &self.timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("page_size", &self.page_size)
            .finish()
    }
}
