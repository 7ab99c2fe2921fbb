use crate::app_config::{AppConfig, Environment, FailurePolicy};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so it can be tested with a `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let firebase_project_id = require("DADAR_FIREBASE_PROJECT_ID")?;
    let optional = |var: &str| lookup(var).ok().filter(|v| !v.trim().is_empty());
    let firebase_api_key = optional("DADAR_FIREBASE_API_KEY");
    let firestore_id_token = optional("DADAR_FIRESTORE_ID_TOKEN");

    let env = parse_environment(&or_default("DADAR_ENV", "development"));
    let log_level = or_default("DADAR_LOG_LEVEL", "info");
    let seed_path = PathBuf::from(or_default("DADAR_SEED_PATH", "./config/seed.yaml"));

    let firestore_base_url = or_default(
        "DADAR_FIRESTORE_BASE_URL",
        "https://firestore.googleapis.com/v1/",
    );
    let firestore_database = or_default("DADAR_FIRESTORE_DATABASE", "(default)");

    let store_request_timeout_secs = parse_u64("DADAR_STORE_REQUEST_TIMEOUT_SECS", "30")?;
    let store_user_agent = or_default("DADAR_STORE_USER_AGENT", "dadar/0.1 (directory-search)");
    let store_page_size = parse_u32("DADAR_STORE_PAGE_SIZE", "300")?;
    if store_page_size == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "DADAR_STORE_PAGE_SIZE".to_string(),
            reason: "must be greater than zero".to_string(),
        });
    }

    let search_debounce_ms = parse_u64("DADAR_SEARCH_DEBOUNCE_MS", "500")?;
    let search_failure_policy = or_default("DADAR_SEARCH_FAILURE_POLICY", "all-or-nothing")
        .parse::<FailurePolicy>()
        .map_err(|e| ConfigError::InvalidEnvVar {
            var: "DADAR_SEARCH_FAILURE_POLICY".to_string(),
            reason: e.to_string(),
        })?;

    Ok(AppConfig {
        env,
        log_level,
        seed_path,
        firebase_project_id,
        firebase_api_key,
        firestore_id_token,
        firestore_base_url,
        firestore_database,
        store_request_timeout_secs,
        store_user_agent,
        store_page_size,
        search_debounce_ms,
        search_failure_policy,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
