use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::services::retry::RetryPolicy;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Appwrite API endpoint, e.g. `https://cloud.appwrite.io/v1`
    pub appwrite_endpoint: String,

    /// Appwrite project identifier
    pub appwrite_project_id: String,

    /// Database holding the watchlist collection
    #[serde(default = "default_database_id")]
    pub appwrite_database_id: String,

    /// Watchlist collection
    #[serde(default = "default_collection_id")]
    pub appwrite_collection_id: String,

    /// Session secret of the signed-in user. Absent means a guest session.
    #[serde(default)]
    pub appwrite_session: Option<String>,

    /// File backing the on-device key-value store
    #[serde(default = "default_storage_path")]
    pub storage_path: PathBuf,

    #[serde(default = "default_retry_max_attempts")]
    pub retry_max_attempts: u32,

    #[serde(default = "default_retry_base_delay_ms")]
    pub retry_base_delay_ms: u64,
}

fn default_database_id() -> String {
    "csmss-prod".to_string()
}

fn default_collection_id() -> String {
    "watchlist".to_string()
}

fn default_storage_path() -> PathBuf {
    PathBuf::from(".watchlist/storage.json")
}

fn default_retry_max_attempts() -> u32 {
    3
}

fn default_retry_base_delay_ms() -> u64 {
    1000
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_iter(std::env::vars())
    }

    /// Load configuration from an explicit set of variables
    pub fn from_iter<I>(vars: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let config = envy::from_iter::<_, Config>(vars)
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;
        if config.appwrite_endpoint.trim().is_empty() {
            anyhow::bail!("Failed to load config: APPWRITE_ENDPOINT is empty");
        }
        if config.appwrite_project_id.trim().is_empty() {
            anyhow::bail!("Failed to load config: APPWRITE_PROJECT_ID is empty");
        }
        Ok(config)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.retry_max_attempts,
            Duration::from_millis(self.retry_base_delay_ms),
        )
    }
}
