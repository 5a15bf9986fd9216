use anyhow::Result;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Default collection endpoint (Art Institute of Chicago public API)
pub const DEFAULT_ENDPOINT: &str = "https://api.artic.edu/api/v1/artworks";

/// Application configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct Config {
    /// Collection endpoint queried with `?page=<n>`
    pub endpoint: String,

    /// Records per page, sent as `limit` when set
    pub page_size: Option<u32>,

    /// Restrict the response to these fields, sent as `fields` when non-empty
    pub fields: Vec<String>,

    /// Request timeout in seconds. Unset means requests may wait indefinitely.
    pub request_timeout_secs: Option<u64>,

    /// User agent for outgoing requests
    pub user_agent: String,

    /// Data directory for log files
    pub data_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            page_size: None,
            fields: Vec::new(),
            request_timeout_secs: None,
            user_agent: format!("artgrid/{}", env!("CARGO_PKG_VERSION")),
            data_dir: dirs::data_dir()
                .map(|dir| dir.join("artgrid"))
                .unwrap_or_else(|| PathBuf::from("./data")),
        }
    }
}

impl Config {
    /// Initialize configuration from various sources
    pub async fn init() -> Result<Self> {
        debug!("Initializing configuration");

        let mut config = Self::default();

        // Load from environment variables
        config.load_from_env();

        // Try to load from configuration files
        if let Some(file_config) = Self::load_from_file().await? {
            config.merge_with(file_config);
        }

        Ok(config)
    }

    /// Load configuration from environment variables
    pub fn load_from_env(&mut self) {
        self.apply_vars(|key| std::env::var(key).ok());
    }

    fn apply_vars<F>(&mut self, var: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(endpoint) = var("ARTGRID_ENDPOINT") {
            self.endpoint = endpoint;
        }

        if let Some(size) = var("ARTGRID_PAGE_SIZE").and_then(|s| s.parse().ok()) {
            self.page_size = Some(size);
        }

        if let Some(fields) = var("ARTGRID_FIELDS") {
            self.fields = parse_fields(&fields);
        }

        if let Some(secs) = var("ARTGRID_TIMEOUT").and_then(|s| s.parse().ok()) {
            self.request_timeout_secs = Some(secs);
        }

        if let Some(agent) = var("ARTGRID_USER_AGENT") {
            self.user_agent = agent;
        }

        if let Some(data_dir) = var("ARTGRID_DATA_DIR") {
            self.data_dir = PathBuf::from(data_dir);
        }
    }

    /// Candidate configuration files, highest priority first
    pub fn config_paths() -> Vec<PathBuf> {
        let mut config_paths = vec![
            PathBuf::from("./.artgrid.json"),
            PathBuf::from("./artgrid.json"),
        ];

        if let Some(config_dir) = dirs::config_dir() {
            config_paths.push(config_dir.join("artgrid").join("artgrid.json"));
        }

        config_paths
    }

    /// Load configuration from the first artgrid.json found
    pub async fn load_from_file() -> Result<Option<Self>> {
        for path in Self::config_paths() {
            if path.exists() {
                return Self::read_file(&path).await.map(Some);
            }
        }
        Ok(None)
    }

    /// Read a single configuration file
    pub async fn read_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from: {}", path.display());
        let content = tokio::fs::read_to_string(path).await?;
        let config: Self = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Invalid configuration in {}: {}", path.display(), e))?;
        Ok(config)
    }

    /// Merge another configuration into this one. Fields left at their default are ignored.
    pub fn merge_with(&mut self, other: Self) {
        let defaults = Self::default();

        if other.endpoint != defaults.endpoint {
            self.endpoint = other.endpoint;
        }
        if other.page_size.is_some() {
            self.page_size = other.page_size;
        }
        if !other.fields.is_empty() {
            self.fields = other.fields;
        }
        if other.request_timeout_secs.is_some() {
            self.request_timeout_secs = other.request_timeout_secs;
        }
        if other.user_agent != defaults.user_agent {
            self.user_agent = other.user_agent;
        }
        if other.data_dir != defaults.data_dir {
            self.data_dir = other.data_dir;
        }
    }

    /// Path of the log file written in interactive mode
    pub fn log_file(&self) -> PathBuf {
        self.data_dir.join("logs").join("artgrid.log")
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if !self.endpoint.starts_with("http://") && !self.endpoint.starts_with("https://") {
            return Err(anyhow::anyhow!(
                "endpoint must start with http:// or https:// (got '{}')",
                self.endpoint
            ));
        }

        if self.page_size == Some(0) {
            return Err(anyhow::anyhow!("page_size must be greater than 0"));
        }

        if self.request_timeout_secs == Some(0) {
            return Err(anyhow::anyhow!("request_timeout_secs must be greater than 0"));
        }

        Ok(())
    }
}

fn parse_fields(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|field| !field.is_empty())
        .map(str::to_string)
        .collect()
}
