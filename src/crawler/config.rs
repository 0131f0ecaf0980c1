use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;
use url::Url;

/// Default timeout for link requests in seconds
pub const LINK_REQUEST_TIMEOUT_SEC: u64 = 10;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Configuration of a sampling run, shared read-only by every traversal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Entry point, never recorded in a path
    pub start: String,
    /// Target article
    pub stop: String,
    /// Origin prepended to relative links
    pub root: String,
    pub use_cache: bool,
    /// Give up on a traversal after this many fetched pages
    pub max_hops: Option<usize>,
    pub request_delay_ms: u64,
    pub request_timeout_sec: u64,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            start: "/wiki/Special:Random".to_string(),
            stop: "/wiki/Philosophy".to_string(),
            root: "https://en.wikipedia.org".to_string(),
            use_cache: true,
            max_hops: None,
            request_delay_ms: 0,
            request_timeout_sec: LINK_REQUEST_TIMEOUT_SEC,
        }
    }
}

impl CrawlerConfig {
    pub fn new(root: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }

    /// Loads a TOML file; missing keys fall back to defaults.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: CrawlerConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [("start", &self.start), ("stop", &self.stop), ("root", &self.root)] {
            if value.is_empty() {
                return Err(ConfigError::Invalid(format!("{} must not be empty", name)));
            }
        }
        self.root_url()
            .map_err(|e| ConfigError::Invalid(format!("root {:?} is not an absolute URL: {}", self.root, e)))?;
        if self.max_hops == Some(0) {
            return Err(ConfigError::Invalid("max_hops must be greater than 0".to_string()));
        }
        Ok(())
    }

    pub fn root_url(&self) -> Result<Url, url::ParseError> {
        Url::parse(&self.root)
    }

    pub fn with_start(mut self, start: impl Into<String>) -> Self {
        self.start = start.into();
        self
    }

    pub fn with_stop(mut self, stop: impl Into<String>) -> Self {
        self.stop = stop.into();
        self
    }

    pub fn with_cache(mut self, use_cache: bool) -> Self {
        self.use_cache = use_cache;
        self
    }

    pub fn with_max_hops(mut self, max_hops: usize) -> Self {
        self.max_hops = Some(max_hops);
        self
    }

    pub fn with_request_delay(mut self, delay_ms: u64) -> Self {
        self.request_delay_ms = delay_ms;
        self
    }

    pub fn with_request_timeout(mut self, timeout_sec: u64) -> Self {
        self.request_timeout_sec = timeout_sec;
        self
    }
}

pub type CrawlerConfigRef = Arc<CrawlerConfig>;
