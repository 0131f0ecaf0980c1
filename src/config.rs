use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::crawler::{ConfigError, CrawlerConfig};

/// Log levels as defined in log2 crate
#[derive(Debug, Serialize, Deserialize, Clone, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}
/// This struct receives all program arguments while CrawlerConfig
/// describes only a single traversal
#[derive(Parser, Debug, Serialize, Deserialize)]
#[command(author, version, about = "Follows the first link of random Wikipedia articles", long_about = None)]
pub struct Config {
    /// Number of workers running samples concurrently
    #[arg(short, long, default_value = "4")]
    pub processes: usize,
    /// Number of pages to crawl
    #[arg(short, long, default_value = "10")]
    pub samples: usize,
    /// Use the shared cache (default)
    #[arg(long, overrides_with = "no_cache")]
    pub cache: bool,
    /// Do not use the shared cache
    #[arg(long, overrides_with = "cache")]
    pub no_cache: bool,
    /// TOML file with start, stop, root and traversal settings
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Entry point path, e.g. /wiki/Special:Random
    #[arg(long)]
    pub start: Option<String>,
    /// Target path, e.g. /wiki/Philosophy
    #[arg(long)]
    pub stop: Option<String>,
    /// Origin prepended to relative links
    #[arg(long)]
    pub root: Option<String>,
    /// Give up on a single traversal after this many pages
    #[arg(long)]
    pub max_hops: Option<usize>,
    /// Delay between hops of one traversal in milliseconds
    #[arg(short, long)]
    pub request_delay: Option<u64>,
    /// Request timeout in seconds
    #[arg(long)]
    pub request_timeout: Option<u64>,
    /// Output file for the graph visualization (graphviz dot)
    #[arg(long)]
    pub dot: Option<PathBuf>,
    /// Output file for the terminal records (JSON)
    #[arg(long)]
    pub records: Option<PathBuf>,
    /// Logging level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", value_enum)]
    pub log_level: LogLevel,
}

impl Config {
    pub fn new() -> Self {
        Self::parse()
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.processes == 0 {
            anyhow::bail!("processes must be greater than 0");
        }
        if self.samples == 0 {
            anyhow::bail!("samples must be greater than 0");
        }
        Ok(())
    }

    pub fn use_cache(&self) -> bool {
        !self.no_cache
    }

    /// Config file values (or defaults) overridden by the flags given on the command line
    pub fn crawler_config(&self) -> Result<CrawlerConfig, ConfigError> {
        let mut crawler_config = match &self.config {
            Some(path) => CrawlerConfig::from_toml_file(path)?,
            None => CrawlerConfig::default(),
        };
        if let Some(start) = &self.start {
            crawler_config = crawler_config.with_start(start.as_str());
        }
        if let Some(stop) = &self.stop {
            crawler_config = crawler_config.with_stop(stop.as_str());
        }
        if let Some(root) = &self.root {
            crawler_config.root = root.clone();
        }
        if let Some(max_hops) = self.max_hops {
            crawler_config = crawler_config.with_max_hops(max_hops);
        }
        if let Some(delay) = self.request_delay {
            crawler_config = crawler_config.with_request_delay(delay);
        }
        if let Some(timeout) = self.request_timeout {
            crawler_config = crawler_config.with_request_timeout(timeout);
        }
        if self.no_cache {
            crawler_config = crawler_config.with_cache(false);
        } else if self.cache {
            crawler_config = crawler_config.with_cache(true);
        }
        crawler_config.validate()?;
        Ok(crawler_config)
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        };
        write!(f, "{}", s)
    }
}
