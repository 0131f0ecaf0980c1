use log2::{debug, info};
use serde::{Deserialize, Serialize};
use std::fmt;
use tokio::time::{Duration, sleep};

use super::config::CrawlerConfig;
use super::fetch::{FetchError, Fetcher, construct_url};
use super::scrape::first_link;
use super::state::{Cache, Outcome};

/// Why a traversal did not reach the target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailReason {
    /// Next link was already known to fail
    CachedFail,
    /// Page without a followable link
    Honeypot,
    /// Next link was already on the path
    Cycle,
    /// Gave up after `max_hops` fetched pages
    HopLimit,
}

impl fmt::Display for FailReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FailReason::CachedFail => "cached-fail",
            FailReason::Honeypot => "honeypot",
            FailReason::Cycle => "cycle",
            FailReason::HopLimit => "hop-limit",
        };
        write!(f, "{}", s)
    }
}

/// Result of one traversal. `origin` is where the first fetch resolved to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "lowercase")]
pub enum TerminalRecord {
    Win {
        path: Vec<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        origin: Option<String>,
    },
    Fail {
        path: Vec<String>,
        reason: FailReason,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        origin: Option<String>,
    },
}

impl TerminalRecord {
    pub fn outcome(&self) -> Outcome {
        match self {
            TerminalRecord::Win { .. } => Outcome::Win,
            TerminalRecord::Fail { .. } => Outcome::Fail,
        }
    }

    pub fn is_win(&self) -> bool {
        self.outcome() == Outcome::Win
    }

    pub fn path(&self) -> &[String] {
        match self {
            TerminalRecord::Win { path, .. } | TerminalRecord::Fail { path, .. } => path,
        }
    }

    /// Number of links followed, i.e. path length minus one
    pub fn hops(&self) -> usize {
        self.path().len().saturating_sub(1)
    }

    pub fn reason(&self) -> Option<FailReason> {
        match self {
            TerminalRecord::Win { .. } => None,
            TerminalRecord::Fail { reason, .. } => Some(*reason),
        }
    }

    pub fn origin(&self) -> Option<&str> {
        match self {
            TerminalRecord::Win { origin, .. } | TerminalRecord::Fail { origin, .. } => origin.as_deref(),
        }
    }
}

/// Follows first links from `start` until the target, a dead end, a loop,
/// or a link the cache already classified.
///
/// Every link on a finished path is merged into the cache under the path's
/// outcome, whether or not `use_cache` is set; the flag only controls lookups.
/// A fetch error ends this traversal only.
pub async fn traverse(
    start: &str,
    config: &CrawlerConfig,
    cache: &Cache,
    fetcher: &dyn Fetcher,
) -> Result<TerminalRecord, FetchError> {
    let root = config.root_url().map_err(|source| FetchError::InvalidUrl {
        link: config.root.clone(),
        source,
    })?;

    let mut path: Vec<String> = Vec::new();
    let mut origin: Option<String> = None;
    let mut current = start.to_string();
    let mut fetched = 0usize;

    loop {
        if current != config.start {
            path.push(current.clone());
        }

        if config.max_hops.is_some_and(|limit| fetched >= limit) {
            info!("Hop limit reached after {} pages: {:?}", fetched, path);
            return Ok(TerminalRecord::Fail {
                path,
                reason: FailReason::HopLimit,
                origin,
            });
        }

        let url = construct_url(&current, &root).map_err(|source| FetchError::InvalidUrl {
            link: current.clone(),
            source,
        })?;
        debug!("Visiting {}", url);
        let page = fetcher.fetch(&url).await?;
        fetched += 1;
        origin.get_or_insert_with(|| page.final_url.clone());

        // an absent link can match neither the stop link nor a cache entry,
        // so handling it first keeps the win > cached fail > honeypot > cycle order
        let Some(next) = first_link(&page.body) else {
            cache.merge_into(Outcome::Fail, &path).await;
            info!("Honeypot at {}: {:?}", page.final_url, path);
            return Ok(TerminalRecord::Fail {
                path,
                reason: FailReason::Honeypot,
                origin,
            });
        };

        if next == config.stop || (config.use_cache && cache.contains(Outcome::Win, &next).await) {
            path.push(next);
            cache.merge_into(Outcome::Win, &path).await;
            info!("Reached target in {} links: {:?}", path.len(), path);
            return Ok(TerminalRecord::Win { path, origin });
        }

        if config.use_cache && cache.contains(Outcome::Fail, &next).await {
            path.push(next);
            cache.merge_into(Outcome::Fail, &path).await;
            info!("Cached fail: {:?}", path);
            return Ok(TerminalRecord::Fail {
                path,
                reason: FailReason::CachedFail,
                origin,
            });
        }

        if path.contains(&next) {
            cache.merge_into(Outcome::Fail, &path).await;
            info!("Cycle back to {}: {:?}", next, path);
            return Ok(TerminalRecord::Fail {
                path,
                reason: FailReason::Cycle,
                origin,
            });
        }

        if config.request_delay_ms > 0 {
            sleep(Duration::from_millis(config.request_delay_ms)).await;
        }
        current = next;
    }
}
