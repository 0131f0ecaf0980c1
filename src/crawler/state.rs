use log2::trace;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Outcome class a cached link is known to lead to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Win,
    Fail,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Win => write!(f, "win"),
            Outcome::Fail => write!(f, "fail"),
        }
    }
}

/// Memo of links already known to reach the target or a dead end,
/// shared by every traversal of a run. Sets only ever grow.
#[derive(Debug, Default)]
pub struct Cache {
    /// Links on paths that ended at the target
    win: RwLock<HashSet<String>>,
    /// Links on paths that ended in a honeypot, cycle or cached fail
    fail: RwLock<HashSet<String>>,
}

impl Cache {
    pub fn new() -> Self {
        Self::default()
    }

    fn links(&self, outcome: Outcome) -> &RwLock<HashSet<String>> {
        match outcome {
            Outcome::Win => &self.win,
            Outcome::Fail => &self.fail,
        }
    }

    /// Unions `urls` into the set for `outcome`.
    /// The whole union happens under one write lock, so concurrent merges never clobber each other.
    pub async fn merge_into(&self, outcome: Outcome, urls: &[String]) {
        let mut links = self.links(outcome).write().await;
        links.extend(urls.iter().cloned());
        trace!("Merged {} links into {} cache ({} total)", urls.len(), outcome, links.len());
    }

    pub async fn contains(&self, outcome: Outcome, url: &str) -> bool {
        self.links(outcome).read().await.contains(url)
    }

    pub async fn len(&self, outcome: Outcome) -> usize {
        self.links(outcome).read().await.len()
    }

    pub async fn snapshot(&self, outcome: Outcome) -> HashSet<String> {
        self.links(outcome).read().await.clone()
    }
}

pub type CacheRef = Arc<Cache>;
