use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use anyhow::Result;
use log2::*;
use serde::Serialize;
use tokio::task::JoinHandle;

use super::config::CrawlerConfigRef;
use super::fetch::Fetcher;
use super::state::CacheRef;
use super::traverse::{TerminalRecord, traverse};

/// A sample whose traversal was aborted by a fetch error
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SampleFailure {
    pub sample: usize,
    pub error: String,
}

/// Everything collected from one sampling run.
/// Records are grouped by worker, in worker order; within a worker they follow claim order.
#[derive(Debug, Default, Serialize)]
pub struct SampleRun {
    pub records: Vec<TerminalRecord>,
    pub failures: Vec<SampleFailure>,
}

impl SampleRun {
    pub fn wins(&self) -> usize {
        self.records.iter().filter(|record| record.is_win()).count()
    }

    /// Writes the terminal records as a JSON array
    pub fn write_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.records)?;
        std::fs::write(path, json)?;
        info!("Records written to {:?}", path);
        Ok(())
    }
}

type SampleOutcome = std::result::Result<TerminalRecord, SampleFailure>;

/// Runs `samples` independent traversals from the configured start on `workers` tasks.
/// All traversals share `cache`; a sample that fails or panics does not stop its siblings.
pub async fn sample(
    config: CrawlerConfigRef,
    cache: CacheRef,
    fetcher: Arc<dyn Fetcher>,
    samples: usize,
    workers: usize,
) -> Result<SampleRun> {
    let next_sample = Arc::new(AtomicUsize::new(0));
    let mut handles: Vec<JoinHandle<Vec<SampleOutcome>>> = Vec::new();

    for worker_id in 0..workers.max(1) {
        let config = Arc::clone(&config);
        let cache = Arc::clone(&cache);
        let fetcher = Arc::clone(&fetcher);
        let next_sample = Arc::clone(&next_sample);

        let handle = tokio::spawn(async move {
            info!("Worker {} started", worker_id);
            let mut outcomes = Vec::new();

            loop {
                let sample = next_sample.fetch_add(1, Ordering::SeqCst);
                if sample >= samples {
                    break;
                }
                debug!("Worker {}: starting sample {}", worker_id, sample);

                // own task per sample, so a panicking traversal only costs that sample
                let traversal = {
                    let config = Arc::clone(&config);
                    let cache = Arc::clone(&cache);
                    let fetcher = Arc::clone(&fetcher);
                    tokio::spawn(async move { traverse(&config.start, &config, &cache, fetcher.as_ref()).await })
                };

                match traversal.await {
                    Ok(Ok(record)) => outcomes.push(Ok(record)),
                    Ok(Err(e)) => {
                        warn!("Worker {}: sample {} failed: {}", worker_id, sample, e);
                        outcomes.push(Err(SampleFailure {
                            sample,
                            error: e.to_string(),
                        }));
                    }
                    Err(e) => {
                        error!("Worker {}: sample {} aborted: {}", worker_id, sample, e);
                        outcomes.push(Err(SampleFailure {
                            sample,
                            error: e.to_string(),
                        }));
                    }
                }
            }

            info!("Worker {} finished", worker_id);
            outcomes
        });

        handles.push(handle);
    }

    let mut run = SampleRun::default();
    for handle in handles {
        for outcome in handle.await? {
            match outcome {
                Ok(record) => run.records.push(record),
                Err(failure) => run.failures.push(failure),
            }
        }
    }

    Ok(run)
}
