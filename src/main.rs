use log2::*;
use anyhow::Result;
use std::sync::Arc;
use std::time::Instant;

use PhilosophyRacer::{config, crawler, link_graph, stats};

/// Indicates start time of a project, lazily initialized
pub static START_TIME: once_cell::sync::Lazy<Instant> = once_cell::sync::Lazy::new(Instant::now);

#[tokio::main]
async fn main() -> Result<()> {
    let _ = *START_TIME;
    let cfg = config::Config::new();
    cfg.validate()?;
    let _log2 = stdout()
        .module(true) // include module name
        .module_with_line(true) // include line number from module
        .module_filter(|module| module.starts_with("PhilosophyRacer")) // include only modules having this pattern
        .compress(false) // compress output
        .level(cfg.log_level.to_string()) // level of logging (trace - error)
        .start();

    let crawler_config = Arc::new(cfg.crawler_config()?);
    let cache = Arc::new(crawler::Cache::new());
    let fetcher: Arc<dyn crawler::Fetcher> = Arc::new(crawler::HttpFetcher::new(crawler_config.request_timeout_sec));

    info!(
        "Sampling {} pages with {} workers: {}{} -> {}",
        cfg.samples, cfg.processes, crawler_config.root, crawler_config.start, crawler_config.stop
    );

    let run = crawler::sample(crawler_config.clone(), cache.clone(), fetcher, cfg.samples, cfg.processes).await?;

    info!(
        "{} samples finished ({} won), {} failed, in {:?}",
        run.records.len(),
        run.wins(),
        run.failures.len(),
        START_TIME.elapsed()
    );
    debug!(
        "Cache holds {} winning and {} failing links",
        cache.len(crawler::Outcome::Win).await,
        cache.len(crawler::Outcome::Fail).await
    );

    if let Some(path) = &cfg.dot {
        link_graph::write_dot_file(&run.records, path)?;
    }
    if let Some(path) = &cfg.records {
        run.write_json(path)?;
    }

    if crawler_config.use_cache {
        println!("Cache is enabled by default, turning it off will affect the distributions");
    }
    let summary = stats::analyze(&run.records)?;
    println!("{}", summary);

    Ok(())
}
