pub mod state;
pub mod config;
pub mod scrape;
pub mod fetch;
pub mod traverse;
pub mod runner;


pub use state::{Cache, CacheRef, Outcome};
pub use config::{ConfigError, CrawlerConfig, CrawlerConfigRef, LINK_REQUEST_TIMEOUT_SEC};
pub use scrape::{LinkExtractor, MarkupEvent, first_link, markup_events};
pub use fetch::{FetchError, Fetcher, HttpFetcher, Page, construct_url};
pub use traverse::{FailReason, TerminalRecord, traverse};
pub use runner::{SampleFailure, SampleRun, sample};
