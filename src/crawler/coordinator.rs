//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the main crawl loop that coordinates all aspects of
//! the crawling process, including:
//! - Initializing storage and the run record
//! - Owning the frontier and the crawl phase
//! - Dispatching pages to a bounded set of concurrent tasks
//! - Feeding discovered links back into the frontier

use crate::config::Config;
use crate::crawler::fetcher::Fetcher;
use crate::crawler::frontier::FrontierState;
use crate::crawler::router::{route, ExtractorKind};
use crate::extract::{extract_document, passes_document_threshold, DocumentKind, HtmlExtractor};
use crate::state::CrawlPhase;
use crate::storage::{
    PageRecord, PersistenceError, RunStatus, SqliteStorage, Storage, UpsertOutcome,
};
use crate::url::{Classification, NormalizedUrl, UrlClassifier};
use crate::IngestError;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tokio::task::JoinSet;

/// Totals for one crawl run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlSummary {
    pub run_id: i64,

    /// Pages popped from the frontier
    pub pages_visited: u64,

    /// Pages skipped by the classifier or the router
    pub pages_skipped: u64,

    /// Pages abandoned after a fetch or extraction error
    pub pages_failed: u64,

    /// Records newly inserted (idempotent no-ops are not counted)
    pub records_written: u64,
}

/// What happened to one page
#[derive(Debug)]
enum PageOutcome {
    Skipped(String),
    Processed {
        records_written: u64,
        links: Vec<NormalizedUrl>,
    },
}

/// Per-page pipeline shared by all in-flight tasks
struct PageWorker {
    fetcher: Fetcher,
    extractor: HtmlExtractor,
    classifier: UrlClassifier,
    storage: Arc<Mutex<SqliteStorage>>,
    politeness_delay: Duration,
    min_document_length: usize,
    download_dir: Option<PathBuf>,
}

impl PageWorker {
    /// Classify, fetch, route, extract and persist one URL
    async fn process(&self, url: &NormalizedUrl) -> Result<PageOutcome, IngestError> {
        if let Classification::Skip(reason) = self.classifier.classify_normalized(url.clone()) {
            return Ok(PageOutcome::Skipped(reason.to_string()));
        }

        if let Some(kind) = route(url, None).document_kind() {
            return self.process_document(url, kind).await;
        }

        let page = self.fetcher.get_page(url.as_str()).await?;

        if route(url, page.content_type.as_deref()) != ExtractorKind::Html {
            return Ok(PageOutcome::Skipped(format!(
                "unsupported content type '{}'",
                page.content_type.as_deref().unwrap_or("")
            )));
        }

        let extracted = self.extractor.extract(&page.text, url);

        let records: Vec<PageRecord> = extracted
            .sections
            .iter()
            .map(|section| {
                PageRecord::html_section(
                    url.as_str(),
                    &extracted.title,
                    &section.title,
                    &section.body,
                )
            })
            .collect();

        tracing::debug!(
            url = %url,
            sections = records.len(),
            links = extracted.links.len(),
            "Extracted HTML page"
        );

        let records_written = self.persist(url, &records);

        // Politeness applies between HTML fetches only
        tokio::time::sleep(self.politeness_delay).await;

        Ok(PageOutcome::Processed {
            records_written,
            links: extracted.links,
        })
    }

    async fn process_document(
        &self,
        url: &NormalizedUrl,
        kind: DocumentKind,
    ) -> Result<PageOutcome, IngestError> {
        let bytes = self.fetcher.get_document(url.as_str()).await?;
        let text = extract_document(kind, bytes, self.download_dir.clone()).await?;

        if !passes_document_threshold(&text, self.min_document_length) {
            tracing::debug!(
                url = %url,
                chars = text.chars().count(),
                "Document text too short, discarded"
            );
            return Ok(PageOutcome::Processed {
                records_written: 0,
                links: Vec::new(),
            });
        }

        let records = kind.records(url.as_str(), &text);
        Ok(PageOutcome::Processed {
            records_written: self.persist(url, &records),
            links: Vec::new(),
        })
    }

    /// Upserts records, logging failures per record
    ///
    /// Returns the number of newly inserted rows.
    fn persist(&self, url: &NormalizedUrl, records: &[PageRecord]) -> u64 {
        let mut storage = match self.storage.lock() {
            Ok(storage) => storage,
            Err(_) => {
                tracing::error!(
                    url = %url,
                    error = %PersistenceError::LockPoisoned,
                    "Records not written"
                );
                return 0;
            }
        };

        let mut written = 0;
        for record in records {
            match storage.upsert_page(record) {
                Ok(UpsertOutcome::Inserted) => written += 1,
                Ok(UpsertOutcome::AlreadyPresent) => {
                    tracing::trace!(
                        url = %url,
                        section = %record.section_title,
                        "Record already present"
                    );
                }
                Err(e) => {
                    tracing::warn!(
                        url = %url,
                        section = %record.section_title,
                        error = %e,
                        "Failed to write record"
                    );
                }
            }
        }
        written
    }
}

/// Main crawler coordinator structure
pub struct Coordinator {
    storage: Arc<Mutex<SqliteStorage>>,
    worker: Arc<PageWorker>,
    frontier: FrontierState,
    phase: CrawlPhase,
    workers: usize,
    run_id: i64,
}

impl Coordinator {
    /// Creates a new coordinator instance
    ///
    /// Opens the database, builds the HTTP client, seeds the frontier with
    /// the base URL and records a new run. Any failure here is fatal.
    ///
    /// # Arguments
    ///
    /// * `config` - The crawler configuration
    /// * `config_hash` - Hash of the config file, stored with the run
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Successfully created coordinator
    /// * `Err(IngestError)` - Failed to initialize
    pub fn new(config: &Config, config_hash: &str) -> Result<Self, IngestError> {
        let mut storage = SqliteStorage::new(Path::new(&config.output.database_path))?;

        let seed = NormalizedUrl::parse(&config.crawler.base_url)?;
        let classifier = UrlClassifier::from_config(&config.crawler)?;
        let fetcher = Fetcher::new(&config.fetch)?;

        let run_id = storage.create_run(config_hash)?;
        let storage = Arc::new(Mutex::new(storage));

        let worker = PageWorker {
            fetcher,
            extractor: HtmlExtractor::new(config.extract.min_section_length),
            classifier,
            storage: Arc::clone(&storage),
            politeness_delay: Duration::from_millis(config.crawler.politeness_delay),
            min_document_length: config.extract.min_document_length,
            download_dir: config.extract.download_dir.as_ref().map(PathBuf::from),
        };

        tracing::info!(
            run_id,
            seed = %seed,
            root_domain = %worker.classifier.root_domain(),
            workers = config.crawler.workers,
            "Crawl run created"
        );

        Ok(Self {
            storage,
            worker: Arc::new(worker),
            frontier: FrontierState::new(seed),
            phase: CrawlPhase::Idle,
            workers: config.crawler.workers.max(1) as usize,
            run_id,
        })
    }

    pub fn phase(&self) -> CrawlPhase {
        self.phase
    }

    pub fn run_id(&self) -> i64 {
        self.run_id
    }

    fn transition(&mut self, next: CrawlPhase) -> Result<(), IngestError> {
        if !self.phase.can_transition_to(next) {
            return Err(IngestError::InvalidTransition {
                from: self.phase,
                to: next,
            });
        }
        tracing::debug!(from = %self.phase, to = %next, "Crawl phase transition");
        self.phase = next;
        Ok(())
    }

    /// Runs the crawl to completion and closes the run record
    pub async fn run(&mut self) -> Result<CrawlSummary, IngestError> {
        let start_time = Instant::now();

        let result = self.crawl_frontier(start_time).await;

        let status = if result.is_ok() {
            RunStatus::Completed
        } else {
            RunStatus::Failed
        };
        let summary = result.as_ref().cloned().unwrap_or_default();

        {
            let mut storage = self
                .storage
                .lock()
                .map_err(|_| PersistenceError::LockPoisoned)?;
            storage.finish_run(
                self.run_id,
                status,
                summary.pages_visited,
                summary.records_written,
            )?;
        }

        if result.is_ok() {
            self.transition(CrawlPhase::Done)?;
            tracing::info!(
                run_id = self.run_id,
                pages = summary.pages_visited,
                skipped = summary.pages_skipped,
                failed = summary.pages_failed,
                records = summary.records_written,
                "Crawl completed in {:?}",
                start_time.elapsed()
            );
        }

        result
    }

    /// Drives the frontier until it is exhausted and nothing is in flight
    ///
    /// # Loop
    ///
    /// 1. Top up in-flight pages from the frontier (at most `workers`)
    /// 2. Wait for one page to finish
    /// 3. Enqueue its in-domain links
    async fn crawl_frontier(&mut self, start_time: Instant) -> Result<CrawlSummary, IngestError> {
        self.transition(CrawlPhase::Running)?;

        let mut summary = CrawlSummary {
            run_id: self.run_id,
            ..CrawlSummary::default()
        };
        let mut in_flight = JoinSet::new();
        let mut finished: u64 = 0;

        loop {
            while in_flight.len() < self.workers {
                let Some(url) = self.frontier.pop_unvisited() else {
                    break;
                };
                summary.pages_visited += 1;
                tracing::debug!(url = %url, "Processing URL");

                let worker = Arc::clone(&self.worker);
                in_flight.spawn(async move {
                    let result = worker.process(&url).await;
                    (url, result)
                });
            }

            let Some(joined) = in_flight.join_next().await else {
                break;
            };

            match joined {
                Ok((url, Ok(PageOutcome::Processed { records_written, links }))) => {
                    summary.records_written += records_written;
                    self.enqueue_links(links);
                    tracing::debug!(url = %url, records = records_written, "Page done");
                }
                Ok((url, Ok(PageOutcome::Skipped(reason)))) => {
                    summary.pages_skipped += 1;
                    tracing::info!(url = %url, reason = %reason, "Skipped");
                }
                Ok((url, Err(e))) => {
                    summary.pages_failed += 1;
                    tracing::warn!(url = %url, error = %e, "Page failed");
                }
                Err(e) => {
                    summary.pages_failed += 1;
                    tracing::error!(error = %e, "Page task aborted");
                }
            }

            finished += 1;
            if finished % 10 == 0 {
                let rate = finished as f64 / start_time.elapsed().as_secs_f64().max(f64::EPSILON);
                tracing::info!(
                    "Progress: {} pages processed, {} in frontier, {} records written, {:.2} pages/sec",
                    finished,
                    self.frontier.pending(),
                    summary.records_written,
                    rate
                );
            }
        }

        tracing::info!("Frontier is empty, crawl draining");
        self.transition(CrawlPhase::Draining)?;

        Ok(summary)
    }

    /// Adds in-domain links to the frontier; the frontier drops repeats
    fn enqueue_links(&mut self, links: Vec<NormalizedUrl>) {
        for link in links {
            if !self.worker.classifier.is_in_domain(&link) {
                tracing::trace!(url = %link, "External link ignored");
                continue;
            }
            if self.frontier.enqueue(link.clone()) {
                tracing::trace!(url = %link, "Enqueued");
            }
        }
    }
}

/// Runs the main crawl operation
///
/// # Arguments
///
/// * `config` - The crawler configuration
/// * `config_hash` - Hash of the config file, stored with the run
///
/// # Returns
///
/// * `Ok(CrawlSummary)` - Crawl completed
/// * `Err(IngestError)` - Startup failed (database, HTTP client, seed URL)
///
/// # Example
///
/// ```no_run
/// use site_ingest::config::load_config_with_hash;
/// use site_ingest::crawler::run_crawl;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let (config, hash) = load_config_with_hash(Path::new("config.toml"))?;
/// let summary = run_crawl(&config, &hash).await?;
/// println!("{} records written", summary.records_written);
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(config: &Config, config_hash: &str) -> Result<CrawlSummary, IngestError> {
    let mut coordinator = Coordinator::new(config, config_hash)?;
    coordinator.run().await
}
