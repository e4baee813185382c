//! Statistics generation from the pages database
//!
//! This module provides functionality for extracting and displaying
//! record statistics from the storage layer.

use crate::storage::{FileType, RunRecord, Storage};
use crate::IngestError;
use std::collections::HashMap;

/// Record statistics summary
#[derive(Debug, Clone)]
pub struct CrawlStatistics {
    /// Total number of stored records
    pub total_records: u64,

    /// Count of records by file type
    pub records_by_file_type: HashMap<FileType, u64>,

    /// Number of distinct source URLs
    pub distinct_urls: u64,

    /// Most recent crawl run, if any
    pub latest_run: Option<RunRecord>,
}

impl CrawlStatistics {
    /// Duration of the latest run, if it has finished
    pub fn latest_run_seconds(&self) -> Option<i64> {
        let run = self.latest_run.as_ref()?;
        let started = run.started_at.parse::<chrono::DateTime<chrono::Utc>>().ok()?;
        let finished = run
            .finished_at
            .as_ref()?
            .parse::<chrono::DateTime<chrono::Utc>>()
            .ok()?;
        Some((finished - started).num_seconds())
    }
}

/// Loads statistics from storage
///
/// # Arguments
///
/// * `storage` - The storage backend to query
///
/// # Returns
///
/// * `Ok(CrawlStatistics)` - Successfully loaded statistics
/// * `Err(IngestError)` - Failed to query statistics
pub fn load_statistics(storage: &dyn Storage) -> Result<CrawlStatistics, IngestError> {
    Ok(CrawlStatistics {
        total_records: storage.count_records()?,
        records_by_file_type: storage.count_by_file_type()?,
        distinct_urls: storage.count_distinct_urls()?,
        latest_run: storage.get_latest_run()?,
    })
}

/// Prints statistics to stdout in a formatted manner
///
/// # Arguments
///
/// * `stats` - The statistics to display
pub fn print_statistics(stats: &CrawlStatistics) {
    println!("=== Ingest Statistics ===\n");

    println!("Overview:");
    println!("  Total records: {}", stats.total_records);
    println!("  Distinct URLs: {}", stats.distinct_urls);
    println!();

    println!("Records by File Type:");
    for file_type in FileType::all() {
        let count = stats
            .records_by_file_type
            .get(&file_type)
            .copied()
            .unwrap_or(0);
        let percentage = if stats.total_records > 0 {
            (count as f64 / stats.total_records as f64) * 100.0
        } else {
            0.0
        };
        println!("  {}: {} ({:.1}%)", file_type, count, percentage);
    }
    println!();

    match &stats.latest_run {
        Some(run) => {
            println!("Latest Run (#{}):", run.id);
            println!("  Status: {}", run.status.to_db_string());
            println!("  Started: {}", run.started_at);
            if let Some(finished) = &run.finished_at {
                println!("  Finished: {}", finished);
            }
            if let Some(seconds) = stats.latest_run_seconds() {
                println!("  Duration: {}s", seconds);
            }
            println!("  Pages visited: {}", run.pages_visited);
            println!("  Records written: {}", run.records_written);
            println!("  Config hash: {}", run.config_hash);
        }
        None => println!("No crawl runs recorded."),
    }
}
