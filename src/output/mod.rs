//! Output module for reports and downstream exports
//!
//! This module handles:
//! - Record statistics for the `--stats` report
//! - Chunk export consumed by the index-building job

pub mod chunks;
pub mod stats;

pub use chunks::{build_chunks, chunk_text, export_chunks, Chunk};
pub use stats::{load_statistics, print_statistics, CrawlStatistics};
