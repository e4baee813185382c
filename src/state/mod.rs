//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `CrawlPhase`: Lifecycle of one crawl run (idle, running, draining, done)

mod crawl_phase;

// Re-export main types
pub use crawl_phase::CrawlPhase;
