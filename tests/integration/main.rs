//! Integration tests for Site-Ingest
//!
//! Crawls run end-to-end against wiremock servers with temporary databases.

mod crawl_tests;
mod fixtures;
