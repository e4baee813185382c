//! Breadth-first frontier for one crawl run
//!
//! The frontier owns the FIFO of pending URLs and the visited set. It is
//! owned by the coordinator alone; workers never touch it, so every
//! check-and-mark happens in one place.

use crate::url::NormalizedUrl;
use std::collections::{HashSet, VecDeque};

/// Pending queue plus visited set
///
/// A URL is enqueued at most once per run, and the visited set only grows.
#[derive(Debug, Default)]
pub struct FrontierState {
    /// URLs waiting to be processed, in discovery order
    queue: VecDeque<NormalizedUrl>,

    /// Every URL ever enqueued
    discovered: HashSet<NormalizedUrl>,

    /// URLs popped for processing
    visited: HashSet<NormalizedUrl>,
}

impl FrontierState {
    /// Creates a frontier seeded with `seed`
    pub fn new(seed: NormalizedUrl) -> Self {
        let mut frontier = Self::default();
        frontier.enqueue(seed);
        frontier
    }

    /// Adds a URL to the back of the queue
    ///
    /// # Returns
    ///
    /// `true` if the URL was new to this run, `false` if it was already
    /// enqueued or visited
    pub fn enqueue(&mut self, url: NormalizedUrl) -> bool {
        if self.visited.contains(&url) || !self.discovered.insert(url.clone()) {
            return false;
        }
        self.queue.push_back(url);
        true
    }

    /// Pops the next unvisited URL and marks it visited
    ///
    /// Entries that are already visited are discarded. Returns `None` once
    /// the queue is exhausted.
    pub fn pop_unvisited(&mut self) -> Option<NormalizedUrl> {
        while let Some(url) = self.queue.pop_front() {
            if self.visited.insert(url.clone()) {
                return Some(url);
            }
        }
        None
    }

    pub fn is_visited(&self, url: &NormalizedUrl) -> bool {
        self.visited.contains(url)
    }

    /// Number of URLs waiting in the queue
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
