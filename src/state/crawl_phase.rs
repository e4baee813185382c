/// Crawl phase definitions for one crawl run
///
/// A run moves strictly forward: `Idle -> Running -> Draining -> Done`.
use std::fmt;

/// Represents the lifecycle phase of a crawl run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrawlPhase {
    /// Frontier seeded with the base URL, nothing fetched yet
    Idle,

    /// Pages are being popped and processed
    Running,

    /// Frontier exhausted and no pages in flight; the run is being closed
    Draining,

    /// Run finished
    Done,
}

impl CrawlPhase {
    /// Returns true if `next` is the single legal successor of this phase
    pub fn can_transition_to(&self, next: CrawlPhase) -> bool {
        matches!(
            (self, next),
            (Self::Idle, Self::Running) | (Self::Running, Self::Draining) | (Self::Draining, Self::Done)
        )
    }

    /// Returns true if this is the terminal phase
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Draining => "draining",
            Self::Done => "done",
        }
    }
}

impl fmt::Display for CrawlPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
