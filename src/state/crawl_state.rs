//! Crawl state definitions for the orchestrator lifecycle
//!
//! A run moves strictly forward through these states.

use crate::HarvestError;
use std::fmt;

/// Represents the current phase of a crawl run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrawlState {
    /// No login has been attempted yet
    Unauthenticated,

    /// The login POST went out and the session cookies are held
    Authenticated,

    /// Visits are being fetched and discovered links scheduled
    Crawling,

    /// The visit queue drained
    Done,
}

impl CrawlState {
    /// Returns true if this is the terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done)
    }

    /// Returns true if `next` directly follows this state
    pub fn can_transition_to(&self, next: CrawlState) -> bool {
        matches!(
            (self, next),
            (Self::Unauthenticated, Self::Authenticated)
                | (Self::Authenticated, Self::Crawling)
                | (Self::Crawling, Self::Done)
        )
    }

    /// Moves to `next`, rejecting anything but the single forward step
    pub fn transition(&mut self, next: CrawlState) -> Result<(), HarvestError> {
        if !self.can_transition_to(next) {
            return Err(HarvestError::InvalidTransition {
                from: *self,
                to: next,
            });
        }
        tracing::debug!(from = %self, to = %next, "crawl state transition");
        *self = next;
        Ok(())
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unauthenticated => "unauthenticated",
            Self::Authenticated => "authenticated",
            Self::Crawling => "crawling",
            Self::Done => "done",
        }
    }
}

impl Default for CrawlState {
    fn default() -> Self {
        Self::Unauthenticated
    }
}

impl fmt::Display for CrawlState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
