//! Deduplication ledger for links already scheduled during a run

use std::collections::HashSet;
use std::sync::Mutex;

/// Set of raw link strings that have already been claimed for a visit
///
/// The check and the insert happen under one lock, so concurrent callers
/// racing on the same link see exactly one winner.
#[derive(Debug, Default)]
pub struct VisitedIndex {
    claimed: Mutex<HashSet<String>>,
}

impl VisitedIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims `link`, returning true only for the first caller
    pub fn try_claim(&self, link: &str) -> bool {
        let mut claimed = self
            .claimed
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if claimed.contains(link) {
            return false;
        }
        claimed.insert(link.to_string())
    }
}
