//! Scheduler for the visit queue
//!
//! This module handles:
//! - Handing visit requests to the worker pool through a shared queue
//! - Counting outstanding visits (queued or in progress)
//! - Closing the queue once the last outstanding visit completes

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use tokio::sync::mpsc;
use url::Url;

/// Why a URL was scheduled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VisitKind {
    /// The configured start page
    Start,

    /// An entry of the site menu
    Menu,

    /// A sub-folder of the current page
    Folder,

    /// A link below the media base path
    Resource,
}

impl VisitKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Menu => "menu",
            Self::Folder => "folder",
            Self::Resource => "resource",
        }
    }
}

/// A request to fetch one URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Visit {
    /// The URL to fetch
    pub url: Url,

    /// The link kind that produced this visit
    pub kind: VisitKind,
}

impl Visit {
    pub fn new(url: Url, kind: VisitKind) -> Self {
        Self { url, kind }
    }
}

/// Receiving end of the visit queue, shared by all workers
#[derive(Debug)]
pub struct VisitQueue {
    receiver: tokio::sync::Mutex<mpsc::UnboundedReceiver<Visit>>,
}

impl VisitQueue {
    /// Waits for the next visit
    ///
    /// Returns `None` once the scheduler is closed and the queue is empty.
    pub async fn next(&self) -> Option<Visit> {
        self.receiver.lock().await.recv().await
    }
}

/// Scheduler tracks outstanding work and feeds the visit queue
///
/// A visit counts as outstanding from the moment it is scheduled until the
/// worker processing it calls [`Scheduler::complete`]. Follow-up visits are
/// always scheduled before their parent completes, so the count only drops
/// to zero when the crawl has nothing left to do.
#[derive(Debug)]
pub struct Scheduler {
    sender: Mutex<Option<mpsc::UnboundedSender<Visit>>>,
    outstanding: AtomicUsize,
    scheduled_total: AtomicUsize,
}

impl Scheduler {
    /// Creates a scheduler together with the queue its visits arrive on
    pub fn new() -> (Self, VisitQueue) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let scheduler = Self {
            sender: Mutex::new(Some(sender)),
            outstanding: AtomicUsize::new(0),
            scheduled_total: AtomicUsize::new(0),
        };
        let queue = VisitQueue {
            receiver: tokio::sync::Mutex::new(receiver),
        };
        (scheduler, queue)
    }

    /// Enqueues a visit
    ///
    /// Returns false if the scheduler has already been closed.
    pub fn schedule(&self, visit: Visit) -> bool {
        let sender = self
            .sender
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let Some(sender) = sender.as_ref() else {
            tracing::debug!(url = %visit.url, "scheduler closed, dropping visit");
            return false;
        };

        self.outstanding.fetch_add(1, Ordering::SeqCst);
        tracing::trace!(url = %visit.url, kind = visit.kind.as_str(), "scheduled");
        if sender.send(visit).is_err() {
            self.outstanding.fetch_sub(1, Ordering::SeqCst);
            return false;
        }
        self.scheduled_total.fetch_add(1, Ordering::Relaxed);
        true
    }

    /// Marks one outstanding visit as finished
    ///
    /// Closes the queue when it was the last one.
    pub fn complete(&self) {
        let previous = self.outstanding.fetch_sub(1, Ordering::SeqCst);
        if previous == 1 {
            tracing::debug!("no outstanding visits left, closing queue");
            self.close();
        }
    }

    /// Closes the queue; workers drain what is left and stop
    pub fn close(&self) {
        self.sender
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take();
    }

    /// Returns the number of visits queued or in progress
    pub fn outstanding(&self) -> usize {
        self.outstanding.load(Ordering::SeqCst)
    }

    /// Returns the number of visits scheduled since creation
    pub fn scheduled_total(&self) -> usize {
        self.scheduled_total.load(Ordering::Relaxed)
    }
}
