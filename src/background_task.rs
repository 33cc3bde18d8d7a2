use std::{collections::VecDeque, sync::Arc};

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::Serialize;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::repositories::object_store::ObjectStore;

const CLEANUP_LOG_CAPACITY: usize = 100;

/// One stored object to release.
#[derive(Debug, Clone, PartialEq)]
pub struct CleanupJob {
    pub key: String,
    pub reason: CleanupReason,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CleanupReason {
    RemovedFromListing,
    ListingDeleted,
    SubmissionAborted,
}

/// Sending side of the cleanup worker. Enqueueing never fails the caller.
#[derive(Clone)]
pub struct CleanupQueue {
    sender: UnboundedSender<CleanupJob>,
}

impl CleanupQueue {
    pub fn new() -> (Self, UnboundedReceiver<CleanupJob>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (CleanupQueue { sender }, receiver)
    }

    pub fn release(&self, key: String, reason: CleanupReason) {
        if let Err(e) = self.sender.send(CleanupJob { key, reason }) {
            tracing::error!(key = %e.0.key, "Cleanup worker is gone, object left behind");
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CleanupFailure {
    pub key: String,
    pub reason: CleanupReason,
    pub error: String,
    pub failed_at: DateTime<Utc>,
}

/// Most recent cleanup failures, oldest dropped first.
#[derive(Clone, Default)]
pub struct CleanupLog {
    entries: Arc<Mutex<VecDeque<CleanupFailure>>>,
    total: Arc<Mutex<u64>>,
}

impl CleanupLog {
    pub fn record(&self, failure: CleanupFailure) {
        let mut entries = self.entries.lock();
        if entries.len() == CLEANUP_LOG_CAPACITY {
            entries.pop_front();
        }
        entries.push_back(failure);
        *self.total.lock() += 1;
    }

    pub fn recent(&self) -> Vec<CleanupFailure> {
        self.entries.lock().iter().cloned().collect()
    }

    pub fn total_failures(&self) -> u64 {
        *self.total.lock()
    }
}

/// Releases queued objects one key at a time until every sender is dropped.
pub async fn start_cleanup_worker<S>(
    store: Arc<S>,
    mut jobs: UnboundedReceiver<CleanupJob>,
    log: CleanupLog,
) where
    S: ObjectStore + ?Sized,
{
    while let Some(job) = jobs.recv().await {
        match store.remove(std::slice::from_ref(&job.key)).await {
            Ok(()) => tracing::debug!(key = %job.key, reason = ?job.reason, "Released stored image"),
            Err(e) => {
                tracing::error!(key = %job.key, reason = ?job.reason, "Failed to delete image: {}", e);
                log.record(CleanupFailure {
                    key: job.key,
                    reason: job.reason,
                    error: e.to_string(),
                    failed_at: Utc::now(),
                });
            }
        }
    }

    tracing::info!("Cleanup worker stopped");
}
