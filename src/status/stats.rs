use super::Stage;
use std::sync::atomic::{AtomicU64, Ordering};

/// Process-wide request counters, injected wherever requests begin or end.
#[derive(Debug, Default)]
pub struct UsageStats {
    requests: AtomicU64,
    rejected: AtomicU64,
    delivered: AtomicU64,
    retained: AtomicU64,
    failed: AtomicU64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UsageSnapshot {
    pub requests: u64,
    pub rejected: u64,
    pub delivered: u64,
    pub retained: u64,
    pub failed: u64,
}

impl UsageStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_request(&self) {
        self.requests.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_rejection(&self) {
        self.rejected.fetch_add(1, Ordering::Relaxed);
    }

    /// Count a request's terminal stage. Non-terminal stages are ignored.
    pub fn record_terminal(&self, stage: Stage) {
        let counter = match stage {
            Stage::Delivered => &self.delivered,
            Stage::Retained => &self.retained,
            Stage::Failed => &self.failed,
            Stage::Pending | Stage::Downloading | Stage::Uploading => return,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> UsageSnapshot {
        UsageSnapshot {
            requests: self.requests.load(Ordering::Relaxed),
            rejected: self.rejected.load(Ordering::Relaxed),
            delivered: self.delivered.load(Ordering::Relaxed),
            retained: self.retained.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
        }
    }
}
