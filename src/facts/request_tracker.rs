//! Counting of outstanding hosting requests.

use crate::facts::hosting::Collection;
use crate::facts::progress_reporter::ProgressReporter;
use core::sync::atomic::{AtomicU64, Ordering};
use std::collections::HashMap;
use std::sync::Arc;
use strum::IntoEnumIterator;

#[derive(Debug, Default)]
struct RequestCounter {
    issued: AtomicU64,
    completed: AtomicU64,
}

/// Tracks issued and completed requests per [`Collection`] and mirrors them on a progress bar.
///
/// Cloning is cheap; all clones share the same counters.
#[derive(Debug, Clone)]
pub struct RequestTracker {
    counters: Arc<HashMap<Collection, RequestCounter>>,
    progress: ProgressReporter,
}

impl RequestTracker {
    #[must_use]
    pub fn new(progress: ProgressReporter) -> Self {
        Self {
            counters: Arc::new(Collection::iter().map(|c| (c, RequestCounter::default())).collect()),
            progress,
        }
    }

    pub fn add_request(&self, collection: Collection) {
        if let Some(counter) = self.counters.get(&collection) {
            let _ = counter.issued.fetch_add(1, Ordering::Relaxed);
        }
        self.update_progress();
    }

    pub fn complete_request(&self, collection: Collection) {
        if let Some(counter) = self.counters.get(&collection) {
            let _ = counter.completed.fetch_add(1, Ordering::Relaxed);
        }
        self.update_progress();
    }

    /// Issued and completed requests for one collection.
    #[must_use]
    pub fn counts(&self, collection: Collection) -> (u64, u64) {
        self.counters.get(&collection).map_or((0, 0), |counter| {
            (counter.issued.load(Ordering::Relaxed), counter.completed.load(Ordering::Relaxed))
        })
    }

    fn update_progress(&self) {
        let mut total_issued = 0;
        let mut total_completed = 0;
        let mut parts = Vec::new();

        for collection in Collection::iter() {
            let (issued, completed) = self.counts(collection);
            if issued > 0 {
                total_issued += issued;
                total_completed += completed;
                parts.push(format!("{completed}/{issued} {collection}"));
            }
        }

        if total_issued > 0 {
            self.progress.update(total_issued, total_completed, parts.join(", "));
        }
    }
}
