//! Background comparison telemetry
//!
//! [`TelemetryDispatcher`] is the request-path [`ComparisonSink`]: `submit`
//! only enqueues, and a spawned task drains the queue into a
//! [`ComparisonStore`]. Store failures are counted and logged; they never
//! reach the request that produced the record.

use dsw_domain::ports::{ComparisonRecord, ComparisonSink, ComparisonStore};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Counters of the dispatcher worker
#[derive(Debug, Default)]
pub struct TelemetryStats {
    persisted: AtomicU64,
    failed: AtomicU64,
    dropped: AtomicU64,
}

impl TelemetryStats {
    /// Records written to the store
    pub fn persisted(&self) -> u64 {
        self.persisted.load(Ordering::Relaxed)
    }

    /// Records the store rejected
    pub fn failed(&self) -> u64 {
        self.failed.load(Ordering::Relaxed)
    }

    /// Records submitted after the worker stopped
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

/// Queue in front of a comparison store
#[derive(Debug)]
pub struct TelemetryDispatcher {
    sender: mpsc::UnboundedSender<ComparisonRecord>,
    stats: Arc<TelemetryStats>,
}

impl TelemetryDispatcher {
    /// Spawn the worker on the current runtime
    ///
    /// The worker exits once every dispatcher handle is dropped and the
    /// queue is drained; await the returned handle to flush.
    pub fn spawn(store: Arc<dyn ComparisonStore>) -> (Self, JoinHandle<()>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let stats = Arc::new(TelemetryStats::default());
        let handle = tokio::spawn(Self::run(receiver, store, Arc::clone(&stats)));
        (Self { sender, stats }, handle)
    }

    /// Shared counters; remain readable after the dispatcher is dropped
    pub fn stats(&self) -> Arc<TelemetryStats> {
        Arc::clone(&self.stats)
    }

    async fn run(
        mut receiver: mpsc::UnboundedReceiver<ComparisonRecord>,
        store: Arc<dyn ComparisonStore>,
        stats: Arc<TelemetryStats>,
    ) {
        while let Some(record) = receiver.recv().await {
            match store.persist(&record).await {
                Ok(()) => {
                    stats.persisted.fetch_add(1, Ordering::Relaxed);
                    debug!(request_id = %record.request_id, "Comparison persisted");
                }
                Err(e) => {
                    stats.failed.fetch_add(1, Ordering::Relaxed);
                    warn!(
                        request_id = %record.request_id,
                        error = %e,
                        "Failed to persist comparison"
                    );
                }
            }
        }
        debug!("Telemetry dispatcher stopped");
    }
}

impl ComparisonSink for TelemetryDispatcher {
    fn submit(&self, record: ComparisonRecord) {
        if let Err(e) = self.sender.send(record) {
            self.stats.dropped.fetch_add(1, Ordering::Relaxed);
            warn!(request_id = %e.0.request_id, "Telemetry worker stopped, comparison dropped");
        }
    }
}
