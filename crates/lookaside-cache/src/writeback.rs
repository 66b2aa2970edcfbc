//! Write-back population worker.
//!
//! After an authoritative fetch, the faster tiers are repopulated through a
//! bounded queue serviced by a detached worker task. Enqueueing never
//! blocks the caller that triggered the fetch, and the worker's lifetime is
//! tied to the cache, not to any caller's cancellation.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

use lookaside_core::{EntityKey, ValueCodec};

use crate::local::LocalCache;
use crate::metrics::TierMetrics;
use crate::source::RemoteCache;

/// One population job: a value freshly fetched from the backing store.
struct WritebackJob<V> {
    key: EntityKey,
    value: Arc<V>,
}

/// Handle for controlling the running write-back worker.
pub struct WritebackHandle<V> {
    queue: mpsc::Sender<WritebackJob<V>>,
    shutdown_tx: watch::Sender<bool>,
    metrics: TierMetrics,
}

impl<V> WritebackHandle<V> {
    /// Enqueues a population job for the key.
    ///
    /// Never blocks. On a full queue or a stopped worker the job is
    /// dropped; population is best-effort and the drop is only logged and
    /// counted.
    pub fn enqueue(&self, key: EntityKey, value: Arc<V>) {
        match self.queue.try_send(WritebackJob { key, value }) {
            Ok(()) => {}
            Err(mpsc::error::TrySendError::Full(job)) => {
                warn!(key = %job.key, "write-back queue full, dropping population job");
                self.metrics.record_writeback_failure();
            }
            Err(mpsc::error::TrySendError::Closed(job)) => {
                warn!(key = %job.key, "write-back worker stopped, dropping population job");
                self.metrics.record_writeback_failure();
            }
        }
    }

    /// Signals the worker to stop.
    pub fn stop(&self) {
        let _ = self.shutdown_tx.send(true);
    }
}

impl<V> Drop for WritebackHandle<V> {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Background worker that populates the local and distributed tiers.
pub struct WritebackWorker<V> {
    local: LocalCache<V>,
    remote: Arc<dyn RemoteCache>,
    codec: Arc<dyn ValueCodec<V>>,
    local_ttl: Duration,
    remote_ttl: Duration,
    metrics: TierMetrics,
}

impl<V> WritebackWorker<V>
where
    V: Send + Sync + 'static,
{
    /// Creates a new worker over the given tiers.
    pub fn new(
        local: LocalCache<V>,
        remote: Arc<dyn RemoteCache>,
        codec: Arc<dyn ValueCodec<V>>,
        local_ttl: Duration,
        remote_ttl: Duration,
        metrics: TierMetrics,
    ) -> Self {
        Self {
            local,
            remote,
            codec,
            local_ttl,
            remote_ttl,
            metrics,
        }
    }

    /// Starts the background population task.
    ///
    /// Returns a handle that can be used to enqueue jobs and stop the
    /// worker.
    pub fn start(self, queue_capacity: usize) -> WritebackHandle<V> {
        let (queue_tx, queue_rx) = mpsc::channel(queue_capacity);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let handle = WritebackHandle {
            queue: queue_tx,
            shutdown_tx,
            metrics: self.metrics.clone(),
        };

        tokio::spawn(self.run(queue_rx, shutdown_rx));

        handle
    }

    /// Runs the worker loop.
    async fn run(
        self,
        mut queue: mpsc::Receiver<WritebackJob<V>>,
        mut shutdown_rx: watch::Receiver<bool>,
    ) {
        info!("starting write-back worker");

        loop {
            tokio::select! {
                job = queue.recv() => {
                    match job {
                        Some(job) => self.populate(job).await,
                        None => {
                            debug!("write-back queue closed");
                            break;
                        }
                    }
                }
                result = shutdown_rx.changed() => {
                    if result.is_err() || *shutdown_rx.borrow() {
                        info!("write-back worker shutting down");
                        break;
                    }
                }
            }
        }
    }

    /// Performs a single population job.
    async fn populate(&self, job: WritebackJob<V>) {
        let WritebackJob { key, value } = job;

        let bytes = match self.codec.encode(value.as_ref()) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(key = %key, error = %e, "write-back encode failed");
                self.metrics.record_writeback_failure();
                return;
            }
        };

        // Tier local primero, luego el distribuido
        self.local.insert(key.clone(), value, self.local_ttl).await;

        match self.remote.set(&key, bytes, self.remote_ttl).await {
            Ok(()) => {
                debug!(key = %key, "write-back population complete");
            }
            Err(e) => {
                warn!(key = %key, error = %e, "write-back to remote tier failed");
                self.metrics.record_writeback_failure();
            }
        }
    }
}
