//! Debounced write wrapper
//!
//! Debounced saves land in a pending map and a background task writes them
//! to the inner store once no new save has arrived for the quiet period.
//! Several saves of the same key inside one quiet period produce a single
//! write of the latest payload.
//!
//! Immediate saves bypass the queue and drop any pending payload for the
//! same key, so an older debounced record can never overwrite a newer
//! immediate one. Both paths take the same write lock.

use std::collections::HashMap;
use std::mem;
use std::sync::Arc;
use std::time::Duration;

use lapse_core::{StateStore, WritePolicy};
use lapse_domain::Result;
use parking_lot::Mutex;
use serde_json::Value;
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

struct Shared<S: ?Sized> {
    inner: Arc<S>,
    pending: Mutex<HashMap<String, Value>>,
    write_lock: Mutex<()>,
    notify: Notify,
    quiet: Duration,
}

impl<S: StateStore + ?Sized> Shared<S> {
    /// Write every pending payload; returns the first failure
    fn drain(&self) -> Result<()> {
        let _guard = self.write_lock.lock();
        let batch = mem::take(&mut *self.pending.lock());
        if batch.is_empty() {
            return Ok(());
        }

        debug!(keys = batch.len(), "flushing debounced writes");
        let mut first_error = None;
        for (key, payload) in batch {
            if let Err(err) = self.inner.save(&key, &payload, WritePolicy::Immediate) {
                warn!(key = %key, error = %err, "debounced write failed");
                first_error.get_or_insert(err);
            }
        }
        first_error.map_or(Ok(()), Err)
    }
}

/// [`StateStore`] wrapper that coalesces [`WritePolicy::Debounced`] saves
///
/// Must be created inside a tokio runtime. Pending writes are flushed on
/// [`flush`](Self::flush), [`shutdown`](Self::shutdown) and drop.
pub struct DebouncedStore<S: StateStore + ?Sized + 'static> {
    shared: Arc<Shared<S>>,
    shutdown: CancellationToken,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl<S: StateStore + ?Sized + 'static> DebouncedStore<S> {
    pub fn new(inner: Arc<S>, quiet: Duration) -> Self {
        let shared = Arc::new(Shared {
            inner,
            pending: Mutex::new(HashMap::new()),
            write_lock: Mutex::new(()),
            notify: Notify::new(),
            quiet,
        });
        let shutdown = CancellationToken::new();
        let worker = tokio::spawn(run_worker(Arc::clone(&shared), shutdown.clone()));

        Self { shared, shutdown, worker: Mutex::new(Some(worker)) }
    }

    pub fn inner(&self) -> &Arc<S> {
        &self.shared.inner
    }

    /// Number of keys waiting for the quiet period to elapse
    pub fn pending_len(&self) -> usize {
        self.shared.pending.lock().len()
    }

    /// Write all pending payloads now
    ///
    /// # Errors
    /// Returns the first error reported by the inner store. Every pending
    /// key is attempted regardless.
    pub fn flush(&self) -> Result<()> {
        self.shared.drain()
    }

    /// Stop the background task and flush what is left
    ///
    /// # Errors
    /// See [`flush`](Self::flush).
    pub async fn shutdown(&self) -> Result<()> {
        self.shutdown.cancel();
        let worker = self.worker.lock().take();
        if let Some(worker) = worker {
            if let Err(err) = worker.await {
                warn!(error = %err, "debounce worker ended abnormally");
            }
        }
        self.flush()
    }
}

impl<S: StateStore + ?Sized + 'static> StateStore for DebouncedStore<S> {
    fn load(&self, key: &str) -> Result<Option<Value>> {
        if let Some(pending) = self.shared.pending.lock().get(key) {
            return Ok(Some(pending.clone()));
        }
        self.shared.inner.load(key)
    }

    fn save(&self, key: &str, payload: &Value, policy: WritePolicy) -> Result<()> {
        match policy {
            WritePolicy::Debounced => {
                self.shared.pending.lock().insert(key.to_string(), payload.clone());
                self.shared.notify.notify_one();
                Ok(())
            }
            WritePolicy::Immediate => {
                let _guard = self.shared.write_lock.lock();
                self.shared.pending.lock().remove(key);
                self.shared.inner.save(key, payload, WritePolicy::Immediate)
            }
        }
    }
}

impl<S: StateStore + ?Sized + 'static> Drop for DebouncedStore<S> {
    fn drop(&mut self) {
        self.shutdown.cancel();
        if let Err(err) = self.shared.drain() {
            warn!(error = %err, "pending writes lost on drop");
        }
    }
}

async fn run_worker<S: StateStore + ?Sized + 'static>(
    shared: Arc<Shared<S>>,
    shutdown: CancellationToken,
) {
    loop {
        tokio::select! {
            biased;
            _ = shutdown.cancelled() => return,
            _ = shared.notify.notified() => {}
        }

        // Restart the quiet period on every new save.
        loop {
            tokio::select! {
                biased;
                _ = shutdown.cancelled() => return,
                _ = shared.notify.notified() => continue,
                _ = tokio::time::sleep(shared.quiet) => break,
            }
        }

        if let Err(err) = shared.drain() {
            warn!(error = %err, "debounced flush failed; in-memory state is kept");
        }
    }
}
