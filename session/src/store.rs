use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use serde_json::Value;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use common::logger::warn_if_slow;
use common::time;

use crate::error::SessionError;
use crate::model::SessionRecord;
use crate::options::SessionStoreOptions;
use crate::repository::SessionRepository;

/// Fallback max-age applied when `set` is called without one.
pub const DEFAULT_MAX_AGE: Duration = Duration::from_secs(45 * 60);

const SLOW_QUERY: Duration = Duration::from_millis(100);

/// Durable, expiring key-value storage for opaque session payloads.
///
/// Lifecycle: `uninitialized -> ready`, flipped once by [`SessionStore::setup`]
/// with no way back. `get`/`set`/`destroy` return [`SessionError::NotReady`]
/// until setup has completed.
///
/// A background sweep deletes rows whose expiry has passed. The sweep
/// reschedules itself after each run, so the effective period is
/// `cleanup_time` plus the delete's latency, and interval changes take
/// effect on the next round.
pub struct SessionStore {
    repo: Arc<dyn SessionRepository>,
    create: bool,
    cleanup_ms: Arc<AtomicU64>,
    ready: AtomicBool,
    ready_tx: watch::Sender<bool>,
    sweeper: parking_lot::Mutex<Option<JoinHandle<()>>>,
}

impl SessionStore {
    pub fn new(repo: Arc<dyn SessionRepository>, options: &SessionStoreOptions) -> Self {
        let (ready_tx, _) = watch::channel(false);

        Self {
            repo,
            create: options.create,
            cleanup_ms: Arc::new(AtomicU64::new(options.cleanup_time.as_millis() as u64)),
            ready: AtomicBool::new(false),
            ready_tx,
            sweeper: parking_lot::Mutex::new(None),
        }
    }

    /// Initialize the store: create the table (when configured), start the
    /// cleanup sweep, and mark the store ready.
    ///
    /// Idempotent: once the store is ready, further calls return
    /// immediately. Must complete before any `get`/`set`/`destroy`.
    pub async fn setup(&self) -> Result<(), SessionError> {
        if self.ready.load(Ordering::Acquire) {
            return Ok(());
        }

        if self.create {
            self.repo
                .create_schema()
                .await
                .map_err(SessionError::Query)?;
        }

        self.spawn_sweeper();
        self.ready.store(true, Ordering::Release);
        let _ = self.ready_tx.send(true);

        info!("session store connected");
        Ok(())
    }

    /// Fetch the payload stored under `key`, or `None` when no row exists.
    ///
    /// Contract note: a row past its expiry is still returned until the
    /// cleanup sweep removes it. Expiry enforcement is the sweep's job, not
    /// the read path's.
    pub async fn get(&self, key: &str) -> Result<Option<Value>, SessionError> {
        self.ensure_ready()?;

        let record = warn_if_slow("session_get", SLOW_QUERY, self.repo.fetch(key))
            .await
            .map_err(SessionError::Query)?;

        Ok(record.map(|r| r.payload))
    }

    /// Create or replace the session under `key` in a single atomic upsert.
    ///
    /// `max_age` falls back to [`DEFAULT_MAX_AGE`] (45 minutes). The expiry
    /// is stored as epoch seconds `(now_ms + max_age_ms) / 1000`.
    pub async fn set(
        &self,
        key: &str,
        payload: Value,
        max_age: Option<Duration>,
    ) -> Result<(), SessionError> {
        self.ensure_ready()?;

        let max_age = max_age.unwrap_or(DEFAULT_MAX_AGE);
        let expiry_s = (time::now_ms() as f64 + max_age.as_millis() as f64) / 1000.0;

        let record = SessionRecord {
            id: key.to_owned(),
            expiry_s,
            payload,
        };

        warn_if_slow("session_set", SLOW_QUERY, self.repo.upsert(&record))
            .await
            .map_err(SessionError::Query)
    }

    /// Delete the session under `key`; deleting an absent key succeeds.
    pub async fn destroy(&self, key: &str) -> Result<(), SessionError> {
        self.ensure_ready()?;

        warn_if_slow("session_destroy", SLOW_QUERY, self.repo.delete(key))
            .await
            .map_err(SessionError::Query)
    }

    pub fn ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    /// Watch channel that flips to `true` once setup completes.
    pub fn subscribe_ready(&self) -> watch::Receiver<bool> {
        self.ready_tx.subscribe()
    }

    /// Change the sweep interval. Applies after the currently scheduled
    /// sweep fires.
    pub fn set_cleanup_time(&self, interval: Duration) {
        self.cleanup_ms
            .store(interval.as_millis() as u64, Ordering::Relaxed);
    }

    /// Stop the background sweep. The store itself stays usable.
    pub fn shutdown(&self) {
        if let Some(handle) = self.sweeper.lock().take() {
            handle.abort();
        }
    }

    fn ensure_ready(&self) -> Result<(), SessionError> {
        if self.ready() {
            Ok(())
        } else {
            Err(SessionError::NotReady)
        }
    }

    fn spawn_sweeper(&self) {
        let mut slot = self.sweeper.lock();
        if slot.is_some() {
            return;
        }

        let repo = Arc::clone(&self.repo);
        let cleanup_ms = Arc::clone(&self.cleanup_ms);
        *slot = Some(tokio::spawn(sweep_loop(repo, cleanup_ms)));
    }
}

impl Drop for SessionStore {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Recurring expiry sweep. Sleeps a full interval before the first run, so
/// rows can outlive their nominal expiry by up to one interval. A failed
/// sweep is logged and the loop keeps going.
async fn sweep_loop(repo: Arc<dyn SessionRepository>, cleanup_ms: Arc<AtomicU64>) {
    loop {
        let wait = Duration::from_millis(cleanup_ms.load(Ordering::Relaxed));
        tokio::time::sleep(wait).await;

        match repo.delete_expired(time::now_epoch_seconds()).await {
            Ok(removed) => debug!(removed, "expired session sweep complete"),
            Err(e) => warn!(error = ?e, "session sweep failed; retrying next interval"),
        }
    }
}
