//! Idempotency Store
//!
//! Process-wide table of idempotency keys. A key is absent, in-flight
//! (one request owns it and is executing) or completed (a cached 2xx
//! response). Only successful outcomes are cached; a failed or abandoned
//! execution returns the key to absent so the next request retries.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::body::{Body, Bytes};
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tokio::sync::watch;

/// Coordinator settings. Both bounds are off by default.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdempotencyConfig {
    /// Completed records older than this are treated as absent
    pub ttl: Option<Duration>,
    /// Waiters give up on an in-flight key after this long
    pub wait_timeout: Option<Duration>,
}

/// Errors surfaced to callers of [`IdempotencyStore::acquire`]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdempotencyError {
    #[error("A request with idempotency key '{0}' is still being processed")]
    WaitTimedOut(String),
}

/// Response captured from a completed execution
#[derive(Debug, Clone)]
pub struct CachedResponse {
    pub status: StatusCode,
    pub content_type: Option<HeaderValue>,
    pub body: Bytes,
    stored_at: Instant,
}

impl CachedResponse {
    pub fn new(status: StatusCode, content_type: Option<HeaderValue>, body: Bytes) -> Self {
        Self {
            status,
            content_type,
            body,
            stored_at: Instant::now(),
        }
    }
}

impl IntoResponse for CachedResponse {
    fn into_response(self) -> Response {
        let mut response = Response::new(Body::from(self.body));
        *response.status_mut() = self.status;
        if let Some(content_type) = self.content_type {
            response
                .headers_mut()
                .insert(header::CONTENT_TYPE, content_type);
        }
        response
    }
}

/// Observable state of a key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyState {
    Absent,
    InFlight,
    Completed,
}

#[derive(Debug)]
enum Record {
    InFlight {
        epoch: u64,
        /// Closed when the owning execution finishes
        released: watch::Receiver<()>,
    },
    Completed(CachedResponse),
}

/// Outcome of a single claim attempt
enum Claim {
    Completed(CachedResponse),
    InFlight(watch::Receiver<()>),
    Acquired(ClaimGuard),
}

/// Outcome of [`IdempotencyStore::acquire`]
#[derive(Debug)]
pub enum Acquired {
    /// A completed response exists; return it without executing
    Replay(CachedResponse),
    /// The caller owns the key and must execute, then call [`ClaimGuard::complete`]
    Owner(ClaimGuard),
}

struct Inner {
    records: DashMap<String, Record>,
    next_epoch: AtomicU64,
    config: IdempotencyConfig,
}

/// Injectable idempotency key table. Cheap to clone; clones share state.
#[derive(Clone)]
pub struct IdempotencyStore {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for IdempotencyStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdempotencyStore")
            .field("records", &self.inner.records.len())
            .field("config", &self.inner.config)
            .finish()
    }
}

impl Default for IdempotencyStore {
    fn default() -> Self {
        Self::new(IdempotencyConfig::default())
    }
}

impl IdempotencyStore {
    pub fn new(config: IdempotencyConfig) -> Self {
        Self {
            inner: Arc::new(Inner {
                records: DashMap::new(),
                next_epoch: AtomicU64::new(1),
                config,
            }),
        }
    }

    pub fn config(&self) -> &IdempotencyConfig {
        &self.inner.config
    }

    /// Resolve a key to either a cached response or ownership of the key.
    ///
    /// Waits (without polling) while another request owns the key. When that
    /// execution finishes the key is re-examined: a completed record is
    /// replayed, otherwise this caller competes for ownership afresh.
    pub async fn acquire(&self, key: &str) -> Result<Acquired, IdempotencyError> {
        loop {
            match self.claim(key) {
                Claim::Completed(cached) => {
                    tracing::debug!(idempotency_key = %key, "Replaying completed response");
                    return Ok(Acquired::Replay(cached));
                }
                Claim::Acquired(guard) => {
                    tracing::debug!(
                        idempotency_key = %key,
                        epoch = guard.epoch,
                        "Claimed idempotency key"
                    );
                    return Ok(Acquired::Owner(guard));
                }
                Claim::InFlight(released) => {
                    tracing::debug!(idempotency_key = %key, "Waiting on in-flight request");
                    self.wait(key, released).await?;
                }
            }
        }
    }

    /// Current state of a key
    pub fn state(&self, key: &str) -> KeyState {
        match self.inner.records.get(key) {
            None => KeyState::Absent,
            Some(record) => match record.value() {
                Record::InFlight { .. } => KeyState::InFlight,
                Record::Completed(cached) if self.is_expired(cached) => KeyState::Absent,
                Record::Completed(_) => KeyState::Completed,
            },
        }
    }

    /// Number of records held, in-flight and completed
    pub fn len(&self) -> usize {
        self.inner.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.records.is_empty()
    }

    /// Drop completed records past their TTL. Returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        if self.inner.config.ttl.is_none() {
            return 0;
        }
        let before = self.inner.records.len();
        self.inner.records.retain(|_, record| match record {
            Record::Completed(cached) => !self.is_expired(cached),
            Record::InFlight { .. } => true,
        });
        before.saturating_sub(self.inner.records.len())
    }

    /// Atomically inspect the key and claim it if absent.
    fn claim(&self, key: &str) -> Claim {
        match self.inner.records.entry(key.to_owned()) {
            Entry::Occupied(mut occupied) => {
                match occupied.get() {
                    Record::InFlight { released, .. } => return Claim::InFlight(released.clone()),
                    Record::Completed(cached) if !self.is_expired(cached) => {
                        return Claim::Completed(cached.clone())
                    }
                    Record::Completed(_) => {}
                }
                // Expired completion: take the key over as a fresh epoch
                let (guard, record) = self.begin(key);
                occupied.insert(record);
                Claim::Acquired(guard)
            }
            Entry::Vacant(vacant) => {
                let (guard, record) = self.begin(key);
                vacant.insert(record);
                Claim::Acquired(guard)
            }
        }
    }

    fn begin(&self, key: &str) -> (ClaimGuard, Record) {
        let epoch = self.inner.next_epoch.fetch_add(1, Ordering::Relaxed);
        let (release, released) = watch::channel(());
        let guard = ClaimGuard {
            store: self.clone(),
            key: key.to_owned(),
            epoch,
            _release: release,
            finished: false,
        };
        (guard, Record::InFlight { epoch, released })
    }

    async fn wait(
        &self,
        key: &str,
        mut released: watch::Receiver<()>,
    ) -> Result<(), IdempotencyError> {
        // The sender is never written to; closing it is the release signal,
        // so `changed` resolves with Err once the owner is done.
        match self.inner.config.wait_timeout {
            Some(limit) => tokio::time::timeout(limit, released.changed())
                .await
                .map(|_| ())
                .map_err(|_| {
                    tracing::warn!(idempotency_key = %key, "Gave up waiting on in-flight request");
                    IdempotencyError::WaitTimedOut(key.to_owned())
                }),
            None => {
                let _ = released.changed().await;
                Ok(())
            }
        }
    }

    fn is_expired(&self, cached: &CachedResponse) -> bool {
        self.inner
            .config
            .ttl
            .is_some_and(|ttl| cached.stored_at.elapsed() >= ttl)
    }

    /// Remove the key only if it is still the in-flight record of `epoch`.
    fn release_in_flight(&self, key: &str, epoch: u64) {
        self.inner.records.remove_if(key, |_, record| {
            matches!(record, Record::InFlight { epoch: e, .. } if *e == epoch)
        });
    }
}

/// Ownership of an in-flight key.
///
/// Dropping the guard without calling [`ClaimGuard::complete`] (panic,
/// cancelled request) removes the record and wakes all waiters.
pub struct ClaimGuard {
    store: IdempotencyStore,
    key: String,
    epoch: u64,
    _release: watch::Sender<()>,
    finished: bool,
}

impl std::fmt::Debug for ClaimGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClaimGuard")
            .field("key", &self.key)
            .field("epoch", &self.epoch)
            .finish()
    }
}

impl ClaimGuard {
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Record the outcome and release all waiters.
    ///
    /// 2xx responses are cached; anything else returns the key to absent.
    pub fn complete(mut self, response: CachedResponse) {
        if response.status.is_success() {
            tracing::debug!(
                idempotency_key = %self.key,
                status = %response.status,
                "Caching completed response"
            );
            self.store
                .inner
                .records
                .insert(self.key.clone(), Record::Completed(response));
        } else {
            tracing::debug!(
                idempotency_key = %self.key,
                status = %response.status,
                "Not caching unsuccessful response"
            );
            self.store.release_in_flight(&self.key, self.epoch);
        }
        self.finished = true;
        // `_release` drops with `self`, after the table is updated
    }
}

impl Drop for ClaimGuard {
    fn drop(&mut self) {
        if !self.finished {
            tracing::warn!(
                idempotency_key = %self.key,
                epoch = self.epoch,
                "In-flight request abandoned, releasing idempotency key"
            );
            self.store.release_in_flight(&self.key, self.epoch);
        }
    }
}
