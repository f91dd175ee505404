//! TTL-bounded cache slots holding shared in-flight fetches.
//!
//! A slot is replaced wholesale, never mutated: a forced or expired read
//! installs a fresh slot before anyone awaits it, so every caller that reads
//! the slot during a refresh shares the same fetch. Callers holding an older
//! slot still see a consistent (if stale) value.

use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::OnceCell;
use triage::{Timestamp, TriageError};

/// Default lifetime of a cached fetch.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(30 * 60);

pub(crate) type FetchOutcome<T> = Result<Arc<Vec<T>>, TriageError>;

struct Slot<T> {
    expires_at: Timestamp,
    fetch: Arc<OnceCell<FetchOutcome<T>>>,
}

pub(crate) struct TtlCache<T> {
    ttl: Duration,
    slot: Mutex<Option<Slot<T>>>,
}

impl<T> TtlCache<T> {
    pub(crate) fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            slot: Mutex::new(None),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Option<Slot<T>>> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns the live fetch, installing a new empty one when `force` is set,
    /// the slot is empty, or its TTL has elapsed at `now`.
    fn current(&self, now: Timestamp, force: bool) -> Arc<OnceCell<FetchOutcome<T>>> {
        let mut slot = self.lock();
        match slot.as_ref() {
            Some(live) if !force && now < live.expires_at => Arc::clone(&live.fetch),
            _ => {
                let fetch = Arc::new(OnceCell::new());
                *slot = Some(Slot {
                    expires_at: now.saturating_add(self.ttl),
                    fetch: Arc::clone(&fetch),
                });
                fetch
            }
        }
    }

    /// Reads through the cache, running `fetch` only if no live fetch exists.
    ///
    /// A failed fetch is evicted so the next read starts over; callers that
    /// were already awaiting it all observe the same error.
    pub(crate) async fn get_or_fetch<F, Fut>(
        &self,
        now: Timestamp,
        force: bool,
        fetch: F,
    ) -> FetchOutcome<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<T>, TriageError>>,
    {
        let cell = self.current(now, force);
        let outcome = cell
            .get_or_init(|| async move { fetch().await.map(Arc::new) })
            .await
            .clone();

        if outcome.is_err() {
            self.evict(&cell);
        }
        outcome
    }

    /// Drops the slot so the next read fetches again.
    pub(crate) fn invalidate(&self) {
        self.lock().take();
    }

    /// Drops the slot only if it still holds `fetch`; a newer slot installed
    /// by a concurrent forced read is left alone.
    fn evict(&self, fetch: &Arc<OnceCell<FetchOutcome<T>>>) {
        let mut slot = self.lock();
        if slot
            .as_ref()
            .is_some_and(|live| Arc::ptr_eq(&live.fetch, fetch))
        {
            slot.take();
        }
    }
}
