//! Generic in-memory map with per-entry time-to-live.
//!
//! Expiry is enforced twice:
//!
//! - lazily, on every `get`: an expired entry is removed and reported absent
//! - periodically, by a background sweep task owned by the store
//!
//! The sweep only holds a weak reference to the map and is aborted when the
//! store is dropped.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

use std::{
    collections::HashMap,
    sync::{Arc, Weak},
    time::Duration,
};

use tokio::{
    sync::RwLock,
    task::JoinHandle,
    time::{self, Instant},
};
use tracing::debug;

use crate::domain::AggregateId;

struct Entry<T> {
    value: T,
    /// `None` when the TTL reaches past what `Instant` can represent.
    expires_at: Option<Instant>,
}

impl<T> Entry<T> {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at.map_or(true, |at| at > now)
    }
}

type Entries<T> = RwLock<HashMap<AggregateId, Entry<T>>>;

pub struct TtlStore<T> {
    entries: Arc<Entries<T>>,
    ttl: Duration,
    sweeper: Option<JoinHandle<()>>,
}

impl<T> TtlStore<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Create a store whose entries live for `ttl`.
    ///
    /// When called inside a Tokio runtime a sweep task runs every
    /// `sweep_interval`; outside a runtime only lazy expiry applies.
    #[must_use]
    pub fn new(name: &'static str, ttl: Duration, sweep_interval: Duration) -> Self {
        let entries: Arc<Entries<T>> = Arc::new(RwLock::new(HashMap::new()));
        let sweeper = tokio::runtime::Handle::try_current()
            .ok()
            .map(|handle| handle.spawn(sweep_loop(name, Arc::downgrade(&entries), sweep_interval)));

        Self {
            entries,
            ttl,
            sweeper,
        }
    }

    #[must_use]
    pub const fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Insert or replace, restarting the entry's TTL.
    pub async fn insert(&self, id: AggregateId, value: T) {
        let entry = Entry {
            value,
            expires_at: Instant::now().checked_add(self.ttl),
        };
        self.entries.write().await.insert(id, entry);
    }

    /// Fetch a live entry. Expired entries are evicted and reported absent.
    pub async fn get(&self, id: &AggregateId) -> Option<T> {
        {
            let entries = self.entries.read().await;
            match entries.get(id) {
                None => return None,
                Some(entry) if entry.is_live(Instant::now()) => {
                    return Some(entry.value.clone());
                }
                Some(_) => {}
            }
        }

        let mut entries = self.entries.write().await;
        if entries
            .get(id)
            .is_some_and(|entry| !entry.is_live(Instant::now()))
        {
            entries.remove(id);
        }
        None
    }

    pub async fn remove(&self, id: &AggregateId) {
        self.entries.write().await.remove(id);
    }

    /// Drop every expired entry now. Returns how many were removed.
    pub async fn sweep(&self) -> usize {
        purge_expired(&self.entries).await
    }

    /// Number of stored entries, expired ones included until swept.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

impl<T> Drop for TtlStore<T> {
    fn drop(&mut self) {
        if let Some(sweeper) = self.sweeper.take() {
            sweeper.abort();
        }
    }
}

async fn purge_expired<T>(entries: &Entries<T>) -> usize {
    let now = Instant::now();
    let mut entries = entries.write().await;
    let before = entries.len();
    entries.retain(|_, entry| entry.is_live(now));
    before - entries.len()
}

async fn sweep_loop<T>(name: &'static str, entries: Weak<Entries<T>>, every: Duration)
where
    T: Send + Sync,
{
    let mut ticker = time::interval(every);
    // first tick completes immediately
    ticker.tick().await;

    loop {
        ticker.tick().await;
        let Some(entries) = entries.upgrade() else {
            return;
        };
        let removed = purge_expired(&entries).await;
        if removed > 0 {
            debug!(store = name, removed, "Swept expired entries");
        }
    }
}
