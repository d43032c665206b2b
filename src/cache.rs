//! # Time-Window Cache
//! Fetch-or-reuse storage of raw datasets, one slot per window size.
//!
//! Each slot is an async mutex over an `Option<Arc<_>>`: a concurrent
//! request for the same window waits on the slot lock and then observes the
//! stored value instead of issuing a second fetch, which closes the
//! duplicate-fetch race. Distinct windows fetch in parallel. A failed fetch
//! leaves the slot empty so the next access retries; there is no other retry
//! policy.

use std::sync::Arc;

use anyhow::Result;
use metrics::{counter, describe_counter};
use once_cell::sync::OnceCell;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::feed::FeedClient;
use crate::record::EventRecord;
use crate::window::WindowSize;

/// One-time metrics registration (so series show up for exporters).
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("feed_cache_hits_total", "Window requests served from cache.");
        describe_counter!("feed_cache_miss_total", "Window requests that went to the backend.");
        describe_counter!("feed_fetch_errors_total", "Backend fetch failures.");
    });
}

type Slot<T> = Mutex<Option<Arc<T>>>;

/// Session-lifetime cache of raw datasets and author lists, keyed by
/// window size. Entries are immutable once stored and only replaced
/// wholesale via [`WindowCache::force_refresh`].
pub struct WindowCache {
    client: Arc<dyn FeedClient>,
    events: [Slot<Vec<EventRecord>>; 3],
    authors: [Slot<Vec<String>>; 3],
}

impl WindowCache {
    pub fn new(client: Arc<dyn FeedClient>) -> Self {
        ensure_metrics_described();
        Self {
            client,
            events: [(); 3].map(|_| Mutex::new(None)),
            authors: [(); 3].map(|_| Mutex::new(None)),
        }
    }

    /// Return the dataset for `size`, fetching it on first access.
    /// On success exactly one backend fetch happens per distinct size
    /// for the lifetime of the cache.
    pub async fn get_events(&self, size: WindowSize) -> Result<Arc<Vec<EventRecord>>> {
        let mut slot = self.events[size.index()].lock().await;
        if let Some(set) = slot.as_ref() {
            counter!("feed_cache_hits_total").increment(1);
            return Ok(Arc::clone(set));
        }
        counter!("feed_cache_miss_total").increment(1);
        match self.client.fetch_events(size.hours()).await {
            Ok(events) => {
                debug!(window = %size, count = events.len(), "event window fetched");
                let set = Arc::new(events);
                *slot = Some(Arc::clone(&set));
                Ok(set)
            }
            Err(e) => {
                counter!("feed_fetch_errors_total").increment(1);
                Err(e)
            }
        }
    }

    /// Cache-or-fetch for the distinct-author list of `size`; identical
    /// contract to [`WindowCache::get_events`].
    pub async fn get_authors(&self, size: WindowSize) -> Result<Arc<Vec<String>>> {
        let mut slot = self.authors[size.index()].lock().await;
        if let Some(list) = slot.as_ref() {
            counter!("feed_cache_hits_total").increment(1);
            return Ok(Arc::clone(list));
        }
        counter!("feed_cache_miss_total").increment(1);
        match self.client.fetch_authors(size.hours()).await {
            Ok(authors) => {
                debug!(window = %size, count = authors.len(), "author window fetched");
                let list = Arc::new(authors);
                *slot = Some(Arc::clone(&list));
                Ok(list)
            }
            Err(e) => {
                counter!("feed_fetch_errors_total").increment(1);
                Err(e)
            }
        }
    }

    /// Eagerly populate every window (events and authors) in parallel to
    /// hide first-interaction latency. Individual failures are logged and
    /// leave that slot empty for lazy retry on demand; preload itself
    /// never fails.
    pub async fn preload(&self) {
        tokio::join!(
            self.warm_events(WindowSize::Day),
            self.warm_events(WindowSize::Week),
            self.warm_events(WindowSize::Month),
            self.warm_authors(WindowSize::Day),
            self.warm_authors(WindowSize::Week),
            self.warm_authors(WindowSize::Month),
        );
    }

    async fn warm_events(&self, size: WindowSize) {
        if let Err(e) = self.get_events(size).await {
            warn!(window = %size, error = ?e, "preload of event window failed");
        }
    }

    async fn warm_authors(&self, size: WindowSize) {
        if let Err(e) = self.get_authors(size).await {
            warn!(window = %size, error = ?e, "preload of author window failed");
        }
    }

    /// Replace the stored dataset for `size` wholesale. Cached data is
    /// kept if the fetch fails.
    pub async fn force_refresh(&self, size: WindowSize) -> Result<Arc<Vec<EventRecord>>> {
        let mut slot = self.events[size.index()].lock().await;
        match self.client.fetch_events(size.hours()).await {
            Ok(events) => {
                debug!(window = %size, count = events.len(), "event window force-refreshed");
                let set = Arc::new(events);
                *slot = Some(Arc::clone(&set));
                Ok(set)
            }
            Err(e) => {
                counter!("feed_fetch_errors_total").increment(1);
                Err(e)
            }
        }
    }
}
