//! # Observer Controller
//! Single owner of the pipeline's mutable state: current window, query,
//! source registry, sinks, and the request-generation counter.
//!
//! All state lives behind one lock held only between suspension points;
//! backend fetches are the only awaits. Every refresh takes a generation
//! ticket before suspending and re-checks it at the apply site, so a slow
//! response for a superseded window/filter combination is discarded
//! instead of overwriting a newer view.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, Weak};
use std::time::Duration;

use anyhow::Result;
use metrics::{counter, describe_counter};
use once_cell::sync::OnceCell;
use tracing::{debug, info, warn};

use crate::cache::WindowCache;
use crate::debounce::Debouncer;
use crate::project::{project, sort_newest_first};
use crate::record::EventRecord;
use crate::registry::SourceRegistry;
use crate::sink::ViewSink;
use crate::window::WindowSize;

fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("view_refresh_total", "View refreshes started.");
        describe_counter!(
            "view_stale_drops_total",
            "Refresh results discarded because a newer request superseded them."
        );
    });
}

/// What a refresh ended up showing; handed back for count labels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewStatus {
    pub window: WindowSize,
    /// Events actually rendered after filtering.
    pub visible: usize,
    /// Events in the raw window dataset.
    pub total: usize,
    /// Label text for the sources filter button.
    pub sources: String,
}

#[derive(Debug)]
struct ViewState {
    window: WindowSize,
    /// Query applied to projections (expensive tier).
    query: String,
    /// Query as last typed (cosmetic tier; shown immediately, applied later).
    pending_query: String,
    registry: SourceRegistry,
}

/// Rendering targets. Either may be absent (startup races make the DOM
/// target appear late in the original); an absent sink is a no-op.
#[derive(Default)]
pub struct SinkSet {
    pub map: Option<Arc<dyn ViewSink>>,
    pub feed: Option<Arc<dyn ViewSink>>,
}

pub struct ObserverController {
    cache: Arc<WindowCache>,
    state: Mutex<ViewState>,
    generation: AtomicU64,
    sinks: SinkSet,
    query_debounce: Debouncer<String>,
}

impl ObserverController {
    /// Construct the controller. `debounce` is the quiet interval for the
    /// free-text query (300 ms in the shipped config).
    pub fn new(cache: Arc<WindowCache>, sinks: SinkSet, debounce: Duration) -> Arc<Self> {
        ensure_metrics_described();
        Arc::new_cyclic(|weak: &Weak<Self>| {
            let weak = weak.clone();
            let query_debounce = Debouncer::new(debounce, move |query: String| {
                let weak = weak.clone();
                async move {
                    // Controller may be gone at fire time; that is teardown,
                    // not an error.
                    if let Some(ctrl) = weak.upgrade() {
                        ctrl.apply_query(query).await;
                    }
                }
            });
            Self {
                cache,
                state: Mutex::new(ViewState {
                    window: WindowSize::Day,
                    query: String::new(),
                    pending_query: String::new(),
                    registry: SourceRegistry::new(),
                }),
                generation: AtomicU64::new(0),
                sinks,
                query_debounce,
            }
        })
    }

    /// Warm every window at startup; failures are logged and retried
    /// lazily on demand.
    pub async fn preload(&self) {
        self.cache.preload().await;
    }

    /// Switch the active window: recompute the author registry from the
    /// cache (fetching if absent), drop exclusions absent from the new
    /// window, and refresh the view. An authors fetch failure degrades to
    /// an empty registry and a visible empty view rather than freezing on
    /// the previous window's data.
    pub async fn set_window(&self, size: WindowSize) -> Result<Option<ViewStatus>> {
        {
            let mut state = self.state.lock().expect("view state mutex poisoned");
            state.window = size;
        }
        let authors = match self.cache.get_authors(size).await {
            Ok(list) => (*list).clone(),
            Err(e) => {
                warn!(window = %size, error = ?e, "authors fetch failed, showing empty source list");
                Vec::new()
            }
        };
        {
            let mut state = self.state.lock().expect("view state mutex poisoned");
            state.registry.set_authors(authors);
            info!(window = %size, sources = %state.registry.summary(), "window selected");
        }
        self.refresh().await
    }

    /// Flip exclusion for `author` and re-project immediately (filter
    /// toggles are not debounced). Returns whether the author is now
    /// excluded.
    pub async fn toggle_author(&self, author: &str) -> Result<bool> {
        let (now_excluded, summary) = {
            let mut state = self.state.lock().expect("view state mutex poisoned");
            let flipped = state.registry.toggle(author);
            (flipped, state.registry.summary())
        };
        info!(author, excluded = now_excluded, %summary, "source toggled");
        self.refresh().await?;
        Ok(now_excluded)
    }

    /// Free-text input. The text itself lands in state synchronously
    /// (cosmetic tier, never delayed); the projection refresh is debounced
    /// (expensive tier, always delayed).
    pub fn query_input(&self, text: impl Into<String>) {
        let text = text.into();
        {
            let mut state = self.state.lock().expect("view state mutex poisoned");
            state.pending_query = text.clone();
        }
        self.query_debounce.call(text);
    }

    /// The query as last typed, before the debounce settles.
    pub fn pending_query(&self) -> String {
        self.state
            .lock()
            .expect("view state mutex poisoned")
            .pending_query
            .clone()
    }

    /// Cancel any debounced work; call on teardown so no timer task
    /// outlives the UI.
    pub fn cancel_pending(&self) {
        self.query_debounce.cancel();
    }

    async fn apply_query(&self, query: String) {
        {
            let mut state = self.state.lock().expect("view state mutex poisoned");
            state.query = query;
        }
        if let Err(e) = self.refresh().await {
            warn!(error = ?e, "debounced query refresh failed");
        }
    }

    /// Recompute the projection for the current state and hand it to the
    /// sinks. Returns `Ok(None)` when the result was discarded because a
    /// newer refresh superseded this one while its fetch was in flight.
    pub async fn refresh(&self) -> Result<Option<ViewStatus>> {
        let ticket = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        counter!("view_refresh_total").increment(1);

        let (window, query, excluded, all_excluded) = {
            let state = self.state.lock().expect("view state mutex poisoned");
            (
                state.window,
                state.query.clone(),
                state.registry.excluded().clone(),
                state.registry.all_excluded(),
            )
        };

        let events = match self.cache.get_events(window).await {
            Ok(events) => events,
            Err(e) => {
                // Visible empty state beats silently freezing on stale data.
                if self.is_current(ticket) {
                    self.apply(&[]);
                }
                return Err(e);
            }
        };

        if !self.is_current(ticket) {
            counter!("view_stale_drops_total").increment(1);
            debug!(window = %window, ticket, "discarding superseded refresh");
            return Ok(None);
        }

        let subset: Vec<EventRecord> = if all_excluded {
            // Exclusion of everything means display nothing, never show-all.
            Vec::new()
        } else {
            project(&events, &excluded, &query)
                .into_iter()
                .cloned()
                .collect()
        };

        self.apply(&subset);

        let sources = {
            let state = self.state.lock().expect("view state mutex poisoned");
            state.registry.summary()
        };
        let status = ViewStatus {
            window,
            visible: subset.len(),
            total: events.len(),
            sources,
        };
        info!(window = %window, visible = status.visible, total = status.total, "view refreshed");
        Ok(Some(status))
    }

    fn is_current(&self, ticket: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == ticket
    }

    // No awaits between the generation check and this point.
    fn apply(&self, subset: &[EventRecord]) {
        if let Some(map) = &self.sinks.map {
            map.replace(subset);
        }
        if let Some(feed) = &self.sinks.feed {
            let mut newest_first: Vec<&EventRecord> = subset.iter().collect();
            sort_newest_first(&mut newest_first);
            let ordered: Vec<EventRecord> = newest_first.into_iter().cloned().collect();
            feed.replace(&ordered);
        }
    }
}
