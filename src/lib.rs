// src/lib.rs
// Public library surface for integration tests (and potential reuse).

pub mod cache;
pub mod config;
pub mod controller;
pub mod debounce;
pub mod feed;
pub mod project;
pub mod record;
pub mod registry;
pub mod sink;
pub mod window;

// ---- Re-exports for stable public API ----
pub use crate::cache::WindowCache;
pub use crate::config::ObserverConfig;
pub use crate::controller::{ObserverController, SinkSet, ViewStatus};
pub use crate::debounce::Debouncer;
pub use crate::feed::{FeedClient, HttpFeedClient};
pub use crate::project::project;
pub use crate::record::{EventRecord, Typology};
pub use crate::registry::SourceRegistry;
pub use crate::sink::{LogSink, ViewSink};
pub use crate::window::WindowSize;
