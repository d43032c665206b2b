//! # View Sink
//! Write-only rendering targets. The controller hands each sink a fully
//! filtered subset; a sink never filters, it only replaces what it shows.

use tracing::info;

use crate::record::EventRecord;

/// A rendering target (map layer, feed panel, …). One operation: replace
/// the rendered collection wholesale with the given subset.
pub trait ViewSink: Send + Sync {
    fn replace(&self, events: &[EventRecord]);
}

/// Sink for headless runs: logs what a UI would render.
pub struct LogSink {
    label: &'static str,
}

impl LogSink {
    pub fn new(label: &'static str) -> Self {
        Self { label }
    }
}

impl ViewSink for LogSink {
    fn replace(&self, events: &[EventRecord]) {
        info!(
            target: "view",
            sink = self.label,
            count = events.len(),
            latest = ?events.first().map(|e| e.published_at.to_rfc3339()),
            "view replaced"
        );
    }
}
