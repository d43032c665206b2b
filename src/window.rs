//! # Window Size
//! The fixed set of time windows the backend is queried for.
//!
//! Only 1/7/30 days exist; arbitrary windows are unrepresentable by
//! construction, which is what lets the cache hold at most three entries
//! per kind for the lifetime of the session.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One of the three supported time windows for the event feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WindowSize {
    /// Last 24 hours.
    Day,
    /// Last 7 days.
    Week,
    /// Last 30 days.
    Month,
}

impl WindowSize {
    /// All windows, in preload order (smallest first so the default view
    /// becomes usable soonest).
    pub const ALL: [WindowSize; 3] = [WindowSize::Day, WindowSize::Week, WindowSize::Month];

    /// Span in days.
    pub fn days(self) -> u32 {
        match self {
            WindowSize::Day => 1,
            WindowSize::Week => 7,
            WindowSize::Month => 30,
        }
    }

    /// Span in hours, the unit the backend endpoints consume.
    pub fn hours(self) -> u32 {
        self.days() * 24
    }

    /// Stable index into per-window storage arrays.
    pub(crate) fn index(self) -> usize {
        match self {
            WindowSize::Day => 0,
            WindowSize::Week => 1,
            WindowSize::Month => 2,
        }
    }
}

impl fmt::Display for WindowSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            WindowSize::Day => "day",
            WindowSize::Week => "week",
            WindowSize::Month => "month",
        };
        f.write_str(s)
    }
}

impl FromStr for WindowSize {
    type Err = anyhow::Error;

    /// Accepts the symbolic names and the day counts used by the backend.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "day" | "1" | "1d" => Ok(WindowSize::Day),
            "week" | "7" | "7d" => Ok(WindowSize::Week),
            "month" | "30" | "30d" => Ok(WindowSize::Month),
            other => Err(anyhow::anyhow!("unknown window size: {other:?}")),
        }
    }
}
