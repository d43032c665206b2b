//! # Filter Projector
//! Pure projection of a cached dataset through the active filters.
//! Recomputed on every filter-affecting change; never cached.

use std::collections::HashSet;

use crate::record::EventRecord;

/// Return the subset of `events` passing both filters: the author is not
/// excluded, and the body contains `query` as a case-insensitive substring
/// (an empty query matches everything). Pure function of its inputs.
pub fn project<'a>(
    events: &'a [EventRecord],
    excluded: &HashSet<String>,
    query: &str,
) -> Vec<&'a EventRecord> {
    let needle = query.trim().to_lowercase();
    events
        .iter()
        .filter(|e| !excluded.contains(&e.author))
        .filter(|e| needle.is_empty() || e.body.to_lowercase().contains(&needle))
        .collect()
}

/// Sort a projection newest-first, the order the feed panel renders in.
pub fn sort_newest_first(subset: &mut [&EventRecord]) {
    subset.sort_by(|a, b| b.published_at.cmp(&a.published_at));
}

/// Sort a projection by descending importance; used when several events
/// collide at one location and only the most important is surfaced.
pub fn sort_by_importance(subset: &mut [&EventRecord]) {
    subset.sort_by(|a, b| {
        b.importance
            .partial_cmp(&a.importance)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Typology;
    use chrono::{DateTime, TimeZone, Utc};

    fn rec(author: &str, body: &str, ts: DateTime<Utc>, importance: f64) -> EventRecord {
        EventRecord {
            id: format!("{author}-{ts}"),
            published_at: ts,
            author: author.into(),
            body: body.into(),
            typology: Typology::Other,
            importance,
            coordinates: None,
            url: None,
            images: Vec::new(),
        }
    }

    fn at(h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, 20, h, 0, 0).unwrap()
    }

    fn sample() -> Vec<EventRecord> {
        vec![
            rec("alice", "Flood update from the river", at(1), 2.0),
            rec("alice", "quiet day", at(2), 1.0),
            rec("bob", "flood warning", at(3), 3.0),
            rec("bob", "road closed", at(4), 1.0),
            rec("bob", "bridge reopened", at(5), 1.0),
        ]
    }

    #[test]
    fn no_filters_is_identity() {
        let events = sample();
        let out = project(&events, &HashSet::new(), "");
        assert_eq!(out.len(), events.len());
    }

    #[test]
    fn excluding_all_authors_yields_empty_regardless_of_query() {
        let events = sample();
        let all: HashSet<String> = ["alice".to_string(), "bob".to_string()].into();
        assert!(project(&events, &all, "").is_empty());
        assert!(project(&events, &all, "flood").is_empty());
    }

    #[test]
    fn author_and_query_filters_combine() {
        let events = sample();
        let excluded: HashSet<String> = ["bob".to_string()].into();
        let out = project(&events, &excluded, "FLOOD");
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].author, "alice");
        assert!(out[0].body.to_lowercase().contains("flood"));
    }

    #[test]
    fn query_match_is_case_insensitive_substring() {
        let events = sample();
        let out = project(&events, &HashSet::new(), "BrIdGe");
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].body, "bridge reopened");
    }

    #[test]
    fn repeated_calls_have_no_side_effects() {
        let events = sample();
        let excluded: HashSet<String> = ["bob".to_string()].into();
        let a = project(&events, &excluded, "flood");
        let b = project(&events, &excluded, "flood");
        assert_eq!(a, b);
        assert_eq!(events.len(), 5);
    }

    #[test]
    fn newest_first_ordering() {
        let events = sample();
        let mut out = project(&events, &HashSet::new(), "");
        sort_newest_first(&mut out);
        assert_eq!(out[0].body, "bridge reopened");
        assert_eq!(out.last().unwrap().body, "Flood update from the river");
    }

    #[test]
    fn importance_ordering_puts_heaviest_first() {
        let events = sample();
        let mut out = project(&events, &HashSet::new(), "");
        sort_by_importance(&mut out);
        assert_eq!(out[0].body, "flood warning");
    }
}
