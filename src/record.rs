//! # Event Record
//! Validated event shape plus the one place where the backend's loosely
//! typed GeoJSON is turned into it.
//!
//! Everything downstream of the cache works against `EventRecord`; optional
//! and malformed fields are resolved here with safe defaults so that a single
//! bad record never blocks the rest of a batch.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

/// Category tag carried by each event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Typology {
    /// Military event (`"MIL"` on the wire).
    Military,
    /// Anything else.
    Other,
}

impl Typology {
    fn from_wire(s: Option<&str>) -> Self {
        match s {
            Some("MIL") => Typology::Military,
            _ => Typology::Other,
        }
    }
}

/// One geolocated event, fully validated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    pub id: String,
    pub published_at: DateTime<Utc>,
    pub author: String,
    pub body: String,
    pub typology: Typology,
    /// Importance score; missing or malformed values collapse to the
    /// configured neutral value at parse time, never at read sites.
    pub importance: f64,
    /// `(longitude, latitude)` when the event carries a location.
    pub coordinates: Option<(f64, f64)>,
    pub url: Option<String>,
    pub images: Vec<String>,
}

/* ----------------------------
Raw wire shapes (private)
---------------------------- */

#[derive(Debug, Deserialize)]
pub(crate) struct RawFeatureCollection {
    #[serde(default)]
    pub(crate) features: Vec<RawFeature>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawFeature {
    #[serde(default)]
    geometry: Option<RawGeometry>,
    properties: RawProperties,
}

#[derive(Debug, Deserialize)]
struct RawGeometry {
    #[serde(default)]
    coordinates: Vec<f64>,
}

#[derive(Debug, Deserialize)]
struct RawProperties {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    date_published: Option<String>,
    #[serde(default)]
    author: Option<String>,
    #[serde(default)]
    body: Option<String>,
    #[serde(default)]
    typology: Option<String>,
    /// May be a number or a numeric string.
    #[serde(default)]
    importance: Option<Value>,
    #[serde(default)]
    url: Option<String>,
    /// May be a JSON array of URLs or a string holding a serialized array.
    #[serde(default)]
    images: Option<Value>,
}

/// Parse the image-list field. Idempotent: an already-parsed array passes
/// through unchanged; a string is decoded as a serialized array; anything
/// malformed degrades to an empty list.
pub fn parse_images(raw: Option<&Value>) -> Vec<String> {
    match raw {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|v| v.as_str().map(str::to_owned))
            .collect(),
        Some(Value::String(s)) => match serde_json::from_str::<Vec<String>>(s) {
            Ok(list) => list,
            Err(e) => {
                debug!(error = %e, "unparseable images field, dropping to empty list");
                Vec::new()
            }
        },
        _ => Vec::new(),
    }
}

/// Coerce the importance field (number or numeric string) to `f64`,
/// falling back to `neutral` when absent or malformed.
pub fn parse_importance(raw: Option<&Value>, neutral: f64) -> f64 {
    match raw {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(neutral),
        Some(Value::String(s)) => s.trim().parse::<f64>().unwrap_or(neutral),
        _ => neutral,
    }
}

fn parse_published_at(raw: Option<&str>) -> DateTime<Utc> {
    raw.and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|| DateTime::<Utc>::UNIX_EPOCH)
}

impl RawFeature {
    /// Convert one raw feature into a validated record. Infallible by
    /// design: every field recovers locally.
    pub(crate) fn into_record(self, neutral_importance: f64) -> EventRecord {
        let coordinates = self.geometry.and_then(|g| match g.coordinates.as_slice() {
            [lon, lat, ..] => Some((*lon, *lat)),
            _ => None,
        });
        let p = self.properties;
        EventRecord {
            id: p.id.unwrap_or_default(),
            published_at: parse_published_at(p.date_published.as_deref()),
            author: p.author.unwrap_or_default(),
            body: p.body.unwrap_or_default(),
            typology: Typology::from_wire(p.typology.as_deref()),
            importance: parse_importance(p.importance.as_ref(), neutral_importance),
            coordinates,
            url: p.url,
            images: parse_images(p.images.as_ref()),
        }
    }
}

impl RawFeatureCollection {
    pub(crate) fn into_records(self, neutral_importance: f64) -> Vec<EventRecord> {
        self.features
            .into_iter()
            .map(|f| f.into_record(neutral_importance))
            .collect()
    }
}
