//! # Feed Client
//! The two backend operations the pipeline depends on, behind an
//! object-safe trait so tests can swap in counting/stalling fakes.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;

use crate::record::{EventRecord, RawFeatureCollection};

/// Backend feed access. One implementation talks HTTP; tests provide
/// in-memory fakes.
#[async_trait]
pub trait FeedClient: Send + Sync {
    /// Fetch all geolocated events for the last `hours` hours.
    async fn fetch_events(&self, hours: u32) -> Result<Vec<EventRecord>>;

    /// Fetch the distinct author names seen in the last `hours` hours.
    async fn fetch_authors(&self, hours: u32) -> Result<Vec<String>>;
}

#[derive(Debug, Deserialize)]
struct AuthorsResponse {
    #[serde(default)]
    authors: Vec<String>,
}

/// `reqwest`-backed client for the production backend.
pub struct HttpFeedClient {
    http: reqwest::Client,
    base_url: String,
    country: Option<String>,
    neutral_importance: f64,
}

impl HttpFeedClient {
    pub fn new(base_url: impl Into<String>, country: Option<String>, neutral_importance: f64) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            country,
            neutral_importance,
        }
    }
}

#[async_trait]
impl FeedClient for HttpFeedClient {
    async fn fetch_events(&self, hours: u32) -> Result<Vec<EventRecord>> {
        let url = format!("{}/tweets.geojson", self.base_url);
        let mut query: Vec<(&str, String)> = vec![("hours", hours.to_string())];
        if let Some(country) = &self.country {
            query.push(("country", country.clone()));
        }
        let collection: RawFeatureCollection = self
            .http
            .get(&url)
            .query(&query)
            .send()
            .await
            .with_context(|| format!("requesting {url}"))?
            .error_for_status()
            .context("event feed returned an error status")?
            .json()
            .await
            .context("decoding event feed body")?;
        Ok(collection.into_records(self.neutral_importance))
    }

    async fn fetch_authors(&self, hours: u32) -> Result<Vec<String>> {
        let url = format!("{}/authors", self.base_url);
        let resp: AuthorsResponse = self
            .http
            .get(&url)
            .query(&[("hours", hours.to_string())])
            .send()
            .await
            .with_context(|| format!("requesting {url}"))?
            .error_for_status()
            .context("authors endpoint returned an error status")?
            .json()
            .await
            .context("decoding authors body")?;
        Ok(resp.authors)
    }
}
