//! HTTP-level tests for `HttpFeedClient` against an in-process axum mock
//! of the backend (bound to an ephemeral local port).
//!
//! Covered:
//! - GET /tweets.geojson: hours and country query parameters, GeoJSON
//!   decoding, defensive field recovery (serialized/malformed images,
//!   missing importance)
//! - GET /authors: list extraction
//! - non-2xx responses surface as errors

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use parking_lot::Mutex;
use serde_json::{json, Value};

use osint_observer::record::Typology;
use osint_observer::{FeedClient, HttpFeedClient};

type SeenQueries = Arc<Mutex<Vec<HashMap<String, String>>>>;

fn fixture_collection() -> Value {
    json!({
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "geometry": { "type": "Point", "coordinates": [30.52, 50.45] },
                "properties": {
                    "id": "t-1",
                    "date_published": "2026-08-20T12:30:00Z",
                    "author": "alice",
                    "body": "Flood update from the river",
                    "typology": "MIL",
                    "importance": 4,
                    "url": "https://example.org/t-1",
                    "images": "[\"a.jpg\",\"b.jpg\"]"
                }
            },
            {
                "type": "Feature",
                "geometry": { "type": "Point", "coordinates": [31.0, 49.9] },
                "properties": {
                    "id": "t-2",
                    "date_published": "2026-08-20T13:00:00Z",
                    "author": "bob",
                    "body": "road closed",
                    "images": "not json"
                }
            }
        ]
    })
}

async fn tweets(State(seen): State<SeenQueries>, Query(params): Query<HashMap<String, String>>) -> Json<Value> {
    seen.lock().push(params);
    Json(fixture_collection())
}

async fn authors(Query(_): Query<HashMap<String, String>>) -> Json<Value> {
    Json(json!({ "authors": ["alice", "bob"] }))
}

async fn serve_mock() -> (SocketAddr, SeenQueries) {
    let seen: SeenQueries = Arc::default();
    let app = Router::new()
        .route("/tweets.geojson", get(tweets))
        .route("/authors", get(authors))
        .with_state(seen.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (addr, seen)
}

#[tokio::test]
async fn events_decode_with_defensive_field_recovery() {
    let (addr, _seen) = serve_mock().await;
    let client = HttpFeedClient::new(format!("http://{addr}"), None, 1.0);

    let events = client.fetch_events(24).await.unwrap();
    assert_eq!(events.len(), 2);

    let alice = &events[0];
    assert_eq!(alice.author, "alice");
    assert_eq!(alice.typology, Typology::Military);
    assert_eq!(alice.importance, 4.0);
    assert_eq!(alice.coordinates, Some((30.52, 50.45)));
    assert_eq!(alice.images, vec!["a.jpg", "b.jpg"], "serialized list decoded");

    let bob = &events[1];
    assert_eq!(bob.typology, Typology::Other);
    assert_eq!(bob.importance, 1.0, "missing importance takes the neutral value");
    assert!(bob.images.is_empty(), "malformed images degrade to empty, not an error");
}

#[tokio::test]
async fn hours_and_country_are_forwarded() {
    let (addr, seen) = serve_mock().await;

    let client = HttpFeedClient::new(format!("http://{addr}/"), Some("ukraine".into()), 1.0);
    client.fetch_events(168).await.unwrap();

    let queries = seen.lock().clone();
    assert_eq!(queries.len(), 1);
    assert_eq!(queries[0].get("hours").map(String::as_str), Some("168"));
    assert_eq!(queries[0].get("country").map(String::as_str), Some("ukraine"));

    // Without a configured country the parameter is absent.
    let bare = HttpFeedClient::new(format!("http://{addr}"), None, 1.0);
    bare.fetch_events(24).await.unwrap();
    let queries = seen.lock().clone();
    assert!(!queries[1].contains_key("country"));
}

#[tokio::test]
async fn authors_endpoint_returns_the_list() {
    let (addr, _seen) = serve_mock().await;
    let client = HttpFeedClient::new(format!("http://{addr}"), None, 1.0);

    let authors = client.fetch_authors(24).await.unwrap();
    assert_eq!(authors, vec!["alice".to_string(), "bob".to_string()]);
}

#[tokio::test]
async fn error_status_surfaces_as_error() {
    let app = Router::new().route(
        "/tweets.geojson",
        get(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
    );
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let client = HttpFeedClient::new(format!("http://{addr}"), None, 1.0);
    assert!(client.fetch_events(24).await.is_err());
}
