//! Integration tests using mock HTTP server
//!
//! Tests the full end-to-end flow: client config → HTTP requests → pagination →
//! typed objects

use serde_json::{json, Value};
use std::time::{Duration, Instant};
use twitch_rest::accumulate::AccumulateOptions;
use twitch_rest::http::RateLimiterConfig;
use twitch_rest::pagination::{PageRequest, StopReason};
use twitch_rest::{map_status, ClientConfig, Connection, Error, Identity, Result, Twitch};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Debug)]
struct Item {
    id: u64,
    name: String,
}

impl Item {
    fn from_json(json: &Value) -> Result<Self> {
        let id = json["_id"]
            .as_u64()
            .ok_or_else(|| Error::invalid_argument("_id"))?;
        let name = json["name"].as_str().unwrap_or_default().to_string();
        Ok(Self { id, name })
    }
}

impl Identity for Item {
    type Key = u64;

    fn identity(&self) -> u64 {
        self.id
    }
}

twitch_rest::id_equality!(Item);

fn config_for(server: &MockServer) -> ClientConfig {
    ClientConfig::builder()
        .base_url(format!("{}/kraken/", server.uri()))
        .client_id("integration")
        .no_rate_limit()
        .build()
}

fn items(range: std::ops::Range<u64>) -> Vec<Value> {
    range
        .map(|id| json!({ "_id": id, "name": format!("item-{id}") }))
        .collect()
}

/// Two pages: 100 items then 50, linked through `_links.next`
async fn mount_two_pages(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/kraken/streams"))
        .and(query_param("offset", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "_total": 150,
            "_links": { "next": format!("{}/kraken/streams?limit=100&offset=100", server.uri()) },
            "streams": items(0..100)
        })))
        .expect(1)
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/kraken/streams"))
        .and(query_param("offset", "100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "_total": 150,
            "_links": { "next": format!("{}/kraken/streams?limit=100&offset=200", server.uri()) },
            "streams": items(100..150)
        })))
        .expect(1)
        .mount(server)
        .await;
}

fn stream_options() -> AccumulateOptions<Item> {
    AccumulateOptions::builder()
        .path("streams")
        .items_key("streams")
        .factory(Item::from_json)
        .build()
        .unwrap()
}

// ============================================================================
// Accumulation
// ============================================================================

#[tokio::test]
async fn test_accumulate_everything_across_pages() {
    let server = MockServer::start().await;
    mount_two_pages(&server).await;

    let conn = Connection::new(config_for(&server)).unwrap();
    let collected = conn.accumulate(stream_options()).await.unwrap();

    assert_eq!(collected.len(), 150);
    assert_eq!(collected[0].name, "item-0");
    assert_eq!(collected[149].id, 149);
}

#[tokio::test]
async fn test_accumulate_limit_stops_after_first_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/kraken/streams"))
        .and(query_param("limit", "10"))
        .and(query_param("offset", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "_total": 150,
            "_links": { "next": format!("{}/kraken/streams?limit=10&offset=10", server.uri()) },
            "streams": items(0..10)
        })))
        .expect(1)
        .mount(&server)
        .await;

    let conn = Connection::new(config_for(&server)).unwrap();
    let mut options = stream_options();
    options.limit = Some(10);
    let collected = conn.accumulate(options).await.unwrap();

    let ids: Vec<_> = collected.iter().map(|item| item.id).collect();
    assert_eq!(ids, (0..10).collect::<Vec<_>>());
}

#[tokio::test]
async fn test_accumulate_each_streams_items_in_order() {
    let server = MockServer::start().await;
    mount_two_pages(&server).await;

    let conn = Connection::new(config_for(&server)).unwrap();
    let mut seen = Vec::new();
    conn.accumulate_each(stream_options(), |item: Item| {
        seen.push(item.id);
        Ok(())
    })
    .await
    .unwrap();

    assert_eq!(seen, (0..150).collect::<Vec<_>>());
}

// ============================================================================
// Pagination
// ============================================================================

#[tokio::test]
async fn test_paginate_stops_on_embedded_service_unavailable() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/kraken/streams"))
        .and(query_param("offset", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "_total": 300,
            "_links": { "next": format!("{}/kraken/streams?limit=100&offset=100", server.uri()) },
            "streams": items(0..100)
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/kraken/streams"))
        .and(query_param("offset", "100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "error": "Service Unavailable",
            "status": 503,
            "message": ""
        })))
        .expect(1)
        .mount(&server)
        .await;

    let conn = Connection::new(config_for(&server)).unwrap();
    let mut pages_seen = 0;
    let summary = conn
        .paginate(PageRequest::new("streams", 100), |_| {
            pages_seen += 1;
            Ok(true)
        })
        .await
        .unwrap();

    assert_eq!(pages_seen, 1);
    assert_eq!(summary.pages, 2);
    assert_eq!(summary.stop, StopReason::ServiceUnavailable);
}

#[tokio::test]
async fn test_paginate_sends_caller_params_on_every_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/kraken/streams"))
        .and(query_param("game", "Chess"))
        .and(query_param("offset", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "_total": 2,
            "_links": { "next": format!("{}/kraken/streams?limit=1&offset=1", server.uri()) },
            "streams": items(0..1)
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/kraken/streams"))
        .and(query_param("game", "Chess"))
        .and(query_param("offset", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "_total": 2,
            "_links": {},
            "streams": items(1..2)
        })))
        .expect(1)
        .mount(&server)
        .await;

    let conn = Connection::new(config_for(&server)).unwrap();
    let summary = conn
        .paginate_each(
            PageRequest::new("streams", 1).param("game", "Chess"),
            |_| Ok(()),
        )
        .await
        .unwrap();

    assert_eq!(summary.pages, 2);
    assert_eq!(summary.stop, StopReason::NoNextLink);
}

// ============================================================================
// Resources
// ============================================================================

#[tokio::test]
async fn test_missing_channel_is_none() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/kraken/channels/ghost"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": "Not Found",
            "status": 404,
            "message": "Channel 'ghost' does not exist"
        })))
        .mount(&server)
        .await;

    let twitch = Twitch::new(config_for(&server)).unwrap();
    assert!(twitch.channels().get("ghost").await.unwrap().is_none());
}

#[tokio::test]
async fn test_raw_get_with_status_mapping() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/kraken/users/a/follows/channels/foo"))
        .and(header("Client-ID", "integration"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": "Not Found",
            "status": 404,
            "message": "a is not following foo"
        })))
        .mount(&server)
        .await;

    let twitch = Twitch::new(config_for(&server)).unwrap();
    let conn = twitch.connection();
    let follows = map_status(404, false, async {
        conn.get("users/a/follows/channels/foo").await.map(|_| true)
    })
    .await
    .unwrap();

    assert!(!follows);
}

#[tokio::test]
async fn test_video_channel_fetched_lazily() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/kraken/videos/top"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "_links": {},
            "videos": [{
                "_id": "v1",
                "title": "Best of",
                "channel": { "name": "foo", "display_name": "Foo" }
            }]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/kraken/channels/foo"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "_id": 7,
            "name": "foo",
            "status": "bar"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let twitch = Twitch::new(config_for(&server)).unwrap();
    let mut videos = twitch.videos().top(None).await.unwrap();
    let video = &mut videos[0];

    assert_eq!(video.channel_name(), "foo");
    assert!(!video.is_channel_loaded());
    for _ in 0..3 {
        let channel = video.channel().await.unwrap();
        assert_eq!(channel.status.as_deref(), Some("bar"));
    }
    assert!(video.is_channel_loaded());
}

// ============================================================================
// Rate limiting
// ============================================================================

#[tokio::test]
async fn test_token_bucket_allows_burst_then_waits() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/kraken/teams"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "teams": [] })))
        .expect(3)
        .mount(&server)
        .await;

    let mut config = config_for(&server);
    config.rate_limit = Some(RateLimiterConfig::token_bucket(5, 2));
    let conn = Connection::new(config).unwrap();

    let start = Instant::now();
    for _ in 0..3 {
        conn.get("teams").await.unwrap();
    }

    assert!(start.elapsed() >= Duration::from_millis(150));
}
