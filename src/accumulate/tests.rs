//! Tests for accumulation module

use super::*;
use crate::error::Error;
use crate::test_support::{page, Item, ScriptedSource};
use pretty_assertions::assert_eq;
use serde_json::json;

fn options(key: &str) -> AccumulateOptionsBuilder<Item> {
    AccumulateOptions::builder()
        .path("streams")
        .items_key(key)
        .factory(Item::from_json)
}

fn ids(items: &[Item]) -> Vec<u64> {
    items.iter().map(|item| item.id).collect()
}

// ============================================================================
// Options Tests
// ============================================================================

#[test]
fn test_options_require_items_key() {
    let result = AccumulateOptions::<Item>::builder()
        .path("streams")
        .factory(Item::from_json)
        .build();
    assert!(matches!(result, Err(Error::InvalidArgument { name }) if name == "items_key"));
}

#[test]
fn test_options_require_path() {
    let result = AccumulateOptions::<Item>::builder()
        .items_key("streams")
        .factory(Item::from_json)
        .build();
    assert!(matches!(result, Err(Error::InvalidArgument { name }) if name == "path"));

    let result = options("streams").path("").build();
    assert!(matches!(result, Err(Error::InvalidArgument { name }) if name == "path"));
}

#[test]
fn test_options_require_factory() {
    let result = AccumulateOptions::<Item>::builder()
        .path("streams")
        .items_key("streams")
        .build();
    assert!(matches!(result, Err(Error::InvalidArgument { name }) if name == "factory"));
}

#[test]
fn test_page_size_respects_server_cap() {
    let opts = options("streams").build().unwrap();
    assert_eq!(opts.page_size(100), 100);
    assert_eq!(opts.page_size(25), 25);

    let opts = options("streams").limit(10).build().unwrap();
    assert_eq!(opts.page_size(100), 10);

    let opts = options("streams").limit(500).build().unwrap();
    assert_eq!(opts.page_size(100), 100);
}

#[test]
fn test_accumulation_state() {
    let mut state = AccumulationState::new();
    assert!(state.admit(1));
    assert!(state.admit(2));
    assert!(!state.admit(1));
    assert_eq!(state.count(), 2);
    assert!(state.is_full(Some(2)));
    assert!(!state.is_full(Some(3)));
    assert!(!state.is_full(None));
}

// ============================================================================
// Materialized Mode
// ============================================================================

#[tokio::test]
async fn test_collects_all_pages() {
    let source = ScriptedSource::new(vec![
        page("streams", 0..100, Some(100), Some(150)),
        page("streams", 100..150, Some(200), Some(150)),
    ]);

    let items = Accumulator::new(&source)
        .collect(options("streams").build().unwrap())
        .await
        .unwrap();

    assert_eq!(items.len(), 150);
    assert_eq!(ids(&items), (0..150).collect::<Vec<_>>());
    assert_eq!(source.request_count(), 2);
}

#[tokio::test]
async fn test_limit_stops_mid_page() {
    let source = ScriptedSource::new(vec![
        page("streams", 0..100, Some(100), None),
        page("streams", 100..200, Some(200), None),
    ]);

    let items = Accumulator::new(&source)
        .collect(options("streams").limit(10).build().unwrap())
        .await
        .unwrap();

    assert_eq!(ids(&items), (0..10).collect::<Vec<_>>());
    assert_eq!(source.request_count(), 1);
    assert_eq!(source.paths(), vec!["streams?limit=10&offset=0".to_string()]);
}

#[tokio::test]
async fn test_limit_spanning_pages() {
    let source = ScriptedSource::new(vec![
        page("streams", 0..25, Some(25), None),
        page("streams", 25..50, Some(50), None),
        page("streams", 50..75, Some(75), None),
    ])
    .with_max_page_size(25);

    let items = Accumulator::new(&source)
        .collect(options("streams").limit(30).build().unwrap())
        .await
        .unwrap();

    assert_eq!(items.len(), 30);
    assert_eq!(source.request_count(), 2);
    assert_eq!(source.paths()[0], "streams?limit=25&offset=0");
}

#[tokio::test]
async fn test_deduplicates_across_pages() {
    // The result set shifted between requests: 3 and 4 appear twice
    let source = ScriptedSource::new(vec![
        page("streams", 0..5, Some(5), None),
        page("streams", 3..8, Some(10), None),
        page("streams", Vec::<u64>::new(), None, None),
    ])
    .with_max_page_size(5);

    let items = Accumulator::new(&source)
        .collect(options("streams").build().unwrap())
        .await
        .unwrap();

    assert_eq!(ids(&items), vec![0, 1, 2, 3, 4, 5, 6, 7]);
    assert_eq!(source.request_count(), 3);
}

#[tokio::test]
async fn test_duplicates_do_not_count_toward_limit() {
    let source = ScriptedSource::new(vec![
        page("streams", [1, 1, 2, 2, 3], Some(5), None),
        page("streams", [3, 4, 5, 6, 7], Some(10), None),
    ])
    .with_max_page_size(5);

    let items = Accumulator::new(&source)
        .collect(options("streams").limit(4).build().unwrap())
        .await
        .unwrap();

    assert_eq!(ids(&items), vec![1, 2, 3, 4]);
    assert_eq!(source.request_count(), 2);
}

#[tokio::test]
async fn test_empty_page_stops() {
    let source = ScriptedSource::new(vec![
        page("streams", 0..100, Some(100), None),
        page("streams", Vec::<u64>::new(), Some(200), None),
    ]);

    let items = Accumulator::new(&source)
        .collect(options("streams").build().unwrap())
        .await
        .unwrap();

    assert_eq!(items.len(), 100);
    assert_eq!(source.request_count(), 2);
}

#[tokio::test]
async fn test_short_page_stops() {
    let source = ScriptedSource::new(vec![page("streams", 0..40, Some(100), None)]);

    let items = Accumulator::new(&source)
        .collect(options("streams").build().unwrap())
        .await
        .unwrap();

    assert_eq!(items.len(), 40);
    assert_eq!(source.request_count(), 1);
}

#[tokio::test]
async fn test_zero_limit_makes_no_requests() {
    let source = ScriptedSource::new(vec![]);

    let items = Accumulator::new(&source)
        .collect(options("streams").limit(0).build().unwrap())
        .await
        .unwrap();

    assert!(items.is_empty());
    assert_eq!(source.request_count(), 0);
}

#[tokio::test]
async fn test_offset_and_params_are_sent() {
    let source = ScriptedSource::new(vec![page("streams", 0..3, None, None)]);

    Accumulator::new(&source)
        .collect(
            options("streams")
                .offset(200)
                .param("game", "Diablo III")
                .build()
                .unwrap(),
        )
        .await
        .unwrap();

    let requests = source.requests();
    assert_eq!(requests[0].0, "streams?limit=100&offset=200");
    assert_eq!(requests[0].1.get("game"), Some(&"Diablo III".to_string()));
}

#[tokio::test]
async fn test_sub_key_unwraps_items() {
    let source = ScriptedSource::new(vec![json!({
        "featured": [
            {"text": "a", "stream": {"_id": 7, "name": "seven"}},
            {"text": "b", "stream": {"_id": 8, "name": "eight"}}
        ],
        "_links": {}
    })]);

    let items = Accumulator::new(&source)
        .collect(options("featured").sub_key("stream").build().unwrap())
        .await
        .unwrap();

    assert_eq!(
        items,
        vec![
            Item {
                id: 7,
                name: "seven".to_string()
            },
            Item {
                id: 8,
                name: "eight".to_string()
            }
        ]
    );
}

#[tokio::test]
async fn test_missing_items_key_is_an_error() {
    let source = ScriptedSource::new(vec![json!({
        "streams": [],
        "_links": {"self": "https://api.test/kraken/streams?limit=100&offset=0"}
    })]);

    let result = Accumulator::new(&source)
        .collect(options("follows").build().unwrap())
        .await;

    match result {
        Err(Error::MissingItems { key, url }) => {
            assert_eq!(key, "follows");
            assert!(url.contains("offset=0"));
        }
        other => panic!("Expected MissingItems, got {other:?}"),
    }
}

#[tokio::test]
async fn test_missing_sub_key_is_an_error() {
    let source = ScriptedSource::new(vec![json!({"follows": [{"created_at": "x"}], "_links": {}})]);

    let result = Accumulator::new(&source)
        .collect(options("follows").sub_key("user").build().unwrap())
        .await;

    assert!(matches!(result, Err(Error::MissingItems { key, .. }) if key == "user"));
}

#[tokio::test]
async fn test_factory_error_propagates() {
    let source = ScriptedSource::new(vec![json!({"streams": [{"_id": "nope"}], "_links": {}})]);

    let result = Accumulator::new(&source)
        .collect(options("streams").build().unwrap())
        .await;

    assert!(matches!(result, Err(Error::JsonParse(_))));
}

#[tokio::test]
async fn test_embedded_503_returns_partial_result() {
    let source = ScriptedSource::new(vec![
        page("streams", 0..100, Some(100), None),
        json!({"error": "Service Unavailable", "status": 503}),
    ]);

    let items = Accumulator::new(&source)
        .collect(options("streams").build().unwrap())
        .await
        .unwrap();

    assert_eq!(items.len(), 100);
    assert_eq!(source.request_count(), 2);
}

#[tokio::test]
async fn test_idempotent_over_unchanged_data() {
    let pages = || {
        vec![
            page("streams", 0..100, Some(100), Some(120)),
            page("streams", 100..120, Some(200), Some(120)),
        ]
    };

    let first = Accumulator::new(&ScriptedSource::new(pages()))
        .collect(options("streams").build().unwrap())
        .await
        .unwrap();
    let second = Accumulator::new(&ScriptedSource::new(pages()))
        .collect(options("streams").build().unwrap())
        .await
        .unwrap();

    assert_eq!(first, second);
}

// ============================================================================
// Streaming Mode
// ============================================================================

#[tokio::test]
async fn test_for_each_streams_distinct_items() {
    let source = ScriptedSource::new(vec![
        page("streams", [1, 2, 2, 3, 4], Some(5), None),
        page("streams", [4, 5], None, None),
    ])
    .with_max_page_size(5);

    let mut seen = Vec::new();
    Accumulator::new(&source)
        .for_each(options("streams").build().unwrap(), |item| {
            seen.push(item.id);
            Ok(())
        })
        .await
        .unwrap();

    assert_eq!(seen, vec![1, 2, 3, 4, 5]);
}

#[tokio::test]
async fn test_for_each_respects_limit() {
    let source = ScriptedSource::new(vec![page("streams", 0..100, Some(100), None)]);

    let mut count = 0;
    Accumulator::new(&source)
        .for_each(options("streams").limit(3).build().unwrap(), |_| {
            count += 1;
            Ok(())
        })
        .await
        .unwrap();

    assert_eq!(count, 3);
    assert_eq!(source.request_count(), 1);
}

#[tokio::test]
async fn test_for_each_callback_error_aborts() {
    let source = ScriptedSource::new(vec![
        page("streams", 0..100, Some(100), None),
        page("streams", 100..200, Some(200), None),
    ]);

    let mut count = 0;
    let result = Accumulator::new(&source)
        .for_each(options("streams").build().unwrap(), |item| {
            count += 1;
            if item.id == 4 {
                return Err(Error::Other("stop here".to_string()));
            }
            Ok(())
        })
        .await;

    assert!(matches!(result, Err(Error::Other(msg)) if msg == "stop here"));
    assert_eq!(count, 5);
    assert_eq!(source.request_count(), 1);
}
