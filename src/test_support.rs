//! Shared fixtures for unit tests

use crate::accumulate::Identity;
use crate::error::{Error, Result};
use crate::pagination::PageSource;
use crate::types::{JsonValue, QueryParams};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use std::collections::VecDeque;
use std::sync::Mutex;

pub(crate) const BASE: &str = "https://api.test/kraken/";

/// Page source replaying canned responses in order
pub(crate) struct ScriptedSource {
    responses: Mutex<VecDeque<Result<JsonValue>>>,
    requests: Mutex<Vec<(String, QueryParams)>>,
    max_page_size: u32,
    max_pages: Option<u32>,
}

impl ScriptedSource {
    pub(crate) fn new(pages: Vec<JsonValue>) -> Self {
        Self {
            responses: Mutex::new(pages.into_iter().map(Ok).collect()),
            requests: Mutex::new(Vec::new()),
            max_page_size: 100,
            max_pages: None,
        }
    }

    pub(crate) fn with_max_page_size(mut self, size: u32) -> Self {
        self.max_page_size = size;
        self
    }

    pub(crate) fn with_max_pages(mut self, pages: u32) -> Self {
        self.max_pages = Some(pages);
        self
    }

    pub(crate) fn then_error(self, error: Error) -> Self {
        self.responses.lock().unwrap().push_back(Err(error));
        self
    }

    pub(crate) fn requests(&self) -> Vec<(String, QueryParams)> {
        self.requests.lock().unwrap().clone()
    }

    pub(crate) fn paths(&self) -> Vec<String> {
        self.requests().into_iter().map(|(path, _)| path).collect()
    }

    pub(crate) fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl PageSource for ScriptedSource {
    async fn fetch(&self, path: &str, query: &QueryParams) -> Result<JsonValue> {
        self.requests
            .lock()
            .unwrap()
            .push((path.to_string(), query.clone()));
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(Error::Other(format!("unexpected request: {path}"))))
    }

    fn max_page_size(&self) -> u32 {
        self.max_page_size
    }

    fn max_pages(&self) -> Option<u32> {
        self.max_pages
    }
}

/// Page of `{"_id": n, "name": "item-n"}` objects under `key`
pub(crate) fn page(
    key: &str,
    ids: impl IntoIterator<Item = u64>,
    next_offset: Option<u64>,
    total: Option<u64>,
) -> JsonValue {
    let items: Vec<JsonValue> = ids
        .into_iter()
        .map(|id| json!({"_id": id, "name": format!("item-{id}")}))
        .collect();

    let mut body = json!({ key: items, "_links": {} });
    if let Some(offset) = next_offset {
        body["_links"]["next"] = json!(format!("{BASE}streams?limit=100&offset={offset}"));
    }
    if let Some(total) = total {
        body["_total"] = json!(total);
    }
    body
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub(crate) struct Item {
    #[serde(rename = "_id")]
    pub(crate) id: u64,
    pub(crate) name: String,
}

impl Item {
    pub(crate) fn from_json(json: &JsonValue) -> Result<Self> {
        Ok(serde_json::from_value(json.clone())?)
    }
}

impl Identity for Item {
    type Key = u64;

    fn identity(&self) -> u64 {
        self.id
    }
}
