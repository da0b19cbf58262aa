//! Data adapter contract
//!
//! The pager reads everything it serves through a [`DataAdapter`]: the suite
//! catalog, the global before/after element lists and the reporter URL. The
//! adapter is owned by the embedding application and only read from the
//! request path.

use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::Value;
use std::collections::HashMap;

use crate::error::{Error, Result};

/// Key of the full suite catalog
pub const LIBRARY_KEY: &str = "tests/library";
/// Key of the element list prepended to every suite
pub const BEFORE_ALL_KEY: &str = "tests/before-all";
/// Key of the element list appended to every suite
pub const AFTER_ALL_KEY: &str = "tests/after-all";
/// Key of the reporter base URL
pub const REPORTER_URL_KEY: &str = "reporter-url";

/// Asynchronous key lookup
#[async_trait]
pub trait DataAdapter: Send + Sync {
    async fn get(&self, key: &str) -> Result<Value>;
}

/// Adapter holding values injected directly at configuration time
#[derive(Debug, Default)]
pub struct MemoryAdapter {
    values: RwLock<HashMap<String, Value>>,
}

impl MemoryAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, key: impl Into<String>, value: Value) {
        self.values.write().insert(key.into(), value);
    }

    pub fn with_library(self, library: Value) -> Self {
        self.set(LIBRARY_KEY, library);
        self
    }

    pub fn with_before_all(self, elements: Value) -> Self {
        self.set(BEFORE_ALL_KEY, elements);
        self
    }

    pub fn with_after_all(self, elements: Value) -> Self {
        self.set(AFTER_ALL_KEY, elements);
        self
    }

    pub fn with_reporter_url(self, url: impl Into<String>) -> Self {
        self.set(REPORTER_URL_KEY, Value::String(url.into()));
        self
    }
}

#[async_trait]
impl DataAdapter for MemoryAdapter {
    async fn get(&self, key: &str) -> Result<Value> {
        self.values
            .read()
            .get(key)
            .cloned()
            .ok_or_else(|| Error::adapter(key, "no value configured"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_memory_adapter_lookup() {
        let adapter = MemoryAdapter::new()
            .with_library(json!([{"smoke": ["a.js"]}]))
            .with_reporter_url("http://reporter.local/report");

        assert_eq!(
            adapter.get(REPORTER_URL_KEY).await.unwrap(),
            json!("http://reporter.local/report")
        );
        assert_eq!(
            adapter.get(LIBRARY_KEY).await.unwrap(),
            json!([{"smoke": ["a.js"]}])
        );
    }

    #[tokio::test]
    async fn test_memory_adapter_missing_key() {
        let adapter = MemoryAdapter::new();
        let err = adapter.get(BEFORE_ALL_KEY).await.unwrap_err();
        assert!(matches!(err, Error::AdapterLookup { ref key, .. } if key == BEFORE_ALL_KEY));
    }
}
