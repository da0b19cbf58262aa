//! Data adapter backed by a JSON catalog file
//!
//! The file is re-read on every lookup so catalog edits apply without a
//! restart:
//!
//! ```json
//! {
//!   "library": [{ "smoke": ["header.css", "myRenderer"] }],
//!   "beforeAll": ["reset.css"],
//!   "afterAll": []
//! }
//! ```

use async_trait::async_trait;
use serde_json::Value;
use std::path::PathBuf;
use tracing::debug;

use suitepager_common::adapter::{AFTER_ALL_KEY, BEFORE_ALL_KEY, LIBRARY_KEY, REPORTER_URL_KEY};
use suitepager_common::{DataAdapter, Error, Result};

pub struct FileAdapter {
    catalog_path: PathBuf,
    reporter_url: String,
}

impl FileAdapter {
    pub fn new(catalog_path: impl Into<PathBuf>, reporter_url: impl Into<String>) -> Self {
        Self {
            catalog_path: catalog_path.into(),
            reporter_url: reporter_url.into(),
        }
    }

    async fn read_catalog(&self, key: &str) -> Result<Value> {
        let content = tokio::fs::read_to_string(&self.catalog_path)
            .await
            .map_err(|e| Error::adapter(key, format!("{}: {}", self.catalog_path.display(), e)))?;
        serde_json::from_str(&content)
            .map_err(|e| Error::adapter(key, format!("{}: {}", self.catalog_path.display(), e)))
    }
}

#[async_trait]
impl DataAdapter for FileAdapter {
    async fn get(&self, key: &str) -> Result<Value> {
        let field = match key {
            REPORTER_URL_KEY => return Ok(Value::String(self.reporter_url.clone())),
            LIBRARY_KEY => "library",
            BEFORE_ALL_KEY => "beforeAll",
            AFTER_ALL_KEY => "afterAll",
            other => return Err(Error::adapter(other, "unknown key")),
        };

        debug!("Reading {} from {}", field, self.catalog_path.display());
        let mut catalog = self.read_catalog(key).await?;

        match catalog.get_mut(field) {
            Some(value) => Ok(value.take()),
            None if key == LIBRARY_KEY => Err(Error::adapter(key, "catalog has no library")),
            None => Ok(Value::Array(Vec::new())),
        }
    }
}
