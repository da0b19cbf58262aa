//! Request orchestration
//!
//! [`TestPager`] turns one request's query into a [`PageOutcome`]: either the
//! page for the suite under the cursor, or the terminal "done" page. Every
//! request is evaluated from scratch using only client-echoed cursor state.

use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info};

use crate::adapter::{DataAdapter, AFTER_ALL_KEY, BEFORE_ALL_KEY, LIBRARY_KEY, REPORTER_URL_KEY};
use crate::catalog::{decode_element_list, Catalog};
use crate::error::{Error, Result};
use crate::registry::{Renderer, RendererRegistry};
use crate::resolver::PageElementResolver;
use crate::session::{QueryParams, SessionCursor, SessionDefaults, TAGS_PARAM};
use crate::tags::TagSet;
use crate::types::PageOutcome;

/// Configuration-time builder for [`TestPager`]
#[derive(Default)]
pub struct TestPagerBuilder {
    registry: RendererRegistry,
    adapter: Option<Arc<dyn DataAdapter>>,
    defaults: SessionDefaults,
}

impl TestPagerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_test_renderers<I, S>(mut self, renderers: I) -> Self
    where
        I: IntoIterator<Item = (S, Arc<dyn Renderer>)>,
        S: Into<String>,
    {
        self.registry.add_test_renderers(renderers);
        self
    }

    pub fn renderer(mut self, name: impl Into<String>, renderer: Arc<dyn Renderer>) -> Self {
        self.registry.register(name, renderer);
        self
    }

    pub fn set_data_adapter(mut self, adapter: Arc<dyn DataAdapter>) -> Self {
        self.adapter = Some(adapter);
        self
    }

    /// `env` applied when a request carries none.
    pub fn default_env(mut self, env: Option<String>) -> Self {
        self.defaults.env = env;
        self
    }

    pub fn build(self) -> Result<TestPager> {
        let adapter = self
            .adapter
            .ok_or_else(|| Error::InvalidConfig("no data adapter configured".to_string()))?;

        Ok(TestPager {
            inner: Arc::new(PagerContext {
                registry: self.registry,
                adapter,
                defaults: self.defaults,
            }),
        })
    }
}

struct PagerContext {
    registry: RendererRegistry,
    adapter: Arc<dyn DataAdapter>,
    defaults: SessionDefaults,
}

/// Transport-agnostic page composition for the visual test runner
#[derive(Clone)]
pub struct TestPager {
    inner: Arc<PagerContext>,
}

impl TestPager {
    pub fn builder() -> TestPagerBuilder {
        TestPagerBuilder::new()
    }

    pub fn registry(&self) -> &RendererRegistry {
        &self.inner.registry
    }

    /// Handle a request given by its full URL or path.
    pub async fn get_tests_url(&self, url: &str) -> Result<PageOutcome> {
        self.get_tests(&QueryParams::from_url(url)).await
    }

    pub async fn get_tests(&self, params: &QueryParams) -> Result<PageOutcome> {
        let ctx = &self.inner;
        let requested = TagSet::from_query(params.get(TAGS_PARAM));

        let reporter_base_url = self.reporter_base_url().await?;
        let session = SessionCursor::resolve(params, &reporter_base_url, &ctx.defaults)?;

        let library = ctx.adapter.get(LIBRARY_KEY).await?;
        let catalog = Catalog::decode(&library, &ctx.registry)?;
        let filtered = catalog.filter(&requested);

        debug!(
            "Session {} at index {} of {} filtered suites",
            session.test_runner_session,
            session.test_index,
            filtered.len()
        );

        if session.is_past_end(filtered.len()) {
            info!(
                "Session {} done after {} suites",
                session.test_runner_session,
                filtered.len()
            );
            return Ok(PageOutcome::Done { session });
        }

        // is_past_end guarantees the index fits
        let suite = &filtered[session.test_index as usize];

        let (before_all, after_all) = tokio::try_join!(
            ctx.adapter.get(BEFORE_ALL_KEY),
            ctx.adapter.get(AFTER_ALL_KEY)
        )?;
        let pre = decode_element_list(&before_all, &ctx.registry)?;
        let post = decode_element_list(&after_all, &ctx.registry)?;

        let elements = PageElementResolver::new(&ctx.registry)
            .resolve_elements(&pre, &suite.elements, &post, &session.element_params())
            .await?;

        info!(
            "Session {} serving suite {:?} ({}/{}) with {} elements",
            session.test_runner_session,
            suite.tags,
            session.test_index + 1,
            filtered.len(),
            elements.len()
        );

        Ok(PageOutcome::Suite {
            elements,
            tags: suite.tags.clone(),
            session,
        })
    }

    async fn reporter_base_url(&self) -> Result<String> {
        match self.inner.adapter.get(REPORTER_URL_KEY).await? {
            Value::String(url) if !url.trim().is_empty() => Ok(url),
            other => Err(Error::InvalidConfig(format!(
                "reporter-url must be a non-empty string, found {}",
                other
            ))),
        }
    }
}
