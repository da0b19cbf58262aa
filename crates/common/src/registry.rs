//! Named renderer registry

use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::error::Result;
use crate::types::ElementParams;

/// Turns merged element parameters into a markup fragment
#[async_trait]
pub trait Renderer: Send + Sync {
    async fn render(&self, params: &ElementParams) -> Result<String>;
}

/// Adapts a synchronous closure into a [`Renderer`]
pub struct FnRenderer<F>(F);

impl<F> FnRenderer<F>
where
    F: Fn(&ElementParams) -> Result<String> + Send + Sync,
{
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

#[async_trait]
impl<F> Renderer for FnRenderer<F>
where
    F: Fn(&ElementParams) -> Result<String> + Send + Sync,
{
    async fn render(&self, params: &ElementParams) -> Result<String> {
        (self.0)(params)
    }
}

/// Renderers by name
///
/// Populated at configuration time and read-only once requests are served.
#[derive(Clone, Default)]
pub struct RendererRegistry {
    renderers: HashMap<String, Arc<dyn Renderer>>,
}

impl RendererRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register one renderer, replacing any previous one of the same name.
    pub fn register(&mut self, name: impl Into<String>, renderer: Arc<dyn Renderer>) {
        self.renderers.insert(name.into(), renderer);
    }

    /// Additive registration; later entries overwrite earlier ones on collision.
    pub fn add_test_renderers<I, S>(&mut self, renderers: I)
    where
        I: IntoIterator<Item = (S, Arc<dyn Renderer>)>,
        S: Into<String>,
    {
        for (name, renderer) in renderers {
            self.register(name, renderer);
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.renderers.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn Renderer>> {
        self.renderers.get(name)
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.renderers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.renderers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.renderers.is_empty()
    }
}

impl fmt::Debug for RendererRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RendererRegistry")
            .field("renderers", &self.names())
            .finish()
    }
}
