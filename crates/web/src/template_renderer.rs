//! Renderers declared in configuration

use async_trait::async_trait;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;

use suitepager_common::{ElementParams, Renderer, Result};

use crate::config::RendererConfig;
use crate::templates::escape_html;

/// Substitutes `{{name}}` placeholders with HTML-escaped element params.
/// Unknown placeholders render empty.
#[derive(Debug, Clone)]
pub struct TemplateRenderer {
    template: String,
}

impl TemplateRenderer {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }

    pub fn fill(&self, params: &ElementParams) -> String {
        let mut out = String::with_capacity(self.template.len());
        let mut rest = self.template.as_str();

        while let Some(start) = rest.find("{{") {
            out.push_str(&rest[..start]);
            let after = &rest[start + 2..];
            match after.find("}}") {
                Some(end) => {
                    let key = after[..end].trim();
                    if let Some(value) = params.get(key) {
                        out.push_str(&escape_html(&param_text(value)));
                    }
                    rest = &after[end + 2..];
                }
                None => {
                    out.push_str(&rest[start..]);
                    rest = "";
                }
            }
        }
        out.push_str(rest);
        out
    }
}

#[async_trait]
impl Renderer for TemplateRenderer {
    async fn render(&self, params: &ElementParams) -> Result<String> {
        Ok(self.fill(params))
    }
}

fn param_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Build the renderer set declared under `[renderers]`.
pub fn from_config(renderers: &BTreeMap<String, RendererConfig>) -> Vec<(String, Arc<dyn Renderer>)> {
    renderers
        .iter()
        .map(|(name, cfg)| {
            let renderer: Arc<dyn Renderer> = Arc::new(TemplateRenderer::new(cfg.template.clone()));
            (name.clone(), renderer)
        })
        .collect()
}
