//! Page element resolution
//!
//! Expands `before-all ++ suite ++ after-all` into markup fragments. Every
//! element is resolved concurrently and the results are joined back by
//! position, so the page order is the declaration order regardless of which
//! renderer finishes first. The first failure aborts the whole page.

use futures::future::try_join_all;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::registry::RendererRegistry;
use crate::types::{ElementParams, PageElementSpec, RAW_CONTENT_KEY};

/// Resolves element specs against a renderer registry
#[derive(Debug, Clone, Copy)]
pub struct PageElementResolver<'a> {
    registry: &'a RendererRegistry,
}

impl<'a> PageElementResolver<'a> {
    pub fn new(registry: &'a RendererRegistry) -> Self {
        Self { registry }
    }

    pub async fn resolve_elements(
        &self,
        pre: &[PageElementSpec],
        suite_elements: &[PageElementSpec],
        post: &[PageElementSpec],
        request_params: &ElementParams,
    ) -> Result<Vec<String>> {
        let elements: Vec<&PageElementSpec> =
            pre.iter().chain(suite_elements).chain(post).collect();

        debug!("Resolving {} page elements", elements.len());

        try_join_all(
            elements
                .into_iter()
                .enumerate()
                .map(|(position, element)| self.resolve_one(position, element, request_params)),
        )
        .await
    }

    async fn resolve_one(
        &self,
        position: usize,
        element: &PageElementSpec,
        request_params: &ElementParams,
    ) -> Result<String> {
        let params = merge_params(element.declared_params(), request_params);

        let result = match element.name().and_then(|name| self.registry.get(name).map(|r| (name, r))) {
            Some((name, renderer)) => {
                debug!("Rendering element #{} with renderer {}", position, name);
                renderer.render(&params).await
            }
            None => raw_content_markup(&describe(position, element), &params),
        };

        if let Err(e) = &result {
            warn!("Page element #{} failed: {}", position, e);
        }
        result
    }
}

/// Request parameters win over the element's declared parameters.
pub fn merge_params(mut declared: ElementParams, request_params: &ElementParams) -> ElementParams {
    for (key, value) in request_params {
        declared.insert(key.clone(), value.clone());
    }
    declared
}

/// Wrap an asset path into a stylesheet or script tag by its suffix.
pub fn raw_content_to_tag(content: &str) -> Option<String> {
    if content.ends_with(".css") {
        Some(format!(
            r#"<link rel="stylesheet" type="text/css" href="{}"/>"#,
            content
        ))
    } else if content.ends_with(".js") {
        Some(format!(
            r#"<script type="text/javascript" src="{}"></script>"#,
            content
        ))
    } else {
        None
    }
}

fn raw_content_markup(element: &str, params: &ElementParams) -> Result<String> {
    let content = match params.get(RAW_CONTENT_KEY) {
        Some(Value::String(content)) if !content.is_empty() => content,
        _ => {
            return Err(Error::MissingContent {
                element: element.to_string(),
            })
        }
    };

    raw_content_to_tag(content).ok_or_else(|| Error::UnsupportedContent {
        element: element.to_string(),
        content: content.clone(),
    })
}

fn describe(position: usize, element: &PageElementSpec) -> String {
    match element {
        PageElementSpec::RawContent(content) => format!("element #{} ({})", position, content),
        PageElementSpec::RendererRef(name) | PageElementSpec::RendererWithParams { name, .. } => {
            format!("element #{} ({})", position, name)
        }
    }
}
