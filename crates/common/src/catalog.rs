//! Suite catalog decoding and tag filtering

use serde_json::Value;
use tracing::debug;

use crate::error::{Error, Result};
use crate::registry::RendererRegistry;
use crate::tags::{self, TagSet};
use crate::types::{ElementParams, NormalizedSuite, PageElementSpec, SuiteDefinition};

/// Decode one element spec.
///
/// Bare strings are classified against `registry`: a registered name becomes
/// a [`PageElementSpec::RendererRef`], anything else raw content.
pub fn decode_element(value: &Value, registry: &RendererRegistry) -> Result<PageElementSpec> {
    match value {
        Value::String(s) if registry.contains(s) => Ok(PageElementSpec::RendererRef(s.clone())),
        Value::String(s) => Ok(PageElementSpec::RawContent(s.clone())),
        Value::Object(map) => {
            let mut entries = map.iter();
            match (entries.next(), entries.next()) {
                (Some((name, Value::Object(params))), None) => {
                    Ok(PageElementSpec::RendererWithParams {
                        name: name.clone(),
                        params: params.clone(),
                    })
                }
                (Some((name, Value::Null)), None) => Ok(PageElementSpec::RendererWithParams {
                    name: name.clone(),
                    params: ElementParams::new(),
                }),
                (Some((name, _)), None) => Err(Error::InvalidCatalog(format!(
                    "parameters of element {} must be an object",
                    name
                ))),
                _ => Err(Error::InvalidCatalog(format!(
                    "element object must have exactly one key, found {}",
                    map.len()
                ))),
            }
        }
        other => Err(Error::InvalidCatalog(format!(
            "unsupported element spec: {}",
            other
        ))),
    }
}

/// Decode a before-all/after-all element list. `null` counts as empty.
pub fn decode_element_list(value: &Value, registry: &RendererRegistry) -> Result<Vec<PageElementSpec>> {
    match value {
        Value::Null => Ok(Vec::new()),
        Value::Array(items) => items.iter().map(|item| decode_element(item, registry)).collect(),
        other => Err(Error::InvalidCatalog(format!(
            "element list must be an array, found {}",
            json_kind(other)
        ))),
    }
}

/// Suite catalog, decoded once from its single-key wire form
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    suites: Vec<SuiteDefinition>,
}

impl Catalog {
    /// Decode `[{ "tag, string": [element, ...] }, ...]`.
    pub fn decode(value: &Value, registry: &RendererRegistry) -> Result<Self> {
        let entries = value.as_array().ok_or_else(|| {
            Error::InvalidCatalog(format!(
                "test library must be an array, found {}",
                json_kind(value)
            ))
        })?;

        let mut suites = Vec::with_capacity(entries.len());
        for (position, entry) in entries.iter().enumerate() {
            let map = entry.as_object().ok_or_else(|| {
                Error::InvalidCatalog(format!("suite #{} must be an object", position))
            })?;
            if map.len() != 1 {
                return Err(Error::InvalidCatalog(format!(
                    "suite #{} must have exactly one tag key, found {}",
                    position,
                    map.len()
                )));
            }
            for (tags, elements) in map {
                let elements = match elements {
                    Value::Array(_) => decode_element_list(elements, registry)?,
                    _ => {
                        return Err(Error::InvalidCatalog(format!(
                            "elements of suite {:?} must be an array",
                            tags
                        )))
                    }
                };
                suites.push(SuiteDefinition {
                    tags: tags.clone(),
                    elements,
                });
            }
        }

        Ok(Self { suites })
    }

    pub fn suites(&self) -> &[SuiteDefinition] {
        &self.suites
    }

    /// Suites matching `requested`, in catalog order.
    pub fn filter(&self, requested: &TagSet) -> Vec<NormalizedSuite> {
        filter(&self.suites, requested)
    }
}

/// Keep suites whose tags satisfy `requested`, preserving catalog order.
pub fn filter(suites: &[SuiteDefinition], requested: &TagSet) -> Vec<NormalizedSuite> {
    let filtered: Vec<NormalizedSuite> = suites
        .iter()
        .filter(|suite| requested.matches(&tags::normalize(Some(&suite.tags))))
        .map(|suite| NormalizedSuite {
            tags: suite.tags.clone(),
            elements: suite.elements.clone(),
        })
        .collect();

    debug!(
        "Tag filter kept {} of {} suites ({:?})",
        filtered.len(),
        suites.len(),
        requested
    );
    filtered
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
