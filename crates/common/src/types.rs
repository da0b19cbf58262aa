//! Core types for SuitePager

use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Parameters handed to a renderer
pub type ElementParams = Map<String, Value>;

/// Parameter key carrying an asset path for raw-content elements
pub const RAW_CONTENT_KEY: &str = "rawContent";

/// One page element as declared in a suite or in the before/after-all lists
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PageElementSpec {
    /// Bare name of a registered renderer, rendered with request parameters only
    RendererRef(String),

    /// Bare string naming no renderer, typically an asset path
    RawContent(String),

    /// `{ name: { ...params } }`
    RendererWithParams { name: String, params: ElementParams },
}

impl PageElementSpec {
    /// Renderer name this element asks for, if any.
    pub fn name(&self) -> Option<&str> {
        match self {
            PageElementSpec::RendererRef(name) => Some(name),
            PageElementSpec::RawContent(_) => None,
            PageElementSpec::RendererWithParams { name, .. } => Some(name),
        }
    }

    /// Parameters declared on the element itself, before request parameters
    /// are merged in.
    pub fn declared_params(&self) -> ElementParams {
        match self {
            PageElementSpec::RendererRef(_) => ElementParams::new(),
            PageElementSpec::RawContent(content) => {
                let mut params = ElementParams::new();
                params.insert(RAW_CONTENT_KEY.to_string(), Value::String(content.clone()));
                params
            }
            PageElementSpec::RendererWithParams { params, .. } => params.clone(),
        }
    }
}

/// A suite decoded from its single-key catalog form
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SuiteDefinition {
    /// Raw comma-separated tag string, as declared
    pub tags: String,
    pub elements: Vec<PageElementSpec>,
}

/// A suite that passed the tag filter
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedSuite {
    pub tags: String,
    pub elements: Vec<PageElementSpec>,
}

/// Session and cursor state, rebuilt from the query on every request
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    pub test_runner_session: String,
    pub test_index: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub env: Option<String>,
    pub reporter_url: String,

    /// Pass-through query parameters
    #[serde(flatten)]
    pub extra: BTreeMap<String, String>,
}

impl SessionState {
    /// True once the cursor has moved past the last filtered suite.
    pub fn is_past_end(&self, suite_count: usize) -> bool {
        usize::try_from(self.test_index).map_or(true, |index| index >= suite_count)
    }

    /// The full request parameter map merged into every element's params.
    pub fn element_params(&self) -> ElementParams {
        let mut params: ElementParams = self
            .extra
            .iter()
            .map(|(k, v)| (k.clone(), Value::String(v.clone())))
            .collect();
        params.insert(
            "testRunnerSession".to_string(),
            Value::String(self.test_runner_session.clone()),
        );
        params.insert("testIndex".to_string(), Value::from(self.test_index));
        if let Some(env) = &self.env {
            params.insert("env".to_string(), Value::String(env.clone()));
        }
        params.insert(
            "reporterUrl".to_string(),
            Value::String(self.reporter_url.clone()),
        );
        params
    }
}

/// Result of one pager request, handed to the page template renderer
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PageOutcome {
    /// Every filtered suite has been served
    Done { session: SessionState },

    Suite {
        elements: Vec<String>,
        tags: String,
        session: SessionState,
    },
}

impl PageOutcome {
    pub fn template_name(&self) -> &'static str {
        match self {
            PageOutcome::Done { .. } => "done",
            PageOutcome::Suite { .. } => "suite-page",
        }
    }

    pub fn session(&self) -> &SessionState {
        match self {
            PageOutcome::Done { session } => session,
            PageOutcome::Suite { session, .. } => session,
        }
    }

    pub fn is_done(&self) -> bool {
        matches!(self, PageOutcome::Done { .. })
    }
}
