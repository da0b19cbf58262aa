//! SuitePager Web
//!
//! Serves the visual test runner's suite pages over HTTP: `GET /tests` hands
//! the query to a [`suitepager_common::TestPager`] and renders the outcome
//! with [`PageTemplates`].

pub mod config;
pub mod file_adapter;
pub mod server;
pub mod template_renderer;
pub mod templates;

pub use config::{RendererConfig, SuitePagerConfig};
pub use file_adapter::FileAdapter;
pub use server::WebServer;
pub use template_renderer::TemplateRenderer;
pub use templates::PageTemplates;
