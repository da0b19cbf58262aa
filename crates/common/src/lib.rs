//! SuitePager Common Library
//!
//! Suite selection and page-element resolution for the browser-based visual
//! test runner. Transport and markup templating live in `suitepager-web`;
//! this crate only decides which suite a request gets and what goes on its
//! page.

pub mod adapter;
pub mod catalog;
pub mod error;
pub mod pager;
pub mod registry;
pub mod resolver;
pub mod session;
pub mod tags;
pub mod types;

// Re-export commonly used types
pub use adapter::{DataAdapter, MemoryAdapter};
pub use catalog::Catalog;
pub use error::{Error, Result};
pub use pager::{TestPager, TestPagerBuilder};
pub use registry::{FnRenderer, Renderer, RendererRegistry};
pub use resolver::PageElementResolver;
pub use session::{QueryParams, SessionCursor, SessionDefaults};
pub use tags::TagSet;
pub use types::*;

/// SuitePager version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
