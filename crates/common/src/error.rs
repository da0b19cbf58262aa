//! Error types for SuitePager

use thiserror::Error;

/// Result type alias using SuitePager Error
pub type Result<T> = std::result::Result<T, Error>;

/// SuitePager error types
///
/// Every variant is fatal for the request that produced it; the pager never
/// degrades to a partial page.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Data adapter lookup failed for {key}: {reason}")]
    AdapterLookup { key: String, reason: String },

    #[error("Invalid catalog: {0}")]
    InvalidCatalog(String),

    #[error("missing content in {element}")]
    MissingContent { element: String },

    #[error("missing content in {element}: no markup for raw content {content:?}")]
    UnsupportedContent { element: String, content: String },

    #[error("Renderer {name} failed: {reason}")]
    Render { name: String, reason: String },

    #[error("Invalid parameter {name}: {reason}")]
    InvalidParameter { name: String, reason: String },
}

impl Error {
    pub fn adapter(key: impl Into<String>, reason: impl ToString) -> Self {
        Error::AdapterLookup {
            key: key.into(),
            reason: reason.to_string(),
        }
    }

    pub fn render(name: impl Into<String>, reason: impl ToString) -> Self {
        Error::Render {
            name: name.into(),
            reason: reason.to_string(),
        }
    }

    /// The element named no renderer and carried no usable raw content.
    pub fn is_missing_content(&self) -> bool {
        matches!(
            self,
            Error::MissingContent { .. } | Error::UnsupportedContent { .. }
        )
    }

    /// Errors caused by the request itself rather than the server's
    /// configuration or collaborators.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Error::InvalidParameter { .. })
    }
}
