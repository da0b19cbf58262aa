//! Web server implementation

use axum::{
    extract::{RawQuery, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use suitepager_common::{QueryParams, TestPager};

use crate::config::SuitePagerConfig;
use crate::file_adapter::FileAdapter;
use crate::template_renderer;
use crate::templates::PageTemplates;

/// Web server state
#[derive(Clone)]
pub struct WebServer {
    state: Arc<WebServerState>,
}

struct WebServerState {
    pager: TestPager,
    templates: PageTemplates,

    /// Optional asset directory for paths referenced by suites
    assets_dir: Option<PathBuf>,
}

impl WebServer {
    pub fn new(pager: TestPager) -> Self {
        Self::with_parts(pager, PageTemplates::default(), None)
    }

    pub fn with_parts(pager: TestPager, templates: PageTemplates, assets_dir: Option<PathBuf>) -> Self {
        Self {
            state: Arc::new(WebServerState {
                pager,
                templates,
                assets_dir,
            }),
        }
    }

    /// Wire a file-backed pager from configuration.
    pub fn from_config(cfg: &SuitePagerConfig) -> anyhow::Result<Self> {
        let adapter = FileAdapter::new(&cfg.catalog_path, cfg.reporter_url.clone());
        let pager = TestPager::builder()
            .add_test_renderers(template_renderer::from_config(&cfg.renderers))
            .set_data_adapter(Arc::new(adapter))
            .default_env(cfg.default_env())
            .build()?;

        info!(
            "Loaded {} renderers, catalog {}",
            pager.registry().len(),
            cfg.catalog_path.display()
        );

        Ok(Self::with_parts(
            pager,
            PageTemplates::default(),
            cfg.assets_dir.clone(),
        ))
    }

    /// Create router
    pub fn router(&self) -> Router {
        let router = Router::new()
            .route("/tests", get(tests_handler))
            .route("/health", get(health_handler));

        // Asset paths are percent-decoded and confined to the directory by ServeDir
        let router = match &self.state.assets_dir {
            Some(dir) => router.fallback_service(ServeDir::new(dir)),
            None => router.fallback(not_found_handler),
        };

        router
            .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any))
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Start the web server
    pub async fn serve(self, addr: SocketAddr) -> anyhow::Result<()> {
        info!("SuitePager starting on http://{}", addr);

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, self.router()).await?;

        Ok(())
    }
}

pub async fn serve(addr: SocketAddr, cfg: SuitePagerConfig) -> anyhow::Result<()> {
    let server = WebServer::from_config(&cfg)?;
    server.serve(addr).await
}

// ============================================================================
// Handlers
// ============================================================================

async fn tests_handler(
    State(state): State<Arc<WebServerState>>,
    RawQuery(query): RawQuery,
) -> Response {
    let params = query.as_deref().map(QueryParams::parse).unwrap_or_default();

    let outcome = match state.pager.get_tests(&params).await {
        Ok(outcome) => outcome,
        Err(e) if e.is_client_error() => {
            return (StatusCode::BAD_REQUEST, e.to_string()).into_response();
        }
        Err(e) => {
            error!("GET /tests failed: {}", e);
            return internal_error();
        }
    };

    match state.templates.render(&outcome) {
        Ok(html) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
            html,
        )
            .into_response(),
        Err(e) => {
            error!("Rendering {} page failed: {}", outcome.template_name(), e);
            internal_error()
        }
    }
}

async fn health_handler() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "suitepager-web"
    }))
}

async fn not_found_handler() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, "Not found")
}

fn internal_error() -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
}
