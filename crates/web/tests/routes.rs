//! HTTP-level tests for the pager routes

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use suitepager_common::{FnRenderer, MemoryAdapter, Renderer, TestPager};
use suitepager_web::{SuitePagerConfig, WebServer};

const REPORTER: &str = "http://reporter.local/report";

fn router(library: Value) -> Router {
    let my_renderer: Arc<dyn Renderer> =
        Arc::new(FnRenderer::new(|_| Ok("<div id=\"my-renderer\"></div>".to_string())));
    let adapter = MemoryAdapter::new()
        .with_library(library)
        .with_before_all(json!([]))
        .with_after_all(json!([]))
        .with_reporter_url(REPORTER);

    let pager = TestPager::builder()
        .renderer("myRenderer", my_renderer)
        .set_data_adapter(Arc::new(adapter))
        .build()
        .unwrap();

    WebServer::new(pager).router()
}

async fn get(router: Router, uri: &str) -> (StatusCode, String) {
    let response = router
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

#[tokio::test]
async fn test_smoke_suite_then_done() {
    let library = json!([{"smoke": ["header.css", "myRenderer"]}]);

    let (status, html) = get(router(library.clone()), "/tests?tags=&testRunnerSession=99&testIndex=0").await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("data-template=\"suite-page\""));
    assert!(html.contains("data-tags=\"smoke\""));
    let css = html.find(r#"<link rel="stylesheet" type="text/css" href="header.css"/>"#).unwrap();
    let div = html.find("<div id=\"my-renderer\"></div>").unwrap();
    assert!(css < div);
    assert!(html.contains("testRunnerSession=99&testIndex=0"));

    let (status, html) = get(router(library), "/tests?tags=&testRunnerSession=99&testIndex=1").await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("data-template=\"done\""));
    assert!(html.contains("<code>99</code>"));
}

#[tokio::test]
async fn test_tag_filter_selects_suite() {
    let library = json!([
        {"smoke": ["a.js"]},
        {"regression, Mobile": ["b.js"]}
    ]);

    let (status, html) = get(router(library), "/tests?tags=mobile").await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("src=\"b.js\""));
    assert!(!html.contains("src=\"a.js\""));
}

#[tokio::test]
async fn test_missing_content_is_server_error() {
    let (status, body) = get(router(json!([{"smoke": ["notARenderer"]}])), "/tests").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, "Internal Server Error");
}

#[tokio::test]
async fn test_bad_index_is_client_error() {
    let (status, body) = get(router(json!([])), "/tests?testIndex=soon").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("testIndex"));
}

#[tokio::test]
async fn test_health() {
    let (status, body) = get(router(json!([])), "/health").await;
    assert_eq!(status, StatusCode::OK);
    let value: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(value["status"], "ok");
}

#[tokio::test]
async fn test_from_config_serves_catalog_and_assets() {
    let dir = tempfile::tempdir().unwrap();
    let catalog_path = dir.path().join("catalog.json");
    std::fs::write(
        &catalog_path,
        json!({
            "library": [{"smoke": ["header.css", {"banner": {"title": "Hello"}}]}],
            "beforeAll": ["reset.css"],
            "afterAll": []
        })
        .to_string(),
    )
    .unwrap();
    let assets_dir = dir.path().join("assets");
    std::fs::create_dir(&assets_dir).unwrap();
    std::fs::write(assets_dir.join("header.css"), "h1 { color: red; }").unwrap();

    let cfg: SuitePagerConfig = toml::from_str(&format!(
        r#"
reporter_url = "{}"
catalog_path = {:?}
assets_dir = {:?}

[renderers.banner]
template = "<h1 data-env=\"{{{{env}}}}\">{{{{title}}}}</h1>"
"#,
        REPORTER,
        catalog_path.display().to_string(),
        assets_dir.display().to_string()
    ))
    .unwrap();

    let router = WebServer::from_config(&cfg).unwrap().router();

    let (status, html) = get(router.clone(), "/tests?testRunnerSession=5").await;
    assert_eq!(status, StatusCode::OK);
    let reset = html.find("href=\"reset.css\"").unwrap();
    let header = html.find("href=\"header.css\"").unwrap();
    let banner = html.find("<h1 data-env=\"prod\">Hello</h1>").unwrap();
    assert!(reset < header && header < banner);

    let (status, css) = get(router.clone(), "/header.css").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(css, "h1 { color: red; }");

    let (status, _) = get(router, "/missing.css").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_asset_with_encoded_space() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("catalog.json"), r#"{"library": []}"#).unwrap();
    std::fs::write(dir.path().join("my file.css"), "body { margin: 0; }").unwrap();

    let cfg = SuitePagerConfig {
        catalog_path: dir.path().join("catalog.json"),
        assets_dir: Some(dir.path().to_path_buf()),
        ..SuitePagerConfig::default()
    };
    let router = WebServer::from_config(&cfg).unwrap().router();

    let response = router
        .clone()
        .oneshot(Request::builder().uri("/my%20file.css").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["content-type"], "text/css");
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"body { margin: 0; }");

    let (status, _) = get(router, "/my%20other.css").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_no_assets_dir_is_not_found() {
    let (status, body) = get(router(json!([])), "/header.css").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, "Not found");
}
