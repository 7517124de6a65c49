use super::*;
use axum::{body, body::Body, http::Request};
use tower::ServiceExt;

fn test_app(static_dir: &FsPath) -> Router {
    let api = ApiContext {
        pages: Arc::new(PageSet::demo()),
        views_dir: None,
        animation_duration_ms: 600,
    };
    build_router(Arc::new(AppState { api }), static_dir)
}

async fn body_bytes(response: axum::response::Response) -> body::Bytes {
    body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body")
}

#[tokio::test]
async fn healthz_reports_ok() {
    let dir = tempfile::tempdir().expect("tempdir");
    let request = Request::get("/healthz")
        .body(Body::empty())
        .expect("request");
    let response = test_app(dir.path()).oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_bytes(response).await.as_ref(), b"ok");
}

#[tokio::test]
async fn fragment_route_returns_html_and_page_id() {
    let dir = tempfile::tempdir().expect("tempdir");
    let request = Request::get("/api/page/interaction")
        .body(Body::empty())
        .expect("request");
    let response = test_app(dir.path()).oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::OK);

    let json: serde_json::Value =
        serde_json::from_slice(&body_bytes(response).await).expect("json");
    assert_eq!(json["pageId"], "interaction");
    assert!(json["html"]
        .as_str()
        .expect("html string")
        .contains("data-page-id=\"interaction\""));
}

#[tokio::test]
async fn unknown_fragment_is_404_with_error_payload() {
    let dir = tempfile::tempdir().expect("tempdir");
    let request = Request::get("/api/page/nope")
        .body(Body::empty())
        .expect("request");
    let response = test_app(dir.path()).oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let json: serde_json::Value =
        serde_json::from_slice(&body_bytes(response).await).expect("json");
    assert_eq!(json, serde_json::json!({ "error": "Page not found" }));
}

#[tokio::test]
async fn every_page_route_renders_a_full_document() {
    let dir = tempfile::tempdir().expect("tempdir");
    let app = test_app(dir.path());

    for (index, page) in PageSet::demo().iter().enumerate() {
        let request = Request::get(page.route.as_str())
            .body(Body::empty())
            .expect("request");
        let response = app.clone().oneshot(request).await.expect("response");
        assert_eq!(response.status(), StatusCode::OK, "{}", page.route);

        let html = String::from_utf8(body_bytes(response).await.to_vec()).expect("utf8");
        assert!(html.contains(&format!("window.currentPageIndex = {index};")));
        assert!(html.contains(&format!("data-page-id=\"{}\"", page.id)));
    }
}

#[tokio::test]
async fn static_assets_are_served_from_the_configured_directory() {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::create_dir_all(dir.path().join("css")).expect("css dir");
    std::fs::write(dir.path().join("css").join("style.css"), "body {}").expect("asset");
    let app = test_app(dir.path());

    let request = Request::get("/css/style.css")
        .body(Body::empty())
        .expect("request");
    let response = app.clone().oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_bytes(response).await.as_ref(), b"body {}");

    let request = Request::get("/css/missing.css")
        .body(Body::empty())
        .expect("request");
    let response = app.oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[test]
fn default_log_filter_enables_request_tracing() {
    let filter = EnvFilter::try_new(DEFAULT_LOG_FILTER).expect("valid filter");
    let rendered = filter.to_string();
    assert!(rendered.contains("tower_http=debug"), "{rendered}");
    assert!(rendered.contains("info"), "{rendered}");
}
