use super::*;
use shared::{domain::PageId, error::ErrorCode, protocol::fragment_path};

fn setup(views_dir: Option<PathBuf>) -> ApiContext {
    ApiContext {
        pages: Arc::new(PageSet::demo()),
        views_dir,
        animation_duration_ms: 600,
    }
}

#[tokio::test]
async fn fragment_wraps_body_in_inactive_page_section() {
    let ctx = setup(None);
    let fragment = render_fragment(&ctx, "effects").await.expect("fragment");

    assert_eq!(fragment.page_id.as_str(), "effects");
    assert!(fragment
        .html
        .starts_with("<section class=\"page\" data-page-id=\"effects\">"));
    assert!(fragment.html.contains("Multiple Effects"));
}

#[tokio::test]
async fn unknown_page_is_not_found() {
    let ctx = setup(None);
    let err = render_fragment(&ctx, "settings")
        .await
        .expect_err("should fail");
    assert!(matches!(err.code, ErrorCode::NotFound));
    assert_eq!(err.message, "Page not found");
}

#[tokio::test]
async fn document_embeds_active_content_and_initial_index() {
    let ctx = setup(None);
    let html = render_document(&ctx, 1).await.expect("document");

    assert!(html.contains("<title>Smooth Animations</title>"));
    assert!(html.contains("<section class=\"page active\" data-page-id=\"animations\">"));
    assert!(html.contains("window.currentPageIndex = 1;"));
}

#[tokio::test]
async fn views_dir_bodies_are_read_per_request() {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::create_dir_all(dir.path().join("pages")).expect("pages dir");
    std::fs::write(dir.path().join("pages").join("ready.html"), "<p>custom</p>").expect("view");

    let ctx = setup(Some(dir.path().to_path_buf()));
    let fragment = render_fragment(&ctx, "ready").await.expect("fragment");
    assert!(fragment.html.contains("<p>custom</p>"));

    std::fs::write(dir.path().join("pages").join("ready.html"), "<p>edited</p>").expect("view");
    let fragment = render_fragment(&ctx, "ready").await.expect("fragment");
    assert!(fragment.html.contains("<p>edited</p>"));
}

#[tokio::test]
async fn failed_render_is_reported_as_not_found() {
    let dir = tempfile::tempdir().expect("tempdir");
    let ctx = setup(Some(dir.path().to_path_buf()));

    let err = render_fragment(&ctx, "welcome")
        .await
        .expect_err("missing view");
    assert!(matches!(err.code, ErrorCode::NotFound));

    let err = render_document(&ctx, 0).await.expect_err("missing view");
    assert!(matches!(err.code, ErrorCode::NotFound));
}

#[test]
fn fragment_route_matches_the_client_fragment_path() {
    let route = fragment_route();
    let path = fragment_path(&PageId::new("effects"));

    assert_eq!(route, "/api/page/:page_id");
    assert_eq!(
        route.trim_end_matches(":page_id"),
        path.trim_end_matches("effects")
    );
}
