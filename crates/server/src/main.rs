use std::{path::Path as FsPath, sync::Arc};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Html,
    routing::get,
    Json, Router,
};
use shared::{
    domain::PageSet,
    error::{ApiError, ApiException, ErrorCode},
    protocol::FragmentResponse,
};
use tower_http::{services::ServeDir, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod api;
mod app_state;
mod config;
mod pages;

use api::{fragment_route, render_document, render_fragment, ApiContext};
use app_state::AppState;
use config::load_settings;

/// Used when `RUST_LOG` is unset. Request spans from `TraceLayer` log at debug.
const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let settings = load_settings();
    if !settings.static_dir.is_dir() {
        warn!(
            static_dir = %settings.static_dir.display(),
            "static asset directory does not exist; asset requests will 404"
        );
    }

    let api = ApiContext {
        pages: Arc::new(PageSet::demo()),
        views_dir: settings.views_dir.clone(),
        animation_duration_ms: settings.animation_duration_ms,
    };
    let app = build_router(Arc::new(AppState { api }), &settings.static_dir);

    let addr = settings.bind_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "server listening on http://localhost:{}", settings.port);
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_router(state: Arc<AppState>, static_dir: &FsPath) -> Router {
    let mut router = Router::new()
        .route("/healthz", get(healthz))
        .route(&fragment_route(), get(http_page_fragment));

    for (index, page) in state.api.pages.iter().enumerate() {
        router = router.route(
            &page.route,
            get(move |State(state): State<Arc<AppState>>| http_full_page(state, index)),
        );
    }

    router
        .fallback_service(ServeDir::new(static_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn healthz() -> &'static str {
    "ok"
}

async fn http_page_fragment(
    State(state): State<Arc<AppState>>,
    Path(page_id): Path<String>,
) -> Result<Json<FragmentResponse>, (StatusCode, Json<ApiError>)> {
    let fragment = render_fragment(&state.api, &page_id)
        .await
        .map_err(error_response)?;
    Ok(Json(fragment))
}

async fn http_full_page(
    state: Arc<AppState>,
    index: usize,
) -> Result<Html<String>, (StatusCode, Json<ApiError>)> {
    let document = render_document(&state.api, index)
        .await
        .map_err(error_response)?;
    Ok(Html(document))
}

fn error_response(err: ApiException) -> (StatusCode, Json<ApiError>) {
    let status = match err.code {
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
    };
    (status, Json(err.into()))
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
