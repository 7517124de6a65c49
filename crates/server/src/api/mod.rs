use std::{path::PathBuf, sync::Arc};

use shared::{
    domain::{PageDescriptor, PageSet},
    error::ApiException,
    protocol::{FragmentResponse, FRAGMENT_ROUTE_PREFIX},
};
use tracing::error;

use crate::pages::{builtin_body, page_section, Layout};

#[derive(Clone)]
pub struct ApiContext {
    pub pages: Arc<PageSet>,
    /// When set, page bodies are read from `{views_dir}/pages/{id}.html` on
    /// every request instead of the built-in markup.
    pub views_dir: Option<PathBuf>,
    pub animation_duration_ms: u64,
}

pub fn fragment_route() -> String {
    format!("{FRAGMENT_ROUTE_PREFIX}/:page_id")
}

pub async fn render_fragment(
    ctx: &ApiContext,
    page_id: &str,
) -> Result<FragmentResponse, ApiException> {
    let index = ctx
        .pages
        .index_of(page_id)
        .ok_or_else(ApiException::not_found)?;
    let page = page_at(ctx, index)?;
    let body = load_body(ctx, page).await?;

    Ok(FragmentResponse {
        html: page_section(page, &body, false),
        page_id: page.id.clone(),
    })
}

pub async fn render_document(ctx: &ApiContext, index: usize) -> Result<String, ApiException> {
    let page = page_at(ctx, index)?;
    let body = load_body(ctx, page).await?;
    let content = page_section(page, &body, true);

    Ok(Layout {
        pages: &ctx.pages,
        index,
        content: &content,
        animation_duration_ms: ctx.animation_duration_ms,
    }
    .render())
}

fn page_at(ctx: &ApiContext, index: usize) -> Result<&PageDescriptor, ApiException> {
    ctx.pages.get(index).ok_or_else(ApiException::not_found)
}

async fn load_body(ctx: &ApiContext, page: &PageDescriptor) -> Result<String, ApiException> {
    let Some(views_dir) = &ctx.views_dir else {
        return builtin_body(page.id.as_str())
            .map(str::to_string)
            .ok_or_else(|| render_failure(page, "no built-in body"));
    };

    let path = views_dir.join("pages").join(format!("{}.html", page.id));
    tokio::fs::read_to_string(&path).await.map_err(|e| {
        error!(path = %path.display(), error = %e, "failed to read page view");
        render_failure(page, &e.to_string())
    })
}

// Rendering failures are reported to the client exactly like unknown pages.
fn render_failure(page: &PageDescriptor, reason: &str) -> ApiException {
    error!(page_id = %page.id, reason, "page render failed");
    ApiException::not_found()
}

#[cfg(test)]
#[path = "tests/mod_tests.rs"]
mod tests;
