use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use shared::{
    domain::PageId,
    error::{ApiError, PAGE_NOT_FOUND},
    protocol::{fragment_path, FragmentResponse},
};
use tracing::debug;
use url::Url;

use crate::error::NavigationError;

/// Source of page markup. Stateless from the engine's point of view.
#[async_trait]
pub trait FragmentProvider: Send + Sync {
    async fn fetch(&self, page_id: &PageId) -> Result<FragmentResponse, NavigationError>;
}

pub struct MissingFragmentProvider;

#[async_trait]
impl FragmentProvider for MissingFragmentProvider {
    async fn fetch(&self, page_id: &PageId) -> Result<FragmentResponse, NavigationError> {
        Err(NavigationError::transport(
            page_id,
            "fragment provider is unavailable",
        ))
    }
}

/// Fetches fragments from the server's `/api/page/{id}` route.
pub struct HttpFragmentProvider {
    http: Client,
    base_url: Url,
}

impl HttpFragmentProvider {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url =
            Url::parse(base_url).with_context(|| format!("invalid server url '{base_url}'"))?;
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build http client")?;
        Ok(Self { http, base_url })
    }

    pub fn fragment_url(&self, page_id: &PageId) -> Result<Url, url::ParseError> {
        self.base_url.join(&fragment_path(page_id))
    }
}

#[async_trait]
impl FragmentProvider for HttpFragmentProvider {
    async fn fetch(&self, page_id: &PageId) -> Result<FragmentResponse, NavigationError> {
        let url = self
            .fragment_url(page_id)
            .map_err(|e| NavigationError::transport(page_id, e.to_string()))?;
        debug!(%url, "fetching page fragment");

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| NavigationError::transport(page_id, e.to_string()))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            let message = response
                .json::<ApiError>()
                .await
                .map(|body| body.error)
                .unwrap_or_else(|_| PAGE_NOT_FOUND.to_string());
            return Err(NavigationError::not_found(page_id, message));
        }
        if !status.is_success() {
            return Err(NavigationError::transport(
                page_id,
                format!("unexpected status {status}"),
            ));
        }

        response
            .json::<FragmentResponse>()
            .await
            .map_err(|e| NavigationError::transport(page_id, format!("invalid payload: {e}")))
    }
}

#[cfg(test)]
#[path = "tests/fragment_tests.rs"]
mod tests;
