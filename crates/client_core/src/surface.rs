//! The visible page container the engine animates.
//!
//! A host implements [`PageSurface`] over whatever actually renders pages.
//! [`PageContainer`] is the in-memory implementation used by the navigator
//! and by tests; it records layout passes and reloads so callers can observe
//! what a real renderer would have shown.

use std::collections::BTreeSet;

use async_trait::async_trait;
use shared::domain::PageId;
use tokio::sync::{Mutex, Notify};

use crate::transition::ACTIVE_CLASS;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageElement {
    pub page_id: PageId,
    pub markup: String,
    pub classes: BTreeSet<String>,
}

impl PageElement {
    /// Detached element for `markup`, carrying the classes declared on the
    /// markup's first element.
    pub fn from_markup(page_id: PageId, markup: impl Into<String>) -> Self {
        let markup = markup.into();
        let classes = first_element_classes(&markup)
            .split_whitespace()
            .map(str::to_string)
            .collect();
        Self {
            page_id,
            markup,
            classes,
        }
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.contains(class)
    }

    pub fn is_active(&self) -> bool {
        self.has_class(ACTIVE_CLASS)
    }
}

fn first_element_classes(markup: &str) -> &str {
    let Some(open) = markup.find('<') else {
        return "";
    };
    let tag = &markup[open..];
    let tag = &tag[..tag.find('>').unwrap_or(tag.len())];
    let Some(start) = tag.find("class=\"") else {
        return "";
    };
    let value = &tag[start + "class=\"".len()..];
    &value[..value.find('"').unwrap_or(value.len())]
}

#[async_trait]
pub trait PageSurface: Send + Sync {
    async fn active_page(&self) -> Option<PageId>;
    async fn attach(&self, element: PageElement);
    /// Synchronous layout pass; whatever classes are set now are rendered
    /// before any later change starts animating.
    async fn force_layout(&self);
    async fn add_class(&self, page: &PageId, class: &str);
    async fn remove_classes(&self, page: &PageId, classes: &[&str]);
    async fn remove(&self, page: &PageId);
    /// Resolves when the renderer reports the animation on `page` finished.
    /// Surfaces without such a signal never resolve and the engine falls
    /// back to the configured duration.
    async fn animation_finished(&self, _page: &PageId) {
        std::future::pending::<()>().await
    }
    /// Full document load of `url`.
    async fn reload(&self, url: &str);
}

#[derive(Default)]
struct ContainerState {
    pages: Vec<PageElement>,
    layout_passes: usize,
    last_layout: Vec<PageElement>,
    reloads: Vec<String>,
}

#[derive(Default)]
pub struct PageContainer {
    inner: Mutex<ContainerState>,
    finished: Option<Notify>,
}

impl PageContainer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Container as the server-rendered document leaves it: one active page.
    pub fn with_active(page_id: PageId, markup: impl Into<String>) -> Self {
        let mut element = PageElement::from_markup(page_id, markup);
        element.classes.insert(ACTIVE_CLASS.to_string());
        Self {
            inner: Mutex::new(ContainerState {
                pages: vec![element],
                ..ContainerState::default()
            }),
            finished: None,
        }
    }

    /// Makes [`PageSurface::animation_finished`] resolve on
    /// [`PageContainer::signal_animation_finished`] instead of never.
    pub fn with_animation_signals(mut self) -> Self {
        self.finished = Some(Notify::new());
        self
    }

    pub fn signal_animation_finished(&self) {
        if let Some(finished) = &self.finished {
            finished.notify_one();
        }
    }

    pub async fn pages(&self) -> Vec<PageElement> {
        self.inner.lock().await.pages.clone()
    }

    pub async fn element(&self, page: &PageId) -> Option<PageElement> {
        self.inner
            .lock()
            .await
            .pages
            .iter()
            .find(|element| &element.page_id == page)
            .cloned()
    }

    pub async fn layout_passes(&self) -> usize {
        self.inner.lock().await.layout_passes
    }

    /// Pages as they were at the most recent layout pass.
    pub async fn last_layout(&self) -> Vec<PageElement> {
        self.inner.lock().await.last_layout.clone()
    }

    pub async fn reloads(&self) -> Vec<String> {
        self.inner.lock().await.reloads.clone()
    }
}

impl ContainerState {
    fn element_mut(&mut self, page: &PageId) -> Option<&mut PageElement> {
        self.pages.iter_mut().find(|element| &element.page_id == page)
    }
}

#[async_trait]
impl PageSurface for PageContainer {
    async fn active_page(&self) -> Option<PageId> {
        self.inner
            .lock()
            .await
            .pages
            .iter()
            .find(|element| element.is_active())
            .map(|element| element.page_id.clone())
    }

    async fn attach(&self, element: PageElement) {
        let mut guard = self.inner.lock().await;
        guard.pages.retain(|existing| existing.page_id != element.page_id);
        guard.pages.push(element);
    }

    async fn force_layout(&self) {
        let mut guard = self.inner.lock().await;
        guard.layout_passes += 1;
        guard.last_layout = guard.pages.clone();
    }

    async fn add_class(&self, page: &PageId, class: &str) {
        if let Some(element) = self.inner.lock().await.element_mut(page) {
            element.classes.insert(class.to_string());
        }
    }

    async fn remove_classes(&self, page: &PageId, classes: &[&str]) {
        if let Some(element) = self.inner.lock().await.element_mut(page) {
            for class in classes {
                element.classes.remove(*class);
            }
        }
    }

    async fn remove(&self, page: &PageId) {
        self.inner
            .lock()
            .await
            .pages
            .retain(|element| &element.page_id != page);
    }

    async fn animation_finished(&self, _page: &PageId) {
        match &self.finished {
            Some(finished) => finished.notified().await,
            None => std::future::pending::<()>().await,
        }
    }

    async fn reload(&self, url: &str) {
        let mut guard = self.inner.lock().await;
        // The reloaded document replaces everything that was mounted.
        guard.pages.clear();
        guard.reloads.push(url.to_string());
    }
}
