use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::state::NavigationState;

/// Notified after every successful navigation and on initial load.
#[async_trait]
pub trait NavigationObserver: Send + Sync {
    async fn on_navigation(&self, state: &NavigationState);
}

/// Page indicators and nav links. Both are rebuilt from the navigation state
/// on every sync, never patched, so a missed update cannot leave them
/// disagreeing with the engine.
pub struct NavigationChrome {
    page_count: usize,
    indicators: RwLock<Vec<bool>>,
    nav_links: RwLock<Vec<bool>>,
}

impl NavigationChrome {
    pub fn new(page_count: usize) -> Self {
        Self {
            page_count,
            indicators: RwLock::new(vec![false; page_count]),
            nav_links: RwLock::new(vec![false; page_count]),
        }
    }

    pub async fn sync(&self, current_index: usize) {
        *self.indicators.write().await = active_flags(self.page_count, current_index);
        *self.nav_links.write().await = active_flags(self.page_count, current_index);
    }

    pub async fn indicators(&self) -> Vec<bool> {
        self.indicators.read().await.clone()
    }

    pub async fn nav_links(&self) -> Vec<bool> {
        self.nav_links.read().await.clone()
    }

    pub async fn active_indicator(&self) -> Option<usize> {
        single_active(&self.indicators.read().await)
    }

    pub async fn active_nav_link(&self) -> Option<usize> {
        single_active(&self.nav_links.read().await)
    }
}

fn active_flags(len: usize, current_index: usize) -> Vec<bool> {
    (0..len).map(|index| index == current_index).collect()
}

fn single_active(flags: &[bool]) -> Option<usize> {
    let mut active = flags.iter().enumerate().filter(|(_, on)| **on);
    match (active.next(), active.next()) {
        (Some((index, _)), None) => Some(index),
        _ => None,
    }
}

#[async_trait]
impl NavigationObserver for NavigationChrome {
    async fn on_navigation(&self, state: &NavigationState) {
        self.sync(state.current_index).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn sync_marks_exactly_one_active_entry() {
        let chrome = NavigationChrome::new(5);
        assert_eq!(chrome.active_indicator().await, None);

        chrome.sync(2).await;
        assert_eq!(chrome.indicators().await, vec![false, false, true, false, false]);
        assert_eq!(chrome.active_indicator().await, Some(2));
        assert_eq!(chrome.active_nav_link().await, Some(2));
    }

    #[tokio::test]
    async fn repeated_sync_is_idempotent() {
        let chrome = NavigationChrome::new(5);
        chrome.sync(4).await;
        let first = (chrome.indicators().await, chrome.nav_links().await);
        chrome.sync(4).await;
        chrome.sync(4).await;
        assert_eq!((chrome.indicators().await, chrome.nav_links().await), first);
    }

    #[test]
    fn single_active_rejects_ambiguous_flags() {
        assert_eq!(single_active(&[true, true]), None);
        assert_eq!(single_active(&[false, true]), Some(1));
    }
}
