use async_trait::async_trait;
use shared::protocol::HistoryEntry;
use tokio::sync::{broadcast, Mutex};

/// Host navigation history: push-state plus pop-state notifications.
#[async_trait]
pub trait HistoryAdapter: Send + Sync {
    async fn push(&self, entry: HistoryEntry);
    /// Entries the host moved to through back/forward navigation.
    fn subscribe(&self) -> broadcast::Receiver<HistoryEntry>;
}

struct HistoryStack {
    entries: Vec<HistoryEntry>,
    cursor: usize,
}

/// Browser-like session history kept in memory. Pushing discards any forward
/// entries; `back`/`forward` move the cursor and notify subscribers.
pub struct InMemoryHistory {
    inner: Mutex<HistoryStack>,
    pops: broadcast::Sender<HistoryEntry>,
}

impl InMemoryHistory {
    pub fn new(initial: HistoryEntry) -> Self {
        let (pops, _) = broadcast::channel(64);
        Self {
            inner: Mutex::new(HistoryStack {
                entries: vec![initial],
                cursor: 0,
            }),
            pops,
        }
    }

    pub async fn back(&self) -> Option<HistoryEntry> {
        let entry = {
            let mut guard = self.inner.lock().await;
            if guard.cursor == 0 {
                return None;
            }
            guard.cursor -= 1;
            guard.entries[guard.cursor].clone()
        };
        let _ = self.pops.send(entry.clone());
        Some(entry)
    }

    pub async fn forward(&self) -> Option<HistoryEntry> {
        let entry = {
            let mut guard = self.inner.lock().await;
            if guard.cursor + 1 >= guard.entries.len() {
                return None;
            }
            guard.cursor += 1;
            guard.entries[guard.cursor].clone()
        };
        let _ = self.pops.send(entry.clone());
        Some(entry)
    }

    pub async fn entries(&self) -> Vec<HistoryEntry> {
        self.inner.lock().await.entries.clone()
    }

    pub async fn current(&self) -> HistoryEntry {
        let guard = self.inner.lock().await;
        guard.entries[guard.cursor].clone()
    }
}

#[async_trait]
impl HistoryAdapter for InMemoryHistory {
    async fn push(&self, entry: HistoryEntry) {
        let mut guard = self.inner.lock().await;
        let keep = guard.cursor + 1;
        guard.entries.truncate(keep);
        guard.entries.push(entry);
        guard.cursor = guard.entries.len() - 1;
    }

    fn subscribe(&self) -> broadcast::Receiver<HistoryEntry> {
        self.pops.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn back_and_forward_notify_subscribers() {
        let history = InMemoryHistory::new(HistoryEntry::new(0, "/"));
        let mut pops = history.subscribe();
        history.push(HistoryEntry::new(2, "/effects")).await;

        assert_eq!(history.back().await, Some(HistoryEntry::new(0, "/")));
        assert_eq!(pops.recv().await.expect("pop"), HistoryEntry::new(0, "/"));
        assert_eq!(history.back().await, None);

        assert_eq!(history.forward().await, Some(HistoryEntry::new(2, "/effects")));
        assert_eq!(
            pops.recv().await.expect("pop"),
            HistoryEntry::new(2, "/effects")
        );
        assert_eq!(history.forward().await, None);
    }

    #[tokio::test]
    async fn push_discards_forward_entries() {
        let history = InMemoryHistory::new(HistoryEntry::new(0, "/"));
        history.push(HistoryEntry::new(1, "/animations")).await;
        history.push(HistoryEntry::new(2, "/effects")).await;
        history.back().await;
        history.back().await;

        history.push(HistoryEntry::new(4, "/ready")).await;

        assert_eq!(
            history.entries().await,
            vec![HistoryEntry::new(0, "/"), HistoryEntry::new(4, "/ready")]
        );
        assert_eq!(history.current().await, HistoryEntry::new(4, "/ready"));
    }
}
