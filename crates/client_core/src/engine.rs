//! Page transition engine.
//!
//! [`TransitionEngine`] is the single authority for which page is showing.
//! A navigation is accepted only from `Idle`, moves the engine to
//! `Animating { from, to }`, fetches the target fragment, animates it into
//! the surface and ends back in `Idle`: on the target when everything
//! succeeded, on the origin otherwise. The phase lock is never held across an
//! await; the `Animating` phase itself is what turns late or rapid-fire
//! requests away.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use shared::{
    domain::{Direction, PageId, PageSet, TransitionKind},
    protocol::HistoryEntry,
};
use tokio::{
    sync::broadcast::{self, error::RecvError},
    task::JoinHandle,
    time::timeout,
};
use tracing::{debug, info, warn};

use crate::{
    config::{EngineConfig, RestoreMode},
    error::{InvalidNavigationRequest, NavigationError},
    fragment::FragmentProvider,
    history::HistoryAdapter,
    state::{NavigationPhase, NavigationState},
    surface::{PageElement, PageSurface},
    transition::{TransitionPlan, ACTIVE_CLASS, TRANSITION_CLASSES},
    ui_sync::NavigationObserver,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationOutcome {
    Completed { from: usize, to: usize },
    Ignored(InvalidNavigationRequest),
    Aborted(NavigationError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestoreOutcome {
    /// The fetch-and-swap path was replayed toward the entry's page.
    Replayed,
    /// The surface reloaded the entry's URL.
    Reloaded,
    AlreadyCurrent,
    /// A navigation was in flight; the entry is applied once it settles.
    Deferred,
    /// The entry names no page in the set.
    Ignored,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    Navigated {
        from: usize,
        to: usize,
        url: String,
    },
    NavigationAborted {
        from: usize,
        target: usize,
        error: NavigationError,
    },
    Restored {
        index: usize,
        outcome: RestoreOutcome,
    },
}

pub struct EngineDependencies {
    pub provider: Arc<dyn FragmentProvider>,
    pub history: Arc<dyn HistoryAdapter>,
    pub surface: Arc<dyn PageSurface>,
    pub observers: Vec<Arc<dyn NavigationObserver>>,
}

pub struct TransitionEngine {
    this: Weak<TransitionEngine>,
    pages: PageSet,
    config: EngineConfig,
    phase: Mutex<NavigationPhase>,
    transition_kind: Mutex<TransitionKind>,
    pending_restore: Mutex<Option<HistoryEntry>>,
    provider: Arc<dyn FragmentProvider>,
    history: Arc<dyn HistoryAdapter>,
    surface: Arc<dyn PageSurface>,
    observers: Vec<Arc<dyn NavigationObserver>>,
    events: broadcast::Sender<EngineEvent>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Holds the engine in `Animating` and puts it back to `Idle` when dropped,
/// so a cancelled or panicking navigation cannot leave it stuck. A history
/// entry deferred behind the dropped navigation is handed to a fresh task.
struct AnimatingGuard<'a> {
    engine: &'a TransitionEngine,
    from: usize,
    to: usize,
    settled: bool,
}

impl AnimatingGuard<'_> {
    fn settle(mut self, index: usize) {
        *lock(&self.engine.phase) = NavigationPhase::Idle { index };
        self.settled = true;
    }
}

impl Drop for AnimatingGuard<'_> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        warn!(
            from = self.from,
            to = self.to,
            "navigation interrupted; returning to previous page"
        );
        let stranded = {
            let mut phase = lock(&self.engine.phase);
            *phase = NavigationPhase::Idle { index: self.from };
            let mut pending = lock(&self.engine.pending_restore);
            pending.take()
        };
        if let Some(entry) = stranded {
            self.engine.redispatch_restore(entry);
        }
    }
}

enum RestoreStart<'a> {
    Started(AnimatingGuard<'a>),
    AlreadyCurrent,
    Deferred,
}

impl TransitionEngine {
    /// `initial_index` is the page the document was loaded with; an index
    /// outside the page set falls back to the first page.
    pub fn new(
        pages: PageSet,
        initial_index: usize,
        config: EngineConfig,
        dependencies: EngineDependencies,
    ) -> Arc<Self> {
        let index = if pages.contains_index(initial_index) {
            initial_index
        } else {
            warn!(
                initial_index,
                page_count = pages.len(),
                "initial page index out of range; starting on the first page"
            );
            0
        };
        let (events, _) = broadcast::channel(256);

        Arc::new_cyclic(|this| Self {
            this: this.clone(),
            pages,
            transition_kind: Mutex::new(config.transition_kind),
            config,
            phase: Mutex::new(NavigationPhase::Idle { index }),
            pending_restore: Mutex::new(None),
            provider: dependencies.provider,
            history: dependencies.history,
            surface: dependencies.surface,
            observers: dependencies.observers,
            events,
        })
    }

    pub fn pages(&self) -> &PageSet {
        &self.pages
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn phase(&self) -> NavigationPhase {
        *lock(&self.phase)
    }

    pub fn state(&self) -> NavigationState {
        NavigationState::new(self.phase(), self.transition_kind())
    }

    pub fn transition_kind(&self) -> TransitionKind {
        *lock(&self.transition_kind)
    }

    /// Takes effect from the next content swap.
    pub fn set_transition_kind(&self, kind: TransitionKind) {
        *lock(&self.transition_kind) = kind;
        debug!(%kind, "transition kind changed");
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<EngineEvent> {
        self.events.subscribe()
    }

    /// Recomputes every observer from the current state. Called by the
    /// composition root on initial load and by the engine after each
    /// successful navigation.
    pub async fn sync_ui(&self) {
        let state = self.state();
        for observer in &self.observers {
            observer.on_navigation(&state).await;
        }
    }

    pub async fn go_to_page(&self, index: usize) -> NavigationOutcome {
        match self.pages.route_for(index) {
            Some(route) => self.navigate(index, route).await,
            None => NavigationOutcome::Ignored(InvalidNavigationRequest::OutOfRange {
                requested: isize::try_from(index).unwrap_or(isize::MAX),
                len: self.pages.len(),
            }),
        }
    }

    /// Moves `offset` pages away from the current one.
    pub async fn go_to_relative(&self, offset: isize) -> NavigationOutcome {
        let current = self.phase().current_index();
        let requested = isize::try_from(current)
            .unwrap_or(isize::MAX)
            .saturating_add(offset);
        match usize::try_from(requested) {
            Ok(index) if self.pages.contains_index(index) => self.go_to_page(index).await,
            _ => {
                debug!(requested, "navigation request ignored");
                NavigationOutcome::Ignored(InvalidNavigationRequest::OutOfRange {
                    requested,
                    len: self.pages.len(),
                })
            }
        }
    }

    pub async fn navigate(&self, target: usize, url: &str) -> NavigationOutcome {
        let guard = match self.begin(target) {
            Ok(guard) => guard,
            Err(reason) => {
                debug!(target, ?reason, "navigation request ignored");
                return NavigationOutcome::Ignored(reason);
            }
        };
        let from = guard.from;

        let outcome = match self.fetch_and_swap(from, target).await {
            Ok(()) => {
                self.history.push(HistoryEntry::new(target, url)).await;
                self.settle(guard, target).await;
                info!(from, to = target, url, "navigation completed");
                let _ = self.events.send(EngineEvent::Navigated {
                    from,
                    to: target,
                    url: url.to_string(),
                });
                NavigationOutcome::Completed { from, to: target }
            }
            Err(error) => {
                guard.settle(from);
                self.report_abort(from, target, &error);
                NavigationOutcome::Aborted(error)
            }
        };

        self.apply_pending_restores().await;
        outcome
    }

    /// Resynchronizes to a history entry the host moved to. The final state
    /// is always `Idle(entry.page_index)` for a valid entry.
    pub async fn restore_from_history(&self, entry: HistoryEntry) -> RestoreOutcome {
        if !self.pages.contains_index(entry.page_index) {
            warn!(
                page_index = entry.page_index,
                url = %entry.url,
                "ignoring history entry outside the page set"
            );
            return RestoreOutcome::Ignored;
        }

        let outcome = match self.begin_restore(&entry) {
            RestoreStart::Deferred => {
                debug!(page_index = entry.page_index, "history restore deferred");
                return RestoreOutcome::Deferred;
            }
            RestoreStart::AlreadyCurrent => {
                self.sync_ui().await;
                RestoreOutcome::AlreadyCurrent
            }
            RestoreStart::Started(guard) => self.restore(guard, &entry).await,
        };
        let _ = self.events.send(EngineEvent::Restored {
            index: entry.page_index,
            outcome,
        });

        self.apply_pending_restores().await;
        outcome
    }

    /// Feeds the history adapter's back/forward notifications into
    /// [`TransitionEngine::restore_from_history`] until the adapter goes away.
    pub fn spawn_history_listener(self: &Arc<Self>) -> JoinHandle<()> {
        let mut pops = self.history.subscribe();
        let engine = Arc::clone(self);
        tokio::spawn(async move {
            loop {
                match pops.recv().await {
                    Ok(entry) => {
                        engine.restore_from_history(entry).await;
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(skipped, "history listener lagged behind");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        })
    }

    fn begin(&self, target: usize) -> Result<AnimatingGuard<'_>, InvalidNavigationRequest> {
        let mut phase = lock(&self.phase);
        let current = phase.current_index();
        if target == current {
            return Err(InvalidNavigationRequest::SameIndex);
        }
        if phase.is_animating() {
            return Err(InvalidNavigationRequest::AlreadyAnimating);
        }
        if !self.pages.contains_index(target) {
            return Err(InvalidNavigationRequest::OutOfRange {
                requested: isize::try_from(target).unwrap_or(isize::MAX),
                len: self.pages.len(),
            });
        }

        *phase = NavigationPhase::Animating {
            from: current,
            to: target,
        };
        Ok(AnimatingGuard {
            engine: self,
            from: current,
            to: target,
            settled: false,
        })
    }

    fn begin_restore(&self, entry: &HistoryEntry) -> RestoreStart<'_> {
        let mut phase = lock(&self.phase);
        match *phase {
            NavigationPhase::Animating { .. } => {
                // Stored under the phase lock so the in-flight navigation
                // cannot settle without seeing it.
                *lock(&self.pending_restore) = Some(entry.clone());
                RestoreStart::Deferred
            }
            NavigationPhase::Idle { index } if index == entry.page_index => {
                RestoreStart::AlreadyCurrent
            }
            NavigationPhase::Idle { index } => {
                *phase = NavigationPhase::Animating {
                    from: index,
                    to: entry.page_index,
                };
                RestoreStart::Started(AnimatingGuard {
                    engine: self,
                    from: index,
                    to: entry.page_index,
                    settled: false,
                })
            }
        }
    }

    async fn restore(&self, guard: AnimatingGuard<'_>, entry: &HistoryEntry) -> RestoreOutcome {
        let (from, to) = (guard.from, guard.to);

        if self.config.restore_mode == RestoreMode::Replay {
            match self.fetch_and_swap(from, to).await {
                Ok(()) => {
                    self.settle(guard, to).await;
                    info!(from, to, url = %entry.url, "history restored by replay");
                    return RestoreOutcome::Replayed;
                }
                Err(error) => {
                    self.report_abort(from, to, &error);
                    warn!(url = %entry.url, "replay failed; reloading history entry");
                }
            }
        }

        self.surface.reload(&entry.url).await;
        self.settle(guard, to).await;
        info!(from, to, url = %entry.url, "history restored by reload");
        RestoreOutcome::Reloaded
    }

    fn redispatch_restore(&self, entry: HistoryEntry) {
        let Some(engine) = self.this.upgrade() else {
            return;
        };
        match tokio::runtime::Handle::try_current() {
            Ok(runtime) => {
                debug!(page_index = entry.page_index, "re-dispatching deferred history restore");
                runtime.spawn(async move {
                    engine.restore_from_history(entry).await;
                });
            }
            Err(_) => warn!(
                page_index = entry.page_index,
                "no runtime to apply deferred history restore"
            ),
        }
    }

    async fn apply_pending_restores(&self) {
        loop {
            let next = lock(&self.pending_restore).take();
            let Some(entry) = next else {
                break;
            };

            let outcome = match self.begin_restore(&entry) {
                // Someone else started a navigation; it drains the entry.
                RestoreStart::Deferred => break,
                RestoreStart::AlreadyCurrent => {
                    self.sync_ui().await;
                    RestoreOutcome::AlreadyCurrent
                }
                RestoreStart::Started(guard) => self.restore(guard, &entry).await,
            };
            let _ = self.events.send(EngineEvent::Restored {
                index: entry.page_index,
                outcome,
            });
        }
    }

    async fn settle(&self, guard: AnimatingGuard<'_>, index: usize) {
        guard.settle(index);
        self.sync_ui().await;
    }

    fn report_abort(&self, from: usize, target: usize, error: &NavigationError) {
        warn!(
            from,
            target,
            page_id = %error.page_id(),
            %error,
            "navigation aborted; staying on current page"
        );
        let _ = self.events.send(EngineEvent::NavigationAborted {
            from,
            target,
            error: error.clone(),
        });
    }

    async fn fetch_and_swap(&self, from: usize, to: usize) -> Result<(), NavigationError> {
        let Some(page) = self.pages.get(to) else {
            return Err(NavigationError::not_found(
                &PageId::new(to.to_string()),
                "no page at index",
            ));
        };

        let fetch = self.provider.fetch(&page.id);
        let fragment = match timeout(self.config.fetch_timeout(), fetch).await {
            Ok(result) => result?,
            Err(_) => {
                return Err(NavigationError::transport(
                    &page.id,
                    format!("timed out after {}ms", self.config.fetch_timeout_ms),
                ))
            }
        };
        if fragment.page_id != page.id {
            return Err(NavigationError::transport(
                &page.id,
                format!("provider returned page '{}'", fragment.page_id),
            ));
        }

        self.swap_content(&page.id, fragment.html, Direction::between(from, to))
            .await;
        Ok(())
    }

    async fn swap_content(&self, page_id: &PageId, markup: String, direction: Direction) {
        let plan = TransitionPlan::for_kind(self.transition_kind(), direction);

        let mut incoming = PageElement::from_markup(page_id.clone(), markup);
        incoming.classes.remove(ACTIVE_CLASS);
        incoming.classes.insert(plan.entry.to_string());

        let outgoing = self
            .surface
            .active_page()
            .await
            .filter(|active| active != page_id);
        self.surface.attach(incoming).await;
        self.surface.force_layout().await;

        match &outgoing {
            Some(outgoing) => {
                self.surface.add_class(outgoing, plan.exit).await;
                self.surface.remove_classes(page_id, &[plan.entry]).await;
            }
            None => self.surface.add_class(page_id, ACTIVE_CLASS).await,
        }

        let duration = self.config.animation_duration();
        if timeout(duration, self.surface.animation_finished(page_id))
            .await
            .is_err()
        {
            debug!(page_id = %page_id, ?duration, "animation completed by fallback delay");
        }

        if let Some(outgoing) = outgoing {
            self.surface.remove(&outgoing).await;
        }
        self.surface.add_class(page_id, ACTIVE_CLASS).await;
        self.surface.remove_classes(page_id, &TRANSITION_CLASSES).await;
    }
}

#[cfg(test)]
#[path = "tests/engine_tests.rs"]
mod tests;
