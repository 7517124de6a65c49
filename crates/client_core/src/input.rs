//! Keyboard, pointer and touch input mapped onto engine calls.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use shared::domain::TransitionKind;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::engine::{NavigationOutcome, TransitionEngine};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    ArrowRight,
    ArrowLeft,
    Space,
    Home,
    End,
    Other,
}

impl Key {
    /// Maps a DOM `KeyboardEvent.key` value.
    pub fn from_dom(key: &str) -> Self {
        match key {
            "ArrowRight" => Self::ArrowRight,
            "ArrowLeft" => Self::ArrowLeft,
            " " | "Space" | "Spacebar" => Self::Space,
            "Home" => Self::Home,
            "End" => Self::End,
            _ => Self::Other,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchPoint {
    pub x: f64,
    pub y: f64,
}

impl TouchPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    KeyDown(Key),
    IndicatorClick { index: usize },
    LinkClick { index: usize, href: String },
    TouchStart(TouchPoint),
    TouchEnd(TouchPoint),
    TransitionSelected(TransitionKind),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationIntent {
    Next,
    Previous,
    First,
    Last,
    Page(usize),
    Link { index: usize, href: String },
    SelectTransition(TransitionKind),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeDirection {
    Left,
    Right,
}

/// Horizontal swipe between two touch points, if the gesture is one. The
/// horizontal travel must dominate the vertical one and exceed `min_distance`.
pub fn classify_swipe(
    start: TouchPoint,
    end: TouchPoint,
    min_distance: f64,
) -> Option<SwipeDirection> {
    let dx = end.x - start.x;
    let dy = end.y - start.y;
    if dx.abs() <= dy.abs() || dx.abs() <= min_distance {
        return None;
    }
    Some(if dx < 0.0 {
        SwipeDirection::Left
    } else {
        SwipeDirection::Right
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputResponse {
    /// The host should suppress the event's default action (link following).
    pub prevent_default: bool,
    pub outcome: Option<NavigationOutcome>,
}

/// Shared by every event source of a host. Events may arrive while a
/// transition is running; navigation requests made then are absorbed by the
/// engine guard instead of queueing behind it.
pub struct InputBindings {
    engine: Arc<TransitionEngine>,
    touch_start: Mutex<Option<TouchPoint>>,
}

impl InputBindings {
    pub fn new(engine: Arc<TransitionEngine>) -> Self {
        Self {
            engine,
            touch_start: Mutex::new(None),
        }
    }

    pub fn engine(&self) -> &Arc<TransitionEngine> {
        &self.engine
    }

    /// Turns an event into what the user asked for. Touch start only records
    /// the point and yields nothing.
    pub fn translate(&self, event: &InputEvent) -> Option<NavigationIntent> {
        match event {
            InputEvent::KeyDown(key) => match key {
                Key::ArrowRight | Key::Space => Some(NavigationIntent::Next),
                Key::ArrowLeft => Some(NavigationIntent::Previous),
                Key::Home => Some(NavigationIntent::First),
                Key::End => Some(NavigationIntent::Last),
                Key::Other => None,
            },
            InputEvent::IndicatorClick { index } => Some(NavigationIntent::Page(*index)),
            InputEvent::LinkClick { index, href } => Some(NavigationIntent::Link {
                index: *index,
                href: href.clone(),
            }),
            InputEvent::TouchStart(point) => {
                *self.touch_start() = Some(*point);
                None
            }
            InputEvent::TouchEnd(end) => {
                let start = self.touch_start().take()?;
                match classify_swipe(start, *end, self.engine.config().min_swipe_distance)? {
                    SwipeDirection::Left => Some(NavigationIntent::Next),
                    SwipeDirection::Right => Some(NavigationIntent::Previous),
                }
            }
            InputEvent::TransitionSelected(kind) => {
                Some(NavigationIntent::SelectTransition(*kind))
            }
        }
    }

    fn touch_start(&self) -> MutexGuard<'_, Option<TouchPoint>> {
        self.touch_start
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Hands `event` to a new task and returns at once, so the host's event
    /// loop never waits on a transition.
    pub fn dispatch(self: &Arc<Self>, event: InputEvent) -> JoinHandle<InputResponse> {
        let bindings = Arc::clone(self);
        tokio::spawn(async move { bindings.handle(event).await })
    }

    /// Applies `event` and waits for any navigation it starts.
    pub async fn handle(&self, event: InputEvent) -> InputResponse {
        let prevent_default = matches!(
            event,
            InputEvent::IndicatorClick { .. } | InputEvent::LinkClick { .. }
        );
        let Some(intent) = self.translate(&event) else {
            return InputResponse {
                prevent_default,
                outcome: None,
            };
        };
        debug!(?intent, "input mapped");

        let outcome = match intent {
            NavigationIntent::Next => Some(self.engine.go_to_relative(1).await),
            NavigationIntent::Previous => Some(self.engine.go_to_relative(-1).await),
            NavigationIntent::First => Some(self.engine.go_to_page(0).await),
            NavigationIntent::Last => {
                let last = self.engine.pages().last_index();
                Some(self.engine.go_to_page(last).await)
            }
            NavigationIntent::Page(index) => Some(self.engine.go_to_page(index).await),
            NavigationIntent::Link { index, href } => {
                Some(self.engine.navigate(index, &href).await)
            }
            NavigationIntent::SelectTransition(kind) => {
                self.engine.set_transition_kind(kind);
                None
            }
        };

        InputResponse {
            prevent_default,
            outcome,
        }
    }
}

#[cfg(test)]
#[path = "tests/input_tests.rs"]
mod tests;
