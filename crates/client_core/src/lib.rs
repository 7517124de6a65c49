//! Client side of the page-transition site: the navigation engine, its
//! collaborators and the input that drives it.
//!
//! The composition root builds one [`TransitionEngine`] from a
//! [`FragmentProvider`], a [`HistoryAdapter`], a [`PageSurface`] and any
//! number of [`NavigationObserver`]s, then hands it to [`InputBindings`].

pub mod config;
pub mod engine;
pub mod error;
pub mod fragment;
pub mod history;
pub mod input;
pub mod state;
pub mod surface;
pub mod transition;
pub mod ui_sync;

pub use config::{EngineConfig, RestoreMode};
pub use engine::{
    EngineDependencies, EngineEvent, NavigationOutcome, RestoreOutcome, TransitionEngine,
};
pub use error::{InvalidNavigationRequest, NavigationError};
pub use fragment::{FragmentProvider, HttpFragmentProvider, MissingFragmentProvider};
pub use history::{HistoryAdapter, InMemoryHistory};
pub use input::{InputBindings, InputEvent, InputResponse, Key, NavigationIntent, TouchPoint};
pub use state::{NavigationPhase, NavigationState};
pub use surface::{PageContainer, PageElement, PageSurface};
pub use ui_sync::{NavigationChrome, NavigationObserver};
