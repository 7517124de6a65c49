use shared::domain::TransitionKind;

/// Where the engine is. There is no way to be animating without both ends of
/// the transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationPhase {
    Idle { index: usize },
    Animating { from: usize, to: usize },
}

impl NavigationPhase {
    /// The page currently shown. While animating that is still `from`.
    pub fn current_index(&self) -> usize {
        match *self {
            Self::Idle { index } => index,
            Self::Animating { from, .. } => from,
        }
    }

    pub fn is_animating(&self) -> bool {
        matches!(self, Self::Animating { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavigationState {
    pub current_index: usize,
    pub is_animating: bool,
    pub transition_kind: TransitionKind,
}

impl NavigationState {
    pub fn new(phase: NavigationPhase, transition_kind: TransitionKind) -> Self {
        Self {
            current_index: phase.current_index(),
            is_animating: phase.is_animating(),
            transition_kind,
        }
    }
}
