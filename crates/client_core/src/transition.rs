use shared::domain::{Direction, TransitionKind};

pub const ACTIVE_CLASS: &str = "active";

/// Every marker a transition may leave on a page.
pub const TRANSITION_CLASSES: [&str; 11] = [
    "slide-left",
    "slide-right",
    "slide-up",
    "slide-down",
    "fade-out",
    "zoom-out",
    "zoom-in-start",
    "rotate-out",
    "flip-out",
    "cube-left",
    "cube-right",
];

/// Entry state for the incoming page and exit state for the outgoing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionPlan {
    pub entry: &'static str,
    pub exit: &'static str,
}

impl TransitionPlan {
    pub fn for_kind(kind: TransitionKind, direction: Direction) -> Self {
        let forward = direction == Direction::Forward;
        let (entry, exit) = match kind {
            TransitionKind::Slide if forward => ("slide-up", "slide-left"),
            TransitionKind::Slide => ("slide-down", "slide-right"),
            TransitionKind::Fade => ("fade-out", "fade-out"),
            TransitionKind::Zoom => ("zoom-in-start", "zoom-out"),
            TransitionKind::Rotate => ("rotate-out", "rotate-out"),
            TransitionKind::Flip => ("flip-out", "flip-out"),
            TransitionKind::Cube if forward => ("cube-right", "cube-left"),
            TransitionKind::Cube => ("cube-left", "cube-right"),
        };
        Self { entry, exit }
    }
}
