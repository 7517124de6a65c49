use std::{collections::HashSet, fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Duration of every page animation unless configured otherwise. The server
/// publishes it into the document and the engine waits on it, so both sides
/// read the same value.
pub const DEFAULT_ANIMATION_DURATION_MS: u64 = 600;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageId(pub String);

impl PageId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionKind {
    #[default]
    Slide,
    Fade,
    Zoom,
    Rotate,
    Flip,
    Cube,
}

impl TransitionKind {
    pub const ALL: [TransitionKind; 6] = [
        TransitionKind::Slide,
        TransitionKind::Fade,
        TransitionKind::Zoom,
        TransitionKind::Rotate,
        TransitionKind::Flip,
        TransitionKind::Cube,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Slide => "slide",
            Self::Fade => "fade",
            Self::Zoom => "zoom",
            Self::Rotate => "rotate",
            Self::Flip => "flip",
            Self::Cube => "cube",
        }
    }
}

impl fmt::Display for TransitionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown transition kind '{0}'")]
pub struct TransitionKindParseError(pub String);

impl FromStr for TransitionKind {
    type Err = TransitionKindParseError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let wanted = raw.trim();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| TransitionKindParseError(raw.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

impl Direction {
    pub fn between(from: usize, to: usize) -> Self {
        if to > from {
            Self::Forward
        } else {
            Self::Backward
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageDescriptor {
    pub id: PageId,
    pub route: String,
    pub title: String,
}

impl PageDescriptor {
    pub fn new(id: &str, route: &str, title: &str) -> Self {
        Self {
            id: PageId::new(id),
            route: route.to_string(),
            title: title.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PageSetError {
    #[error("page set must contain at least one page")]
    Empty,
    #[error("duplicate page identifier '{0}'")]
    DuplicateId(PageId),
    #[error("duplicate page route '{0}'")]
    DuplicateRoute(String),
}

/// Ordered, fixed set of pages. Position in the set is the page index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSet {
    pages: Vec<PageDescriptor>,
}

impl PageSet {
    pub fn new(pages: Vec<PageDescriptor>) -> Result<Self, PageSetError> {
        if pages.is_empty() {
            return Err(PageSetError::Empty);
        }

        let mut ids = HashSet::new();
        let mut routes = HashSet::new();
        for page in &pages {
            if !ids.insert(&page.id) {
                return Err(PageSetError::DuplicateId(page.id.clone()));
            }
            if !routes.insert(page.route.as_str()) {
                return Err(PageSetError::DuplicateRoute(page.route.clone()));
            }
        }

        Ok(Self { pages })
    }

    /// The five pages of the demonstration site.
    pub fn demo() -> Self {
        Self {
            pages: vec![
                PageDescriptor::new("welcome", "/", "Welcome - Smooth Transitions"),
                PageDescriptor::new("animations", "/animations", "Smooth Animations"),
                PageDescriptor::new("effects", "/effects", "Multiple Effects"),
                PageDescriptor::new("interaction", "/interaction", "Touch & Click"),
                PageDescriptor::new("ready", "/ready", "Ready to Use"),
            ],
        }
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn contains_index(&self, index: usize) -> bool {
        index < self.pages.len()
    }

    pub fn last_index(&self) -> usize {
        self.pages.len().saturating_sub(1)
    }

    pub fn get(&self, index: usize) -> Option<&PageDescriptor> {
        self.pages.get(index)
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.pages.iter().position(|page| page.id.as_str() == id)
    }

    pub fn index_of_route(&self, route: &str) -> Option<usize> {
        self.pages.iter().position(|page| page.route == route)
    }

    pub fn route_for(&self, index: usize) -> Option<&str> {
        self.get(index).map(|page| page.route.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &PageDescriptor> {
        self.pages.iter()
    }
}

impl Default for PageSet {
    fn default() -> Self {
        Self::demo()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_set_orders_pages_by_index() {
        let pages = PageSet::demo();
        assert_eq!(pages.len(), 5);
        assert_eq!(pages.index_of("effects"), Some(2));
        assert_eq!(pages.route_for(2), Some("/effects"));
        assert_eq!(pages.index_of_route("/"), Some(0));
        assert_eq!(pages.last_index(), 4);
        assert!(!pages.contains_index(5));
    }

    #[test]
    fn rejects_duplicate_identifiers() {
        let err = PageSet::new(vec![
            PageDescriptor::new("a", "/", "A"),
            PageDescriptor::new("a", "/other", "A again"),
        ])
        .expect_err("duplicate id");
        assert_eq!(err, PageSetError::DuplicateId(PageId::new("a")));
    }

    #[test]
    fn rejects_duplicate_routes_and_empty_sets() {
        let err = PageSet::new(vec![
            PageDescriptor::new("a", "/", "A"),
            PageDescriptor::new("b", "/", "B"),
        ])
        .expect_err("duplicate route");
        assert_eq!(err, PageSetError::DuplicateRoute("/".into()));
        assert_eq!(PageSet::new(Vec::new()), Err(PageSetError::Empty));
    }

    #[test]
    fn transition_kind_parses_case_insensitively() {
        assert_eq!("Cube".parse::<TransitionKind>(), Ok(TransitionKind::Cube));
        assert_eq!(" fade ".parse::<TransitionKind>(), Ok(TransitionKind::Fade));
        assert!("wipe".parse::<TransitionKind>().is_err());
        assert_eq!(
            serde_json::to_string(&TransitionKind::Zoom).expect("json"),
            "\"zoom\""
        );
    }

    #[test]
    fn direction_is_forward_only_for_higher_targets() {
        assert_eq!(Direction::between(1, 3), Direction::Forward);
        assert_eq!(Direction::between(3, 1), Direction::Backward);
    }
}
