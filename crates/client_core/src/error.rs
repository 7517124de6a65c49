use shared::domain::PageId;
use thiserror::Error;

/// Failures local to a single navigation attempt. None of them are fatal:
/// the engine returns to the page it started from.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NavigationError {
    #[error("content not found for page '{page_id}': {message}")]
    ContentNotFound { page_id: PageId, message: String },
    #[error("transport failure while fetching page '{page_id}': {message}")]
    TransportFailure { page_id: PageId, message: String },
}

impl NavigationError {
    pub fn not_found(page_id: &PageId, message: impl Into<String>) -> Self {
        Self::ContentNotFound {
            page_id: page_id.clone(),
            message: message.into(),
        }
    }

    pub fn transport(page_id: &PageId, message: impl Into<String>) -> Self {
        Self::TransportFailure {
            page_id: page_id.clone(),
            message: message.into(),
        }
    }

    pub fn page_id(&self) -> &PageId {
        match self {
            Self::ContentNotFound { page_id, .. } | Self::TransportFailure { page_id, .. } => {
                page_id
            }
        }
    }
}

/// Requests the engine absorbs without doing anything. These are expected
/// under rapid input and are never reported as errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidNavigationRequest {
    SameIndex,
    AlreadyAnimating,
    OutOfRange { requested: isize, len: usize },
}
