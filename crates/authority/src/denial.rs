//! The domain error raised when authorization fails.

use authority_core::{Action, ResourceType};
use thiserror::Error;

/// Raised when the current principal is not allowed to perform an action.
///
/// Usually produced by [`crate::Authority::authorize`], but can be built
/// manually wherever a denial needs to be surfaced. Carries enough structure
/// for a boundary layer (HTTP handler, CLI, job runner) to decide its own
/// presentation; `Display` is the resolved human-readable message.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct AccessDenied {
    /// The action that was attempted.
    pub action: Action,
    /// The resource type the action was attempted on.
    pub subject: ResourceType,
    /// Human-readable message, resolved through the message catalog or
    /// supplied explicitly by the caller.
    pub message: String,
}

impl AccessDenied {
    pub fn new(
        action: impl Into<Action>,
        subject: impl Into<ResourceType>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            action: action.into(),
            subject: subject.into(),
            message: message.into(),
        }
    }
}
