//! Domain-specific error types following panic-free policy.

use crate::NotificationKind;
use thiserror::Error;

/// Errors that can occur in domain operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// Notification built from a raw kind code outside the known set.
    #[error("Invalid notification kind: {code} (expected 0, 1 or 2)")]
    InvalidKind { code: u8 },

    /// A participant has no rendering branch for this kind.
    #[error("Unsupported notification: {kind}")]
    UnsupportedNotification { kind: NotificationKind },
}

/// Result type for domain operations.
pub type CoreResult<T> = Result<T, CoreError>;
