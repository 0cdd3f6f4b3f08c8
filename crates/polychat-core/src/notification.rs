//! Notification records exchanged through the broadcaster.

use crate::{CoreError, CoreResult, Participant};
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

// ============================================================================
// Notification Kind
// ============================================================================

/// Category of a chat event.
///
/// Each kind carries a stable numeric code (`0`, `1`, `2`) used by the raw
/// constructor [`Notification::from_code`] and by the operational log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum NotificationKind {
    /// A participant sent a chat message; the payload is the message text.
    NewMessage,

    /// A participant joined the chat.
    UserJoined,

    /// A participant left the chat.
    UserLeft,
}

impl NotificationKind {
    /// Returns the numeric code of this kind.
    pub fn code(&self) -> u8 {
        match self {
            Self::NewMessage => 0,
            Self::UserJoined => 1,
            Self::UserLeft => 2,
        }
    }

    /// Returns the snake_case name used in logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NewMessage => "new_message",
            Self::UserJoined => "user_joined",
            Self::UserLeft => "user_left",
        }
    }
}

impl TryFrom<u8> for NotificationKind {
    type Error = CoreError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Self::NewMessage),
            1 => Ok(Self::UserJoined),
            2 => Ok(Self::UserLeft),
            _ => Err(CoreError::InvalidKind { code }),
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// Notification
// ============================================================================

/// An immutable record of one chat event.
///
/// The origin is shared with the broadcaster and every holder of a clone, so
/// a logged or in-flight notification may outlive the call that created it.
#[derive(Clone)]
pub struct Notification {
    origin: Arc<Participant>,
    payload: String,
    kind: NotificationKind,
}

impl Notification {
    /// Creates a notification with a typed kind.
    pub fn new(origin: Arc<Participant>, payload: impl Into<String>, kind: NotificationKind) -> Self {
        Self {
            origin,
            payload: payload.into(),
            kind,
        }
    }

    /// Creates a notification from a raw kind code.
    ///
    /// # Errors
    ///
    /// - `CoreError::InvalidKind` if `code` is not `0`, `1` or `2`
    pub fn from_code(
        origin: Arc<Participant>,
        payload: impl Into<String>,
        code: u8,
    ) -> CoreResult<Self> {
        let kind = NotificationKind::try_from(code)?;
        Ok(Self::new(origin, payload, kind))
    }

    /// Shorthand for a `NewMessage` notification.
    pub fn message(origin: Arc<Participant>, text: impl Into<String>) -> Self {
        Self::new(origin, text, NotificationKind::NewMessage)
    }

    /// Shorthand for a `UserJoined` notification with the system payload.
    pub fn joined(origin: Arc<Participant>) -> Self {
        let payload = format!("{} joined", origin.identity());
        Self::new(origin, payload, NotificationKind::UserJoined)
    }

    /// Shorthand for a `UserLeft` notification with the system payload.
    pub fn left(origin: Arc<Participant>) -> Self {
        let payload = format!("{} left", origin.identity());
        Self::new(origin, payload, NotificationKind::UserLeft)
    }

    pub fn origin(&self) -> &Arc<Participant> {
        &self.origin
    }

    pub fn payload(&self) -> &str {
        &self.payload
    }

    pub fn kind(&self) -> NotificationKind {
        self.kind
    }

    /// Renders the operational log entry for this notification.
    ///
    /// Format: `[@<timestamp>] Origin: <identity>  Message: <payload>  Type: <code>`,
    /// stamped with the current local time at millisecond precision.
    pub fn render(&self) -> String {
        format!(
            "[@{}] Origin: {}  Message: {}  Type: {}",
            Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
            self.origin.identity(),
            self.payload,
            self.kind.code()
        )
    }
}

impl fmt::Debug for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Notification")
            .field("origin", &self.origin.id())
            .field("payload", &self.payload)
            .field("kind", &self.kind)
            .finish()
    }
}
