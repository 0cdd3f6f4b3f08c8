//! Broadcaster actor commands, errors, and events.
//!
//! This module defines the message types for communicating with the `BroadcasterActor`:
//! - `BroadcasterCommand`: Commands sent to the actor
//! - `HubError`: Errors that can occur during hub operations
//! - `HubEvent`: Events published by the hub for observers
//! - `PublishOutcome`: What happened to a published notification

use std::sync::Arc;

use polychat_core::{CoreError, Notification, Participant, ParticipantId};
use serde::Serialize;
use thiserror::Error;
use tokio::sync::oneshot;

// ============================================================================
// Broadcaster Commands
// ============================================================================

/// Commands sent to the broadcaster actor.
///
/// Each command that expects an answer carries a oneshot channel for the
/// response. Commands are processed strictly one at a time, so a fan-out
/// never interleaves with a membership change.
#[derive(Debug)]
pub enum BroadcasterCommand {
    /// Add a participant and announce it to every member.
    ///
    /// # Errors
    /// - `HubError::AlreadyRegistered` if this participant object is a member
    /// - `HubError::HubFull` if at maximum capacity
    Register {
        participant: Arc<Participant>,
        respond_to: oneshot::Sender<Result<(), HubError>>,
    },

    /// Remove a participant and announce its departure.
    ///
    /// Responds with `false` when the participant was not a member.
    Unregister {
        participant: ParticipantId,
        respond_to: oneshot::Sender<bool>,
    },

    /// Log a notification and fan it out to every member.
    Publish {
        notification: Notification,
        respond_to: oneshot::Sender<PublishOutcome>,
    },

    /// Membership predicate.
    IsRegistered {
        participant: ParticipantId,
        respond_to: oneshot::Sender<bool>,
    },

    /// Copy of the operational log.
    GetLog {
        respond_to: oneshot::Sender<Vec<String>>,
    },

    /// Current members in registration order.
    GetMembers {
        respond_to: oneshot::Sender<Vec<MemberInfo>>,
    },
}

// ============================================================================
// Hub Errors
// ============================================================================

/// Errors that can occur during hub operations.
#[derive(Debug, Clone, Error)]
pub enum HubError {
    /// A participant tried to send while not registered.
    #[error("offline participant cannot send messages: {identity}")]
    OfflineSender {
        /// Display name of the sender
        identity: String,
    },

    /// The same participant object was registered twice.
    #[error("participant already registered: {identity}")]
    AlreadyRegistered {
        /// Display name of the participant
        identity: String,
    },

    /// The hub has reached its maximum member capacity.
    #[error("hub is full (max: {max} members)")]
    HubFull {
        /// Maximum number of members allowed
        max: usize,
    },

    /// The response channel was closed before receiving a response.
    ///
    /// This typically indicates the actor was shut down.
    #[error("response channel closed")]
    ChannelClosed,

    /// A domain error surfaced through the hub.
    #[error(transparent)]
    Core(#[from] CoreError),
}

// ============================================================================
// Hub Events
// ============================================================================

/// Events published by the hub to observers.
///
/// Observers subscribe through `BroadcasterHandle::subscribe`. Events are
/// sent after the corresponding state change, in processing order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HubEvent {
    /// A participant became a member.
    Joined {
        participant: ParticipantId,
        identity: String,
    },

    /// A participant stopped being a member.
    Left {
        participant: ParticipantId,
        identity: String,
    },

    /// A notification was logged and fanned out.
    Logged {
        /// The log line as appended
        entry: String,
        /// Number of members that received it
        recipients: usize,
    },

    /// A message from a non-member was rejected.
    Rejected {
        /// The rejection line as appended
        entry: String,
    },
}

/// Result of publishing a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishOutcome {
    /// The notification was logged and delivered to `recipients` members.
    Delivered { recipients: usize },

    /// The origin was not a member; only a rejection line was logged.
    Rejected,
}

impl PublishOutcome {
    pub fn is_delivered(&self) -> bool {
        matches!(self, Self::Delivered { .. })
    }
}

/// Read-only summary of one member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemberInfo {
    pub id: ParticipantId,
    pub identity: String,
    pub locale: String,
}

impl MemberInfo {
    pub fn from_participant(participant: &Participant) -> Self {
        Self {
            id: participant.id(),
            identity: participant.identity().to_string(),
            locale: participant.locale().name.to_string(),
        }
    }
}
