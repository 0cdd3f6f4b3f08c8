//! Client interface for interacting with the BroadcasterActor.
//!
//! The `BroadcasterHandle` provides a cheap-to-clone interface for sending
//! commands to the broadcaster actor and subscribing to hub events.
//!
//! # Panic-Free Guarantees
//!
//! - No `.unwrap()`, `.expect()`, `panic!()`, `unreachable!()`, `todo!()`
//! - Channel errors are mapped to `HubError::ChannelClosed`

use std::future::Future;
use std::sync::Arc;

use polychat_core::{Notification, Participant};
use tokio::sync::{broadcast, mpsc, oneshot};

use super::commands::{BroadcasterCommand, HubError, HubEvent, MemberInfo, PublishOutcome};

// ============================================================================
// Broadcaster Handle
// ============================================================================

/// Handle for interacting with the broadcaster actor.
///
/// This is a cheap-to-clone handle that can be shared across tasks and
/// threads. All methods are async and communicate with the actor via
/// channels.
///
/// # Usage
///
/// ```ignore
/// let hub = spawn_broadcaster(&HubConfig::default());
///
/// let ana = Participant::british("Ana", MemorySink::new());
/// hub.register(ana.clone()).await?;
/// hub.send_message(&ana, "hi").await?;
/// hub.unregister(&ana).await?;
///
/// for line in hub.get_log().await? {
///     println!("{line}");
/// }
/// ```
#[derive(Clone)]
pub struct BroadcasterHandle {
    /// Command sender to the actor
    sender: mpsc::Sender<BroadcasterCommand>,

    /// Event broadcaster for subscribing to updates
    event_sender: broadcast::Sender<HubEvent>,
}

impl BroadcasterHandle {
    /// Create a new broadcaster handle.
    pub fn new(
        sender: mpsc::Sender<BroadcasterCommand>,
        event_sender: broadcast::Sender<HubEvent>,
    ) -> Self {
        Self {
            sender,
            event_sender,
        }
    }

    /// Sends a command and waits for the actor's answer.
    async fn request<T>(
        &self,
        build: impl FnOnce(oneshot::Sender<T>) -> BroadcasterCommand,
    ) -> Result<T, HubError> {
        let (tx, rx) = oneshot::channel();

        self.sender
            .send(build(tx))
            .await
            .map_err(|_| HubError::ChannelClosed)?;

        rx.await.map_err(|_| HubError::ChannelClosed)
    }

    /// Register a participant and announce it to every member, itself
    /// included.
    ///
    /// # Errors
    ///
    /// - `HubError::AlreadyRegistered` if this participant object is already a member
    /// - `HubError::HubFull` if the hub is at maximum capacity
    /// - `HubError::ChannelClosed` if the actor has shut down
    pub async fn register(&self, participant: Arc<Participant>) -> Result<(), HubError> {
        self.request(|respond_to| BroadcasterCommand::Register {
            participant,
            respond_to,
        })
        .await?
    }

    /// Unregister a participant.
    ///
    /// The participant receives its own departure notification, then the
    /// remaining members do. Returns `false` if it was not a member, in
    /// which case nothing happens.
    ///
    /// # Errors
    ///
    /// - `HubError::ChannelClosed` if the actor has shut down
    pub async fn unregister(&self, participant: &Participant) -> Result<bool, HubError> {
        let id = participant.id();
        self.request(|respond_to| BroadcasterCommand::Unregister {
            participant: id,
            respond_to,
        })
        .await
    }

    /// Publish a notification to every member.
    ///
    /// A message whose origin is not a member is rejected and recorded in
    /// the log; that is reported as `PublishOutcome::Rejected`, not as an
    /// error.
    ///
    /// # Errors
    ///
    /// - `HubError::ChannelClosed` if the actor has shut down
    pub async fn publish(&self, notification: Notification) -> Result<PublishOutcome, HubError> {
        self.request(|respond_to| BroadcasterCommand::Publish {
            notification,
            respond_to,
        })
        .await
    }

    /// Send a chat message on behalf of a participant.
    ///
    /// Membership is checked first; if the participant is unregistered
    /// between that check and the publish, the hub records a rejection and
    /// this returns `Ok(PublishOutcome::Rejected)`.
    ///
    /// # Errors
    ///
    /// - `HubError::OfflineSender` if the participant is not registered
    /// - `HubError::ChannelClosed` if the actor has shut down
    pub async fn send_message(
        &self,
        participant: &Arc<Participant>,
        text: impl Into<String>,
    ) -> Result<PublishOutcome, HubError> {
        if !self.is_registered(participant).await? {
            return Err(HubError::OfflineSender {
                identity: participant.identity().to_string(),
            });
        }

        self.publish(Notification::message(participant.clone(), text))
            .await
    }

    /// Whether this participant object is currently a member.
    ///
    /// # Errors
    ///
    /// - `HubError::ChannelClosed` if the actor has shut down
    pub async fn is_registered(&self, participant: &Participant) -> Result<bool, HubError> {
        let id = participant.id();
        self.request(|respond_to| BroadcasterCommand::IsRegistered {
            participant: id,
            respond_to,
        })
        .await
    }

    /// Get a copy of the operational log.
    ///
    /// # Errors
    ///
    /// - `HubError::ChannelClosed` if the actor has shut down
    pub async fn get_log(&self) -> Result<Vec<String>, HubError> {
        self.request(|respond_to| BroadcasterCommand::GetLog { respond_to })
            .await
    }

    /// Get the current members in registration order.
    ///
    /// Returns an empty vector if communication with the actor fails.
    pub async fn members(&self) -> Vec<MemberInfo> {
        self.request(|respond_to| BroadcasterCommand::GetMembers { respond_to })
            .await
            .unwrap_or_default()
    }

    /// Subscribe to hub events.
    ///
    /// This is a synchronous operation - it doesn't communicate with the actor.
    pub fn subscribe(&self) -> broadcast::Receiver<HubEvent> {
        self.event_sender.subscribe()
    }

    /// Check if the actor is still running.
    pub fn is_connected(&self) -> bool {
        !self.sender.is_closed()
    }
}

// ============================================================================
// Participant Extension
// ============================================================================

/// Lets a participant send through a hub as `participant.send_message(&hub, text)`.
pub trait SendMessage {
    /// See [`BroadcasterHandle::send_message`].
    fn send_message(
        &self,
        hub: &BroadcasterHandle,
        text: impl Into<String> + Send,
    ) -> impl Future<Output = Result<PublishOutcome, HubError>> + Send;
}

impl SendMessage for Arc<Participant> {
    fn send_message(
        &self,
        hub: &BroadcasterHandle,
        text: impl Into<String> + Send,
    ) -> impl Future<Output = Result<PublishOutcome, HubError>> + Send {
        let hub = hub.clone();
        let participant = self.clone();
        async move { hub.send_message(&participant, text).await }
    }
}
