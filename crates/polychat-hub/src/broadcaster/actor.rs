//! Broadcaster actor - owns membership and the operational log.
//!
//! The BroadcasterActor is the single owner of hub state. It receives
//! commands via an mpsc channel, delivers notifications synchronously to
//! every member, and publishes hub events via broadcast.
//!
//! # Panic-Free Guarantees
//!
//! - No `.unwrap()`, `.expect()`, `panic!()`, `unreachable!()`, `todo!()`
//! - Channel send failures are ignored or logged, never unwrapped
//! - A member that fails to render is logged and skipped

use std::sync::Arc;

use polychat_core::{Notification, NotificationKind, Participant, ParticipantId};
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, info, warn};

use super::commands::{BroadcasterCommand, HubError, HubEvent, MemberInfo, PublishOutcome};

// ============================================================================
// Broadcaster Actor
// ============================================================================

/// The broadcaster actor - owns all hub state.
///
/// # Ownership
///
/// The actor owns:
/// - `members`: registered participants in registration order
/// - `log`: append-only operational log
///
/// Members are held by `Arc`; the actor never drops a participant's last
/// reference on purpose, it only stops delivering to it.
///
/// # Thread Safety
///
/// The actor processes commands sequentially, so each public hub operation
/// is an atomic critical section.
pub struct BroadcasterActor {
    /// Command receiver
    receiver: mpsc::Receiver<BroadcasterCommand>,

    /// Registered participants, in registration order
    members: Vec<Arc<Participant>>,

    /// Operational log, one line per published notification or rejection
    log: Vec<String>,

    /// Registration capacity, unbounded when `None`
    max_members: Option<usize>,

    /// Event publisher for observers
    event_publisher: broadcast::Sender<HubEvent>,
}

impl BroadcasterActor {
    /// Creates a new broadcaster actor.
    pub fn new(
        receiver: mpsc::Receiver<BroadcasterCommand>,
        event_publisher: broadcast::Sender<HubEvent>,
        max_members: Option<usize>,
    ) -> Self {
        Self {
            receiver,
            members: Vec::new(),
            log: Vec::with_capacity(50),
            max_members,
            event_publisher,
        }
    }

    /// Runs the actor event loop on the calling thread.
    ///
    /// Sinks are written synchronously during fan-out, so the loop blocks
    /// while they do. Processes commands until the channel closes (all
    /// handles dropped). Must not be called from within an async context.
    pub fn run_blocking(mut self) {
        info!("Broadcaster actor starting");

        while let Some(cmd) = self.receiver.blocking_recv() {
            self.handle_command(cmd);
        }

        info!(
            members = self.members.len(),
            log_entries = self.log.len(),
            "Broadcaster actor stopped"
        );
    }

    /// Dispatches a command to the appropriate handler.
    fn handle_command(&mut self, cmd: BroadcasterCommand) {
        match cmd {
            BroadcasterCommand::Register {
                participant,
                respond_to,
            } => {
                let result = self.handle_register(participant);
                // Ignore send error - client may have dropped the receiver
                let _ = respond_to.send(result);
            }
            BroadcasterCommand::Unregister {
                participant,
                respond_to,
            } => {
                let result = self.handle_unregister(participant);
                let _ = respond_to.send(result);
            }
            BroadcasterCommand::Publish {
                notification,
                respond_to,
            } => {
                let result = self.handle_publish(&notification);
                let _ = respond_to.send(result);
            }
            BroadcasterCommand::IsRegistered {
                participant,
                respond_to,
            } => {
                let _ = respond_to.send(self.is_member(participant));
            }
            BroadcasterCommand::GetLog { respond_to } => {
                let _ = respond_to.send(self.log.clone());
            }
            BroadcasterCommand::GetMembers { respond_to } => {
                let members = self
                    .members
                    .iter()
                    .map(|p| MemberInfo::from_participant(p))
                    .collect();
                let _ = respond_to.send(members);
            }
        }
    }

    // ========================================================================
    // Command Handlers
    // ========================================================================

    /// Handles registration.
    ///
    /// The new member is added before the join notification is published,
    /// so it sees its own arrival in second person.
    fn handle_register(&mut self, participant: Arc<Participant>) -> Result<(), HubError> {
        if self.is_member(participant.id()) {
            warn!(
                participant = %participant.identity(),
                id = %participant.id(),
                "Participant already registered, rejecting registration"
            );
            return Err(HubError::AlreadyRegistered {
                identity: participant.identity().to_string(),
            });
        }

        if let Some(max) = self.max_members {
            if self.members.len() >= max {
                warn!(
                    participant = %participant.identity(),
                    current = self.members.len(),
                    max,
                    "Hub is full, rejecting registration"
                );
                return Err(HubError::HubFull { max });
            }
        }

        self.members.push(participant.clone());

        info!(
            participant = %participant.identity(),
            id = %participant.id(),
            locale = %participant.locale(),
            members = self.members.len(),
            "Participant registered"
        );

        let _ = self.event_publisher.send(HubEvent::Joined {
            participant: participant.id(),
            identity: participant.identity().to_string(),
        });

        self.handle_publish(&Notification::joined(participant));
        Ok(())
    }

    /// Handles deregistration.
    ///
    /// The departing participant is removed first, receives its own
    /// departure directly, and then the same notification is published to
    /// the remaining members. It therefore sees the departure exactly once.
    fn handle_unregister(&mut self, id: ParticipantId) -> bool {
        let Some(index) = self.members.iter().position(|p| p.id() == id) else {
            debug!(id = %id, "Unregister for non-member ignored");
            return false;
        };

        let participant = self.members.remove(index);

        info!(
            participant = %participant.identity(),
            id = %id,
            members = self.members.len(),
            "Participant unregistered"
        );

        let notification = Notification::left(participant.clone());
        Self::deliver(&participant, &notification);

        let _ = self.event_publisher.send(HubEvent::Left {
            participant: id,
            identity: participant.identity().to_string(),
        });

        self.handle_publish(&notification);
        true
    }

    /// Logs a notification and delivers it to every member.
    ///
    /// Messages from non-members are not delivered; a rejection line is
    /// logged instead. Nothing else is touched on that path.
    fn handle_publish(&mut self, notification: &Notification) -> PublishOutcome {
        let origin = notification.origin();

        if notification.kind() == NotificationKind::NewMessage && !self.is_member(origin.id()) {
            let entry = format!(
                "Unregistered user {} tried to broadcast a message.",
                origin.identity()
            );
            warn!(
                participant = %origin.identity(),
                id = %origin.id(),
                "Rejected message from unregistered participant"
            );
            self.log.push(entry.clone());
            let _ = self.event_publisher.send(HubEvent::Rejected { entry });
            return PublishOutcome::Rejected;
        }

        let entry = notification.render();
        self.log.push(entry.clone());

        for member in &self.members {
            Self::deliver(member, notification);
        }
        let recipients = self.members.len();

        debug!(
            origin = %origin.identity(),
            kind = %notification.kind(),
            recipients = recipients,
            "Notification published"
        );

        let _ = self.event_publisher.send(HubEvent::Logged { entry, recipients });
        PublishOutcome::Delivered { recipients }
    }

    /// Delivers one notification to one participant.
    fn deliver(member: &Participant, notification: &Notification) {
        if let Err(e) = member.receive(notification) {
            warn!(
                participant = %member.identity(),
                id = %member.id(),
                error = %e,
                "Participant could not render notification"
            );
        }
    }

    fn is_member(&self, id: ParticipantId) -> bool {
        self.members.iter().any(|p| p.id() == id)
    }
}
