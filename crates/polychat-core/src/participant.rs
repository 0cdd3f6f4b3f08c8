//! Chat participants and their rendering rules.

use crate::{CoreError, CoreResult, Locale, Notification, NotificationKind, Person, Sink};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{trace, warn};

// ============================================================================
// Type-Safe Identifiers
// ============================================================================

/// Process-unique identifier of a participant object.
///
/// Membership is tracked by this id, never by display name: two
/// participants called "Ana" are two distinct members.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticipantId(u64);

static NEXT_PARTICIPANT_ID: AtomicU64 = AtomicU64::new(1);

impl ParticipantId {
    /// Allocates the next unused id.
    fn next() -> Self {
        Self(NEXT_PARTICIPANT_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "p{}", self.0)
    }
}

// ============================================================================
// Participant
// ============================================================================

/// A chat user with its own locale, private history and display sink.
///
/// Participants are always handled through `Arc` so the broadcaster and
/// in-flight notifications can refer to them without owning them.
///
/// # Rendering
///
/// Every notification is rendered from the viewer's point of view:
///
/// | Kind         | Template                    |
/// |--------------|-----------------------------|
/// | `NewMessage` | `"{subject} {said}: {text}"`|
/// | `UserJoined` | `"{subject} {joined}"`      |
/// | `UserLeft`   | `"{origin} {left}"`         |
///
/// When the viewer is the origin, the subject is the locale's pronoun and
/// the second-person phrase is used; otherwise the subject is the origin's
/// display name with the third-person phrase. Departures always use the
/// origin's display name as subject, even for the departing viewer.
pub struct Participant {
    id: ParticipantId,
    identity: String,
    locale: Locale,
    history: Mutex<Vec<String>>,
    sink: Box<dyn Sink>,
}

impl Participant {
    /// Creates a participant with a fresh id.
    pub fn new(identity: impl Into<String>, locale: Locale, sink: impl Sink + 'static) -> Arc<Self> {
        Arc::new(Self {
            id: ParticipantId::next(),
            identity: identity.into(),
            locale,
            history: Mutex::new(Vec::with_capacity(100)),
            sink: Box::new(sink),
        })
    }

    /// Participant rendering in Mexican Spanish.
    pub fn mexican(identity: impl Into<String>, sink: impl Sink + 'static) -> Arc<Self> {
        Self::new(identity, Locale::mexican(), sink)
    }

    /// Participant rendering in Peninsular Spanish.
    pub fn spanish(identity: impl Into<String>, sink: impl Sink + 'static) -> Arc<Self> {
        Self::new(identity, Locale::spanish(), sink)
    }

    /// Participant rendering in British English.
    pub fn british(identity: impl Into<String>, sink: impl Sink + 'static) -> Arc<Self> {
        Self::new(identity, Locale::british(), sink)
    }

    pub fn id(&self) -> ParticipantId {
        self.id
    }

    pub fn identity(&self) -> &str {
        &self.identity
    }

    pub fn locale(&self) -> &Locale {
        &self.locale
    }

    /// Returns a copy of every line this participant has rendered so far.
    pub fn history(&self) -> Vec<String> {
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Renders a notification, records it in the history and writes it to
    /// the sink.
    ///
    /// Returns the rendered line. A failing sink is logged and does not
    /// prevent the line from being recorded.
    ///
    /// # Errors
    ///
    /// - `CoreError::UnsupportedNotification` if the kind has no rendering
    ///   branch; nothing is recorded in that case
    pub fn receive(&self, notification: &Notification) -> CoreResult<String> {
        let line = self.render(notification)?;

        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(line.clone());

        if let Err(e) = self.sink.write_line(&line) {
            warn!(
                participant = %self.identity,
                id = %self.id,
                error = %e,
                "Failed to write to participant sink"
            );
        }

        trace!(participant = %self.identity, line = %line, "Notification rendered");
        Ok(line)
    }

    /// Renders a notification without recording it.
    #[allow(unreachable_patterns)]
    pub fn render(&self, notification: &Notification) -> CoreResult<String> {
        let origin = notification.origin();
        let person = self.person_for(origin);
        let subject: &str = match person {
            Person::Second => &self.locale.pronoun,
            Person::Third => origin.identity(),
        };

        match notification.kind() {
            NotificationKind::NewMessage => Ok(format!(
                "{} {}: {}",
                subject,
                self.locale.said(person),
                notification.payload()
            )),
            NotificationKind::UserJoined => {
                Ok(format!("{} {}", subject, self.locale.joined(person)))
            }
            NotificationKind::UserLeft => Ok(format!(
                "{} {}",
                origin.identity(),
                self.locale.left(person)
            )),
            kind => Err(CoreError::UnsupportedNotification { kind }),
        }
    }

    fn person_for(&self, origin: &Participant) -> Person {
        if origin.id == self.id {
            Person::Second
        } else {
            Person::Third
        }
    }
}

impl fmt::Debug for Participant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Participant")
            .field("id", &self.id)
            .field("identity", &self.identity)
            .field("locale", &self.locale.name)
            .finish_non_exhaustive()
    }
}
