//! polychat Core - Shared types for the multilingual chat hub
//!
//! This crate provides the domain types shared between the broadcaster
//! (`polychat-hub`) and the demo binary:
//! - `notification` - Immutable event records (message, join, departure)
//! - `participant` - Chat users, their private history and rendering rules
//! - `locale` - Phrase tables for second- and third-person rendering
//! - `sink` - Write-only line destinations for a participant's display
//!
//! All code follows the panic-free policy: no `.unwrap()`, `.expect()`,
//! `panic!()`, `unreachable!()`, `todo!()`, or direct indexing `[i]`.

pub mod error;
pub mod locale;
pub mod notification;
pub mod participant;
pub mod sink;

// Re-exports for convenience
pub use error::{CoreError, CoreResult};
pub use locale::{Locale, Person};
pub use notification::{Notification, NotificationKind};
pub use participant::{Participant, ParticipantId};
pub use sink::{MemorySink, NullSink, Sink, WriterSink};
