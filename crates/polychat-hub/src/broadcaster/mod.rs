//! Notification broadcaster using Actor pattern.
//!
//! The broadcaster is the central state manager of the chat: it owns the set
//! of registered participants and the operational log. It receives commands
//! via a tokio mpsc channel and fans notifications out synchronously to every
//! member.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐     ┌──────────────────┐     ┌──────────────────────┐
//! │   Participant   │────▶│ BroadcasterActor │────▶│ Participant::receive │
//! └─────────────────┘     └──────────────────┘     └──────────────────────┘
//!         │                        │                          │
//!         │  BroadcasterCommand    │   HubEvent (broadcast)   │
//!         │  (mpsc channel)        │                          │
//!         ▼                        ▼                          ▼
//!  register/unregister      Vec<Arc<Participant>>      history + sink
//!  publish/send_message     + operational log          per participant
//! ```
//!
//! # Instances
//!
//! - [`spawn_broadcaster`] creates an independent hub. Prefer this and pass
//!   the handle around.
//! - [`global`] returns the process-wide hub, created on first use.
//!
//! Either way the actor runs on its own OS thread. Fan-out writes to sinks
//! synchronously, and that blocking I/O stays off the tokio workers.

use std::sync::OnceLock;
use std::thread;

use tokio::sync::{broadcast, mpsc};
use tracing::{error, warn};

use crate::config::HubConfig;

mod actor;
mod commands;
mod handle;

pub use actor::BroadcasterActor;
pub use commands::{BroadcasterCommand, HubError, HubEvent, MemberInfo, PublishOutcome};
pub use handle::{BroadcasterHandle, SendMessage};

/// Process-wide broadcaster, created on first call to [`global`].
static GLOBAL: OnceLock<BroadcasterHandle> = OnceLock::new();

/// Builds the channels and actor for a hub without starting it.
fn build(config: &HubConfig) -> (BroadcasterHandle, BroadcasterActor) {
    // Zero-capacity channels panic on creation
    let (cmd_tx, cmd_rx) = mpsc::channel(config.command_buffer.max(1));
    let (event_tx, _) = broadcast::channel(config.event_buffer.max(1));

    let actor = BroadcasterActor::new(cmd_rx, event_tx.clone(), config.max_members);
    let handle = BroadcasterHandle::new(cmd_tx, event_tx);

    (handle, actor)
}

/// Starts the actor on a dedicated thread and returns its handle.
///
/// If the thread cannot be spawned the actor is dropped, and the handle
/// reports `ChannelClosed` on every call.
fn start(config: &HubConfig) -> BroadcasterHandle {
    let (handle, actor) = build(config);
    let spawned = thread::Builder::new()
        .name("polychat-broadcaster".to_string())
        .spawn(move || actor.run_blocking());

    if let Err(e) = spawned {
        error!(error = %e, "Failed to start broadcaster thread");
    }

    handle
}

/// Spawn a broadcaster actor and return a handle for interaction.
///
/// The actor runs on a dedicated thread until every handle is dropped.
/// The handle itself is async and works from any tokio runtime.
///
/// # Example
///
/// ```no_run
/// use polychat_core::{MemorySink, Participant};
/// use polychat_hub::{spawn_broadcaster, HubConfig};
///
/// #[tokio::main]
/// async fn main() {
///     let hub = spawn_broadcaster(&HubConfig::default());
///     let ana = Participant::british("Ana", MemorySink::new());
///     let _ = hub.register(ana).await;
/// }
/// ```
pub fn spawn_broadcaster(config: &HubConfig) -> BroadcasterHandle {
    start(config)
}

/// Returns the process-wide broadcaster, creating it on first call.
///
/// Concurrent first calls create exactly one instance. The handle stays
/// usable from any runtime for the life of the process. Configuration is
/// read once from [`HubConfig::from_env`], falling back to defaults.
pub fn global() -> BroadcasterHandle {
    GLOBAL
        .get_or_init(|| {
            let config = HubConfig::from_env().unwrap_or_else(|e| {
                warn!(error = %e, "Invalid hub configuration, using defaults");
                HubConfig::default()
            });
            start(&config)
        })
        .clone()
}
