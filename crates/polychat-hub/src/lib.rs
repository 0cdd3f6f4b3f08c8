//! polychat Hub - Membership registry and notification broadcaster
//!
//! This crate provides the broadcaster that participants register with:
//! - `broadcaster` - Actor owning membership and the operational log
//! - `config` - Hub configuration and data-driven locales
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                         polychat hub                         │
//! ├──────────────────────────────────────────────────────────────┤
//! │                                                              │
//! │  ┌───────────────────┐  command   ┌────────────────────────┐  │
//! │  │ BroadcasterHandle │───────────▶│   BroadcasterActor     │  │
//! │  │  (cheap clone)    │   (mpsc)   │ members + log owner    │  │
//! │  └───────────────────┘            └───────────┬────────────┘  │
//! │                                               │               │
//! │                         fan-out (sync)        │  HubEvent     │
//! │                  ┌────────────────────────────┤  (broadcast)  │
//! │                  ▼                            ▼               │
//! │         Participant::receive          observers/subscribers   │
//! │                                                              │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Panic-Free Guarantees
//!
//! All production code in this crate follows the panic-free policy:
//! - No `.unwrap()`, `.expect()`, `panic!()`, `unreachable!()`, `todo!()`
//! - All fallible operations return `Result` or `Option`
//! - Channel operations handle closure gracefully

pub mod broadcaster;
pub mod config;

pub use broadcaster::{
    global, spawn_broadcaster, BroadcasterHandle, HubError, HubEvent, MemberInfo,
    PublishOutcome, SendMessage,
};
pub use config::{ConfigError, HubConfig, CONFIG_ENV_VAR};
