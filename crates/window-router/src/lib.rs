//! # Window Router
//!
//! Receive pipeline for envelope-wrapped messages delivered over a
//! cross-window channel.
//!
//! ## Architecture
//!
//! ```text
//! ChannelEvent ──→ Validator ──→ Replay Guard ──→ Origin Authenticator
//!                                                        │
//!                                                        ↓
//!                                              Routing Decision Engine
//!                                                 │               │
//!                                       proxy ────┘               └──── local
//!                                         ↓                               ↓
//!                                 MessageSender::send             Dispatch Gate
//!                                                                         ↓
//!                                                                 MessageHandler
//! ```
//!
//! This crate follows Hexagonal Architecture (Ports & Adapters):
//!
//! - **Domain Layer** (`domain/`): relation resolution, payload validation,
//!   replay guard, origin rules, routing selection, session state
//! - **Ports Layer** (`ports/`): `ChannelReceiver` (driving) and the host,
//!   sender, registry, bridge and binder traits (driven)
//! - **Adapters Layer** (`adapters/`): in-memory registry and bridge map
//! - **Handler Layer** (`handler/`): type-keyed dispatch table
//! - **Service Layer** (`service.rs`): `MessageRouter`, the pipeline itself
//!
//! ## Error Taxonomy
//!
//! - Silent drop → `Ok(ReceiveOutcome::Dropped(_))`
//! - Diagnosed halt → `Ok(ReceiveOutcome::Halted(_))`
//! - Protocol violation → `Err(RouterError)`

// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

pub mod adapters;
pub mod config;
pub mod domain;
pub mod error;
pub mod events;
pub mod handler;
pub mod ports;
pub mod service;

#[cfg(test)]
mod test_support;

pub use adapters::{InMemoryBridgeMap, InMemoryWindowRegistry, PassthroughBinder};
pub use config::RouterConfig;
pub use domain::{ReplayGuard, SessionState};
pub use error::{ConfigError, DomainClaim, HandlerError, ResolutionError, RouterError, SendError};
pub use events::{ChannelEvent, Diagnostic, DropReason, RawChannelEvent, ReceiveOutcome, ReceiveResult};
pub use handler::{FnHandler, HandlerTable, MessageHandler};
pub use ports::inbound::ChannelReceiver;
pub use ports::outbound::{
    BridgeMap, CallableBinder, MessageSender, WindowAccessError, WindowHandle, WindowHost,
    WindowRegistry,
};
pub use service::MessageRouter;
