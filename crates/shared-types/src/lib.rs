//! # Shared Types Crate
//!
//! This crate contains the window identities, the `MessageEnvelope` wire
//! format, and the domain rules shared by the router and its hosts.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: The envelope layout is defined here and only here.
//! - **Envelope Authority**: `sourceDomain` is a claim; it is only trusted once
//!   the router has matched it against the channel-observed origin.
//! - **Relay-Local Hints**: `targetHint`/`sourceHint` never travel past the
//!   relay that consumed them.

pub mod entities;
pub mod envelope;
pub mod errors;
pub mod security;

pub use entities::*;
pub use envelope::{MessageEnvelope, MessageType};
pub use errors::*;
pub use security::*;
