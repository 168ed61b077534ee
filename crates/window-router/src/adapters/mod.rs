//! # Adapters
//!
//! In-memory implementations of the stateful outbound ports.
//!
//! - `InMemoryWindowRegistry`: id → (handle, domain)
//! - `InMemoryBridgeMap`: relay → original, with provenance tracing
//! - `PassthroughBinder`: leaves payload data untouched

mod memory;

pub use memory::{InMemoryBridgeMap, InMemoryWindowRegistry, PassthroughBinder, RegisteredWindow};
