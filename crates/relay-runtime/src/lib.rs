//! # Relay Runtime Library
//!
//! Simulated multi-window environment for the message router. Exposes the
//! runtime's modules for testing; the entry point is the `main.rs` binary.
//!
//! ## Modules
//!
//! - `adapters/` - window graph, queue-backed sender, journaling handlers
//! - `event_loop` - single-consumer loop owning one router per window
//! - `config` - environment-driven runtime configuration

#![allow(clippy::type_complexity)]

pub mod adapters;
pub mod config;
pub mod error;
pub mod event_loop;

pub use adapters::{HandledMessage, MessageJournal, Topology, WindowGraph, WindowKey, WindowSpec};
pub use config::RuntimeConfig;
pub use error::{ConfigError, RuntimeError, TopologyError};
pub use event_loop::{EventLoop, InboundEvent, LoopStats, WindowRouter};
