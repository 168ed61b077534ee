//! # Adapters
//!
//! Port implementations backing the routers of the simulated windows.
//!
//! - `window_graph` - `WindowHost` over a static window topology
//! - `channel` - `MessageSender` posting into the event queue
//! - `handlers` - journaling `MessageHandler`s

pub mod channel;
pub mod handlers;
pub mod window_graph;

pub use channel::{Delivery, QueueSender};
pub use handlers::{journaling_handlers, HandledMessage, JournalingHandler, MessageJournal};
pub use window_graph::{HostView, Topology, WindowGraph, WindowKey, WindowSpec};
