//! Port definitions for the window router.
//!
//! - `inbound`: the entry point a host calls once per channel event
//! - `outbound`: everything the router needs from its host environment

pub mod inbound;
pub mod outbound;

pub use inbound::ChannelReceiver;
pub use outbound::{
    BridgeMap, CallableBinder, MessageSender, WindowAccessError, WindowHandle, WindowHost,
    WindowRegistry,
};
