//! Outbound ports (SPI) for the window router.
//!
//! Implemented by the host: the browser binding in production, the
//! simulated window graph in `relay-runtime`.

use crate::error::SendError;
use serde_json::Value;
use shared_types::{DomainRestriction, MessageEnvelope, WindowId};
use std::collections::HashSet;
use std::fmt;
use std::hash::Hash;
use thiserror::Error;

/// Anything usable as a window handle.
pub trait WindowHandle: Clone + Eq + Hash + fmt::Debug + Send + Sync + 'static {}

impl<T> WindowHandle for T where T: Clone + Eq + Hash + fmt::Debug + Send + Sync + 'static {}

/// The host refused access to a window property (e.g. cross-origin denial).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{0}")]
pub struct WindowAccessError(pub String);

/// The window environment the router runs inside.
pub trait WindowHost: Send + Sync {
    /// Opaque reference to a window.
    type Handle: WindowHandle;

    /// The receiving window.
    fn current_window(&self) -> Self::Handle;

    /// Id the receiving window uses for itself in envelopes.
    fn current_window_id(&self) -> WindowId;

    /// Parent frame of `window`, if any.
    fn parent(&self, window: &Self::Handle) -> Result<Option<Self::Handle>, WindowAccessError>;

    /// Window that opened `window`, if any.
    fn opener(&self, window: &Self::Handle) -> Result<Option<Self::Handle>, WindowAccessError>;

    /// Whether `window` has been closed.
    fn is_closed(&self, window: &Self::Handle) -> bool;

    /// Capability check: `window` shares the receiving window's origin.
    fn is_same_origin(&self, window: &Self::Handle) -> bool;

    /// Domain of a same-origin window, read directly from the window.
    fn domain_of(&self, window: &Self::Handle) -> Result<String, WindowAccessError>;
}

/// Outbound send primitive.
pub trait MessageSender<H>: Send + Sync {
    /// Serialize `envelope` and deliver it to `target`.
    ///
    /// `proxied` marks a relay forwarding on behalf of another window.
    fn send(
        &self,
        target: &H,
        envelope: MessageEnvelope,
        restriction: DomainRestriction,
        proxied: bool,
    ) -> Result<(), SendError>;
}

/// Window id → (handle, domain) storage. The router never evicts.
pub trait WindowRegistry<H>: Send + Sync {
    /// Remember `handle` as the window named `id` at `domain`.
    fn register(&self, id: &WindowId, handle: H, domain: &str);

    /// Look up a window by id.
    fn lookup(&self, id: &WindowId) -> Option<H>;
}

/// Relay → original-window bookkeeping.
pub trait BridgeMap<H>: Send + Sync {
    /// Record that `relay` forwards on behalf of `original`.
    fn record(&self, relay: H, original: H);

    /// The window `relay` was last recorded as forwarding for.
    fn original_for(&self, relay: &H) -> Option<H>;

    /// Follow bridges from `relay` to the window at the end of the chain.
    ///
    /// Returns `relay` itself when it is not bridging. Stops at the first
    /// repeated window if the recorded chain loops.
    fn trace_origin(&self, relay: &H) -> H
    where
        H: WindowHandle,
    {
        let mut visited = HashSet::new();
        let mut current = relay.clone();

        while let Some(next) = self.original_for(&current) {
            if !visited.insert(current.clone()) {
                break;
            }
            current = next;
        }

        current
    }
}

/// Rehydrates callable references embedded in payload data.
pub trait CallableBinder<H>: Send + Sync {
    /// Bind every callable reference in `data` to `window`.
    fn bind_callables(&self, window: &H, data: Value) -> Value;
}
