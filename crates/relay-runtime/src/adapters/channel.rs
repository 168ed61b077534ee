//! Channel send primitive over the runtime's event queue.
//!
//! A send never delivers directly: it enqueues a `Delivery` that the event
//! loop hands to the target window's router later, with the sending window's
//! domain as the observed origin. Proxied sends are restamped with the
//! relay's id and domain as the immediate sender.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use shared_types::{DomainRestriction, MessageEnvelope};
use tokio::sync::mpsc;
use tracing::{debug, trace};
use window_router::{ChannelEvent, MessageSender, SendError};

use super::window_graph::{WindowGraph, WindowKey};

/// A channel event waiting for its target window.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Delivery {
    pub target: WindowKey,
    pub event: ChannelEvent<WindowKey>,
}

/// `MessageSender` for one window, posting into the shared queue.
pub struct QueueSender {
    graph: Arc<WindowGraph>,
    from: WindowKey,
    queue: mpsc::UnboundedSender<Delivery>,
    discarded: AtomicU64,
}

impl QueueSender {
    pub fn new(
        graph: Arc<WindowGraph>,
        from: WindowKey,
        queue: mpsc::UnboundedSender<Delivery>,
    ) -> Self {
        Self {
            graph,
            from,
            queue,
            discarded: AtomicU64::new(0),
        }
    }

    /// Sends dropped because the target's domain failed the restriction.
    pub fn discarded(&self) -> u64 {
        self.discarded.load(Ordering::Relaxed)
    }
}

impl MessageSender<WindowKey> for QueueSender {
    fn send(
        &self,
        target: &WindowKey,
        envelope: MessageEnvelope,
        restriction: DomainRestriction,
        proxied: bool,
    ) -> Result<(), SendError> {
        let target_domain = self
            .graph
            .domain(*target)
            .ok_or_else(|| SendError::new(format!("unknown window {target}")))?;

        // The channel silently discards sends whose target fails the restriction.
        if !restriction.permits(target_domain) {
            debug!(
                id = %envelope.id,
                to = %target,
                %restriction,
                target_domain,
                "Discarding send: target domain does not match"
            );
            self.discarded.fetch_add(1, Ordering::Relaxed);
            return Ok(());
        }

        let origin = self
            .graph
            .domain(self.from)
            .ok_or_else(|| SendError::new(format!("unknown window {}", self.from)))?
            .to_string();

        // A relay hop is sent as the relaying window.
        let envelope = if proxied {
            let relay = self
                .graph
                .id_of(self.from)
                .ok_or_else(|| SendError::new(format!("unknown window {}", self.from)))?
                .clone();
            envelope.relayed_by(relay, origin.clone())
        } else {
            envelope
        };

        let data = envelope
            .encode()
            .map_err(|e| SendError::new(format!("encode failed: {e}")))?;

        trace!(id = %envelope.id, from = %self.from, to = %target, proxied, "Enqueueing send");

        self.queue
            .send(Delivery {
                target: *target,
                event: ChannelEvent::new(self.from, origin, data),
            })
            .map_err(|_| SendError::new("event queue is closed"))
    }
}
