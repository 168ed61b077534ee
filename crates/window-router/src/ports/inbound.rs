//! Inbound port (API) for the window router.

use crate::events::{ChannelEvent, RawChannelEvent, ReceiveResult};

/// Entry point exposed to the host environment.
///
/// Invoked once per inbound channel event, synchronously, in arrival order.
pub trait ChannelReceiver<H>: Send + Sync {
    /// Run the receive pipeline for a normalized channel event.
    fn on_channel_event(&self, event: ChannelEvent<H>) -> ReceiveResult;

    /// Normalize a raw (possibly legacy-shaped) event, then receive it.
    fn on_raw_event(&self, raw: RawChannelEvent<H>) -> ReceiveResult {
        self.on_channel_event(raw.normalize())
    }
}
