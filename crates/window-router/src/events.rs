//! Channel events and pipeline outcomes.

use crate::error::{ResolutionError, RouterError};
use shared_types::{DomainRestriction, MessageType, WindowId};
use thiserror::Error;

/// A normalized inbound channel event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChannelEvent<H> {
    /// Sending window. `None` when the host could not read it.
    pub source: Option<H>,
    /// Origin the channel attributes to the sender.
    pub origin: String,
    /// Raw textual payload.
    pub data: String,
}

impl<H> ChannelEvent<H> {
    pub fn new(source: H, origin: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            source: Some(source),
            origin: origin.into(),
            data: data.into(),
        }
    }
}

/// An inbound event as some hosts deliver it, including legacy shapes where
/// the sender sits in `source_element` and the origin in the wrapped
/// original event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawChannelEvent<H> {
    pub source: Option<H>,
    pub source_element: Option<H>,
    pub origin: Option<String>,
    pub original_event_origin: Option<String>,
    pub data: String,
}

impl<H> RawChannelEvent<H> {
    /// Collapse legacy shapes into a `ChannelEvent`.
    pub fn normalize(self) -> ChannelEvent<H> {
        let origin = self
            .origin
            .filter(|o| !o.is_empty())
            .or(self.original_event_origin)
            .unwrap_or_default();

        ChannelEvent {
            source: self.source.or(self.source_element),
            origin,
            data: self.data,
        }
    }
}

/// Why an event was dropped without a diagnostic.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DropReason {
    /// The event's source could not be read.
    NoSource,
    /// Not JSON, or not an envelope.
    Malformed,
    /// Missing or unrecognized `type`, or no handler for it.
    UnrecognizedType,
    /// The message id was already observed.
    Duplicate,
}

/// Why a valid, authenticated message was not delivered.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum Diagnostic {
    #[error("{0}")]
    TargetUnresolved(ResolutionError),

    #[error("{0}")]
    SourceUnresolved(ResolutionError),

    #[error("Target window is closed: {target:?} - can not proxy {message_type} {name:?}")]
    TargetClosed {
        target: Option<WindowId>,
        message_type: MessageType,
        name: Option<String>,
    },

    #[error("Source window is closed: {window} - can not send {message_type} {name:?}")]
    SourceClosed {
        window: WindowId,
        message_type: MessageType,
        name: Option<String>,
    },
}

/// Terminal outcome of a non-fatal pipeline run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReceiveOutcome {
    /// Delivered to the local handler for `message_type`.
    Dispatched {
        message_id: String,
        message_type: MessageType,
    },
    /// Forwarded toward another window.
    Forwarded {
        message_id: String,
        target: Option<WindowId>,
        restriction: DomainRestriction,
    },
    /// Silently dropped.
    Dropped(DropReason),
    /// Halted with a diagnostic.
    Halted(Diagnostic),
}

impl ReceiveOutcome {
    /// Whether the message reached a handler or was forwarded.
    pub fn is_delivered(&self) -> bool {
        matches!(
            self,
            ReceiveOutcome::Dispatched { .. } | ReceiveOutcome::Forwarded { .. }
        )
    }
}

/// Result of one pipeline run. `Err` is reserved for fatal protocol violations.
pub type ReceiveResult = Result<ReceiveOutcome, RouterError>;
