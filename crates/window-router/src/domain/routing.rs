//! Proxy/local selection and receive logging.
//!
//! Selection consumes relation hints from the envelope: a hint is relay-local
//! and must not reach the eventual recipient.

use crate::config::RouterConfig;
use shared_types::{MessageEnvelope, MessageType, WindowId};
use tracing::{debug, error, info};

/// How the proxy target of a message should be located.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TargetSelection {
    /// Walk a relation hint (already removed from the envelope).
    Hint {
        hint: String,
        reference: Option<WindowId>,
    },
    /// Look the target up in the registry.
    Registered(WindowId),
    /// No proxy target: deliver locally.
    Local,
}

/// Pick how to locate the proxy target, consuming `targetHint`.
pub fn select_target(envelope: &mut MessageEnvelope, own_id: &WindowId) -> TargetSelection {
    if let Some(hint) = envelope.target_hint.take() {
        return TargetSelection::Hint {
            hint,
            reference: envelope.target.clone(),
        };
    }

    match &envelope.target {
        Some(target) if target != own_id => TargetSelection::Registered(target.clone()),
        _ => TargetSelection::Local,
    }
}

/// How the original source of a locally delivered message should be located.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SourceSelection {
    /// The immediate sender is the original source.
    Immediate,
    /// Walk a relation hint (already removed from the envelope).
    Hint { hint: String, reference: WindowId },
    /// Look the original source up in the registry.
    Registered(WindowId),
}

/// Pick how to locate the original source, consuming `sourceHint` when used.
pub fn select_original_source(envelope: &mut MessageEnvelope) -> SourceSelection {
    if !envelope.is_relayed() {
        return SourceSelection::Immediate;
    }

    let original = envelope.original_source().clone();
    match envelope.source_hint.take() {
        Some(hint) => SourceSelection::Hint {
            hint,
            reference: original,
        },
        None => SourceSelection::Registered(original),
    }
}

/// Level a received message is logged at.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReceiveLogLevel {
    Debug,
    Info,
    Error,
}

/// Protocol chatter and relayed traffic is debug, failed acks are errors,
/// everything else is info.
pub fn classify_receive(
    envelope: &MessageEnvelope,
    proxied: bool,
    config: &RouterConfig,
) -> ReceiveLogLevel {
    let internal = envelope
        .name
        .as_deref()
        .is_some_and(|name| config.is_internal_name(name));

    if internal || envelope.message_type == MessageType::Ack || proxied {
        ReceiveLogLevel::Debug
    } else if envelope.is_error_ack() {
        ReceiveLogLevel::Error
    } else {
        ReceiveLogLevel::Info
    }
}

/// Emit the receive log line for `envelope`.
pub fn log_receive(level: ReceiveLogLevel, envelope: &MessageEnvelope, proxied: bool) {
    let tag = if proxied { "#receiveproxy" } else { "#receive" };
    let name = envelope.name.as_deref().unwrap_or_default();
    let message_type = envelope.message_type.as_wire();
    let id = envelope.id.as_str();
    let source = envelope.source.as_str();

    match level {
        ReceiveLogLevel::Debug => debug!(tag, message_type, name, id, source, "Message received"),
        ReceiveLogLevel::Info => info!(tag, message_type, name, id, source, "Message received"),
        ReceiveLogLevel::Error => error!(tag, message_type, name, id, source, "Message received"),
    }
}
