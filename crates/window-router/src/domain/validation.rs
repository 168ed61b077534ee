//! Envelope validation.
//!
//! The channel carries many messages that have nothing to do with this
//! protocol, so every rejection here is a silent drop.

use crate::events::DropReason;
use shared_types::{DecodeError, MessageEnvelope, MessageType};

/// Decode a raw payload into an envelope whose type is recognized.
///
/// `recognize` is the injected recognized-type table; whatever it returns for
/// the envelope's type (typically the handler) is passed back with it.
pub fn validate_payload<R>(
    raw: &str,
    recognize: impl FnOnce(MessageType) -> Option<R>,
) -> Result<(MessageEnvelope, R), DropReason> {
    let envelope = MessageEnvelope::decode(raw).map_err(|e| match e {
        DecodeError::Malformed(_) => DropReason::Malformed,
        DecodeError::MissingType | DecodeError::UnknownType(_) => DropReason::UnrecognizedType,
    })?;

    let recognized = recognize(envelope.message_type).ok_or(DropReason::UnrecognizedType)?;
    Ok((envelope, recognized))
}
