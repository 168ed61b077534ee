//! # Error Types
//!
//! Errors produced while turning channel payloads into envelopes.

use thiserror::Error;

/// Why a raw channel payload is not an in-protocol envelope.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DecodeError {
    /// Not JSON, or JSON that does not form an envelope.
    #[error("Malformed payload: {0}")]
    Malformed(String),

    /// No string `type` field.
    #[error("Payload has no message type")]
    MissingType,

    /// `type` is not one of the recognized kinds.
    #[error("Unrecognized message type: {0}")]
    UnknownType(String),
}
