//! Error types for the window router.

use shared_types::{MessageType, WindowId};
use std::fmt;
use thiserror::Error;

/// A relation hint could not be turned into a window.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ResolutionError {
    #[error("Can not get {hint}: unrecognized window hint")]
    UnknownHint { hint: String },

    #[error("Can not get {hint}: {reason}")]
    AccessDenied { hint: String, reason: String },

    #[error("Can not get {hint}: not available")]
    NotAvailable { hint: String },
}

/// Which domain claim of an envelope failed authentication.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DomainClaim {
    /// `sourceDomain`
    Source,
    /// `originalSourceDomain`
    OriginalSource,
}

impl fmt::Display for DomainClaim {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DomainClaim::Source => f.write_str("source"),
            DomainClaim::OriginalSource => f.write_str("original source"),
        }
    }
}

/// Failure reported by a message handler.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{0}")]
pub struct HandlerError(pub String);

impl HandlerError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self(reason.into())
    }
}

/// Failure reported by the outbound send primitive.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{0}")]
pub struct SendError(pub String);

impl SendError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self(reason.into())
    }
}

/// Fatal pipeline errors. These indicate protocol violations or spoofing and
/// are surfaced to the host rather than swallowed.
#[derive(Debug, Error)]
pub enum RouterError {
    #[error("Message {claim} domain {claimed} does not match message origin {observed}")]
    OriginMismatch {
        claim: DomainClaim,
        claimed: String,
        observed: String,
    },

    #[error("Unable to find window to proxy message to: {0}")]
    TargetNotFound(WindowId),

    #[error("Can not find original message source: {0}")]
    OriginNotFound(WindowId),

    #[error("Handler for {message_type} failed: {reason}")]
    Handler {
        message_type: MessageType,
        #[source]
        reason: HandlerError,
    },

    #[error("Failed to forward message {message_id}: {reason}")]
    Send {
        message_id: String,
        #[source]
        reason: SendError,
    },
}

/// Invalid router configuration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Replay capacity must be greater than zero")]
    ZeroReplayCapacity,

    #[error("Mock domain prefix cannot be empty")]
    EmptyMockPrefix,
}
