//! # `MessageEnvelope`
//!
//! The unit that flows through the receive pipeline, serialized as JSON with
//! camelCase field names.
//!
//! ## Identity Fields
//!
//! - `source` / `sourceDomain`: the immediate sender's claimed id and domain.
//! - `originalSource` / `originalSourceDomain`: the ultimate author when the
//!   message was relayed. Absent means "same as the immediate sender".
//!
//! ## Routing Fields
//!
//! - `target` / `targetHint`: where a relay should forward the message.
//! - `sourceHint`: how the receiver can reach the original source.
//! - `domain`: explicit domain restriction for the eventual send.

use crate::entities::WindowId;
use crate::errors::DecodeError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// The recognized message kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MessageType {
    #[serde(rename = "postrobot_message_request")]
    Request,
    #[serde(rename = "postrobot_message_response")]
    Response,
    #[serde(rename = "postrobot_message_ack")]
    Ack,
}

impl MessageType {
    /// Every recognized message kind.
    pub const ALL: [MessageType; 3] = [MessageType::Request, MessageType::Response, MessageType::Ack];

    /// Wire name of this kind.
    pub fn as_wire(&self) -> &'static str {
        match self {
            MessageType::Request => "postrobot_message_request",
            MessageType::Response => "postrobot_message_response",
            MessageType::Ack => "postrobot_message_ack",
        }
    }

    /// Look up a kind by its wire name.
    pub fn from_wire(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_wire() == name)
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_wire())
    }
}

/// The message envelope carried over the channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageEnvelope {
    /// Replay key, unique per logical send.
    pub id: String,

    /// Message kind.
    #[serde(rename = "type")]
    pub message_type: MessageType,

    /// Free-form name, used for log-level classification.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Application payload. May contain callable references.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,

    /// Window that logically sent this message.
    pub source: WindowId,

    /// Final destination, when the receiver is expected to relay.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<WindowId>,

    /// Relation hint for locating `target`. Consumed by the relay.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_hint: Option<String>,

    /// Relation hint for locating `original_source`. Consumed by the receiver.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_hint: Option<String>,

    /// Domain restriction for the eventual send.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,

    /// Claimed domain of the immediate sender.
    pub source_domain: String,

    /// Claimed id of the ultimate originator.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_source: Option<WindowId>,

    /// Claimed domain of the ultimate originator.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_source_domain: Option<String>,

    /// Status marker, e.g. `"error"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ack: Option<String>,
}

impl MessageEnvelope {
    /// Ack marker for a failed request.
    pub const ACK_ERROR: &'static str = "error";

    /// Ack marker for a successful request.
    pub const ACK_SUCCESS: &'static str = "success";

    /// Create an envelope originating (and sent) by `source`.
    pub fn new(
        id: impl Into<String>,
        message_type: MessageType,
        source: WindowId,
        source_domain: impl Into<String>,
    ) -> Self {
        let source_domain = source_domain.into();
        Self {
            id: id.into(),
            message_type,
            name: None,
            data: None,
            original_source: Some(source.clone()),
            original_source_domain: Some(source_domain.clone()),
            source,
            target: None,
            target_hint: None,
            source_hint: None,
            domain: None,
            source_domain,
            ack: None,
        }
    }

    /// Decode a raw channel payload.
    ///
    /// # Errors
    ///
    /// - `DecodeError::Malformed` - not JSON, or not an envelope
    /// - `DecodeError::MissingType` - no string `type` field
    /// - `DecodeError::UnknownType` - `type` is not a recognized kind
    pub fn decode(raw: &str) -> Result<Self, DecodeError> {
        let value: Value =
            serde_json::from_str(raw).map_err(|e| DecodeError::Malformed(e.to_string()))?;

        let type_name = value
            .get("type")
            .and_then(Value::as_str)
            .ok_or(DecodeError::MissingType)?;

        if MessageType::from_wire(type_name).is_none() {
            return Err(DecodeError::UnknownType(type_name.to_string()));
        }

        serde_json::from_value(value).map_err(|e| DecodeError::Malformed(e.to_string()))
    }

    /// Encode for the channel.
    ///
    /// # Errors
    ///
    /// Fails only if `data` holds a value serde cannot represent.
    pub fn encode(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// The ultimate originator's id, defaulting to `source`.
    pub fn original_source(&self) -> &WindowId {
        self.original_source.as_ref().unwrap_or(&self.source)
    }

    /// The ultimate originator's claimed domain, defaulting to `source_domain`.
    pub fn original_source_domain(&self) -> &str {
        self.original_source_domain
            .as_deref()
            .unwrap_or(&self.source_domain)
    }

    /// Whether the immediate sender is relaying on behalf of another window.
    pub fn is_relayed(&self) -> bool {
        self.original_source() != &self.source
    }

    /// Whether this is a failure acknowledgement.
    pub fn is_error_ack(&self) -> bool {
        self.ack.as_deref() == Some(Self::ACK_ERROR)
    }

    // Builder-style helpers used by senders and tests.

    /// Set the name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the payload.
    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    /// Address the message to a final destination.
    pub fn with_target(mut self, target: WindowId) -> Self {
        self.target = Some(target);
        self
    }

    /// Attach a relation hint for the target.
    pub fn with_target_hint(mut self, hint: impl Into<String>) -> Self {
        self.target_hint = Some(hint.into());
        self
    }

    /// Attach a relation hint for the original source.
    pub fn with_source_hint(mut self, hint: impl Into<String>) -> Self {
        self.source_hint = Some(hint.into());
        self
    }

    /// Restrict the eventual send to one domain.
    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    /// Declare an upstream originator (the message is being relayed).
    pub fn relayed_for(mut self, original: WindowId, original_domain: impl Into<String>) -> Self {
        self.original_source = Some(original);
        self.original_source_domain = Some(original_domain.into());
        self
    }

    /// Restamp the immediate sender for a relay hop.
    ///
    /// `source` / `sourceDomain` become the relay's; the originator fields
    /// are pinned to the upstream sender when they were absent.
    pub fn relayed_by(mut self, relay: WindowId, relay_domain: impl Into<String>) -> Self {
        if self.original_source.is_none() {
            self.original_source = Some(self.source.clone());
        }
        if self.original_source_domain.is_none() {
            self.original_source_domain = Some(self.source_domain.clone());
        }
        self.source = relay;
        self.source_domain = relay_domain.into();
        self
    }

    /// Set the ack marker.
    pub fn with_ack(mut self, ack: impl Into<String>) -> Self {
        self.ack = Some(ack.into());
        self
    }
}
