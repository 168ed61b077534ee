//! # Window Entities
//!
//! Identities and structural relations of the windows that exchange
//! messages over the channel.
//!
//! - **Identity**: `WindowId` (opaque id chosen by the sending window)
//! - **Structure**: `WindowRelation` (parent/opener traversals named by hints)

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identifier a window uses to name itself in envelopes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct WindowId(pub String);

impl WindowId {
    /// Create a window id from any string-like value.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the raw id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for WindowId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for WindowId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// A structural relation between the receiving window and another window.
///
/// Relations are named on the wire by hint strings such as `window.opener`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WindowRelation {
    /// `window.parent`
    Parent,
    /// `window.opener`
    Opener,
    /// `window.parent.opener`
    ParentOpener,
    /// `window.opener.parent`
    OpenerParent,
}

impl WindowRelation {
    /// Every recognized relation.
    pub const ALL: [WindowRelation; 4] = [
        WindowRelation::Parent,
        WindowRelation::Opener,
        WindowRelation::ParentOpener,
        WindowRelation::OpenerParent,
    ];

    /// The hint string naming this relation.
    pub fn as_hint(&self) -> &'static str {
        match self {
            WindowRelation::Parent => "window.parent",
            WindowRelation::Opener => "window.opener",
            WindowRelation::ParentOpener => "window.parent.opener",
            WindowRelation::OpenerParent => "window.opener.parent",
        }
    }

    /// Parse a hint string. Returns `None` for anything unrecognized.
    pub fn from_hint(hint: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.as_hint() == hint)
    }
}

impl fmt::Display for WindowRelation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_hint())
    }
}
