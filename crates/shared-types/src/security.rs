//! # Domain Rules
//!
//! Shared rules for comparing domains claimed in envelopes against the
//! origins observed on the channel.
//!
//! ## Security Properties
//!
//! - **Exact Match**: a claimed domain is only trusted when it equals the
//!   observed origin byte for byte.
//! - **Wildcard Sends**: a relay that does not know the eventual recipient's
//!   restriction forwards with `*`.
//! - **Mock Domains**: domains under the reserved `mock://` scheme are
//!   synthetic and accepted verbatim.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Domain restriction meaning "deliver regardless of the target's domain".
pub const WILDCARD_DOMAIN: &str = "*";

/// Reserved scheme for synthetic test domains.
pub const MOCK_DOMAIN_PREFIX: &str = "mock://";

/// Which domain a send is allowed to deliver to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DomainRestriction {
    /// Any domain (`*`).
    Any,
    /// Exactly this domain.
    Exact(String),
}

impl DomainRestriction {
    /// Restriction for a proxied send: the envelope's explicit `domain`, or wildcard.
    pub fn for_forward(domain: Option<&str>) -> Self {
        match domain {
            Some(d) if d != WILDCARD_DOMAIN => DomainRestriction::Exact(d.to_string()),
            _ => DomainRestriction::Any,
        }
    }

    /// Whether a window at `domain` may receive under this restriction.
    pub fn permits(&self, domain: &str) -> bool {
        match self {
            DomainRestriction::Any => true,
            DomainRestriction::Exact(expected) => expected == domain,
        }
    }
}

impl fmt::Display for DomainRestriction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DomainRestriction::Any => f.write_str(WILDCARD_DOMAIN),
            DomainRestriction::Exact(d) => f.write_str(d),
        }
    }
}

/// Whether `domain` uses the synthetic scheme `prefix`.
pub fn is_mock_domain(domain: &str, prefix: &str) -> bool {
    !prefix.is_empty() && domain.starts_with(prefix)
}
