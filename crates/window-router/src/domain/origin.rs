//! Origin authentication.
//!
//! Two independent claims are checked against the effective origin:
//!
//! 1. `sourceDomain` must match, always.
//! 2. `originalSourceDomain` must match, unless the sending window is
//!    same-origin with the receiver. Same-origin relays may certify an
//!    upstream origin for a message they forward; cross-origin relays may not.

use crate::error::{DomainClaim, RouterError};
use shared_types::{is_mock_domain, MessageEnvelope};

/// Origin to authenticate against.
///
/// `same_origin_domain` is the sender's domain read directly from the
/// window, present only when the host verified it is same-origin. It
/// replaces whatever the channel reported. A `sourceDomain` under the mock
/// scheme is taken verbatim.
pub fn effective_origin(
    observed: &str,
    same_origin_domain: Option<&str>,
    source_domain: &str,
    mock_prefix: &str,
) -> String {
    if is_mock_domain(source_domain, mock_prefix) {
        return source_domain.to_string();
    }

    same_origin_domain.unwrap_or(observed).to_string()
}

/// Check both domain claims of `envelope` against `origin`.
///
/// # Errors
///
/// `RouterError::OriginMismatch` naming the claim that failed.
pub fn authenticate(
    envelope: &MessageEnvelope,
    origin: &str,
    sender_same_origin: bool,
) -> Result<(), RouterError> {
    if envelope.source_domain != origin {
        return Err(RouterError::OriginMismatch {
            claim: DomainClaim::Source,
            claimed: envelope.source_domain.clone(),
            observed: origin.to_string(),
        });
    }

    let original_domain = envelope.original_source_domain();
    if original_domain != origin && !sender_same_origin {
        return Err(RouterError::OriginMismatch {
            claim: DomainClaim::OriginalSource,
            claimed: original_domain.to_string(),
            observed: origin.to_string(),
        });
    }

    Ok(())
}
