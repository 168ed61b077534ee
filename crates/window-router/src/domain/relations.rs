//! Window relationship resolution.

use crate::error::ResolutionError;
use crate::ports::outbound::{WindowAccessError, WindowHost};
use shared_types::{WindowId, WindowRelation};
use tracing::trace;

/// Resolve a relation hint to a concrete window.
///
/// Relations are always walked from the receiving window. `reference` is the
/// envelope id the hint was attached to and only appears in traces.
///
/// # Errors
///
/// - `ResolutionError::UnknownHint` - the hint names no known relation
/// - `ResolutionError::AccessDenied` - the host refused a step of the walk
/// - `ResolutionError::NotAvailable` - a step of the walk led nowhere
pub fn resolve_relation<W>(
    host: &W,
    hint: &str,
    reference: Option<&WindowId>,
) -> Result<W::Handle, ResolutionError>
where
    W: WindowHost + ?Sized,
{
    let relation = WindowRelation::from_hint(hint).ok_or_else(|| ResolutionError::UnknownHint {
        hint: hint.to_string(),
    })?;

    trace!(hint, reference = ?reference, "Resolving window relation");

    let current = host.current_window();
    let walked = match relation {
        WindowRelation::Parent => host.parent(&current),
        WindowRelation::Opener => host.opener(&current),
        WindowRelation::ParentOpener => then(host.parent(&current), |w| host.opener(w)),
        WindowRelation::OpenerParent => then(host.opener(&current), |w| host.parent(w)),
    };

    walked
        .map_err(|e| ResolutionError::AccessDenied {
            hint: hint.to_string(),
            reason: e.to_string(),
        })?
        .ok_or_else(|| ResolutionError::NotAvailable {
            hint: hint.to_string(),
        })
}

/// Take one more step of a walk, if the previous step reached a window.
fn then<H>(
    step: Result<Option<H>, WindowAccessError>,
    next: impl FnOnce(&H) -> Result<Option<H>, WindowAccessError>,
) -> Result<Option<H>, WindowAccessError> {
    match step? {
        Some(window) => next(&window),
        None => Ok(None),
    }
}
