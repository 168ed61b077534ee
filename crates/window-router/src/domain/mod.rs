//! # Domain Layer for the Window Router
//!
//! Pipeline rules with no channel I/O. Host state is only reached through
//! the synchronous lookups declared in `ports::outbound`.
//!
//! ## Contents
//!
//! - **relations**: hint → window resolution (`resolve_relation`)
//! - **validation**: raw payload → envelope (`validate_payload`)
//! - **replay**: message-id deduplication (`ReplayGuard`)
//! - **origin**: effective origin and domain-claim checks (`authenticate`)
//! - **routing**: proxy/local selection and log classification
//! - **session**: per-endpoint state (`SessionState`)

mod origin;
mod relations;
mod replay;
mod routing;
mod session;
mod validation;

pub use origin::*;
pub use relations::*;
pub use replay::*;
pub use routing::*;
pub use session::*;
pub use validation::*;
