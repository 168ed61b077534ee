//! # Integration Tests
//!
//! - `scenarios` - single-router receive scenarios (dispatch, replay, spoof,
//!   forward, closed target, hint handling)
//! - `relay_chains` - multi-window flows through the runtime's event loop

pub mod scenarios;
