//! Per-endpoint session state.
//!
//! Everything one messaging endpoint remembers across events: the window
//! registry, the bridge map, and the replay guard. Each router owns one, so
//! independent routers (and tests) never share state.

use crate::adapters::{InMemoryBridgeMap, InMemoryWindowRegistry};
use crate::domain::ReplayGuard;
use crate::ports::outbound::{BridgeMap, WindowHandle, WindowRegistry};
use parking_lot::Mutex;
use std::sync::Arc;

/// Session state shared by every event a router receives.
pub struct SessionState<H> {
    registry: Arc<dyn WindowRegistry<H>>,
    bridges: Arc<dyn BridgeMap<H>>,
    replay: Mutex<ReplayGuard>,
}

impl<H: WindowHandle> SessionState<H> {
    /// Session backed by in-memory stores.
    pub fn new(replay_capacity: Option<usize>) -> Self {
        Self::with_stores(
            Arc::new(InMemoryWindowRegistry::new()),
            Arc::new(InMemoryBridgeMap::new()),
            replay_capacity,
        )
    }

    /// Session backed by host-provided stores.
    pub fn with_stores(
        registry: Arc<dyn WindowRegistry<H>>,
        bridges: Arc<dyn BridgeMap<H>>,
        replay_capacity: Option<usize>,
    ) -> Self {
        Self {
            registry,
            bridges,
            replay: Mutex::new(ReplayGuard::with_capacity(replay_capacity)),
        }
    }

    /// Window registry.
    pub fn registry(&self) -> &dyn WindowRegistry<H> {
        self.registry.as_ref()
    }

    /// Bridge map.
    pub fn bridges(&self) -> &dyn BridgeMap<H> {
        self.bridges.as_ref()
    }

    /// Record a message id. Returns `false` if it was already observed.
    pub fn first_observation(&self, message_id: &str) -> bool {
        self.replay.lock().first_observation(message_id)
    }

    /// Number of message ids currently remembered.
    pub fn remembered_messages(&self) -> usize {
        self.replay.lock().len()
    }

    /// Forget every observed message id.
    pub fn reset_replay(&self) {
        self.replay.lock().clear();
    }
}

impl<H: WindowHandle> Default for SessionState<H> {
    fn default() -> Self {
        Self::new(Some(ReplayGuard::DEFAULT_CAPACITY))
    }
}
