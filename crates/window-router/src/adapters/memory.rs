//! In-memory registry, bridge map and binder.

use crate::ports::outbound::{BridgeMap, CallableBinder, WindowHandle, WindowRegistry};
use parking_lot::RwLock;
use serde_json::Value;
use shared_types::WindowId;
use std::collections::HashMap;
use tracing::trace;

/// A window known to the registry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegisteredWindow<H> {
    pub handle: H,
    pub domain: String,
}

/// Registry keeping every window it has been told about.
pub struct InMemoryWindowRegistry<H> {
    windows: RwLock<HashMap<WindowId, RegisteredWindow<H>>>,
}

impl<H: WindowHandle> InMemoryWindowRegistry<H> {
    pub fn new() -> Self {
        Self {
            windows: RwLock::new(HashMap::new()),
        }
    }

    /// Domain last registered for `id`.
    pub fn domain_of(&self, id: &WindowId) -> Option<String> {
        self.windows.read().get(id).map(|w| w.domain.clone())
    }

    /// Number of registered windows.
    pub fn len(&self) -> usize {
        self.windows.read().len()
    }

    /// Check if no window is registered.
    pub fn is_empty(&self) -> bool {
        self.windows.read().is_empty()
    }
}

impl<H: WindowHandle> Default for InMemoryWindowRegistry<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: WindowHandle> WindowRegistry<H> for InMemoryWindowRegistry<H> {
    fn register(&self, id: &WindowId, handle: H, domain: &str) {
        trace!(window = %id, domain, "Registering window");
        self.windows.write().insert(
            id.clone(),
            RegisteredWindow {
                handle,
                domain: domain.to_string(),
            },
        );
    }

    fn lookup(&self, id: &WindowId) -> Option<H> {
        self.windows.read().get(id).map(|w| w.handle.clone())
    }
}

/// Bridge map keeping the latest original recorded for each relay.
pub struct InMemoryBridgeMap<H> {
    bridges: RwLock<HashMap<H, H>>,
}

impl<H: WindowHandle> InMemoryBridgeMap<H> {
    pub fn new() -> Self {
        Self {
            bridges: RwLock::new(HashMap::new()),
        }
    }

    /// Number of recorded bridges.
    pub fn len(&self) -> usize {
        self.bridges.read().len()
    }

    /// Check if no bridge is recorded.
    pub fn is_empty(&self) -> bool {
        self.bridges.read().is_empty()
    }
}

impl<H: WindowHandle> Default for InMemoryBridgeMap<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: WindowHandle> BridgeMap<H> for InMemoryBridgeMap<H> {
    fn record(&self, relay: H, original: H) {
        trace!(relay = ?relay, original = ?original, "Recording bridge");
        self.bridges.write().insert(relay, original);
    }

    fn original_for(&self, relay: &H) -> Option<H> {
        self.bridges.read().get(relay).cloned()
    }
}

/// Binder for payloads that carry no callable references.
#[derive(Clone, Copy, Debug, Default)]
pub struct PassthroughBinder;

impl<H> CallableBinder<H> for PassthroughBinder {
    fn bind_callables(&self, _window: &H, data: Value) -> Value {
        data
    }
}
