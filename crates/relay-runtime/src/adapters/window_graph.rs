//! # Simulated Window Graph
//!
//! A fixed set of windows with parent/opener links, each with a domain.
//! `HostView` is the graph seen from one window and implements `WindowHost`
//! for that window's router.
//!
//! ## Access Rules
//!
//! - Two windows are same-origin when their domains are equal
//! - A `restricted` window refuses cross-origin reads of its relations
//! - A window's domain is only readable from a same-origin window
//!
//! ## Topology File
//!
//! ```json
//! {
//!   "windows": [
//!     { "id": "top", "domain": "https://top.example" },
//!     { "id": "child", "domain": "https://widget.example", "parent": "top" }
//!   ]
//! }
//! ```

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use shared_types::WindowId;
use tracing::debug;
use window_router::{WindowAccessError, WindowHost};

use crate::error::TopologyError;

/// Handle of a window in the graph.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WindowKey(pub u32);

impl fmt::Display for WindowKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One window of a topology file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowSpec {
    pub id: WindowId,
    pub domain: String,
    #[serde(default)]
    pub parent: Option<WindowId>,
    #[serde(default)]
    pub opener: Option<WindowId>,
    #[serde(default)]
    pub closed: bool,
    #[serde(default)]
    pub restricted: bool,
}

impl WindowSpec {
    pub fn new(id: &str, domain: &str) -> Self {
        Self {
            id: WindowId::new(id),
            domain: domain.to_string(),
            parent: None,
            opener: None,
            closed: false,
            restricted: false,
        }
    }

    pub fn with_parent(mut self, parent: &str) -> Self {
        self.parent = Some(WindowId::new(parent));
        self
    }

    pub fn with_opener(mut self, opener: &str) -> Self {
        self.opener = Some(WindowId::new(opener));
        self
    }

    pub fn restricted(mut self) -> Self {
        self.restricted = true;
        self
    }

    pub fn closed(mut self) -> Self {
        self.closed = true;
        self
    }
}

/// Windows to simulate.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topology {
    pub windows: Vec<WindowSpec>,
}

impl Topology {
    pub fn from_json(raw: &str) -> Result<Self, TopologyError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// A top window hosting a widget iframe which opened a popup, plus a
    /// restricted third-party iframe.
    pub fn demo() -> Self {
        Self {
            windows: vec![
                WindowSpec::new("top", "https://top.example"),
                WindowSpec::new("widget", "https://widget.example").with_parent("top"),
                WindowSpec::new("popup", "https://widget.example").with_opener("widget"),
                WindowSpec::new("ads", "https://ads.example")
                    .with_parent("top")
                    .restricted(),
            ],
        }
    }
}

struct WindowNode {
    id: WindowId,
    domain: String,
    parent: Option<WindowKey>,
    opener: Option<WindowKey>,
    restricted: bool,
}

/// The simulated windows.
pub struct WindowGraph {
    nodes: Vec<WindowNode>,
    index: HashMap<WindowId, WindowKey>,
    closed: RwLock<HashSet<WindowKey>>,
}

impl WindowGraph {
    /// Build the graph, resolving relation ids to keys.
    pub fn from_topology(topology: Topology) -> Result<Self, TopologyError> {
        if topology.windows.is_empty() {
            return Err(TopologyError::Empty);
        }

        let mut index = HashMap::new();
        for (i, spec) in topology.windows.iter().enumerate() {
            if index.insert(spec.id.clone(), WindowKey(i as u32)).is_some() {
                return Err(TopologyError::DuplicateWindow(spec.id.clone()));
            }
        }

        let link = |spec: &WindowSpec, relation: &'static str, target: &Option<WindowId>| {
            target
                .as_ref()
                .map(|target| {
                    index
                        .get(target)
                        .copied()
                        .ok_or_else(|| TopologyError::UnknownRelation {
                            window: spec.id.clone(),
                            relation,
                            target: target.clone(),
                        })
                })
                .transpose()
        };

        let mut nodes = Vec::with_capacity(topology.windows.len());
        let mut closed = HashSet::new();
        for (i, spec) in topology.windows.iter().enumerate() {
            nodes.push(WindowNode {
                id: spec.id.clone(),
                domain: spec.domain.clone(),
                parent: link(spec, "parent", &spec.parent)?,
                opener: link(spec, "opener", &spec.opener)?,
                restricted: spec.restricted,
            });
            if spec.closed {
                closed.insert(WindowKey(i as u32));
            }
        }

        Ok(Self {
            nodes,
            index,
            closed: RwLock::new(closed),
        })
    }

    fn node(&self, key: WindowKey) -> Option<&WindowNode> {
        self.nodes.get(key.0 as usize)
    }

    pub fn key_of(&self, id: &WindowId) -> Option<WindowKey> {
        self.index.get(id).copied()
    }

    pub fn id_of(&self, key: WindowKey) -> Option<&WindowId> {
        self.node(key).map(|n| &n.id)
    }

    pub fn domain(&self, key: WindowKey) -> Option<&str> {
        self.node(key).map(|n| n.domain.as_str())
    }

    /// Every window key, in topology order.
    pub fn keys(&self) -> impl Iterator<Item = WindowKey> + '_ {
        (0..self.nodes.len()).map(|i| WindowKey(i as u32))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Mark a window closed. Closing is permanent.
    pub fn close(&self, key: WindowKey) {
        debug!(window = %key, "Closing window");
        self.closed.write().insert(key);
    }

    pub fn is_closed(&self, key: WindowKey) -> bool {
        self.closed.read().contains(&key)
    }

    fn same_origin(&self, a: WindowKey, b: WindowKey) -> bool {
        match (self.node(a), self.node(b)) {
            (Some(a), Some(b)) => a.domain == b.domain,
            _ => false,
        }
    }

    /// The graph as seen from `key`.
    pub fn view(self: &Arc<Self>, key: WindowKey) -> Option<HostView> {
        let current_id = self.id_of(key)?.clone();
        Some(HostView {
            graph: Arc::clone(self),
            current: key,
            current_id,
        })
    }
}

/// `WindowHost` for one window of a `WindowGraph`.
#[derive(Clone)]
pub struct HostView {
    graph: Arc<WindowGraph>,
    current: WindowKey,
    current_id: WindowId,
}

impl HostView {
    pub fn graph(&self) -> &Arc<WindowGraph> {
        &self.graph
    }

    /// Relations of `window`, if the current window may read them.
    fn readable(&self, window: WindowKey) -> Result<&WindowNode, WindowAccessError> {
        let node = self
            .graph
            .node(window)
            .ok_or_else(|| WindowAccessError(format!("unknown window {window}")))?;

        if node.restricted && !self.graph.same_origin(self.current, window) {
            return Err(WindowAccessError(format!(
                "blocked a frame with origin {} from accessing {}",
                self.graph.domain(self.current).unwrap_or_default(),
                node.domain
            )));
        }

        Ok(node)
    }
}

impl WindowHost for HostView {
    type Handle = WindowKey;

    fn current_window(&self) -> WindowKey {
        self.current
    }

    fn current_window_id(&self) -> WindowId {
        self.current_id.clone()
    }

    fn parent(&self, window: &WindowKey) -> Result<Option<WindowKey>, WindowAccessError> {
        Ok(self.readable(*window)?.parent)
    }

    fn opener(&self, window: &WindowKey) -> Result<Option<WindowKey>, WindowAccessError> {
        Ok(self.readable(*window)?.opener)
    }

    fn is_closed(&self, window: &WindowKey) -> bool {
        self.graph.is_closed(*window)
    }

    fn is_same_origin(&self, window: &WindowKey) -> bool {
        self.graph.same_origin(self.current, *window)
    }

    fn domain_of(&self, window: &WindowKey) -> Result<String, WindowAccessError> {
        if !self.is_same_origin(window) {
            return Err(WindowAccessError(format!(
                "domain of cross-origin window {window} is not readable"
            )));
        }
        self.graph
            .domain(*window)
            .map(str::to_string)
            .ok_or_else(|| WindowAccessError(format!("unknown window {window}")))
    }
}
