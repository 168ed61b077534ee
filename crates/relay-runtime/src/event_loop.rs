//! # Event Loop
//!
//! One router per window, fed from a single delivery queue. Events are
//! processed one at a time in enqueue order; a router's forwards land at the
//! back of the same queue.
//!
//! ```text
//! InboundEvent ──inject──→ ┌─────────────┐ ──→ routers[target].on_channel_event
//!                          │ Delivery    │                 │
//!        QueueSender ────→ │ queue       │ ←── forward ────┘
//!                          └─────────────┘
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use shared_types::WindowId;
use tokio::sync::mpsc;
use tracing::{debug, error, trace, warn};
use uuid::Uuid;
use window_router::{
    ChannelEvent, ChannelReceiver, MessageRouter, ReceiveOutcome, RouterConfig, WindowHost,
};

use crate::adapters::{
    journaling_handlers, Delivery, HostView, MessageJournal, QueueSender, Topology, WindowGraph,
    WindowKey,
};
use crate::error::{RuntimeError, TopologyError};

/// Router of one simulated window.
pub type WindowRouter = MessageRouter<HostView, QueueSender>;

/// Counters over everything the loop processed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct LoopStats {
    pub processed: u64,
    pub dispatched: u64,
    pub forwarded: u64,
    pub dropped: u64,
    pub halted: u64,
    /// Events a router rejected with an error.
    pub rejected: u64,
    /// Events for unknown or closed windows.
    pub undeliverable: u64,
}

/// A channel event injected from outside the simulation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InboundEvent {
    /// Window posting the event.
    pub from: WindowId,
    /// Window receiving the event.
    pub to: WindowId,
    /// Observed origin; defaults to the posting window's domain.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
    /// Envelope object, or a raw string payload.
    pub message: Value,
}

impl InboundEvent {
    /// Raw channel payload. Envelope objects without an id get a fresh one.
    pub fn payload(&self) -> String {
        match &self.message {
            Value::String(raw) => raw.clone(),
            Value::Object(fields) if !fields.contains_key("id") => {
                let mut fields = fields.clone();
                fields.insert("id".to_string(), Value::String(Uuid::new_v4().to_string()));
                Value::Object(fields).to_string()
            }
            other => other.to_string(),
        }
    }
}

/// Single-consumer loop over the delivery queue.
pub struct EventLoop {
    graph: Arc<WindowGraph>,
    routers: HashMap<WindowKey, WindowRouter>,
    queue: mpsc::UnboundedSender<Delivery>,
    inbox: mpsc::UnboundedReceiver<Delivery>,
    journal: MessageJournal,
    stats: LoopStats,
}

impl EventLoop {
    /// Create a router for every window in `graph`.
    pub fn new(graph: Arc<WindowGraph>, config: RouterConfig) -> Self {
        let (queue, inbox) = mpsc::unbounded_channel();
        let journal = MessageJournal::new();

        let routers = graph
            .keys()
            .filter_map(|key| {
                let host = graph.view(key)?;
                let window = host.current_window_id();
                let sender = QueueSender::new(graph.clone(), key, queue.clone());
                let handlers = journaling_handlers(window, graph.clone(), journal.clone());
                let router =
                    MessageRouter::new(config.clone(), Arc::new(host), Arc::new(sender), handlers);
                Some((key, router))
            })
            .collect();

        Self {
            graph,
            routers,
            queue,
            inbox,
            journal,
            stats: LoopStats::default(),
        }
    }

    /// Build the graph from `topology`, then the loop.
    pub fn from_topology(topology: Topology, config: RouterConfig) -> Result<Self, TopologyError> {
        let graph = Arc::new(WindowGraph::from_topology(topology)?);
        Ok(Self::new(graph, config))
    }

    pub fn graph(&self) -> &Arc<WindowGraph> {
        &self.graph
    }

    pub fn journal(&self) -> &MessageJournal {
        &self.journal
    }

    pub fn stats(&self) -> LoopStats {
        self.stats
    }

    /// Router of window `id`.
    pub fn router(&self, id: &WindowId) -> Option<&WindowRouter> {
        let key = self.graph.key_of(id)?;
        self.routers.get(&key)
    }

    fn key(&self, id: &WindowId) -> Result<WindowKey, RuntimeError> {
        self.graph
            .key_of(id)
            .ok_or_else(|| RuntimeError::UnknownWindow(id.clone()))
    }

    /// Enqueue an external event.
    pub fn inject(&self, event: InboundEvent) -> Result<(), RuntimeError> {
        let from = self.key(&event.from)?;
        let target = self.key(&event.to)?;
        let origin = match &event.origin {
            Some(origin) => origin.clone(),
            None => self.graph.domain(from).unwrap_or_default().to_string(),
        };

        trace!(from = %event.from, to = %event.to, %origin, "Injecting event");
        self.queue
            .send(Delivery {
                target,
                event: ChannelEvent::new(from, origin, event.payload()),
            })
            .map_err(|_| RuntimeError::QueueClosed)
    }

    /// Mark window `id` closed.
    pub fn close_window(&self, id: &WindowId) -> Result<(), RuntimeError> {
        let key = self.key(id)?;
        self.graph.close(key);
        Ok(())
    }

    /// Hand one delivery to its window's router.
    pub fn process(&mut self, delivery: Delivery) {
        self.stats.processed += 1;

        let Some(router) = self.routers.get(&delivery.target) else {
            warn!(window = %delivery.target, "Delivery for unknown window");
            self.stats.undeliverable += 1;
            return;
        };

        if self.graph.is_closed(delivery.target) {
            debug!(window = %delivery.target, "Target window closed; event discarded");
            self.stats.undeliverable += 1;
            return;
        }

        match router.on_channel_event(delivery.event) {
            Ok(ReceiveOutcome::Dispatched { .. }) => self.stats.dispatched += 1,
            Ok(ReceiveOutcome::Forwarded { .. }) => self.stats.forwarded += 1,
            Ok(ReceiveOutcome::Dropped(reason)) => {
                trace!(?reason, "Event dropped");
                self.stats.dropped += 1;
            }
            Ok(ReceiveOutcome::Halted(_)) => self.stats.halted += 1,
            Err(e) => {
                error!(window = %delivery.target, error = %e, "Receive failed");
                self.stats.rejected += 1;
            }
        }
    }

    /// Process queued deliveries until the queue is empty.
    pub async fn run_until_idle(&mut self) -> LoopStats {
        while let Ok(delivery) = self.inbox.try_recv() {
            self.process(delivery);
            tokio::task::yield_now().await;
        }
        self.stats
    }

    /// Interleave external events with deliveries until `inbound` closes,
    /// then drain the queue.
    ///
    /// Queued deliveries always go before the next external event.
    pub async fn run(mut self, mut inbound: mpsc::Receiver<InboundEvent>) -> LoopStats {
        loop {
            tokio::select! {
                biased;
                Some(delivery) = self.inbox.recv() => self.process(delivery),
                event = inbound.recv() => match event {
                    Some(event) => {
                        if let Err(e) = self.inject(event) {
                            warn!(error = %e, "Could not inject event");
                            self.stats.undeliverable += 1;
                        }
                    }
                    None => break,
                },
            }
        }

        self.run_until_idle().await
    }
}
