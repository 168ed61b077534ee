//! Journaling message handlers.
//!
//! Every simulated window gets the same handler for all message kinds: log
//! the delivery and append it to a shared journal.

use std::sync::Arc;

use parking_lot::Mutex;
use serde::Serialize;
use shared_types::{MessageEnvelope, MessageType, WindowId};
use tracing::info;
use window_router::{HandlerError, HandlerTable, MessageHandler};

use super::window_graph::{WindowGraph, WindowKey};

/// One message that reached a handler.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct HandledMessage {
    /// Window whose router dispatched the message.
    pub window: WindowId,
    /// Resolved original source.
    pub source: Option<WindowId>,
    /// Authenticated origin of the immediate sender.
    pub origin: String,
    pub message_type: MessageType,
    pub id: String,
    pub name: Option<String>,
    pub data: Option<serde_json::Value>,
}

/// Shared, append-only record of handled messages.
#[derive(Clone, Default)]
pub struct MessageJournal {
    entries: Arc<Mutex<Vec<HandledMessage>>>,
}

impl MessageJournal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, entry: HandledMessage) {
        self.entries.lock().push(entry);
    }

    /// Snapshot of every entry so far.
    pub fn entries(&self) -> Vec<HandledMessage> {
        self.entries.lock().clone()
    }

    /// Entries handled by `window`.
    pub fn for_window(&self, window: &WindowId) -> Vec<HandledMessage> {
        self.entries
            .lock()
            .iter()
            .filter(|e| &e.window == window)
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

/// Handler that logs and journals every message.
pub struct JournalingHandler {
    window: WindowId,
    graph: Arc<WindowGraph>,
    journal: MessageJournal,
}

impl JournalingHandler {
    pub fn new(window: WindowId, graph: Arc<WindowGraph>, journal: MessageJournal) -> Self {
        Self {
            window,
            graph,
            journal,
        }
    }
}

impl MessageHandler<WindowKey> for JournalingHandler {
    fn handle(
        &self,
        source: &WindowKey,
        message: &MessageEnvelope,
        origin: &str,
    ) -> Result<(), HandlerError> {
        let source_id = self.graph.id_of(*source).cloned();

        info!(
            window = %self.window,
            source = ?source_id,
            origin,
            message_type = %message.message_type,
            id = %message.id,
            "Message handled"
        );

        self.journal.record(HandledMessage {
            window: self.window.clone(),
            source: source_id,
            origin: origin.to_string(),
            message_type: message.message_type,
            id: message.id.clone(),
            name: message.name.clone(),
            data: message.data.clone(),
        });
        Ok(())
    }
}

/// Handler table routing every message kind to one journaling handler.
pub fn journaling_handlers(
    window: WindowId,
    graph: Arc<WindowGraph>,
    journal: MessageJournal,
) -> HandlerTable<WindowKey> {
    let handler = Arc::new(JournalingHandler::new(window, graph, journal));
    MessageType::ALL
        .into_iter()
        .fold(HandlerTable::new(), |table, message_type| {
            table.with_handler(message_type, handler.clone())
        })
}
