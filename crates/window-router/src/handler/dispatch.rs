//! Type-keyed message handlers.
//!
//! The table is injected into the router at construction and doubles as the
//! recognized-type check: a type with no handler is dropped on arrival.

use crate::error::HandlerError;
use shared_types::{MessageEnvelope, MessageType};
use std::collections::HashMap;
use std::sync::Arc;

/// Handles one kind of message after it passed the pipeline.
pub trait MessageHandler<H>: Send + Sync {
    /// `source` is the resolved original-source window, `origin` the
    /// authenticated origin of the immediate sender.
    fn handle(&self, source: &H, message: &MessageEnvelope, origin: &str)
        -> Result<(), HandlerError>;
}

impl<H, T> MessageHandler<H> for Arc<T>
where
    T: MessageHandler<H> + ?Sized,
{
    fn handle(&self, source: &H, message: &MessageEnvelope, origin: &str) -> Result<(), HandlerError> {
        (**self).handle(source, message, origin)
    }
}

/// Adapts a closure into a `MessageHandler`.
pub struct FnHandler<F>(pub F);

impl<H, F> MessageHandler<H> for FnHandler<F>
where
    F: Fn(&H, &MessageEnvelope, &str) -> Result<(), HandlerError> + Send + Sync,
{
    fn handle(&self, source: &H, message: &MessageEnvelope, origin: &str) -> Result<(), HandlerError> {
        (self.0)(source, message, origin)
    }
}

/// Mapping from message kind to its handler.
pub struct HandlerTable<H> {
    handlers: HashMap<MessageType, Box<dyn MessageHandler<H>>>,
}

impl<H> HandlerTable<H> {
    /// Empty table. Every message is unrecognized until a handler is added.
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// Add or replace the handler for `message_type`.
    pub fn register(&mut self, message_type: MessageType, handler: impl MessageHandler<H> + 'static) {
        self.handlers.insert(message_type, Box::new(handler));
    }

    /// Builder-style `register`.
    pub fn with_handler(
        mut self,
        message_type: MessageType,
        handler: impl MessageHandler<H> + 'static,
    ) -> Self {
        self.register(message_type, handler);
        self
    }

    /// Builder-style `register` for a closure.
    pub fn with_fn<F>(self, message_type: MessageType, handler: F) -> Self
    where
        F: Fn(&H, &MessageEnvelope, &str) -> Result<(), HandlerError> + Send + Sync + 'static,
        H: 'static,
    {
        self.with_handler(message_type, FnHandler(handler))
    }

    /// Whether `message_type` has a handler.
    pub fn contains(&self, message_type: MessageType) -> bool {
        self.handlers.contains_key(&message_type)
    }

    /// Handler for `message_type`.
    pub fn get(&self, message_type: MessageType) -> Option<&dyn MessageHandler<H>> {
        self.handlers.get(&message_type).map(|h| h.as_ref())
    }

    /// Kinds with a handler.
    pub fn message_types(&self) -> impl Iterator<Item = MessageType> + '_ {
        self.handlers.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl<H> Default for HandlerTable<H> {
    fn default() -> Self {
        Self::new()
    }
}
