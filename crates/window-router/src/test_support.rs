//! Test doubles for the outbound ports.

use crate::error::SendError;
use crate::ports::outbound::{MessageSender, WindowAccessError, WindowHost};
use parking_lot::Mutex;
use shared_types::{DomainRestriction, MessageEnvelope, WindowId};
use std::collections::{HashMap, HashSet};

/// Window host over `u32` handles. Only windows added with `same_origin`
/// share the current window's origin; every other window is cross-origin.
pub struct MockHost {
    current: u32,
    current_id: WindowId,
    parents: HashMap<u32, u32>,
    openers: HashMap<u32, u32>,
    closed: HashSet<u32>,
    same_origin: HashMap<u32, String>,
    denied: HashSet<u32>,
}

impl MockHost {
    pub fn new(current: u32, current_id: &str) -> Self {
        Self {
            current,
            current_id: WindowId::new(current_id),
            parents: HashMap::new(),
            openers: HashMap::new(),
            closed: HashSet::new(),
            same_origin: HashMap::new(),
            denied: HashSet::new(),
        }
    }

    pub fn with_parent(mut self, child: u32, parent: u32) -> Self {
        self.parents.insert(child, parent);
        self
    }

    pub fn with_opener(mut self, child: u32, opener: u32) -> Self {
        self.openers.insert(child, opener);
        self
    }

    pub fn closed(mut self, window: u32) -> Self {
        self.closed.insert(window);
        self
    }

    pub fn same_origin(mut self, window: u32, domain: &str) -> Self {
        self.same_origin.insert(window, domain.to_string());
        self
    }

    pub fn deny_access_to(mut self, window: u32) -> Self {
        self.denied.insert(window);
        self
    }

    fn check_access(&self, window: u32) -> Result<(), WindowAccessError> {
        if self.denied.contains(&window) {
            return Err(WindowAccessError(format!("blocked access to window {window}")));
        }
        Ok(())
    }
}

impl WindowHost for MockHost {
    type Handle = u32;

    fn current_window(&self) -> u32 {
        self.current
    }

    fn current_window_id(&self) -> WindowId {
        self.current_id.clone()
    }

    fn parent(&self, window: &u32) -> Result<Option<u32>, WindowAccessError> {
        self.check_access(*window)?;
        Ok(self.parents.get(window).copied())
    }

    fn opener(&self, window: &u32) -> Result<Option<u32>, WindowAccessError> {
        self.check_access(*window)?;
        Ok(self.openers.get(window).copied())
    }

    fn is_closed(&self, window: &u32) -> bool {
        self.closed.contains(window)
    }

    fn is_same_origin(&self, window: &u32) -> bool {
        self.same_origin.contains_key(window)
    }

    fn domain_of(&self, window: &u32) -> Result<String, WindowAccessError> {
        self.same_origin
            .get(window)
            .cloned()
            .ok_or_else(|| WindowAccessError(format!("window {window} is cross-origin")))
    }
}

/// A send captured by `RecordingSender`.
#[derive(Clone, Debug, PartialEq)]
pub struct SentMessage {
    pub target: u32,
    pub envelope: MessageEnvelope,
    pub restriction: DomainRestriction,
    pub proxied: bool,
}

/// Sender that records instead of delivering.
#[derive(Default)]
pub struct RecordingSender {
    pub sent: Mutex<Vec<SentMessage>>,
    pub fail: bool,
}

impl MessageSender<u32> for RecordingSender {
    fn send(
        &self,
        target: &u32,
        envelope: MessageEnvelope,
        restriction: DomainRestriction,
        proxied: bool,
    ) -> Result<(), SendError> {
        if self.fail {
            return Err(SendError::new("channel unavailable"));
        }
        self.sent.lock().push(SentMessage {
            target: *target,
            envelope,
            restriction,
            proxied,
        });
        Ok(())
    }
}
