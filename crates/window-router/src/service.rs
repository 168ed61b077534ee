//! # Message Router Service
//!
//! The receive pipeline, run synchronously to completion for each channel
//! event.
//!
//! ## Pipeline
//!
//! 1. Drop events whose source cannot be read
//! 2. Validate the payload (silent drop on failure)
//! 3. Replay guard (silent drop on duplicates)
//! 4. Authenticate `sourceDomain` / `originalSourceDomain` (fatal on mismatch)
//! 5. Register the sender
//! 6. Resolve a proxy target; forward if one exists
//! 7. Otherwise resolve the original source, record bridges, dispatch
//!
//! ## Dependencies
//!
//! - `W: WindowHost` - relations, liveness and same-origin checks
//! - `S: MessageSender` - the outbound send primitive
//! - `CallableBinder` - payload rehydration (pass-through by default)

use std::sync::Arc;
use tracing::{debug, trace, warn};

use crate::adapters::PassthroughBinder;
use crate::config::RouterConfig;
use crate::domain::{
    authenticate, classify_receive, effective_origin, log_receive, resolve_relation,
    select_original_source, select_target, validate_payload, SessionState, SourceSelection,
    TargetSelection,
};
use crate::error::{ResolutionError, RouterError};
use crate::events::{ChannelEvent, Diagnostic, DropReason, ReceiveOutcome, ReceiveResult};
use crate::handler::{HandlerTable, MessageHandler};
use crate::ports::inbound::ChannelReceiver;
use crate::ports::outbound::{CallableBinder, MessageSender, WindowHost};
use shared_types::{DomainRestriction, MessageEnvelope};

/// Where a message goes after authentication.
enum ProxyTarget<H> {
    Window(H),
    Local,
    Unresolved(ResolutionError),
}

/// Outcome of original-source resolution that is not fatal.
enum OriginalSource<H> {
    Window(H),
    Unresolved(ResolutionError),
}

/// Message router for one receiving window.
///
/// ## Thread Safety
///
/// The router is `Send + Sync`; session state sits behind locks. Hosts are
/// still expected to feed events one at a time, in arrival order.
pub struct MessageRouter<W, S>
where
    W: WindowHost,
    S: MessageSender<W::Handle>,
{
    /// Router configuration.
    config: RouterConfig,
    /// Window environment of the receiving window.
    host: Arc<W>,
    /// Outbound send primitive used when proxying.
    sender: Arc<S>,
    /// Payload rehydration.
    binder: Arc<dyn CallableBinder<W::Handle>>,
    /// Type-keyed handlers; also the recognized-type table.
    handlers: HandlerTable<W::Handle>,
    /// Registry, bridge map and replay guard.
    session: SessionState<W::Handle>,
}

impl<W, S> MessageRouter<W, S>
where
    W: WindowHost,
    S: MessageSender<W::Handle>,
{
    pub fn new(
        config: RouterConfig,
        host: Arc<W>,
        sender: Arc<S>,
        handlers: HandlerTable<W::Handle>,
    ) -> Self {
        Self {
            session: SessionState::new(config.replay_capacity),
            binder: Arc::new(PassthroughBinder),
            config,
            host,
            sender,
            handlers,
        }
    }

    /// Replace the pass-through payload binder.
    pub fn with_binder(mut self, binder: Arc<dyn CallableBinder<W::Handle>>) -> Self {
        self.binder = binder;
        self
    }

    /// Replace the session state (e.g. to share a host-provided registry).
    pub fn with_session(mut self, session: SessionState<W::Handle>) -> Self {
        self.session = session;
        self
    }

    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    pub fn session(&self) -> &SessionState<W::Handle> {
        &self.session
    }

    pub fn host(&self) -> &W {
        &self.host
    }

    /// Run the pipeline for one event.
    pub fn receive(&self, event: ChannelEvent<W::Handle>) -> ReceiveResult {
        let ChannelEvent {
            source,
            origin,
            data,
        } = event;

        let Some(source) = source else {
            return Ok(ReceiveOutcome::Dropped(DropReason::NoSource));
        };

        let (mut message, handler) = match validate_payload(&data, |t| self.handlers.get(t)) {
            Ok(recognized) => recognized,
            Err(reason) => {
                trace!(?reason, "Ignoring channel payload");
                return Ok(ReceiveOutcome::Dropped(reason));
            }
        };

        let sender_same_origin = self.host.is_same_origin(&source);
        let origin = self.origin_for(&source, &origin, sender_same_origin, &message);

        if !self.session.first_observation(&message.id) {
            trace!(id = %message.id, "Ignoring replayed message");
            return Ok(ReceiveOutcome::Dropped(DropReason::Duplicate));
        }

        authenticate(&message, &origin, sender_same_origin)?;
        self.session
            .registry()
            .register(&message.source, source.clone(), &origin);

        match self.resolve_proxy_target(&mut message)? {
            ProxyTarget::Window(target) => self.forward(target, message),
            ProxyTarget::Unresolved(err) => {
                debug!(id = %message.id, "{err}");
                Ok(ReceiveOutcome::Halted(Diagnostic::TargetUnresolved(err)))
            }
            ProxyTarget::Local => self.deliver(source, message, origin, handler),
        }
    }

    fn origin_for(
        &self,
        source: &W::Handle,
        observed: &str,
        same_origin: bool,
        message: &MessageEnvelope,
    ) -> String {
        let direct = if same_origin {
            match self.host.domain_of(source) {
                Ok(domain) => Some(domain),
                Err(e) => {
                    warn!(error = %e, "Could not read domain of same-origin sender");
                    None
                }
            }
        } else {
            None
        };

        effective_origin(
            observed,
            direct.as_deref(),
            &message.source_domain,
            &self.config.mock_domain_prefix,
        )
    }

    fn resolve_proxy_target(
        &self,
        message: &mut MessageEnvelope,
    ) -> Result<ProxyTarget<W::Handle>, RouterError> {
        let own_id = self.host.current_window_id();

        match select_target(message, &own_id) {
            TargetSelection::Hint { hint, reference } => {
                Ok(match resolve_relation(self.host.as_ref(), &hint, reference.as_ref()) {
                    Ok(window) => ProxyTarget::Window(window),
                    Err(e) => ProxyTarget::Unresolved(e),
                })
            }
            TargetSelection::Registered(id) => self
                .session
                .registry()
                .lookup(&id)
                .map(ProxyTarget::Window)
                .ok_or(RouterError::TargetNotFound(id)),
            TargetSelection::Local => Ok(ProxyTarget::Local),
        }
    }

    fn forward(&self, target: W::Handle, mut message: MessageEnvelope) -> ReceiveResult {
        log_receive(classify_receive(&message, true, &self.config), &message, true);

        if self.host.is_closed(&target) {
            let diagnostic = Diagnostic::TargetClosed {
                target: message.target.clone(),
                message_type: message.message_type,
                name: message.name.clone(),
            };
            debug!("{diagnostic}");
            return Ok(ReceiveOutcome::Halted(diagnostic));
        }

        let target_id = message.target.take();
        let restriction = DomainRestriction::for_forward(message.domain.as_deref());
        let message_id = message.id.clone();

        self.sender
            .send(&target, message, restriction.clone(), true)
            .map_err(|reason| RouterError::Send {
                message_id: message_id.clone(),
                reason,
            })?;

        Ok(ReceiveOutcome::Forwarded {
            message_id,
            target: target_id,
            restriction,
        })
    }

    fn deliver(
        &self,
        source: W::Handle,
        mut message: MessageEnvelope,
        origin: String,
        handler: &dyn MessageHandler<W::Handle>,
    ) -> ReceiveResult {
        log_receive(classify_receive(&message, false, &self.config), &message, false);

        let original = match self.resolve_original_source(&source, &mut message)? {
            OriginalSource::Window(window) => window,
            OriginalSource::Unresolved(err) => {
                debug!(id = %message.id, "{err}");
                return Ok(ReceiveOutcome::Halted(Diagnostic::SourceUnresolved(err)));
            }
        };

        if original != source {
            self.session.bridges().record(source, original.clone());
        }

        if self.host.is_closed(&original) {
            let diagnostic = Diagnostic::SourceClosed {
                window: message.original_source().clone(),
                message_type: message.message_type,
                name: message.name.clone(),
            };
            debug!("{diagnostic}");
            return Ok(ReceiveOutcome::Halted(diagnostic));
        }

        if !self.config.mock_mode {
            if let Some(data) = message.data.take() {
                message.data = Some(self.binder.bind_callables(&original, data));
            }
        }

        let message_type = message.message_type;
        handler
            .handle(&original, &message, &origin)
            .map_err(|reason| RouterError::Handler {
                message_type,
                reason,
            })?;

        Ok(ReceiveOutcome::Dispatched {
            message_id: message.id,
            message_type,
        })
    }

    fn resolve_original_source(
        &self,
        source: &W::Handle,
        message: &mut MessageEnvelope,
    ) -> Result<OriginalSource<W::Handle>, RouterError> {
        let original = match select_original_source(message) {
            SourceSelection::Immediate => return Ok(OriginalSource::Window(source.clone())),
            SourceSelection::Hint { hint, reference } => {
                match resolve_relation(self.host.as_ref(), &hint, Some(&reference)) {
                    Ok(window) => window,
                    Err(e) => return Ok(OriginalSource::Unresolved(e)),
                }
            }
            SourceSelection::Registered(id) => self
                .session
                .registry()
                .lookup(&id)
                .ok_or(RouterError::OriginNotFound(id))?,
        };

        self.session.registry().register(
            message.original_source(),
            original.clone(),
            message.original_source_domain(),
        );

        Ok(OriginalSource::Window(original))
    }
}

impl<W, S> ChannelReceiver<W::Handle> for MessageRouter<W, S>
where
    W: WindowHost,
    S: MessageSender<W::Handle>,
{
    fn on_channel_event(&self, event: ChannelEvent<W::Handle>) -> ReceiveResult {
        self.receive(event)
    }
}
