//! # Receive Scenarios
//!
//! One router, one event at a time. Every test checks that at most one of
//! {forward, dispatch} happened.

#[cfg(test)]
mod tests {
    use serde_json::json;
    use shared_types::{DomainRestriction, MessageType, WindowId};
    use window_router::{
        Diagnostic, DomainClaim, DropReason, ReceiveOutcome, ResolutionError, RouterConfig,
        RouterError,
    };

    use crate::fixtures::{envelope, Harness, WIDGET};

    // =========================================================================
    // LOCAL DELIVERY
    // =========================================================================

    #[test]
    fn test_dispatch_to_immediate_sender() {
        let top = Harness::at("top");
        let mut message = envelope("m1", MessageType::Ack, "w1", WIDGET);
        message["originalSource"] = json!("w1");
        message["originalSourceDomain"] = json!(WIDGET);

        let outcome = top.receive_from("widget", &message).unwrap();

        assert_eq!(
            outcome,
            ReceiveOutcome::Dispatched {
                message_id: "m1".to_string(),
                message_type: MessageType::Ack,
            }
        );
        let delivered = top.delivered();
        assert_eq!(delivered.len(), 1);
        assert_eq!(delivered[0].source, top.key("widget"));
        assert_eq!(delivered[0].origin, WIDGET);
        assert!(top.sent().is_empty());

        // The sender is now known under its claimed id.
        assert_eq!(
            top.router.session().registry().lookup(&WindowId::new("w1")),
            Some(top.key("widget"))
        );
        assert_eq!(top.router.session().bridges().original_for(&top.key("widget")), None);
    }

    #[test]
    fn test_replay_is_a_no_op() {
        let top = Harness::at("top");
        let message = envelope("m1", MessageType::Ack, "w1", WIDGET);

        top.receive_from("widget", &message).unwrap();
        let outcome = top.receive_from("widget", &message).unwrap();

        assert_eq!(outcome, ReceiveOutcome::Dropped(DropReason::Duplicate));
        assert_eq!(top.delivered().len(), 1);
        assert!(top.sent().is_empty());
    }

    #[test]
    fn test_spoofed_source_domain_is_fatal() {
        let top = Harness::at("top");
        let message = envelope("m1", MessageType::Ack, "w1", "https://evil.com");

        let err = top.receive_from("widget", &message).unwrap_err();

        match err {
            RouterError::OriginMismatch {
                claim,
                claimed,
                observed,
            } => {
                assert_eq!(claim, DomainClaim::Source);
                assert_eq!(claimed, "https://evil.com");
                assert_eq!(observed, WIDGET);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(top.delivered().is_empty());
        assert!(top.sent().is_empty());
    }

    // =========================================================================
    // PROXYING
    // =========================================================================

    #[test]
    fn test_forward_to_registered_target() {
        let top = Harness::at("top");
        top.register("ads");

        let mut message = envelope("m1", MessageType::Request, "widget", WIDGET);
        message["target"] = json!("ads");
        let outcome = top.receive_from("widget", &message).unwrap();

        assert_eq!(
            outcome,
            ReceiveOutcome::Forwarded {
                message_id: "m1".to_string(),
                target: Some(WindowId::new("ads")),
                restriction: DomainRestriction::Any,
            }
        );
        let sent = top.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].target, top.key("ads"));
        assert!(sent[0].proxied);
        assert!(sent[0].envelope.target.is_none());
        assert!(top.delivered().is_empty());
    }

    #[test]
    fn test_forward_honors_explicit_domain() {
        let top = Harness::at("top");
        top.register("ads");

        let mut message = envelope("m1", MessageType::Request, "widget", WIDGET);
        message["target"] = json!("ads");
        message["domain"] = json!("https://ads.example");
        top.receive_from("widget", &message).unwrap();

        assert_eq!(
            top.sent()[0].restriction,
            DomainRestriction::Exact("https://ads.example".to_string())
        );
    }

    #[test]
    fn test_closed_target_is_diagnosed() {
        let top = Harness::at("top");
        top.register("ads");
        top.graph.close(top.key("ads"));

        let mut message = envelope("m1", MessageType::Request, "widget", WIDGET);
        message["target"] = json!("ads");
        let outcome = top.receive_from("widget", &message).unwrap();

        assert!(matches!(
            outcome,
            ReceiveOutcome::Halted(Diagnostic::TargetClosed { target: Some(ref id), .. })
                if id.as_str() == "ads"
        ));
        assert!(top.sent().is_empty());
        assert!(top.delivered().is_empty());
    }

    #[test]
    fn test_unregistered_target_is_fatal() {
        let top = Harness::at("top");
        let mut message = envelope("m1", MessageType::Request, "widget", WIDGET);
        message["target"] = json!("nobody");

        assert!(matches!(
            top.receive_from("widget", &message),
            Err(RouterError::TargetNotFound(_))
        ));
        assert!(top.sent().is_empty());
    }

    #[test]
    fn test_own_id_as_target_delivers_locally() {
        let top = Harness::at("top");
        let mut message = envelope("m1", MessageType::Request, "widget", WIDGET);
        message["target"] = json!("top");

        let outcome = top.receive_from("widget", &message).unwrap();
        assert!(outcome.is_delivered());
        assert_eq!(top.delivered().len(), 1);
        assert!(top.sent().is_empty());
    }

    // =========================================================================
    // RELATION HINTS
    // =========================================================================

    #[test]
    fn test_target_hint_is_consumed_before_forwarding() {
        let widget = Harness::at("widget");
        let mut message = envelope("m1", MessageType::Request, "popup", WIDGET);
        message["target"] = json!("top");
        message["targetHint"] = json!("window.parent");

        widget.receive_from("popup", &message).unwrap();

        let sent = widget.sent();
        assert_eq!(sent[0].target, widget.key("top"));
        assert!(sent[0].envelope.target_hint.is_none());
        assert!(sent[0].envelope.target.is_none());
    }

    #[test]
    fn test_unresolvable_target_hint_is_diagnosed() {
        let top = Harness::at("top");
        let mut message = envelope("m1", MessageType::Request, "widget", WIDGET);
        message["targetHint"] = json!("window.opener");

        let outcome = top.receive_from("widget", &message).unwrap();

        assert!(matches!(
            outcome,
            ReceiveOutcome::Halted(Diagnostic::TargetUnresolved(
                ResolutionError::NotAvailable { .. }
            ))
        ));
        assert!(top.sent().is_empty());
        assert!(top.delivered().is_empty());
    }

    #[test]
    fn test_unknown_hint_is_diagnosed() {
        let top = Harness::at("top");
        let mut message = envelope("m1", MessageType::Request, "widget", WIDGET);
        message["targetHint"] = json!("window.top.frames[0]");

        let outcome = top.receive_from("widget", &message).unwrap();
        assert!(matches!(
            outcome,
            ReceiveOutcome::Halted(Diagnostic::TargetUnresolved(
                ResolutionError::UnknownHint { .. }
            ))
        ));
    }

    #[test]
    fn test_source_hint_resolves_original_sender() {
        let popup = Harness::at("popup");
        let mut message = envelope("m1", MessageType::Request, "popup2", WIDGET);
        message["originalSource"] = json!("origin-frame");
        message["originalSourceDomain"] = json!(WIDGET);
        message["sourceHint"] = json!("window.opener");

        popup.receive_from("popup2", &message).unwrap();

        let delivered = popup.delivered();
        assert_eq!(delivered[0].source, popup.key("widget"));
        assert!(delivered[0].envelope.source_hint.is_none());
        assert_eq!(
            popup.router.session().registry().lookup(&WindowId::new("origin-frame")),
            Some(popup.key("widget"))
        );
        assert_eq!(
            popup.router.session().bridges().original_for(&popup.key("popup2")),
            Some(popup.key("widget"))
        );
    }

    #[test]
    fn test_unresolvable_source_hint_is_diagnosed() {
        let top = Harness::at("top");
        let mut message = envelope("m1", MessageType::Request, "widget", WIDGET);
        message["originalSource"] = json!("somewhere");
        message["sourceHint"] = json!("window.parent");

        let outcome = top.receive_from("widget", &message).unwrap();
        assert!(matches!(
            outcome,
            ReceiveOutcome::Halted(Diagnostic::SourceUnresolved(_))
        ));
        assert!(top.delivered().is_empty());
    }

    // =========================================================================
    // ORIGINAL SOURCE
    // =========================================================================

    #[test]
    fn test_unknown_original_source_is_fatal() {
        let top = Harness::at("top");
        let mut message = envelope("m1", MessageType::Request, "widget", WIDGET);
        message["originalSource"] = json!("ghost");

        assert!(matches!(
            top.receive_from("widget", &message),
            Err(RouterError::OriginNotFound(id)) if id.as_str() == "ghost"
        ));
        assert!(top.delivered().is_empty());
    }

    #[test]
    fn test_registered_original_source_gets_bridge() {
        let widget = Harness::at("widget");
        widget.register("popup2");

        let mut message = envelope("m1", MessageType::Response, "popup", WIDGET);
        message["originalSource"] = json!("popup2");
        widget.receive_from("popup", &message).unwrap();

        assert_eq!(widget.delivered()[0].source, widget.key("popup2"));
        assert_eq!(
            widget.router.session().bridges().original_for(&widget.key("popup")),
            Some(widget.key("popup2"))
        );
    }

    #[test]
    fn test_original_source_resolving_to_sender_records_no_bridge() {
        let widget = Harness::at("widget");
        widget
            .router
            .session()
            .registry()
            .register(&WindowId::new("popup2"), widget.key("popup"), WIDGET);

        let mut message = envelope("m1", MessageType::Request, "popup", WIDGET);
        message["originalSource"] = json!("popup2");
        let outcome = widget.receive_from("popup", &message).unwrap();

        assert!(outcome.is_delivered());
        assert_eq!(widget.delivered()[0].source, widget.key("popup"));
        assert_eq!(widget.router.session().bridges().original_for(&widget.key("popup")), None);
    }

    #[test]
    fn test_closed_original_source_is_diagnosed() {
        let widget = Harness::at("widget");
        widget.register("popup2");
        widget.graph.close(widget.key("popup2"));

        let mut message = envelope("m1", MessageType::Response, "popup", WIDGET);
        message["originalSource"] = json!("popup2");
        let outcome = widget.receive_from("popup", &message).unwrap();

        assert!(matches!(
            outcome,
            ReceiveOutcome::Halted(Diagnostic::SourceClosed { .. })
        ));
        assert!(widget.delivered().is_empty());
    }

    // =========================================================================
    // PAYLOAD HANDLING
    // =========================================================================

    #[test]
    fn test_payload_reaches_handler() {
        let top = Harness::with_config("top", RouterConfig::default().with_mock_mode(true));
        let mut message = envelope("m1", MessageType::Request, "widget", WIDGET);
        message["data"] = json!({"greeting": "hello"});
        message["name"] = json!("postrobot_hello");

        top.receive_from("widget", &message).unwrap();

        let delivered = top.delivered();
        assert_eq!(delivered[0].envelope.data, Some(json!({"greeting": "hello"})));
        assert_eq!(delivered[0].envelope.name.as_deref(), Some("postrobot_hello"));
    }

    #[test]
    fn test_noise_on_the_channel_is_ignored() {
        let top = Harness::at("top");

        for payload in [
            json!("not even json {"),
            json!({"type": "webpackOk"}),
            json!({"hello": "world"}),
            json!([1, 2, 3]),
        ] {
            let outcome = top.receive_from("widget", &payload).unwrap();
            assert!(matches!(outcome, ReceiveOutcome::Dropped(_)), "{payload}");
        }
        assert!(top.delivered().is_empty());
        assert_eq!(top.router.session().remembered_messages(), 0);
    }
}
