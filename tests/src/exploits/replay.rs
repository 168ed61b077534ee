//! # Replay Attacks
//!
//! Re-delivery of an already observed message id, with identical or altered
//! content, from the same or a different sender.

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use serde_json::json;
    use shared_types::MessageType;
    use window_router::{DropReason, ReceiveOutcome, RouterConfig};

    use crate::fixtures::{envelope, Harness, WIDGET};

    #[test]
    fn test_altered_replay_is_dropped() {
        let top = Harness::at("top");
        top.receive_from("widget", &envelope("m1", MessageType::Request, "widget", WIDGET))
            .unwrap();

        let mut altered = envelope("m1", MessageType::Response, "widget", WIDGET);
        altered["data"] = json!({"amount": 1_000_000});
        let outcome = top.receive_from("widget", &altered).unwrap();

        assert_eq!(outcome, ReceiveOutcome::Dropped(DropReason::Duplicate));
        assert_eq!(top.delivered().len(), 1);
        assert_eq!(top.delivered()[0].envelope.message_type, MessageType::Request);
    }

    #[test]
    fn test_replay_through_another_window_is_dropped() {
        let widget = Harness::at("widget");
        widget
            .receive_from("popup", &envelope("m1", MessageType::Request, "popup", WIDGET))
            .unwrap();

        let outcome = widget
            .receive_from("popup2", &envelope("m1", MessageType::Request, "popup2", WIDGET))
            .unwrap();

        assert_eq!(outcome, ReceiveOutcome::Dropped(DropReason::Duplicate));
        assert_eq!(widget.delivered().len(), 1);
    }

    #[test]
    fn test_replayed_forward_is_not_sent_twice() {
        let widget = Harness::at("widget");
        let mut message = envelope("m1", MessageType::Request, "popup", WIDGET);
        message["targetHint"] = json!("window.parent");

        widget.receive_from("popup", &message).unwrap();
        widget.receive_from("popup", &message).unwrap();

        assert_eq!(widget.sent().len(), 1);
    }

    #[test]
    fn test_bounded_guard_forgets_oldest_ids() {
        let top = Harness::with_config("top", RouterConfig::default().with_replay_capacity(Some(2)));
        for id in ["m1", "m2", "m3"] {
            top.receive_from("widget", &envelope(id, MessageType::Request, "widget", WIDGET))
                .unwrap();
        }

        // m3 is still remembered; m1 was evicted.
        let m3 = top
            .receive_from("widget", &envelope("m3", MessageType::Request, "widget", WIDGET))
            .unwrap();
        assert_eq!(m3, ReceiveOutcome::Dropped(DropReason::Duplicate));

        let m1 = top
            .receive_from("widget", &envelope("m1", MessageType::Request, "widget", WIDGET))
            .unwrap();
        assert!(m1.is_delivered());
        assert_eq!(top.router.session().remembered_messages(), 2);
    }

    #[test]
    fn test_session_reset_forgets_ids() {
        let top = Harness::at("top");
        let message = envelope("m1", MessageType::Request, "widget", WIDGET);

        top.receive_from("widget", &message).unwrap();
        top.router.session().reset_replay();

        assert!(top.receive_from("widget", &message).unwrap().is_delivered());
        assert_eq!(top.delivered().len(), 2);
    }

    proptest! {
        #[test]
        fn test_each_id_dispatched_exactly_once(ids in prop::collection::vec(0u8..6, 1..40)) {
            let top = Harness::at("top");

            for id in &ids {
                let message = envelope(&format!("m{id}"), MessageType::Request, "widget", WIDGET);
                top.receive_from("widget", &message).unwrap();
            }

            let mut first_seen = Vec::new();
            for id in &ids {
                let id = format!("m{id}");
                if !first_seen.contains(&id) {
                    first_seen.push(id);
                }
            }

            let delivered: Vec<String> = top
                .delivered()
                .into_iter()
                .map(|d| d.envelope.id)
                .collect();
            prop_assert_eq!(delivered, first_seen);
        }
    }
}
