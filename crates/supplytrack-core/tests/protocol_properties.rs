//! Property tests for inbound frame decoding

use proptest::prelude::*;
use supplytrack_core::{decode_frame, InboundFrame, NotificationId};

/// JSON values a server could put in an optional product field
fn loose_value_strategy() -> impl Strategy<Value = serde_json::Value> {
    prop_oneof![
        Just(serde_json::Value::Null),
        any::<bool>().prop_map(serde_json::Value::from),
        any::<i64>().prop_map(serde_json::Value::from),
        any::<f64>().prop_map(serde_json::Value::from),
        ".{0,16}".prop_map(serde_json::Value::from),
        proptest::collection::vec(any::<i32>(), 0..4).prop_map(serde_json::Value::from),
    ]
}

proptest! {
    /// Property: decoding arbitrary text returns a result instead of panicking
    #[test]
    fn prop_decode_is_total(payload in ".{0,128}") {
        let _ = decode_frame(&payload);
    }

    /// Property: integer ids decode to the same id as their decimal text
    #[test]
    fn prop_integer_ids_match_their_text(id in any::<u64>()) {
        let payload = format!(
            r#"{{"type":"restock_resolved","notification":{{"id":{id},"message":"ok"}}}}"#
        );
        let notification = match decode_frame(&payload).unwrap() {
            InboundFrame::RestockResolved { notification } => notification,
            other => panic!("unexpected frame {other:?}"),
        };
        prop_assert_eq!(&notification.id, &NotificationId::from(id));
        prop_assert_eq!(notification.id.as_str(), id.to_string());
    }

    /// Property: product fields of any shape never cost a restock its id or text
    #[test]
    fn prop_product_fields_never_drop_restocks(
        product_name in loose_value_strategy(),
        product_id in loose_value_strategy(),
        forecasted_quantity in loose_value_strategy(),
        current_stock in loose_value_strategy(),
    ) {
        let payload = serde_json::json!({
            "type": "restock_notification",
            "notification": {
                "id": "n1",
                "message": "Widget low",
                "timestamp": "2024-01-01T00:00:00Z",
                "product_name": product_name,
                "product_id": product_id,
                "forecasted_quantity": forecasted_quantity,
                "current_stock": current_stock,
            },
        })
        .to_string();

        let notification = match decode_frame(&payload).unwrap() {
            InboundFrame::RestockNotification { notification } => notification,
            other => panic!("unexpected frame {other:?}"),
        };
        prop_assert_eq!(notification.id.as_str(), "n1");
        prop_assert_eq!(notification.message.as_str(), "Widget low");
        prop_assert!(notification.timestamp.is_some());
    }
}
