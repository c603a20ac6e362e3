//! Notification channel wire protocol
//!
//! Frames are JSON text objects discriminated by a `type` field:
//!
//! | Direction | `type` | Payload |
//! |-----------|--------|---------|
//! | out | `ping` | none |
//! | in | `pong` | none |
//! | in | `restock_notification` | `notification: {id, message, timestamp, ...}` |
//! | in | `restock_resolved` | `notification: {id, message, timestamp?, ...}` |
//!
//! Unknown types decode to [`InboundFrame::Unknown`] rather than failing.
//! The inventory server groups event payloads under `message`; that key is
//! accepted as an alias of `notification`.

use crate::errors::ProtocolError;
use crate::notification::{
    NotificationId, NotificationKind, NotificationRecord, RestockDetails,
};
use crate::toast::ToastLevel;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Event payload carried by restock frames
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NotificationPayload {
    /// Record id
    pub id: NotificationId,
    /// Display text
    #[serde(default)]
    pub message: String,
    /// Server timestamp; unparseable values are treated as absent
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub timestamp: Option<DateTime<Utc>>,
    /// Product context
    #[serde(flatten)]
    pub details: RestockDetails,
}

impl NotificationPayload {
    /// Build a `New` record of the given kind from this payload
    pub fn into_record(self, kind: NotificationKind) -> NotificationRecord {
        NotificationRecord::new(self.id, kind, self.message)
            .with_timestamp(self.timestamp)
            .with_details(self.details)
    }
}

fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(raw
        .as_ref()
        .and_then(serde_json::Value::as_str)
        .and_then(|text| DateTime::parse_from_rfc3339(text).ok())
        .map(|parsed| parsed.with_timezone(&Utc)))
}

/// Server → client frame
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InboundFrame {
    /// A product needs restocking
    RestockNotification {
        /// Event payload
        #[serde(alias = "message")]
        notification: NotificationPayload,
    },
    /// A restock issue was resolved
    RestockResolved {
        /// Event payload
        #[serde(alias = "message")]
        notification: NotificationPayload,
    },
    /// Keepalive acknowledgment
    Pong,
    /// Any other `type`; tolerated and ignored
    #[serde(other)]
    Unknown,
}

impl InboundFrame {
    /// Wire name of the frame type, for logging
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::RestockNotification { .. } => "restock_notification",
            Self::RestockResolved { .. } => "restock_resolved",
            Self::Pong => "pong",
            Self::Unknown => "unknown",
        }
    }
}

/// Client → server frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutboundFrame {
    /// Keepalive probe
    Ping,
}

impl OutboundFrame {
    /// Encode as a JSON text frame
    pub fn encode(&self) -> Result<String, ProtocolError> {
        serde_json::to_string(self).map_err(|e| ProtocolError::Encode {
            message: e.to_string(),
        })
    }
}

/// Decode one inbound text frame
pub fn decode_frame(payload: &str) -> Result<InboundFrame, ProtocolError> {
    serde_json::from_str(payload).map_err(|e| ProtocolError::MalformedFrame {
        message: e.to_string(),
    })
}


/// One server-rendered page flash
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FlashMessage {
    /// Display text
    pub message: String,
    /// Space-separated level tags, e.g. `"alert-success success"`
    #[serde(default)]
    pub tags: String,
}

impl FlashMessage {
    /// Classify by substring match on the tags
    pub fn level(&self) -> ToastLevel {
        if self.tags.contains("success") {
            ToastLevel::Success
        } else if self.tags.contains("error") {
            ToastLevel::Error
        } else {
            ToastLevel::Info
        }
    }
}

/// Decode the page's embedded flash payload
pub fn decode_flashes(payload: &str) -> Result<Vec<FlashMessage>, ProtocolError> {
    serde_json::from_str(payload).map_err(|e| ProtocolError::MalformedFlash {
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_restock_notification() {
        let frame = decode_frame(
            r#"{"type":"restock_notification","notification":{"id":"n1","message":"Low stock: SKU123","timestamp":"2024-01-01T00:00:00Z"}}"#,
        )
        .unwrap();

        let InboundFrame::RestockNotification { notification } = frame else {
            panic!("expected restock notification, got {frame:?}");
        };
        assert_eq!(notification.id.as_str(), "n1");
        assert_eq!(notification.message, "Low stock: SKU123");
        assert!(notification.timestamp.is_some());
    }

    #[test]
    fn accepts_server_message_key_and_product_fields() {
        let frame = decode_frame(
            r#"{"type":"restock_notification","message":{"id":17,"product_name":"Widget","product_id":"AB12CD34EF","forecasted_quantity":60,"current_stock":4,"message":"Restock needed for Widget","timestamp":"2024-03-02T10:00:00+02:00","type":"restock_alert"}}"#,
        )
        .unwrap();

        let InboundFrame::RestockNotification { notification } = frame else {
            panic!("expected restock notification");
        };
        assert_eq!(notification.id.as_str(), "17");
        assert_eq!(notification.details.product_name.as_deref(), Some("Widget"));
        assert_eq!(notification.details.quantity_needed(), Some(56));
        assert_eq!(
            notification.timestamp.map(|t| t.to_rfc3339()),
            Some("2024-03-02T08:00:00+00:00".to_string())
        );
    }

    #[test]
    fn loosely_typed_product_fields_keep_the_notification() {
        for extra in [
            r#""current_stock":4.0"#,
            r#""product_id":123"#,
            r#""forecasted_quantity":"60""#,
            r#""product_name":{"en":"Widget"}"#,
        ] {
            let payload = format!(
                r#"{{"type":"restock_notification","notification":{{"id":"n1","message":"Widget low","timestamp":"2024-01-01T00:00:00Z",{extra}}}}}"#
            );
            let Ok(InboundFrame::RestockNotification { notification }) = decode_frame(&payload)
            else {
                panic!("restock dropped for {extra}");
            };
            assert_eq!(notification.id, NotificationId::from("n1"));
            assert_eq!(notification.message, "Widget low");
            assert!(notification.timestamp.is_some());
        }
    }

    #[test]
    fn resolution_without_timestamp_decodes() {
        let frame =
            decode_frame(r#"{"type":"restock_resolved","notification":{"id":"n1","message":"ok"}}"#)
                .unwrap();
        assert_eq!(frame.type_name(), "restock_resolved");
    }

    #[test]
    fn bad_timestamp_is_dropped_not_fatal() {
        let frame = decode_frame(
            r#"{"type":"restock_resolved","notification":{"id":"n1","message":"ok","timestamp":"yesterday"}}"#,
        )
        .unwrap();
        let InboundFrame::RestockResolved { notification } = frame else {
            panic!("expected resolution");
        };
        assert_eq!(notification.timestamp, None);
    }

    #[test]
    fn unknown_types_are_tolerated() {
        assert_eq!(
            decode_frame(r#"{"type":"price_change","sku":"X"}"#).unwrap(),
            InboundFrame::Unknown
        );
        assert_eq!(decode_frame(r#"{"type":"pong"}"#).unwrap(), InboundFrame::Pong);
    }

    #[test]
    fn malformed_frames_are_errors() {
        for payload in ["", "not json", "[]", "{}", r#"{"kind":"pong"}"#, r#"{"type":"restock_notification"}"#] {
            assert!(
                matches!(decode_frame(payload), Err(ProtocolError::MalformedFrame { .. })),
                "payload {payload:?} should be rejected"
            );
        }
    }

    #[test]
    fn ping_encodes_as_typed_object() {
        assert_eq!(OutboundFrame::Ping.encode().unwrap(), r#"{"type":"ping"}"#);
    }

    #[test]
    fn flash_levels_follow_tags() {
        let flashes = decode_flashes(
            r#"[{"message":"Saved","tags":"success"},{"message":"Nope","tags":"alert error"},{"message":"Hi","tags":""},{"message":"Bare"}]"#,
        )
        .unwrap();
        let levels: Vec<_> = flashes.iter().map(FlashMessage::level).collect();
        assert_eq!(
            levels,
            vec![ToastLevel::Success, ToastLevel::Error, ToastLevel::Info, ToastLevel::Info]
        );
        assert!(decode_flashes("{").is_err());
    }
}
