//! Notification records
//!
//! A record is the stored representation of one inventory event, independent
//! of how (or whether) it is currently displayed. `kind` never changes after
//! construction; `status` moves `New → Resolved` at most once.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Session-unique notification identifier.
///
/// The inventory server emits database keys as JSON integers; other sources
/// use strings. Both decode to the same textual id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NotificationId(String);

impl NotificationId {
    /// Create an id from any string-like value
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the textual form
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NotificationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NotificationId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for NotificationId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<u64> for NotificationId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

impl Serialize for NotificationId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for NotificationId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Signed(i64),
            Unsigned(u64),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(text) => Self(text),
            RawId::Signed(value) => Self(value.to_string()),
            RawId::Unsigned(value) => Self(value.to_string()),
        })
    }
}

/// Event taxonomy. Fixed at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// Stock dropped below the forecast; restock needed
    Restock,
    /// A previous restock issue was resolved
    Resolved,
    /// Informational, injected locally
    Info,
}

/// Record lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationStatus {
    /// Not yet resolved
    #[default]
    New,
    /// Resolved by an inbound resolution event
    Resolved,
}

/// Product context attached to restock events by the inventory server.
///
/// Every field is optional context. A value of an unexpected shape decodes as
/// absent instead of failing the enclosing frame.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RestockDetails {
    /// Product display name
    #[serde(
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub product_name: Option<String>,
    /// Product catalogue code; numeric codes are kept as their decimal text
    #[serde(
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub product_id: Option<String>,
    /// Quantity the demand forecast calls for
    #[serde(
        default,
        deserialize_with = "lenient_quantity",
        skip_serializing_if = "Option::is_none"
    )]
    pub forecasted_quantity: Option<i64>,
    /// Stock on hand when the event was raised
    #[serde(
        default,
        deserialize_with = "lenient_quantity",
        skip_serializing_if = "Option::is_none"
    )]
    pub current_stock: Option<i64>,
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<serde_json::Value>::deserialize(deserializer)? {
        Some(serde_json::Value::String(text)) => Some(text),
        Some(serde_json::Value::Number(number)) => Some(number.to_string()),
        _ => None,
    })
}

fn lenient_quantity<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<serde_json::Value>::deserialize(deserializer)? {
        Some(serde_json::Value::Number(number)) => {
            number.as_i64().or_else(|| number.as_f64().and_then(whole_number))
        }
        Some(serde_json::Value::String(text)) => {
            let text = text.trim();
            text.parse::<i64>()
                .ok()
                .or_else(|| text.parse::<f64>().ok().and_then(whole_number))
        }
        _ => None,
    })
}

// Whole, in-range floats only; `4.0` is a count, `4.5` is not.
#[allow(clippy::cast_possible_truncation)]
fn whole_number(value: f64) -> Option<i64> {
    let in_range = value >= i64::MIN as f64 && value < i64::MAX as f64;
    (value.is_finite() && value.fract() == 0.0 && in_range).then_some(value as i64)
}

impl RestockDetails {
    /// Units still needed to cover the forecast, if both quantities are known.
    pub fn quantity_needed(&self) -> Option<i64> {
        match (self.forecasted_quantity, self.current_stock) {
            (Some(forecast), Some(stock)) => Some((forecast - stock).max(0)),
            _ => None,
        }
    }
}

/// One notification as held by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationRecord {
    /// Session-unique id
    pub id: NotificationId,
    /// Event kind
    pub kind: NotificationKind,
    /// Human-readable text
    pub message: String,
    /// When the server raised the event
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
    /// Lifecycle status
    #[serde(default)]
    pub status: NotificationStatus,
    /// Product context, when the server sent it
    #[serde(default)]
    pub details: RestockDetails,
}

impl NotificationRecord {
    /// Create a record in the `New` state
    pub fn new(id: NotificationId, kind: NotificationKind, message: impl Into<String>) -> Self {
        Self {
            id,
            kind,
            message: message.into(),
            timestamp: None,
            status: NotificationStatus::New,
            details: RestockDetails::default(),
        }
    }

    /// Attach a server timestamp
    pub fn with_timestamp(mut self, timestamp: Option<DateTime<Utc>>) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Attach product details
    pub fn with_details(mut self, details: RestockDetails) -> Self {
        self.details = details;
        self
    }

    /// Whether the record has been resolved
    pub fn is_resolved(&self) -> bool {
        self.status == NotificationStatus::Resolved
    }

    /// Move `New → Resolved`. Returns `false` if already resolved.
    pub fn mark_resolved(&mut self) -> bool {
        if self.is_resolved() {
            return false;
        }
        self.status = NotificationStatus::Resolved;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_accepts_strings_and_integers() {
        let text: NotificationId = serde_json::from_str("\"n1\"").unwrap();
        let number: NotificationId = serde_json::from_str("42").unwrap();
        assert_eq!(text.as_str(), "n1");
        assert_eq!(number, NotificationId::from(42u64));
    }

    #[test]
    fn id_rejects_objects() {
        assert!(serde_json::from_str::<NotificationId>("{}").is_err());
    }

    #[test]
    fn resolution_happens_once() {
        let mut record = NotificationRecord::new("n1".into(), NotificationKind::Restock, "low");
        assert!(record.mark_resolved());
        assert!(!record.mark_resolved());
        assert!(record.is_resolved());
    }

    #[test]
    fn details_tolerate_loose_field_types() {
        let details: RestockDetails = serde_json::from_str(
            r#"{"product_name":"Widget","product_id":123,"forecasted_quantity":"60","current_stock":4.0}"#,
        )
        .unwrap();
        assert_eq!(details.product_id.as_deref(), Some("123"));
        assert_eq!(details.forecasted_quantity, Some(60));
        assert_eq!(details.current_stock, Some(4));
        assert_eq!(details.quantity_needed(), Some(56));
    }

    #[test]
    fn details_drop_values_of_the_wrong_shape() {
        let details: RestockDetails = serde_json::from_str(
            r#"{"product_name":["Widget"],"product_id":null,"forecasted_quantity":4.5,"current_stock":"lots"}"#,
        )
        .unwrap();
        assert_eq!(details, RestockDetails::default());
    }

    #[test]
    fn quantity_needed_clamps_at_zero() {
        let details = RestockDetails {
            forecasted_quantity: Some(10),
            current_stock: Some(25),
            ..RestockDetails::default()
        };
        assert_eq!(details.quantity_needed(), Some(0));
        assert_eq!(RestockDetails::default().quantity_needed(), None);
    }
}
