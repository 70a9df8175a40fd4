//! Order receipts handed from checkout to the confirmation page.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A one-time order receipt.
///
/// Only the tracking number is interpreted; everything else the checkout
/// sends along is kept verbatim in `metadata`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderReceipt {
    pub tracking_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placed_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub metadata: serde_json::Map<String, serde_json::Value>,
}

impl OrderReceipt {
    /// Create a receipt with no extra metadata.
    #[must_use]
    pub fn new(tracking_number: impl Into<String>) -> Self {
        Self {
            tracking_number: tracking_number.into(),
            placed_at: None,
            metadata: serde_json::Map::new(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_receipt_keeps_unknown_fields() {
        let json = r#"{"trackingNumber": "TRK-1042", "total": 42.5, "items": 3}"#;
        let receipt: OrderReceipt = serde_json::from_str(json).unwrap();

        assert_eq!(receipt.tracking_number, "TRK-1042");
        assert!(receipt.placed_at.is_none());
        assert_eq!(receipt.metadata.get("items"), Some(&serde_json::json!(3)));
    }

    #[test]
    fn test_receipt_requires_tracking_number() {
        assert!(serde_json::from_str::<OrderReceipt>(r#"{"total": 1}"#).is_err());
    }
}
