//! Notification payload and the Apple-reserved `aps` dictionary.

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Map, Value};

use crate::core::PayloadError;

use super::alert::Alert;

/// The Apple-reserved `aps` namespace in a push notification.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Aps {
    /// User-visible alert.
    pub alert: Alert,

    /// App icon badge count. `None` leaves the badge as is; `Some(0)` clears
    /// it.
    pub badge: Option<u32>,

    /// Sound file to play.
    pub sound: String,

    /// Non-zero wakes the app for a background fetch.
    pub content_available: u32,

    /// Notification category (iOS 8+).
    pub category: String,

    /// URL arguments for Safari push notifications.
    pub url_args: Vec<String>,

    /// Account identifier for email push notifications.
    pub account_id: String,
}

impl Serialize for Aps {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        if !self.alert.is_zero() {
            if self.alert.is_simple() {
                map.serialize_entry("alert", &self.alert.body)?;
            } else {
                map.serialize_entry("alert", &self.alert)?;
            }
        }
        if let Some(badge) = self.badge {
            map.serialize_entry("badge", &badge)?;
        }
        if !self.sound.is_empty() {
            map.serialize_entry("sound", &self.sound)?;
        }
        if self.content_available != 0 {
            map.serialize_entry("content-available", &self.content_available)?;
        }
        if !self.category.is_empty() {
            map.serialize_entry("category", &self.category)?;
        }
        if !self.url_args.is_empty() {
            map.serialize_entry("url-args", &self.url_args)?;
        }
        if !self.account_id.is_empty() {
            map.serialize_entry("account-id", &self.account_id)?;
        }
        map.end()
    }
}

/// Payload of a push notification.
///
/// Serializes custom values at the top level next to either `aps` or, when
/// [`mdm`](Payload::mdm) is non-empty, `mdm` alone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Payload {
    /// Apple-reserved `aps` content.
    pub aps: Aps,

    /// Mobile device management token. Non-empty replaces `aps` at the top
    /// level.
    pub mdm: String,

    custom: Map<String, Value>,
}

impl Payload {
    /// Create an empty payload.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a custom top-level payload value.
    ///
    /// The key `"aps"` is reserved and rejected.
    pub fn set_custom_value(
        &mut self,
        key: impl Into<String>,
        value: impl Serialize,
    ) -> Result<(), PayloadError> {
        let key = key.into();
        if key == "aps" {
            return Err(PayloadError::ReservedKey(key));
        }
        self.custom.insert(key, serde_json::to_value(value)?);
        Ok(())
    }
}

impl Serialize for Payload {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        for (key, value) in &self.custom {
            map.serialize_entry(key, value)?;
        }
        if self.mdm.is_empty() {
            map.serialize_entry("aps", &self.aps)?;
        } else {
            map.serialize_entry("mdm", &self.mdm)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_badge_tri_state() {
        let mut aps = Aps::default();
        let value = serde_json::to_value(&aps).unwrap();
        assert_eq!(value, json!({}));

        aps.badge = Some(0);
        let value = serde_json::to_value(&aps).unwrap();
        assert_eq!(value, json!({ "badge": 0 }));

        aps.badge = Some(7);
        let value = serde_json::to_value(&aps).unwrap();
        assert_eq!(value, json!({ "badge": 7 }));
    }

    #[test]
    fn test_alert_simple_form() {
        let aps = Aps {
            alert: Alert {
                body: "message received".to_string(),
                ..Alert::default()
            },
            ..Aps::default()
        };

        let value = serde_json::to_value(&aps).unwrap();
        assert_eq!(value, json!({ "alert": "message received" }));
    }

    #[test]
    fn test_alert_object_form() {
        let aps = Aps {
            alert: Alert {
                body: "message received".to_string(),
                loc_key: "MSG_FORMAT".to_string(),
                ..Alert::default()
            },
            ..Aps::default()
        };

        let value = serde_json::to_value(&aps).unwrap();
        assert_eq!(
            value,
            json!({ "alert": { "body": "message received", "loc-key": "MSG_FORMAT" } })
        );
    }

    #[test]
    fn test_conditional_aps_keys() {
        let aps = Aps {
            sound: "bingbong.aiff".to_string(),
            content_available: 1,
            category: "ACTIONABLE".to_string(),
            url_args: vec!["path".to_string()],
            account_id: "user@example.com".to_string(),
            ..Aps::default()
        };

        let value = serde_json::to_value(&aps).unwrap();
        assert_eq!(
            value,
            json!({
                "sound": "bingbong.aiff",
                "content-available": 1,
                "category": "ACTIONABLE",
                "url-args": ["path"],
                "account-id": "user@example.com",
            })
        );
    }

    #[test]
    fn test_reserved_custom_key() {
        let mut payload = Payload::new();
        assert!(matches!(
            payload.set_custom_value("aps", "boom"),
            Err(PayloadError::ReservedKey(_))
        ));
    }

    #[test]
    fn test_custom_values_at_top_level() {
        let mut payload = Payload::new();
        payload.aps.alert.body = "hello".to_string();
        payload.set_custom_value("acme2", vec!["bang", "whiz"]).unwrap();
        payload.set_custom_value("count", 3).unwrap();

        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(
            value,
            json!({
                "aps": { "alert": "hello" },
                "acme2": ["bang", "whiz"],
                "count": 3,
            })
        );
    }

    #[test]
    fn test_mdm_replaces_aps() {
        let mut payload = Payload::new();
        payload.aps.alert.body = "ignored".to_string();
        payload.mdm = "00000000-1111-3333-4444-555555555555".to_string();
        payload.set_custom_value("acme", "foo").unwrap();

        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(
            value,
            json!({
                "mdm": "00000000-1111-3333-4444-555555555555",
                "acme": "foo",
            })
        );
    }

    #[test]
    fn test_empty_payload_is_empty_aps() {
        let payload = Payload::new();
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value, json!({ "aps": {} }));
    }
}
