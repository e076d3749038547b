// Controller wire types
//
// Models for the controller's JSON API. Responses are wrapped in the
// `{ meta: { rc, msg }, data: [...] }` envelope. Fields use `#[serde(default)]`
// liberally because field presence varies across firmware versions.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::access_point::PowerLevel;

// ── Response Envelope ────────────────────────────────────────────────

/// Standard controller response envelope.
///
/// ```json
/// { "meta": { "rc": "ok", "msg": "optional" }, "data": [...] }
/// ```
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    pub meta: Meta,
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
}

/// Metadata from the envelope. `rc == "ok"` means success.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Meta {
    #[serde(default)]
    pub rc: String,
    #[serde(default)]
    pub msg: Option<String>,
}

impl Meta {
    pub fn is_ok(&self) -> bool {
        self.rc == "ok"
    }
}

/// Body of `POST /api/login`. The controller may answer HTTP 200 with
/// `meta.rc == "error"`, or with no `meta` at all.
#[derive(Debug, Default, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub meta: Option<Meta>,
}

// ── Device ───────────────────────────────────────────────────────────

/// Device object from `stat/device`, reduced to the fields this crate reads.
///
/// Switches and gateways come back from the same endpoint; they carry no
/// `radio_table`.
#[derive(Debug, Clone, Deserialize)]
pub struct RawDevice {
    #[serde(rename = "_id", default)]
    pub id: String,
    #[serde(default)]
    pub mac: String,
    #[serde(rename = "type", default)]
    pub device_type: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub radio_table: Option<Vec<RadioEntry>>,
    #[serde(default)]
    pub led_override: Option<String>,
}

impl RawDevice {
    /// Whether this device exposes at least one radio (i.e. is an AP).
    pub fn has_radios(&self) -> bool {
        self.radio_table.as_ref().is_some_and(|t| !t.is_empty())
    }
}

// ── Radio table entry ────────────────────────────────────────────────

/// One controller-native radio record, kept verbatim.
///
/// The controller replaces the whole `radio_table` on update, so every field
/// we don't understand has to survive the round trip untouched.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RadioEntry(Map<String, Value>);

impl RadioEntry {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Native radio identifier (`"ra0"`, `"wifi1"`, ...). Empty if absent.
    pub fn name(&self) -> &str {
        self.0.get("name").and_then(Value::as_str).unwrap_or_default()
    }

    /// Raw `tx_power_mode` string, if present.
    pub fn tx_power_mode(&self) -> Option<&str> {
        self.0.get("tx_power_mode").and_then(Value::as_str)
    }

    /// Raw `channel` value (number or `"auto"`), if present.
    pub fn channel(&self) -> Option<&Value> {
        self.0.get("channel")
    }

    /// Copy of this entry with `tx_power_mode` replaced.
    pub fn with_power(&self, power: PowerLevel) -> Self {
        let mut fields = self.0.clone();
        fields.insert(
            "tx_power_mode".to_owned(),
            Value::String(power.as_ref().to_owned()),
        );
        Self(fields)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn with_power_only_touches_tx_power_mode() {
        let entry: RadioEntry = serde_json::from_value(json!({
            "name": "wifi1",
            "radio": "na",
            "channel": 44,
            "ht": 80,
            "tx_power_mode": "low",
            "min_rssi_enabled": false
        }))
        .unwrap();

        let updated = entry.with_power(PowerLevel::High);

        assert_eq!(updated.tx_power_mode(), Some("high"));
        assert_eq!(updated.as_map().len(), entry.as_map().len());
        for (key, value) in entry.as_map() {
            if key != "tx_power_mode" {
                assert_eq!(updated.as_map().get(key), Some(value));
            }
        }
        // The source entry is left alone.
        assert_eq!(entry.tx_power_mode(), Some("low"));
    }

    #[test]
    fn with_power_adds_missing_field() {
        let entry: RadioEntry = serde_json::from_value(json!({ "name": "ra0" })).unwrap();
        assert_eq!(entry.tx_power_mode(), None);
        assert_eq!(entry.with_power(PowerLevel::Auto).tx_power_mode(), Some("auto"));
    }

    #[test]
    fn device_without_radio_table_is_not_an_ap() {
        let switch: RawDevice = serde_json::from_value(json!({
            "_id": "sw1", "mac": "aa:bb:cc:00:00:01", "type": "usw"
        }))
        .unwrap();
        let empty: RawDevice = serde_json::from_value(json!({
            "_id": "ap0", "mac": "aa:bb:cc:00:00:02", "radio_table": []
        }))
        .unwrap();
        let null: RawDevice = serde_json::from_value(json!({
            "_id": "ap0", "mac": "aa:bb:cc:00:00:03", "radio_table": null
        }))
        .unwrap();

        assert!(!switch.has_radios());
        assert!(!empty.has_radios());
        assert!(!null.has_radios());
    }

    #[test]
    fn login_response_without_meta_parses() {
        let resp: LoginResponse = serde_json::from_value(json!({})).unwrap();
        assert!(resp.meta.is_none());
    }
}
