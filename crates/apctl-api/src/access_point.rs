// Access point domain model
//
// Normalized view of a controller device that carries a radio table.
// Built from `RawDevice` by `AccessPoint::from_raw`; the raw radio table
// rides along untouched because power writes must send it back whole.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};
use serde_json::Value;
use strum::{AsRefStr, Display, EnumIter, EnumString};
use tracing::debug;

use crate::band::{Band, classify};
use crate::models::{RadioEntry, RawDevice};

// ── MacAddress ──────────────────────────────────────────────────────

/// MAC address, normalized to lowercase colon-separated format (aa:bb:cc:dd:ee:ff).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct MacAddress(String);

impl MacAddress {
    /// Create a normalized MAC address. Accepts colon- or dash-separated input.
    pub fn new(raw: impl AsRef<str>) -> Self {
        Self(raw.as_ref().trim().to_lowercase().replace('-', ":"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The address without separators (`aabbccddeeff`), used in entity ids.
    pub fn compact(&self) -> String {
        self.0.replace(':', "")
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for MacAddress {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

// ── Enumerations ────────────────────────────────────────────────────

/// Radio transmit power mode.
///
/// `Unknown` stands in for anything the controller reports that isn't one
/// of the four settable levels (e.g. `"custom"`, or a missing field).
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum PowerLevel {
    Auto,
    Low,
    Medium,
    High,
    Unknown,
}

impl PowerLevel {
    /// Levels that may be written back to the controller.
    pub const SETTABLE: [Self; 4] = [Self::Auto, Self::Low, Self::Medium, Self::High];

    pub fn is_settable(self) -> bool {
        !matches!(self, Self::Unknown)
    }

    fn from_controller(raw: Option<&str>) -> Self {
        raw.and_then(|s| s.parse().ok()).unwrap_or(Self::Unknown)
    }
}

/// Per-device status LED override.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum LedMode {
    /// Follow the site-wide LED setting.
    #[default]
    Default,
    On,
    Off,
}

impl LedMode {
    fn from_controller(raw: Option<&str>) -> Self {
        match raw {
            None => Self::Default,
            Some(s) => s.parse().unwrap_or_else(|_| {
                debug!(led_override = s, "unrecognized LED override, using default");
                Self::Default
            }),
        }
    }
}

/// Radio channel: a fixed channel number or automatic selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Auto,
    Number(u32),
}

impl Channel {
    fn from_controller(raw: Option<&Value>) -> Self {
        match raw {
            Some(Value::Number(n)) => n
                .as_u64()
                .and_then(|n| u32::try_from(n).ok())
                .map_or(Self::Auto, Self::Number),
            Some(Value::String(s)) => s.trim().parse().map_or(Self::Auto, Self::Number),
            _ => Self::Auto,
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Auto => f.write_str("auto"),
            Self::Number(n) => write!(f, "{n}"),
        }
    }
}

impl Serialize for Channel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Auto => serializer.serialize_str("auto"),
            Self::Number(n) => serializer.serialize_u32(*n),
        }
    }
}

// ── AccessPoint ─────────────────────────────────────────────────────

/// One radio of an access point, keyed by band in [`AccessPoint::radios`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Radio {
    pub radio_name: String,
    pub power: PowerLevel,
    pub channel: Channel,
}

/// A managed access point as of the last fetch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccessPoint {
    pub id: String,
    pub mac: MacAddress,
    pub name: String,
    pub model: String,
    pub radios: BTreeMap<Band, Radio>,
    pub raw_radio_table: Vec<RadioEntry>,
    pub led_override: LedMode,
}

impl AccessPoint {
    /// Normalize a controller device into an access point.
    ///
    /// Radios whose identifier has no band are kept in `raw_radio_table`
    /// only. When two entries map to the same band the later one wins.
    pub fn from_raw(device: RawDevice) -> Self {
        let raw_radio_table = device.radio_table.unwrap_or_default();

        let mut radios = BTreeMap::new();
        for entry in &raw_radio_table {
            let Some(band) = classify(entry.name()) else {
                debug!(radio = entry.name(), mac = %device.mac, "radio has no known band");
                continue;
            };
            radios.insert(
                band,
                Radio {
                    radio_name: entry.name().to_owned(),
                    power: PowerLevel::from_controller(entry.tx_power_mode()),
                    channel: Channel::from_controller(entry.channel()),
                },
            );
        }

        Self {
            id: device.id,
            mac: MacAddress::new(&device.mac),
            name: device.name.unwrap_or_else(|| "Unknown".into()),
            model: device.model.unwrap_or_else(|| "Unknown".into()),
            radios,
            raw_radio_table,
            led_override: LedMode::from_controller(device.led_override.as_deref()),
        }
    }

    pub fn radio(&self, band: Band) -> Option<&Radio> {
        self.radios.get(&band)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn device(value: serde_json::Value) -> RawDevice {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn parses_radios_by_band() {
        let ap = AccessPoint::from_raw(device(json!({
            "_id": "64f0c0ffee",
            "mac": "AA:BB:CC:DD:EE:01",
            "name": "Hallway",
            "model": "U6LR",
            "led_override": "off",
            "radio_table": [
                { "name": "wifi0", "tx_power_mode": "high", "channel": 6 },
                { "name": "wifi1", "tx_power_mode": "medium", "channel": "auto" },
                { "name": "wifi2", "tx_power_mode": "custom", "channel": "37" }
            ]
        })));

        assert_eq!(ap.id, "64f0c0ffee");
        assert_eq!(ap.mac.as_str(), "aa:bb:cc:dd:ee:01");
        assert_eq!(ap.name, "Hallway");
        assert_eq!(ap.led_override, LedMode::Off);
        assert_eq!(ap.radios.len(), 3);

        let r24 = ap.radio(Band::Ghz2_4).unwrap();
        assert_eq!(r24.radio_name, "wifi0");
        assert_eq!(r24.power, PowerLevel::High);
        assert_eq!(r24.channel, Channel::Number(6));

        let r5 = ap.radio(Band::Ghz5).unwrap();
        assert_eq!(r5.power, PowerLevel::Medium);
        assert_eq!(r5.channel, Channel::Auto);

        let r6 = ap.radio(Band::Ghz6).unwrap();
        assert_eq!(r6.power, PowerLevel::Unknown);
        assert_eq!(r6.channel, Channel::Number(37));
    }

    #[test]
    fn later_entry_wins_for_same_band() {
        let ap = AccessPoint::from_raw(device(json!({
            "_id": "x",
            "mac": "aa:bb:cc:dd:ee:02",
            "radio_table": [
                { "name": "ra0", "tx_power_mode": "low" },
                { "name": "wifi0", "tx_power_mode": "high" }
            ]
        })));

        assert_eq!(ap.radios.len(), 1);
        let radio = ap.radio(Band::Ghz2_4).unwrap();
        assert_eq!(radio.radio_name, "wifi0");
        assert_eq!(radio.power, PowerLevel::High);
    }

    #[test]
    fn unknown_radio_stays_in_raw_table_only() {
        let ap = AccessPoint::from_raw(device(json!({
            "_id": "x",
            "mac": "aa:bb:cc:dd:ee:03",
            "radio_table": [
                { "name": "eth0", "tx_power_mode": "low" },
                { "name": "rai0" }
            ]
        })));

        assert_eq!(ap.raw_radio_table.len(), 2);
        assert_eq!(ap.radios.len(), 1);
        let radio = ap.radio(Band::Ghz5).unwrap();
        assert_eq!(radio.power, PowerLevel::Unknown);
        assert_eq!(radio.channel, Channel::Auto);
    }

    #[test]
    fn missing_display_fields_default() {
        let ap = AccessPoint::from_raw(device(json!({
            "_id": "x",
            "mac": "aa:bb:cc:dd:ee:04",
            "radio_table": [{ "name": "ra0" }]
        })));
        assert_eq!(ap.name, "Unknown");
        assert_eq!(ap.model, "Unknown");
        assert_eq!(ap.led_override, LedMode::Default);
    }

    #[test]
    fn settable_power_levels() {
        assert!(PowerLevel::SETTABLE.iter().all(|p| p.is_settable()));
        assert!(!PowerLevel::Unknown.is_settable());
        assert_eq!("MEDIUM".parse::<PowerLevel>().unwrap(), PowerLevel::Medium);
        assert_eq!(PowerLevel::Auto.to_string(), "auto");
    }

    #[test]
    fn channel_serializes_as_number_or_auto() {
        assert_eq!(serde_json::to_value(Channel::Number(11)).unwrap(), json!(11));
        assert_eq!(serde_json::to_value(Channel::Auto).unwrap(), json!("auto"));
    }

    #[test]
    fn mac_address_normalizes() {
        let mac: MacAddress = "AA-BB-CC-DD-EE-FF".parse().unwrap();
        assert_eq!(mac.as_str(), "aa:bb:cc:dd:ee:ff");
        assert_eq!(mac.compact(), "aabbccddeeff");
    }
}
