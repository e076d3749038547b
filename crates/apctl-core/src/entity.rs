// ── Entity adapters ──
//
// Host-facing view of the coordinator: one power selector per radio band
// and one LED switch per access point. Entities hold no state of their own.
// Every read goes to the coordinator's current snapshot and every write
// goes through its set_power / set_led.

use apctl_api::{AccessPoint, Band, LedMode, MacAddress, PowerLevel};
use serde::Serialize;
use serde_json::{Map, Value, json};
use tracing::{error, info};

use crate::coordinator::{Coordinator, Snapshot};

pub const MANUFACTURER: &str = "Ubiquiti";

/// Groups the entities of one access point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceInfo {
    pub identifier: MacAddress,
    pub name: String,
    pub manufacturer: &'static str,
    pub model: String,
}

impl DeviceInfo {
    fn for_access_point(ap: &AccessPoint) -> Self {
        Self {
            identifier: ap.mac.clone(),
            name: ap.name.clone(),
            manufacturer: MANUFACTURER,
            model: ap.model.clone(),
        }
    }
}

// ── PowerSelect ──────────────────────────────────────────────────

/// Transmit power selector for one band of one access point.
#[derive(Clone)]
pub struct PowerSelect {
    coordinator: Coordinator,
    mac: MacAddress,
    band: Band,
    device: DeviceInfo,
}

impl PowerSelect {
    /// `{mac without colons}_{band slug}_power`, e.g. `aabbccddeeff_2_4_power`.
    pub fn unique_id(&self) -> String {
        format!("{}_{}_power", self.mac.compact(), self.band.slug())
    }

    pub fn name(&self) -> String {
        format!("{} Power", self.band)
    }

    pub fn band(&self) -> Band {
        self.band
    }

    pub fn device_info(&self) -> &DeviceInfo {
        &self.device
    }

    #[allow(clippy::unused_self)]
    pub fn options(&self) -> &'static [PowerLevel] {
        &PowerLevel::SETTABLE
    }

    /// Power of the radio as of the current snapshot. `None` when the AP or
    /// the band has dropped out.
    pub fn current_option(&self) -> Option<PowerLevel> {
        self.coordinator
            .snapshot()
            .get(&self.mac)
            .and_then(|ap| ap.radio(self.band))
            .map(|radio| radio.power)
    }

    pub fn available(&self) -> bool {
        self.coordinator.is_available(&self.mac)
    }

    pub fn attributes(&self) -> Map<String, Value> {
        let snapshot = self.coordinator.snapshot();
        let Some(radio) = snapshot.get(&self.mac).and_then(|ap| ap.radio(self.band)) else {
            return Map::new();
        };

        let mut attrs = Map::new();
        attrs.insert("radio_name".into(), json!(radio.radio_name));
        attrs.insert("channel".into(), json!(radio.channel));
        attrs.insert("mac".into(), json!(self.mac));
        attrs
    }

    pub async fn select_option(&self, power: PowerLevel) -> bool {
        info!(ap = %self.device.name, band = %self.band, %power, "setting radio power");
        let ok = self.coordinator.set_power(&self.mac, self.band, power).await;
        if !ok {
            error!(ap = %self.device.name, band = %self.band, %power, "failed to set radio power");
        }
        ok
    }
}

// ── LedSwitch ────────────────────────────────────────────────────

/// Status LED switch for one access point.
///
/// On means anything but an explicit `off` override, so an AP following
/// the site default reads as on.
#[derive(Clone)]
pub struct LedSwitch {
    coordinator: Coordinator,
    mac: MacAddress,
    device: DeviceInfo,
}

impl LedSwitch {
    pub fn unique_id(&self) -> String {
        format!("{}_led", self.mac.compact())
    }

    #[allow(clippy::unused_self)]
    pub fn name(&self) -> &'static str {
        "LED"
    }

    pub fn device_info(&self) -> &DeviceInfo {
        &self.device
    }

    pub fn led_override(&self) -> Option<LedMode> {
        self.coordinator
            .snapshot()
            .get(&self.mac)
            .map(|ap| ap.led_override)
    }

    pub fn is_on(&self) -> Option<bool> {
        self.led_override().map(|mode| mode != LedMode::Off)
    }

    pub fn available(&self) -> bool {
        self.coordinator.is_available(&self.mac)
    }

    pub fn attributes(&self) -> Map<String, Value> {
        let Some(mode) = self.led_override() else {
            return Map::new();
        };

        let mut attrs = Map::new();
        attrs.insert("led_override".into(), json!(mode));
        attrs.insert("mac".into(), json!(self.mac));
        attrs
    }

    pub async fn turn_on(&self) -> bool {
        self.set(LedMode::On).await
    }

    pub async fn turn_off(&self) -> bool {
        self.set(LedMode::Off).await
    }

    async fn set(&self, mode: LedMode) -> bool {
        info!(ap = %self.device.name, led_override = %mode, "setting LED");
        let ok = self.coordinator.set_led(&self.mac, mode).await;
        if !ok {
            error!(ap = %self.device.name, led_override = %mode, "failed to set LED");
        }
        ok
    }
}

// ── Entity ───────────────────────────────────────────────────────

#[derive(Clone)]
pub enum Entity {
    Power(PowerSelect),
    Led(LedSwitch),
}

impl Entity {
    pub fn unique_id(&self) -> String {
        match self {
            Self::Power(e) => e.unique_id(),
            Self::Led(e) => e.unique_id(),
        }
    }

    pub fn name(&self) -> String {
        match self {
            Self::Power(e) => e.name(),
            Self::Led(e) => e.name().to_owned(),
        }
    }

    pub fn device_info(&self) -> &DeviceInfo {
        match self {
            Self::Power(e) => e.device_info(),
            Self::Led(e) => e.device_info(),
        }
    }

    pub fn available(&self) -> bool {
        match self {
            Self::Power(e) => e.available(),
            Self::Led(e) => e.available(),
        }
    }

    /// Display state: the power level, `on`/`off`, or `unavailable`.
    pub fn state(&self) -> String {
        if !self.available() {
            return "unavailable".into();
        }
        match self {
            Self::Power(e) => e
                .current_option()
                .map_or_else(|| "unknown".into(), |p| p.to_string()),
            Self::Led(e) => match e.is_on() {
                Some(true) => "on".into(),
                Some(false) => "off".into(),
                None => "unknown".into(),
            },
        }
    }

    pub fn attributes(&self) -> Map<String, Value> {
        match self {
            Self::Power(e) => e.attributes(),
            Self::Led(e) => e.attributes(),
        }
    }
}

/// Enumerate the entities for every access point in `snapshot`: one
/// [`PowerSelect`] per band present, then one [`LedSwitch`].
pub fn entities(coordinator: &Coordinator, snapshot: &Snapshot) -> Vec<Entity> {
    let mut out = Vec::new();
    for ap in snapshot.access_points() {
        let device = DeviceInfo::for_access_point(ap);
        for band in ap.radios.keys() {
            out.push(Entity::Power(PowerSelect {
                coordinator: coordinator.clone(),
                mac: ap.mac.clone(),
                band: *band,
                device: device.clone(),
            }));
        }
        out.push(Entity::Led(LedSwitch {
            coordinator: coordinator.clone(),
            mac: ap.mac.clone(),
            device,
        }));
    }
    out
}
