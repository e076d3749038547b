// Device endpoints
//
// Access point listing and the two writes this crate performs: radio
// transmit power (full radio_table replacement) and the LED override.

use serde_json::json;
use tracing::{debug, info, warn};

use crate::access_point::{AccessPoint, LedMode, MacAddress, PowerLevel};
use crate::band::{Band, classify};
use crate::client::ControllerClient;
use crate::error::Error;
use crate::models::{RadioEntry, RawDevice};

impl ControllerClient {
    /// List all access points on the site.
    ///
    /// `GET /api/s/{site}/stat/device`, keeping only devices that report a
    /// non-empty `radio_table`.
    pub async fn fetch_access_points(&self) -> Result<Vec<AccessPoint>, Error> {
        self.ensure_authenticated().await?;

        let url = self.site_url("stat/device")?;
        let devices: Vec<RawDevice> = self.get(url).await?;
        let total = devices.len();

        let access_points: Vec<AccessPoint> = devices
            .into_iter()
            .filter(RawDevice::has_radios)
            .map(AccessPoint::from_raw)
            .collect();

        debug!(
            devices = total,
            access_points = access_points.len(),
            "fetched device list"
        );
        Ok(access_points)
    }

    /// Set the transmit power of every radio on `band`.
    ///
    /// `PUT /api/s/{site}/rest/device/{device_id}` with the complete radio
    /// table. Entries on other bands go back exactly as they came in. Returns
    /// `Ok(false)` without contacting the controller when no entry is on
    /// `band` or `power` is not a settable level.
    pub async fn set_radio_power(
        &self,
        device_id: &str,
        mac: &MacAddress,
        raw_radio_table: &[RadioEntry],
        band: Band,
        power: PowerLevel,
    ) -> Result<bool, Error> {
        if !power.is_settable() {
            warn!(%mac, %band, "refusing to write unknown power level");
            return Ok(false);
        }

        let Some(radio_table) = rewrite_power(raw_radio_table, band, power) else {
            warn!(%mac, %band, "no radio found for band");
            return Ok(false);
        };

        self.ensure_authenticated().await?;

        let url = self.site_url(&format!("rest/device/{device_id}"))?;
        let ok = self
            .put_status(url, &json!({ "radio_table": radio_table }))
            .await?;
        if ok {
            info!(%mac, %band, %power, "radio power updated");
        }
        Ok(ok)
    }

    /// Set the device's LED override.
    ///
    /// `PUT /api/s/{site}/rest/device/{device_id}` with only `led_override`.
    pub async fn set_led_override(
        &self,
        device_id: &str,
        mac: &MacAddress,
        mode: LedMode,
    ) -> Result<bool, Error> {
        self.ensure_authenticated().await?;

        let url = self.site_url(&format!("rest/device/{device_id}"))?;
        let ok = self
            .put_status(url, &json!({ "led_override": mode }))
            .await?;
        if ok {
            info!(%mac, led_override = %mode, "LED override updated");
        }
        Ok(ok)
    }
}

/// Copy `table`, setting `tx_power_mode` on every entry classified to `band`.
///
/// `None` when no entry matches.
fn rewrite_power(table: &[RadioEntry], band: Band, power: PowerLevel) -> Option<Vec<RadioEntry>> {
    let mut matched = 0usize;
    let updated: Vec<RadioEntry> = table
        .iter()
        .map(|entry| {
            if classify(entry.name()) == Some(band) {
                matched += 1;
                entry.with_power(power)
            } else {
                entry.clone()
            }
        })
        .collect();

    (matched > 0).then_some(updated)
}
