//! `apctl list`: one row per access point with per-band power and LED state.

use tabled::Tabled;

use apctl_core::{AccessPoint, Band, Coordinator};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct AccessPointRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "MAC")]
    mac: String,
    #[tabled(rename = "Model")]
    model: String,
    #[tabled(rename = "2.4GHz")]
    ghz2_4: String,
    #[tabled(rename = "5GHz")]
    ghz5: String,
    #[tabled(rename = "6GHz")]
    ghz6: String,
    #[tabled(rename = "LED")]
    led: String,
}

/// `high (ch 36)`, or `-` when the access point has no radio on `band`.
pub(crate) fn radio_cell(ap: &AccessPoint, band: Band, color: bool) -> String {
    ap.radio(band).map_or_else(
        || "-".into(),
        |r| {
            format!(
                "{} (ch {})",
                output::paint_state(r.power.as_ref(), color),
                r.channel
            )
        },
    )
}

fn to_row(ap: &AccessPoint, color: bool) -> AccessPointRow {
    AccessPointRow {
        name: ap.name.clone(),
        mac: ap.mac.to_string(),
        model: ap.model.clone(),
        ghz2_4: radio_cell(ap, Band::Ghz2_4, color),
        ghz5: radio_cell(ap, Band::Ghz5, color),
        ghz6: radio_cell(ap, Band::Ghz6, color),
        led: ap.led_override.to_string(),
    }
}

pub async fn handle(coordinator: &Coordinator, global: &GlobalOpts) -> Result<(), CliError> {
    coordinator.first_refresh().await?;

    let snapshot = coordinator.snapshot();
    let aps: Vec<AccessPoint> = snapshot.access_points().cloned().collect();
    let color = output::should_color(&global.color);

    let out = output::render_list(
        &global.output,
        &aps,
        |ap| to_row(ap, color),
        |ap| ap.mac.to_string(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}
