use apctl_core::Coordinator;

use crate::cli::{GlobalOpts, SetPowerArgs};
use crate::error::CliError;
use crate::output;

use super::access_point_not_found;
use super::list::radio_cell;

pub async fn handle(
    coordinator: &Coordinator,
    args: SetPowerArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    coordinator.first_refresh().await?;

    let snapshot = coordinator.snapshot();
    let ap = snapshot
        .get(&args.mac)
        .ok_or_else(|| access_point_not_found(&args.mac))?;
    if ap.radio(args.band).is_none() {
        return Err(CliError::NotFound {
            resource_type: format!("{} radio on", args.band),
            identifier: ap.name.clone(),
        });
    }

    if !coordinator.set_power(&args.mac, args.band, args.level).await {
        return Err(CliError::OperationFailed {
            operation: format!("Setting {} power on {}", args.band, args.mac),
        });
    }

    // set_power re-fetched before returning; report what the controller now says
    let snapshot = coordinator.snapshot();
    let msg = snapshot.get(&args.mac).map_or_else(
        || format!("✓ {} power set to {}", args.band, args.level),
        |ap| {
            format!(
                "✓ {}: {} now {}",
                ap.name,
                args.band,
                radio_cell(ap, args.band, output::should_color(&global.color))
            )
        },
    );
    if !global.quiet {
        eprintln!("{msg}");
    }
    Ok(())
}
