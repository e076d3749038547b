use apctl_core::Coordinator;

use crate::cli::{GlobalOpts, LedArgs};
use crate::error::CliError;

use super::access_point_not_found;

pub async fn handle(
    coordinator: &Coordinator,
    args: LedArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    coordinator.first_refresh().await?;

    let name = coordinator
        .snapshot()
        .get(&args.mac)
        .map(|ap| ap.name.clone())
        .ok_or_else(|| access_point_not_found(&args.mac))?;

    if !coordinator.set_led(&args.mac, args.mode).await {
        return Err(CliError::OperationFailed {
            operation: format!("Setting LED on {}", args.mac),
        });
    }

    if !global.quiet {
        eprintln!("✓ {name}: LED override set to {}", args.mode);
    }
    Ok(())
}
