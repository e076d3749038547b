//! Command dispatch: bridges CLI args -> coordinator calls -> output formatting.

pub mod config_cmd;
pub mod led;
pub mod list;
pub mod set_power;
pub mod validate;
pub mod watch;

use std::time::Duration;

use apctl_core::{ControllerConfig, Coordinator, MacAddress};

use crate::cli::{Command, GlobalOpts, WatchArgs};
use crate::error::CliError;

/// Dispatch a controller-bound command to the appropriate handler.
///
/// Every command except `validate` runs against a [`Coordinator`], which
/// is shut down (and its session logged out) whatever the outcome.
pub async fn dispatch(
    cmd: Command,
    mut config: ControllerConfig,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    if let Command::Validate = cmd {
        return validate::handle(&config, global).await;
    }
    if let Command::Watch(WatchArgs {
        interval: Some(secs),
    }) = cmd
    {
        config.poll_interval = Duration::from_secs(secs);
    }

    let coordinator = Coordinator::new(&config)?;
    let result = match cmd {
        Command::List => list::handle(&coordinator, global).await,
        Command::SetPower(args) => set_power::handle(&coordinator, args, global).await,
        Command::Led(args) => led::handle(&coordinator, args, global).await,
        Command::Watch(_) => watch::handle(&coordinator, global).await,
        // Validate, Config and Completions are handled before this point
        Command::Validate | Command::Config(_) | Command::Completions(_) => unreachable!(),
    };
    coordinator.shutdown().await;
    result
}

/// Error for a MAC that isn't in the coordinator's snapshot.
fn access_point_not_found(mac: &MacAddress) -> CliError {
    CliError::NotFound {
        resource_type: "Access point".into(),
        identifier: mac.to_string(),
    }
}
