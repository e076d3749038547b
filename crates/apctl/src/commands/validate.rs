use apctl_core::{ControllerConfig, ValidatedController, validate_credentials};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

pub async fn handle(config: &ControllerConfig, global: &GlobalOpts) -> Result<(), CliError> {
    let validated = validate_credentials(config).await?;
    let out = output::render_single(
        &global.output,
        &validated,
        detail,
        |v| v.unique_id.clone(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}

fn detail(v: &ValidatedController) -> String {
    format!(
        "✓ {}\n  Controller:    {}\n  Access points: {}",
        v.title, v.unique_id, v.access_points
    )
}
