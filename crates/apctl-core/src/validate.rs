// ── Setup validation ──
//
// One-shot credential check run before a controller is saved: log in,
// list access points, and report a title for the new entry.

use serde::Serialize;
use tracing::{error, info};

use crate::config::ControllerConfig;
use crate::error::CoreError;

/// Result of a successful [`validate_credentials`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidatedController {
    /// Display title, e.g. `UniFi Controller (3 APs)`.
    pub title: String,
    /// Controller URL; one entry per controller.
    pub unique_id: String,
    pub access_points: usize,
}

/// Check that `config` reaches a controller and that its credentials work.
///
/// Rejected credentials map to [`CoreError::InvalidAuth`]; every other
/// failure, including the access point fetch, to [`CoreError::CannotConnect`].
pub async fn validate_credentials(
    config: &ControllerConfig,
) -> Result<ValidatedController, CoreError> {
    let url = config.url.to_string();
    let client = config.build_client()?;

    if let Err(e) = client.login().await {
        error!(error = %e, "failed to connect to controller");
        return Err(if e.is_rejected_credentials() {
            CoreError::from(e)
        } else {
            CoreError::CannotConnect {
                url,
                reason: e.to_string(),
            }
        });
    }

    let access_points = client.fetch_access_points().await.map_err(|e| {
        error!(error = %e, "failed to list access points");
        CoreError::CannotConnect {
            url: url.clone(),
            reason: e.to_string(),
        }
    })?;

    let count = access_points.len();
    info!(access_points = count, "controller validated");
    Ok(ValidatedController {
        title: format!("UniFi Controller ({count} APs)"),
        unique_id: url,
        access_points: count,
    })
}
