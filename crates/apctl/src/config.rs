//! CLI-side config resolution: profile lookup plus global-flag overrides,
//! producing the `ControllerConfig` that core consumes.

use std::time::Duration;

use secrecy::SecretString;

use apctl_config::{Config, Defaults};
use apctl_core::{ControllerConfig, TlsVerification};

use crate::cli::GlobalOpts;
use crate::error::CliError;

pub use apctl_config::{config_path, load_config, save_config, store_password};

/// Load the config file, falling back to defaults when absent or unreadable.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "config unreadable, using defaults");
        Config::default()
    })
}

/// Profile name from `--profile`, then `default_profile`, then "default".
pub fn active_profile_name(global: &GlobalOpts, cfg: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| cfg.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Build a `ControllerConfig` from the config file, profile, and CLI flags.
///
/// Without a matching profile, `--controller`, `--username` and
/// `--password` (or their env vars) must all be given.
pub fn build_controller_config(global: &GlobalOpts) -> Result<ControllerConfig, CliError> {
    let cfg = load_config_or_default();
    let profile_name = active_profile_name(global, &cfg);

    let mut config = if let Some(profile) = cfg.profiles.get(&profile_name) {
        let mut profile = profile.clone();
        if let Some(ref url) = global.controller {
            profile.controller.clone_from(url);
        }
        if let Some(ref user) = global.username {
            profile.username = Some(user.clone());
        }
        if global.password.is_some() {
            profile.password.clone_from(&global.password);
            profile.password_env = None;
        }
        apctl_config::profile_to_controller_config(&profile, &profile_name, &cfg.defaults)?
    } else {
        from_flags(global, &profile_name, &cfg.defaults)?
    };

    if let Some(ref site) = global.site {
        config.site.clone_from(site);
    }
    if global.verify_tls || global.ca_cert.is_some() {
        config.tls = TlsVerification::from_flags(global.verify_tls, global.ca_cert.clone());
    }
    if let Some(secs) = global.timeout {
        config.timeout = Duration::from_secs(secs);
    }
    Ok(config)
}

fn from_flags(
    global: &GlobalOpts,
    profile_name: &str,
    defaults: &Defaults,
) -> Result<ControllerConfig, CliError> {
    let url_str = global.controller.as_deref().ok_or_else(|| CliError::NoConfig {
        path: config_path().display().to_string(),
    })?;

    let url: url::Url = url_str.parse().map_err(|_| CliError::Validation {
        field: "controller".into(),
        reason: format!("invalid URL: {url_str}"),
    })?;

    let (Some(username), Some(password)) = (global.username.clone(), global.password.clone())
    else {
        return Err(CliError::NoCredentials {
            profile: profile_name.into(),
        });
    };

    let mut config = ControllerConfig::new(url, username, SecretString::from(password));
    config.tls = TlsVerification::from_flags(defaults.verify_tls, None);
    config.timeout = Duration::from_secs(defaults.timeout);
    config.poll_interval = Duration::from_secs(defaults.poll_interval);
    Ok(config)
}
