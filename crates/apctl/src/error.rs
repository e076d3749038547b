//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

use apctl_config::ConfigError;
use apctl_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to controller at {url}")]
    #[diagnostic(
        code(apctl::connection_failed),
        help(
            "Check that the controller is running and reachable.\n\
             {reason}"
        )
    )]
    ConnectionFailed { url: String, reason: String },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(apctl::auth_failed),
        help(
            "Verify the username and password for this controller.\n\
             Run: apctl config set-password"
        )
    )]
    AuthFailed { message: String },

    #[error("No credentials configured for profile '{profile}'")]
    #[diagnostic(
        code(apctl::no_credentials),
        help(
            "Configure credentials with: apctl config init\n\
             Or set APCTL_USERNAME and APCTL_PASSWORD."
        )
    )]
    NoCredentials { profile: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(apctl::not_found),
        help("Run: apctl list to see available access points")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
    },

    // ── Operations ───────────────────────────────────────────────────
    #[error("{operation} failed")]
    #[diagnostic(
        code(apctl::operation_failed),
        help("The controller rejected the update. Re-run with -v for details.")
    )]
    OperationFailed { operation: String },

    #[error("Controller API error: {message}")]
    #[diagnostic(code(apctl::api_error))]
    ApiError { message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(apctl::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(apctl::profile_not_found),
        help("Create one with: apctl config init")
    )]
    ProfileNotFound { name: String },

    #[error("No controller configured")]
    #[diagnostic(
        code(apctl::no_config),
        help(
            "Create a profile with: apctl config init\n\
             Or pass --controller, --username and --password.\n\
             Expected config at: {path}"
        )
    )]
    NoConfig { path: String },

    #[error("Configuration error: {message}")]
    #[diagnostic(code(apctl::config))]
    Config { message: String },

    // ── Timeout ──────────────────────────────────────────────────────
    #[error("Controller request timed out")]
    #[diagnostic(
        code(apctl::timeout),
        help("Increase timeout with --timeout or check controller responsiveness.")
    )]
    Timeout,

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("JSON output failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML output failed: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::NotFound { .. } | Self::ProfileNotFound { .. } => exit_code::NOT_FOUND,
            Self::Timeout => exit_code::TIMEOUT,
            Self::Validation { .. } | Self::NoConfig { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::CannotConnect { url, reason } => Self::ConnectionFailed { url, reason },
            CoreError::InvalidAuth { message } => Self::AuthFailed { message },
            CoreError::Timeout => Self::Timeout,
            CoreError::Api { message, status } => Self::ApiError {
                message: match status {
                    Some(code) => format!("HTTP {code}: {message}"),
                    None => message,
                },
            },
            CoreError::Config { message } => Self::Config { message },
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => Self::Validation { field, reason },
            ConfigError::NoCredentials { profile } => Self::NoCredentials { profile },
            ConfigError::ProfileNotFound { name } => Self::ProfileNotFound { name },
            other => Self::Config {
                message: other.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes() {
        let auth = CliError::from(CoreError::InvalidAuth {
            message: "api.err.Invalid".into(),
        });
        assert_eq!(auth.exit_code(), exit_code::AUTH);

        let conn = CliError::from(CoreError::CannotConnect {
            url: "https://10.0.0.2:8443/".into(),
            reason: "connection refused".into(),
        });
        assert_eq!(conn.exit_code(), exit_code::CONNECTION);

        assert_eq!(CliError::from(CoreError::Timeout).exit_code(), exit_code::TIMEOUT);

        let missing = CliError::NotFound {
            resource_type: "access point".into(),
            identifier: "aa:bb:cc:dd:ee:ff".into(),
        };
        assert_eq!(missing.exit_code(), exit_code::NOT_FOUND);

        let failed = CliError::OperationFailed {
            operation: "set-power".into(),
        };
        assert_eq!(failed.exit_code(), exit_code::GENERAL);
    }
}
