// ── Core error types ──
//
// What callers of the coordinator and setup validation see. The
// `From<apctl_api::Error>` impl folds transport and envelope detail into
// a handful of actionable variants.

use apctl_api::{AuthError, Error as ApiError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot connect to controller at {url}: {reason}")]
    CannotConnect { url: String, reason: String },

    #[error("Invalid username or password: {message}")]
    InvalidAuth { message: String },

    #[error("Controller request timed out")]
    Timeout,

    // ── API errors ───────────────────────────────────────────────────
    #[error("Controller API error: {message}")]
    Api {
        message: String,
        /// HTTP status code, when the failure carried one.
        status: Option<u16>,
    },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl CoreError {
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::InvalidAuth { .. })
    }
}

impl From<ApiError> for CoreError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Auth(auth) => match auth {
                AuthError::RejectedCredentials { message } => Self::InvalidAuth { message },
                AuthError::Timeout { .. } => Self::Timeout,
                AuthError::ConnectionFailed { url, source } => Self::CannotConnect {
                    url,
                    reason: source.to_string(),
                },
                AuthError::HttpError { status, body } => Self::Api {
                    message: format!("login failed: {body}"),
                    status: Some(status),
                },
                AuthError::InvalidResponse { message } => Self::Api {
                    message,
                    status: None,
                },
            },
            ApiError::Transport(ref e) if e.is_timeout() => Self::Timeout,
            ApiError::Transport(e) => Self::CannotConnect {
                url: e
                    .url()
                    .map_or_else(|| "<unknown>".into(), ToString::to_string),
                reason: e.to_string(),
            },
            ApiError::InvalidUrl(e) => Self::Config {
                message: format!("invalid controller URL: {e}"),
            },
            ApiError::Tls(message) => Self::Config { message },
            ApiError::Http { status, body } => Self::Api {
                message: body,
                status: Some(status),
            },
            ApiError::Api { message } | ApiError::Deserialization { message, .. } => Self::Api {
                message,
                status: None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejected_credentials_become_invalid_auth() {
        let err = CoreError::from(ApiError::from(AuthError::RejectedCredentials {
            message: "api.err.Invalid".into(),
        }));
        assert!(err.is_auth());
        assert_eq!(err.to_string(), "Invalid username or password: api.err.Invalid");
    }

    #[test]
    fn http_status_is_kept() {
        let err = CoreError::from(ApiError::Http {
            status: 502,
            body: "Bad Gateway".into(),
        });
        assert!(matches!(err, CoreError::Api { status: Some(502), .. }));
    }

    #[test]
    fn tls_failure_is_config() {
        let err = CoreError::from(ApiError::Tls("invalid CA cert".into()));
        assert!(matches!(err, CoreError::Config { .. }));
    }
}
