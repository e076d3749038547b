use thiserror::Error;

/// Why a login attempt failed.
///
/// Each cause is distinct so setup flows can tell "wrong password" apart
/// from "controller unreachable".
#[derive(Debug, Error)]
pub enum AuthError {
    /// The controller could not be reached (DNS, refused, TLS, reset).
    #[error("Cannot connect to {url}: {source}")]
    ConnectionFailed {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The login request did not complete within the transport timeout.
    #[error("Login timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    /// The login endpoint answered with a non-2xx status.
    #[error("Login failed (HTTP {status}): {body}")]
    HttpError { status: u16, body: String },

    /// HTTP succeeded but the `meta.rc` status rejected the credentials.
    #[error("Login rejected: {message}")]
    RejectedCredentials { message: String },

    /// HTTP succeeded but the body was not a JSON login envelope.
    #[error("Unexpected login response: {message}")]
    InvalidResponse { message: String },
}

/// Top-level error type for the `apctl-api` crate.
///
/// `Auth` covers session establishment; every other variant is a failure
/// of an authenticated call. Any of the latter invalidates the session.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    #[error(transparent)]
    Auth(#[from] AuthError),

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, timeout, reset, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL construction failed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS configuration or certificate loading error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Controller API ──────────────────────────────────────────────
    /// Non-2xx status on an authenticated read.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// The `{meta: {rc, msg}}` envelope reported a failure.
    #[error("Controller API error: {message}")]
    Api { message: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if this error came from session establishment.
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Auth(_))
    }

    /// Returns `true` if the controller rejected the username/password.
    pub fn is_rejected_credentials(&self) -> bool {
        matches!(self, Self::Auth(AuthError::RejectedCredentials { .. }))
    }

    /// Returns `true` if this is a timeout at any stage.
    pub fn is_timeout(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout(),
            Self::Auth(AuthError::Timeout { .. }) => true,
            _ => false,
        }
    }
}

/// Truncate a response body for log and error messages.
pub(crate) fn preview(body: &str, max: usize) -> &str {
    match body.char_indices().nth(max) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}
