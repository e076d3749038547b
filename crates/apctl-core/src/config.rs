// ── Runtime connection configuration ──
//
// Describes how to reach one controller site. Carries credentials and
// timing, never touches disk. The CLI builds a `ControllerConfig` from its
// profile and flags and hands it in.

use std::path::PathBuf;
use std::time::Duration;

use apctl_api::{ControllerClient, TlsMode, TransportConfig};
use secrecy::SecretString;
use url::Url;

use crate::error::CoreError;

pub const DEFAULT_SITE: &str = "default";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(60);

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(PathBuf),
    /// Skip verification. Default, since controllers ship self-signed certs.
    #[default]
    DangerAcceptInvalid,
}

impl TlsVerification {
    /// Pick a strategy from a plain verify flag plus an optional CA file.
    pub fn from_flags(verify: bool, ca_cert: Option<PathBuf>) -> Self {
        match (verify, ca_cert) {
            (_, Some(path)) => Self::CustomCa(path),
            (true, None) => Self::SystemDefaults,
            (false, None) => Self::DangerAcceptInvalid,
        }
    }
}

impl From<&TlsVerification> for TlsMode {
    fn from(tls: &TlsVerification) -> Self {
        match tls {
            TlsVerification::SystemDefaults => TlsMode::System,
            TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
            TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
        }
    }
}

/// Configuration for one controller site.
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    /// Controller root URL (e.g., `https://192.168.1.1:8443`).
    pub url: Url,
    pub username: String,
    pub password: SecretString,
    /// Site to operate on (defaults to "default").
    pub site: String,
    pub tls: TlsVerification,
    /// Per-request timeout. Requests are not retried.
    pub timeout: Duration,
    /// Period of the background refresh. Zero disables it.
    pub poll_interval: Duration,
}

impl ControllerConfig {
    /// Config with default site, TLS, timeout and poll interval.
    pub fn new(url: Url, username: impl Into<String>, password: SecretString) -> Self {
        Self {
            url,
            username: username.into(),
            password,
            site: DEFAULT_SITE.into(),
            tls: TlsVerification::default(),
            timeout: DEFAULT_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    pub fn transport(&self) -> TransportConfig {
        TransportConfig {
            tls: TlsMode::from(&self.tls),
            timeout: self.timeout,
            cookie_jar: None,
        }
        .with_cookie_jar()
    }

    /// Build a session client for this controller. Does not log in.
    pub fn build_client(&self) -> Result<ControllerClient, CoreError> {
        Ok(ControllerClient::new(
            self.url.clone(),
            self.site.clone(),
            self.username.clone(),
            self.password.clone(),
            &self.transport(),
        )?)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cfg = ControllerConfig::new(
            "https://10.0.0.2:8443".parse().unwrap(),
            "admin",
            SecretString::from("pw".to_string()),
        );
        assert_eq!(cfg.site, "default");
        assert_eq!(cfg.tls, TlsVerification::DangerAcceptInvalid);
        assert_eq!(cfg.timeout, Duration::from_secs(10));
        assert_eq!(cfg.poll_interval, Duration::from_secs(60));

        let transport = cfg.transport();
        assert!(transport.cookie_jar.is_some());
        assert!(matches!(transport.tls, TlsMode::DangerAcceptInvalid));
    }

    #[test]
    fn tls_from_flags() {
        assert_eq!(
            TlsVerification::from_flags(false, None),
            TlsVerification::DangerAcceptInvalid
        );
        assert_eq!(
            TlsVerification::from_flags(true, None),
            TlsVerification::SystemDefaults
        );
        assert_eq!(
            TlsVerification::from_flags(false, Some("/etc/ca.pem".into())),
            TlsVerification::CustomCa("/etc/ca.pem".into())
        );
    }
}
