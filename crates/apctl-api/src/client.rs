// Controller HTTP client
//
// Wraps `reqwest::Client` with site-scoped URL construction, session state,
// and envelope unwrapping. Login lives in `auth.rs` and the device
// endpoints in `devices.rs`, both as inherent methods on `ControllerClient`,
// to keep this module focused on transport mechanics.

use std::sync::atomic::{AtomicBool, Ordering};

use secrecy::SecretString;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::Mutex;
use tracing::{debug, error, warn};
use url::Url;

use crate::error::{Error, preview};
use crate::models::Envelope;
use crate::transport::TransportConfig;

/// Session-holding client for one controller site.
///
/// The session is a cookie in the client's jar plus an `authenticated`
/// flag. The flag is cleared whenever an authenticated call fails at the
/// transport level; the next call logs in again before proceeding.
pub struct ControllerClient {
    http: reqwest::Client,
    base_url: Url,
    site: String,
    username: String,
    password: SecretString,
    timeout_secs: u64,
    authenticated: AtomicBool,
    /// Serializes logins so concurrent callers share one re-authentication.
    login_lock: Mutex<()>,
}

impl ControllerClient {
    /// Create a new client from a `TransportConfig`.
    ///
    /// If the config doesn't already include a cookie jar, one is created
    /// (session auth requires cookies). `base_url` is the controller root,
    /// e.g. `https://controller:8443`.
    pub fn new(
        base_url: Url,
        site: String,
        username: String,
        password: SecretString,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let config = if transport.cookie_jar.is_some() {
            transport.clone()
        } else {
            transport.clone().with_cookie_jar()
        };
        let http = config.build_client()?;
        let mut client = Self::with_client(http, base_url, site, username, password);
        client.timeout_secs = config.timeout.as_secs();
        Ok(client)
    }

    /// Create a client around a pre-built `reqwest::Client`.
    ///
    /// The caller is responsible for enabling cookies and a timeout.
    pub fn with_client(
        http: reqwest::Client,
        base_url: Url,
        site: String,
        username: String,
        password: SecretString,
    ) -> Self {
        Self {
            http,
            base_url,
            site,
            username,
            password,
            timeout_secs: crate::transport::DEFAULT_TIMEOUT.as_secs(),
            authenticated: AtomicBool::new(false),
            login_lock: Mutex::new(()),
        }
    }

    /// The configured site identifier.
    pub fn site(&self) -> &str {
        &self.site
    }

    /// The controller base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }

    pub(crate) fn username(&self) -> &str {
        &self.username
    }

    pub(crate) fn password(&self) -> &SecretString {
        &self.password
    }

    pub(crate) fn timeout_secs(&self) -> u64 {
        self.timeout_secs
    }

    pub(crate) fn login_lock(&self) -> &Mutex<()> {
        &self.login_lock
    }

    // ── Session state ────────────────────────────────────────────────

    /// Whether a login has succeeded since the last invalidation.
    pub fn is_authenticated(&self) -> bool {
        self.authenticated.load(Ordering::Acquire)
    }

    pub(crate) fn mark_authenticated(&self) {
        self.authenticated.store(true, Ordering::Release);
    }

    /// Drop the session flag; the next call re-authenticates.
    pub fn invalidate_session(&self) {
        if self.authenticated.swap(false, Ordering::AcqRel) {
            debug!("session invalidated");
        }
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Build `{base}/api/{path}`.
    pub(crate) fn api_url(&self, path: &str) -> Result<Url, Error> {
        let base = self.base_url.as_str().trim_end_matches('/');
        Ok(Url::parse(&format!("{base}/api/{path}"))?)
    }

    /// Build a site-scoped URL: `{base}/api/s/{site}/{path}`.
    pub(crate) fn site_url(&self, path: &str) -> Result<Url, Error> {
        let base = self.base_url.as_str().trim_end_matches('/');
        Ok(Url::parse(&format!("{base}/api/s/{}/{path}", self.site))?)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Send a GET request and unwrap the envelope.
    ///
    /// Every failure here invalidates the session: an expired cookie and a
    /// dropped connection look the same from the outside.
    pub(crate) async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<Vec<T>, Error> {
        debug!("GET {}", url);

        let result: Result<Vec<T>, Error> = async {
            let resp = self.http.get(url).send().await?;
            parse_envelope(resp).await
        }
        .await;

        if let Err(ref e) = result {
            warn!(error = %e, "controller read failed");
            self.invalidate_session();
        }
        result
    }

    /// Send a PUT request with a JSON body and report whether it succeeded.
    ///
    /// A non-2xx answer is logged and yields `Ok(false)`. Transport failures
    /// invalidate the session and are returned as errors.
    pub(crate) async fn put_status(
        &self,
        url: Url,
        body: &(impl Serialize + Sync),
    ) -> Result<bool, Error> {
        debug!("PUT {}", url);

        let resp = match self.http.put(url).json(body).send().await {
            Ok(resp) => resp,
            Err(e) => {
                self.invalidate_session();
                return Err(Error::Transport(e));
            }
        };

        let status = resp.status();
        if status.is_success() {
            return Ok(true);
        }

        let text = resp.text().await.unwrap_or_default();
        error!(
            status = status.as_u16(),
            body = preview(&text, 100),
            "controller rejected update"
        );
        Ok(false)
    }
}

/// Parse the `{ meta, data }` envelope, returning `data` on success.
async fn parse_envelope<T: DeserializeOwned>(resp: reqwest::Response) -> Result<Vec<T>, Error> {
    let status = resp.status();

    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(Error::Http {
            status: status.as_u16(),
            body: preview(&body, 200).to_owned(),
        });
    }

    let body = resp.text().await?;

    let envelope: Envelope<T> = serde_json::from_str(&body).map_err(|e| {
        let message = format!("{e} (body preview: {:?})", preview(&body, 200));
        Error::Deserialization {
            message,
            body: body.clone(),
        }
    })?;

    if envelope.meta.is_ok() {
        Ok(envelope.data)
    } else {
        Err(Error::Api {
            message: envelope
                .meta
                .msg
                .unwrap_or_else(|| format!("rc={}", envelope.meta.rc)),
        })
    }
}
