// Session authentication
//
// Cookie-based login/logout against the classic controller API. The login
// endpoint sets a session cookie in the client's jar; subsequent requests
// carry it automatically.

use secrecy::ExposeSecret;
use serde_json::json;
use tracing::{debug, warn};
use url::Url;

use crate::client::ControllerClient;
use crate::error::{AuthError, Error, preview};
use crate::models::LoginResponse;

impl ControllerClient {
    /// Authenticate with the controller using the configured credentials.
    ///
    /// `POST /api/login`. Success requires both a 2xx status and
    /// `meta.rc == "ok"` in the body; the controller reports bad credentials
    /// as HTTP 200 with `rc = "error"`.
    pub async fn login(&self) -> Result<(), Error> {
        let result = self.login_once().await;
        match result {
            Ok(()) => {
                self.mark_authenticated();
                debug!("login successful");
                Ok(())
            }
            Err(e) => {
                self.invalidate_session();
                Err(e)
            }
        }
    }

    async fn login_once(&self) -> Result<(), Error> {
        let url = self.api_url("login")?;
        debug!("logging in at {}", url);

        let body = json!({
            "username": self.username(),
            "password": self.password().expose_secret(),
        });

        let resp = self
            .http()
            .post(url.clone())
            .json(&body)
            .send()
            .await
            .map_err(|e| self.classify_login_failure(&url, e))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(AuthError::HttpError {
                status: status.as_u16(),
                body: preview(&body, 200).to_owned(),
            }
            .into());
        }

        let text = resp
            .text()
            .await
            .map_err(|e| self.classify_login_failure(&url, e))?;

        let parsed: LoginResponse =
            serde_json::from_str(&text).map_err(|e| AuthError::InvalidResponse {
                message: format!("{e} (body preview: {:?})", preview(&text, 200)),
            })?;

        let meta = parsed.meta.unwrap_or_default();
        if !meta.is_ok() {
            return Err(AuthError::RejectedCredentials {
                message: meta.msg.unwrap_or_else(|| "Unknown error".into()),
            }
            .into());
        }

        Ok(())
    }

    fn classify_login_failure(&self, url: &Url, err: reqwest::Error) -> AuthError {
        if err.is_timeout() {
            AuthError::Timeout {
                timeout_secs: self.timeout_secs(),
            }
        } else {
            AuthError::ConnectionFailed {
                url: url.to_string(),
                source: err,
            }
        }
    }

    /// Log in unless a session is already established.
    ///
    /// Concurrent callers wait on a single login; whoever gets the lock
    /// second sees the fresh session and returns without a second request.
    /// Login failures propagate.
    pub(crate) async fn ensure_authenticated(&self) -> Result<(), Error> {
        if self.is_authenticated() {
            return Ok(());
        }

        let _guard = self.login_lock().lock().await;
        if self.is_authenticated() {
            return Ok(());
        }
        self.login().await
    }

    /// End the current session. `POST /api/logout`.
    ///
    /// The session flag is cleared whatever the controller answers.
    pub async fn logout(&self) -> Result<(), Error> {
        let url = self.api_url("logout")?;
        debug!("logging out at {}", url);

        self.invalidate_session();
        let _resp = self.http().post(url).send().await?;

        debug!("logout complete");
        Ok(())
    }

    /// Check that the credentials work end to end.
    ///
    /// Logs in and fetches the access point list. Any failure yields
    /// `false`; meant for setup validation, not for polling.
    pub async fn test_connection(&self) -> bool {
        let result: Result<_, Error> = async {
            self.login().await?;
            self.fetch_access_points().await
        }
        .await;

        match result {
            Ok(aps) => {
                debug!(access_points = aps.len(), "connection test passed");
                true
            }
            Err(e) => {
                warn!(error = %e, "connection test failed");
                false
            }
        }
    }
}
