// Cloud API HTTP client
//
// Wraps `reqwest::Client` with the three fixed endpoints, envelope
// unwrapping, and the per-account token cache. One client instance per
// configured account; the token slot is the only mutable state and is
// written exclusively by `login` / `set_token`.

use std::collections::HashMap;
use std::sync::RwLock;

use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::{debug, error};
use url::Url;

use crate::error::Error;
use crate::models::{CODE_OK, CODE_TOKEN_EXPIRED, DeviceRecord, Envelope, LoginData};
use crate::transport::TransportConfig;

/// Production base URL for the vendor cloud.
pub const BASE_URL: &str = "https://sensor.jaalee.com/v1/open";

/// HTTP client for the Jaalee sensor cloud.
///
/// Handles the `{ code, data, message }` envelope and the token
/// lifecycle. All methods return unwrapped payloads -- the envelope is
/// stripped before the caller sees it. Failure never panics: transport
/// and envelope rejections both surface as typed [`Error`] values the
/// caller degrades on.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    account: String,
    token: RwLock<Option<SecretString>>,
}

impl ApiClient {
    /// Create a client for `account` against the production cloud.
    pub fn new(account: impl Into<String>, transport: &TransportConfig) -> Result<Self, Error> {
        let base_url = Url::parse(BASE_URL)?;
        Self::with_base_url(base_url, account, transport)
    }

    /// Create a client against an explicit base URL (tests, staging).
    pub fn with_base_url(
        base_url: Url,
        account: impl Into<String>,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self {
            http,
            base_url,
            account: account.into(),
            token: RwLock::new(None),
        })
    }

    /// Seed the token slot from a stored credential.
    pub fn with_token(self, token: SecretString) -> Self {
        self.set_token(token);
        self
    }

    /// The account email this client authenticates as.
    pub fn account(&self) -> &str {
        &self.account
    }

    /// The currently held token, if any.
    pub fn token(&self) -> Option<SecretString> {
        self.token.read().ok().and_then(|guard| guard.clone())
    }

    /// Replace the held token.
    pub fn set_token(&self, token: SecretString) {
        if let Ok(mut guard) = self.token.write() {
            *guard = Some(token);
        }
    }

    // ── Endpoints ────────────────────────────────────────────────────

    /// Request a verification code be sent to the account email.
    ///
    /// `GET /code?account=<email>`. Success is an envelope with code 0
    /// and no payload.
    pub async fn request_code(&self) -> Result<(), Error> {
        let url = self.endpoint("code")?;
        debug!(account = %self.account, "GET {url}");

        let resp = self
            .http
            .get(url)
            .query(&[("account", self.account.as_str())])
            .send()
            .await
            .map_err(Error::Transport)?;

        let envelope: Envelope<serde_json::Value> = self.parse_envelope(resp).await?;
        match envelope.code {
            CODE_OK => Ok(()),
            code => Err(Error::Api {
                code,
                message: envelope.message.unwrap_or_else(|| "code request rejected".into()),
            }),
        }
    }

    /// Exchange a verification code for a long-lived token.
    ///
    /// `POST /login` with `{ account, code, timeZone }`. On success the
    /// token is stored in the client's token slot and returned.
    pub async fn login(&self, code: &str, time_zone: &str) -> Result<SecretString, Error> {
        let url = self.endpoint("login")?;
        debug!(account = %self.account, "POST {url}");

        let body = json!({
            "account": self.account,
            "code": code,
            "timeZone": time_zone,
        });

        let resp = self
            .http
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(Error::Transport)?;

        let envelope: Envelope<LoginData> = self.parse_envelope(resp).await?;
        if envelope.code != CODE_OK {
            return Err(Error::Authentication {
                message: envelope
                    .message
                    .unwrap_or_else(|| format!("login rejected (code {})", envelope.code)),
            });
        }

        let token: SecretString = envelope
            .data
            .map(|d| d.token)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| Error::Authentication {
                message: "login response carried no token".into(),
            })?
            .into();

        self.set_token(token.clone());
        debug!(account = %self.account, "login successful");
        Ok(token)
    }

    /// Fetch the full device snapshot, re-keyed by MAC address.
    ///
    /// `GET /data/all` with the token in the `Authorization` header.
    /// Fails fast without a network call when no token is held. Envelope
    /// code 3 maps to [`Error::TokenExpired`]; there is no automatic
    /// re-login -- the caller decides how to surface the stale credential.
    pub async fn fetch_all(&self) -> Result<HashMap<String, DeviceRecord>, Error> {
        let Some(token) = self.token() else {
            error!(account = %self.account, "cannot fetch device data: no token held");
            return Err(Error::MissingToken);
        };

        let url = self.endpoint("data/all")?;
        debug!(account = %self.account, "GET {url}");

        let resp = self
            .http
            .get(url)
            .header("Authorization", token.expose_secret())
            .send()
            .await
            .map_err(Error::Transport)?;

        let envelope: Envelope<Vec<DeviceRecord>> = self.parse_envelope(resp).await?;
        match envelope.code {
            CODE_OK => Ok(envelope
                .data
                .unwrap_or_default()
                .into_iter()
                .map(|device| (device.mac.clone(), device))
                .collect()),
            CODE_TOKEN_EXPIRED => {
                error!(account = %self.account, "token expired or revoked -- re-authentication required");
                Err(Error::TokenExpired)
            }
            code => {
                let message = envelope
                    .message
                    .unwrap_or_else(|| "device data fetch rejected".into());
                error!(account = %self.account, code, "failed to fetch device data: {message}");
                Err(Error::Api { code, message })
            }
        }
    }

    // ── Helpers ──────────────────────────────────────────────────────

    /// Build a full URL under the fixed base path.
    fn endpoint(&self, path: &str) -> Result<Url, Error> {
        let full = format!("{}/{path}", self.base_url.as_str().trim_end_matches('/'));
        Url::parse(&full).map_err(Error::InvalidUrl)
    }

    /// Check HTTP status and decode the envelope, keeping the raw body
    /// around for deserialization diagnostics.
    async fn parse_envelope<T: DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> Result<Envelope<T>, Error> {
        let resp = resp.error_for_status().map_err(Error::Transport)?;
        let body = resp.text().await.map_err(Error::Transport)?;

        serde_json::from_str(&body).map_err(|e| Error::Deserialization {
            message: e.to_string(),
            body,
        })
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url.as_str())
            .field("account", &self.account)
            .field("has_token", &self.token().is_some())
            .finish_non_exhaustive()
    }
}
