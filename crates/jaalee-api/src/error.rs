use thiserror::Error;

/// Top-level error type for the `jaalee-api` crate.
///
/// Covers every failure mode of the three cloud endpoints: transport,
/// authentication, envelope-level rejection, and payload decoding.
/// `jaalee-core` maps these into user-facing conditions.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Login rejected (wrong verification code, unknown account, etc.)
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    /// The held token was rejected with the vendor's expiry code.
    /// There is no refresh endpoint -- re-authentication is manual.
    #[error("Token expired -- re-authentication required")]
    TokenExpired,

    /// A data fetch was attempted with no token held.
    #[error("No token held -- log in before fetching device data")]
    MissingToken,

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout).
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ── Envelope ────────────────────────────────────────────────────
    /// Non-success envelope code from the vendor API.
    #[error("Vendor API error (code {code}): {message}")]
    Api { code: i64, message: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if this error indicates auth is no longer valid
    /// and only a fresh login would resolve it.
    pub fn is_auth_expired(&self) -> bool {
        matches!(self, Self::TokenExpired | Self::MissingToken)
    }

    /// Returns `true` if this is a transient error that may clear up
    /// on the next poll cycle without intervention.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            _ => false,
        }
    }
}
