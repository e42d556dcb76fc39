// Per-account runtime configuration.

use std::time::Duration;

use secrecy::SecretString;
use url::Url;

/// Default poll interval. The vendor rate-limits the data endpoint to
/// one request per minute; two minutes leaves headroom.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(120);

/// Everything needed to run one cloud account.
///
/// Produced by `jaalee-config` from a named profile, or assembled
/// directly in tests.
#[derive(Debug, Clone)]
pub struct AccountConfig {
    /// Account email -- the unique identity of this account.
    pub email: String,
    /// Stored long-lived token from a completed setup flow.
    pub token: Option<SecretString>,
    /// IANA timezone name sent with the login request.
    pub time_zone: String,
    /// Fixed refresh interval for the background poll task.
    pub poll_interval: Duration,
    /// Per-call HTTP timeout.
    pub timeout: Duration,
    /// Base URL override (tests, staging). `None` means production.
    pub base_url: Option<Url>,
}

impl AccountConfig {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            token: None,
            time_zone: "UTC".into(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            timeout: jaalee_api::transport::API_TIMEOUT,
            base_url: None,
        }
    }

    pub fn with_token(mut self, token: SecretString) -> Self {
        self.token = Some(token);
        self
    }

    pub fn with_base_url(mut self, base_url: Url) -> Self {
        self.base_url = Some(base_url);
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }
}
