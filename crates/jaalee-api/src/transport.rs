// Shared transport configuration for building reqwest::Client instances.
//
// The vendor enforces a 1-minute rate limit on the data endpoint and
// occasionally stalls under load, so every call carries the same fixed
// timeout rather than a per-endpoint one.

use std::time::Duration;

/// Fixed per-call timeout for every cloud endpoint.
pub const API_TIMEOUT: Duration = Duration::from_secs(20);

/// Shared transport configuration for building HTTP clients.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub timeout: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self { timeout: API_TIMEOUT }
    }
}

impl TransportConfig {
    /// Build a `reqwest::Client` from this config.
    pub fn build_client(&self) -> Result<reqwest::Client, crate::error::Error> {
        reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(concat!("jaalee-cli/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(crate::error::Error::Transport)
    }
}
