// Setup wizard state machine
//
// Two interactive steps: collect an email, then collect the
// verification code the cloud mailed to it. Mirrors the steps of the
// account-linking wizard: duplicate accounts abort before any network
// traffic, per-step failures re-present the same step, and a completed
// flow is terminal -- reconfiguration means a new flow instance.

use std::collections::BTreeSet;

use secrecy::SecretString;
use tracing::{debug, info};
use url::Url;

use jaalee_api::{ApiClient, TransportConfig};

use crate::error::FlowError;

/// Where the wizard currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowStep {
    AwaitingEmail,
    AwaitingCode,
    /// Terminal: the credential was emitted.
    Complete,
    /// Terminal: the flow was aborted (duplicate account).
    Aborted,
}

/// The record a completed flow emits, persisted by the configuration
/// layer as this account's credential.
#[derive(Debug, Clone)]
pub struct Credential {
    pub email: String,
    pub token: SecretString,
}

/// The setup wizard.
///
/// Holds the set of already-registered emails for the uniqueness check,
/// and builds its own [`ApiClient`] once an email is accepted. No
/// timeout is enforced between steps.
pub struct SetupFlow {
    transport: TransportConfig,
    base_url: Option<Url>,
    time_zone: String,
    registered: BTreeSet<String>,
    step: FlowStep,
    client: Option<ApiClient>,
}

impl SetupFlow {
    /// Create a flow. `registered` is the set of emails that already
    /// have an account configured.
    pub fn new(registered: impl IntoIterator<Item = String>, time_zone: impl Into<String>) -> Self {
        Self {
            transport: TransportConfig::default(),
            base_url: None,
            time_zone: time_zone.into(),
            registered: registered
                .into_iter()
                .map(|email| normalize_email(&email))
                .collect(),
            step: FlowStep::AwaitingEmail,
            client: None,
        }
    }

    /// Point the flow at an explicit base URL (tests, staging).
    pub fn with_base_url(mut self, base_url: Url) -> Self {
        self.base_url = Some(base_url);
        self
    }

    /// The wizard's current step.
    pub fn step(&self) -> FlowStep {
        self.step
    }

    /// The email captured by a successful first step, if any.
    pub fn email(&self) -> Option<&str> {
        self.client.as_ref().map(ApiClient::account)
    }

    /// First step: accept an email and request a verification code.
    ///
    /// An already-registered email aborts the flow without issuing any
    /// network call. A failed code request leaves the flow in
    /// `AwaitingEmail` so the step can be re-presented.
    pub async fn submit_email(&mut self, email: &str) -> Result<(), FlowError> {
        if self.step != FlowStep::AwaitingEmail {
            return Err(FlowError::WrongStep {
                actual: self.step,
                expected: FlowStep::AwaitingEmail,
            });
        }

        let email = email.trim();
        if self.registered.contains(&normalize_email(email)) {
            self.step = FlowStep::Aborted;
            return Err(FlowError::AlreadyConfigured { email: email.into() });
        }

        let client = self
            .build_client(email)
            .map_err(|source| FlowError::CannotGetCode { source })?;

        match client.request_code().await {
            Ok(()) => {
                debug!(account = email, "verification code requested");
                self.client = Some(client);
                self.step = FlowStep::AwaitingCode;
                Ok(())
            }
            Err(source) => {
                debug!(account = email, error = %source, "code request failed");
                Err(FlowError::CannotGetCode { source })
            }
        }
    }

    /// Second step: exchange the verification code for a token.
    ///
    /// Success completes the flow and emits the credential; a rejected
    /// code leaves the flow in `AwaitingCode` for another attempt.
    pub async fn submit_code(&mut self, code: &str) -> Result<Credential, FlowError> {
        if self.step != FlowStep::AwaitingCode {
            return Err(FlowError::WrongStep {
                actual: self.step,
                expected: FlowStep::AwaitingCode,
            });
        }

        // AwaitingCode is only reachable after submit_email stored a client.
        let Some(client) = self.client.as_ref() else {
            return Err(FlowError::WrongStep {
                actual: FlowStep::AwaitingEmail,
                expected: FlowStep::AwaitingCode,
            });
        };

        match client.login(code.trim(), &self.time_zone).await {
            Ok(token) => {
                self.step = FlowStep::Complete;
                info!(account = client.account(), "setup flow complete");
                Ok(Credential {
                    email: client.account().to_owned(),
                    token,
                })
            }
            Err(source) => {
                debug!(account = client.account(), error = %source, "login failed");
                Err(FlowError::InvalidCode { source })
            }
        }
    }

    fn build_client(&self, email: &str) -> Result<ApiClient, jaalee_api::Error> {
        match &self.base_url {
            Some(url) => ApiClient::with_base_url(url.clone(), email, &self.transport),
            None => ApiClient::new(email, &self.transport),
        }
    }
}

/// Account identity comparison is case-insensitive on the email.
fn normalize_email(email: &str) -> String {
    email.trim().to_ascii_lowercase()
}
