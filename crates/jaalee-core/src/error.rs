use thiserror::Error;

use crate::flow::FlowStep;

/// Account-level errors surfaced to consumers (CLI).
///
/// Nothing here is fatal to the process -- every variant degrades to
/// "this account's data is unavailable" at the presentation layer.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The stored token was rejected by the cloud. There is no refresh
    /// endpoint; the user must run the setup wizard again.
    #[error("stale credential for '{email}' -- run the login wizard again")]
    StaleCredential { email: String },

    /// Anything the API client reported: transport, envelope rejection,
    /// malformed payload.
    #[error(transparent)]
    Api(#[from] jaalee_api::Error),
}

/// Step-level outcomes of the setup wizard.
///
/// `CannotGetCode` and `InvalidCode` re-present the current step; the
/// other variants end the flow.
#[derive(Debug, Error)]
pub enum FlowError {
    /// The email is already registered as an account. Aborts the flow
    /// before any network call is made.
    #[error("account '{email}' is already configured")]
    AlreadyConfigured { email: String },

    /// Requesting a verification code failed. The email step is
    /// re-presented; transport causes are not distinguished for the user.
    #[error("could not request a verification code")]
    CannotGetCode {
        #[source]
        source: jaalee_api::Error,
    },

    /// The login attempt was rejected. The code step is re-presented.
    #[error("verification code rejected")]
    InvalidCode {
        #[source]
        source: jaalee_api::Error,
    },

    /// A submission arrived for a step the flow is not in (including
    /// any submission after the flow completed or aborted).
    #[error("flow is in step {actual:?}, expected {expected:?}")]
    WrongStep { actual: FlowStep, expected: FlowStep },
}

impl FlowError {
    /// Whether the current step may simply be retried with new input.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::CannotGetCode { .. } | Self::InvalidCode { .. })
    }
}
