//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` variants into user-facing errors
//! with actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use jaalee_core::CoreError;

/// Exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const CONFLICT: i32 = 6;
    pub const CONNECTION: i32 = 7;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Accounts ─────────────────────────────────────────────────────
    #[error("account '{email}' is already configured")]
    #[diagnostic(
        code(jaalee::duplicate_account),
        help(
            "Each email can be linked once. Remove its profile from\n\
             {path} to link it again."
        )
    )]
    DuplicateAccount { email: String, path: String },

    #[error("no token stored for account '{email}'")]
    #[diagnostic(
        code(jaalee::no_credentials),
        help("Run: jaalee login")
    )]
    NoCredentials { email: String },

    #[error("stored token for '{email}' was rejected by the cloud")]
    #[diagnostic(
        code(jaalee::stale_token),
        help(
            "The token has expired and there is no automatic renewal.\n\
             Run: jaalee login"
        )
    )]
    StaleToken { email: String },

    // ── Cloud ────────────────────────────────────────────────────────
    #[error("cloud request failed")]
    #[diagnostic(
        code(jaalee::cloud),
        help("Check network connectivity; a running watch retries on its next cycle.")
    )]
    Cloud {
        #[source]
        source: jaalee_api::Error,
    },

    // ── Wizard ───────────────────────────────────────────────────────
    #[error("setup wizard failed: {message}")]
    #[diagnostic(code(jaalee::wizard))]
    Wizard { message: String },

    // ── Configuration / IO ───────────────────────────────────────────
    #[error(transparent)]
    #[diagnostic(code(jaalee::config))]
    Config(#[from] jaalee_config::ConfigError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Dialog(#[from] dialoguer::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::NoCredentials { .. } | Self::StaleToken { .. } => exit_code::AUTH,
            Self::DuplicateAccount { .. } => exit_code::CONFLICT,
            Self::Cloud { .. } => exit_code::CONNECTION,
            Self::Config(_) => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::StaleCredential { email } => Self::StaleToken { email },
            CoreError::Api(source) => Self::Cloud { source },
        }
    }
}
