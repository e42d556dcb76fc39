//! Command handlers: bridge CLI args -> core operations -> terminal output.

pub mod accounts;
pub mod devices;
pub mod login;
pub mod util;
pub mod watch;

use std::path::PathBuf;

use jaalee_core::{Account, AccountConfig};

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// The config file path: `--config` / `JAALEE_CONFIG`, else the
/// platform default.
pub fn config_file(global: &GlobalOpts) -> PathBuf {
    global
        .config
        .clone()
        .unwrap_or_else(jaalee_config::config_path)
}

/// Load configuration and resolve the selected account, requiring a
/// stored token.
pub fn resolve_account(global: &GlobalOpts) -> Result<AccountConfig, CliError> {
    let config = jaalee_config::load(&config_file(global))?;
    let account = config.resolve(global.account.as_deref())?;
    if account.token.is_none() {
        return Err(CliError::NoCredentials {
            email: account.email,
        });
    }
    Ok(account)
}

/// Build an [`Account`] for the selected profile.
pub fn account_for(global: &GlobalOpts) -> Result<Account, CliError> {
    let config = resolve_account(global)?;
    Ok(Account::new(config)?)
}
