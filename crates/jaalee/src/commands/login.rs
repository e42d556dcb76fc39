//! Interactive account-linking wizard.
//!
//! Two steps, mirroring the cloud's flow: the email step requests a
//! verification code, the code step exchanges it for a token. Step
//! failures re-prompt the same step; a duplicate account aborts.

use dialoguer::Input;
use dialoguer::theme::ColorfulTheme;
use owo_colors::OwoColorize;
use url::Url;

use jaalee_core::{Credential, FlowError, SetupFlow};

use crate::cli::{GlobalOpts, LoginArgs};
use crate::error::CliError;

use super::config_file;

pub async fn handle(args: LoginArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let path = config_file(global);
    let mut config = jaalee_config::load(&path)?;

    let mut flow = SetupFlow::new(
        config.registered_emails(),
        config.defaults.time_zone.clone(),
    );
    if let Some(raw) = &config.defaults.base_url {
        let base_url = Url::parse(raw).map_err(|e| CliError::Wizard {
            message: format!("invalid defaults.base_url: {e}"),
        })?;
        flow = flow.with_base_url(base_url);
    }

    let credential = run_wizard(&mut flow, &path).await?;

    let name = args
        .name
        .unwrap_or_else(|| profile_name(&credential.email));
    config.store_credential(&name, &credential);
    jaalee_config::save(&config, &path)?;

    println!(
        "{} account {} linked as profile '{name}'",
        "✓".green(),
        credential.email.bold()
    );
    Ok(())
}

async fn run_wizard(flow: &mut SetupFlow, path: &std::path::Path) -> Result<Credential, CliError> {
    let theme = ColorfulTheme::default();

    // Step 1: email. Re-prompt while the code request fails.
    loop {
        let email: String = Input::with_theme(&theme)
            .with_prompt("Account email")
            .interact_text()?;

        match flow.submit_email(&email).await {
            Ok(()) => break,
            Err(FlowError::AlreadyConfigured { email }) => {
                return Err(CliError::DuplicateAccount {
                    email,
                    path: path.display().to_string(),
                });
            }
            Err(e) if e.is_retryable() => {
                eprintln!("{} {e}", "✗".red());
            }
            Err(e) => {
                return Err(CliError::Wizard {
                    message: e.to_string(),
                });
            }
        }
    }

    println!("A verification code has been sent to your inbox.");

    // Step 2: code. Re-prompt while the login is rejected.
    loop {
        let code: String = Input::with_theme(&theme)
            .with_prompt("Verification code")
            .interact_text()?;

        match flow.submit_code(&code).await {
            Ok(credential) => return Ok(credential),
            Err(e) if e.is_retryable() => {
                eprintln!("{} {e}", "✗".red());
            }
            Err(e) => {
                return Err(CliError::Wizard {
                    message: e.to_string(),
                });
            }
        }
    }
}

/// Default profile name: the part of the email before the '@'.
fn profile_name(email: &str) -> String {
    email
        .split('@')
        .next()
        .filter(|s| !s.is_empty())
        .unwrap_or("default")
        .to_owned()
}
