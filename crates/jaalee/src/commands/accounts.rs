//! List configured account profiles.

use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::cli::GlobalOpts;
use crate::error::CliError;

use super::config_file;

#[derive(Tabled)]
struct AccountRow {
    #[tabled(rename = "Profile")]
    name: String,
    #[tabled(rename = "Email")]
    email: String,
    #[tabled(rename = "Token")]
    token: &'static str,
    #[tabled(rename = "Default")]
    default: &'static str,
}

pub fn handle(global: &GlobalOpts) -> Result<(), CliError> {
    let path = config_file(global);
    let config = jaalee_config::load(&path)?;

    if config.accounts.is_empty() {
        println!("no accounts configured -- run: jaalee login");
        return Ok(());
    }

    let rows: Vec<AccountRow> = config
        .accounts
        .iter()
        .map(|(name, profile)| AccountRow {
            name: name.clone(),
            email: profile.email.clone(),
            token: if profile.token.is_some() || profile.token_env.is_some() {
                "stored"
            } else {
                "missing"
            },
            default: if config.default_account.as_deref() == Some(name) {
                "*"
            } else {
                ""
            },
        })
        .collect();

    println!("{}", Table::new(rows).with(Style::sharp()));
    Ok(())
}
