//! One-shot device readout.

use crate::cli::GlobalOpts;
use crate::error::CliError;

use super::{account_for, util};

pub async fn handle(global: &GlobalOpts) -> Result<(), CliError> {
    let account = account_for(global)?;
    account.refresh().await?;

    println!("{}", util::render_states(&account.sensor_states()));
    Ok(())
}
