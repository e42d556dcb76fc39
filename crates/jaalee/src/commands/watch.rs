//! Live polling view: connect, re-render on store changes, Ctrl-C to stop.

use owo_colors::OwoColorize;

use crate::cli::GlobalOpts;
use crate::error::CliError;

use super::{account_for, util};

pub async fn handle(global: &GlobalOpts) -> Result<(), CliError> {
    let account = account_for(global)?;
    account.connect().await?;

    println!(
        "Watching {} -- Ctrl-C to stop.\n",
        account.email().bold()
    );
    println!("{}", util::render_states(&account.sensor_states()));

    let mut snapshots = account.store().subscribe();
    let mut outcomes = account.store().subscribe_last_update();

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            changed = snapshots.changed() => {
                if changed.is_err() {
                    break;
                }
                println!("{}", util::render_states(&account.sensor_states()));
            }
            changed = outcomes.changed() => {
                if changed.is_err() {
                    break;
                }
                let outcome = *outcomes.borrow_and_update();
                if outcome.success {
                    continue;
                }
                // Degraded cycle: keep the last table visible, flag it.
                eprintln!("{}", "last update failed; readings are stale".yellow());
                println!("{}", util::render_states(&account.sensor_states()));
            }
        }
    }

    account.disconnect().await;
    Ok(())
}
