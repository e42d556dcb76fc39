//! Argument definitions for the `jaalee` binary.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "jaalee",
    version,
    about = "Read Jaalee cloud sensors from the terminal",
    propagate_version = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Account profile name from the config file.
    #[arg(long, short = 'a', global = true)]
    pub account: Option<String>,

    /// Path to the config file (default: platform config dir).
    #[arg(long, global = true, env = "JAALEE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(long, short = 'v', action = ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Link a cloud account: email, then the emailed verification code.
    Login(LoginArgs),

    /// Fetch the latest readings once and print them.
    Devices,

    /// Poll continuously and re-render readings as they change.
    Watch,

    /// List configured accounts.
    Accounts,
}

#[derive(Debug, Args)]
pub struct LoginArgs {
    /// Profile name to store the credential under.
    /// Defaults to the part of the email before the '@'.
    #[arg(long)]
    pub name: Option<String>,
}
