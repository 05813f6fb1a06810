//! Argument definitions for the `wallet` binary.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use wallet_sdk::EnvironmentMode;

#[derive(Debug, Parser)]
#[command(name = "wallet", about = "Command-line client for the wallet and earnings API")]
pub(crate) struct Cli {
    /// State file holding the environment and session.
    #[arg(long, global = true, env = "WALLET_STATE_PATH")]
    pub state: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub(crate) enum Command {
    /// Show or change which API the client talks to.
    #[command(subcommand)]
    Env(EnvCommand),
    /// Check that the API is reachable.
    Health,
    /// Request a token for a mobile number.
    Login {
        #[arg(help = "Mobile number")]
        mobile: String,
    },
    /// Forget the stored token (the mobile number is kept).
    Logout,
    /// Print the remembered mobile number and whether a token is stored.
    Whoami,
    Balance(IdentifierArgs),
    Transactions(IdentifierArgs),
    Earnings(IdentifierArgs),
    Deposit {
        amount: f64,
        #[command(flatten)]
        identifier: IdentifierArgs,
    },
    Withdraw {
        amount: f64,
        #[arg(help = "Payout provider, e.g. upi or paytm")]
        provider: String,
        #[command(flatten)]
        identifier: IdentifierArgs,
    },
    /// Report consumed content to earn from it.
    Earn {
        content_id: String,
        content_type: String,
        #[arg(help = "Seconds of content consumed")]
        duration: u64,
        #[command(flatten)]
        identifier: IdentifierArgs,
    },
}

#[derive(Debug, Subcommand)]
pub(crate) enum EnvCommand {
    Show,
    Set { mode: ModeArg },
    /// Use a custom base URL (switches the mode to custom).
    Custom { url: String },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub(crate) enum ModeArg {
    Prod,
    Local,
    Custom,
}

impl From<ModeArg> for EnvironmentMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Prod => Self::Production,
            ModeArg::Local => Self::Local,
            ModeArg::Custom => Self::Custom,
        }
    }
}

#[derive(Debug, Clone, Args)]
pub(crate) struct IdentifierArgs {
    #[arg(help = "Mobile number (defaults to the remembered one)")]
    pub mobile: Option<String>,
}
