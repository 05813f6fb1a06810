mod cli;
mod commands;
mod output;

use anyhow::Context;
use clap::Parser;
use std::{process, sync::Arc};
use tracing_subscriber::EnvFilter;
use wallet_sdk::{FileStore, WalletClient, WalletClientOptions};

use crate::cli::Cli;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let exit_code = match run(Cli::parse()).await {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            1
        }
    };

    if exit_code != 0 {
        process::exit(exit_code);
    }
}

async fn run(cli: Cli) -> anyhow::Result<i32> {
    let path = match cli.state {
        Some(path) => path,
        None => FileStore::default_path()?,
    };
    let store = FileStore::open(&path)
        .with_context(|| format!("failed to open state file {}", path.display()))?;
    tracing::debug!(path = %path.display(), "using state file");

    let client = WalletClient::new(WalletClientOptions {
        store: Some(Arc::new(store)),
        ..Default::default()
    });

    let outcome = commands::run(&client, cli.command).await?;
    Ok(output::render(&outcome))
}
