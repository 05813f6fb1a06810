use std::sync::Arc;
use wallet_sdk::{FileStore, WalletClient, WalletClientOptions};

/// Client backed by the state file at `WALLET_STATE_PATH`, or the default
/// per-user location.
pub fn get_client() -> WalletClient {
    let path = std::env::var("WALLET_STATE_PATH")
        .map(Into::into)
        .unwrap_or_else(|_| FileStore::default_path().expect("no default state path"));
    let store = FileStore::open(path).expect("failed to open state file");

    WalletClient::new(WalletClientOptions {
        store: Some(Arc::new(store)),
        ..Default::default()
    })
}

pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();
}
