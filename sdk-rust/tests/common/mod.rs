use std::sync::Arc;
use wallet_sdk::{
    wallet_sdk_test::MockTransport, AuthRequirements, KeyValueStore, MemoryStore, WalletClient,
    WalletClientOptions,
};

pub const TEST_BASE_URL: &str = "http://wallet.test";

/// A client over a mock transport and an in-memory store, pointed at
/// [`TEST_BASE_URL`].
pub fn mock_client() -> (WalletClient, Arc<MockTransport>) {
    mock_client_with(Arc::new(MemoryStore::new()), AuthRequirements::default())
}

pub fn mock_client_with(
    store: Arc<dyn KeyValueStore>,
    auth: AuthRequirements,
) -> (WalletClient, Arc<MockTransport>) {
    let transport = Arc::new(MockTransport::new());
    let client = WalletClient::new(WalletClientOptions {
        transport: Some(transport.clone()),
        store: Some(store),
        auth,
        ..Default::default()
    });
    client
        .environment()
        .set_custom_url(TEST_BASE_URL)
        .expect("test base URL is valid");
    (client, transport)
}
