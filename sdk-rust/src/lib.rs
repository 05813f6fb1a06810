mod client;
pub mod environment;
mod error_message;
mod errors;
mod operations;
mod opentelemetry;
pub mod session;
pub mod store;
pub mod transport;
mod types;
pub mod wallet_sdk_test;

pub use client::{WalletClient, WalletClientOptions};
pub use environment::{EnvironmentDefaults, EnvironmentMode, EnvironmentResolver};
pub use error_message::{error_message, error_message_from_json, GENERIC_ERROR_MESSAGE};
pub use errors::*;
pub use operations::{
    health_status, AuthRequirements, DepositRequest, EarnRequest, WithdrawRequest,
};
pub use session::Session;
pub use store::{FileStore, KeyValueStore, MemoryStore};
pub use transport::{ReqwestTransport, Transport, TransportRequest, TransportResponse};
pub use types::*;
