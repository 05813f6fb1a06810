use thiserror::Error;

#[derive(Error, Debug)]
pub enum WalletError {
    /// The input was rejected before anything was persisted or sent
    /// (e.g. a malformed custom base URL or an empty identifier).
    #[error("Invalid input: {0}")]
    Validation(String),
    /// An auth-gated request was attempted without a stored bearer token.
    #[error("not authenticated")]
    NotAuthenticated,
    /// The request could not be delivered or its body could not be read.
    #[error("Transport error: {0}")]
    Transport(String),
    /// The key-value store failed to load or persist state.
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<reqwest::Error> for WalletError {
    fn from(error: reqwest::Error) -> Self {
        Self::Transport(error.to_string())
    }
}

impl From<std::io::Error> for WalletError {
    fn from(error: std::io::Error) -> Self {
        Self::Storage(error.to_string())
    }
}

pub type WalletResult<T> = Result<T, WalletError>;
