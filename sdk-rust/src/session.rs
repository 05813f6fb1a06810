use crate::{
    store::{KeyValueStore, IDENTIFIER_KEY, TOKEN_KEY},
    WalletResult,
};
use std::{fmt, sync::Arc};

/// Normalize a user-entered identifier (a phone number): trim it and drop
/// the separators people type between digit groups.
#[must_use]
pub fn normalize_identifier(raw: &str) -> String {
    raw.trim()
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '.' | '(' | ')'))
        .collect()
}

/// Bearer token and last identifier, read from and written through to the
/// store on every access.
#[derive(Clone)]
pub struct Session {
    store: Arc<dyn KeyValueStore>,
}

impl Session {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Store the identifier and token together.
    ///
    /// Returns `false` without touching the store when either is empty.
    pub fn login(&self, identifier: &str, token: &str) -> WalletResult<bool> {
        let identifier = normalize_identifier(identifier);
        let token = token.trim();
        if identifier.is_empty() || token.is_empty() {
            tracing::debug!("login ignored: empty identifier or token");
            return Ok(false);
        }
        self.store
            .set_many(&[(IDENTIFIER_KEY, identifier.as_str()), (TOKEN_KEY, token)])?;
        tracing::info!(identifier = %identifier, "session token stored");
        Ok(true)
    }

    /// Drop the token. The identifier is kept for prefill.
    pub fn logout(&self) -> WalletResult<()> {
        self.store.remove(TOKEN_KEY)?;
        tracing::info!("session token cleared");
        Ok(())
    }

    /// Remember an identifier without a token. Returns `false` for an empty
    /// identifier.
    ///
    /// A stored token belongs to the stored identifier, so switching to a
    /// different identifier drops the token first.
    pub fn set_identifier(&self, identifier: &str) -> WalletResult<bool> {
        let identifier = normalize_identifier(identifier);
        if identifier.is_empty() {
            return Ok(false);
        }
        if self.current_identifier().as_deref() != Some(identifier.as_str()) && self.has_token()
        {
            self.logout()?;
        }
        self.store.set(IDENTIFIER_KEY, &identifier)?;
        Ok(true)
    }

    #[must_use]
    pub fn current_token(&self) -> Option<String> {
        self.store.get(TOKEN_KEY).filter(|token| !token.is_empty())
    }

    #[must_use]
    pub fn current_identifier(&self) -> Option<String> {
        self.store
            .get(IDENTIFIER_KEY)
            .filter(|identifier| !identifier.is_empty())
    }

    #[must_use]
    pub fn has_token(&self) -> bool {
        self.current_token().is_some()
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("identifier", &self.current_identifier())
            .field("has_token", &self.has_token())
            .finish()
    }
}
