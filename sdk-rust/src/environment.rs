use crate::{
    store::{KeyValueStore, CUSTOM_BASE_URL_KEY, ENV_MODE_KEY},
    WalletError, WalletResult,
};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr, sync::Arc};

pub const DEFAULT_PRODUCTION_URL: &str = "https://api.humanhelperai.in";
pub const DEFAULT_LOCAL_URL: &str = "http://127.0.0.1:5000";

/// Which base URL the client talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EnvironmentMode {
    #[default]
    #[serde(rename = "prod")]
    Production,
    #[serde(rename = "local")]
    Local,
    #[serde(rename = "custom")]
    Custom,
}

impl EnvironmentMode {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Production => "prod",
            Self::Local => "local",
            Self::Custom => "custom",
        }
    }
}

impl fmt::Display for EnvironmentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EnvironmentMode {
    type Err = WalletError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "prod" => Ok(Self::Production),
            "local" => Ok(Self::Local),
            "custom" => Ok(Self::Custom),
            other => Err(WalletError::Validation(format!(
                "unknown environment mode: {other}"
            ))),
        }
    }
}

/// Built-in base URLs for the fixed modes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvironmentDefaults {
    pub production: String,
    pub local: String,
}

impl Default for EnvironmentDefaults {
    fn default() -> Self {
        Self {
            production: DEFAULT_PRODUCTION_URL.to_string(),
            local: DEFAULT_LOCAL_URL.to_string(),
        }
    }
}

/// `http://` or `https://` followed by something.
fn is_well_formed(url: &str) -> bool {
    url.strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .is_some_and(|rest| !rest.trim().is_empty())
}

/// Resolves the active API base URL from persisted state.
///
/// Misconfiguration never surfaces as an error here: an unknown mode or a
/// missing/malformed custom URL resolves to the production URL.
#[derive(Clone)]
pub struct EnvironmentResolver {
    store: Arc<dyn KeyValueStore>,
    defaults: EnvironmentDefaults,
}

impl EnvironmentResolver {
    pub fn new(store: Arc<dyn KeyValueStore>, defaults: EnvironmentDefaults) -> Self {
        Self { store, defaults }
    }

    #[must_use]
    pub fn defaults(&self) -> &EnvironmentDefaults {
        &self.defaults
    }

    /// The persisted mode, `Production` when unset or unrecognized.
    #[must_use]
    pub fn mode(&self) -> EnvironmentMode {
        match self.store.get(ENV_MODE_KEY) {
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                tracing::warn!(mode = %raw, "unrecognized environment mode, using prod");
                EnvironmentMode::Production
            }),
            None => EnvironmentMode::Production,
        }
    }

    /// The stored custom base URL, whatever the active mode.
    #[must_use]
    pub fn custom_url(&self) -> Option<String> {
        self.store.get(CUSTOM_BASE_URL_KEY)
    }

    #[must_use]
    pub fn resolve_base_url(&self) -> String {
        match self.mode() {
            EnvironmentMode::Production => self.defaults.production.clone(),
            EnvironmentMode::Local => self.defaults.local.clone(),
            EnvironmentMode::Custom => match self.custom_url() {
                Some(url) if is_well_formed(&url) => url,
                _ => {
                    tracing::warn!("custom mode without a usable base URL, using prod");
                    self.defaults.production.clone()
                }
            },
        }
    }

    pub fn set_mode(&self, mode: EnvironmentMode) -> WalletResult<()> {
        self.store.set(ENV_MODE_KEY, mode.as_str())?;
        tracing::info!(%mode, "environment mode saved");
        Ok(())
    }

    /// Validate and store a custom base URL, switching to `Custom` mode in
    /// the same store operation.
    pub fn set_custom_url(&self, url: &str) -> WalletResult<()> {
        let url = url.trim();
        if !is_well_formed(url) {
            return Err(WalletError::Validation(format!(
                "base URL must start with http:// or https://, got {url:?}"
            )));
        }
        self.store.set_many(&[
            (CUSTOM_BASE_URL_KEY, url),
            (ENV_MODE_KEY, EnvironmentMode::Custom.as_str()),
        ])?;
        tracing::info!(base_url = %url, "custom base URL saved");
        Ok(())
    }
}

impl fmt::Debug for EnvironmentResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnvironmentResolver")
            .field("mode", &self.mode())
            .field("base_url", &self.resolve_base_url())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn resolver() -> (Arc<MemoryStore>, EnvironmentResolver) {
        let store = Arc::new(MemoryStore::new());
        let resolver = EnvironmentResolver::new(store.clone(), EnvironmentDefaults::default());
        (store, resolver)
    }

    #[test]
    fn defaults_to_production() {
        let (_, resolver) = resolver();
        assert_eq!(resolver.mode(), EnvironmentMode::Production);
        assert_eq!(resolver.resolve_base_url(), DEFAULT_PRODUCTION_URL);
    }

    #[test]
    fn local_mode_uses_builtin_url() {
        let (_, resolver) = resolver();
        resolver.set_mode(EnvironmentMode::Local).unwrap();
        assert_eq!(resolver.resolve_base_url(), DEFAULT_LOCAL_URL);
    }

    #[test]
    fn unrecognized_mode_falls_back_to_production() {
        let (store, resolver) = resolver();
        store.set(ENV_MODE_KEY, "staging").unwrap();
        assert_eq!(resolver.mode(), EnvironmentMode::Production);
        assert_eq!(resolver.resolve_base_url(), DEFAULT_PRODUCTION_URL);
    }

    #[test]
    fn custom_mode_without_url_falls_back_to_production() {
        let (_, resolver) = resolver();
        resolver.set_mode(EnvironmentMode::Custom).unwrap();
        assert_eq!(resolver.resolve_base_url(), DEFAULT_PRODUCTION_URL);
    }

    #[test]
    fn custom_mode_with_malformed_stored_url_falls_back_to_production() {
        let (store, resolver) = resolver();
        store
            .set_many(&[(ENV_MODE_KEY, "custom"), (CUSTOM_BASE_URL_KEY, "ftp://x")])
            .unwrap();
        assert_eq!(resolver.resolve_base_url(), DEFAULT_PRODUCTION_URL);
    }

    #[test]
    fn set_custom_url_switches_mode_and_returns_exact_url() {
        let (store, resolver) = resolver();
        for url in [
            "http://10.0.0.2:8080",
            "https://staging.example.com/api",
            "https://example.com/",
        ] {
            resolver.set_custom_url(url).unwrap();
            assert_eq!(resolver.mode(), EnvironmentMode::Custom);
            assert_eq!(resolver.resolve_base_url(), url);
            assert_eq!(store.get(CUSTOM_BASE_URL_KEY).as_deref(), Some(url));
        }
    }

    #[test]
    fn set_custom_url_trims_input() {
        let (_, resolver) = resolver();
        resolver.set_custom_url("  https://example.com  ").unwrap();
        assert_eq!(resolver.resolve_base_url(), "https://example.com");
    }

    #[test]
    fn set_custom_url_rejects_malformed_and_keeps_previous_base() {
        let (_, resolver) = resolver();
        resolver.set_mode(EnvironmentMode::Local).unwrap();

        for url in [
            "",
            "example.com",
            "ftp://example.com",
            "https://",
            "HTTP://example.com",
            "http:/example.com",
            "ws://example.com",
        ] {
            let error = resolver.set_custom_url(url).unwrap_err();
            assert!(matches!(error, WalletError::Validation(_)), "{url}");
            assert_eq!(resolver.mode(), EnvironmentMode::Local);
            assert_eq!(resolver.resolve_base_url(), DEFAULT_LOCAL_URL);
        }
    }

    #[test]
    fn mode_round_trips_through_strings() {
        for mode in [
            EnvironmentMode::Production,
            EnvironmentMode::Local,
            EnvironmentMode::Custom,
        ] {
            assert_eq!(mode.as_str().parse::<EnvironmentMode>().unwrap(), mode);
        }
        assert!("Production".parse::<EnvironmentMode>().is_err());
    }
}
