use crate::{
    environment::{EnvironmentDefaults, EnvironmentResolver},
    opentelemetry::trace_call,
    operations::AuthRequirements,
    session::Session,
    store::{KeyValueStore, MemoryStore},
    transport::{ReqwestTransport, Transport, TransportRequest},
    NormalizedResponse, RequestSpec, WalletError, WalletResult,
};
use reqwest::header::{self, HeaderMap, HeaderValue};
use std::sync::Arc;

/// Options for [`WalletClient::new`].
/// # Default Values
/// - `environment_defaults`: production and local URLs of the wallet API
/// - `auth`: only earnings require the bearer token
/// - `transport`: [`ReqwestTransport::new`]
/// - `store`: a fresh [`MemoryStore`]
#[derive(Clone, Default)]
pub struct WalletClientOptions {
    pub environment_defaults: EnvironmentDefaults,
    pub auth: AuthRequirements,
    pub transport: Option<Arc<dyn Transport>>,
    pub store: Option<Arc<dyn KeyValueStore>>,
}

/// Environment-aware client for the wallet API.
///
/// Holds the environment resolver and session over one shared store and
/// normalizes every response into a [`NormalizedResponse`].
#[derive(Clone)]
pub struct WalletClient {
    transport: Arc<dyn Transport>,
    environment: EnvironmentResolver,
    session: Session,
    auth: AuthRequirements,
}

impl WalletClient {
    #[must_use]
    pub fn new(options: WalletClientOptions) -> Self {
        let store = options
            .store
            .unwrap_or_else(|| Arc::new(MemoryStore::new()));
        let transport = options
            .transport
            .unwrap_or_else(|| Arc::new(ReqwestTransport::new()));

        Self {
            transport,
            environment: EnvironmentResolver::new(store.clone(), options.environment_defaults),
            session: Session::new(store),
            auth: options.auth,
        }
    }

    #[must_use]
    pub fn environment(&self) -> &EnvironmentResolver {
        &self.environment
    }

    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    #[must_use]
    pub fn auth(&self) -> &AuthRequirements {
        &self.auth
    }

    /// Issue one request and normalize whatever happens into a response.
    ///
    /// Never fails: a missing token, an unsendable request and a transport
    /// error all come back as `ok == false` with status `0` and an `error`
    /// field in the payload.
    pub async fn call(&self, spec: RequestSpec) -> NormalizedResponse {
        trace_call(spec, |spec| self.call_inner(spec)).await
    }

    async fn call_inner(&self, spec: RequestSpec) -> NormalizedResponse {
        let request = match self.compose(&spec) {
            Ok(request) => request,
            Err(WalletError::NotAuthenticated) => {
                tracing::debug!(path = %spec.path, "auth required but no token stored");
                return NormalizedResponse::not_authenticated();
            }
            Err(error) => {
                tracing::warn!(%error, path = %spec.path, "failed to compose request");
                return NormalizedResponse::local_failure(error.to_string());
            }
        };

        tracing::debug!(method = %request.method, url = %request.url, "sending request");
        match self.transport.send(request).await {
            Ok(response) => {
                let normalized =
                    NormalizedResponse::from_status_and_body(response.status, response.body);
                tracing::debug!(
                    status = normalized.status_code,
                    ok = normalized.ok,
                    "received response"
                );
                normalized
            }
            Err(error) => {
                tracing::warn!(%error, path = %spec.path, "request failed");
                NormalizedResponse::local_failure(error.to_string())
            }
        }
    }

    fn compose(&self, spec: &RequestSpec) -> WalletResult<TransportRequest> {
        let token = if spec.requires_auth {
            Some(
                self.session
                    .current_token()
                    .ok_or(WalletError::NotAuthenticated)?,
            )
        } else {
            None
        };

        let mut headers = HeaderMap::new();
        headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));
        if spec.body.is_some() {
            headers.insert(
                header::CONTENT_TYPE,
                HeaderValue::from_static("application/json"),
            );
        }
        if let Some(token) = token {
            let mut value = HeaderValue::try_from(format!("Bearer {token}")).map_err(|_| {
                WalletError::Validation("stored token is not a valid header value".to_string())
            })?;
            value.set_sensitive(true);
            headers.insert(header::AUTHORIZATION, value);
        }

        let body = spec.body.as_ref().map(serde_json::to_string).transpose()?;

        Ok(TransportRequest {
            method: spec.method,
            url: format!("{}{}", self.environment.resolve_base_url(), spec.path),
            headers,
            body,
        })
    }
}

impl std::fmt::Debug for WalletClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WalletClient")
            .field("environment", &self.environment)
            .field("session", &self.session)
            .field("auth", &self.auth)
            .finish_non_exhaustive()
    }
}
