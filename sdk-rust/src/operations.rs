use crate::{
    session::normalize_identifier, NormalizedResponse, RequestSpec, WalletClient, WalletError,
    WalletResult,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

/// Which wallet operations attach the bearer token.
///
/// Deployments of the wallet API disagree on this, so every flag is
/// configurable. By default only earnings are gated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthRequirements {
    pub balance: bool,
    pub transactions: bool,
    pub earnings: bool,
    pub deposit: bool,
    pub withdraw: bool,
    pub earn: bool,
}

impl AuthRequirements {
    /// Require the token on every wallet operation.
    #[must_use]
    pub fn all() -> Self {
        Self {
            balance: true,
            transactions: true,
            earnings: true,
            deposit: true,
            withdraw: true,
            earn: true,
        }
    }
}

impl Default for AuthRequirements {
    fn default() -> Self {
        Self {
            balance: false,
            transactions: false,
            earnings: true,
            deposit: false,
            withdraw: false,
            earn: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepositRequest {
    #[serde(rename = "mobile")]
    pub identifier: String,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WithdrawRequest {
    #[serde(rename = "mobile")]
    pub identifier: String,
    pub amount: f64,
    pub provider: String,
}

/// Reports that a piece of content was consumed for `duration` seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EarnRequest {
    #[serde(rename = "mobile")]
    pub identifier: String,
    #[serde(rename = "video_id")]
    pub content_id: String,
    pub content_type: String,
    pub duration: u64,
}

/// Normalized identifier, percent-encoded for use as one path segment.
fn path_segment(identifier: &str) -> String {
    urlencoding::encode(&normalize_identifier(identifier)).into_owned()
}

/// The `status` string of a health payload, `"ok"` when there is none.
#[must_use]
pub fn health_status(response: &NormalizedResponse) -> String {
    response
        .payload
        .field("status")
        .and_then(|status| status.as_str())
        .unwrap_or("ok")
        .to_string()
}

impl WalletClient {
    pub async fn health(&self) -> NormalizedResponse {
        self.call(RequestSpec::get("/health")).await
    }

    /// Request a token for `identifier`.
    ///
    /// The identifier is remembered for prefill; a token held for another
    /// identifier is dropped. When the server answers with a `token`, the
    /// session is logged in with it.
    pub async fn login(&self, identifier: &str) -> WalletResult<NormalizedResponse> {
        let identifier = normalize_identifier(identifier);
        if identifier.is_empty() {
            return Err(WalletError::Validation(
                "identifier must not be empty".to_string(),
            ));
        }
        self.session().set_identifier(&identifier)?;

        let response = self
            .call(RequestSpec::post("/login", json!({ "mobile": identifier })))
            .await;

        if response.ok {
            match response.payload.field("token").and_then(|t| t.as_str()) {
                Some(token) => {
                    self.session().login(&identifier, token)?;
                }
                None => tracing::debug!("login response carried no token"),
            }
        }
        Ok(response)
    }

    pub async fn balance(&self, identifier: &str) -> NormalizedResponse {
        let path = format!("/balance/{}", path_segment(identifier));
        self.call(RequestSpec::get(path).with_auth(self.auth().balance))
            .await
    }

    pub async fn transactions(&self, identifier: &str) -> NormalizedResponse {
        let path = format!("/transactions/{}", path_segment(identifier));
        self.call(RequestSpec::get(path).with_auth(self.auth().transactions))
            .await
    }

    pub async fn earnings(&self, identifier: &str) -> NormalizedResponse {
        let path = format!("/earnings/{}", path_segment(identifier));
        self.call(RequestSpec::get(path).with_auth(self.auth().earnings))
            .await
    }

    pub async fn deposit(&self, request: &DepositRequest) -> NormalizedResponse {
        let request = DepositRequest {
            identifier: normalize_identifier(&request.identifier),
            ..request.clone()
        };
        self.post_json("/deposit", &request, self.auth().deposit)
            .await
    }

    pub async fn withdraw(&self, request: &WithdrawRequest) -> NormalizedResponse {
        let request = WithdrawRequest {
            identifier: normalize_identifier(&request.identifier),
            ..request.clone()
        };
        self.post_json("/withdraw", &request, self.auth().withdraw)
            .await
    }

    pub async fn earn(&self, request: &EarnRequest) -> NormalizedResponse {
        let request = EarnRequest {
            identifier: normalize_identifier(&request.identifier),
            ..request.clone()
        };
        self.post_json("/earn", &request, self.auth().earn).await
    }

    async fn post_json<T: Serialize>(
        &self,
        path: &str,
        body: &T,
        requires_auth: bool,
    ) -> NormalizedResponse {
        match serde_json::to_value(body) {
            Ok(body) => {
                self.call(RequestSpec::post(path, body).with_auth(requires_auth))
                    .await
            }
            Err(error) => NormalizedResponse::local_failure(WalletError::from(error).to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Payload;

    #[test]
    fn health_status_prefers_payload_status() {
        let up = NormalizedResponse::from_status_and_body(200, r#"{"status":"up"}"#.into());
        assert_eq!(health_status(&up), "up");

        let bare = NormalizedResponse::from_status_and_body(200, "OK".into());
        assert_eq!(bare.payload, Payload::Text("OK".into()));
        assert_eq!(health_status(&bare), "ok");
    }

    #[test]
    fn request_bodies_use_wire_field_names() {
        let earn = EarnRequest {
            identifier: "9999999999".into(),
            content_id: "vid-1".into(),
            content_type: "video".into(),
            duration: 30,
        };
        assert_eq!(
            serde_json::to_value(&earn).unwrap(),
            json!({
                "mobile": "9999999999",
                "video_id": "vid-1",
                "content_type": "video",
                "duration": 30
            })
        );

        let withdraw = WithdrawRequest {
            identifier: "9999999999".into(),
            amount: 12.5,
            provider: "upi".into(),
        };
        assert_eq!(
            serde_json::to_value(&withdraw).unwrap(),
            json!({ "mobile": "9999999999", "amount": 12.5, "provider": "upi" })
        );
    }

    #[test]
    fn path_segment_escapes_reserved_characters() {
        assert_eq!(path_segment(" 999-999 9999 "), "9999999999");
        assert_eq!(path_segment("1/x?y#z"), "1%2Fx%3Fy%23z");
        assert_eq!(path_segment("+919999999999"), "%2B919999999999");
    }

    #[test]
    fn default_auth_only_gates_earnings() {
        let auth = AuthRequirements::default();
        assert!(auth.earnings);
        assert!(!auth.balance && !auth.transactions && !auth.deposit);
        assert!(!auth.withdraw && !auth.earn);
        assert!(AuthRequirements::all().deposit);
    }
}
