use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

pub const NOT_AUTHENTICATED_MESSAGE: &str = "not authenticated";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One outbound call, relative to the resolved base URL.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestSpec {
    pub path: String,
    pub method: HttpMethod,
    pub body: Option<Value>,
    /// The call is not sent at all when this is set and no token is stored.
    pub requires_auth: bool,
}

impl RequestSpec {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            method: HttpMethod::Get,
            body: None,
            requires_auth: false,
        }
    }

    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self {
            path: path.into(),
            method: HttpMethod::Post,
            body: Some(body),
            requires_auth: false,
        }
    }

    #[must_use]
    pub fn with_auth(mut self, requires_auth: bool) -> Self {
        self.requires_auth = requires_auth;
        self
    }
}

/// Response body as the client could make sense of it: parsed JSON when the
/// body was valid JSON, otherwise text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Payload {
    Json(Value),
    Text(String),
}

impl Payload {
    /// Synthetic `{ "error": message }` payload for failures that never
    /// produced a server response.
    pub fn error(message: impl Into<String>) -> Self {
        Self::Json(serde_json::json!({ "error": message.into() }))
    }

    #[must_use]
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Self::Json(value) => Some(value),
            Self::Text(_) => None,
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Json(_) => None,
            Self::Text(text) => Some(text),
        }
    }

    /// Look up a top-level field of a JSON object payload.
    #[must_use]
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.as_json().and_then(|value| value.get(key))
    }
}

/// The uniform result of every client call, whatever went wrong.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedResponse {
    pub ok: bool,
    /// Transport status code, `0` when no response was received.
    pub status_code: u16,
    pub payload: Payload,
}

impl NormalizedResponse {
    /// A failure that happened before or instead of a server response.
    pub fn local_failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            status_code: 0,
            payload: Payload::error(message),
        }
    }

    #[must_use]
    pub fn not_authenticated() -> Self {
        Self::local_failure(NOT_AUTHENTICATED_MESSAGE)
    }

    /// Build from a received status code and raw body text.
    ///
    /// The content type is not consulted: a body that parses as JSON is JSON.
    /// An empty unparseable body becomes `"(status <code>)"`.
    #[must_use]
    pub fn from_status_and_body(status_code: u16, body: String) -> Self {
        let payload = match serde_json::from_str::<Value>(&body) {
            Ok(value) => Payload::Json(value),
            Err(_) if body.is_empty() => Payload::Text(format!("(status {status_code})")),
            Err(_) => Payload::Text(body),
        };
        Self {
            ok: (200..=299).contains(&status_code),
            status_code,
            payload,
        }
    }

    /// Text for display: string payloads as-is, JSON pretty-printed.
    #[must_use]
    pub fn display_text(&self) -> String {
        match &self.payload {
            Payload::Text(text) => text.clone(),
            Payload::Json(Value::String(text)) => text.clone(),
            Payload::Json(value) => {
                serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
            }
        }
    }
}
