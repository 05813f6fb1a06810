use crate::{NormalizedResponse, Payload};
use serde_json::Value;

pub const GENERIC_ERROR_MESSAGE: &str = "request failed";

fn non_empty_str(value: Option<&Value>) -> Option<&str> {
    value
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|text| !text.is_empty())
}

/// Human-readable message for a failed response.
///
/// Looks at `detail.detail`, then `detail`, then `error`. A structured
/// `detail` (a list of validation errors, say) is rendered as compact JSON.
/// Text payloads are their own message.
#[must_use]
pub fn error_message(response: &NormalizedResponse) -> String {
    match &response.payload {
        Payload::Json(value) => error_message_from_json(value),
        Payload::Text(text) if !text.trim().is_empty() => text.clone(),
        Payload::Text(_) => GENERIC_ERROR_MESSAGE.to_string(),
    }
}

#[must_use]
pub fn error_message_from_json(payload: &Value) -> String {
    let Some(object) = payload.as_object() else {
        return non_empty_str(Some(payload)).map_or_else(
            || GENERIC_ERROR_MESSAGE.to_string(),
            str::to_string,
        );
    };

    let detail = object.get("detail");
    if let Some(message) = non_empty_str(detail.and_then(|detail| detail.get("detail"))) {
        return message.to_string();
    }
    if let Some(message) = non_empty_str(detail) {
        return message.to_string();
    }
    if let Some(detail) = detail.filter(|detail| detail.is_object() || detail.is_array()) {
        return detail.to_string();
    }
    if let Some(message) = non_empty_str(object.get("error")) {
        return message.to_string();
    }
    GENERIC_ERROR_MESSAGE.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn nested_detail_wins() {
        let response = NormalizedResponse::from_status_and_body(
            401,
            r#"{"detail": {"detail": "expired"}, "error": "other"}"#.to_string(),
        );
        assert_eq!(error_message(&response), "expired");
    }

    #[test]
    fn detail_string_before_error() {
        assert_eq!(
            error_message_from_json(&json!({ "detail": "bad mobile", "error": "x" })),
            "bad mobile"
        );
    }

    #[test]
    fn structured_detail_is_rendered_as_json() {
        let payload = json!({ "detail": [{ "loc": ["body", "mobile"], "msg": "field required" }] });
        assert_eq!(
            error_message_from_json(&payload),
            r#"[{"loc":["body","mobile"],"msg":"field required"}]"#
        );
    }

    #[test]
    fn falls_back_to_error_then_generic() {
        assert_eq!(
            error_message_from_json(&json!({ "error": "insufficient funds" })),
            "insufficient funds"
        );
        assert_eq!(
            error_message_from_json(&json!({ "detail": null, "error": "" })),
            GENERIC_ERROR_MESSAGE
        );
        assert_eq!(error_message_from_json(&json!([1, 2])), GENERIC_ERROR_MESSAGE);
    }

    #[test]
    fn local_failures_surface_their_error() {
        let response = NormalizedResponse::local_failure("connection refused");
        assert_eq!(error_message(&response), "connection refused");
    }

    #[test]
    fn text_payloads_are_their_own_message() {
        let response =
            NormalizedResponse::from_status_and_body(502, "Bad Gateway".to_string());
        assert_eq!(error_message(&response), "Bad Gateway");

        let response = NormalizedResponse::from_status_and_body(500, String::new());
        assert_eq!(error_message(&response), "(status 500)");
    }
}
