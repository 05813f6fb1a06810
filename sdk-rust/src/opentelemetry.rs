use crate::{NormalizedResponse, Payload, RequestSpec};
use opentelemetry::trace::Status;
use std::time::Instant;
use tracing::{info_span, Span};
use tracing_futures::Instrument;
use tracing_opentelemetry::OpenTelemetrySpanExt;

pub struct CallSpan {
    span: Span,
    start_time: Instant,
    status_code: Option<u16>,
    error: Option<String>,
}

impl CallSpan {
    pub fn new(spec: &RequestSpec) -> Self {
        let span = info_span!(
            "wallet_sdk.call",
            method = %spec.method,
            path = %spec.path,
        );
        span.set_attribute("http.request.method", spec.method.as_str());
        span.set_attribute("url.path", spec.path.clone());
        span.set_attribute("wallet_sdk.requires_auth", spec.requires_auth);

        Self {
            span,
            start_time: Instant::now(),
            status_code: None,
            error: None,
        }
    }

    pub async fn instrument_future<F>(&self, future: F) -> F::Output
    where
        F: std::future::Future,
    {
        future.instrument(self.span.clone()).await
    }

    pub fn on_response(&mut self, response: &NormalizedResponse) {
        if response.status_code != 0 {
            self.status_code = Some(response.status_code);
        }
        if !response.ok {
            let message = match &response.payload {
                Payload::Json(value) => value
                    .get("error")
                    .and_then(|error| error.as_str())
                    .map_or_else(|| format!("status {}", response.status_code), str::to_string),
                Payload::Text(_) => format!("status {}", response.status_code),
            };
            self.error = Some(message);
        }
    }

    fn on_end(&mut self) {
        if let Some(status_code) = self.status_code.take() {
            self.span
                .set_attribute("http.response.status_code", i64::from(status_code));
        }
        self.span.set_attribute(
            "wallet_sdk.duration_ms",
            self.start_time.elapsed().as_secs_f64() * 1000.0,
        );
        if let Some(error) = self.error.take() {
            self.span.set_status(Status::error(error));
        }
    }
}

impl Drop for CallSpan {
    fn drop(&mut self) {
        self.on_end();
    }
}

/// Run one client call inside a `wallet_sdk.call` span.
pub async fn trace_call<F, Fut>(spec: RequestSpec, f: F) -> NormalizedResponse
where
    F: FnOnce(RequestSpec) -> Fut,
    Fut: std::future::Future<Output = NormalizedResponse>,
{
    let mut span = CallSpan::new(&spec);
    let response = span.instrument_future(f(spec)).await;
    span.on_response(&response);
    response
}
