use std::{collections::VecDeque, sync::Mutex};

use crate::{
    errors::{WalletError, WalletResult},
    transport::{Transport, TransportRequest, TransportResponse},
};

/// Result for a mocked `send` call.
/// It can either be a response to return or a transport error.
pub enum MockResult {
    Response(TransportResponse),
    Error(WalletError),
}

impl MockResult {
    /// Construct a result that yields a response with the given status and body.
    pub fn response(status: u16, body: impl Into<String>) -> Self {
        Self::Response(TransportResponse::new(status, body))
    }

    /// Construct a result that fails with a transport error.
    pub fn transport_error(message: impl Into<String>) -> Self {
        Self::Error(WalletError::Transport(message.into()))
    }
}

impl From<TransportResponse> for MockResult {
    fn from(response: TransportResponse) -> Self {
        Self::Response(response)
    }
}

impl From<WalletResult<TransportResponse>> for MockResult {
    fn from(result: WalletResult<TransportResponse>) -> Self {
        match result {
            Ok(response) => Self::Response(response),
            Err(error) => Self::Error(error),
        }
    }
}

#[derive(Default)]
struct MockTransportState {
    mocked_results: VecDeque<MockResult>,
    tracked_requests: Vec<TransportRequest>,
}

/// A mock transport for testing that tracks requests and yields predefined
/// results in order.
#[derive(Default)]
pub struct MockTransport {
    state: Mutex<MockTransportState>,
}

impl MockTransport {
    /// Construct a new mock transport instance.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueue one or more mocked results.
    pub fn enqueue_results<I>(&self, results: I) -> &Self
    where
        I: IntoIterator<Item = MockResult>,
    {
        let mut state = self.state.lock().expect("mock state poisoned");
        state.mocked_results.extend(results);
        drop(state);
        self
    }

    /// Convenience to enqueue a single mocked result.
    pub fn enqueue<R>(&self, result: R) -> &Self
    where
        R: Into<MockResult>,
    {
        self.enqueue_results(std::iter::once(result.into()))
    }

    /// Retrieve the requests sent so far.
    pub fn tracked_requests(&self) -> Vec<TransportRequest> {
        let state = self.state.lock().expect("mock state poisoned");
        state.tracked_requests.clone()
    }

    /// Number of requests that reached the transport.
    pub fn call_count(&self) -> usize {
        let state = self.state.lock().expect("mock state poisoned");
        state.tracked_requests.len()
    }

    /// Clear both tracked requests and enqueued results.
    pub fn restore(&self) {
        let mut state = self.state.lock().expect("mock state poisoned");
        state.mocked_results.clear();
        state.tracked_requests.clear();
    }
}

#[async_trait::async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: TransportRequest) -> WalletResult<TransportResponse> {
        let mut state = self.state.lock().expect("mock state poisoned");
        state.tracked_requests.push(request);

        let result = state.mocked_results.pop_front().ok_or_else(|| {
            WalletError::Transport("no mocked results available".to_string())
        })?;

        match result {
            MockResult::Response(response) => Ok(response),
            MockResult::Error(error) => Err(error),
        }
    }
}
