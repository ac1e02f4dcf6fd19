use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;
use courier::http::{Transport, TransportRequest, TransportResponse};
use courier::{Request, RequestOptions, TransportError};
use futures::stream;

// Common test constants
pub const TEST_URL: &str = "https://example.com/resource";
pub const JSON_MEDIA_TYPE: &str = "application/json";

type Responder = dyn Fn(&TransportRequest) -> Result<TransportResponse, TransportError> + Send + Sync;

/// Transport double that records every request and answers from a closure.
pub struct MockTransport {
    requests: Mutex<Vec<TransportRequest>>,
    responder: Box<Responder>,
}

impl MockTransport {
    /// Creates a mock answering with `responder`.
    pub fn new<F>(responder: F) -> Arc<Self>
    where
        F: Fn(&TransportRequest) -> Result<TransportResponse, TransportError> + Send + Sync + 'static,
    {
        Arc::new(Self {
            requests: Mutex::new(Vec::new()),
            responder: Box::new(responder),
        })
    }

    /// Creates a mock answering every request with the same status, content type and payload.
    pub fn respond(status: u16, status_text: &'static str, content_type: &'static str, payload: &'static [u8]) -> Arc<Self> {
        MockTransport::new(move |request| {
            Ok(TransportResponse::from_bytes(status, status_text, request.url.clone(), Bytes::from_static(payload))
                .with_header("Content-Type", content_type))
        })
    }

    /// Creates a mock failing every request at the network level.
    pub fn failing(message: &'static str) -> Arc<Self> {
        MockTransport::new(move |_| Err(TransportError::Other(message.to_string())))
    }

    /// Number of exchanges performed.
    pub fn calls(&self) -> usize {
        self.requests.lock().expect("Mock transport lock poisoned").len()
    }

    /// Most recent request received.
    pub fn last_request(&self) -> Option<TransportRequest> {
        self.requests
            .lock()
            .expect("Mock transport lock poisoned")
            .last()
            .cloned()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse, TransportError> {
        let response = (self.responder)(&request);
        self.requests
            .lock()
            .expect("Mock transport lock poisoned")
            .push(request);
        response
    }
}

/// Creates a response whose payload stream errors if it is ever polled.
pub fn unreadable_response(status: u16, status_text: &str) -> TransportResponse {
    let mut response = TransportResponse::from_bytes(status, status_text, TEST_URL, "");
    response.body = Box::pin(stream::once(async {
        Err(TransportError::Other("payload should not be read".to_string()))
    }));
    response
}

/// Creates a GET request for the test URL.
pub fn create_test_request() -> Request {
    Request::new(RequestOptions::new().url(TEST_URL)).expect("Failed to create test request")
}

/// Creates a GET request for the test URL using `transport`.
pub fn create_test_request_with(transport: Arc<MockTransport>) -> Request {
    create_test_request().with_transport(transport)
}

/// Installs a tracing subscriber honouring `RUST_LOG`, once per test binary.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
