//! The transport contract.
//!
//! A [`Transport`] performs the network exchange for a request. Courier only
//! prepares the method, URL, headers, body, redirect cap and agent handle,
//! then hands them over; connection management, TLS and redirect following
//! all happen behind this trait.

use std::any::Any;
use std::fmt;
use std::pin::Pin;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::{self, Stream};

use crate::error::TransportError;

/// Response payload as a stream of chunks.
pub type BodyStream = Pin<Box<dyn Stream<Item = Result<Bytes, TransportError>> + Send>>;

/// Opaque connection-agent handle.
///
/// Courier never looks inside the handle; it is passed to the transport as
/// is. Transports downcast it to the types they understand, e.g.
/// [`ReqwestTransport`](super::ReqwestTransport) accepts an
/// [`HttpClientConfig`](super::HttpClientConfig) or a prebuilt
/// `reqwest_middleware::ClientWithMiddleware`.
#[derive(Clone)]
pub struct Agent(Arc<dyn Any + Send + Sync>);

impl Agent {
    /// Wraps any value as an agent handle.
    pub fn new<T: Any + Send + Sync>(inner: T) -> Self {
        Agent(Arc::new(inner))
    }

    /// Returns the wrapped value if it is a `T`.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.downcast_ref::<T>()
    }

    /// Returns true if both handles point to the same value.
    pub fn ptr_eq(&self, other: &Agent) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Agent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Agent(..)")
    }
}

/// Everything a transport needs to perform one exchange.
#[derive(Debug, Clone)]
pub struct TransportRequest {
    /// Uppercase method token.
    pub method: String,
    /// Absolute URL, query string included.
    pub url: String,
    /// Request headers.
    pub headers: Vec<(String, String)>,
    /// Encoded request body.
    pub body: Option<Bytes>,
    /// Maximum number of redirects to follow.
    pub follow: u32,
    /// Agent handle, if one was set.
    pub agent: Option<Agent>,
}

/// Raw outcome of an exchange.
pub struct TransportResponse {
    /// Status code.
    pub status: u16,
    /// Reason phrase.
    pub status_text: String,
    /// Response headers, possibly with repeated names.
    pub headers: Vec<(String, String)>,
    /// Final URL after redirects.
    pub url: String,
    /// Whether at least one redirect was followed.
    pub redirected: bool,
    /// Whether the status is in the success range.
    pub ok: bool,
    /// Response payload.
    pub body: BodyStream,
}

impl TransportResponse {
    /// Creates a response whose payload is already in memory.
    ///
    /// `ok` is derived from the status (2xx) and `redirected` is false.
    pub fn from_bytes(
        status: u16,
        status_text: impl Into<String>,
        url: impl Into<String>,
        body: impl Into<Bytes>,
    ) -> Self {
        let body: Bytes = body.into();
        Self {
            status,
            status_text: status_text.into(),
            headers: Vec::new(),
            url: url.into(),
            redirected: false,
            ok: (200..300).contains(&status),
            body: Box::pin(stream::once(async move { Ok(body) })),
        }
    }

    /// Adds a response header.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

impl fmt::Debug for TransportResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransportResponse")
            .field("status", &self.status)
            .field("status_text", &self.status_text)
            .field("headers", &self.headers)
            .field("url", &self.url)
            .field("redirected", &self.redirected)
            .field("ok", &self.ok)
            .finish()
    }
}

/// Performs HTTP exchanges on behalf of a [`Request`](crate::Request).
#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends the request and returns the raw response.
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse, TransportError>;
}
