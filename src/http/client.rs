//! The default transport, built on `reqwest` and `reqwest-middleware`.
//!
//! # Features
//!
//! - **Redirect cap**: every request carries its own redirect limit, applied
//!   through the client's redirect policy
//! - **Tracing**: request/response spans through `reqwest-tracing`
//! - **Opt-in retries**: exponential backoff when an agent asks for it
//! - **Proxy Support**: optional HTTP/HTTPS proxy configuration
//! - **Custom Headers**: default headers applied to all requests
//!
//! # Examples
//!
//! ## Client with Custom Configuration
//!
//! ```rust
//! use courier::http::{create_http_client, HttpClientConfig};
//! use reqwest::header::{HeaderMap, USER_AGENT};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut headers = HeaderMap::new();
//! headers.insert(USER_AGENT, "MyApp/1.0".parse()?);
//!
//! let config = HttpClientConfig {
//!     retries: 2,
//!     proxy: None,
//!     headers: Some(headers),
//! };
//!
//! let client = create_http_client(config, 5)?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Using a Configuration as an Agent
//!
//! ```rust
//! use courier::http::{Agent, HttpClientConfig};
//! use courier::Request;
//!
//! # fn example() -> Result<(), courier::Error> {
//! let agent = Agent::new(HttpClientConfig { retries: 3, ..HttpClientConfig::default() });
//! let request = Request::get("https://example.com/", None)?.agent(agent);
//! # Ok(())
//! # }
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::Mutex;

use async_trait::async_trait;
use futures::StreamExt;
use reqwest::{
    header::{HeaderMap, HeaderName, HeaderValue},
    redirect, Method, Proxy, Url,
};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{policies::ExponentialBackoff, RetryTransientMiddleware};
use reqwest_tracing::TracingMiddleware;
use tracing::debug;

use super::transport::{Transport, TransportRequest, TransportResponse};
use crate::error::TransportError;

/// Configuration for HTTP client setup.
#[derive(Debug, Clone, Default)]
pub struct HttpClientConfig {
    /// Number of retries for transient failures. Zero disables the retry middleware.
    pub retries: u32,
    /// Optional proxy configuration.
    pub proxy: Option<Proxy>,
    /// Default headers to include with all requests.
    pub headers: Option<HeaderMap>,
}

/// Creates an HTTP client that follows at most `max_redirects` redirects.
///
/// This function sets up a reqwest client with:
/// - Tracing middleware for request/response logging
/// - Retry middleware with exponential backoff, when `retries` is not zero
/// - Optional proxy support
/// - Optional default headers
pub fn create_http_client(
    config: HttpClientConfig,
    max_redirects: u32,
) -> Result<ClientWithMiddleware, reqwest::Error> {
    let mut inner_client_builder =
        reqwest::Client::builder().redirect(redirect::Policy::limited(max_redirects as usize));

    if let Some(proxy) = config.proxy {
        inner_client_builder = inner_client_builder.proxy(proxy);
    }

    if let Some(headers) = config.headers {
        inner_client_builder = inner_client_builder.default_headers(headers);
    }

    let inner_client = inner_client_builder.build()?;

    let mut builder = ClientBuilder::new(inner_client)
        // Trace HTTP requests. See the tracing crate to make use of these traces.
        .with(TracingMiddleware::default());

    if config.retries > 0 {
        let retry_policy = ExponentialBackoff::builder().build_with_max_retries(config.retries);
        builder = builder.with(RetryTransientMiddleware::new_with_policy(retry_policy));
    }

    Ok(builder.build())
}

/// [`Transport`] backed by `reqwest`.
///
/// Clients are built lazily, one per redirect cap, and reused across
/// requests. Requests that do not set a transport share one process-wide
/// instance, so they also share its clients and connection pools. An [`Agent`](super::Agent) wrapping a `ClientWithMiddleware`
/// is used as is (its own redirect policy wins); an agent wrapping an
/// [`HttpClientConfig`] gets a fresh client built from that configuration.
#[derive(Default)]
pub struct ReqwestTransport {
    config: HttpClientConfig,
    clients: Mutex<HashMap<u32, ClientWithMiddleware>>,
}

impl fmt::Debug for ReqwestTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReqwestTransport")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl ReqwestTransport {
    /// Creates a transport whose default clients use `config`.
    pub fn new(config: HttpClientConfig) -> Self {
        Self {
            config,
            clients: Mutex::new(HashMap::new()),
        }
    }

    fn client_for(&self, request: &TransportRequest) -> Result<ClientWithMiddleware, TransportError> {
        if let Some(agent) = &request.agent {
            if let Some(client) = agent.downcast_ref::<ClientWithMiddleware>() {
                return Ok(client.clone());
            }
            if let Some(config) = agent.downcast_ref::<HttpClientConfig>() {
                return Ok(create_http_client(config.clone(), request.follow)?);
            }
            debug!("Unrecognized agent handle, falling back to the default client");
        }

        let mut clients = self
            .clients
            .lock()
            .map_err(|_| TransportError::Other("HTTP client cache is poisoned".to_string()))?;
        if let Some(client) = clients.get(&request.follow) {
            return Ok(client.clone());
        }
        let client = create_http_client(self.config.clone(), request.follow)?;
        clients.insert(request.follow, client.clone());
        Ok(client)
    }
}

fn header_map(headers: &[(String, String)]) -> Result<HeaderMap, TransportError> {
    let mut map = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| TransportError::Other(format!("Invalid header name \"{}\": {}", name, e)))?;
        let value = HeaderValue::from_str(value)
            .map_err(|e| TransportError::Other(format!("Invalid header value: {}", e)))?;
        map.insert(name, value);
    }
    Ok(map)
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse, TransportError> {
        let client = self.client_for(&request)?;
        let method = Method::from_bytes(request.method.as_bytes())
            .map_err(|e| TransportError::Other(format!("Invalid method: {}", e)))?;
        let requested_url = Url::parse(&request.url)
            .map_err(|e| TransportError::Other(format!("Invalid URL: {}", e)))?;

        let mut builder = client
            .request(method, requested_url.clone())
            .headers(header_map(&request.headers)?);
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();

        Ok(TransportResponse {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
            headers,
            url: response.url().to_string(),
            redirected: response.url() != &requested_url,
            ok: status.is_success(),
            body: Box::pin(
                response
                    .bytes_stream()
                    .map(|chunk| chunk.map_err(TransportError::from)),
            ),
        })
    }
}
