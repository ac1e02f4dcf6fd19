//! Executing requests.
//!
//! [`Request::execute`] is the single place where a request reaches the
//! transport. Everything else in this module adapts it:
//!
//! - [`Thenable`] offers promise-style (`then`, `catch`) and callback-style
//!   (`end`) consumption.
//! - `IntoFuture` lets a request, or a reference to one, be `.await`ed.
//!
//! None of these memoize. Every call performs a fresh exchange against the
//! request's current configuration.
//!
//! # Example
//!
//! ```rust,no_run
//! use courier::{Request, Thenable};
//!
//! # async fn example() -> Result<(), courier::Error> {
//! let request = Request::get("https://httpbin.org/json", None)?;
//!
//! // Await a reference to keep the request around...
//! let response = (&request).await?;
//! println!("{}", response.status());
//!
//! // ...and send it again through the callback adapter.
//! request
//!     .end(|error, response| match (error, response) {
//!         (None, Some(response)) => println!("ok: {}", response.status()),
//!         (Some(error), _) => eprintln!("failed: {}", error),
//!         _ => {}
//!     })
//!     .await;
//! # Ok(())
//! # }
//! ```

use std::future::IntoFuture;

use async_trait::async_trait;
use futures::future::BoxFuture;
use tracing::debug;

use super::body::Body;
use super::builder::Request;
use crate::error::{Error, Result};
use crate::http::TransportRequest;
use crate::response::Response;
use crate::utils::find_header;

impl Request {
    /// Builds the transport input from the current configuration.
    ///
    /// A multipart body that was stored with `send` instead of `attach`
    /// contributes its own `Content-Type` and `Content-Length` when the
    /// request does not set them.
    pub fn to_transport_request(&self) -> TransportRequest {
        let mut headers: Vec<(String, String)> = self
            .headers
            .iter()
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect();

        if let Body::Form(form) = &self.body {
            if find_header(&self.headers, "content-type").is_none() {
                headers.extend(form.headers());
            }
            if find_header(&self.headers, "content-length").is_none() {
                headers.push(("content-length".to_string(), form.length().to_string()));
            }
        }

        TransportRequest {
            method: self.method.as_str().to_string(),
            url: self.url.to_string(),
            headers,
            body: self
                .body
                .to_bytes(find_header(&self.headers, "content-type")),
            follow: self.redirect_count,
            agent: self.agent.clone(),
        }
    }

    /// Performs the exchange and wraps the result.
    ///
    /// Fails with [`Error::Transport`] when the transport cannot complete the
    /// exchange and with [`Error::HttpStatus`] when the response status is
    /// outside the success range.
    pub async fn execute(&self) -> Result<Response> {
        let request = self.to_transport_request();
        debug!(
            method = %self.method,
            url = %self.url,
            follow = self.redirect_count,
            "Dispatching request"
        );

        let raw = self.transport.send(request).await?;
        let response = Response::from_transport(raw, self.no_result_data).await?;

        if !response.ok() {
            debug!(status = response.status(), url = %self.url, "Request failed with HTTP status");
            return Err(Error::HttpStatus {
                status: response.status(),
                status_text: response.status_text().to_string(),
                response: Box::new(response),
            });
        }

        Ok(response)
    }
}

/// Deferred computation producing a [`Response`].
///
/// Implementors provide [`settle`](Thenable::settle); the adapters are
/// derived from it. Each adapter call settles anew.
#[async_trait]
pub trait Thenable: Sync {
    /// Runs the computation once.
    async fn settle(&self) -> Result<Response>;

    /// Runs the computation and continues with `on_fulfilled` or `on_rejected`.
    async fn then<T, F, R>(&self, on_fulfilled: F, on_rejected: R) -> T
    where
        T: Send,
        F: FnOnce(Response) -> T + Send,
        R: FnOnce(Error) -> T + Send,
    {
        match self.settle().await {
            Ok(response) => on_fulfilled(response),
            Err(error) => on_rejected(error),
        }
    }

    /// Runs the computation, passing successes through and handing failures to `on_rejected`.
    async fn catch<R>(&self, on_rejected: R) -> Result<Response>
    where
        R: FnOnce(Error) -> Result<Response> + Send,
    {
        self.then(Ok, on_rejected).await
    }

    /// Runs the computation and reports the outcome to a node-style callback.
    ///
    /// On success the callback receives `(None, Some(response))`. On failure
    /// it receives the error and, for HTTP status failures, the response
    /// carried by the error.
    async fn end<T, C>(&self, callback: C) -> T
    where
        T: Send,
        C: FnOnce(Option<&Error>, Option<&Response>) -> T + Send,
    {
        match self.settle().await {
            Ok(response) => callback(None, Some(&response)),
            Err(error) => callback(Some(&error), error.response()),
        }
    }
}

#[async_trait]
impl Thenable for Request {
    async fn settle(&self) -> Result<Response> {
        self.execute().await
    }
}

impl<'a> IntoFuture for &'a Request {
    type Output = Result<Response>;
    type IntoFuture = BoxFuture<'a, Result<Response>>;

    fn into_future(self) -> Self::IntoFuture {
        Box::pin(self.execute())
    }
}

impl IntoFuture for Request {
    type Output = Result<Response>;
    type IntoFuture = BoxFuture<'static, Result<Response>>;

    fn into_future(self) -> Self::IntoFuture {
        Box::pin(async move { self.execute().await })
    }
}
