//! HTTP transport layer.
//!
//! Courier never speaks the wire protocol itself. A request is turned into a
//! [`TransportRequest`] and handed to a [`Transport`], which returns the raw
//! status, headers and byte stream.
//!
//! - [`transport`] - The [`Transport`] trait, its wire types and the opaque [`Agent`] handle
//! - [`client`] - [`ReqwestTransport`], the default transport, and client creation
//!
//! # Plugging in a Transport
//!
//! ```rust
//! use std::sync::Arc;
//! use async_trait::async_trait;
//! use courier::http::{Transport, TransportRequest, TransportResponse};
//! use courier::{Request, TransportError};
//!
//! struct Teapot;
//!
//! #[async_trait]
//! impl Transport for Teapot {
//!     async fn send(&self, request: TransportRequest) -> Result<TransportResponse, TransportError> {
//!         Ok(TransportResponse::from_bytes(418, "I'm a teapot", request.url, "short and stout"))
//!     }
//! }
//!
//! # async fn example() -> Result<(), courier::Error> {
//! let result = Request::get("https://example.com/", None)?
//!     .with_transport(Arc::new(Teapot))
//!     .execute()
//!     .await;
//! assert_eq!(result.unwrap_err().status(), Some(418));
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod transport;

pub use client::{create_http_client, HttpClientConfig, ReqwestTransport};
pub use transport::{Agent, BodyStream, Transport, TransportRequest, TransportResponse};
