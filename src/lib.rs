//! Courier is a fluent HTTP request builder.
//!
//! A [`Request`] is configured through chained calls and only reaches the
//! network when it is executed. The result is a [`Response`] envelope whose
//! body is decoded according to its content type, on first access.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use courier::{Request, Error};
//! use serde_json::json;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Error> {
//! let response = Request::post("https://httpbin.org/post", None)?
//!     .query("source", "docs")?
//!     .set("x-request-id", "42")?
//!     .send(json!({"hello": "world"}))
//!     .await?;
//!
//! println!("{} {}", response.status(), response.text().unwrap_or_default());
//! # Ok(())
//! # }
//! ```
//!
//! # Module Organization
//!
//! - [`request`] - The request builder, its options, per-method constructors and execution adapters
//! - [`response`] - The response envelope and content negotiation
//! - [`form`] - In-memory multipart form bodies
//! - [`http`] - The transport contract and the default `reqwest` transport
//! - [`error`] - Centralized error handling with the `Error` enum
//! - [`utils`] - Shared header helpers

pub mod error;
pub mod form;
pub mod http;
pub mod request;
pub mod response;
pub mod utils;

pub use error::{Error, Result, TransportError};
pub use form::{FormData, Part};
pub use http::{Agent, HttpClientConfig, ReqwestTransport, Transport};
pub use request::{Body, Method, Request, RequestOptions, Thenable, SHORTCUTS};
pub use response::{ContentCategory, Response, ResponseBody};
