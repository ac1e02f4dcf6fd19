//! Response envelope and body decoding.
//!
//! - [`envelope`] - [`Response`], the normalized result of an exchange
//! - [`content`] - [`ContentCategory`] classification and the decoded [`ResponseBody`]
//!
//! # Example
//!
//! ```rust
//! use courier::http::TransportResponse;
//! use courier::response::{Response, ResponseBody};
//! use serde_json::json;
//!
//! # async fn example() -> Result<(), courier::TransportError> {
//! let raw = TransportResponse::from_bytes(200, "OK", "https://example.com/", r#"{"ok":true}"#)
//!     .with_header("content-type", "application/json");
//! let response = Response::from_transport(raw, false).await?;
//! assert_eq!(response.body(), Some(&ResponseBody::Json(json!({"ok": true}))));
//! # Ok(())
//! # }
//! ```

pub mod content;
pub mod envelope;

pub use content::{ContentCategory, ResponseBody};
pub use envelope::Response;
