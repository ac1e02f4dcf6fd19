//! Request building and execution.
//!
//! # Overview
//!
//! - [`builder`] - [`Request`], the chainable configuration object
//! - [`options`] - [`RequestOptions`], the options a request is constructed from
//! - [`body`] - [`Body`], the request payload representations
//! - [`method`] - [`Method`] tokens and the generated per-method constructors
//! - [`execute`] - Execution, the [`Thenable`] adapters and `IntoFuture`
//!
//! # Example
//!
//! ```rust,no_run
//! use courier::{Request, RequestOptions};
//!
//! # async fn example() -> Result<(), courier::Error> {
//! let response = Request::get("https://httpbin.org/get", RequestOptions::new().redirects(3))?
//!     .query_all([("a", 1), ("b", 2)])
//!     .set("accept", "application/json")?
//!     .await?;
//!
//! if let Some(body) = response.body() {
//!     println!("{:?}", body);
//! }
//! # Ok(())
//! # }
//! ```

pub mod body;
pub mod builder;
pub mod execute;
pub mod method;
pub mod options;

pub use body::Body;
pub use builder::{Request, DEFAULT_REDIRECTS};
pub use execute::Thenable;
pub use method::{Method, Shortcut, ShortcutFn, SHORTCUTS};
pub use options::RequestOptions;
