//! Construction options for a [`Request`](super::Request).
//!
//! Options can be assembled in code with the chainable setters, or loaded
//! from JSON. The agent handle is a runtime value and is never deserialized.
//!
//! ```rust
//! use courier::RequestOptions;
//!
//! let options = RequestOptions::from_json(
//!     r#"{ "url": "https://example.com/", "method": "post", "redirects": 3, "noResultData": true }"#,
//! )?;
//! assert_eq!(options.method.as_deref(), Some("post"));
//! assert!(options.no_result_data);
//! # Ok::<(), courier::Error>(())
//! ```

use std::collections::HashMap;

use serde::Deserialize;

use super::body::Body;
use crate::error::Result;
use crate::http::Agent;

/// Options recognized when building a request.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RequestOptions {
    /// Absolute URL. Required.
    pub url: Option<String>,
    /// Method token, case-insensitive. Defaults to `GET`.
    pub method: Option<String>,
    /// Initial headers.
    pub headers: Option<HashMap<String, String>>,
    /// Initial body, stored as given.
    pub body: Option<Body>,
    /// Redirect cap. Defaults to 20.
    pub redirects: Option<u32>,
    /// Connection agent handed to the transport.
    #[serde(skip)]
    pub agent: Option<Agent>,
    /// Skip reading the response payload.
    pub no_result_data: bool,
}

impl RequestOptions {
    /// Creates empty options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses options from a JSON document.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Sets the URL.
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Sets the method token.
    pub fn method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }

    /// Adds an initial header.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers
            .get_or_insert_with(HashMap::new)
            .insert(name.into(), value.into());
        self
    }

    /// Sets the initial body.
    pub fn body(mut self, body: impl Into<Body>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Sets the redirect cap.
    pub fn redirects(mut self, redirects: u32) -> Self {
        self.redirects = Some(redirects);
        self
    }

    /// Sets the agent handle.
    pub fn agent(mut self, agent: Agent) -> Self {
        self.agent = Some(agent);
        self
    }

    /// Skips reading the response payload when set.
    pub fn no_result_data(mut self, no_result_data: bool) -> Self {
        self.no_result_data = no_result_data;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults() {
        let options = RequestOptions::default();
        assert!(options.url.is_none());
        assert!(options.method.is_none());
        assert!(options.headers.is_none());
        assert!(options.body.is_none());
        assert!(options.redirects.is_none());
        assert!(options.agent.is_none());
        assert!(!options.no_result_data);
    }

    #[test]
    fn test_chainable_setters() {
        let options = RequestOptions::new()
            .url("https://example.com/")
            .method("put")
            .header("x-a", "1")
            .header("x-b", "2")
            .redirects(2)
            .no_result_data(true);
        assert_eq!(options.url.as_deref(), Some("https://example.com/"));
        assert_eq!(options.headers.as_ref().map(HashMap::len), Some(2));
        assert_eq!(options.redirects, Some(2));
        assert!(options.no_result_data);
    }

    #[test]
    fn test_from_json() {
        let options = RequestOptions::from_json(
            r#"{"url":"https://example.com/","headers":{"x-a":"1"},"body":{"a":1}}"#,
        )
        .expect("valid options");
        assert_eq!(
            options.headers.and_then(|h| h.get("x-a").cloned()).as_deref(),
            Some("1")
        );
        assert!(matches!(options.body, Some(Body::Json(ref v)) if *v == json!({"a": 1})));
    }

    #[test]
    fn test_from_json_rejects_bad_types() {
        let result = RequestOptions::from_json(r#"{"redirects":"many"}"#);
        assert!(matches!(result, Err(crate::Error::Json { .. })));
    }
}
