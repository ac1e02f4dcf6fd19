//! The request builder.
//!
//! A [`Request`] accumulates configuration through chainable calls and does
//! not touch the network until it is executed. Mutators that can receive
//! malformed input return [`Result`] so each step of a chain is validated
//! where it happens.
//!
//! # Examples
//!
//! ## Building a Request
//!
//! ```rust
//! use courier::Request;
//! use serde_json::json;
//!
//! # fn example() -> Result<(), courier::Error> {
//! let request = Request::post("https://example.com/items", None)?
//!     .query("page", 2)?
//!     .set("authorization", "Bearer token")?
//!     .send(json!({"name": "widget"}))
//!     .redirects(5)?;
//!
//! assert_eq!(request.url().as_str(), "https://example.com/items?page=2");
//! assert_eq!(request.header("content-type"), Some("application/json"));
//! # Ok(())
//! # }
//! ```
//!
//! ## Uploading a Form
//!
//! ```rust
//! use courier::{form::Part, Request};
//!
//! # fn example() -> Result<(), courier::Error> {
//! let request = Request::put("https://example.com/upload", None)?
//!     .attach("file", Part::bytes(vec![0u8; 16]).file_name("blob.bin"))?
//!     .attach_all([("comment", "first upload")])?;
//!
//! assert!(request.body().as_form().is_some());
//! # Ok(())
//! # }
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, LazyLock};

use reqwest::Url;
use serde::Serialize;

use super::body::Body;
use super::method::Method;
use super::options::RequestOptions;
use crate::error::{Error, Result};
use crate::form::{FormData, Part};
use crate::http::{Agent, ReqwestTransport, Transport};
use crate::utils::headers::validate_header;
use crate::utils::{find_header, is_json_media_type};

/// Transport shared by every request that does not set its own.
static DEFAULT_TRANSPORT: LazyLock<Arc<ReqwestTransport>> =
    LazyLock::new(|| Arc::new(ReqwestTransport::default()));

/// Redirect cap used when none is configured.
pub const DEFAULT_REDIRECTS: u32 = 20;

const JSON_MEDIA_TYPE: &str = "application/json";

/// A lazily executed HTTP request.
///
/// Executing a request (see [`Request::execute`], [`Thenable`](super::Thenable)
/// and the `IntoFuture` impls) performs one network exchange per call. The
/// builder is not consumed by `&`-based execution, so executing the same
/// request twice sends it twice.
#[derive(Clone)]
pub struct Request {
    pub(super) url: Url,
    pub(super) method: Method,
    pub(super) headers: HashMap<String, String>,
    pub(super) body: Body,
    pub(super) redirect_count: u32,
    pub(super) agent: Option<Agent>,
    pub(super) no_result_data: bool,
    pub(super) transport: Arc<dyn Transport>,
}

impl fmt::Debug for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Request")
            .field("url", &self.url.as_str())
            .field("method", &self.method)
            .field("headers", &self.headers)
            .field("body", &self.body)
            .field("redirect_count", &self.redirect_count)
            .field("agent", &self.agent.is_some())
            .field("no_result_data", &self.no_result_data)
            .finish()
    }
}

impl Request {
    /// Creates a request from options.
    ///
    /// Fails if the URL is missing or not absolute, if the method is not a
    /// known token, or if an initial header is malformed.
    pub fn new(options: RequestOptions) -> Result<Self> {
        let RequestOptions {
            url,
            method,
            headers,
            body,
            redirects,
            agent,
            no_result_data,
        } = options;

        let url = url
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| Error::validation("A URL is required to build a request."))?;
        let url = Url::parse(&url).map_err(|e| {
            Error::validation(format!("The url \"{}\" cannot be parsed: {}", url, e))
        })?;

        let method = match method {
            Some(token) => token.parse()?,
            None => Method::default(),
        };

        let headers = headers.unwrap_or_default();
        for (name, value) in &headers {
            validate_header(name, value)?;
        }

        let transport: Arc<dyn Transport> = DEFAULT_TRANSPORT.clone();

        Ok(Self {
            url,
            method,
            headers,
            body: body.unwrap_or_default(),
            redirect_count: redirects.unwrap_or(DEFAULT_REDIRECTS),
            agent,
            no_result_data,
            transport,
        })
    }

    /// Creates a request with `method` and `url` pre-filled.
    ///
    /// Keys already present in `options` win over the pre-filled values.
    pub fn with_method(
        method: Method,
        url: impl Into<String>,
        options: impl Into<Option<RequestOptions>>,
    ) -> Result<Self> {
        let mut options = options.into().unwrap_or_default();
        options.url.get_or_insert_with(|| url.into());
        options
            .method
            .get_or_insert_with(|| method.as_str().to_string());
        Request::new(options)
    }

    /// Replaces the transport performing the exchange.
    pub fn with_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = transport;
        self
    }

    /// Target URL, query string included.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Method token.
    pub fn method(&self) -> Method {
        self.method
    }

    /// Headers, keyed as supplied.
    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// Looks up a header, ignoring case.
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }

    /// Current body.
    pub fn body(&self) -> &Body {
        &self.body
    }

    /// Redirect cap.
    pub fn redirect_count(&self) -> u32 {
        self.redirect_count
    }

    /// Agent handle, if set.
    pub fn agent_handle(&self) -> Option<&Agent> {
        self.agent.as_ref()
    }

    /// Whether the response payload will be skipped.
    pub fn is_no_result_data(&self) -> bool {
        self.no_result_data
    }

    /// Appends one query parameter.
    ///
    /// Repeated names add values instead of replacing them. Fails if the
    /// name or the value is empty.
    pub fn query(mut self, name: impl AsRef<str>, value: impl ToString) -> Result<Self> {
        let name = name.as_ref();
        let value = value.to_string();
        if name.is_empty() || value.is_empty() {
            return Err(Error::validation(
                "The query argument must be a mapping or a non-empty name and value.",
            ));
        }
        self.url.query_pairs_mut().append_pair(name, &value);
        Ok(self)
    }

    /// Appends one query parameter per entry, in iteration order.
    pub fn query_all<I, K, V>(mut self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: ToString,
    {
        let pairs: Vec<(K, String)> = pairs
            .into_iter()
            .map(|(name, value)| (name, value.to_string()))
            .collect();
        if !pairs.is_empty() {
            let mut serializer = self.url.query_pairs_mut();
            for (name, value) in &pairs {
                serializer.append_pair(name.as_ref(), value);
            }
        }
        self
    }

    /// Sets one header, replacing any value under the same name.
    ///
    /// Fails if the name or the value is empty or not valid in an HTTP header.
    pub fn set(mut self, name: impl Into<String>, value: impl ToString) -> Result<Self> {
        let name = name.into();
        let value = value.to_string();
        if name.is_empty() || value.is_empty() {
            return Err(Error::validation(
                "The header argument must be a mapping or a non-empty name and value.",
            ));
        }
        validate_header(&name, &value)?;
        self.insert_header(name, value);
        Ok(self)
    }

    /// Sets one header per entry, replacing existing values.
    ///
    /// Each entry is validated like a single [`set`](Request::set).
    pub fn set_all<I, K, V>(mut self, headers: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: ToString,
    {
        for (name, value) in headers {
            let name = name.into();
            let value = value.to_string();
            if name.is_empty() || value.is_empty() {
                return Err(Error::validation(format!(
                    "The header \"{}\" needs a non-empty name and value.",
                    name
                )));
            }
            validate_header(&name, &value)?;
            self.insert_header(name, value);
        }
        Ok(self)
    }

    /// Sets the body, negotiating its encoding with the `Content-Type` header.
    ///
    /// Objects and arrays are serialized to JSON when the content type is
    /// JSON, or when no content type is set (in which case it becomes
    /// `application/json`). Under any other content type they are kept as
    /// values and encoded at dispatch time. Everything else is stored as is.
    pub fn send(self, payload: impl Into<Body>) -> Self {
        self.store_body(payload.into(), false)
    }

    /// Sets the body without any content negotiation.
    pub fn send_raw(self, payload: impl Into<Body>) -> Self {
        self.store_body(payload.into(), true)
    }

    /// Serializes `payload` to a JSON value, then behaves like [`send`](Request::send).
    pub fn send_json<T: Serialize + ?Sized>(self, payload: &T) -> Result<Self> {
        let value = serde_json::to_value(payload)?;
        Ok(self.send(value))
    }

    /// Attaches a multipart field.
    ///
    /// The first attachment replaces any other body with an empty form.
    /// `Content-Type` and `Content-Length` are refreshed from the form after
    /// every call.
    pub fn attach(mut self, name: impl Into<String>, value: impl Into<Part>) -> Result<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(Error::validation("The attached field must have a name."));
        }
        let mut form = self.take_form();
        form.append(name, value);
        self.body = Body::Form(form);
        self.refresh_form_headers();
        Ok(self)
    }

    /// Attaches one multipart field per entry.
    pub fn attach_all<I, K, V>(mut self, fields: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Part>,
    {
        // An empty mapping still promotes the body to a form.
        let form = self.take_form();
        self.body = Body::Form(form);
        self.refresh_form_headers();
        for (name, value) in fields {
            self = self.attach(name, value)?;
        }
        Ok(self)
    }

    /// Sets the redirect cap.
    ///
    /// Fails if `amount` does not fit a non-negative 32-bit count.
    pub fn redirects<N>(mut self, amount: N) -> Result<Self>
    where
        N: TryInto<u32>,
        N::Error: fmt::Display,
    {
        self.redirect_count = amount
            .try_into()
            .map_err(|e| Error::validation(format!("Amount argument must be a number: {}", e)))?;
        Ok(self)
    }

    /// Sets the connection agent passed to the transport.
    pub fn agent(mut self, agent: Agent) -> Self {
        self.agent = Some(agent);
        self
    }

    /// Skips reading the response payload when set.
    pub fn no_result_data(mut self, no_result_data: bool) -> Self {
        self.no_result_data = no_result_data;
        self
    }

    fn store_body(mut self, body: Body, raw: bool) -> Self {
        let negotiate = !raw && body.is_structured();
        self.body = match body {
            Body::Json(value) if negotiate => match self.header("content-type") {
                Some(content_type) if is_json_media_type(content_type) => {
                    Body::Text(value.to_string())
                }
                Some(_) => Body::Json(value),
                None => {
                    self.insert_header("content-type".to_string(), JSON_MEDIA_TYPE.to_string());
                    Body::Text(value.to_string())
                }
            },
            other => other,
        };
        self
    }

    /// Stores a header, dropping any entry whose name differs only in case.
    fn insert_header(&mut self, name: String, value: String) {
        self.headers.retain(|key, _| !key.eq_ignore_ascii_case(&name));
        self.headers.insert(name, value);
    }

    /// Takes the current form out of the body, or a new one if the body is not a form.
    fn take_form(&mut self) -> FormData {
        match std::mem::take(&mut self.body) {
            Body::Form(form) => form,
            _ => FormData::new(),
        }
    }

    fn refresh_form_headers(&mut self) {
        let Body::Form(form) = &self.body else {
            return;
        };
        let mut headers = form.headers();
        headers.push(("content-length".to_string(), form.length().to_string()));
        for (name, value) in headers {
            self.insert_header(name, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request() -> Request {
        Request::new(RequestOptions::new().url("https://example.com/path"))
            .expect("valid request")
    }

    #[test]
    fn test_defaults() {
        let request = request();
        assert_eq!(request.method(), Method::Get);
        assert!(request.headers().is_empty());
        assert!(request.body().is_empty());
        assert_eq!(request.redirect_count(), DEFAULT_REDIRECTS);
        assert!(request.agent_handle().is_none());
        assert!(!request.is_no_result_data());
    }

    #[test]
    fn test_missing_or_relative_url() {
        assert!(Request::new(RequestOptions::new()).expect_err("no url").is_validation());
        assert!(Request::new(RequestOptions::new().url(""))
            .expect_err("empty url")
            .is_validation());
        assert!(Request::new(RequestOptions::new().url("/relative"))
            .expect_err("relative url")
            .is_validation());
    }

    #[test]
    fn test_method_validation() {
        let ok = Request::new(RequestOptions::new().url("https://a.test/").method("delete"))
            .expect("known method");
        assert_eq!(ok.method(), Method::Delete);

        let err = Request::new(RequestOptions::new().url("https://a.test/").method("YEET"))
            .expect_err("unknown method");
        assert!(err.is_validation());
    }

    #[test]
    fn test_query_rejects_empty_arguments() {
        assert!(request().query("", "1").expect_err("empty name").is_validation());
        assert!(request().query("a", "").expect_err("empty value").is_validation());
    }

    #[test]
    fn test_empty_query_mapping_leaves_url_untouched() {
        let request = request().query_all(Vec::<(&str, &str)>::new());
        assert_eq!(request.url().as_str(), "https://example.com/path");
    }

    #[test]
    fn test_set_replaces_case_insensitively() {
        let request = request()
            .set("Content-Type", "text/plain")
            .expect("valid header")
            .set("content-type", "text/html")
            .expect("valid header");
        assert_eq!(request.headers().len(), 1);
        assert_eq!(request.headers().get("content-type").map(String::as_str), Some("text/html"));
    }

    #[test]
    fn test_set_rejects_invalid_headers() {
        assert!(request().set("", "1").is_err());
        assert!(request().set("x", "").is_err());
        assert!(request().set("bad name", "1").is_err());
        assert!(request().set_all([("x-ok", "1"), ("bad name", "2")]).is_err());
    }

    #[test]
    fn test_set_all_rejects_empty_entries() {
        assert!(request().set_all([("x", "")]).expect_err("empty value").is_validation());
        assert!(request().set_all([("", "1")]).expect_err("empty name").is_validation());
        assert!(request().set_all([("x", "1")]).is_ok());
    }

    #[test]
    fn test_requests_share_the_default_transport() {
        let a = request();
        let b = Request::get("https://example.org/", None).expect("valid request");
        assert!(Arc::ptr_eq(&a.transport, &b.transport));

        let custom: Arc<dyn Transport> = Arc::new(ReqwestTransport::default());
        let c = request().with_transport(custom.clone());
        assert!(Arc::ptr_eq(&c.transport, &custom));
        assert!(!Arc::ptr_eq(&a.transport, &c.transport));
    }

    #[test]
    fn test_send_with_json_content_type_serializes() {
        let request = request()
            .set("Content-Type", "application/json; charset=utf-8")
            .expect("valid header")
            .send(json!([1, 2]));
        assert_eq!(request.body().as_text(), Some("[1,2]"));
        assert_eq!(request.headers().len(), 1);
    }

    #[test]
    fn test_send_with_other_content_type_keeps_value() {
        let request = request()
            .set("content-type", "application/x-www-form-urlencoded")
            .expect("valid header")
            .send(json!({"a": 1}));
        assert_eq!(request.body().as_json(), Some(&json!({"a": 1})));
    }

    #[test]
    fn test_send_primitives_and_raw_untouched() {
        let request = request().send(json!(5));
        assert_eq!(request.body().as_json(), Some(&json!(5)));
        assert!(request.header("content-type").is_none());

        let request = request.send_raw(json!({"a": 1}));
        assert_eq!(request.body().as_json(), Some(&json!({"a": 1})));
        assert!(request.header("content-type").is_none());

        let request = request.send("plain text");
        assert_eq!(request.body().as_text(), Some("plain text"));
    }

    #[test]
    fn test_send_json_serializes_structs() {
        #[derive(Serialize)]
        struct Item {
            id: u32,
        }
        let request = request().send_json(&Item { id: 7 }).expect("serializable");
        assert_eq!(request.body().as_text(), Some(r#"{"id":7}"#));
        assert_eq!(request.header("content-type"), Some(JSON_MEDIA_TYPE));
    }

    #[test]
    fn test_send_form_is_raw() {
        let mut form = FormData::new();
        form.append("a", "1");
        let request = request().send(form);
        assert!(request.body().as_form().is_some());
        assert!(request.header("content-type").is_none());
    }

    #[test]
    fn test_attach_discards_previous_body() {
        let request = request()
            .send("previous")
            .attach("field", "value")
            .expect("valid field");
        let form = request.body().as_form().expect("form body");
        assert_eq!(form.len(), 1);
        assert!(request.attach("", "x").expect_err("unnamed field").is_validation());
    }

    #[test]
    fn test_attach_all_empty_still_promotes() {
        let request = request()
            .attach_all(Vec::<(String, String)>::new())
            .expect("empty mapping");
        let form = request.body().as_form().expect("form body");
        assert!(form.is_empty());
        assert_eq!(
            request.header("content-length"),
            Some(form.length().to_string().as_str())
        );
    }

    #[test]
    fn test_redirects() {
        assert_eq!(request().redirects(3).expect("valid").redirect_count(), 3);
        assert_eq!(request().redirects(0u8).expect("valid").redirect_count(), 0);
        assert!(request().redirects(-1).expect_err("negative").is_validation());
        assert!(request().redirects(u64::MAX).is_err());
    }

    #[test]
    fn test_agent_and_no_result_data() {
        let agent = Agent::new("pool");
        let request = request().agent(agent.clone()).no_result_data(true);
        assert!(request.agent_handle().is_some_and(|a| a.ptr_eq(&agent)));
        assert!(request.is_no_result_data());
    }
}
