//! The response envelope returned by an executed request.

use std::collections::HashMap;
use std::sync::OnceLock;

use bytes::{Bytes, BytesMut};
use futures::StreamExt;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::content::{ContentCategory, ResponseBody};
use crate::error::{Result, TransportError};
use crate::http::TransportResponse;
use crate::utils::{find_header, parse_content_length};

/// Normalized result of one exchange.
///
/// Status, headers and URL are copied when the envelope is built. The
/// payload is read into memory at the same time unless the request opted
/// out with `no_result_data`, in which case [`raw`](Response::raw),
/// [`text`](Response::text) and [`body`](Response::body) are all `None`.
///
/// `text` and `body` are decoded on first access and cached.
#[derive(Debug, Clone)]
pub struct Response {
    status: u16,
    status_text: String,
    headers: HashMap<String, String>,
    url: String,
    redirected: bool,
    ok: bool,
    raw: Option<Bytes>,
    category: ContentCategory,
    text: OnceLock<Option<String>>,
    body: OnceLock<Option<ResponseBody>>,
}

impl Response {
    /// Wraps a transport result, reading its payload unless `no_result_data` is set.
    ///
    /// With `no_result_data` the byte stream is dropped without being polled.
    pub async fn from_transport(
        response: TransportResponse,
        no_result_data: bool,
    ) -> std::result::Result<Self, TransportError> {
        let TransportResponse {
            status,
            status_text,
            headers: raw_headers,
            url,
            redirected,
            ok,
            mut body,
        } = response;

        let mut headers: HashMap<String, String> = HashMap::with_capacity(raw_headers.len());
        for (name, value) in raw_headers {
            headers
                .entry(name.to_ascii_lowercase())
                .and_modify(|existing| {
                    existing.push_str(", ");
                    existing.push_str(&value);
                })
                .or_insert(value);
        }

        let raw = if no_result_data {
            None
        } else {
            let mut buf = BytesMut::new();
            while let Some(chunk) = body.next().await {
                buf.extend_from_slice(&chunk?);
            }
            Some(buf.freeze())
        };

        let category = ContentCategory::classify(find_header(&headers, "content-type"));
        debug!(
            status,
            url = %url,
            bytes = raw.as_ref().map(Bytes::len),
            ?category,
            "Response received"
        );

        Ok(Self {
            status,
            status_text,
            headers,
            url,
            redirected,
            ok,
            raw,
            category,
            text: OnceLock::new(),
            body: OnceLock::new(),
        })
    }

    /// Status code.
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Reason phrase.
    pub fn status_text(&self) -> &str {
        &self.status_text
    }

    /// Response headers, keyed by lowercase name.
    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// Looks up a header, ignoring case.
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }

    /// Final URL, after redirects.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Whether at least one redirect was followed.
    pub fn redirected(&self) -> bool {
        self.redirected
    }

    /// Whether the status is in the success range.
    pub fn ok(&self) -> bool {
        self.ok
    }

    /// How [`body`](Response::body) decodes the payload.
    pub fn content_category(&self) -> ContentCategory {
        self.category
    }

    /// Payload bytes.
    pub fn raw(&self) -> Option<&Bytes> {
        self.raw.as_ref()
    }

    /// Payload size from `Content-Length`, or from the buffered payload.
    pub fn content_length(&self) -> Option<u64> {
        self.header("content-length")
            .and_then(parse_content_length)
            .or_else(|| self.raw.as_ref().map(|raw| raw.len() as u64))
    }

    /// Payload decoded as UTF-8, invalid sequences replaced.
    pub fn text(&self) -> Option<&str> {
        self.text
            .get_or_init(|| {
                self.raw
                    .as_ref()
                    .map(|raw| String::from_utf8_lossy(raw).into_owned())
            })
            .as_deref()
    }

    /// Payload decoded according to the response content type.
    ///
    /// JSON-typed payloads are parsed; if parsing fails the text is returned
    /// instead. Other payloads are returned as raw bytes.
    pub fn body(&self) -> Option<&ResponseBody> {
        self.body.get_or_init(|| self.decode_body()).as_ref()
    }

    /// Deserializes the payload as JSON into `T`, whatever the content type.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_slice(
            self.raw.as_deref().unwrap_or_default(),
        )?)
    }

    /// Consumes the envelope, returning the payload.
    pub fn into_raw(self) -> Option<Bytes> {
        self.raw
    }

    fn decode_body(&self) -> Option<ResponseBody> {
        let raw = self.raw.as_ref()?;
        match self.category {
            ContentCategory::Json => {
                let text = self.text().unwrap_or_default();
                match serde_json::from_str(text) {
                    Ok(value) => Some(ResponseBody::Json(value)),
                    Err(e) => {
                        warn!(url = %self.url, error = %e, "JSON body did not parse, returning text");
                        Some(ResponseBody::Text(text.to_string()))
                    }
                }
            }
            ContentCategory::Multipart | ContentCategory::Opaque => {
                Some(ResponseBody::Raw(raw.clone()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    async fn envelope(content_type: &str, payload: &'static [u8], no_result_data: bool) -> Response {
        let transport = TransportResponse::from_bytes(200, "OK", "http://a.test/", payload)
            .with_header("Content-Type", content_type);
        Response::from_transport(transport, no_result_data)
            .await
            .expect("in-memory body")
    }

    #[tokio::test]
    async fn test_json_body_parsed() {
        let response = envelope("application/json", br#"{"ok":true}"#, false).await;
        assert_eq!(response.content_category(), ContentCategory::Json);
        assert_eq!(response.body(), Some(&ResponseBody::Json(json!({"ok": true}))));
        assert_eq!(response.text(), Some(r#"{"ok":true}"#));
    }

    #[tokio::test]
    async fn test_malformed_json_falls_back_to_text() {
        let response = envelope("application/json; charset=utf-8", b"{bad", false).await;
        assert_eq!(response.body(), Some(&ResponseBody::Text("{bad".to_string())));
    }

    #[tokio::test]
    async fn test_non_json_body_is_raw() {
        let response = envelope("text/plain", b"hello", false).await;
        assert_eq!(
            response.body(),
            Some(&ResponseBody::Raw(Bytes::from_static(b"hello")))
        );
        assert_eq!(response.content_length(), Some(5));
    }

    #[tokio::test]
    async fn test_no_result_data() {
        let response = envelope("application/json", br#"{"ok":true}"#, true).await;
        assert!(response.raw().is_none());
        assert!(response.text().is_none());
        assert!(response.body().is_none());
        assert_eq!(response.status(), 200);
    }

    #[tokio::test]
    async fn test_repeated_headers_are_joined() {
        let transport = TransportResponse::from_bytes(200, "OK", "http://a.test/", "")
            .with_header("Set-Cookie", "a=1")
            .with_header("set-cookie", "b=2");
        let response = Response::from_transport(transport, false)
            .await
            .expect("in-memory body");
        assert_eq!(response.header("set-cookie"), Some("a=1, b=2"));
        assert_eq!(response.headers().len(), 1);
    }

    #[tokio::test]
    async fn test_typed_json() {
        #[derive(serde::Deserialize)]
        struct Status {
            ok: bool,
        }
        let response = envelope("text/plain", br#"{"ok":true}"#, false).await;
        let status: Status = response.json().expect("valid JSON");
        assert!(status.ok);

        let response = envelope("text/plain", b"nope", false).await;
        assert!(matches!(
            response.json::<Status>(),
            Err(crate::Error::Json { .. })
        ));
    }
}
