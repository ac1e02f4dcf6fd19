//! Header lookup helpers.
//!
//! Request headers are stored with the keys exactly as the caller supplied
//! them, so lookups that must honour HTTP semantics (`Content-Type` and
//! `content-type` are the same header) go through these helpers.

use std::collections::HashMap;

use reqwest::header::{HeaderName, HeaderValue};

use crate::error::{Error, Result};

/// Finds a header value by name, ignoring ASCII case.
///
/// # Example
///
/// ```rust
/// use std::collections::HashMap;
/// use courier::utils::find_header;
///
/// let mut headers = HashMap::new();
/// headers.insert("Content-Type".to_string(), "text/plain".to_string());
/// assert_eq!(find_header(&headers, "content-type"), Some("text/plain"));
/// ```
pub fn find_header<'a>(headers: &'a HashMap<String, String>, name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, value)| value.as_str())
}

/// Returns true if the value denotes a JSON media type.
pub fn is_json_media_type(value: &str) -> bool {
    value.to_ascii_lowercase().contains("application/json")
}

/// Checks that a name/value pair can be sent as an HTTP header.
pub(crate) fn validate_header(name: &str, value: &str) -> Result<()> {
    HeaderName::from_bytes(name.as_bytes())
        .map_err(|e| Error::validation(format!("Invalid header name \"{}\": {}", name, e)))?;
    HeaderValue::from_str(value).map_err(|e| {
        Error::validation(format!("Invalid value for header \"{}\": {}", name, e))
    })?;
    Ok(())
}

/// Parses a `Content-Length` value.
pub fn parse_content_length(value: &str) -> Option<u64> {
    value.trim().parse::<u64>().ok()
}
