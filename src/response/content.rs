//! Content negotiation for response bodies.

use bytes::Bytes;
use serde_json::Value;

use crate::utils::is_json_media_type;

/// Decoding strategy selected from a `Content-Type` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentCategory {
    /// `application/json`: the body is parsed as JSON.
    Json,
    /// `multipart/*`: left as raw bytes.
    Multipart,
    /// Anything else, or no content type at all.
    Opaque,
}

impl ContentCategory {
    /// Classifies a `Content-Type` value.
    pub fn classify(content_type: Option<&str>) -> Self {
        match content_type {
            Some(value) if is_json_media_type(value) => ContentCategory::Json,
            Some(value) if value.to_ascii_lowercase().contains("multipart/") => {
                ContentCategory::Multipart
            }
            _ => ContentCategory::Opaque,
        }
    }
}

/// Decoded response body.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    /// Parsed JSON document.
    Json(Value),
    /// Text of a JSON-typed body that failed to parse.
    Text(String),
    /// Undecoded payload.
    Raw(Bytes),
}

impl ResponseBody {
    /// The JSON value, if the body parsed as JSON.
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            ResponseBody::Json(value) => Some(value),
            _ => None,
        }
    }

    /// The text, if the body fell back to text.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ResponseBody::Text(text) => Some(text),
            _ => None,
        }
    }

    /// The raw bytes, if the body was left undecoded.
    pub fn as_raw(&self) -> Option<&Bytes> {
        match self {
            ResponseBody::Raw(raw) => Some(raw),
            _ => None,
        }
    }
}
