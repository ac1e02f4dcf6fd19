//! Request payloads.

use bytes::Bytes;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::form::FormData;

const URL_ENCODED: &str = "application/x-www-form-urlencoded";

/// The body of a request.
///
/// A request holds at most one representation at a time. Attaching form
/// fields replaces any other representation with [`Body::Form`].
#[derive(Debug, Clone, Default)]
pub enum Body {
    /// No payload.
    #[default]
    Empty,
    /// Structured value, encoded when the request is dispatched.
    Json(Value),
    /// Text payload, sent as is.
    Text(String),
    /// Binary payload, sent as is.
    Bytes(Bytes),
    /// Multipart form.
    Form(FormData),
}

impl Body {
    /// Returns true for [`Body::Empty`].
    pub fn is_empty(&self) -> bool {
        matches!(self, Body::Empty)
    }

    /// The multipart form, if this body is one.
    pub fn as_form(&self) -> Option<&FormData> {
        match self {
            Body::Form(form) => Some(form),
            _ => None,
        }
    }

    /// The text, if this body is a text payload.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Body::Text(text) => Some(text),
            _ => None,
        }
    }

    /// The structured value, if this body is still unserialized.
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Body::Json(value) => Some(value),
            _ => None,
        }
    }

    /// Returns true for objects and arrays, the values subject to content negotiation.
    pub(crate) fn is_structured(&self) -> bool {
        matches!(self, Body::Json(Value::Object(_) | Value::Array(_)))
    }

    /// Encodes the payload for the wire.
    ///
    /// Structured values are form-urlencoded when `content_type` says so and
    /// serialized as JSON otherwise.
    pub(crate) fn to_bytes(&self, content_type: Option<&str>) -> Option<Bytes> {
        match self {
            Body::Empty | Body::Json(Value::Null) => None,
            Body::Text(text) => Some(Bytes::from(text.clone())),
            Body::Bytes(bytes) => Some(bytes.clone()),
            Body::Form(form) => Some(form.to_bytes()),
            Body::Json(Value::String(text)) => Some(Bytes::from(text.clone())),
            Body::Json(Value::Object(map)) if is_url_encoded(content_type) => {
                let mut serializer = form_urlencoded::Serializer::new(String::new());
                for (key, value) in map {
                    match value {
                        Value::Array(items) => {
                            for item in items {
                                serializer.append_pair(key, &plain(item));
                            }
                        }
                        _ => {
                            serializer.append_pair(key, &plain(value));
                        }
                    }
                }
                Some(Bytes::from(serializer.finish()))
            }
            Body::Json(value) => Some(Bytes::from(value.to_string())),
        }
    }
}

fn is_url_encoded(content_type: Option<&str>) -> bool {
    content_type
        .map(|value| value.to_ascii_lowercase().contains(URL_ENCODED))
        .unwrap_or(false)
}

fn plain(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

impl From<Value> for Body {
    fn from(value: Value) -> Self {
        Body::Json(value)
    }
}

impl From<String> for Body {
    fn from(value: String) -> Self {
        Body::Text(value)
    }
}

impl From<&str> for Body {
    fn from(value: &str) -> Self {
        Body::Text(value.to_string())
    }
}

impl From<Vec<u8>> for Body {
    fn from(value: Vec<u8>) -> Self {
        Body::Bytes(Bytes::from(value))
    }
}

impl From<Bytes> for Body {
    fn from(value: Bytes) -> Self {
        Body::Bytes(value)
    }
}

impl From<FormData> for Body {
    fn from(value: FormData) -> Self {
        Body::Form(value)
    }
}

impl<'de> Deserialize<'de> for Body {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(Body::Json)
    }
}
