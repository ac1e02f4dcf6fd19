//! Shared utility functions.
//!
//! - [`headers`] - Case-insensitive header lookup and validation

pub mod headers;

pub use headers::{find_header, is_json_media_type, parse_content_length};
