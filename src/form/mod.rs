//! In-memory `multipart/form-data` bodies.
//!
//! [`FormData`] is the body a request is promoted to when fields are
//! attached. Every part is held in memory, so the encoded length is known
//! synchronously and can be advertised through `Content-Length` before the
//! request is dispatched.
//!
//! # Example
//!
//! ```rust
//! use courier::form::{FormData, Part};
//!
//! let mut form = FormData::new();
//! form.append("name", "courier");
//! form.append("avatar", Part::bytes(vec![0u8, 1, 2]).file_name("avatar.bin"));
//!
//! assert_eq!(form.len(), 2);
//! assert_eq!(form.length(), form.to_bytes().len() as u64);
//! ```

pub mod form_data;
pub mod part;

pub use form_data::FormData;
pub use part::Part;
