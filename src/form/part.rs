//! A single field of a multipart form.

use std::path::Path;

use bytes::Bytes;

use crate::error::Result;

const OCTET_STREAM: &str = "application/octet-stream";

/// A field value in a [`FormData`](super::FormData).
///
/// Plain text fields carry no metadata. File-like fields carry a file name
/// and, optionally, a media type.
#[derive(Debug, Clone)]
pub struct Part {
    pub(super) data: Bytes,
    pub(super) file_name: Option<String>,
    pub(super) mime: Option<String>,
}

impl Part {
    /// Creates a text field.
    pub fn text(value: impl Into<String>) -> Self {
        Self {
            data: Bytes::from(value.into()),
            file_name: None,
            mime: None,
        }
    }

    /// Creates a field from raw bytes.
    pub fn bytes(value: impl Into<Bytes>) -> Self {
        Self {
            data: value.into(),
            file_name: None,
            mime: None,
        }
    }

    /// Creates a file field from the contents of `path`.
    ///
    /// The file is read eagerly so that the form length stays computable
    /// without I/O. The file name defaults to the last path component.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read(path)?;
        Ok(Self {
            data: Bytes::from(data),
            file_name: path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned()),
            mime: Some(OCTET_STREAM.to_string()),
        })
    }

    /// Sets the file name sent in the `Content-Disposition` of this part.
    pub fn file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        if self.mime.is_none() {
            self.mime = Some(OCTET_STREAM.to_string());
        }
        self
    }

    /// Sets the media type of this part.
    pub fn mime_str(mut self, mime: impl Into<String>) -> Self {
        self.mime = Some(mime.into());
        self
    }

    /// Raw content of the part.
    pub fn data(&self) -> &Bytes {
        &self.data
    }

    /// File name, for file-like parts.
    pub fn get_file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    /// Media type, if one was set.
    pub fn mime(&self) -> Option<&str> {
        self.mime.as_deref()
    }
}

impl From<&str> for Part {
    fn from(value: &str) -> Self {
        Part::text(value)
    }
}

impl From<String> for Part {
    fn from(value: String) -> Self {
        Part::text(value)
    }
}

impl From<Vec<u8>> for Part {
    fn from(value: Vec<u8>) -> Self {
        Part::bytes(value)
    }
}

impl From<Bytes> for Part {
    fn from(value: Bytes) -> Self {
        Part::bytes(value)
    }
}
