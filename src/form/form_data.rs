//! The multipart form container.

use bytes::{BufMut, Bytes, BytesMut};

use super::part::Part;

const CRLF: &[u8] = b"\r\n";

/// A `multipart/form-data` body held entirely in memory.
#[derive(Debug, Clone)]
pub struct FormData {
    boundary: String,
    fields: Vec<(String, Part)>,
}

impl Default for FormData {
    fn default() -> Self {
        Self::new()
    }
}

impl FormData {
    /// Creates an empty form with a random boundary.
    pub fn new() -> Self {
        Self {
            boundary: gen_boundary(),
            fields: Vec::new(),
        }
    }

    /// Boundary separating the parts of this form.
    pub fn boundary(&self) -> &str {
        &self.boundary
    }

    /// Appends a field. Repeated names produce repeated parts.
    pub fn append(&mut self, name: impl Into<String>, value: impl Into<Part>) -> &mut Self {
        self.fields.push((name.into(), value.into()));
        self
    }

    /// Fields in insertion order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &Part)> + '_ {
        self.fields.iter().map(|(name, part)| (name.as_str(), part))
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if no field was appended.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Value of the `Content-Type` header for this form.
    pub fn content_type(&self) -> String {
        format!("multipart/form-data; boundary={}", self.boundary)
    }

    /// Headers the form needs on the request carrying it.
    pub fn headers(&self) -> Vec<(String, String)> {
        vec![("content-type".to_string(), self.content_type())]
    }

    /// Encoded length of the form in bytes, computed without encoding it.
    pub fn length(&self) -> u64 {
        let parts: usize = self
            .fields
            .iter()
            .map(|(name, part)| self.part_header(name, part).len() + part.data.len() + CRLF.len())
            .sum();
        (parts + self.closing().len()) as u64
    }

    /// Encodes the whole form.
    pub fn to_bytes(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(self.length() as usize);
        for (name, part) in &self.fields {
            buf.put_slice(&self.part_header(name, part));
            buf.put_slice(&part.data);
            buf.put_slice(CRLF);
        }
        buf.put_slice(&self.closing());
        buf.freeze()
    }

    fn part_header(&self, name: &str, part: &Part) -> Vec<u8> {
        let mut buf = Vec::new();
        buf.extend_from_slice(b"--");
        buf.extend_from_slice(self.boundary.as_bytes());
        buf.extend_from_slice(CRLF);
        buf.extend_from_slice(b"Content-Disposition: form-data; name=\"");
        buf.extend_from_slice(escape_quoted(name).as_bytes());
        buf.extend_from_slice(b"\"");
        if let Some(file_name) = &part.file_name {
            buf.extend_from_slice(b"; filename=\"");
            buf.extend_from_slice(escape_quoted(file_name).as_bytes());
            buf.extend_from_slice(b"\"");
        }
        if let Some(mime) = &part.mime {
            buf.extend_from_slice(CRLF);
            buf.extend_from_slice(b"Content-Type: ");
            buf.extend_from_slice(mime.as_bytes());
        }
        buf.extend_from_slice(CRLF);
        buf.extend_from_slice(CRLF);
        buf
    }

    fn closing(&self) -> Vec<u8> {
        format!("--{}--\r\n", self.boundary).into_bytes()
    }
}

// Percent-encodes the characters that would end the quoted string or the header line.
fn escape_quoted(value: &str) -> String {
    value
        .replace('"', "%22")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

fn gen_boundary() -> String {
    let a: u64 = rand::random();
    let b: u64 = rand::random();
    format!("courier-{a:016x}{b:016x}")
}
