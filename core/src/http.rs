//! HTTP transport types for the host-does-IO pattern.
//!
//! # Design
//! Requests and responses are plain data. `JobApi` builds `HttpRequest`
//! values and reads `HttpResponse` values without touching the network; the
//! host executes the round-trip. The upload body is described as a
//! `FilePart` rather than encoded bytes, so the host's HTTP library owns the
//! multipart encoding.

use std::fmt;

/// HTTP method for a request. The backend only needs these two.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single file field of a `multipart/form-data` body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePart {
    pub field_name: String,
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl FilePart {
    /// Field name the backend's upload endpoint reads the file from.
    pub const UPLOAD_FIELD: &'static str = "file";

    /// A file destined for the upload endpoint's `file` field.
    pub fn upload(file_name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            field_name: Self::UPLOAD_FIELD.to_string(),
            file_name: file_name.into(),
            content_type: None,
            bytes: bytes.into(),
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }
}

/// Body of an outgoing request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestBody {
    Empty,
    Multipart(FilePart),
}

impl RequestBody {
    pub fn is_empty(&self) -> bool {
        matches!(self, RequestBody::Empty)
    }
}

/// An HTTP request described as plain data.
///
/// Built by `JobApi::build_*` methods. The caller executes it and hands the
/// matching `HttpResponse` to the paired `JobApi::read_*` method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: RequestBody,
}

/// An HTTP response described as plain data.
///
/// `body` holds the full response text; hosts read it to the end before
/// handing the response over.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}
