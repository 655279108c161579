//! Executes plain-data requests against the network.
//!
//! `Transport` is the seam between `JobApiClient` and an HTTP library. The
//! default `ReqwestTransport` turns a `FilePart` into a one-field multipart
//! form and reads the full response body before returning, so status
//! interpretation always sees the complete text.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use tracing::debug;

use jobapi_core::{ApiError, ApiResult, FilePart, HttpMethod, HttpRequest, HttpResponse, RequestBody};

/// Performs one HTTP round-trip per call. Implementations must not retry.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: HttpRequest) -> ApiResult<HttpResponse>;
}

#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a preconfigured client (proxies, TLS roots, default headers).
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

fn multipart_form(file: FilePart) -> ApiResult<Form> {
    let mut part = Part::bytes(file.bytes).file_name(file.file_name);
    if let Some(content_type) = file.content_type {
        part = part
            .mime_str(&content_type)
            .map_err(|e| ApiError::transport(e.to_string()))?;
    }
    Ok(Form::new().part(file.field_name, part))
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> ApiResult<HttpResponse> {
        debug!(method = %request.method, url = %request.url, "sending request");

        let mut builder = match request.method {
            HttpMethod::Get => self.client.get(&request.url),
            HttpMethod::Post => self.client.post(&request.url),
        };
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let RequestBody::Multipart(file) = request.body {
            builder = builder.multipart(multipart_form(file)?);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| ApiError::transport(e.to_string()))?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (name.to_string(), value.to_string()))
            })
            .collect();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::transport(e.to_string()))?;

        debug!(status, bytes = body.len(), "response received");
        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}
