//! Stateless request builder and response reader for the job API.
//!
//! # Design
//! `JobApi` holds only the base address and carries no mutable state between
//! calls. Every backend operation is split into a `build_*` method that
//! produces an `HttpRequest` and a `read_*` method that consumes the
//! `HttpResponse`. The caller executes the actual round-trip, keeping this
//! crate deterministic and free of I/O dependencies.

use serde::de::DeserializeOwned;

use crate::config::ClientConfig;
use crate::error::{ApiError, ApiResult, Operation};
use crate::http::{FilePart, HttpMethod, HttpRequest, HttpResponse, RequestBody};
use crate::types::{ArtifactList, HealthStatus, JobDocument, JobId, RunDocument, RunId};

/// Synchronous, stateless client for the job API.
///
/// Builds `HttpRequest` values and reads `HttpResponse` values without
/// touching the network.
#[derive(Debug, Clone)]
pub struct JobApi {
    base_url: String,
}

impl JobApi {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(&config.api_base)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_upload(&self, file: FilePart) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Post,
            url: format!("{}/api/upload", self.base_url),
            headers: Vec::new(),
            body: RequestBody::Multipart(file),
        }
    }

    pub fn build_parse(&self, job_id: JobId) -> HttpRequest {
        self.trigger(format!("{}/api/parse/{job_id}", self.base_url))
    }

    pub fn build_generate(&self, job_id: JobId) -> HttpRequest {
        self.trigger(format!("{}/api/generate/{job_id}", self.base_url))
    }

    pub fn build_execute(&self, job_id: JobId) -> HttpRequest {
        self.trigger(format!("{}/api/execute/{job_id}", self.base_url))
    }

    pub fn build_health(&self) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            url: format!("{}/api/health", self.base_url),
            headers: Vec::new(),
            body: RequestBody::Empty,
        }
    }

    pub fn build_list_artifacts(&self, job_id: JobId) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            url: format!("{}/api/artifacts/{job_id}", self.base_url),
            headers: Vec::new(),
            body: RequestBody::Empty,
        }
    }

    pub fn read_upload(&self, response: HttpResponse) -> ApiResult<JobDocument> {
        decode(Operation::Upload, response)
    }

    pub fn read_parse(&self, response: HttpResponse) -> ApiResult<JobDocument> {
        decode(Operation::Parse, response)
    }

    pub fn read_generate(&self, response: HttpResponse) -> ApiResult<JobDocument> {
        decode(Operation::Generate, response)
    }

    pub fn read_execute(&self, response: HttpResponse) -> ApiResult<RunDocument> {
        decode(Operation::Execute, response)
    }

    pub fn read_health(&self, response: HttpResponse) -> ApiResult<HealthStatus> {
        decode(Operation::Health, response)
    }

    pub fn read_list_artifacts(&self, response: HttpResponse) -> ApiResult<ArtifactList> {
        decode(Operation::ListArtifacts, response)
    }

    /// Address of the Allure report for the job's most recent run. Pure
    /// string construction; the report itself is never fetched here.
    pub fn allure_index_url(&self, job_id: JobId) -> String {
        format!("{}/api/jobs/{job_id}/allure/index.html", self.base_url)
    }

    /// Address of a file inside the Allure report of one specific run.
    pub fn allure_run_report_url(&self, job_id: JobId, run_id: RunId, path: &str) -> String {
        format!(
            "{}/api/allure/{job_id}/{run_id}/report/{}",
            self.base_url,
            path.trim_start_matches('/')
        )
    }

    /// POST with no body, shared by the parse/generate/execute triggers.
    fn trigger(&self, url: String) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Post,
            url,
            headers: Vec::new(),
            body: RequestBody::Empty,
        }
    }
}

/// Map a non-2xx status to `RequestFailed`, otherwise decode the body.
fn decode<T: DeserializeOwned>(operation: Operation, response: HttpResponse) -> ApiResult<T> {
    if !response.is_success() {
        return Err(ApiError::RequestFailed {
            operation,
            status: response.status,
            body: response.body,
        });
    }
    serde_json::from_str(&response.body).map_err(|source| ApiError::Decode { operation, source })
}
